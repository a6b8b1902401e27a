//! Spawn and sleep shims. In the browser everything runs on the page's event
//! loop; natively (tests) tasks go onto the current tokio `LocalSet`.

use std::future::Future;
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
pub fn spawn<F>(fut: F)
where
  F: Future<Output = ()> + 'static,
{
  wasm_bindgen_futures::spawn_local(fut);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn spawn<F>(fut: F)
where
  F: Future<Output = ()> + 'static,
{
  tokio::task::spawn_local(fut);
}

#[cfg(target_arch = "wasm32")]
pub async fn sleep(duration: Duration) {
  async_std::task::sleep(duration).await;
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep(duration: Duration) {
  tokio::time::sleep(duration).await;
}
