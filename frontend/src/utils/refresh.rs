use std::{cell::RefCell, time::Duration};
use futures::future::{AbortHandle, Abortable};
use tracing::debug;

use crate::{config::REFRESH_INTERVAL, utils::platform};

/// Runs one callback on a fixed period. Starting again replaces whatever was
/// running; two callbacks never run side by side.
#[derive(Default)]
pub struct RefreshScheduler {
  handle: RefCell<Option<AbortHandle>>,
}

impl RefreshScheduler {
  pub fn new() -> Self {
    Self::default()
  }

  /// Every 30 seconds.
  pub fn start<F>(&self, callback: F)
  where
    F: FnMut() + 'static,
  {
    self.start_with_interval(callback, REFRESH_INTERVAL);
  }

  pub fn start_with_interval<F>(&self, mut callback: F, interval: Duration)
  where
    F: FnMut() + 'static,
  {
    self.stop();

    let (handle, registration) = AbortHandle::new_pair();
    let ticker = async move {
      loop {
        platform::sleep(interval).await;
        callback();
      }
    };
    platform::spawn(async move {
      let _ = Abortable::new(ticker, registration).await;
    });
    debug!("auto refresh every {:?}", interval);
    *self.handle.borrow_mut() = Some(handle);
  }

  /// No-op when nothing is scheduled.
  pub fn stop(&self) {
    if let Some(handle) = self.handle.borrow_mut().take() {
      handle.abort();
      debug!("auto refresh stopped");
    }
  }

  pub fn is_running(&self) -> bool {
    self.handle.borrow().is_some()
  }
}

impl Drop for RefreshScheduler {
  fn drop(&mut self) {
    self.stop();
  }
}
