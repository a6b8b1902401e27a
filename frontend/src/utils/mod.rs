pub mod dispatch;
pub mod format;
pub mod helpers;
pub mod http;
pub mod packet;
pub mod platform;
pub mod refresh;
pub mod server;
#[cfg(target_arch = "wasm32")]
pub mod ws_handler;
