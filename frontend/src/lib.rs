//! Browser dashboard for the Dhan copy trader.
//!
//! The server pushes events over Socket.IO; [`utils::dispatch::EventRouter`]
//! turns them into page updates through the controllers. User actions go
//! through [`controllers::form::FormController`] and
//! [`utils::http::HttpClient`], and every outcome is reported through
//! [`controllers::notifier::Notifier`].

pub mod config;
pub mod controllers;
pub mod utils;
pub mod view;

pub use config::DashboardConfig;
pub use controllers::{
  form::FormController,
  notifier::{Notifier, Severity},
  status::{ConnectionState, ConnectionStatusController},
};
pub use utils::{
  dispatch::{ChannelEvent, EventRouter, FeedDelegate, MarginsDelegate},
  http::HttpClient,
  refresh::RefreshScheduler,
  server::{AppError, TradingStatusSnapshot},
};
