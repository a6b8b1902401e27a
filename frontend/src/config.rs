use std::time::Duration;
use reqwest::Url;

use crate::utils::{format::DEFAULT_CURRENCY, packet::channel_url_for, server::AppError};

pub const NOTIFICATION_TTL: Duration = Duration::from_millis(5_000);
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(30_000);

// Baked in by build.rs from `.env` when present.
const API_BASE_URL: Option<&str> = option_env!("API_BASE_URL");
const CHANNEL_URL: Option<&str> = option_env!("CHANNEL_URL");

#[derive(Debug, Clone)]
pub struct DashboardConfig {
  pub api_base: Url,
  pub channel_url: Url,
  pub notification_ttl: Duration,
  /// `None` leaves the number of visible notifications unbounded.
  pub max_notifications: Option<usize>,
  /// `None` waits on the server indefinitely.
  pub request_timeout: Option<Duration>,
  pub refresh_interval: Duration,
  pub currency_symbol: String,
}

impl DashboardConfig {
  /// Defaults rooted at `api_base`; the channel lives on the same host.
  pub fn new(api_base: Url) -> Result<Self, AppError> {
    let channel_url = channel_url_for(&api_base)?;
    Ok(Self {
      api_base,
      channel_url,
      notification_ttl: NOTIFICATION_TTL,
      max_notifications: None,
      request_timeout: None,
      refresh_interval: REFRESH_INTERVAL,
      currency_symbol: DEFAULT_CURRENCY.to_string(),
    })
  }

  /// Compile-time overrides first, `origin` (the page's) otherwise.
  pub fn from_build_env(origin: &str) -> Result<Self, AppError> {
    let base = API_BASE_URL.unwrap_or(origin);
    let api_base = Url::parse(base).map_err(|e| AppError::InvalidUrl(format!("{}: {}", base, e)))?;
    let mut config = Self::new(api_base)?;
    if let Some(url) = CHANNEL_URL {
      config.channel_url = Url::parse(url).map_err(|e| AppError::InvalidUrl(format!("{}: {}", url, e)))?;
    }
    Ok(config)
  }

  pub fn with_notification_ttl(mut self, ttl: Duration) -> Self {
    self.notification_ttl = ttl;
    self
  }

  pub fn with_max_notifications(mut self, max: usize) -> Self {
    self.max_notifications = Some(max);
    self
  }

  pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
    self.request_timeout = Some(timeout);
    self
  }

  pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
    self.refresh_interval = interval;
    self
  }

  pub fn with_currency_symbol(mut self, symbol: &str) -> Self {
    self.currency_symbol = symbol.to_string();
    self
  }
}
