//! JSON request helper. Every failure is logged, shown to the user as an
//! error notification, and then handed back to the caller.

use std::time::Duration;
use futures::future::{self, Either};
use reqwest::{header::CONTENT_TYPE, Client, Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use crate::{
  config::DashboardConfig,
  controllers::notifier::{Notifier, Severity},
  utils::{platform, server::{AppError, TradingStatusSnapshot}},
};

pub const TRADING_STATUS_PATH: &str = "/api/trading/status";
pub const MARGINS_PATH: &str = "/api/margins";
pub const MASTER_ACCOUNT_PATH: &str = "/api/accounts/master";

#[derive(Clone)]
pub struct HttpClient {
  client: Client,
  base: Url,
  timeout: Option<Duration>,
  notifier: Notifier,
}

impl HttpClient {
  pub fn new(base: Url, notifier: Notifier) -> Self {
    Self { client: Client::new(), base, timeout: None, notifier }
  }

  pub fn from_config(config: &DashboardConfig, notifier: Notifier) -> Self {
    Self {
      timeout: config.request_timeout,
      ..Self::new(config.api_base.clone(), notifier)
    }
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = Some(timeout);
    self
  }

  /// Absolute form of `url`; relative paths resolve against the base.
  pub fn resolve(&self, url: &str) -> Result<Url, AppError> {
    self.base.join(url).map_err(|e| AppError::InvalidUrl(format!("{}: {}", url, e)))
  }

  /// Sends `payload` as the JSON body (ignored for GET) and returns the parsed
  /// response body.
  pub async fn api_request(&self, url: &str, method: Method, payload: Option<&Value>) -> Result<Value, AppError> {
    self.request_json(url, method, payload).await
  }

  pub async fn get(&self, url: &str) -> Result<Value, AppError> {
    self.request_json(url, Method::GET, None).await
  }

  pub async fn post(&self, url: &str, payload: &Value) -> Result<Value, AppError> {
    self.request_json(url, Method::POST, Some(payload)).await
  }

  pub async fn request_json<T: DeserializeOwned>(&self, url: &str, method: Method, payload: Option<&Value>) -> Result<T, AppError> {
    match self.send(url, method.clone(), payload).await {
      Ok(body) => Ok(body),
      Err(e) => {
        error!("API request {} {} failed: {}", method, url, e);
        self.notifier.show(&format!("API Error: {}", e), Severity::Error);
        Err(e)
      }
    }
  }

  pub async fn trading_status(&self) -> Result<TradingStatusSnapshot, AppError> {
    self.request_json(TRADING_STATUS_PATH, Method::GET, None).await
  }

  pub async fn margins(&self) -> Result<Value, AppError> {
    self.get(MARGINS_PATH).await
  }

  async fn send<T: DeserializeOwned>(&self, url: &str, method: Method, payload: Option<&Value>) -> Result<T, AppError> {
    let target = self.resolve(url)?;
    debug!("{} {}", method, target);

    let mut req = self.client.request(method.clone(), target).header(CONTENT_TYPE, "application/json");
    if let Some(body) = payload {
      if method != Method::GET {
        req = req.body(serde_json::to_vec(body)?);
      }
    }

    let exchange = async move {
      let resp = req.send().await?;
      let status = resp.status();
      if !status.is_success() {
        return Err(AppError::Http { status: status.as_u16() });
      }
      Ok(resp.json::<T>().await?)
    };

    match self.timeout {
      None => exchange.await,
      Some(limit) => match future::select(Box::pin(exchange), Box::pin(platform::sleep(limit))).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(AppError::Timeout(limit)),
      },
    }
  }
}
