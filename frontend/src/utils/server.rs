use std::time::Duration;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/* Server Payloads */

/// Body of the `status` channel event.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StatusMessage {
  #[serde(default)]
  pub message: String,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// Truthiness of a loosely typed JSON value: `null`, `false`, `0`, `NaN` and
/// `""` are false, everything else is true.
pub fn is_truthy(v: &Value) -> bool {
  match v {
    Value::Null => false,
    Value::Bool(b) => *b,
    Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
    Value::String(s) => !s.is_empty(),
    Value::Array(_) | Value::Object(_) => true,
  }
}

fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
  Ok(is_truthy(&Value::deserialize(deserializer)?))
}

// Integral floats and numeric strings count; anything else reads as absent.
fn loose_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
  let n = match Value::deserialize(deserializer)? {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok(),
    _ => None,
  };
  Ok(n.filter(|n| n.is_finite() && *n >= 0.0).map(|n| n as u64))
}

/// Trading system state pushed on `status_update` and served by `/api/trading/status`.
/// Replaced wholesale on every update. Flags and the count are read loosely,
/// the way the server's Python side fills them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TradingStatusSnapshot {
  #[serde(default, deserialize_with = "truthy")]
  pub master_connected: bool,
  #[serde(default, deserialize_with = "loose_count")]
  pub children_count: Option<u64>,
  #[serde(default, deserialize_with = "truthy")]
  pub active: bool,
  // epoch seconds; the REST endpoint calls it `last_update`
  #[serde(default, alias = "last_update", skip_serializing_if = "Option::is_none")]
  pub timestamp: Option<f64>,
}

impl TradingStatusSnapshot {
  pub fn children(&self) -> u64 {
    self.children_count.unwrap_or(0)
  }
}

// App Errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
  #[error("HTTP error! status: {status}")]
  Http { status: u16 },
  #[error("Network error: {0}")]
  Network(String),
  #[error("Request timed out after {0:?}")]
  Timeout(Duration),
  #[error("Invalid url: {0}")]
  InvalidUrl(String),
  #[error("Deserialize error: {0}")]
  Deserialize(String),
  #[error("Websocket connection error: {0}")]
  WsConnection(String),
  #[error("Malformed channel packet: {0}")]
  Packet(String),
  #[error("Wasm error: {0}")]
  Wasm(String),
  #[error("Clipboard error: {0}")]
  Clipboard(String),
  #[error("Dom error: {0}")]
  Dom(String),
}

impl From<reqwest::Error> for AppError {
  fn from(err: reqwest::Error) -> Self {
    if let Some(status) = err.status() {
      return AppError::Http { status: status.as_u16() };
    }
    if err.is_decode() {
      return AppError::Deserialize(err.to_string());
    }
    AppError::Network(err.to_string())
  }
}

impl From<serde_json::Error> for AppError {
  fn from(err: serde_json::Error) -> Self {
    AppError::Deserialize(err.to_string())
  }
}
