//! Connection indicator and trading status card.

use std::{cell::Cell, fmt, str::FromStr};

use crate::{
  utils::{format::format_time, server::TradingStatusSnapshot},
  view::ViewBindings,
};

const INDICATOR_BASE: &str = "bi bi-circle-fill";
const MASTER_CONNECTED: &str = r#"<i class="bi bi-circle-fill text-success"></i> Connected"#;
const MASTER_DISCONNECTED: &str = r#"<i class="bi bi-circle-fill text-danger"></i> Disconnected"#;
const TRADING_ACTIVE: &str = r#"<i class="bi bi-play-circle text-success"></i> Active"#;
const TRADING_INACTIVE: &str = r#"<i class="bi bi-pause-circle text-warning"></i> Inactive"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
  Connecting,
  Connected,
  Disconnected,
}

impl ConnectionState {
  pub fn color_class(self) -> &'static str {
    match self {
      ConnectionState::Connecting => "text-warning",
      ConnectionState::Connected => "text-success",
      ConnectionState::Disconnected => "text-danger",
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      ConnectionState::Connecting => "Connecting...",
      ConnectionState::Connected => "Connected",
      ConnectionState::Disconnected => "Disconnected",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownState(pub String);

impl fmt::Display for UnknownState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "unknown connection state: {}", self.0)
  }
}

impl std::error::Error for UnknownState {}

impl FromStr for ConnectionState {
  type Err = UnknownState;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "connecting" => Ok(ConnectionState::Connecting),
      "connected" => Ok(ConnectionState::Connected),
      "disconnected" => Ok(ConnectionState::Disconnected),
      _ => Err(UnknownState(s.to_string())),
    }
  }
}

pub struct ConnectionStatusController {
  view: ViewBindings,
  state: Cell<Option<ConnectionState>>,
}

impl ConnectionStatusController {
  pub fn new(view: ViewBindings) -> Self {
    Self { view, state: Cell::new(None) }
  }

  /// Last state applied, `None` before the first one.
  pub fn state(&self) -> Option<ConnectionState> {
    self.state.get()
  }

  pub fn set_state(&self, state: ConnectionState) {
    self.update_connection_status(&state.to_string(), state.label());
  }

  /// Resets the indicator to its base classes, then adds the colour for
  /// `status`. An unknown `status` still updates the label but leaves the
  /// indicator uncoloured. Nothing happens unless both nodes are bound.
  pub fn update_connection_status(&self, status: &str, label: &str) {
    let parsed = status.parse::<ConnectionState>().ok();
    if let Some(state) = parsed {
      self.state.set(Some(state));
    }

    let (Some(indicator), Some(text)) = (&self.view.status_indicator, &self.view.status_text) else {
      return;
    };
    indicator.set_class_name(INDICATOR_BASE);
    text.set_text(label);
    if let Some(state) = parsed {
      indicator.add_class(state.color_class());
    }
  }

  /// Each region is written only if the page has it.
  pub fn update_trading_status(&self, snapshot: &TradingStatusSnapshot) {
    if let Some(master) = &self.view.master_status {
      master.set_inner_html(if snapshot.master_connected { MASTER_CONNECTED } else { MASTER_DISCONNECTED });
    }
    if let Some(count) = &self.view.child_count {
      count.set_text(&snapshot.children().to_string());
    }
    if let Some(trading) = &self.view.trading_status {
      trading.set_inner_html(if snapshot.active { TRADING_ACTIVE } else { TRADING_INACTIVE });
    }
    if let (Some(node), Some(secs)) = (&self.view.last_update, snapshot.timestamp) {
      node.set_text(&format_time(secs * 1000.0));
    }
  }
}

impl fmt::Display for ConnectionState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConnectionState::Connecting => write!(f, "connecting"),
      ConnectionState::Connected => write!(f, "connected"),
      ConnectionState::Disconnected => write!(f, "disconnected"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::view::{fake::FakeHost, CHILD_COUNT, MASTER_STATUS, STATUS_INDICATOR, STATUS_TEXT, TRADING_STATUS};

  const COLORS: [&str; 3] = ["text-success", "text-danger", "text-warning"];

  #[test]
  fn exactly_one_color_class() {
    let host = FakeHost::with_status_nodes();
    let ctl = ConnectionStatusController::new(ViewBindings::bind(host.as_ref()));
    let indicator = host.node(STATUS_INDICATOR);

    for (status, expected) in [
      ("connecting", "text-warning"),
      ("connected", "text-success"),
      ("disconnected", "text-danger"),
      ("connecting", "text-warning"),
    ] {
      ctl.update_connection_status(status, "label");
      let present: Vec<_> = COLORS.iter().filter(|c| indicator.has_class(c)).collect();
      assert_eq!(present, vec![&expected]);
      assert!(indicator.has_class("bi-circle-fill"));
    }
    assert_eq!(ctl.state(), Some(ConnectionState::Connecting));
  }

  #[test]
  fn unknown_status_leaves_color_unset() {
    let host = FakeHost::with_status_nodes();
    let ctl = ConnectionStatusController::new(ViewBindings::bind(host.as_ref()));
    ctl.set_state(ConnectionState::Connected);

    ctl.update_connection_status("reconnecting", "Reconnecting");
    let indicator = host.node(STATUS_INDICATOR);
    assert!(COLORS.iter().all(|c| !indicator.has_class(c)));
    assert_eq!(host.node(STATUS_TEXT).text(), "Reconnecting");
    assert_eq!(ctl.state(), Some(ConnectionState::Connected));
  }

  #[test]
  fn missing_nodes_are_silent() {
    let host = FakeHost::new();
    let text = host.insert(STATUS_TEXT);
    let ctl = ConnectionStatusController::new(ViewBindings::bind(host.as_ref()));

    ctl.set_state(ConnectionState::Disconnected);
    assert_eq!(text.text(), "");
    assert_eq!(ctl.state(), Some(ConnectionState::Disconnected));
    ctl.update_trading_status(&TradingStatusSnapshot::default());
  }

  #[test]
  fn set_state_uses_default_labels() {
    let host = FakeHost::with_status_nodes();
    let ctl = ConnectionStatusController::new(ViewBindings::bind(host.as_ref()));
    ctl.set_state(ConnectionState::Connecting);
    assert_eq!(host.node(STATUS_TEXT).text(), "Connecting...");
  }

  #[test]
  fn trading_status_regions() {
    let host = FakeHost::with_status_nodes();
    let ctl = ConnectionStatusController::new(ViewBindings::bind(host.as_ref()));

    ctl.update_trading_status(&TradingStatusSnapshot {
      master_connected: true,
      children_count: Some(4),
      active: true,
      timestamp: None,
    });
    assert!(host.node(MASTER_STATUS).html().contains("text-success"));
    assert_eq!(host.node(CHILD_COUNT).text(), "4");
    assert!(host.node(TRADING_STATUS).html().ends_with("Active"));

    ctl.update_trading_status(&TradingStatusSnapshot::default());
    assert!(host.node(MASTER_STATUS).html().ends_with("Disconnected"));
    assert_eq!(host.node(CHILD_COUNT).text(), "0");
    assert!(host.node(TRADING_STATUS).html().contains("pause-circle"));
  }

  #[test]
  fn trading_status_partial_page() {
    let host = FakeHost::new();
    let count = host.insert(CHILD_COUNT);
    let ctl = ConnectionStatusController::new(ViewBindings::bind(host.as_ref()));
    ctl.update_trading_status(&TradingStatusSnapshot { children_count: Some(2), ..Default::default() });
    assert_eq!(count.text(), "2");
  }
}
