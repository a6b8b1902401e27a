//! Routes real-time channel events to the page.

use std::rc::Rc;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
  controllers::{
    notifier::{Notifier, Severity},
    status::{ConnectionState, ConnectionStatusController},
  },
  utils::server::{StatusMessage, TradingStatusSnapshot},
};

pub const ORDER_UPDATE_TITLE: &str = "Order Update";

#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
  Connect,
  Disconnect,
  Status(StatusMessage),
  MarginUpdate(Value),
  StatusUpdate(TradingStatusSnapshot),
  OrderUpdate(Value),
  Other { name: String, data: Value },
}

impl ChannelEvent {
  /// Builds the event for `name`. A payload that does not fit the event's
  /// shape is kept as `Other`.
  pub fn from_parts(name: &str, data: Value) -> Self {
    match name {
      "connect" => ChannelEvent::Connect,
      "disconnect" => ChannelEvent::Disconnect,
      "status" => match serde_json::from_value::<StatusMessage>(data.clone()) {
        Ok(msg) => ChannelEvent::Status(msg),
        Err(e) => {
          warn!("malformed status payload: {}", e);
          ChannelEvent::Other { name: name.to_string(), data }
        }
      },
      "margin_update" => ChannelEvent::MarginUpdate(data),
      "status_update" => match serde_json::from_value::<TradingStatusSnapshot>(data.clone()) {
        Ok(snapshot) => ChannelEvent::StatusUpdate(snapshot),
        Err(e) => {
          warn!("malformed status_update payload: {}", e);
          ChannelEvent::Other { name: name.to_string(), data }
        }
      },
      "order_update" => ChannelEvent::OrderUpdate(data),
      _ => ChannelEvent::Other { name: name.to_string(), data },
    }
  }

  pub fn name(&self) -> &str {
    match self {
      ChannelEvent::Connect => "connect",
      ChannelEvent::Disconnect => "disconnect",
      ChannelEvent::Status(_) => "status",
      ChannelEvent::MarginUpdate(_) => "margin_update",
      ChannelEvent::StatusUpdate(_) => "status_update",
      ChannelEvent::OrderUpdate(_) => "order_update",
      ChannelEvent::Other { name, .. } => name,
    }
  }
}

/// Receives `margin_update` payloads, e.g. to redraw a margins table.
pub trait MarginsDelegate {
  fn update_margins(&self, margins: &Value);
}

/// Receives trading feed entries.
pub trait FeedDelegate {
  fn add_feed_item(&self, title: &str, body: &str, severity: Severity);
}

impl<F: Fn(&Value)> MarginsDelegate for F {
  fn update_margins(&self, margins: &Value) {
    self(margins)
  }
}

impl<F: Fn(&str, &str, Severity)> FeedDelegate for F {
  fn add_feed_item(&self, title: &str, body: &str, severity: Severity) {
    self(title, body, severity)
  }
}

pub struct EventRouter {
  status: Rc<ConnectionStatusController>,
  notifier: Notifier,
  margins: Option<Rc<dyn MarginsDelegate>>,
  feed: Option<Rc<dyn FeedDelegate>>,
}

impl EventRouter {
  pub fn new(status: Rc<ConnectionStatusController>, notifier: Notifier) -> Self {
    Self { status, notifier, margins: None, feed: None }
  }

  pub fn with_margins_delegate(mut self, delegate: Rc<dyn MarginsDelegate>) -> Self {
    self.margins = Some(delegate);
    self
  }

  pub fn with_feed_delegate(mut self, delegate: Rc<dyn FeedDelegate>) -> Self {
    self.feed = Some(delegate);
    self
  }

  pub fn status(&self) -> &ConnectionStatusController {
    &self.status
  }

  pub fn dispatch(&self, event: ChannelEvent) {
    debug!("channel event {}", event.name());
    match event {
      ChannelEvent::Connect => {
        info!("Connected to server");
        self.status.set_state(ConnectionState::Connected);
      }
      ChannelEvent::Disconnect => {
        info!("Disconnected from server");
        self.status.set_state(ConnectionState::Disconnected);
      }
      ChannelEvent::Status(msg) => {
        self.notifier.show(&msg.message, Severity::Info);
      }
      ChannelEvent::MarginUpdate(margins) => {
        if let Some(delegate) = &self.margins {
          delegate.update_margins(&margins);
        }
      }
      ChannelEvent::StatusUpdate(snapshot) => self.status.update_trading_status(&snapshot),
      ChannelEvent::OrderUpdate(order) => {
        if let Some(delegate) = &self.feed {
          delegate.add_feed_item(ORDER_UPDATE_TITLE, &order.to_string(), Severity::Info);
        }
      }
      ChannelEvent::Other { name, .. } => debug!("no handler for channel event {}", name),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::cell::RefCell;
  use serde_json::json;
  use tokio::task::LocalSet;

  use crate::{
    config::NOTIFICATION_TTL,
    view::{fake::FakeHost, ViewBindings, CHILD_COUNT, STATUS_INDICATOR, STATUS_TEXT, TRADING_STATUS},
  };

  fn router(host: &Rc<FakeHost>) -> EventRouter {
    let status = Rc::new(ConnectionStatusController::new(ViewBindings::bind(host.as_ref())));
    EventRouter::new(status, Notifier::new(host.clone(), NOTIFICATION_TTL, None))
  }

  #[test]
  fn lifecycle_events_drive_indicator() {
    let host = FakeHost::with_status_nodes();
    let router = router(&host);

    router.dispatch(ChannelEvent::Connect);
    assert!(host.node(STATUS_INDICATOR).has_class("text-success"));
    assert_eq!(host.node(STATUS_TEXT).text(), "Connected");

    router.dispatch(ChannelEvent::from_parts("disconnect", Value::Null));
    assert!(host.node(STATUS_INDICATOR).has_class("text-danger"));
    assert_eq!(router.status().state(), Some(ConnectionState::Disconnected));
  }

  #[tokio::test(start_paused = true)]
  async fn status_event_notifies() {
    LocalSet::new().run_until(async {
      let host = FakeHost::new();
      let router = router(&host);
      router.dispatch(ChannelEvent::from_parts("status", json!({ "message": "Connected to trading system" })));
      let body = host.attached();
      assert_eq!(body.len(), 1);
      assert!(body[0].has_class("alert-info"));
      assert!(body[0].html().contains("Connected to trading system"));
    }).await;
  }

  #[test]
  fn status_update_refreshes_card() {
    let host = FakeHost::with_status_nodes();
    let router = router(&host);
    router.dispatch(ChannelEvent::from_parts("status_update", json!({ "active": true, "children_count": 5 })));
    assert_eq!(host.node(CHILD_COUNT).text(), "5");
  }

  #[test]
  fn delegates_are_optional() {
    let host = FakeHost::new();
    let router = router(&host);
    router.dispatch(ChannelEvent::MarginUpdate(json!({ "1100": { "availabelBalance": 10 } })));
    router.dispatch(ChannelEvent::OrderUpdate(json!({ "orderId": "1" })));
    router.dispatch(ChannelEvent::from_parts("heartbeat", json!(1)));
  }

  #[test]
  fn delegates_receive_payloads() {
    let host = FakeHost::new();
    let margins: Rc<RefCell<Vec<Value>>> = Rc::default();
    let feed: Rc<RefCell<Vec<(String, String, Severity)>>> = Rc::default();

    let margins_sink = margins.clone();
    let feed_sink = feed.clone();
    let router = router(&host)
      .with_margins_delegate(Rc::new(move |m: &Value| margins_sink.borrow_mut().push(m.clone())))
      .with_feed_delegate(Rc::new(move |t: &str, b: &str, s: Severity| {
        feed_sink.borrow_mut().push((t.to_string(), b.to_string(), s))
      }));

    router.dispatch(ChannelEvent::from_parts("margin_update", json!({ "1100": { "type": "master" } })));
    router.dispatch(ChannelEvent::from_parts("order_update", json!({ "orderId": "42", "qty": 10 })));

    assert_eq!(margins.borrow().as_slice(), &[json!({ "1100": { "type": "master" } })]);
    let feed = feed.borrow();
    assert_eq!(feed[0].0, ORDER_UPDATE_TITLE);
    assert_eq!(serde_json::from_str::<Value>(&feed[0].1).unwrap(), json!({ "orderId": "42", "qty": 10 }));
    assert_eq!(feed[0].2, Severity::Info);
  }

  #[test]
  fn malformed_payloads_become_other() {
    let event = ChannelEvent::from_parts("status_update", json!("oops"));
    assert_eq!(event.name(), "status_update");
    assert!(matches!(event, ChannelEvent::Other { .. }));
  }

  #[test]
  fn loose_status_update_still_refreshes_card() {
    let host = FakeHost::with_status_nodes();
    let router = router(&host);
    let event = ChannelEvent::from_parts("status_update", json!({
      "active": null, "master_connected": true, "children_count": 3.0
    }));
    assert!(matches!(event, ChannelEvent::StatusUpdate(_)));

    router.dispatch(event);
    assert_eq!(host.node(CHILD_COUNT).text(), "3");
    assert!(host.node(TRADING_STATUS).html().ends_with("Inactive"));
  }
}
