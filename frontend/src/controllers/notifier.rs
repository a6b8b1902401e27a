//! Transient alerts pinned to the top right corner of the page.
//!
//! Each notification removes itself after the configured window (five seconds
//! by default) unless it was dismissed first. An optional cap evicts the oldest
//! visible notification when a new one would exceed it.

use std::{cell::RefCell, collections::VecDeque, fmt, rc::Rc, time::Duration};
use tracing::warn;

use crate::{
  config::DashboardConfig,
  utils::platform,
  view::{Host, Node},
};

const NOTIFICATION_STYLE: [(&str, &str); 4] = [
  ("top", "20px"),
  ("right", "20px"),
  ("z-index", "9999"),
  ("min-width", "300px"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
  #[default]
  Info,
  Success,
  Warning,
  Error,
}

impl Severity {
  pub fn alert_class(self) -> &'static str {
    match self {
      Severity::Info => "alert-info",
      Severity::Success => "alert-success",
      Severity::Warning => "alert-warning",
      Severity::Error => "alert-danger",
    }
  }
}

// Unrecognised names fall back to info.
impl From<&str> for Severity {
  fn from(s: &str) -> Self {
    match s.to_lowercase().as_str() {
      "success" => Severity::Success,
      "warning" => Severity::Warning,
      "error" => Severity::Error,
      _ => Severity::Info,
    }
  }
}

impl fmt::Display for Severity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Severity::Info => write!(f, "info"),
      Severity::Success => write!(f, "success"),
      Severity::Warning => write!(f, "warning"),
      Severity::Error => write!(f, "error"),
    }
  }
}

fn escape_html(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for c in text.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      _ => out.push(c),
    }
  }
  out
}

struct NotifierInner {
  host: Rc<dyn Host>,
  ttl: Duration,
  max_visible: Option<usize>,
  live: RefCell<VecDeque<Node>>,
}

impl NotifierInner {
  fn prune(&self) {
    self.live.borrow_mut().retain(|n| n.is_attached());
  }
}

/// Cheap to clone; clones share the same set of live notifications.
#[derive(Clone)]
pub struct Notifier {
  inner: Rc<NotifierInner>,
}

impl Notifier {
  pub fn new(host: Rc<dyn Host>, ttl: Duration, max_visible: Option<usize>) -> Self {
    Self {
      inner: Rc::new(NotifierInner {
        host,
        ttl,
        max_visible: max_visible.map(|m| m.max(1)),
        live: RefCell::new(VecDeque::new()),
      }),
    }
  }

  pub fn from_config(host: Rc<dyn Host>, config: &DashboardConfig) -> Self {
    Self::new(host, config.notification_ttl, config.max_notifications)
  }

  /// Info notification.
  pub fn notify(&self, message: &str) -> Option<Node> {
    self.show(message, Severity::Info)
  }

  /// Puts `message` on the page and schedules its removal. Returns `None`
  /// when the page refused the element.
  pub fn show(&self, message: &str, severity: Severity) -> Option<Node> {
    let node = match self.inner.host.append_element("div") {
      Ok(node) => node,
      Err(e) => {
        warn!("could not show {} notification: {}", severity, e);
        return None;
      }
    };

    node.set_class_name(&format!("alert {} alert-dismissible fade show position-fixed", severity.alert_class()));
    for (property, value) in NOTIFICATION_STYLE {
      node.set_style(property, value);
    }
    node.set_inner_html(&format!(
      "\n  {}\n  <button type=\"button\" class=\"btn-close\" data-bs-dismiss=\"alert\"></button>\n",
      escape_html(message)
    ));

    self.track(node.clone());

    let inner = self.inner.clone();
    let timed = node.clone();
    platform::spawn(async move {
      platform::sleep(inner.ttl).await;
      if timed.is_attached() {
        timed.remove();
      }
      inner.prune();
    });

    Some(node)
  }

  /// Removes a notification ahead of its timer. Safe to call twice.
  pub fn dismiss(&self, node: &Node) {
    if node.is_attached() {
      node.remove();
    }
    self.inner.prune();
  }

  /// Notifications currently on the page.
  pub fn visible(&self) -> usize {
    self.inner.prune();
    self.inner.live.borrow().len()
  }

  fn track(&self, node: Node) {
    self.inner.prune();
    let mut live = self.inner.live.borrow_mut();
    live.push_back(node);
    if let Some(max) = self.inner.max_visible {
      while live.len() > max {
        if let Some(oldest) = live.pop_front() {
          oldest.remove();
        }
      }
    }
  }
}
