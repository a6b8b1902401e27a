//! The page the dashboard draws into.
//!
//! Controllers never look elements up themselves. The page is reached through
//! [`Host`], and the fixed status nodes are resolved once into
//! [`ViewBindings`]. A node the page does not have stays `None` and every
//! update aimed at it is skipped without error.

use std::rc::Rc;
use futures::future::LocalBoxFuture;

use crate::utils::server::AppError;

#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(test)]
pub(crate) mod fake;

pub const STATUS_INDICATOR: &str = "status-indicator";
pub const STATUS_TEXT: &str = "status-text";
pub const MASTER_STATUS: &str = "master-status";
pub const CHILD_COUNT: &str = "child-count";
pub const TRADING_STATUS: &str = "trading-status";
pub const LAST_UPDATE: &str = "last-update";

/// A live element on the page.
pub trait Element {
  /// Replaces the whole class list.
  fn set_class_name(&self, class_name: &str);
  fn add_class(&self, class: &str);
  fn remove_class(&self, class: &str);
  fn set_text(&self, text: &str);
  fn set_inner_html(&self, html: &str);
  fn set_style(&self, property: &str, value: &str);
  /// Whether the element still has a parent.
  fn is_attached(&self) -> bool;
  fn remove(&self);
}

pub type Node = Rc<dyn Element>;

/// A form control carrying a value.
pub trait Field: Element {
  fn value(&self) -> String;
}

pub trait Form: Element {
  /// Every `input`, `textarea` and `select` marked `required`.
  fn required_fields(&self) -> Vec<Rc<dyn Field>>;
  /// Name/value pairs in document order, as the browser would submit them.
  fn entries(&self) -> Vec<(String, String)>;
  /// Installs `handler` for the submit event. Default navigation is
  /// suppressed before the handler runs.
  fn on_submit(&self, handler: Box<dyn Fn()>);
}

pub trait Host {
  fn element_by_id(&self, id: &str) -> Option<Node>;
  fn form_by_id(&self, id: &str) -> Option<Rc<dyn Form>>;
  /// Creates an element of `tag` and appends it to the document body.
  fn append_element(&self, tag: &str) -> Result<Node, AppError>;
  /// Appends an off-screen textarea holding `text` and selects its contents.
  fn append_scratch_text(&self, text: &str) -> Result<Node, AppError>;
  /// Asynchronous clipboard API.
  fn write_clipboard(&self, text: &str) -> LocalBoxFuture<'static, Result<(), AppError>>;
  /// Legacy `copy` command over the current selection.
  fn exec_copy(&self) -> Result<(), AppError>;
  /// Blocking yes/no prompt.
  fn confirm(&self, message: &str) -> bool;
}

/// The fixed nodes the status controllers write to, looked up once.
#[derive(Clone, Default)]
pub struct ViewBindings {
  pub status_indicator: Option<Node>,
  pub status_text: Option<Node>,
  pub master_status: Option<Node>,
  pub child_count: Option<Node>,
  pub trading_status: Option<Node>,
  pub last_update: Option<Node>,
}

impl ViewBindings {
  pub fn bind(host: &dyn Host) -> Self {
    Self {
      status_indicator: host.element_by_id(STATUS_INDICATOR),
      status_text: host.element_by_id(STATUS_TEXT),
      master_status: host.element_by_id(MASTER_STATUS),
      child_count: host.element_by_id(CHILD_COUNT),
      trading_status: host.element_by_id(TRADING_STATUS),
      last_update: host.element_by_id(LAST_UPDATE),
    }
  }
}
