//! Small page utilities: clipboard copy, debouncing and confirmation prompts.

use std::{cell::RefCell, rc::Rc, time::Duration};
use futures::future::{AbortHandle, Abortable};
use tracing::warn;

use crate::{
  controllers::notifier::{Notifier, Severity},
  utils::platform,
  view::{Host, Node},
};

pub const COPIED_MESSAGE: &str = "Copied to clipboard";
pub const COPY_FAILED_MESSAGE: &str = "Failed to copy to clipboard";

/// Removes the scratch element when dropped.
struct ScratchText(Node);

impl Drop for ScratchText {
  fn drop(&mut self) {
    if self.0.is_attached() {
      self.0.remove();
    }
  }
}

/// Copies `text`, first through the clipboard API, then through a hidden
/// textarea and the legacy copy command. The outcome is always announced.
pub async fn copy_to_clipboard(host: &dyn Host, notifier: &Notifier, text: &str) -> bool {
  let copied = match host.write_clipboard(text).await {
    Ok(()) => true,
    Err(e) => {
      warn!("Failed to copy: {}", e);
      legacy_copy(host, text)
    }
  };

  if copied {
    notifier.show(COPIED_MESSAGE, Severity::Success);
  } else {
    notifier.show(COPY_FAILED_MESSAGE, Severity::Error);
  }
  copied
}

fn legacy_copy(host: &dyn Host, text: &str) -> bool {
  let _scratch = match host.append_scratch_text(text) {
    Ok(node) => ScratchText(node),
    Err(e) => {
      warn!("no scratch element for copy: {}", e);
      return false;
    }
  };
  match host.exec_copy() {
    Ok(()) => true,
    Err(e) => {
      warn!("legacy copy failed: {}", e);
      false
    }
  }
}

/// Runs `callback` only if the user accepts the prompt.
pub fn confirm<F: FnOnce()>(host: &dyn Host, message: &str, callback: F) -> bool {
  let accepted = host.confirm(message);
  if accepted {
    callback();
  }
  accepted
}

struct DebounceInner<A> {
  func: Box<dyn Fn(A)>,
  wait: Duration,
  pending: RefCell<Option<AbortHandle>>,
}

/// Trailing-edge debounce: a burst of calls produces one invocation, with the
/// last call's argument, once `wait` has passed without another call.
pub struct Debounced<A> {
  inner: Rc<DebounceInner<A>>,
}

impl<A> Clone for Debounced<A> {
  fn clone(&self) -> Self {
    Self { inner: self.inner.clone() }
  }
}

pub fn debounce<A, F>(func: F, wait: Duration) -> Debounced<A>
where
  A: 'static,
  F: Fn(A) + 'static,
{
  Debounced {
    inner: Rc::new(DebounceInner { func: Box::new(func), wait, pending: RefCell::new(None) }),
  }
}

impl<A: 'static> Debounced<A> {
  pub fn call(&self, arg: A) {
    self.cancel();

    let (handle, registration) = AbortHandle::new_pair();
    let inner = self.inner.clone();
    let delayed = async move {
      platform::sleep(inner.wait).await;
      inner.pending.borrow_mut().take();
      (inner.func)(arg);
    };
    *self.inner.pending.borrow_mut() = Some(handle);
    platform::spawn(async move {
      let _ = Abortable::new(delayed, registration).await;
    });
  }

  /// Drops a pending invocation, if any.
  pub fn cancel(&self) {
    if let Some(handle) = self.inner.pending.borrow_mut().take() {
      handle.abort();
    }
  }
}
