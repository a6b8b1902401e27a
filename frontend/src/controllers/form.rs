//! Asynchronous form submission with validation and a loading state.

use std::rc::Rc;
use serde_json::{Map, Value};
use tracing::{error, info};

use crate::{
  controllers::notifier::{Notifier, Severity},
  utils::{http::HttpClient, platform, server::{is_truthy, AppError}},
  view::{Element, Form},
};

pub const INVALID_CLASS: &str = "is-invalid";
pub const LOADING_CLASS: &str = "loading";
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all required fields";
pub const SAVED_MESSAGE: &str = "Settings saved successfully";
pub const FALLBACK_ERROR_MESSAGE: &str = "An error occurred";

pub type SuccessCallback = Rc<dyn Fn(&Value)>;

/// Marks every required field whose trimmed value is empty as invalid and
/// clears the mark on the rest. True when nothing is missing.
pub fn validate_form(form: &dyn Form) -> bool {
  let mut valid = true;
  for field in form.required_fields() {
    if field.value().trim().is_empty() {
      field.add_class(INVALID_CLASS);
      valid = false;
    } else {
      field.remove_class(INVALID_CLASS);
    }
  }
  valid
}

/// Flattens the form into one value per name. A repeated name keeps its last
/// value.
pub fn serialize_form(form: &dyn Form) -> Map<String, Value> {
  form.entries().into_iter().map(|(k, v)| (k, Value::String(v))).collect()
}

/// Puts an element into its loading state for as long as the guard lives.
pub struct LoadingGuard<'a, E: Element + ?Sized> {
  element: &'a E,
}

impl<'a, E: Element + ?Sized> LoadingGuard<'a, E> {
  pub fn new(element: &'a E) -> Self {
    element.add_class(LOADING_CLASS);
    element.set_style("position", "relative");
    Self { element }
  }
}

impl<E: Element + ?Sized> Drop for LoadingGuard<'_, E> {
  fn drop(&mut self) {
    self.element.remove_class(LOADING_CLASS);
  }
}

fn error_message(response: &Value) -> String {
  match response.get("error") {
    Some(Value::String(s)) if !s.is_empty() => s.clone(),
    Some(other) if is_truthy(other) => other.to_string(),
    _ => FALLBACK_ERROR_MESSAGE.to_string(),
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
  /// Required fields were empty; nothing was sent.
  Invalid,
  /// The server answered with a truthy `success`.
  Saved(Value),
  /// The server answered but did not report success.
  Rejected(String),
  /// The request itself failed; already reported by the HTTP client.
  Failed(AppError),
}

#[derive(Clone)]
pub struct FormController {
  http: HttpClient,
  notifier: Notifier,
}

impl FormController {
  pub fn new(http: HttpClient, notifier: Notifier) -> Self {
    Self { http, notifier }
  }

  /// Submits `form` to `submit_url` every time the user submits it.
  pub fn handle_form_submit(&self, form: Rc<dyn Form>, submit_url: &str, on_success: Option<SuccessCallback>) {
    let this = self.clone();
    let target = form.clone();
    let url = submit_url.to_string();
    form.on_submit(Box::new(move || {
      let this = this.clone();
      let form = target.clone();
      let url = url.clone();
      let on_success = on_success.clone();
      platform::spawn(async move {
        this.submit(form.as_ref(), &url, on_success.as_ref()).await;
      });
    }));
  }

  /// One submission: validate, POST, report. The loading state is cleared
  /// on every path out.
  pub async fn submit(&self, form: &dyn Form, submit_url: &str, on_success: Option<&SuccessCallback>) -> SubmitOutcome {
    if !validate_form(form) {
      self.notifier.show(MISSING_FIELDS_MESSAGE, Severity::Warning);
      return SubmitOutcome::Invalid;
    }

    let data = Value::Object(serialize_form(form));
    let _loading = LoadingGuard::new(form);

    match self.http.post(submit_url, &data).await {
      Ok(response) if is_truthy(response.get("success").unwrap_or(&Value::Null)) => {
        info!("form submitted to {}", submit_url);
        self.notifier.show(SAVED_MESSAGE, Severity::Success);
        if let Some(callback) = on_success {
          callback(&response);
        }
        SubmitOutcome::Saved(response)
      }
      Ok(response) => {
        let message = error_message(&response);
        self.notifier.show(&message, Severity::Error);
        SubmitOutcome::Rejected(message)
      }
      Err(e) => {
        error!("form submission to {} failed: {}", submit_url, e);
        SubmitOutcome::Failed(e)
      }
    }
  }
}
