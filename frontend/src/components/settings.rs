#![allow(non_snake_case)]

use dioxus::prelude::*;

pub const MASTER_FORM_ID: &str = "master-account-form";

// Submission is wired by the form controller once the page is mounted, so
// the form has no rsx submit handler of its own.
#[component]
pub fn MasterAccountForm() -> Element {
  rsx! {
    form {
      id: MASTER_FORM_ID,
      class: "position-relative",
      div {
        class: "mb-2",
        label { class: "form-label", r#for: "master-client-id", "Client ID" },
        input { class: "form-control", id: "master-client-id", name: "client_id", r#type: "text", required: true }
        div { class: "invalid-feedback", "Client ID is required" }
      },
      div {
        class: "mb-2",
        label { class: "form-label", r#for: "master-access-token", "Access Token" },
        input { class: "form-control", id: "master-access-token", name: "access_token", r#type: "password", required: true }
        div { class: "invalid-feedback", "Access token is required" }
      },
      button { r#type: "submit", class: "btn btn-primary", "Save Master Account" }
    }
  }
}
