use dioxus::prelude::*;
use copytrader_dashboard::view::{STATUS_INDICATOR, STATUS_TEXT};
use crate::Route;

const BOOTSTRAP_CSS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";
const BOOTSTRAP_ICONS: &str = "https://cdn.jsdelivr.net/npm/bootstrap-icons@1.11.3/font/bootstrap-icons.min.css";
const BOOTSTRAP_JS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/js/bootstrap.bundle.min.js";

#[component]
pub fn Template() -> Element {
  static CSS: Asset = asset!("/assets/dashboard.css");

  rsx! {
    document::Stylesheet { href: BOOTSTRAP_CSS },
    document::Stylesheet { href: BOOTSTRAP_ICONS },
    document::Stylesheet { href: CSS },
    // dismiss buttons on notifications rely on the bundle
    document::Script { src: BOOTSTRAP_JS },
    Header { }
    main {
      class: "container-fluid py-3",
      Outlet::<Route> {}
    }
    Footer { }
  }
}

#[component]
fn Header() -> Element {
  rsx! {
    nav {
      class: "navbar navbar-dark bg-dark px-3",
      Link {
        class: "navbar-brand",
        to: Route::Dashboard { },
        i { class: "bi bi-diagram-3 me-2" }
        "Dhan Copy Trader"
      }
      // written by the connection status controller, not by rsx
      span {
        class: "navbar-text connection-status",
        i { id: STATUS_INDICATOR, class: "bi bi-circle-fill" }
        " "
        span { id: STATUS_TEXT, "Connecting..." }
      }
    }
  }
}

#[component]
fn Footer() -> Element {
  rsx! {
    footer {
      class: "footer-container text-muted small px-3 py-2",
      p { "Live data arrives over the trading channel; figures refresh every 30 seconds." }
    }
  }
}
