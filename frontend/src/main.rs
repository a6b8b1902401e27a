#![allow(non_snake_case)]

#[cfg(target_arch = "wasm32")]
mod components;
#[cfg(target_arch = "wasm32")]
mod pages;

#[cfg(target_arch = "wasm32")]
use dioxus::{logger::tracing::Level, prelude::*};
#[cfg(target_arch = "wasm32")]
use components::template::Template;
#[cfg(target_arch = "wasm32")]
use pages::dashboard::Dashboard;

#[cfg(target_arch = "wasm32")]
#[derive(Routable, PartialEq, Clone)]
enum Route {
    #[layout(Template)]
    #[route("/")]
    Dashboard {},
    #[end_layout]
    #[route("/:..route")]
    PageNotFound { route: Vec<String> }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    dioxus::logger::init(Level::INFO).expect("failed to init logger");
    dioxus::launch(App);
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("copytrader-dashboard runs in the browser; build it for wasm32 with `dx serve`");
}

#[cfg(target_arch = "wasm32")]
fn App() -> Element {
    rsx! { Router::<Route> {} }
}

#[cfg(target_arch = "wasm32")]
#[component]
fn PageNotFound(route: Vec<String>) -> Element {
    let path = route.join("/");
    rsx! {
        div {
            class: "container py-5 text-center",
            h1 { class: "display-6", "Nothing at /{path}" }
            p { class: "text-muted", "The copy trader dashboard only lives at the root." }
            Link { class: "btn btn-primary", to: Route::Dashboard {}, "Back to dashboard" }
        }
    }
}
