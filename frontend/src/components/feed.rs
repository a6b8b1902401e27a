#![allow(non_snake_case)]

use dioxus::prelude::*;
use copytrader_dashboard::Severity;

#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
  pub title: String,
  pub body: String,
  pub severity: Severity,
  pub at: String,
}

pub const FEED_LIMIT: usize = 50;

fn badge(severity: Severity) -> &'static str {
  match severity {
    Severity::Info => "badge text-bg-info",
    Severity::Success => "badge text-bg-success",
    Severity::Warning => "badge text-bg-warning",
    Severity::Error => "badge text-bg-danger",
  }
}

#[component]
pub fn TradingFeed(items: Vec<FeedItem>, filter: String, on_filter: EventHandler<String>) -> Element {
  let needle = filter.to_lowercase();

  rsx! {
    input {
      class: "form-control form-control-sm mb-2",
      r#type: "search",
      placeholder: "Filter feed",
      oninput: move |evt| on_filter.call(evt.value()),
    }
    ul {
      class: "list-group feed-list",
      for (idx, item) in items.iter().rev().filter(|i| needle.is_empty() || i.body.to_lowercase().contains(&needle)).enumerate() {
        li {
          key: "feed-item-{idx}",
          class: "list-group-item",
          div {
            class: "d-flex justify-content-between",
            span { class: badge(item.severity), "{item.title}" }
            small { class: "text-muted", "{item.at}" }
          }
          div { class: "feed-body", "{item.body}" }
        }
      }
    }
  }
}
