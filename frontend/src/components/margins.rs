#![allow(non_snake_case)]

use dioxus::prelude::*;
use serde_json::Value;
use copytrader_dashboard::utils::format::{format_currency_with, format_percentage};

struct MarginRow {
  client_id: String,
  label: String,
  available: String,
  used: String,
  cash: String,
  utilisation: String,
  ok: bool,
}

fn margin_rows(margins: &Value, symbol: &str) -> Vec<MarginRow> {
  let Some(accounts) = margins.as_object() else {
    return vec![];
  };
  accounts.iter().map(|(client_id, acct)| {
    let label = match (acct["type"].as_str(), acct["name"].as_str()) {
      (_, Some(name)) => format!("{} (x{})", name, acct["multiplier"].as_f64().unwrap_or(1.0)),
      (Some(kind), None) => kind.to_string(),
      _ => "-".to_string(),
    };
    let available = acct["available"].as_f64().unwrap_or(0.0);
    let used = acct["used"].as_f64().unwrap_or(0.0);
    let total = available + used;
    MarginRow {
      client_id: client_id.clone(),
      label,
      available: format_currency_with(&acct["available"], symbol),
      used: format_currency_with(&acct["used"], symbol),
      cash: format_currency_with(&acct["cash"], symbol),
      utilisation: format_percentage(if total > 0.0 { used / total * 100.0 } else { 0.0 }),
      ok: acct["status"].as_str() != Some("error"),
    }
  }).collect()
}

#[component]
pub fn MarginsTable(margins: Value, symbol: String, on_copy: EventHandler<String>) -> Element {
  let rows = margin_rows(&margins, &symbol);

  rsx! {
    table {
      class: "table table-sm table-hover align-middle",
      thead {
        tr {
          th { scope: "col", "Client" },
          th { scope: "col", "Account" },
          th { scope: "col", "Available" },
          th { scope: "col", "Used" },
          th { scope: "col", "Cash" },
          th { scope: "col", "Utilised" },
        }
      }
      tbody {
        if rows.is_empty() {
          tr { td { colspan: "6", class: "text-muted", "Waiting for margin data..." } }
        }
        for row in rows {
          tr {
            key: "margin-row-{row.client_id}",
            class: if !row.ok { "table-danger" },
            td {
              "{row.client_id} "
              button {
                class: "btn btn-link btn-sm p-0",
                title: "Copy client id",
                onclick: {
                  let id = row.client_id.clone();
                  move |_| on_copy.call(id.clone())
                },
                i { class: "bi bi-clipboard" }
              }
            },
            td { "{row.label}" },
            td { "{row.available}" },
            td { "{row.used}" },
            td { "{row.cash}" },
            td { "{row.utilisation}" },
          }
        }
      }
    }
  }
}
