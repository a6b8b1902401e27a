use std::{rc::Rc, time::Duration};
use dioxus::{logger::tracing::{error, info}, prelude::*};
use serde_json::Value;
use tokio::sync::mpsc;

use copytrader_dashboard::{
  utils::{
    format::format_time,
    helpers::{confirm, copy_to_clipboard, debounce, Debounced},
    http::MASTER_ACCOUNT_PATH,
    platform,
    ws_handler::handle_websocket,
  },
  view::{dom::DomHost, Host, ViewBindings, CHILD_COUNT, LAST_UPDATE, MASTER_STATUS, TRADING_STATUS},
  ConnectionState, ConnectionStatusController, DashboardConfig, EventRouter, FormController, HttpClient,
  AppError, Notifier, RefreshScheduler, Severity,
};

use crate::components::{
  feed::{FeedItem, TradingFeed, FEED_LIMIT},
  margins::MarginsTable,
  settings::{MasterAccountForm, MASTER_FORM_ID},
};

const FALLBACK_ORIGIN: &str = "http://localhost:5000";
const FILTER_WAIT: Duration = Duration::from_millis(300);

#[derive(Debug)]
enum DashboardUpdate {
  Margins(Value),
  Feed(FeedItem),
  Filter(String),
}

/// What the event handlers need once the page is wired.
#[derive(Clone)]
struct Page {
  host: Rc<dyn Host>,
  notifier: Notifier,
  poll: Rc<dyn Fn()>,
  interval: Duration,
}

fn wire(updates: mpsc::UnboundedSender<DashboardUpdate>, scheduler: &RefreshScheduler) -> Result<(Page, String), AppError> {
  let dom = DomHost::new()?;
  let origin = dom.origin().unwrap_or_else(|_| FALLBACK_ORIGIN.to_string());
  let config = DashboardConfig::from_build_env(&origin)?;
  let host: Rc<dyn Host> = Rc::new(dom);

  let notifier = Notifier::from_config(host.clone(), &config);
  let status = Rc::new(ConnectionStatusController::new(ViewBindings::bind(host.as_ref())));
  status.set_state(ConnectionState::Connecting);

  let http = HttpClient::from_config(&config, notifier.clone());

  let initial_tx = updates.clone();
  let margins_tx = updates.clone();
  let feed_tx = updates;
  let router = EventRouter::new(status.clone(), notifier.clone())
    .with_margins_delegate(Rc::new(move |margins: &Value| {
      let _ = margins_tx.send(DashboardUpdate::Margins(margins.clone()));
    }))
    .with_feed_delegate(Rc::new(move |title: &str, body: &str, severity: Severity| {
      let _ = feed_tx.send(DashboardUpdate::Feed(FeedItem {
        title: title.to_string(),
        body: body.to_string(),
        severity,
        at: format_time(chrono::Utc::now()),
      }));
    }));

  // pushes only arrive on change, so seed the table once
  let seed = http.clone();
  platform::spawn(async move {
    if let Ok(margins) = seed.margins().await {
      let _ = initial_tx.send(DashboardUpdate::Margins(margins));
    }
  });

  if let Some(form) = host.form_by_id(MASTER_FORM_ID) {
    FormController::new(http.clone(), notifier.clone()).handle_form_submit(form, MASTER_ACCOUNT_PATH, None);
  }

  let poll: Rc<dyn Fn()> = Rc::new(move || {
    let http = http.clone();
    let status = status.clone();
    platform::spawn(async move {
      if let Ok(snapshot) = http.trading_status().await {
        status.update_trading_status(&snapshot);
      }
    });
  });
  poll();
  let tick = poll.clone();
  scheduler.start_with_interval(move || tick(), config.refresh_interval);

  let url = config.channel_url.to_string();
  spawn(async move {
    let _ = handle_websocket(&url, &router).await;
  });

  info!("Dhan Copy Trader initialized");
  let page = Page { host, notifier, poll, interval: config.refresh_interval };
  Ok((page, config.currency_symbol))
}

#[component]
pub fn Dashboard() -> Element {
  let mut margins: Signal<Value> = use_signal(|| Value::Null);
  let mut feed: Signal<Vec<FeedItem>> = use_signal(Vec::new);
  let mut filter: Signal<String> = use_signal(String::new);
  let mut refreshing: Signal<bool> = use_signal(|| true);
  let mut page: Signal<Option<Page>> = use_signal(|| None);
  let mut symbol: Signal<String> = use_signal(|| "₹".to_string());
  let scheduler = use_hook(|| Rc::new(RefreshScheduler::new()));

  // Channel from the controllers to the UI states
  let updates = use_hook(|| {
    let (update_tx, mut update_rx) = mpsc::unbounded_channel::<DashboardUpdate>();
    spawn(async move {
      while let Some(update) = update_rx.recv().await {
        match update {
          DashboardUpdate::Margins(m) => margins.set(m),
          DashboardUpdate::Feed(item) => {
            let mut items = feed.write();
            items.push(item);
            if items.len() > FEED_LIMIT {
              let excess = items.len() - FEED_LIMIT;
              items.drain(0..excess);
            }
          }
          DashboardUpdate::Filter(q) => filter.set(q),
        }
      }
    });
    update_tx
  });

  let filter_input: Debounced<String> = use_hook({
    let updates = updates.clone();
    move || debounce(move |q: String| { let _ = updates.send(DashboardUpdate::Filter(q)); }, FILTER_WAIT)
  });

  use_effect({
    let updates = updates.clone();
    let scheduler = scheduler.clone();
    move || {
      match wire(updates.clone(), &scheduler) {
        Ok((wired, currency)) => {
          symbol.set(currency);
          page.set(Some(wired));
        }
        Err(e) => error!("dashboard failed to start: {}", e),
      }
    }
  });

  let copy_id = move |id: String| {
    if let Some(Page { host, notifier, .. }) = page.read().clone() {
      spawn(async move {
        copy_to_clipboard(host.as_ref(), &notifier, &id).await;
      });
    }
  };

  let toggle_refresh = {
    let scheduler = scheduler.clone();
    move |_| {
      let Some(current) = page.read().clone() else { return };
      if scheduler.is_running() {
        confirm(current.host.as_ref(), "Stop refreshing trading status?", || {
          scheduler.stop();
          refreshing.set(false);
        });
      } else {
        let poll = current.poll.clone();
        poll();
        scheduler.start_with_interval(move || poll(), current.interval);
        refreshing.set(true);
      }
    }
  };

  rsx! {
    div {
      class: "row g-3",
      div {
        class: "col-lg-4",
        div {
          class: "card",
          div { class: "card-header", "Trading Status" }
          ul {
            class: "list-group list-group-flush",
            li { class: "list-group-item d-flex justify-content-between", "Master" span { id: MASTER_STATUS, "-" } }
            li { class: "list-group-item d-flex justify-content-between", "Children" span { id: CHILD_COUNT, "0" } }
            li { class: "list-group-item d-flex justify-content-between", "Trading" span { id: TRADING_STATUS, "-" } }
            li { class: "list-group-item d-flex justify-content-between", "Updated" small { id: LAST_UPDATE, class: "text-muted", "-" } }
          }
          div {
            class: "card-footer",
            button {
              class: if refreshing() { "btn btn-sm btn-outline-secondary" } else { "btn btn-sm btn-outline-success" },
              onclick: toggle_refresh,
              if refreshing() { "Stop auto refresh" } else { "Resume auto refresh" }
            }
          }
        }
        div {
          class: "card mt-3",
          div { class: "card-header", "Master Account" }
          div { class: "card-body", MasterAccountForm { } }
        }
      }
      div {
        class: "col-lg-8",
        div {
          class: "card",
          div { class: "card-header", "Margins" }
          div {
            class: "card-body",
            MarginsTable { margins: margins(), symbol: symbol(), on_copy: copy_id }
          }
        }
        div {
          class: "card mt-3",
          div { class: "card-header", "Trading Feed" }
          div {
            class: "card-body",
            TradingFeed {
              items: feed(),
              filter: filter(),
              on_filter: move |q: String| filter_input.call(q)
            }
          }
        }
      }
    }
  }
}
