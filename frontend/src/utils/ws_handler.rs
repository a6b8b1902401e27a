use futures::SinkExt;
use futures_util::StreamExt;
use gloo_net::websocket::{futures::WebSocket, Message};
use tracing::{error, info, warn};

use crate::utils::{
  dispatch::{ChannelEvent, EventRouter},
  packet::ChannelSession,
  server::AppError,
};

/// Holds the channel open until the server goes away, feeding every event to
/// `router`. Undecodable frames are skipped; only a transport error or a
/// refused namespace ends the channel. The last thing dispatched is always a
/// `disconnect`. There is no reconnect: the page is reloaded to try again.
pub async fn handle_websocket(url: &str, router: &EventRouter) -> Result<(), AppError> {
  let result = pump(url, router).await;
  if let Err(e) = &result {
    error!("channel error: {}", e);
  }
  router.dispatch(ChannelEvent::Disconnect);
  result
}

async fn pump(url: &str, router: &EventRouter) -> Result<(), AppError> {
  let ws = WebSocket::open(url).map_err(|e| AppError::WsConnection(e.to_string()))?;
  info!("channel opened at {}", url);

  let (mut write, mut read) = ws.split();
  let mut session = ChannelSession::default();

  while let Some(frame) = read.next().await {
    match frame {
      Ok(Message::Text(s)) => {
        let step = session.accept(&s)?;
        for reply in step.replies {
          write.send(Message::Text(reply)).await.map_err(|e| AppError::WsConnection(e.to_string()))?;
        }
        if let Some(event) = step.event {
          // the final disconnect is sent by the caller
          if event != ChannelEvent::Disconnect {
            router.dispatch(event);
          }
        }
        if step.closed {
          break;
        }
      }
      Ok(Message::Bytes(b)) => {
        warn!("ignoring {} byte binary frame", b.len());
      }
      Err(e) => return Err(AppError::WsConnection(e.to_string())),
    }
  }
  Ok(())
}
