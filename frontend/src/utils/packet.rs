//! Socket.IO over a raw websocket.
//!
//! The trading server speaks Socket.IO v5 on top of Engine.IO v4. Only the
//! websocket transport and text packets are supported: an Engine.IO frame is a
//! one-digit packet type followed by its payload, and Socket.IO packets ride
//! inside Engine.IO `message` frames.

use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{dispatch::ChannelEvent, server::AppError};

pub const DEFAULT_NAMESPACE: &str = "/";
const ENGINE_IO_PATH: &str = "/socket.io/";
const ENGINE_IO_QUERY: &str = "EIO=4&transport=websocket";

/// Websocket endpoint of the Socket.IO server living at `base`.
pub fn channel_url_for(base: &Url) -> Result<Url, AppError> {
  let mut url = base.join(ENGINE_IO_PATH).map_err(|e| AppError::InvalidUrl(e.to_string()))?;
  let scheme = match url.scheme() {
    "http" | "ws" => "ws",
    "https" | "wss" => "wss",
    other => return Err(AppError::InvalidUrl(format!("unsupported scheme {}", other))),
  };
  url.set_scheme(scheme).map_err(|_| AppError::InvalidUrl(format!("cannot switch {} to {}", base, scheme)))?;
  url.set_query(Some(ENGINE_IO_QUERY));
  Ok(url)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
  pub sid: String,
  #[serde(default)]
  pub upgrades: Vec<String>,
  pub ping_interval: u64,
  pub ping_timeout: u64,
  #[serde(default)]
  pub max_payload: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
  Open(Handshake),
  Close,
  Ping(String),
  Pong(String),
  Message(String),
  Upgrade,
  Noop,
}

impl EnginePacket {
  pub fn decode(frame: &str) -> Result<Self, AppError> {
    let mut chars = frame.chars();
    let kind = chars.next().ok_or_else(|| AppError::Packet("empty frame".to_string()))?;
    let body = chars.as_str();
    match kind {
      '0' => Ok(EnginePacket::Open(serde_json::from_str(body).map_err(|e| AppError::Packet(format!("bad handshake: {}", e)))?)),
      '1' => Ok(EnginePacket::Close),
      '2' => Ok(EnginePacket::Ping(body.to_string())),
      '3' => Ok(EnginePacket::Pong(body.to_string())),
      '4' => Ok(EnginePacket::Message(body.to_string())),
      '5' => Ok(EnginePacket::Upgrade),
      '6' => Ok(EnginePacket::Noop),
      other => Err(AppError::Packet(format!("unknown engine packet type {:?}", other))),
    }
  }

  /// Client-side frames only; the handshake is never sent by us.
  pub fn encode(&self) -> String {
    match self {
      EnginePacket::Open(_) => "0".to_string(),
      EnginePacket::Close => "1".to_string(),
      EnginePacket::Ping(data) => format!("2{}", data),
      EnginePacket::Pong(data) => format!("3{}", data),
      EnginePacket::Message(data) => format!("4{}", data),
      EnginePacket::Upgrade => "5".to_string(),
      EnginePacket::Noop => "6".to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
  Connect { namespace: String, data: Option<Value> },
  Disconnect { namespace: String },
  Event { namespace: String, id: Option<u64>, name: String, args: Vec<Value> },
  Ack { namespace: String, id: u64, args: Vec<Value> },
  ConnectError { namespace: String, data: Option<Value> },
}

impl SocketPacket {
  pub fn decode(payload: &str) -> Result<Self, AppError> {
    let mut chars = payload.chars();
    let kind = chars.next().ok_or_else(|| AppError::Packet("empty socket packet".to_string()))?;
    let mut rest = chars.as_str();

    if kind == '5' || kind == '6' {
      return Err(AppError::Packet("binary packets are not supported".to_string()));
    }

    let namespace = if rest.starts_with('/') {
      let (ns, tail) = rest.split_once(',').unwrap_or((rest, ""));
      rest = tail;
      ns.to_string()
    } else {
      DEFAULT_NAMESPACE.to_string()
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    let id = if digits > 0 {
      let parsed = rest[..digits].parse::<u64>().map_err(|e| AppError::Packet(format!("bad ack id: {}", e)))?;
      rest = &rest[digits..];
      Some(parsed)
    } else {
      None
    };

    let data = if rest.is_empty() {
      None
    } else {
      Some(serde_json::from_str::<Value>(rest).map_err(|e| AppError::Packet(format!("bad packet data: {}", e)))?)
    };

    match kind {
      '0' => Ok(SocketPacket::Connect { namespace, data }),
      '1' => Ok(SocketPacket::Disconnect { namespace }),
      '2' => {
        let mut args = match data {
          Some(Value::Array(items)) => items,
          _ => return Err(AppError::Packet("event without an argument array".to_string())),
        };
        if args.is_empty() {
          return Err(AppError::Packet("event without a name".to_string()));
        }
        let name = match args.remove(0) {
          Value::String(name) => name,
          other => return Err(AppError::Packet(format!("event name is not a string: {}", other))),
        };
        Ok(SocketPacket::Event { namespace, id, name, args })
      }
      '3' => {
        let id = id.ok_or_else(|| AppError::Packet("ack without id".to_string()))?;
        let args = match data {
          Some(Value::Array(items)) => items,
          _ => vec![],
        };
        Ok(SocketPacket::Ack { namespace, id, args })
      }
      '4' => Ok(SocketPacket::ConnectError { namespace, data }),
      other => Err(AppError::Packet(format!("unknown socket packet type {:?}", other))),
    }
  }

  pub fn encode(&self) -> String {
    fn prefix(kind: char, namespace: &str) -> String {
      if namespace == DEFAULT_NAMESPACE {
        kind.to_string()
      } else {
        format!("{}{},", kind, namespace)
      }
    }
    match self {
      SocketPacket::Connect { namespace, data } => {
        let mut out = prefix('0', namespace);
        if let Some(data) = data {
          out.push_str(&data.to_string());
        }
        out
      }
      SocketPacket::Disconnect { namespace } => prefix('1', namespace),
      SocketPacket::Event { namespace, id, name, args } => {
        let mut out = prefix('2', namespace);
        if let Some(id) = id {
          out.push_str(&id.to_string());
        }
        let mut items = vec![Value::String(name.clone())];
        items.extend(args.iter().cloned());
        out.push_str(&Value::Array(items).to_string());
        out
      }
      SocketPacket::Ack { namespace, id, args } => {
        format!("{}{}{}", prefix('3', namespace), id, Value::Array(args.clone()))
      }
      SocketPacket::ConnectError { namespace, data } => {
        let mut out = prefix('4', namespace);
        if let Some(data) = data {
          out.push_str(&data.to_string());
        }
        out
      }
    }
  }

  fn namespace(&self) -> &str {
    match self {
      SocketPacket::Connect { namespace, .. }
      | SocketPacket::Disconnect { namespace }
      | SocketPacket::Event { namespace, .. }
      | SocketPacket::Ack { namespace, .. }
      | SocketPacket::ConnectError { namespace, .. } => namespace,
    }
  }
}

/// What one incoming frame produced.
#[derive(Debug, Default, PartialEq)]
pub struct Step {
  /// Frames to write back, in order.
  pub replies: Vec<String>,
  pub event: Option<ChannelEvent>,
  /// The server ended the session.
  pub closed: bool,
}

/// Client half of a Socket.IO session on one namespace.
#[derive(Debug)]
pub struct ChannelSession {
  namespace: String,
  handshake: Option<Handshake>,
  connected: bool,
}

impl Default for ChannelSession {
  fn default() -> Self {
    Self::new(DEFAULT_NAMESPACE)
  }
}

impl ChannelSession {
  pub fn new(namespace: &str) -> Self {
    Self { namespace: namespace.to_string(), handshake: None, connected: false }
  }

  pub fn is_connected(&self) -> bool {
    self.connected
  }

  pub fn handshake(&self) -> Option<&Handshake> {
    self.handshake.as_ref()
  }

  /// Frame to send when leaving voluntarily.
  pub fn goodbye(&self) -> String {
    EnginePacket::Message(SocketPacket::Disconnect { namespace: self.namespace.clone() }.encode()).encode()
  }

  pub fn receive(&mut self, frame: &str) -> Result<Step, AppError> {
    let mut step = Step::default();
    match EnginePacket::decode(frame)? {
      EnginePacket::Open(handshake) => {
        debug!("engine.io session {} open", handshake.sid);
        self.handshake = Some(handshake);
        let connect = SocketPacket::Connect { namespace: self.namespace.clone(), data: None };
        step.replies.push(EnginePacket::Message(connect.encode()).encode());
      }
      EnginePacket::Ping(data) => step.replies.push(EnginePacket::Pong(data).encode()),
      EnginePacket::Close => {
        step.closed = true;
        if std::mem::take(&mut self.connected) {
          step.event = Some(ChannelEvent::Disconnect);
        }
      }
      EnginePacket::Message(payload) => self.on_socket_packet(SocketPacket::decode(&payload)?, &mut step)?,
      EnginePacket::Pong(_) | EnginePacket::Upgrade | EnginePacket::Noop => {}
    }
    Ok(step)
  }

  /// Like [`receive`](Self::receive), but a frame that cannot be decoded is
  /// logged and skipped. Only a refused namespace ends the session.
  pub fn accept(&mut self, frame: &str) -> Result<Step, AppError> {
    match self.receive(frame) {
      Err(AppError::Packet(e)) => {
        warn!("skipping undecodable frame: {}", e);
        Ok(Step::default())
      }
      other => other,
    }
  }

  fn on_socket_packet(&mut self, packet: SocketPacket, step: &mut Step) -> Result<(), AppError> {
    if packet.namespace() != self.namespace {
      debug!("ignoring packet for namespace {}", packet.namespace());
      return Ok(());
    }
    match packet {
      SocketPacket::Connect { .. } => {
        self.connected = true;
        step.event = Some(ChannelEvent::Connect);
      }
      SocketPacket::Disconnect { .. } => {
        self.connected = false;
        step.closed = true;
        step.event = Some(ChannelEvent::Disconnect);
      }
      SocketPacket::Event { namespace, id, name, args } => {
        if let Some(id) = id {
          step.replies.push(EnginePacket::Message(SocketPacket::Ack { namespace, id, args: vec![] }.encode()).encode());
        }
        let data = args.into_iter().next().unwrap_or(Value::Null);
        step.event = Some(ChannelEvent::from_parts(&name, data));
      }
      SocketPacket::Ack { id, .. } => debug!("unexpected ack {}", id),
      SocketPacket::ConnectError { data, .. } => {
        warn!("server refused namespace {}: {:?}", self.namespace, data);
        return Err(AppError::WsConnection(format!(
          "namespace {} refused: {}",
          self.namespace,
          data.map(|d| d.to_string()).unwrap_or_default()
        )));
      }
    }
    Ok(())
  }
}
