/*!
WebSocket server.

One shared [`Desktop`] is served to every connected front end. Each client
subscribes to the desktop on connect and receives `sync:init` with the full
snapshot; after that it gets every event as JSON text, and its requests are
answered with `{ id, result }` or `{ id, error }`. Events caused by a request
are sent before its reply.
*/

use std::sync::Arc;

use async_broadcast::{Receiver, RecvError, TryRecvError};
use axum::{
  extract::{
    ws::{Message, WebSocket, WebSocketUpgrade},
    State,
  },
  response::Response,
  routing::get,
  Router,
};
use deskshell::{Desktop, Event, Launcher};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

/// Default WebSocket server port.
pub const DEFAULT_WS_PORT: u16 = 3030;

/// Shared server state.
#[derive(Clone)]
pub struct WebSocketState {
  desktop: Desktop,
  launcher: Arc<Launcher>,
  port: u16,
}

impl std::fmt::Debug for WebSocketState {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("WebSocketState")
      .field("port", &self.port)
      .field("launcher", &self.launcher)
      .finish_non_exhaustive()
  }
}

impl WebSocketState {
  /// Serve `desktop` on the default port.
  pub fn new(desktop: Desktop, launcher: Launcher) -> Self {
    Self::with_port(desktop, launcher, DEFAULT_WS_PORT)
  }

  /// Serve `desktop` on `port`.
  pub fn with_port(desktop: Desktop, launcher: Launcher, port: u16) -> Self {
    Self {
      desktop,
      launcher: Arc::new(launcher),
      port,
    }
  }
}

/// Bind to `127.0.0.1:<port>` and serve `/ws` until the listener fails.
pub async fn start_server(state: WebSocketState) -> std::io::Result<()> {
  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods(Any)
    .allow_headers(Any);

  let addr = format!("127.0.0.1:{}", state.port);
  let app = Router::new()
    .route("/ws", get(upgrade))
    .layer(cors)
    .with_state(state);

  let listener = tokio::net::TcpListener::bind(&addr)
    .await
    .inspect_err(|e| log::error!("Failed to bind WebSocket server to {addr}: {e}"))?;
  log::info!("WebSocket server: ws://{addr}/ws");
  axum::serve(listener, app).await
}

async fn upgrade(ws: WebSocketUpgrade, State(state): State<WebSocketState>) -> Response {
  ws.on_upgrade(|socket| Connection::new(socket, state).run())
}

/// Request envelope. Missing fields fall through to dispatch errors.
#[derive(Debug, Deserialize)]
struct Envelope {
  #[serde(default)]
  id: Value,
  #[serde(default)]
  method: String,
  #[serde(default)]
  args: Value,
}

struct Connection {
  socket: WebSocket,
  events: Receiver<Event>,
  state: WebSocketState,
}

impl Connection {
  fn new(socket: WebSocket, state: WebSocketState) -> Self {
    Self {
      socket,
      events: state.desktop.subscribe(),
      state,
    }
  }

  async fn send(&mut self, text: String) -> bool {
    self.socket.send(Message::Text(text)).await.is_ok()
  }

  async fn run(mut self) {
    let Some(init) = encode(&Event::SyncInit(self.state.desktop.snapshot())) else {
      return;
    };
    if !self.send(init).await {
      return;
    }
    log::debug!("[ws] client connected");

    loop {
      tokio::select! {
        msg = self.socket.recv() => match msg {
          Some(Ok(Message::Text(text))) => {
            for frame in answer(&self.state, &mut self.events, &text).await {
              if !self.send(frame).await {
                return;
              }
            }
          }
          Some(Ok(Message::Close(_))) | None => break,
          Some(Err(e)) => {
            log::warn!("[ws] socket error: {e}");
            break;
          }
          Some(Ok(_)) => {}
        },

        event = self.events.recv() => match event {
          Ok(event) => {
            if let Some(json) = encode(&event) {
              if !self.send(json).await {
                break;
              }
            }
          }
          Err(RecvError::Overflowed(n)) => {
            log::warn!("[ws] client lagged, dropped {n} events; it should request a snapshot");
          }
          Err(RecvError::Closed) => break,
        },
      }
    }
    log::debug!("[ws] client disconnected");
  }
}

fn encode(event: &Event) -> Option<String> {
  serde_json::to_string(event)
    .inspect_err(|e| log::error!("[ws] failed to serialize event: {e}"))
    .ok()
}

/// Frames for one request: every event it caused, then its reply.
///
/// Dispatch finishes before the receiver is drained, and the registry emits
/// under its write lock, so no event of this request can trail the reply.
async fn answer(state: &WebSocketState, events: &mut Receiver<Event>, text: &str) -> Vec<String> {
  let reply = reply(state, text).await;
  let mut frames = queued(events);
  frames.push(reply);
  frames
}

/// Everything already waiting on `events`, serialized.
fn queued(events: &mut Receiver<Event>) -> Vec<String> {
  let mut frames = Vec::new();
  loop {
    match events.try_recv() {
      Ok(event) => frames.extend(encode(&event)),
      Err(TryRecvError::Overflowed(n)) => {
        log::warn!("[ws] client lagged, dropped {n} events; it should request a snapshot");
      }
      Err(TryRecvError::Empty | TryRecvError::Closed) => return frames,
    }
  }
}

async fn reply(state: &WebSocketState, text: &str) -> String {
  let envelope: Envelope = match serde_json::from_str(text) {
    Ok(envelope) => envelope,
    Err(e) => return json!({ "error": format!("Invalid JSON: {e}") }).to_string(),
  };
  let Envelope { id, method, args } = envelope;

  // Content factories may block; keep them off the async workers.
  let desktop = state.desktop.clone();
  let launcher = Arc::clone(&state.launcher);
  let mut response = tokio::task::spawn_blocking(move || {
    crate::rpc::dispatch_json(&desktop, &launcher, &method, &args)
  })
  .await
  .unwrap_or_else(|_| json!({ "error": "RPC task panicked" }));

  if let Some(obj) = response.as_object_mut() {
    obj.insert("id".to_owned(), id);
  }
  response.to_string()
}
