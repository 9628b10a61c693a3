//! WebSocket transport for provider and subscriber peers.
//!
//! Each connection gets an outbound mpsc channel feeding a writer task;
//! the registry hands clones of the sender to whoever needs to reach the
//! peer. When a registration is superseded the old sender is dropped,
//! the writer task drains and closes the socket, and the read loop ends
//! with an identity-guarded unregister that cannot evict the newer
//! connection.

#![allow(clippy::needless_pass_by_value)] // axum extractors take ownership

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::protocol::{ClientFrame, ServerFrame};
use crate::models::role::Role;
use crate::relay::registry::Outbound;
use crate::relay::AppState;

/// Outbound queue depth per connection. Pings and pushes are best effort,
/// so a full queue drops rather than blocks.
const OUTBOUND_BUFFER: usize = 32;

/// Handler for `GET /ws` — upgrade and hand off to the connection loop.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let conn_id = Uuid::new_v4();
    debug!(%conn_id, "websocket connection opened");

    let (outbound_tx, outbound_rx) = mpsc::channel::<Outbound>(OUTBOUND_BUFFER);
    let (sink, mut stream) = socket.split();
    let writer = tokio::spawn(write_outbound(sink, outbound_rx));

    while let Some(message) = stream.next().await {
        let message = match message {
            Ok(message) => message,
            Err(err) => {
                debug!(%conn_id, %err, "websocket read error");
                break;
            }
        };
        match message {
            Message::Text(text) => handle_frame(&state, conn_id, &outbound_tx, text.as_str()).await,
            Message::Pong(_) => state.registry.record_pong(conn_id),
            Message::Close(_) => break,
            // Client-initiated pings are answered by axum automatically.
            Message::Ping(_) | Message::Binary(_) => {}
        }
    }

    if state.registry.unregister(conn_id).is_none() {
        debug!(%conn_id, "connection closed without active registration");
    }
    writer.abort();
}

/// Writer task: serialize outbound messages onto the socket until the
/// channel closes (peer superseded or server shutdown), then close the
/// socket so the read loop unblocks.
async fn write_outbound(
    mut sink: SplitSink<WebSocket, Message>,
    mut outbound_rx: mpsc::Receiver<Outbound>,
) {
    while let Some(outbound) = outbound_rx.recv().await {
        let message = match outbound {
            Outbound::Frame(frame) => match serde_json::to_string(&frame) {
                Ok(json) => Message::Text(json.into()),
                Err(err) => {
                    warn!(%err, "failed to serialize outbound frame");
                    continue;
                }
            },
            Outbound::Ping => Message::Ping(Bytes::new()),
        };
        if sink.send(message).await.is_err() {
            break;
        }
    }
    let _ = sink.close().await;
}

async fn handle_frame(
    state: &AppState,
    conn_id: Uuid,
    outbound_tx: &mpsc::Sender<Outbound>,
    raw: &str,
) {
    let frame: ClientFrame = match serde_json::from_str(raw) {
        Ok(frame) => frame,
        Err(err) => {
            debug!(%conn_id, %err, "discarding unparseable frame");
            return;
        }
    };

    match frame {
        ClientFrame::Register { role } => match role.parse::<Role>() {
            Ok(role) => {
                state.registry.register(role, conn_id, outbound_tx.clone());
                let ack = registration_ack(state, role);
                if outbound_tx.send(Outbound::Frame(ack)).await.is_err() {
                    debug!(%conn_id, %role, "registration ack not delivered");
                }
            }
            Err(err) => warn!(%conn_id, %err, "registration rejected"),
        },
        ClientFrame::CaptureResult { payload } => state.capture.deliver_result(payload),
    }
}

/// Build the registration acknowledgement for a granted role.
///
/// Subscribers receive a snapshot of the current answer so a
/// reconnecting client can reconcile a push it missed while away.
fn registration_ack(state: &AppState, role: Role) -> ServerFrame {
    match role {
        Role::Provider => ServerFrame::Registered {
            role,
            answer: None,
            version: None,
        },
        Role::Subscriber => {
            let snapshot = state.answers.current();
            ServerFrame::Registered {
                role,
                answer: snapshot.value,
                version: Some(snapshot.version),
            }
        }
    }
}
