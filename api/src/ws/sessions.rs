//! Live attendance feed for one session.
//!
//! On connect the client gets an `attendance.snapshot` of the session's
//! records, then one `attendance.marked` frame per accepted check-in. A
//! client that falls behind the broadcast buffer gets a fresh
//! `attendance.resync` snapshot in place of the frames it missed.
//!
//! The subscription is taken before the snapshot is read, so an event may
//! repeat a record already in the snapshot. Clients dedupe on record `id`.

use std::time::Duration;

use axum::{
    Extension,
    body::Bytes,
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use serde::Serialize;
use services::AttendanceMarked;
use tokio::sync::broadcast::{Receiver, error::RecvError};

use super::envelope::{frame, is_app_ping, session_topic};
use crate::auth::AuthUser;
use crate::response::ApiError;
use crate::routes::common::RecordResponse;
use crate::state::AppState;

const PING_INTERVAL: Duration = Duration::from_secs(30);

pub const SNAPSHOT: &str = "attendance.snapshot";
pub const RESYNC: &str = "attendance.resync";

#[derive(Debug, Serialize)]
struct Snapshot {
    session_id: i64,
    count: usize,
    records: Vec<RecordResponse>,
}

type Sink = SplitSink<WebSocket, Message>;

/// GET /ws/sessions/{session_id}
///
/// Ownership is checked before the upgrade, so strangers get a plain HTTP
/// error instead of a socket.
pub async fn session_feed_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(session_id): Path<i64>,
) -> Result<Response, ApiError> {
    let session = state.sessions.get_session(&user.identity(), session_id).await?;
    let rx = state.feed().subscribe(session.id).await;

    Ok(ws.on_upgrade(move |socket| serve_session_feed(socket, state, session.id, rx)))
}

async fn serve_session_feed(
    socket: WebSocket,
    state: AppState,
    session_id: i64,
    mut rx: Receiver<AttendanceMarked>,
) {
    let topic = session_topic(session_id);
    let (mut sink, mut stream) = socket.split();

    if send_snapshot(&mut sink, &state, session_id, &topic, SNAPSHOT).await.is_ok() {
        pump_events(&mut sink, &mut stream, &mut rx, &state, session_id, &topic).await;
    }

    state.feed().release(&session_id, rx).await;
    tracing::info!(session_id, "attendance feed closed");
}

/// Forwards feed events until either side goes away.
async fn pump_events(
    sink: &mut Sink,
    stream: &mut SplitStream<WebSocket>,
    rx: &mut Receiver<AttendanceMarked>,
    state: &AppState,
    session_id: i64,
    topic: &str,
) {
    let mut ping = tokio::time::interval(PING_INTERVAL);
    ping.tick().await;

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(event) => {
                    let text = frame(AttendanceMarked::NAME, topic, &event);
                    if sink.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(session_id, skipped, "feed subscriber lagged; resyncing");
                    if send_snapshot(sink, state, session_id, topic, RESYNC).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Closed) => break,
            },
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Text(text))) if is_app_ping(text.as_str()) => {
                    let pong = frame("pong", topic, &serde_json::json!({}));
                    if sink.send(Message::Text(pong.into())).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
            _ = ping.tick() => {
                if sink.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
        }
    }
}

/// Sends the session's current records as a `event` frame.
///
/// A storage failure is reported to the client as an `error` frame and
/// closes the feed.
async fn send_snapshot(
    sink: &mut Sink,
    state: &AppState,
    session_id: i64,
    topic: &str,
    event: &str,
) -> Result<(), ()> {
    let text = match state.ledger.list_for_session(session_id).await {
        Ok(records) => {
            let snapshot = Snapshot {
                session_id,
                count: records.len(),
                records: records.into_iter().map(RecordResponse::from).collect(),
            };
            frame(event, topic, &snapshot)
        }
        Err(e) => {
            tracing::error!(session_id, error = %e, "could not load attendance snapshot");
            let text = frame(
                "error",
                topic,
                &serde_json::json!({ "message": "Service temporarily unavailable, please retry" }),
            );
            let _ = sink.send(Message::Text(text.into())).await;
            return Err(());
        }
    };

    sink.send(Message::Text(text.into())).await.map_err(|_| ())
}
