use std::time::Duration;

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::MessageCreate;
use crate::state::AppState;
use crate::ws::{ClientFrame, ClientHandle, ServerFrame, WsSession};

/// Grace period for flushing queued frames when a session ends
const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// WebSocket routes
pub fn ws_routes() -> Router<AppState> {
    Router::new().route("/ws/{chat_room_id}", get(ws_upgrade))
}

/// WebSocket upgrade handler. Unknown rooms are rejected before the
/// upgrade completes.
async fn ws_upgrade(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(chat_room_id): Path<i64>,
) -> Result<Response> {
    state
        .chats
        .find_room(chat_room_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Chat room not found".to_string()))?;

    tracing::info!(chat_room_id, "WebSocket upgrade request");

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, chat_room_id)))
}

/// What the session loop should do after a frame has been handled
enum FrameOutcome {
    Continue,
    Close,
}

/// Handle one WebSocket connection from upgrade to cleanup.
///
/// The connection task owns the session; a writer task drains the send
/// queue onto the socket. The connection subscribes to its room's
/// channel as soon as it lands here; authentication only gates sending.
/// Every exit path falls through to the cleanup tail, so the registry
/// never keeps a handle to a finished connection.
async fn handle_socket(socket: WebSocket, state: AppState, chat_room_id: i64) {
    let conn_id = Uuid::new_v4();
    tracing::info!(conn_id = %conn_id, chat_room_id, "WebSocket connected");

    let (tx, mut rx) = mpsc::channel::<ServerFrame>(state.config.send_queue_capacity);
    let mut session = WsSession::new(conn_id, chat_room_id);

    state
        .registry
        .join(chat_room_id, ClientHandle::new(conn_id, tx.clone()));

    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Writer task: drains queued frames onto the socket, then closes it
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&frame) {
                if ws_sender.send(WsMessage::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
        let _ = ws_sender.send(WsMessage::Close(None)).await;
    });

    // Frames are handled one at a time: a submission accepted here is
    // fully stored and broadcast before the next frame or a disconnect
    // is observed.
    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(WsMessage::Text(text)) => {
                match handle_frame(&text, &mut session, &tx, &state).await {
                    FrameOutcome::Continue => {}
                    FrameOutcome::Close => break,
                }
            }
            Ok(WsMessage::Ping(_)) => {
                tracing::trace!(conn_id = %conn_id, "Ping received");
            }
            Ok(WsMessage::Close(_)) => {
                tracing::info!(conn_id = %conn_id, "WebSocket close received");
                break;
            }
            Err(e) => {
                tracing::warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    // Cleanup on disconnect
    tracing::info!(
        conn_id = %conn_id,
        chat_room_id,
        user_id = session.user().map(|u| u.id).unwrap_or_default(),
        "WebSocket disconnected, cleaning up"
    );

    state.registry.leave(chat_room_id, conn_id);

    // Let the writer flush anything still queued, then stop it
    drop(tx);
    if tokio::time::timeout(FLUSH_TIMEOUT, &mut send_task).await.is_err() {
        send_task.abort();
    }
}

/// Dispatch one parsed frame according to the session state
async fn handle_frame(
    text: &str,
    session: &mut WsSession,
    tx: &mpsc::Sender<ServerFrame>,
    state: &AppState,
) -> FrameOutcome {
    let frame: ClientFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::debug!(conn_id = %session.conn_id, error = %e, "Unparseable frame");
            queue_error(tx, 400, "Invalid frame").await;
            return FrameOutcome::Continue;
        }
    };

    match frame {
        ClientFrame::Auth { token } => handle_auth(&token, session, tx, state).await,
        ClientFrame::Message { message } => handle_submission(message, session, tx, state).await,
    }
}

/// Handle an auth frame: validate the token and bind the resolved user
/// to the session. Failures leave the session state unchanged; a later
/// auth frame may still succeed.
async fn handle_auth(
    token: &str,
    session: &mut WsSession,
    tx: &mpsc::Sender<ServerFrame>,
    state: &AppState,
) -> FrameOutcome {
    let user = match state.authenticate(token).await {
        Ok(user) => user,
        Err(e) => {
            tracing::debug!(conn_id = %session.conn_id, error = %e, "Auth frame rejected");
            queue_error(tx, e.status_code().as_u16(), e.message()).await;
            return FrameOutcome::Continue;
        }
    };

    tracing::info!(
        conn_id = %session.conn_id,
        chat_room_id = session.chat_room_id,
        user_id = user.id,
        "Session authenticated"
    );
    session.authenticate(user);

    FrameOutcome::Continue
}

/// Handle a message submission. A submission on a session that never
/// authenticated is answered with an error and then closes the
/// connection.
async fn handle_submission(
    submission: MessageCreate,
    session: &mut WsSession,
    tx: &mpsc::Sender<ServerFrame>,
    state: &AppState,
) -> FrameOutcome {
    let Some(user) = session.user() else {
        queue_error(tx, 401, "Authentication required").await;
        return FrameOutcome::Close;
    };

    if submission.chat_room_id != session.chat_room_id {
        queue_error(tx, 400, "Message chat_room_id does not match this connection").await;
        return FrameOutcome::Continue;
    }

    // The sender receives its own message back through the broadcast
    if let Err(e) = state
        .submit_message(user, submission.chat_room_id, &submission.content)
        .await
    {
        tracing::warn!(
            conn_id = %session.conn_id,
            chat_room_id = session.chat_room_id,
            error = %e,
            "Message submission failed"
        );
        queue_error(tx, e.status_code().as_u16(), e.message()).await;
    }

    FrameOutcome::Continue
}

/// Queue an error frame onto this connection's own send queue
async fn queue_error(tx: &mpsc::Sender<ServerFrame>, code: u16, message: &str) {
    let _ = tx.send(ServerFrame::error(code, message)).await;
}
