//! services/api/src/web/ws_handler.rs
//!
//! This is the main entry point and control loop for a WebSocket connection.
//! Each connection owns one form; the loop applies client messages to it and
//! delegates generation to a spawned task. Everything sent back to the client
//! goes through an outbox channel drained by a single writer task.

use crate::{
    error::ApiError,
    web::{
        generation_task::generation_process,
        protocol::{ClientMessage, ServerMessage},
        state::{AppState, SessionState},
    },
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{
    stream::{SplitSink, StreamExt},
    SinkExt,
};
use scriptforge_core::{FormUpdate, COPIED_RESET_AFTER};
use std::sync::Arc;
use tokio::{
    sync::{
        mpsc::{self, UnboundedReceiver, UnboundedSender},
        Mutex,
    },
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

/// Queue of messages waiting to be written to the client.
pub type Outbox = UnboundedSender<ServerMessage>;

/// Queues a `ServerMessage` for the writer task.
pub fn send_message(outbox: &Outbox, message: ServerMessage) -> Result<(), ApiError> {
    outbox
        .send(message)
        .map_err(|_| ApiError::Internal("WebSocket writer has shut down".to_string()))
}

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn ws_handler(ws: WebSocketUpgrade, State(app_state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| {
        let connection_id = Uuid::new_v4();
        handle_socket(socket, app_state, connection_id)
            .instrument(tracing::info_span!("ws", %connection_id))
    })
}

/// Serializes queued messages and writes them as text frames until the
/// outbox closes or the socket fails.
async fn write_messages(
    mut sink: SplitSink<WebSocket, Message>,
    mut messages: UnboundedReceiver<ServerMessage>,
) -> Result<(), ApiError> {
    while let Some(message) = messages.recv().await {
        let json = serde_json::to_string(&message)?;
        sink.send(Message::Text(json.into())).await?;
    }
    Ok(())
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>, connection_id: Uuid) {
    info!("New WebSocket connection established.");

    let (sender, mut receiver) = socket.split();
    let (outbox, messages) = mpsc::unbounded_channel();
    let writer = tokio::spawn(
        async move {
            if let Err(e) = write_messages(sender, messages).await {
                error!("WebSocket writer stopped: {}", e);
            }
        }
        .in_current_span(),
    );
    let session_state_lock = Arc::new(Mutex::new(SessionState::new()));

    // --- 1. Initialization Phase ---
    let init_msg = {
        let session = session_state_lock.lock().await;
        ServerMessage::SessionInitialized {
            connection_id,
            form: session.form.request().clone(),
        }
    };
    if let Err(e) = send_message(&outbox, init_msg) {
        error!("Failed to send session initialized message: {}", e);
        writer.abort();
        return;
    }

    // --- 2. Main Message Loop ---
    let mut generation_task_handle: Option<JoinHandle<()>> = None;

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(text.as_str()) {
                Ok(client_msg) => {
                    handle_client_message(
                        client_msg,
                        &app_state,
                        &session_state_lock,
                        &outbox,
                        &mut generation_task_handle,
                    )
                    .await;
                }
                Err(e) => warn!("Failed to deserialize client message: {}", e),
            },
            Ok(Message::Close(_)) => {
                info!("Client sent close message.");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("WebSocket receive failed: {}", e);
                break;
            }
        }
    }

    // --- 3. Cleanup ---
    if let Some(handle) = generation_task_handle {
        handle.abort();
    }
    session_state_lock.lock().await.copy_reset_token.cancel();
    writer.abort();
    info!("WebSocket connection closed.");
}

/// Applies one `ClientMessage` to the session and queues the replies.
pub(crate) async fn handle_client_message(
    client_msg: ClientMessage,
    app_state: &Arc<AppState>,
    session_state_lock: &Arc<Mutex<SessionState>>,
    outbox: &Outbox,
    generation_task_handle: &mut Option<JoinHandle<()>>,
) {
    match client_msg {
        ClientMessage::UpdateForm(fields) => {
            let mut session = session_state_lock.lock().await;
            session.form.update(FormUpdate::from(fields));
        }
        ClientMessage::Generate(fields) => {
            let submission = {
                let mut session = session_state_lock.lock().await;
                session.form.update(FormUpdate::from(fields));
                session.form.begin_submission()
            };

            let request = match submission {
                Ok(request) => request,
                Err(rejection) => {
                    info!("Submission rejected: {}", rejection);
                    let reply = ServerMessage::SubmissionRejected {
                        reason: rejection.to_string(),
                    };
                    if let Err(e) = send_message(outbox, reply) {
                        error!("Failed to send SubmissionRejected message: {}", e);
                    }
                    return;
                }
            };

            if let Err(e) = send_message(outbox, ServerMessage::GenerationStarted) {
                error!("Failed to send GenerationStarted message: {}", e);
            }

            let task = {
                let app_state = app_state.clone();
                let session_state_lock = session_state_lock.clone();
                let outbox = outbox.clone();
                tokio::spawn(
                    async move {
                        if let Err(e) =
                            generation_process(app_state, session_state_lock, outbox, request).await
                        {
                            error!("Generation process failed: {}", e);
                        }
                    }
                    .in_current_span(),
                )
            };
            *generation_task_handle = Some(task);
        }
        ClientMessage::Copy => {
            let (text, token) = {
                let mut session = session_state_lock.lock().await;
                let Some(text) = session.form.copy_script() else {
                    warn!("Copy requested with no script to copy.");
                    return;
                };
                // A newer copy restarts the indicator timer.
                session.copy_reset_token.cancel();
                session.copy_reset_token = CancellationToken::new();
                (text, session.copy_reset_token.clone())
            };

            if let Err(e) = send_message(outbox, ServerMessage::Copied { text }) {
                error!("Failed to send Copied message: {}", e);
                return;
            }

            let session_state_lock = session_state_lock.clone();
            let outbox = outbox.clone();
            tokio::spawn(
                async move {
                    tokio::select! {
                        _ = token.cancelled() => {}
                        _ = tokio::time::sleep(COPIED_RESET_AFTER) => {
                            session_state_lock.lock().await.form.reset_copied();
                            if let Err(e) = send_message(&outbox, ServerMessage::CopyReset) {
                                warn!("Failed to send CopyReset message: {}", e);
                            }
                        }
                    }
                }
                .in_current_span(),
            );
        }
    }
}
