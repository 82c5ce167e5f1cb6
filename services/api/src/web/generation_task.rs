//! services/api/src/web/generation_task.rs
//!
//! This module contains the asynchronous "worker" function responsible for
//! running one accepted submission through the generator.

use crate::{
    error::ApiError,
    web::{
        protocol::ServerMessage,
        state::{AppState, SessionState},
        ws_handler::{send_message, Outbox},
    },
};
use scriptforge_core::{ScriptRequest, ViewState};
use std::{sync::Arc, time::Instant};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Runs the generator for a submission the session has already accepted,
/// records the outcome on the form, and reports it to the client.
///
/// The session lock is not held while the generator waits on the external service.
pub async fn generation_process(
    app_state: Arc<AppState>,
    session_state_lock: Arc<Mutex<SessionState>>,
    outbox: Outbox,
    request: ScriptRequest,
) -> Result<(), ApiError> {
    let start_time = Instant::now();
    info!(platform = %request.platform, tone = %request.tone, duration = %request.duration, "Generation process started.");

    let outcome = app_state.generator.generate(&request).await;
    info!("⏱️ Generation took: {:?}", start_time.elapsed());

    let reply = {
        let mut session = session_state_lock.lock().await;
        session.form.finish_submission(outcome);
        match session.form.view() {
            ViewState::Ready(script) => ServerMessage::ScriptReady {
                script: script.clone(),
            },
            ViewState::Failed(message) => ServerMessage::Error {
                message: message.clone(),
            },
            other => {
                warn!("Form in unexpected state after generation: {:?}", other);
                return Ok(());
            }
        }
    };

    send_message(&outbox, reply)
}
