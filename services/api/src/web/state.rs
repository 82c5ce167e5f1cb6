//! services/api/src/web/state.rs
//!
//! Defines the application's shared and session-specific states.

use scriptforge_core::{ScriptForm, ScriptGenerator};
use tokio_util::sync::CancellationToken;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub generator: ScriptGenerator,
}

//=========================================================================================
// SessionState (Specific to One WebSocket Connection)
//=========================================================================================

/// The state for a single, active WebSocket connection: the user's form and
/// whatever the result panel currently shows.
pub struct SessionState {
    pub form: ScriptForm,
    /// Cancels the pending "copied" indicator reset when the user copies again.
    pub copy_reset_token: CancellationToken,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            form: ScriptForm::new(),
            copy_reset_token: CancellationToken::new(),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
