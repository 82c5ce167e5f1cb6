//! crates/scriptforge_core/src/generator.rs
//!
//! Turns a `ScriptRequest` into a validated `ScriptResponse` through one call
//! to the injected `ScriptGenerationService`.

use crate::domain::{ScriptRequest, ScriptResponse};
use crate::ports::{PortError, ScriptGenerationService};
use crate::prompt::{build_prompt, script_schema};
use std::sync::Arc;
use tracing::{debug, error, warn};

//=========================================================================================
// Generation Errors
//=========================================================================================

/// Coarse classification of a `GenerationError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationErrorKind {
    ServiceFailure,
    MalformedResponse,
}

/// Why a generation attempt produced no script. Both variants are terminal for
/// the attempt; the caller re-invokes to try again.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The external call could not be completed (network, auth, quota, bad request).
    #[error("Generation service failed: {0}")]
    ServiceFailure(#[source] PortError),

    /// The call completed but its text is not a script-shaped JSON object.
    #[error("Malformed script response: {reason}")]
    MalformedResponse { reason: String },
}

impl GenerationError {
    pub fn kind(&self) -> GenerationErrorKind {
        match self {
            GenerationError::ServiceFailure(_) => GenerationErrorKind::ServiceFailure,
            GenerationError::MalformedResponse { .. } => GenerationErrorKind::MalformedResponse,
        }
    }
}

//=========================================================================================
// The Generator
//=========================================================================================

/// Stateless script generator. Safe to share across tasks; concurrent calls
/// are independent of one another.
#[derive(Clone)]
pub struct ScriptGenerator {
    service: Arc<dyn ScriptGenerationService>,
}

impl ScriptGenerator {
    /// Creates a generator backed by an already-configured service.
    pub fn new(service: Arc<dyn ScriptGenerationService>) -> Self {
        Self { service }
    }

    /// Builds the prompt, calls the service once, and validates the answer.
    pub async fn generate(&self, request: &ScriptRequest) -> Result<ScriptResponse, GenerationError> {
        let prompt = build_prompt(request);
        let schema = script_schema();
        debug!(
            platform = %request.platform,
            duration = %request.duration,
            prompt_chars = prompt.chars().count(),
            "Requesting script generation"
        );

        let raw = self
            .service
            .generate_structured(&prompt, &schema)
            .await
            .map_err(|e| {
                error!("Script generation service failed: {}", e);
                GenerationError::ServiceFailure(e)
            })?;

        parse_script(&raw).inspect_err(|e| warn!("Discarding generated script: {}", e))
    }
}

//=========================================================================================
// Response Validation
//=========================================================================================

/// Parses the service's text as a script.
///
/// All four fields must be present, `body` must be a list of strings, and it
/// must hold at least one beat. Hook length and beat count are not checked.
pub fn parse_script(raw: &str) -> Result<ScriptResponse, GenerationError> {
    let json = strip_code_fence(raw.trim());

    let script: ScriptResponse =
        serde_json::from_str(json).map_err(|e| GenerationError::MalformedResponse {
            reason: e.to_string(),
        })?;

    if script.body.is_empty() {
        return Err(GenerationError::MalformedResponse {
            reason: "body contains no beats".to_string(),
        });
    }

    Ok(script)
}

// Some models wrap JSON in a ```json fence even when a schema is declared.
fn strip_code_fence(text: &str) -> &str {
    text.strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(text)
}
