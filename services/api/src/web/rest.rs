//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use scriptforge_core::{
    validate_request, Platform, ScriptDuration, ScriptForm, ScriptRequest, ScriptResponse, Tone,
    GENERATION_FAILED_MESSAGE, MAX_TOPIC_CHARS,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        generate_script_handler,
        list_options_handler,
    ),
    components(
        schemas(GenerateScriptPayload, GenerateScriptResponse, GeneratedScript, ScriptOptionsResponse)
    ),
    tags(
        (name = "ScriptForge API", description = "Turns a topic into a short-form video script.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The parameters a script is generated from.
#[derive(Deserialize, Serialize, ToSchema, Debug, Clone)]
pub struct GenerateScriptPayload {
    /// What the video is about (1-300 characters).
    #[schema(example = "how to wake up early")]
    pub topic: String,
    /// One of `TikTok`, `Reels`, `Shorts`, `Twitter/X`.
    #[schema(example = "TikTok")]
    pub platform: String,
    /// One of `Emotional`, `Informational`, `Aggressive`, `Motivational`, `Storytelling`.
    #[schema(example = "Motivational")]
    pub tone: String,
    /// One of `15 seconds`, `30 seconds`, `60 seconds`.
    #[schema(example = "30 seconds")]
    pub duration: String,
}

impl From<GenerateScriptPayload> for ScriptRequest {
    fn from(payload: GenerateScriptPayload) -> Self {
        ScriptRequest {
            topic: payload.topic,
            platform: payload.platform,
            tone: payload.tone,
            duration: payload.duration,
        }
    }
}

/// A generated script.
#[derive(Serialize, ToSchema, Debug, Clone, PartialEq, Eq)]
pub struct GeneratedScript {
    pub hook: String,
    pub body: Vec<String>,
    pub payoff: String,
    pub cta: String,
}

impl From<ScriptResponse> for GeneratedScript {
    fn from(script: ScriptResponse) -> Self {
        GeneratedScript {
            hook: script.hook,
            body: script.body,
            payoff: script.payoff,
            cta: script.cta,
        }
    }
}

/// The response payload sent after a script was generated.
#[derive(Serialize, ToSchema, Debug)]
pub struct GenerateScriptResponse {
    pub script: GeneratedScript,
    /// The script in the plain-text layout used for the clipboard.
    pub clipboard_text: String,
    pub generated_at: DateTime<Utc>,
}

/// The closed sets of values the form accepts, plus its defaults.
#[derive(Serialize, ToSchema, Debug)]
pub struct ScriptOptionsResponse {
    pub platforms: Vec<String>,
    pub tones: Vec<String>,
    pub durations: Vec<String>,
    pub max_topic_chars: usize,
    pub defaults: GenerateScriptPayload,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Generate a script.
///
/// Validates the payload the same way the interactive form does, then makes a
/// single call to the generation service. Any generation failure is reported
/// with one fixed message.
#[utoipa::path(
    post,
    path = "/scripts",
    request_body = GenerateScriptPayload,
    responses(
        (status = 200, description = "Script generated successfully", body = GenerateScriptResponse),
        (status = 400, description = "Bad request (e.g., empty topic or unknown platform)"),
        (status = 502, description = "The generation service failed or returned a malformed script")
    )
)]
pub async fn generate_script_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<GenerateScriptPayload>,
) -> Result<(StatusCode, Json<GenerateScriptResponse>), (StatusCode, String)> {
    let request = ScriptRequest::from(payload);
    validate_request(&request).map_err(|rejection| {
        info!("Rejected script request: {}", rejection);
        (StatusCode::BAD_REQUEST, rejection.to_string())
    })?;

    match app_state.generator.generate(&request).await {
        Ok(script) => {
            let response = GenerateScriptResponse {
                clipboard_text: script.to_clipboard_text(),
                script: script.into(),
                generated_at: Utc::now(),
            };
            Ok((StatusCode::OK, Json(response)))
        }
        Err(e) => {
            error!("Failed to generate script: {:?}", e);
            Err((
                StatusCode::BAD_GATEWAY,
                GENERATION_FAILED_MESSAGE.to_string(),
            ))
        }
    }
}

/// List the accepted platforms, tones and durations.
#[utoipa::path(
    get,
    path = "/options",
    responses(
        (status = 200, description = "Accepted form values", body = ScriptOptionsResponse)
    )
)]
pub async fn list_options_handler() -> Json<ScriptOptionsResponse> {
    let defaults = ScriptForm::new().request().clone();
    Json(ScriptOptionsResponse {
        platforms: Platform::ALL.iter().map(|p| p.label().to_string()).collect(),
        tones: Tone::ALL.iter().map(|t| t.label().to_string()).collect(),
        durations: ScriptDuration::ALL.iter().map(|d| d.label().to_string()).collect(),
        max_topic_chars: MAX_TOPIC_CHARS,
        defaults: GenerateScriptPayload {
            topic: defaults.topic,
            platform: defaults.platform,
            tone: defaults.tone,
            duration: defaults.duration,
        },
    })
}
