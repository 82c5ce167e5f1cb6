//! crates/scriptforge_core/src/shell.rs
//!
//! Form and result state for one user session. The shell decides whether a
//! submission may go to the generator and records the single outcome that is
//! shown afterwards; it never talks to the generator itself.

use crate::domain::{
    Platform, ScriptDuration, ScriptRequest, ScriptResponse, Tone, UnknownLabel, MAX_TOPIC_CHARS,
};
use crate::generator::GenerationError;
use std::time::Duration;
use tracing::{error, warn};

/// The only message a user ever sees for a failed generation.
pub const GENERATION_FAILED_MESSAGE: &str = "SYSTEM ERROR: GENERATION_FAILED_RETRY_LATER";

/// How long the "copied" indicator stays on.
pub const COPIED_RESET_AFTER: Duration = Duration::from_secs(2);

/// Why a submission was refused before reaching the generator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejection {
    #[error("Topic is empty")]
    EmptyTopic,
    #[error("Topic is longer than {} characters", MAX_TOPIC_CHARS)]
    TopicTooLong,
    #[error(transparent)]
    UnknownLabel(#[from] UnknownLabel),
    #[error("A generation is already in progress")]
    InFlight,
}

/// What the result panel currently shows. Exactly one of script or error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Placeholder,
    Loading,
    Ready(ScriptResponse),
    Failed(String),
}

/// The status indicator shown next to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellStatus {
    Ready,
    Processing,
    Error,
}

impl ShellStatus {
    pub fn label(self) -> &'static str {
        match self {
            ShellStatus::Ready => "System Ready",
            ShellStatus::Processing => "Processing...",
            ShellStatus::Error => "Error",
        }
    }
}

/// A partial update to the form; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormUpdate {
    pub topic: Option<String>,
    pub platform: Option<String>,
    pub tone: Option<String>,
    pub duration: Option<String>,
}

/// Checks a request against the form's rules: a non-blank topic of at most
/// `MAX_TOPIC_CHARS` characters and labels drawn from the closed enumerations.
pub fn validate_request(request: &ScriptRequest) -> Result<(), SubmitRejection> {
    if request.topic.trim().is_empty() {
        return Err(SubmitRejection::EmptyTopic);
    }
    if request.topic.chars().count() > MAX_TOPIC_CHARS {
        return Err(SubmitRejection::TopicTooLong);
    }
    request.platform.parse::<Platform>()?;
    request.tone.parse::<Tone>()?;
    request.duration.parse::<ScriptDuration>()?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct ScriptForm {
    request: ScriptRequest,
    view: ViewState,
    copied: bool,
}

impl Default for ScriptForm {
    fn default() -> Self {
        Self {
            request: ScriptRequest::new(
                "",
                Platform::TikTok,
                Tone::Informational,
                ScriptDuration::Seconds30,
            ),
            view: ViewState::Placeholder,
            copied: false,
        }
    }
}

impl ScriptForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) -> &ScriptRequest {
        &self.request
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn is_loading(&self) -> bool {
        self.view == ViewState::Loading
    }

    pub fn copied(&self) -> bool {
        self.copied
    }

    pub fn status(&self) -> ShellStatus {
        match self.view {
            ViewState::Loading => ShellStatus::Processing,
            ViewState::Failed(_) => ShellStatus::Error,
            _ => ShellStatus::Ready,
        }
    }

    pub fn update(&mut self, update: FormUpdate) {
        if let Some(topic) = update.topic {
            self.request.topic = topic;
        }
        if let Some(platform) = update.platform {
            self.request.platform = platform;
        }
        if let Some(tone) = update.tone {
            self.request.tone = tone;
        }
        if let Some(duration) = update.duration {
            self.request.duration = duration;
        }
    }

    /// Starts a submission and returns the request to hand to the generator.
    ///
    /// Refused while another submission is in flight. On success the previous
    /// script or error is cleared and the form is `Loading`.
    pub fn begin_submission(&mut self) -> Result<ScriptRequest, SubmitRejection> {
        if self.is_loading() {
            return Err(SubmitRejection::InFlight);
        }
        validate_request(&self.request)?;

        self.view = ViewState::Loading;
        self.copied = false;
        Ok(self.request.clone())
    }

    /// Records the outcome of the in-flight submission. Outcomes that arrive
    /// when nothing is in flight are dropped.
    pub fn finish_submission(&mut self, outcome: Result<ScriptResponse, GenerationError>) {
        if !self.is_loading() {
            warn!("Dropping generation outcome with no submission in flight");
            return;
        }

        self.view = match outcome {
            Ok(script) => ViewState::Ready(script),
            Err(e) => {
                error!("Script generation failed: {}", e);
                ViewState::Failed(GENERATION_FAILED_MESSAGE.to_string())
            }
        };
    }

    /// Returns the clipboard text for the shown script and turns on the
    /// copied indicator. `None` when no script is shown.
    pub fn copy_script(&mut self) -> Option<String> {
        match &self.view {
            ViewState::Ready(script) => {
                self.copied = true;
                Some(script.to_clipboard_text())
            }
            _ => None,
        }
    }

    pub fn reset_copied(&mut self) {
        self.copied = false;
    }
}
