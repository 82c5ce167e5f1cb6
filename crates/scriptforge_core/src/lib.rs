pub mod domain;
pub mod generator;
pub mod ports;
pub mod prompt;
pub mod shell;

pub use domain::{
    beat_count, platform_hint, Platform, ScriptDuration, ScriptRequest, ScriptResponse, Tone,
    UnknownLabel, MAX_TOPIC_CHARS,
};
pub use generator::{parse_script, GenerationError, GenerationErrorKind, ScriptGenerator};
pub use ports::{OutputSchema, PortError, PortResult, ScriptGenerationService};
pub use prompt::{build_prompt, script_schema};
pub use shell::{
    validate_request, FormUpdate, ScriptForm, ShellStatus, SubmitRejection, ViewState,
    COPIED_RESET_AFTER, GENERATION_FAILED_MESSAGE,
};
