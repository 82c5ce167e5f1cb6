//! services/api/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the browser client and the API server
//! for the script generator form.

use scriptforge_core::{FormUpdate, ScriptRequest, ScriptResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// Form fields carried by a client message. Omitted fields keep their current value.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FormFields {
    pub topic: Option<String>,
    pub platform: Option<String>,
    pub tone: Option<String>,
    pub duration: Option<String>,
}

impl From<FormFields> for FormUpdate {
    fn from(fields: FormFields) -> Self {
        FormUpdate {
            topic: fields.topic,
            platform: fields.platform,
            tone: fields.tone,
            duration: fields.duration,
        }
    }
}

/// Represents the structured text messages a client can send to the server.
#[derive(Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Changes one or more form fields without submitting.
    UpdateForm(FormFields),

    /// Applies any included fields, then submits the form for generation.
    /// Rejected while a previous submission is still in flight.
    Generate(FormFields),

    /// Asks for the clipboard text of the script currently shown.
    Copy,
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// Represents the structured text messages the server can send to the client.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once after the connection opens, with the form's starting values.
    SessionInitialized { connection_id: Uuid, form: ScriptRequest },

    /// The submission was accepted and the generator is running.
    /// The UI can show its loading state and disable the submit control.
    GenerationStarted,

    /// The generator produced a valid script.
    ScriptReady { script: ScriptResponse },

    /// Generation failed. The message is the same for every failure.
    Error { message: String },

    /// The submission never reached the generator (empty topic, in flight, ...).
    SubmissionRejected { reason: String },

    /// Clipboard text for the shown script; the "copied" indicator is on.
    Copied { text: String },

    /// The "copied" indicator has timed out.
    CopyReset,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generate_accepts_partial_fields() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"generate","topic":"sleep hacks","duration":"15 seconds"}"#)
                .unwrap();

        assert_eq!(
            msg,
            ClientMessage::Generate(FormFields {
                topic: Some("sleep hacks".to_string()),
                duration: Some("15 seconds".to_string()),
                ..Default::default()
            })
        );

        let bare: ClientMessage = serde_json::from_str(r#"{"type":"generate"}"#).unwrap();
        assert_eq!(bare, ClientMessage::Generate(FormFields::default()));
    }

    #[test]
    fn copy_and_update_form_are_tagged() {
        let copy: ClientMessage = serde_json::from_str(r#"{"type":"copy"}"#).unwrap();
        assert_eq!(copy, ClientMessage::Copy);

        let update: ClientMessage =
            serde_json::from_str(r#"{"type":"update_form","platform":"Reels"}"#).unwrap();
        assert!(matches!(update, ClientMessage::UpdateForm(f) if f.platform.as_deref() == Some("Reels")));
    }

    #[test]
    fn server_messages_use_snake_case_tags() {
        let ready = ServerMessage::ScriptReady {
            script: ScriptResponse {
                hook: "h".to_string(),
                body: vec!["a".to_string()],
                payoff: "p".to_string(),
                cta: "c".to_string(),
            },
        };

        assert_eq!(
            serde_json::to_value(&ready).unwrap(),
            json!({
                "type": "script_ready",
                "script": { "hook": "h", "body": ["a"], "payoff": "p", "cta": "c" }
            })
        );
        assert_eq!(
            serde_json::to_value(ServerMessage::CopyReset).unwrap(),
            json!({ "type": "copy_reset" })
        );
    }
}
