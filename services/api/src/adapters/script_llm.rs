//! services/api/src/adapters/script_llm.rs
//!
//! This module contains the adapter for the script-writing LLM.
//! It implements the `ScriptGenerationService` port from the `core` crate against
//! any OpenAI-compatible chat-completions endpoint (Gemini's by default).

use crate::config::Config;
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
        ResponseFormatJsonSchema,
    },
    Client,
};
use async_trait::async_trait;
use scriptforge_core::ports::{OutputSchema, PortError, PortResult, ScriptGenerationService};
use tracing::{debug, warn};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ScriptGenerationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiScriptAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiScriptAdapter {
    /// Creates a new `OpenAiScriptAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// Builds the client from the loaded configuration. The API key is bound
    /// here once; nothing reads it from the environment afterwards.
    pub fn from_config(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_base(&config.generation_api_base)
            .with_api_key(&config.gemini_api_key);
        Self::new(Client::with_config(openai_config), config.script_model.clone())
    }
}

//=========================================================================================
// `ScriptGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ScriptGenerationService for OpenAiScriptAdapter {
    /// Sends the prompt as a single user message and asks for a strict
    /// JSON-schema response. Returns the message text untouched.
    ///
    /// A completed call always yields text: a missing or blank message comes
    /// back as an empty string and a refusal as its own text, so the caller's
    /// parser decides it is not a script. Only a reply with no choices at all
    /// is an error here.
    async fn generate_structured(&self, prompt: &str, schema: &OutputSchema) -> PortResult<String> {
        let messages = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .into()];

        let response_format = ResponseFormat::JsonSchema {
            json_schema: ResponseFormatJsonSchema {
                description: None,
                name: schema.name.clone(),
                schema: Some(schema.schema.clone()),
                strict: Some(true),
            },
        };

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(response_format)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Upstream(e.to_string()))?;

        debug!(model = %response.model, choices = response.choices.len(), "Script LLM responded");

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            PortError::EmptyResponse("Script LLM returned no choices in its response.".to_string())
        })?;

        match (choice.message.content, choice.message.refusal) {
            (Some(content), _) if !content.trim().is_empty() => Ok(content),
            (_, Some(refusal)) => {
                warn!("Script LLM refused the request: {}", refusal);
                Ok(refusal)
            }
            _ => {
                warn!("Script LLM response contained no text content.");
                Ok(String::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptforge_core::prompt::script_schema;
    use scriptforge_core::{
        GenerationErrorKind, Platform, ScriptDuration, ScriptGenerator, ScriptRequest, Tone,
    };
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter_for(server: &MockServer) -> OpenAiScriptAdapter {
        let config = OpenAIConfig::new()
            .with_api_base(server.uri())
            .with_api_key("test-key");
        OpenAiScriptAdapter::new(Client::with_config(config), "gemini-3-flash-preview".to_string())
    }

    fn completion_with(content: serde_json::Value) -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1_700_000_000u32,
            "model": "gemini-3-flash-preview",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
    }

    #[tokio::test]
    async fn sends_schema_and_returns_message_text() {
        let server = MockServer::start().await;
        let script = r#"{"hook":"h","body":["a"],"payoff":"p","cta":"c"}"#;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "gemini-3-flash-preview",
                "response_format": {
                    "type": "json_schema",
                    "json_schema": { "name": "video_script", "strict": true }
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_with(json!(script))))
            .expect(1)
            .mount(&server)
            .await;

        let text = adapter_for(&server)
            .generate_structured("write a script", &script_schema())
            .await
            .unwrap();

        assert_eq!(text, script);
    }

    #[tokio::test]
    async fn api_errors_become_upstream_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {
                    "message": "API key not valid",
                    "type": "invalid_request_error",
                    "param": null,
                    "code": "invalid_api_key"
                }
            })))
            .mount(&server)
            .await;

        let err = adapter_for(&server)
            .generate_structured("write a script", &script_schema())
            .await
            .unwrap_err();

        assert!(matches!(err, PortError::Upstream(ref msg) if msg.contains("API key not valid")));
    }

    #[tokio::test]
    async fn missing_content_comes_back_as_empty_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_with(json!(null))))
            .mount(&server)
            .await;

        let text = adapter_for(&server)
            .generate_structured("write a script", &script_schema())
            .await
            .unwrap();

        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn no_choices_is_an_empty_response() {
        let server = MockServer::start().await;
        let mut completion = completion_with(json!(null));
        completion["choices"] = json!([]);

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion))
            .mount(&server)
            .await;

        let err = adapter_for(&server)
            .generate_structured("write a script", &script_schema())
            .await
            .unwrap_err();

        assert!(matches!(err, PortError::EmptyResponse(_)));
    }

    #[tokio::test]
    async fn blank_completed_reply_is_a_malformed_script() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_with(json!("   "))))
            .mount(&server)
            .await;

        let generator = ScriptGenerator::new(Arc::new(adapter_for(&server)));
        let request = ScriptRequest::new(
            "how to wake up early",
            Platform::TikTok,
            Tone::Motivational,
            ScriptDuration::Seconds30,
        );

        let err = generator.generate(&request).await.unwrap_err();

        assert_eq!(err.kind(), GenerationErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn refusal_is_a_malformed_script() {
        let server = MockServer::start().await;
        let mut completion = completion_with(json!(null));
        completion["choices"][0]["message"]["refusal"] = json!("I can't help with that.");

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion))
            .mount(&server)
            .await;

        let generator = ScriptGenerator::new(Arc::new(adapter_for(&server)));
        let request = ScriptRequest::new(
            "how to wake up early",
            Platform::Shorts,
            Tone::Informational,
            ScriptDuration::Seconds15,
        );

        let err = generator.generate(&request).await.unwrap_err();

        assert_eq!(err.kind(), GenerationErrorKind::MalformedResponse);
    }
}
