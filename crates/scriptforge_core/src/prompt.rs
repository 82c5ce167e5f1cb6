//! crates/scriptforge_core/src/prompt.rs
//!
//! Builds the natural-language instruction and the declared output schema
//! sent to the generation service.

use crate::domain::{beat_count, platform_hint, ScriptRequest};
use crate::ports::OutputSchema;
use serde_json::json;

/// Name the output schema is registered under.
pub const SCRIPT_SCHEMA_NAME: &str = "video_script";

const SEO_RULES: &str = r#"SEO Rules:
- Hook: Start with a searchable phrase directly (e.g., "How to fix X" or "Why your X does Y").
- Hook Length: Keep the hook under 15 words max.
- Keywords: Use natural keywords in body beats that people actually search for.
- CTA: Encourage saves and shares to boost algorithmic performance."#;

const CLARITY_RULES: &str = r#"Clarity Rules:
- No Filler: Cut all unnecessary filler words. Every word must earn its place.
- Slang: Reduce Gen Z slang by 70%. Use it very sparingly, not in every sentence.
- Payoff: One clean, powerful sentence with a clear benefit.
- Tone Consistency: If tone is Informational, be direct and helpful, not overly casual.
- Pacing: Fast pacing, high retention focus."#;

const OUTPUT_SHAPE: &str = r#"Return ONLY a JSON object with this structure:
{
  "hook": "string",
  "body": ["beat 1", "beat 2", "beat 3"],
  "payoff": "string",
  "cta": "string"
}"#;

/// Composes the full instruction for one request.
///
/// The topic is embedded verbatim. When the duration or platform is outside
/// its enumeration the corresponding line is left out instead of failing.
pub fn build_prompt(request: &ScriptRequest) -> String {
    let mut prompt = format!(
        "You are an expert short-form video script writer with a focus on SEO, clarity, and algorithmic performance.\n\n\
         Generate a {} {} video script about: \"{}\"\n\n\
         Tone: {}\n",
        request.duration, request.platform, request.topic, request.tone
    );

    if let Some(beats) = beat_count(&request.duration) {
        prompt.push_str(&format!("Required Body Beats: {}\n", beats));
    }
    if let Some(hint) = platform_hint(&request.platform) {
        prompt.push_str(&format!("Platform Style: {}\n", hint));
    }

    prompt.push('\n');
    prompt.push_str(SEO_RULES);
    prompt.push_str("\n\n");
    prompt.push_str(CLARITY_RULES);
    prompt.push_str("\n\n");
    prompt.push_str(OUTPUT_SHAPE);
    prompt
}

/// The shape every answer must have: four required fields, `body` a list of strings.
pub fn script_schema() -> OutputSchema {
    OutputSchema {
        name: SCRIPT_SCHEMA_NAME.to_string(),
        schema: json!({
            "type": "object",
            "properties": {
                "hook": { "type": "string" },
                "body": {
                    "type": "array",
                    "items": { "type": "string" }
                },
                "payoff": { "type": "string" },
                "cta": { "type": "string" }
            },
            "required": ["hook", "body", "payoff", "cta"],
            "additionalProperties": false
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Platform, ScriptDuration, Tone};

    fn wake_up_request() -> ScriptRequest {
        ScriptRequest::new(
            "how to wake up early",
            Platform::TikTok,
            Tone::Motivational,
            ScriptDuration::Seconds30,
        )
    }

    #[test]
    fn prompt_embeds_request_and_derived_hints() {
        let prompt = build_prompt(&wake_up_request());

        assert!(prompt.contains("Generate a 30 seconds TikTok video script about: \"how to wake up early\""));
        assert!(prompt.contains("Tone: Motivational"));
        assert!(prompt.contains("Required Body Beats: 3"));
        assert!(prompt.contains("Platform Style: "));
        assert!(prompt.contains("high retention"));
        assert!(prompt.contains("Keep the hook under 15 words max."));
        assert!(prompt.contains("Reduce Gen Z slang by 70%"));
        assert!(prompt.ends_with("\"cta\": \"string\"\n}"));
    }

    #[test]
    fn topic_is_embedded_verbatim() {
        let mut request = wake_up_request();
        request.topic = "why \"quotes\" & {braces} break things".to_string();

        let prompt = build_prompt(&request);

        assert!(prompt.contains("about: \"why \"quotes\" & {braces} break things\""));
    }

    #[test]
    fn unknown_labels_drop_their_hint_lines() {
        let request = ScriptRequest {
            topic: "budget travel".to_string(),
            platform: "Snapchat".to_string(),
            tone: "Informational".to_string(),
            duration: "45 seconds".to_string(),
        };

        let prompt = build_prompt(&request);

        assert!(!prompt.contains("Required Body Beats"));
        assert!(!prompt.contains("Platform Style"));
        assert!(prompt.contains("Generate a 45 seconds Snapchat video script"));
        assert!(prompt.contains("SEO Rules:"));
    }

    #[test]
    fn schema_requires_all_four_fields() {
        let schema = script_schema();

        assert_eq!(schema.name, "video_script");
        assert_eq!(
            schema.schema["required"],
            json!(["hook", "body", "payoff", "cta"])
        );
        assert_eq!(schema.schema["properties"]["body"]["items"]["type"], "string");
    }
}
