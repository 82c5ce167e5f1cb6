//! crates/scriptforge_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application: the script
//! request and response records, and the closed enumerations a request is
//! built from together with their lookup tables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest topic the form accepts, counted in characters.
pub const MAX_TOPIC_CHARS: usize = 300;

//=========================================================================================
// Closed Enumerations
//=========================================================================================

/// Returned when a label does not belong to one of the closed enumerations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a known {kind}")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

/// The short-form video platform a script is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    TikTok,
    Reels,
    Shorts,
    TwitterX,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::TikTok,
        Platform::Reels,
        Platform::Shorts,
        Platform::TwitterX,
    ];

    /// The label used on the wire and inside the prompt.
    pub fn label(self) -> &'static str {
        match self {
            Platform::TikTok => "TikTok",
            Platform::Reels => "Reels",
            Platform::Shorts => "Shorts",
            Platform::TwitterX => "Twitter/X",
        }
    }

    /// Short style guidance handed to the model for this platform.
    pub fn style_hint(self) -> &'static str {
        match self {
            Platform::TikTok => {
                "Casual but clear, use trending phrases sparingly, focus on high retention"
            }
            Platform::Reels => "Instagram aesthetic, aspirational language, visual cues",
            Platform::Shorts => "YouTube-friendly, direct and informational",
            Platform::TwitterX => "Punchy, thread-style thinking, controversial angles OK",
        }
    }
}

/// The voice the script should be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Emotional,
    Informational,
    Aggressive,
    Motivational,
    Storytelling,
}

impl Tone {
    pub const ALL: [Tone; 5] = [
        Tone::Emotional,
        Tone::Informational,
        Tone::Aggressive,
        Tone::Motivational,
        Tone::Storytelling,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tone::Emotional => "Emotional",
            Tone::Informational => "Informational",
            Tone::Aggressive => "Aggressive",
            Tone::Motivational => "Motivational",
            Tone::Storytelling => "Storytelling",
        }
    }
}

/// Target running time of the video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptDuration {
    Seconds15,
    Seconds30,
    Seconds60,
}

impl ScriptDuration {
    pub const ALL: [ScriptDuration; 3] = [
        ScriptDuration::Seconds15,
        ScriptDuration::Seconds30,
        ScriptDuration::Seconds60,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ScriptDuration::Seconds15 => "15 seconds",
            ScriptDuration::Seconds30 => "30 seconds",
            ScriptDuration::Seconds60 => "60 seconds",
        }
    }

    /// Number of body beats the model is asked for.
    pub fn beat_count(self) -> usize {
        match self {
            ScriptDuration::Seconds15 => 2,
            ScriptDuration::Seconds30 => 3,
            ScriptDuration::Seconds60 => 5,
        }
    }
}

// Label parsing is an exact match; the wire format is the display label.
macro_rules! label_enum_impls {
    ($ty:ty, $kind:literal) => {
        impl FromStr for $ty {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .into_iter()
                    .find(|v| v.label() == s)
                    .ok_or_else(|| UnknownLabel {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

label_enum_impls!(Platform, "platform");
label_enum_impls!(Tone, "tone");
label_enum_impls!(ScriptDuration, "duration");

/// Beat count for a duration label. Labels outside the enumeration yield `None`.
pub fn beat_count(duration: &str) -> Option<usize> {
    duration.parse::<ScriptDuration>().ok().map(ScriptDuration::beat_count)
}

/// Style hint for a platform label. Labels outside the enumeration yield `None`.
pub fn platform_hint(platform: &str) -> Option<&'static str> {
    platform.parse::<Platform>().ok().map(Platform::style_hint)
}

//=========================================================================================
// Request and Response Records
//=========================================================================================

/// The four parameters a script is generated from.
///
/// Fields hold the wire labels rather than the typed enumerations so that an
/// out-of-range value reaches the generator unchanged; the generator only
/// drops the hint it cannot derive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRequest {
    pub topic: String,
    pub platform: String,
    pub tone: String,
    pub duration: String,
}

impl ScriptRequest {
    pub fn new(
        topic: impl Into<String>,
        platform: Platform,
        tone: Tone,
        duration: ScriptDuration,
    ) -> Self {
        Self {
            topic: topic.into(),
            platform: platform.label().to_string(),
            tone: tone.label().to_string(),
            duration: duration.label().to_string(),
        }
    }
}

/// A generated script. `body` is kept in the order the model returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptResponse {
    pub hook: String,
    pub body: Vec<String>,
    pub payoff: String,
    pub cta: String,
}

impl ScriptResponse {
    /// Plain-text layout written to the clipboard.
    pub fn to_clipboard_text(&self) -> String {
        let beats = self
            .body
            .iter()
            .map(|beat| format!("• {}", beat))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "HOOK:\n{}\n\nBODY:\n{}\n\nPAYOFF:\n{}\n\nCTA:\n{}",
            self.hook, beats, self.payoff, self.cta
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beat_counts_follow_the_duration_table() {
        assert_eq!(beat_count("15 seconds"), Some(2));
        assert_eq!(beat_count("30 seconds"), Some(3));
        assert_eq!(beat_count("60 seconds"), Some(5));
    }

    #[test]
    fn unknown_durations_have_no_beat_count() {
        assert_eq!(beat_count("45 seconds"), None);
        assert_eq!(beat_count(""), None);
        assert_eq!(beat_count("30 Seconds"), None);
    }

    #[test]
    fn every_platform_has_its_hint() {
        assert_eq!(
            platform_hint("TikTok"),
            Some("Casual but clear, use trending phrases sparingly, focus on high retention")
        );
        assert_eq!(
            platform_hint("Reels"),
            Some("Instagram aesthetic, aspirational language, visual cues")
        );
        assert_eq!(
            platform_hint("Shorts"),
            Some("YouTube-friendly, direct and informational")
        );
        assert_eq!(
            platform_hint("Twitter/X"),
            Some("Punchy, thread-style thinking, controversial angles OK")
        );
    }

    #[test]
    fn unknown_platforms_have_no_hint() {
        assert_eq!(platform_hint("Snapchat"), None);
        assert_eq!(platform_hint("tiktok"), None);
    }

    #[test]
    fn labels_parse_back_to_their_variant() {
        for platform in Platform::ALL {
            assert_eq!(platform.label().parse::<Platform>(), Ok(platform));
        }
        for tone in Tone::ALL {
            assert_eq!(tone.to_string().parse::<Tone>(), Ok(tone));
        }
        let err = "Sarcastic".parse::<Tone>().unwrap_err();
        assert_eq!(err.to_string(), "'Sarcastic' is not a known tone");
    }

    #[test]
    fn clipboard_text_uses_the_fixed_layout() {
        let script = ScriptResponse {
            hook: "H".to_string(),
            body: vec!["A".to_string(), "B".to_string()],
            payoff: "P".to_string(),
            cta: "C".to_string(),
        };

        assert_eq!(
            script.to_clipboard_text(),
            "HOOK:\nH\n\nBODY:\n• A\n• B\n\nPAYOFF:\nP\n\nCTA:\nC"
        );
    }
}
