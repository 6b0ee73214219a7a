use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use weft_types::{Message, Part};

/// Extra top-level fields merged into a provider request body.
pub type RequestOptions = HashMap<String, serde_json::Value>;

#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    #[error("invalid provider base url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("provider base url {0:?} has no host")]
    MissingHost(String),

    #[error("unknown reasoning effort: {0}")]
    UnknownEffort(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Minimal,
    Low,
    Medium,
    High,
}

impl ReasoningEffort {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasoningEffort::Minimal => "minimal",
            ReasoningEffort::Low => "low",
            ReasoningEffort::Medium => "medium",
            ReasoningEffort::High => "high",
        }
    }
}

impl fmt::Display for ReasoningEffort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReasoningEffort {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minimal" => Ok(ReasoningEffort::Minimal),
            "low" => Ok(ReasoningEffort::Low),
            "medium" => Ok(ReasoningEffort::Medium),
            "high" => Ok(ReasoningEffort::High),
            _ => Err(StrategyError::UnknownEffort(s.to_string())),
        }
    }
}

/// Provider-specific request shaping. History assembly never consults a
/// strategy; callers apply one to the selected window right before a
/// request is built.
pub trait ProviderStrategy: Send + Sync {
    fn id(&self) -> &'static str;

    /// Request fields that ask the provider for the given reasoning effort.
    /// Empty when the provider has no such knob.
    fn reasoning_options(&self, effort: ReasoningEffort) -> RequestOptions;

    fn supports_vision(&self, model_id: &str) -> bool;

    /// Drops image and video parts when `model_id` cannot read them.
    fn strip_unsupported(&self, model_id: &str, messages: &[Message]) -> Vec<Message> {
        if self.supports_vision(model_id) {
            return messages.to_vec();
        }

        messages
            .iter()
            .map(|message| {
                let parts: Vec<Part> = message
                    .parts
                    .iter()
                    .filter(|p| !matches!(p, Part::Image { .. } | Part::Video { .. }))
                    .cloned()
                    .collect();
                let dropped = message.parts.len() - parts.len();
                if dropped > 0 {
                    tracing::debug!(
                        provider = self.id(),
                        model = model_id,
                        message_id = %message.id,
                        dropped,
                        "dropping visual parts the model cannot read"
                    );
                }
                Message {
                    parts,
                    ..message.clone()
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Blind;

    impl ProviderStrategy for Blind {
        fn id(&self) -> &'static str {
            "blind"
        }

        fn reasoning_options(&self, _effort: ReasoningEffort) -> RequestOptions {
            RequestOptions::new()
        }

        fn supports_vision(&self, _model_id: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_effort_parses_and_displays() {
        assert_eq!("HIGH".parse::<ReasoningEffort>().unwrap(), ReasoningEffort::High);
        assert_eq!(ReasoningEffort::Minimal.to_string(), "minimal");
        assert!(matches!(
            "max".parse::<ReasoningEffort>(),
            Err(StrategyError::UnknownEffort(_))
        ));
    }

    #[test]
    fn test_strip_unsupported_drops_only_visual_parts() {
        let message = Message::new(
            weft_types::Role::User,
            vec![
                Part::text("what is this?"),
                Part::image("data:image/png;base64,AAAA"),
                Part::video("https://example.com/clip.mp4"),
                Part::document("https://example.com/a.pdf", "a.pdf", "application/pdf"),
            ],
        );

        let stripped = Blind.strip_unsupported("any", std::slice::from_ref(&message));
        let kinds: Vec<_> = stripped[0].parts.iter().map(Part::kind).collect();
        assert_eq!(kinds, vec!["text", "document"]);
        assert_eq!(stripped[0].id, message.id);
        assert_eq!(message.parts.len(), 4);
    }
}
