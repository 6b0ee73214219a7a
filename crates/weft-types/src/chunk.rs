use serde::{Deserialize, Serialize};

use crate::message::Message;
use crate::usage::TokenUsage;

/// One provider-delivered unit of a response, already decoded from the wire.
///
/// Adapters fill `id` and `model` with empty strings when the wire format
/// omits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

/// Exactly one of `delta` (streaming) or `message` (complete response) is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl Choice {
    /// The delta when streaming, otherwise the complete message.
    pub fn incoming(&self) -> Option<&Message> {
        self.delta.as_ref().or(self.message.as_ref())
    }

    /// The finish reason, treating the empty-string sentinel as absent.
    pub fn finish(&self) -> Option<&str> {
        self.finish_reason.as_deref().filter(|r| !r.is_empty())
    }
}

impl Chunk {
    /// A streaming chunk carrying one delta.
    pub fn delta(model: impl Into<String>, delta: Message) -> Self {
        Self {
            id: String::new(),
            model: model.into(),
            choices: vec![Choice {
                index: 0,
                delta: Some(delta),
                message: None,
                finish_reason: None,
            }],
            usage: None,
        }
    }

    /// A non-streamed response carrying the complete message.
    pub fn complete(model: impl Into<String>, message: Message) -> Self {
        Self {
            id: String::new(),
            model: model.into(),
            choices: vec![Choice {
                index: 0,
                delta: None,
                message: Some(message),
                finish_reason: None,
            }],
            usage: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Sets the finish reason of the first choice.
    pub fn with_finish_reason(mut self, reason: impl Into<String>) -> Self {
        if let Some(choice) = self.choices.first_mut() {
            choice.finish_reason = Some(reason.into());
        }
        self
    }

    pub fn first_choice(&self) -> Option<&Choice> {
        self.choices.first()
    }
}
