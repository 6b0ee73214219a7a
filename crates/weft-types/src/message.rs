use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::part::{sort_by_priority, Part};
use crate::usage::TokenUsage;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// Citation-like record attached to a response (e.g. web search sources).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Annotation {
    UrlCitation { title: String, url: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default = "weft_core::id::message")]
    pub id: String,
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
    /// The finish reason reported with the last chunk of the stream
    /// (e.g. "stop", "tool_calls").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl Message {
    pub fn new(role: Role, parts: Vec<Part>) -> Self {
        Self {
            id: weft_core::id::message(),
            role,
            parts,
            annotations: Vec::new(),
            created_at: Utc::now(),
            model_id: None,
            usage: None,
            finish_reason: None,
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, vec![Part::text(text)])
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![Part::text(text)])
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, vec![Part::text(text)])
    }

    pub fn tool(parts: Vec<Part>) -> Self {
        Self::new(Role::Tool, parts)
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations = annotations;
        self
    }

    /// All text parts, concatenated.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    pub fn reasoning(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Reasoning { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    pub fn tool_calls(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter().filter(|p| p.is_tool_call())
    }

    pub fn tool_results(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter().filter(|p| p.is_tool_result())
    }

    pub fn has_tool_call(&self) -> bool {
        self.parts.iter().any(Part::is_tool_call)
    }

    pub fn has_tool_result(&self) -> bool {
        self.parts.iter().any(Part::is_tool_result)
    }

    pub fn has_reasoning(&self) -> bool {
        self.parts.iter().any(Part::is_reasoning)
    }

    /// A copy whose parts are in display order (see [`Part::priority`]).
    pub fn sorted_by_priority(&self) -> Message {
        Message {
            parts: sort_by_priority(&self.parts),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_constructors_generate_message_ids() {
        let a = Message::user("hi");
        let b = Message::user("hi");
        assert!(a.id.starts_with("msg_"));
        assert_ne!(a.id, b.id);
        assert_eq!(a.role, Role::User);
        assert_eq!(a.text(), "hi");
    }

    #[test]
    fn test_deserializes_minimal_delta() {
        let message: Message = serde_json::from_value(json!({
            "role": "assistant",
            "parts": [{"type": "text", "text": "he"}]
        }))
        .unwrap();
        assert!(message.id.starts_with("msg_"));
        assert_eq!(message.text(), "he");
        assert!(message.annotations.is_empty());
        assert!(message.usage.is_none());
    }

    #[test]
    fn test_tool_accessors() {
        let message = Message::new(
            Role::Assistant,
            vec![
                Part::text("let me check"),
                Part::tool_call("call_1", "search", "{}"),
            ],
        );
        assert!(message.has_tool_call());
        assert!(!message.has_tool_result());
        assert_eq!(message.tool_calls().count(), 1);
    }

    #[test]
    fn test_sorted_by_priority_keeps_relative_order() {
        let message = Message::new(
            Role::Assistant,
            vec![
                Part::text("a"),
                Part::reasoning("r"),
                Part::text("b"),
            ],
        );
        let sorted = message.sorted_by_priority();
        assert_eq!(sorted.parts[0].kind(), "reasoning");
        assert_eq!(sorted.text(), "ab");
        assert_eq!(sorted.id, message.id);
        assert_eq!(message.parts[0].kind(), "text");
    }
}
