use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type Metadata = HashMap<String, serde_json::Value>;

/// Prefix given to an image part when its first base64 fragment arrives.
pub const IMAGE_DATA_URI_PREFIX: &str = "data:image/png;base64,";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Metadata>,
    },
    Image {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Metadata>,
    },
    Video {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Metadata>,
    },
    Document {
        url: String,
        file_name: String,
        mime: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Metadata>,
    },
    Reasoning {
        text: String,
        #[serde(default = "Utc::now")]
        created_at: DateTime<Utc>,
        /// `None` while the model is still thinking.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        finished_at: Option<DateTime<Utc>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Metadata>,
    },
    ToolCall {
        /// Empty until the provider assigns a correlation id.
        #[serde(default)]
        id: String,
        #[serde(default)]
        name: String,
        /// JSON text, possibly partial while streaming.
        #[serde(default)]
        arguments: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Metadata>,
    },
    ToolResult {
        id: String,
        name: String,
        content: serde_json::Value,
        #[serde(default)]
        arguments: serde_json::Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Metadata>,
    },
    /// A part kind this build does not know about. Deserializing never fails
    /// on a new provider feature; merging ignores it.
    #[serde(other)]
    Unknown,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text {
            text: text.into(),
            metadata: None,
        }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Part::Image {
            url: url.into(),
            metadata: None,
        }
    }

    pub fn video(url: impl Into<String>) -> Self {
        Part::Video {
            url: url.into(),
            metadata: None,
        }
    }

    pub fn document(
        url: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
    ) -> Self {
        Part::Document {
            url: url.into(),
            file_name: file_name.into(),
            mime: mime.into(),
            metadata: None,
        }
    }

    /// An open reasoning part started now.
    pub fn reasoning(text: impl Into<String>) -> Self {
        Part::Reasoning {
            text: text.into(),
            created_at: Utc::now(),
            finished_at: None,
            metadata: None,
        }
    }

    pub fn tool_call(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Part::ToolCall {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
            metadata: None,
        }
    }

    pub fn tool_result(
        id: impl Into<String>,
        name: impl Into<String>,
        content: serde_json::Value,
        arguments: serde_json::Value,
    ) -> Self {
        Part::ToolResult {
            id: id.into(),
            name: name.into(),
            content,
            arguments,
            metadata: None,
        }
    }

    /// Replaces the metadata of any known part kind.
    pub fn with_metadata(mut self, value: Metadata) -> Self {
        if let Some(slot) = self.metadata_slot() {
            *slot = Some(value);
        }
        self
    }

    fn metadata_slot(&mut self) -> Option<&mut Option<Metadata>> {
        match self {
            Part::Text { metadata, .. }
            | Part::Image { metadata, .. }
            | Part::Video { metadata, .. }
            | Part::Document { metadata, .. }
            | Part::Reasoning { metadata, .. }
            | Part::ToolCall { metadata, .. }
            | Part::ToolResult { metadata, .. } => Some(metadata),
            Part::Unknown => None,
        }
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        match self {
            Part::Text { metadata, .. }
            | Part::Image { metadata, .. }
            | Part::Video { metadata, .. }
            | Part::Document { metadata, .. }
            | Part::Reasoning { metadata, .. }
            | Part::ToolCall { metadata, .. }
            | Part::ToolResult { metadata, .. } => metadata.as_ref(),
            Part::Unknown => None,
        }
    }

    /// Display and serialization order: reasoning first, media after text.
    pub fn priority(&self) -> i32 {
        match self {
            Part::Reasoning { .. } => -1,
            Part::Image { .. } | Part::Video { .. } | Part::Document { .. } => 1,
            Part::Text { .. } | Part::ToolCall { .. } | Part::ToolResult { .. } | Part::Unknown => 0,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Part::Text { .. } => "text",
            Part::Image { .. } => "image",
            Part::Video { .. } => "video",
            Part::Document { .. } => "document",
            Part::Reasoning { .. } => "reasoning",
            Part::ToolCall { .. } => "tool_call",
            Part::ToolResult { .. } => "tool_result",
            Part::Unknown => "unknown",
        }
    }

    pub fn is_reasoning(&self) -> bool {
        matches!(self, Part::Reasoning { .. })
    }

    pub fn is_tool_call(&self) -> bool {
        matches!(self, Part::ToolCall { .. })
    }

    pub fn is_tool_result(&self) -> bool {
        matches!(self, Part::ToolResult { .. })
    }

    /// Parses the accumulated arguments of a tool call.
    ///
    /// Returns `None` for other part kinds. An empty fragment parses as an
    /// empty object, since providers omit arguments for parameterless tools.
    pub fn tool_arguments(&self) -> Option<serde_json::Result<serde_json::Value>> {
        match self {
            Part::ToolCall { arguments, .. } => {
                if arguments.trim().is_empty() {
                    Some(Ok(serde_json::Value::Object(serde_json::Map::new())))
                } else {
                    Some(serde_json::from_str(arguments))
                }
            }
            _ => None,
        }
    }
}

/// Stable sort by [`Part::priority`].
pub fn sort_by_priority(parts: &[Part]) -> Vec<Part> {
    let mut sorted = parts.to_vec();
    sorted.sort_by_key(Part::priority);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_priority_puts_reasoning_first() {
        let parts = vec![
            Part::image("data:image/png;base64,AAAA"),
            Part::text("answer"),
            Part::reasoning("thinking"),
            Part::tool_call("call_1", "search", "{}"),
        ];
        let kinds: Vec<_> = sort_by_priority(&parts).iter().map(Part::kind).collect();
        assert_eq!(kinds, vec!["reasoning", "text", "tool_call", "image"]);
    }

    #[test]
    fn test_unknown_kind_deserializes_as_unknown() {
        let part: Part = serde_json::from_value(json!({"type": "hologram", "beam": 3})).unwrap();
        assert_eq!(part, Part::Unknown);
        assert_eq!(part.priority(), 0);
        assert!(part.metadata().is_none());
    }

    #[test]
    fn test_serializes_with_snake_case_tag() {
        let value = serde_json::to_value(Part::tool_call("call_1", "search", "{\"q\":1}")).unwrap();
        assert_eq!(
            value,
            json!({"type": "tool_call", "id": "call_1", "name": "search", "arguments": "{\"q\":1}"})
        );
    }

    #[test]
    fn test_tool_arguments_parse_accumulated_fragment() {
        let part = Part::tool_call("call_1", "search", "{\"query\":\"rust\"}");
        let args = part.tool_arguments().unwrap().unwrap();
        assert_eq!(args, json!({"query": "rust"}));

        let empty = Part::tool_call("call_2", "now", "");
        assert_eq!(empty.tool_arguments().unwrap().unwrap(), json!({}));

        let partial = Part::tool_call("call_3", "search", "{\"que");
        assert!(partial.tool_arguments().unwrap().is_err());

        assert!(Part::text("x").tool_arguments().is_none());
    }

    #[test]
    fn test_with_metadata_sets_metadata_on_known_kinds() {
        let mut meta = Metadata::new();
        meta.insert("signature".to_string(), json!("abc"));
        let part = Part::reasoning("hmm").with_metadata(meta.clone());
        assert_eq!(part.metadata(), Some(&meta));
        assert_eq!(Part::Unknown.with_metadata(meta), Part::Unknown);
    }
}
