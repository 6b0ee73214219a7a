use serde_json::json;

use crate::strategy::{ProviderStrategy, ReasoningEffort, RequestOptions};

#[derive(Debug, Default, Clone, Copy)]
pub struct OpenAiStrategy;

impl ProviderStrategy for OpenAiStrategy {
    fn id(&self) -> &'static str {
        "openai"
    }

    fn reasoning_options(&self, effort: ReasoningEffort) -> RequestOptions {
        RequestOptions::from([("reasoning_effort".to_string(), json!(effort.as_str()))])
    }

    fn supports_vision(&self, model_id: &str) -> bool {
        let id = model_id.to_lowercase();
        if id.contains("gpt-3.5") || id.contains("embedding") {
            return false;
        }
        // Small o-series reasoning models are text only.
        !matches!(id.as_str(), "o1-mini" | "o3-mini")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reasoning_effort_field() {
        let options = OpenAiStrategy.reasoning_options(ReasoningEffort::Low);
        assert_eq!(options.get("reasoning_effort"), Some(&json!("low")));
        assert_eq!(options.len(), 1);
    }

    #[test]
    fn test_vision_models() {
        assert!(OpenAiStrategy.supports_vision("gpt-4o"));
        assert!(OpenAiStrategy.supports_vision("o3"));
        assert!(!OpenAiStrategy.supports_vision("o3-mini"));
        assert!(!OpenAiStrategy.supports_vision("gpt-3.5-turbo"));
    }
}
