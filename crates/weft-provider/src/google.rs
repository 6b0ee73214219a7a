use serde_json::json;

use crate::strategy::{ProviderStrategy, ReasoningEffort, RequestOptions};

fn thinking_budget(effort: ReasoningEffort) -> u32 {
    match effort {
        ReasoningEffort::Minimal => 512,
        ReasoningEffort::Low => 4096,
        ReasoningEffort::Medium => 16000,
        ReasoningEffort::High => 24576,
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GoogleStrategy;

impl ProviderStrategy for GoogleStrategy {
    fn id(&self) -> &'static str {
        "google"
    }

    fn reasoning_options(&self, effort: ReasoningEffort) -> RequestOptions {
        RequestOptions::from([(
            "generationConfig".to_string(),
            json!({
                "thinkingConfig": {
                    "includeThoughts": true,
                    "thinkingBudget": thinking_budget(effort)
                }
            }),
        )])
    }

    fn supports_vision(&self, model_id: &str) -> bool {
        model_id.to_lowercase().contains("gemini")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thinking_config() {
        let options = GoogleStrategy.reasoning_options(ReasoningEffort::High);
        assert_eq!(
            options["generationConfig"]["thinkingConfig"]["thinkingBudget"],
            json!(24576)
        );
        assert_eq!(
            options["generationConfig"]["thinkingConfig"]["includeThoughts"],
            json!(true)
        );
    }

    #[test]
    fn test_gemini_reads_images() {
        assert!(GoogleStrategy.supports_vision("gemini-2.5-pro"));
        assert!(!GoogleStrategy.supports_vision("text-embedding-004"));
    }
}
