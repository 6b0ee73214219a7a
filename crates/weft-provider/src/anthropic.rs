use serde_json::json;

use crate::strategy::{ProviderStrategy, ReasoningEffort, RequestOptions};

/// Extended thinking is configured as a token budget rather than a level.
fn thinking_budget(effort: ReasoningEffort) -> u32 {
    match effort {
        ReasoningEffort::Minimal => 1024,
        ReasoningEffort::Low => 4000,
        ReasoningEffort::Medium => 16000,
        ReasoningEffort::High => 31999,
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AnthropicStrategy;

impl ProviderStrategy for AnthropicStrategy {
    fn id(&self) -> &'static str {
        "anthropic"
    }

    fn reasoning_options(&self, effort: ReasoningEffort) -> RequestOptions {
        RequestOptions::from([(
            "thinking".to_string(),
            json!({"type": "enabled", "budget_tokens": thinking_budget(effort)}),
        )])
    }

    fn supports_vision(&self, model_id: &str) -> bool {
        let id = model_id.to_lowercase();
        !(id.starts_with("claude-2") || id.starts_with("claude-instant"))
    }
}
