use serde_json::json;

use crate::strategy::{ProviderStrategy, ReasoningEffort, RequestOptions};

/// Fallback for any OpenAI-compatible endpoint the registry does not know.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenAiCompatibleStrategy;

impl ProviderStrategy for OpenAiCompatibleStrategy {
    fn id(&self) -> &'static str {
        "openai-compatible"
    }

    fn reasoning_options(&self, effort: ReasoningEffort) -> RequestOptions {
        RequestOptions::from([("reasoning_effort".to_string(), json!(effort.as_str()))])
    }

    fn supports_vision(&self, model_id: &str) -> bool {
        let id = model_id.to_lowercase();
        id.contains("vision") || id.contains("-vl") || id.contains("llava")
    }
}
