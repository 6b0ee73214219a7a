use serde_json::json;

use crate::anthropic::AnthropicStrategy;
use crate::deepseek::DeepSeekStrategy;
use crate::generic::OpenAiCompatibleStrategy;
use crate::google::GoogleStrategy;
use crate::openai::OpenAiStrategy;
use crate::strategy::{ProviderStrategy, ReasoningEffort, RequestOptions};

/// OpenRouter takes a unified `reasoning` object and routes `vendor/model`
/// ids to the upstream vendor.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenRouterStrategy;

impl ProviderStrategy for OpenRouterStrategy {
    fn id(&self) -> &'static str {
        "openrouter"
    }

    fn reasoning_options(&self, effort: ReasoningEffort) -> RequestOptions {
        RequestOptions::from([(
            "reasoning".to_string(),
            json!({"effort": effort.as_str()}),
        )])
    }

    fn supports_vision(&self, model_id: &str) -> bool {
        let Some((vendor, model)) = model_id.split_once('/') else {
            return OpenAiCompatibleStrategy.supports_vision(model_id);
        };
        match vendor {
            "openai" => OpenAiStrategy.supports_vision(model),
            "anthropic" => AnthropicStrategy.supports_vision(model),
            "google" => GoogleStrategy.supports_vision(model),
            "deepseek" => DeepSeekStrategy.supports_vision(model),
            _ => OpenAiCompatibleStrategy.supports_vision(model),
        }
    }
}
