use crate::strategy::{ProviderStrategy, ReasoningEffort, RequestOptions};

/// DeepSeek picks reasoning by model (`deepseek-reasoner`), not by request
/// field, and none of its chat models accept images.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeepSeekStrategy;

impl ProviderStrategy for DeepSeekStrategy {
    fn id(&self) -> &'static str {
        "deepseek"
    }

    fn reasoning_options(&self, _effort: ReasoningEffort) -> RequestOptions {
        RequestOptions::new()
    }

    fn supports_vision(&self, _model_id: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_reasoning_knob() {
        assert!(DeepSeekStrategy
            .reasoning_options(ReasoningEffort::High)
            .is_empty());
        assert!(!DeepSeekStrategy.supports_vision("deepseek-chat"));
    }
}
