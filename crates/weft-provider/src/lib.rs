pub mod anthropic;
pub mod deepseek;
pub mod generic;
pub mod google;
pub mod openai;
pub mod openrouter;
pub mod registry;
pub mod strategy;

pub use anthropic::AnthropicStrategy;
pub use deepseek::DeepSeekStrategy;
pub use generic::OpenAiCompatibleStrategy;
pub use google::GoogleStrategy;
pub use openai::OpenAiStrategy;
pub use openrouter::OpenRouterStrategy;
pub use registry::StrategyRegistry;
pub use strategy::{ProviderStrategy, ReasoningEffort, RequestOptions, StrategyError};
