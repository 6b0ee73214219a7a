use serde::{Deserialize, Serialize};

/// Token accounting reported by a provider for one response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub cached_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            cached_tokens: 0,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }

    pub fn with_cached(mut self, cached_tokens: u64) -> Self {
        self.cached_tokens = cached_tokens;
        self
    }

    /// Folds the usage carried by a new chunk into the running total.
    ///
    /// Providers report usage either once at the end of a stream or as a
    /// cumulative figure on several chunks, and some send zeroes for fields
    /// they do not know yet. Each counter therefore takes the incoming value
    /// only when it is non-zero. The total is always recomputed.
    pub fn merge(existing: Option<&TokenUsage>, incoming: &TokenUsage) -> TokenUsage {
        let base = existing.copied().unwrap_or_default();
        let pick = |new: u64, old: u64| if new > 0 { new } else { old };

        let prompt_tokens = pick(incoming.prompt_tokens, base.prompt_tokens);
        let completion_tokens = pick(incoming.completion_tokens, base.completion_tokens);
        let cached_tokens = pick(incoming.cached_tokens, base.cached_tokens);

        TokenUsage {
            prompt_tokens,
            completion_tokens,
            cached_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}
