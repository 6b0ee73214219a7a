use std::sync::Arc;

use url::Url;

use crate::anthropic::AnthropicStrategy;
use crate::deepseek::DeepSeekStrategy;
use crate::generic::OpenAiCompatibleStrategy;
use crate::google::GoogleStrategy;
use crate::openai::OpenAiStrategy;
use crate::openrouter::OpenRouterStrategy;
use crate::strategy::{ProviderStrategy, StrategyError};

/// Selects a [`ProviderStrategy`] by provider host.
///
/// A registered host matches itself and any of its subdomains. Hosts with no
/// registration get the OpenAI-compatible fallback.
pub struct StrategyRegistry {
    hosts: Vec<(String, Arc<dyn ProviderStrategy>)>,
    fallback: Arc<dyn ProviderStrategy>,
}

impl StrategyRegistry {
    /// An empty registry that answers every lookup with `fallback`.
    pub fn new(fallback: Arc<dyn ProviderStrategy>) -> Self {
        Self {
            hosts: Vec::new(),
            fallback,
        }
    }

    /// Registers `strategy` for `host`. Later registrations win.
    pub fn register<S: ProviderStrategy + 'static>(&mut self, host: &str, strategy: S) {
        self.register_arc(host, Arc::new(strategy));
    }

    pub fn register_arc(&mut self, host: &str, strategy: Arc<dyn ProviderStrategy>) {
        self.hosts.insert(0, (normalize_host(host), strategy));
    }

    pub fn lookup_host(&self, host: &str) -> Arc<dyn ProviderStrategy> {
        let host = normalize_host(host);
        let found = self.hosts.iter().find(|(registered, _)| {
            host == *registered
                || host
                    .strip_suffix(registered.as_str())
                    .is_some_and(|rest| rest.ends_with('.'))
        });

        match found {
            Some((_, strategy)) => Arc::clone(strategy),
            None => {
                tracing::debug!(%host, "no strategy registered for host, using fallback");
                Arc::clone(&self.fallback)
            }
        }
    }

    pub fn lookup_url(&self, base_url: &str) -> Result<Arc<dyn ProviderStrategy>, StrategyError> {
        let url = Url::parse(base_url).map_err(|source| StrategyError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        let host = url
            .host_str()
            .ok_or_else(|| StrategyError::MissingHost(base_url.to_string()))?;
        Ok(self.lookup_host(host))
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        let mut registry = Self::new(Arc::new(OpenAiCompatibleStrategy));
        registry.register("api.openai.com", OpenAiStrategy);
        registry.register("api.anthropic.com", AnthropicStrategy);
        registry.register("generativelanguage.googleapis.com", GoogleStrategy);
        registry.register("openrouter.ai", OpenRouterStrategy);
        registry.register("api.deepseek.com", DeepSeekStrategy);
        registry
    }
}

fn normalize_host(host: &str) -> String {
    host.trim().trim_end_matches('.').to_lowercase()
}
