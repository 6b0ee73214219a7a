use anyhow::Context;
use serde_json::{json, Map, Value};
use weft_provider::{ReasoningEffort, StrategyRegistry};
use weft_types::Message;

/// Builds the request body the provider at `base_url` would receive for
/// `messages`: visual parts the model cannot read are dropped and the
/// provider's reasoning fields are added when an effort is given.
pub(crate) fn request_body(
    registry: &StrategyRegistry,
    base_url: &str,
    model: &str,
    effort: Option<ReasoningEffort>,
    messages: &[Message],
) -> anyhow::Result<Value> {
    let strategy = registry.lookup_url(base_url)?;
    let messages = strategy.strip_unsupported(model, messages);

    let mut body = Map::new();
    body.insert("model".to_string(), json!(model));
    body.insert(
        "messages".to_string(),
        serde_json::to_value(&messages).context("failed to encode messages")?,
    );
    if let Some(effort) = effort {
        body.extend(strategy.reasoning_options(effort));
    }

    tracing::info!(
        provider = strategy.id(),
        model,
        messages = messages.len(),
        "built request body"
    );
    Ok(Value::Object(body))
}

/// The model named on the command line, else the last model recorded in
/// the history.
pub(crate) fn resolve_model(explicit: Option<&str>, history: &[Message]) -> anyhow::Result<String> {
    explicit
        .map(str::to_string)
        .or_else(|| history.iter().rev().find_map(|m| m.model_id.clone()))
        .context("--model is required when no message records a model")
}
