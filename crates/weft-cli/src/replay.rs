use anyhow::Context;
use std::path::{Path, PathBuf};
use weft_provider::StrategyRegistry;
use weft_session::{Conversation, HistoryConfig};
use weft_types::{Chunk, Message};

use crate::cli::{OutputFormat, RequestArgs};
use crate::output::print_messages;
use crate::request::{request_body, resolve_model};
use crate::util::read_json;

pub(crate) struct ReplayOptions {
    pub(crate) seed: PathBuf,
    pub(crate) chunks: PathBuf,
    pub(crate) size: Option<usize>,
    pub(crate) config: Option<PathBuf>,
    pub(crate) model: Option<String>,
    pub(crate) request: RequestArgs,
    pub(crate) format: OutputFormat,
}

pub(crate) async fn run_replay(options: ReplayOptions) -> anyhow::Result<()> {
    let config = load_config(options.config.as_deref(), options.size)?;
    let seed: Vec<Message> = read_json(&options.seed)?;
    let content = std::fs::read_to_string(&options.chunks)
        .with_context(|| format!("failed to read {}", options.chunks.display()))?;
    let chunks = parse_chunk_log(&content)?;

    let handle = Conversation::spawn(seed, config)
        .context("cannot replay into an empty seed history")?;
    tracing::info!(
        conversation_id = handle.id(),
        chunks = chunks.len(),
        "replaying chunk log"
    );

    for (line, chunk) in chunks {
        handle
            .apply(chunk, options.model.as_deref())
            .await
            .with_context(|| format!("chunk on line {line} was rejected"))?;
    }

    let window = handle.window();
    let history = handle.snapshot();
    handle.shutdown().await?;
    tracing::info!(
        history = history.len(),
        window = window.len(),
        "replay finished"
    );

    match &options.request.base_url {
        Some(base_url) => {
            let model = resolve_model(options.model.as_deref(), &history)?;
            let body = request_body(
                &StrategyRegistry::default(),
                base_url,
                &model,
                options.request.effort,
                &window,
            )?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        None => print_messages(&window, &options.format)?,
    }
    Ok(())
}

fn load_config(path: Option<&Path>, size: Option<usize>) -> anyhow::Result<HistoryConfig> {
    let config = match path {
        Some(path) => HistoryConfig::load(path)?,
        None => HistoryConfig::default(),
    };
    let mut config = config.apply_env_overrides()?;
    if let Some(size) = size {
        config.context_message_size = size;
    }
    Ok(config)
}

/// Parses a JSON-lines chunk log, keeping 1-based line numbers for error
/// reporting. Blank lines are skipped.
fn parse_chunk_log(content: &str) -> anyhow::Result<Vec<(usize, Chunk)>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            let chunk = serde_json::from_str(line)
                .with_context(|| format!("invalid chunk on line {}", index + 1))?;
            Ok((index + 1, chunk))
        })
        .collect()
}
