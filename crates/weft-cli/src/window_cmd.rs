use std::path::PathBuf;
use weft_provider::StrategyRegistry;
use weft_session::select_window;
use weft_types::Message;

use crate::cli::{OutputFormat, RequestArgs};
use crate::output::print_messages;
use crate::request::{request_body, resolve_model};
use crate::util::read_json;

pub(crate) fn run_window(
    history: PathBuf,
    size: usize,
    model: Option<String>,
    request: RequestArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let history: Vec<Message> = read_json(&history)?;
    let window = select_window(&history, size);
    tracing::info!(
        history = history.len(),
        size,
        window = window.len(),
        "selected context window"
    );

    match &request.base_url {
        Some(base_url) => {
            let model = resolve_model(model.as_deref(), &history)?;
            let body = request_body(
                &StrategyRegistry::default(),
                base_url,
                &model,
                request.effort,
                window,
            )?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        None => print_messages(window, &format)?,
    }
    Ok(())
}
