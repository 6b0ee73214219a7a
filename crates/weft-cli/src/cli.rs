use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use weft_provider::ReasoningEffort;
use weft_util::LogLevel;

#[derive(Parser)]
#[command(name = "weft")]
#[command(
    about = "Assemble streamed LLM responses into a conversation history and select context windows",
    long_about = None
)]
pub(crate) struct Cli {
    /// Log to stderr instead of the log file.
    #[arg(long, global = true, default_value_t = false)]
    pub(crate) print_logs: bool,
    #[arg(long, global = true, value_name = "LEVEL")]
    pub(crate) log_level: Option<LogLevel>,
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    #[command(about = "Replay a recorded chunk log against a seed history")]
    Replay {
        /// JSON array of messages the conversation starts from.
        #[arg(long)]
        seed: PathBuf,
        /// One JSON chunk per line.
        #[arg(long)]
        chunks: PathBuf,
        /// Context window size; overrides the config file and WEFT_CONTEXT_SIZE.
        #[arg(long)]
        size: Option<usize>,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Model id recorded on messages the replay creates.
        #[arg(short = 'm', long)]
        model: Option<String>,
        #[command(flatten)]
        request: RequestArgs,
        #[arg(long, default_value = "json")]
        format: OutputFormat,
    },
    #[command(about = "Select the context window of a stored history")]
    Window {
        #[arg(long)]
        history: PathBuf,
        #[arg(long)]
        size: usize,
        #[arg(short = 'm', long)]
        model: Option<String>,
        #[command(flatten)]
        request: RequestArgs,
        #[arg(long, default_value = "json")]
        format: OutputFormat,
    },
}

/// Shapes the window into a request body for the provider at `base_url`.
#[derive(clap::Args, Clone, Debug)]
pub(crate) struct RequestArgs {
    #[arg(long, value_name = "URL")]
    pub(crate) base_url: Option<String>,
    #[arg(long, requires = "base_url")]
    pub(crate) effort: Option<ReasoningEffort>,
}

#[derive(Clone, Debug, ValueEnum)]
pub(crate) enum OutputFormat {
    Json,
    Table,
}
