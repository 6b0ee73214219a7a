use clap::Parser;

mod cli;
mod output;
mod replay;
mod request;
mod util;
mod window_cmd;

use cli::*;
use replay::{run_replay, ReplayOptions};
use window_cmd::run_window;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("/tmp"))
        .join("weft")
        .join("log");
    let _log = weft_util::init_tracing(cli.log_level, Some(log_dir), cli.print_logs);

    match cli.command {
        Commands::Replay {
            seed,
            chunks,
            size,
            config,
            model,
            request,
            format,
        } => {
            run_replay(ReplayOptions {
                seed,
                chunks,
                size,
                config,
                model,
                request,
                format,
            })
            .await?;
        }
        Commands::Window {
            history,
            size,
            model,
            request,
            format,
        } => {
            run_window(history, size, model, request, format)?;
        }
    }

    Ok(())
}
