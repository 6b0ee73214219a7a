use chrono::Local;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Where logs went. Keep it alive for as long as the process logs: dropping
/// the guard flushes and stops the background writer.
#[derive(Default)]
pub struct LogOutput {
    pub path: Option<PathBuf>,
    _guard: Option<WorkerGuard>,
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level`. With `print` set, events go to
/// stderr; otherwise they go to a timestamped file under `log_dir` (the
/// current directory by default). If the file cannot be created, logging
/// stays off.
pub fn init_tracing(level: Option<LogLevel>, log_dir: Option<PathBuf>, print: bool) -> LogOutput {
    let filter = build_filter(level);

    if print {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        return LogOutput::default();
    }

    let log_path = log_path_in(&log_dir.unwrap_or_else(|| PathBuf::from(".")));

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path);

    match file {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
                .init();
            LogOutput {
                path: Some(log_path),
                _guard: Some(guard),
            }
        }
        Err(_) => LogOutput::default(),
    }
}

fn build_filter(level: Option<LogLevel>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or_default().to_string()))
}

fn log_path_in(dir: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y-%m-%dT%H%M%S").to_string();
    dir.join(format!("weft-{timestamp}.log"))
}
