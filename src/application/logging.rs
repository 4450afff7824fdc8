//! # Logging Setup
//!
//! Installs the global `tracing` subscriber: an env-driven filter, a console
//! layer and a non-blocking file layer. The returned guard must be held for
//! the life of the process or buffered file lines are lost.

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::domain::config::LoggingConfig;

/// Quiet defaults for chatty HTTP dependencies, appended to the configured filter.
const DEPENDENCY_FILTER: &str = "hyper=warn,reqwest=warn,tower_http=warn";

pub fn filter_directives(config: &LoggingConfig) -> String {
    format!("{},{}", config.filter, DEPENDENCY_FILTER)
}

pub fn init(config: &LoggingConfig) -> Result<WorkerGuard> {
    let path = Path::new(&config.file);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .context("logging.file must name a file")?;

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(config)));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);

    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_keeps_configured_level_first() {
        let config = LoggingConfig {
            file: "data/bot.log".into(),
            filter: "debug".into(),
        };
        let directives = filter_directives(&config);
        assert!(directives.starts_with("debug,"));
        assert!(EnvFilter::try_new(&directives).is_ok());
    }
}
