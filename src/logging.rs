use std::fs::File;

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};

use crate::config;

/// Sends log records to [`config::LOG_FILE`]; the terminal belongs to the UI.
/// `RUST_LOG` overrides the default level.
pub fn init() -> Result<()> {
    let file = File::create(config::LOG_FILE)
        .with_context(|| format!("failed to create log file {}", config::LOG_FILE))?;
    Builder::from_env(Env::default().default_filter_or(config::LOG_LEVEL))
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .context("failed to install logger")?;
    Ok(())
}
