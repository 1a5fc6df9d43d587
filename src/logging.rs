//! `log` set-up. The terminal UI owns stderr while it runs, so it logs to a
//! file; the headless commands log to stderr.

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use std::fs::OpenOptions;
use std::path::PathBuf;

pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Installs the global logger. `RUST_LOG` wins over `default_filter`.
pub fn init(default_filter: &str, target: LogTarget) -> Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter));

    if let LogTarget::File(path) = &target {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("logger already initialised")?;
    Ok(())
}
