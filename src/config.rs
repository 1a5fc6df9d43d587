use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::Catalog;
use crate::scrape::DEFAULT_DELAY;

const APP_DIR: &str = "biblehub-scraper";
const DELAY_ENV: &str = "BIBLEHUB_DELAY_MS";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Simulated scrape delay in milliseconds
    pub delay_ms: Option<u64>,
    /// JSON catalog replacing the built-in reference lists
    pub catalog_path: Option<PathBuf>,
    /// Default log filter, e.g. "info" or "biblehub_scraper=debug"
    pub log_level: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the user config; a missing file yields defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = serde_json::from_str(&config_content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Loads `path` (or the user config) for a run of the form or the CLI.
    ///
    /// The form still opens over a broken file: defaults are used and the
    /// load error is handed back so it can be logged once logging is up.
    /// Headless commands fail instead.
    pub fn load_for_run(
        path: Option<&Path>,
        interactive: bool,
    ) -> Result<(Self, Option<anyhow::Error>)> {
        let loaded = match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        };
        match loaded {
            Ok(config) => Ok((config, None)),
            Err(e) if interactive => Ok((Self::new(), Some(e))),
            Err(e) => Err(e),
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    /// Scrape delay: environment first, then config, then the default.
    pub fn delay(&self) -> Duration {
        self.delay_with_override(std::env::var(DELAY_ENV).ok().as_deref())
    }

    fn delay_with_override(&self, env_value: Option<&str>) -> Duration {
        env_value
            .and_then(|v| v.trim().parse::<u64>().ok())
            .or(self.delay_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_DELAY)
    }

    /// The configured catalog, or the built-in one.
    pub async fn catalog(&self) -> Result<Arc<Catalog>> {
        match &self.catalog_path {
            Some(path) => {
                let catalog = Catalog::load_from_json(path)
                    .await
                    .with_context(|| format!("loading catalog {}", path.display()))?;
                Ok(Arc::new(catalog))
            }
            None => Ok(Arc::new(Catalog::default())),
        }
    }

    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join(APP_DIR))
    }

    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }
}
