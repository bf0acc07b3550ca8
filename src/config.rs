// src/config.rs

use crate::cli::Cli;
use crate::types::DEFAULT_LINK_BASE;
use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CrtShConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,  // Attempts after the first one
    #[serde(default = "default_link_base")]
    pub link_base: String,
}

fn default_base_url() -> String { "https://crt.sh".to_string() }
fn default_timeout_secs() -> u64 { 30 }
fn default_max_retries() -> u32 { 4 }
fn default_link_base() -> String { DEFAULT_LINK_BASE.to_string() }

impl Default for CrtShConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            link_base: default_link_base(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub crtsh: CrtShConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(cfg)
    }

    /// Load from `path` if one was given, else use defaults
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// CLI flags win over file values, which win over defaults
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(timeout) = cli.timeout {
            self.crtsh.timeout_secs = timeout;
        }
        if let Some(retries) = cli.retries {
            self.crtsh.max_retries = retries;
        }
        if let Some(level) = cli.log_level_override() {
            self.logging.level = level.to_string();
        }
    }
}
