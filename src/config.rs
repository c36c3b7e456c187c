use crate::logging::LoggingConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "ASISTENCIAD_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    /// Where the logged-in user is persisted. Memory-only when unset.
    pub session_file: Option<PathBuf>,
    /// Start with the demo roster loaded.
    pub seed_sample_students: bool,
    pub excel_template_blank_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            session_file: None,
            seed_sample_students: true,
            excel_template_blank_rows: 3,
        }
    }
}

impl Config {
    /// Reads the file named by `ASISTENCIAD_CONFIG`, or returns defaults.
    pub fn load() -> anyhow::Result<Config> {
        match std::env::var_os(CONFIG_ENV) {
            Some(p) if !p.is_empty() => Config::from_file(Path::new(&p)),
            _ => Ok(Config::default()),
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Config> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.to_string_lossy()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("config {} is invalid", path.to_string_lossy()))
    }
}
