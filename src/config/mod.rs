use crate::server::RequestsLoggingLevel;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI arguments that take part in config resolution. Mirrors the flags that
/// a TOML file can override.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub port: u16,
    pub clusters: usize,
    pub sample_seed: Option<u64>,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
}

/// Optional TOML config file; every field falls back to the CLI value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub port: Option<u16>,
    pub clusters: Option<usize>,
    pub sample_seed: Option<u64>,
    pub frontend_dir_path: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<FileConfig> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file at {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Malformed config file at {}", path.display()))
    }
}

/// The resolved application configuration, file values overriding CLI ones.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub port: u16,
    pub clusters: usize,
    pub sample_seed: Option<u64>,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
}

impl AppConfig {
    pub fn resolve(cli: &CliConfig, file: Option<FileConfig>) -> AppConfig {
        let file = file.unwrap_or_default();
        AppConfig {
            data_dir: cli.data_dir.clone(),
            port: file.port.unwrap_or(cli.port),
            clusters: file.clusters.unwrap_or(cli.clusters),
            sample_seed: file.sample_seed.or(cli.sample_seed),
            logging_level: cli.logging_level.clone(),
            frontend_dir_path: file.frontend_dir_path.or_else(|| cli.frontend_dir_path.clone()),
        }
    }
}
