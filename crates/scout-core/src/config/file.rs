use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

use super::defaults::DEFAULT_CONFIG_FILE;
use super::types::ServeConfig;
use super::util::{env_non_empty, parse_policy};

/// On-disk configuration shape; every field optional so a file only
/// overrides what it names.
#[derive(Debug, Default, Deserialize)]
pub(super) struct FileConfig {
    pub(super) bind_addr: Option<String>,
    pub(super) port: Option<u16>,
    pub(super) model_path: Option<PathBuf>,
    pub(super) encoders_path: Option<PathBuf>,
    pub(super) unseen_policy: Option<String>,
}

impl ServeConfig {
    pub(super) fn apply_file_config(&mut self) -> Result<()> {
        // An explicitly named file must load; the default path is optional.
        if let Some(path) = env_non_empty("SCOUT_CONFIG") {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config file {}", path))?;
            let file: FileConfig = toml::from_str(&content)
                .with_context(|| format!("parsing config file {}", path))?;
            self.merge_file(file);
            return Ok(());
        }

        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        if !default.exists() {
            return Ok(());
        }
        let content = std::fs::read_to_string(&default)
            .with_context(|| format!("reading config file {}", default.display()))?;
        let file: FileConfig = toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", default.display()))?;
        self.merge_file(file);
        Ok(())
    }

    pub(super) fn merge_file(&mut self, file: FileConfig) {
        if let Some(v) = file.bind_addr {
            self.bind_addr = v;
        }
        if let Some(v) = file.port {
            self.port = v;
        }
        if let Some(v) = file.model_path {
            self.model_path = v;
        }
        if let Some(v) = file.encoders_path {
            self.encoders_path = v;
        }
        if let Some(v) = file.unseen_policy {
            match parse_policy(&v) {
                Some(policy) => self.unseen_policy = policy,
                None => warn!(policy = %v, "unrecognized unseen-category policy in config file"),
            }
        }
    }
}
