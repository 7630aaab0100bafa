use std::path::PathBuf;

use featurize::UnseenPolicy;

/// Serving configuration, resolved once at startup: compiled defaults,
/// then the optional TOML file, then `SCOUT_*` environment overrides.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub bind_addr: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub encoders_path: PathBuf,
    pub unseen_policy: UnseenPolicy,
}

impl ServeConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}
