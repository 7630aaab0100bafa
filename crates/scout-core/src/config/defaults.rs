use std::path::PathBuf;

use featurize::UnseenPolicy;

use super::types::ServeConfig;

pub(super) const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
pub(super) const DEFAULT_PORT: u16 = 5000;
pub(super) const DEFAULT_MODEL_PATH: &str = "models/model.json";
pub(super) const DEFAULT_ENCODERS_PATH: &str = "models/encoders.json";
pub(super) const DEFAULT_CONFIG_FILE: &str = "scout.toml";

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            encoders_path: PathBuf::from(DEFAULT_ENCODERS_PATH),
            unseen_policy: UnseenPolicy::Reject,
        }
    }
}
