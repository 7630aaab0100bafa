use std::path::PathBuf;

use tracing::warn;

use super::types::ServeConfig;
use super::util::{env_non_empty, parse_policy};

impl ServeConfig {
    pub(super) fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_with(env_non_empty);
    }

    pub(super) fn apply_env_overrides_with(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(v) = get("SCOUT_BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Some(v) = get("SCOUT_PORT") {
            match v.parse::<u16>() {
                Ok(port) => self.port = port,
                Err(_) => warn!(port = %v, "unparseable SCOUT_PORT; keeping current"),
            }
        }
        if let Some(v) = get("SCOUT_MODEL_PATH") {
            self.model_path = PathBuf::from(v);
        }
        if let Some(v) = get("SCOUT_ENCODERS_PATH") {
            self.encoders_path = PathBuf::from(v);
        }
        if let Some(v) = get("SCOUT_UNSEEN_POLICY") {
            match parse_policy(&v) {
                Some(policy) => self.unseen_policy = policy,
                None => warn!(policy = %v, "unrecognized SCOUT_UNSEEN_POLICY; keeping current"),
            }
        }
    }
}
