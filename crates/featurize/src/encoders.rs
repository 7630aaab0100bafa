//! Categorical encoders trained on a closed vocabulary, plus the policy
//! for values that vocabulary has never seen.
//!
//! The registry is shared, read-mostly state across all requests. The only
//! mutation is permissive vocabulary extension, implemented as an atomic
//! get-or-assign: the write lock is taken, membership is re-checked, and
//! only then is the value appended — so two requests racing on the same
//! unseen value observe the same code, and codes of known entries never
//! move.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// How to handle a categorical value outside an encoder's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnseenPolicy {
    /// Fail the request, naming the feature and the offending value.
    Reject,
    /// Extend the vocabulary with a new stable code and proceed.
    Extend,
}

/// A fixed-vocabulary value → integer code mapping learned at training
/// time. The code of a value is its index in `classes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    pub fn code_of(&self, value: &str) -> Option<i64> {
        self.classes.iter().position(|c| c == value).map(|i| i as i64)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.classes.iter().any(|c| c == value)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[derive(Debug)]
pub enum EncodeError {
    UnseenCategory { feature: String, value: String },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnseenCategory { feature, value } => {
                write!(f, "unseen category '{}' for feature '{}'", value, feature)
            }
        }
    }
}

impl std::error::Error for EncodeError {}

#[derive(Debug)]
pub enum RegistryLoadError {
    Io(std::io::Error),
    ParseJson(serde_json::Error),
}

impl fmt::Display for RegistryLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "encoder file io error: {}", err),
            Self::ParseJson(err) => write!(f, "encoder JSON parse error: {}", err),
        }
    }
}

impl std::error::Error for RegistryLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::ParseJson(err) => Some(err),
        }
    }
}

/// In-memory mapping from categorical feature name to its encoder.
pub struct EncoderRegistry {
    encoders: RwLock<HashMap<String, LabelEncoder>>,
    policy: UnseenPolicy,
}

impl EncoderRegistry {
    pub fn new(encoders: HashMap<String, LabelEncoder>, policy: UnseenPolicy) -> Self {
        Self {
            encoders: RwLock::new(encoders),
            policy,
        }
    }

    /// Load the encoder artifact: a JSON object mapping feature name to
    /// `{"classes": [...]}`.
    pub fn from_json(json: &str, policy: UnseenPolicy) -> Result<Self, RegistryLoadError> {
        let encoders: HashMap<String, LabelEncoder> =
            serde_json::from_str(json).map_err(RegistryLoadError::ParseJson)?;
        Ok(Self::new(encoders, policy))
    }

    pub fn from_file(path: &Path, policy: UnseenPolicy) -> Result<Self, RegistryLoadError> {
        let content = std::fs::read_to_string(path).map_err(RegistryLoadError::Io)?;
        Self::from_json(&content, policy)
    }

    pub fn policy(&self) -> UnseenPolicy {
        self.policy
    }

    /// Names of every feature with a registered encoder.
    pub fn encoded_names(&self) -> HashSet<String> {
        self.read().keys().cloned().collect()
    }

    /// Vocabulary snapshot for one feature.
    pub fn classes(&self, feature: &str) -> Option<Vec<String>> {
        self.read().get(feature).map(|e| e.classes.clone())
    }

    /// Encode one categorical value.
    ///
    /// A feature without a registered encoder is a configuration gap, not a
    /// request error: it encodes to 0 with a diagnostic. An in-vocabulary
    /// value encodes to its index. An unseen value follows the registry's
    /// policy.
    pub fn encode(&self, feature: &str, value: &str) -> Result<i64, EncodeError> {
        {
            let guard = self.read();
            match guard.get(feature) {
                None => {
                    warn!(feature, "no encoder registered; defaulting to code 0");
                    return Ok(0);
                }
                Some(encoder) => {
                    if let Some(code) = encoder.code_of(value) {
                        return Ok(code);
                    }
                }
            }
        }

        match self.policy {
            UnseenPolicy::Reject => Err(EncodeError::UnseenCategory {
                feature: feature.to_string(),
                value: value.to_string(),
            }),
            UnseenPolicy::Extend => Ok(self.get_or_assign(feature, value)),
        }
    }

    /// Atomic get-or-assign under the write lock. Re-checks membership so a
    /// racing extension of the same value yields one code, and appends so
    /// existing codes are never renumbered.
    fn get_or_assign(&self, feature: &str, value: &str) -> i64 {
        let mut guard = self
            .encoders
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let Some(encoder) = guard.get_mut(feature) else {
            warn!(feature, "no encoder registered; defaulting to code 0");
            return 0;
        };
        if let Some(code) = encoder.code_of(value) {
            return code;
        }
        encoder.classes.push(value.to_string());
        warn!(feature, value, code = encoder.classes.len() - 1, "extended encoder vocabulary");
        (encoder.classes.len() - 1) as i64
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, LabelEncoder>> {
        self.encoders
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for EncoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncoderRegistry")
            .field("features", &self.read().len())
            .field("policy", &self.policy)
            .finish()
    }
}
