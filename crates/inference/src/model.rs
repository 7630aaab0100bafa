//! The trained model artifact.
//!
//! The serving pipeline treats the model as an opaque collaborator behind
//! the [`Model`] trait: it must classify a vector, and may additionally
//! expose class probabilities, per-feature importances, and the ordered
//! column list it was trained on. The concrete artifact shipped with the
//! service is a linear-logit model distributed as JSON — fully
//! interpretable, deterministic, validated on load, trained offline (the
//! Rust runtime performs only inference).

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// External-collaborator contract for a trained classifier.
pub trait Model: Send + Sync {
    /// Classify one encoded vector. The label is the sole required output.
    fn predict(&self, vector: &[f64]) -> Result<i64, ModelError>;

    /// Per-class probabilities, when the model supports them.
    fn predict_proba(&self, vector: &[f64]) -> Option<Vec<f64>> {
        let _ = vector;
        None
    }

    /// Per-feature importance weights, when the model exposes them.
    fn feature_importances(&self) -> Option<Vec<f64>> {
        None
    }

    /// The ordered column list recorded at training time, when available.
    fn training_columns(&self) -> Option<Vec<String>> {
        None
    }
}

/// Serializable linear-logit artifact — loaded from JSON at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearLogitModel {
    /// Human-readable model identifier.
    pub model_id: String,
    /// Semantic version of the trained artifact.
    pub model_version: String,
    /// Weight vector, one entry per recorded feature column.
    pub weights: Vec<f64>,
    /// Bias (intercept) term.
    pub bias: f64,
    /// Decision threshold: probability ≥ threshold → label 1.
    pub threshold: f64,
    /// The ordered training columns; drives the serving schema.
    #[serde(default)]
    pub feature_names: Vec<String>,
}

impl LinearLogitModel {
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_str(json).map_err(ModelError::ParseJson)?;
        model.validate()?;
        Ok(model)
    }

    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path).map_err(ModelError::Io)?;
        Self::from_json(&content)
    }

    /// Validate that the artifact is structurally sound.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.feature_names.is_empty() && self.weights.len() != self.feature_names.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.feature_names.len(),
                got: self.weights.len(),
            });
        }
        if self.threshold < 0.0 || self.threshold > 1.0 {
            return Err(ModelError::InvalidThreshold(self.threshold));
        }
        for (i, &w) in self.weights.iter().enumerate() {
            if !w.is_finite() {
                return Err(ModelError::NonFiniteWeight { index: i, value: w });
            }
        }
        if !self.bias.is_finite() {
            return Err(ModelError::NonFiniteBias(self.bias));
        }
        Ok(())
    }

    /// Positive-class probability for one vector.
    fn probability(&self, vector: &[f64]) -> Result<f64, ModelError> {
        if vector.len() != self.weights.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.weights.len(),
                got: vector.len(),
            });
        }
        Ok(sigmoid(dot(&self.weights, vector) + self.bias))
    }
}

impl Model for LinearLogitModel {
    fn predict(&self, vector: &[f64]) -> Result<i64, ModelError> {
        let p = self.probability(vector)?;
        Ok(if p >= self.threshold { 1 } else { 0 })
    }

    fn predict_proba(&self, vector: &[f64]) -> Option<Vec<f64>> {
        self.probability(vector).ok().map(|p| vec![1.0 - p, p])
    }

    fn feature_importances(&self) -> Option<Vec<f64>> {
        Some(self.weights.iter().map(|w| w.abs()).collect())
    }

    fn training_columns(&self) -> Option<Vec<String>> {
        if self.feature_names.is_empty() {
            None
        } else {
            Some(self.feature_names.clone())
        }
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(ai, bi)| ai * bi).sum()
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let ez = z.exp();
        ez / (1.0 + ez)
    }
}

#[derive(Debug)]
pub enum ModelError {
    DimensionMismatch { expected: usize, got: usize },
    InvalidThreshold(f64),
    NonFiniteWeight { index: usize, value: f64 },
    NonFiniteBias(f64),
    ParseJson(serde_json::Error),
    Io(std::io::Error),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DimensionMismatch { expected, got } => {
                write!(f, "vector dimension mismatch: expected {}, got {}", expected, got)
            }
            Self::InvalidThreshold(t) => write!(f, "threshold {} not in [0, 1]", t),
            Self::NonFiniteWeight { index, value } => {
                write!(f, "non-finite weight at index {}: {}", index, value)
            }
            Self::NonFiniteBias(b) => write!(f, "non-finite bias: {}", b),
            Self::ParseJson(err) => write!(f, "model JSON parse error: {}", err),
            Self::Io(err) => write!(f, "model file io error: {}", err),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ParseJson(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}
