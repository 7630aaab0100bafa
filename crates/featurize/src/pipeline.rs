//! The feature-normalization pipeline: raw attribute bag in, ordered
//! numeric vector out.
//!
//! ```text
//! AttributeBag ─→ resolve ─→ derive ─→ coerce/encode per column ─→ Vec<f64>
//! ```
//!
//! The emitted vector always matches the schema's length and order exactly,
//! or the request fails with a diagnosable error. Open-world input never
//! panics the pipeline: missing and garbage numerics default to 0, absent
//! categoricals fall back to sentinels, and only the configured unseen
//! policy can reject a request.

use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::bag::AttributeBag;
use crate::derive::derive_row;
use crate::encoders::{EncodeError, EncoderRegistry};
use crate::schema::{FeatureKind, FeatureSchema};

#[derive(Debug)]
pub enum PipelineError {
    /// The model artifact recorded no training columns; no vector can be
    /// assembled. A deployment fault, not a request fault.
    SchemaUnavailable,
    /// Strict-policy rejection of an out-of-vocabulary categorical value.
    UnseenCategory { feature: String, value: String },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaUnavailable => {
                write!(f, "model artifact exposes no recorded training columns")
            }
            Self::UnseenCategory { feature, value } => {
                write!(f, "unseen category '{}' for feature '{}'", value, feature)
            }
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<EncodeError> for PipelineError {
    fn from(value: EncodeError) -> Self {
        match value {
            EncodeError::UnseenCategory { feature, value } => {
                Self::UnseenCategory { feature, value }
            }
        }
    }
}

/// Owns the canonical schema and the encoder registry; turns one raw
/// request into the ordered vector the model expects.
#[derive(Debug)]
pub struct FeaturePipeline {
    schema: FeatureSchema,
    registry: EncoderRegistry,
}

impl FeaturePipeline {
    pub fn new(schema: FeatureSchema, registry: EncoderRegistry) -> Self {
        Self { schema, registry }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn registry(&self) -> &EncoderRegistry {
        &self.registry
    }

    /// Assemble the encoded vector for one request, in schema order.
    pub fn vectorize(&self, bag: &AttributeBag) -> Result<Vec<f64>, PipelineError> {
        if self.schema.is_empty() {
            return Err(PipelineError::SchemaUnavailable);
        }

        let presence = self.schema.resolve(bag);
        debug!(
            columns = self.schema.len(),
            absent = presence.absent_count(),
            "resolved request against schema"
        );

        let row = derive_row(&self.schema, bag);
        let mut vector = Vec::with_capacity(self.schema.len());
        for spec in self.schema.iter() {
            match spec.kind {
                FeatureKind::Numeric => {
                    vector.push(coerce_numeric(row.get(&spec.name)));
                }
                FeatureKind::Categorical => {
                    let raw = categorical_value(row.get(&spec.name));
                    let raw = raw.as_deref().unwrap_or_else(|| spec.default_category());
                    let code = self.registry.encode(&spec.name, raw)?;
                    vector.push(code as f64);
                }
            }
        }
        Ok(vector)
    }
}

/// Lenient numeric coercion: JSON numbers and numeric strings pass
/// through; everything else (missing, null, garbage text) defaults to 0.
fn coerce_numeric(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// String form of a categorical raw value. Numbers are accepted in their
/// display form; other shapes are treated as absent.
fn categorical_value(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}
