//! Assembles the per-request prediction result: model label, optional
//! class probabilities, and the optional auxiliary skill score.

use tracing::debug;

use crate::model::{Model, ModelError};

/// Numeric skill columns that feed the auxiliary score, when present in
/// the schema.
pub const SKILL_COLUMNS: [&str; 6] = [
    "pace",
    "shooting",
    "passing",
    "dribbling",
    "defending",
    "physic",
];

/// Constructed per request, never persisted.
#[derive(Debug, Clone)]
pub struct PredictionResult {
    pub label: i64,
    pub probabilities: Option<Vec<f64>>,
    /// Importance-weighted skill score; `None` when not computable, which
    /// is distinct from a computed 0.0.
    pub auxiliary_score: Option<f64>,
}

/// Run the model over one encoded vector.
pub fn invoke(
    model: &dyn Model,
    columns: &[String],
    vector: &[f64],
) -> Result<PredictionResult, ModelError> {
    let label = model.predict(vector)?;
    let probabilities = model.predict_proba(vector);
    let auxiliary_score = model
        .feature_importances()
        .and_then(|importances| auxiliary_score(columns, &importances, vector));

    debug!(
        label,
        has_proba = probabilities.is_some(),
        has_auxiliary = auxiliary_score.is_some(),
        "model invoked"
    );

    Ok(PredictionResult {
        label,
        probabilities,
        auxiliary_score,
    })
}

/// Weighted linear combination of the skill subset, with the model's
/// importance weights restricted to that subset and renormalized to sum
/// to 1. Returns `None` when the restricted weights sum to zero — an
/// uncomputable score is omitted rather than reported as 0.
pub fn auxiliary_score(columns: &[String], importances: &[f64], vector: &[f64]) -> Option<f64> {
    let mut total_weight = 0.0;
    let mut weighted_sum = 0.0;
    for (i, name) in columns.iter().enumerate() {
        if !SKILL_COLUMNS.contains(&name.as_str()) {
            continue;
        }
        let weight = importances.get(i).copied().unwrap_or(0.0);
        let value = vector.get(i).copied().unwrap_or(0.0);
        total_weight += weight;
        weighted_sum += weight * value;
    }
    if total_weight <= 0.0 {
        None
    } else {
        Some(weighted_sum / total_weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LinearLogitModel;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    /// A model that only classifies — no probabilities, no importances.
    struct BareModel;

    impl Model for BareModel {
        fn predict(&self, _vector: &[f64]) -> Result<i64, ModelError> {
            Ok(1)
        }
    }

    #[test]
    fn auxiliary_score_renormalizes_subset_weights() {
        let cols = columns(&["age", "pace", "shooting"]);
        // Restricted weights: pace 1.0, shooting 3.0 → normalized 0.25/0.75.
        let score = auxiliary_score(&cols, &[9.0, 1.0, 3.0], &[30.0, 80.0, 60.0]).unwrap();
        assert!((score - (0.25 * 80.0 + 0.75 * 60.0)).abs() < 1e-12);
    }

    #[test]
    fn auxiliary_score_is_none_for_zero_sum_weights() {
        let cols = columns(&["age", "pace", "shooting"]);
        assert_eq!(
            auxiliary_score(&cols, &[5.0, 0.0, 0.0], &[30.0, 80.0, 60.0]),
            None
        );
    }

    #[test]
    fn auxiliary_score_is_none_without_skill_columns() {
        let cols = columns(&["age", "preferred_foot"]);
        assert_eq!(auxiliary_score(&cols, &[1.0, 1.0], &[30.0, 1.0]), None);
    }

    #[test]
    fn invoke_omits_optional_outputs_for_bare_model() {
        let cols = columns(&["pace"]);
        let result = invoke(&BareModel, &cols, &[80.0]).unwrap();
        assert_eq!(result.label, 1);
        assert!(result.probabilities.is_none());
        assert!(result.auxiliary_score.is_none());
    }

    #[test]
    fn invoke_carries_probabilities_and_score_for_full_model() {
        let model = LinearLogitModel {
            model_id: "scout-test-v1".to_string(),
            model_version: "1.0.0".to_string(),
            weights: vec![0.02, 0.03],
            bias: -2.0,
            threshold: 0.5,
            feature_names: vec!["pace".to_string(), "shooting".to_string()],
        };
        let cols = model.training_columns().unwrap();
        let result = invoke(&model, &cols, &[80.0, 60.0]).unwrap();
        let proba = result.probabilities.expect("linear model exposes proba");
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
        let score = result.auxiliary_score.expect("skill columns present");
        // |weights| 0.02/0.03 → normalized 0.4/0.6 over pace/shooting.
        assert!((score - (0.4 * 80.0 + 0.6 * 60.0)).abs() < 1e-9);
    }
}
