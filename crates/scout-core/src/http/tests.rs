use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use featurize::{
    EncoderRegistry, FeaturePipeline, FeatureSchema, LabelEncoder, PipelineError, UnseenPolicy,
};
use inference::{LinearLogitModel, Model, ModelError};

use super::{label_message, predict, router, ApiError};
use crate::state::ServerState;

fn encoders() -> HashMap<String, LabelEncoder> {
    let mut map = HashMap::new();
    map.insert(
        "preferred_foot".to_string(),
        LabelEncoder::new(vec!["Left".to_string(), "Right".to_string()]),
    );
    for feature in ["attacking_work_rate", "defensive_work_rate"] {
        map.insert(
            feature.to_string(),
            LabelEncoder::new(vec![
                "High".to_string(),
                "Low".to_string(),
                "Medium".to_string(),
            ]),
        );
    }
    map.insert(
        "trait_Finesse Shot".to_string(),
        LabelEncoder::new(vec!["absent".to_string(), "present".to_string()]),
    );
    map
}

fn linear_model() -> LinearLogitModel {
    LinearLogitModel {
        model_id: "scout-test-v1".to_string(),
        model_version: "1.0.0".to_string(),
        weights: vec![0.01, 0.02, 0.03, 0.01, 0.1, 0.05, 0.05, 0.2],
        bias: -3.0,
        threshold: 0.5,
        feature_names: [
            "age",
            "pace",
            "shooting",
            "passing",
            "preferred_foot",
            "attacking_work_rate",
            "defensive_work_rate",
            "trait_Finesse Shot",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    }
}

fn state(policy: UnseenPolicy) -> ServerState {
    let registry = EncoderRegistry::new(encoders(), policy);
    let model = linear_model();
    let schema =
        FeatureSchema::from_training_columns(&model.feature_names, &registry.encoded_names());
    ServerState::new(
        Box::new(model),
        "scout-test-v1".to_string(),
        "1.0.0".to_string(),
        FeaturePipeline::new(schema, registry),
    )
}

/// A model that only classifies — no probabilities, no importances.
struct BareModel;

impl Model for BareModel {
    fn predict(&self, _vector: &[f64]) -> Result<i64, ModelError> {
        Ok(0)
    }
}

fn bare_state() -> ServerState {
    let registry = EncoderRegistry::new(encoders(), UnseenPolicy::Reject);
    let schema = FeatureSchema::from_training_columns(
        &linear_model().feature_names,
        &registry.encoded_names(),
    );
    ServerState::new(
        Box::new(BareModel),
        "bare-v1".to_string(),
        "0.0.1".to_string(),
        FeaturePipeline::new(schema, registry),
    )
}

fn full_request() -> serde_json::Value {
    json!({
        "age": 25,
        "pace": 80,
        "shooting": 74,
        "passing": 68,
        "preferred_foot": "Right",
        "work_rate": "High/ Medium",
        "player_traits": "Leadership, Finesse Shot",
    })
}

#[test]
fn empty_payload_is_a_request_error() {
    let state = state(UnseenPolicy::Reject);
    let err = predict(&state, json!({})).unwrap_err();
    assert!(matches!(err, ApiError::EmptyBody));
    assert_eq!(err.status(), 400);

    let err = predict(&state, json!("not an object")).unwrap_err();
    assert_eq!(err.status(), 400);
}

#[test]
fn strict_unseen_category_maps_to_400_naming_the_value() {
    let state = state(UnseenPolicy::Reject);
    let mut request = full_request();
    request["work_rate"] = json!("Frantic/ Medium");

    let err = predict(&state, request).unwrap_err();
    assert_eq!(err.status(), 400);
    let msg = err.to_string();
    assert!(msg.contains("attacking_work_rate"), "{}", msg);
    assert!(msg.contains("Frantic"), "{}", msg);
    // The rejection must not have mutated the shared vocabulary.
    assert_eq!(
        state
            .pipeline()
            .registry()
            .classes("attacking_work_rate")
            .unwrap()
            .len(),
        3
    );
}

#[test]
fn missing_schema_maps_to_500() {
    let registry = EncoderRegistry::new(encoders(), UnseenPolicy::Reject);
    let state = ServerState::new(
        Box::new(linear_model()),
        "scout-test-v1".to_string(),
        "1.0.0".to_string(),
        FeaturePipeline::new(FeatureSchema::default(), registry),
    );

    let err = predict(&state, full_request()).unwrap_err();
    assert!(matches!(
        err,
        ApiError::Pipeline(PipelineError::SchemaUnavailable)
    ));
    assert_eq!(err.status(), 500);
}

#[test]
fn end_to_end_prediction_with_full_model() {
    let state = state(UnseenPolicy::Reject);
    let response = predict(&state, full_request()).unwrap();

    assert!(response.prediction == 0 || response.prediction == 1);
    assert_eq!(response.message, label_message(response.prediction));

    let proba = response.probability.expect("linear model exposes proba");
    let sum: f64 = proba.iter().sum();
    assert!((sum - 1.0).abs() < 1e-9, "probabilities sum to {}", sum);

    let overall = response
        .overall_calculated
        .expect("skill columns carry importance weight");
    // Renormalized weights over pace/shooting/passing; the score stays
    // inside the span of the skill values.
    assert!(overall >= 68.0 && overall <= 80.0, "overall {}", overall);
}

#[test]
fn optional_keys_are_absent_for_a_bare_model() {
    let state = bare_state();
    let response = predict(&state, full_request()).unwrap();
    assert!(response.probability.is_none());
    assert!(response.overall_calculated.is_none());

    let value = serde_json::to_value(&response).unwrap();
    let object = value.as_object().unwrap();
    assert!(object.contains_key("prediction"));
    assert!(object.contains_key("message"));
    assert!(!object.contains_key("probability"));
    assert!(
        !object.contains_key("overall_calculated"),
        "uncomputable score must be omitted, not zero"
    );
}

#[test]
fn permissive_state_accepts_unseen_values() {
    let state = state(UnseenPolicy::Extend);
    let mut request = full_request();
    request["preferred_foot"] = json!("Both");

    let first = predict(&state, request.clone()).unwrap();
    let second = predict(&state, request).unwrap();
    assert_eq!(first.prediction, second.prediction);
    assert!(state
        .pipeline()
        .registry()
        .classes("preferred_foot")
        .unwrap()
        .contains(&"Both".to_string()));
}

#[test]
fn router_builds_with_shared_state() {
    let _app = router(Arc::new(state(UnseenPolicy::Reject)));
}

#[test]
fn label_messages_cover_both_classes() {
    assert_ne!(label_message(0), label_message(1));
}
