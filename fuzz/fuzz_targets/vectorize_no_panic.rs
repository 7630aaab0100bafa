#![no_main]

use std::collections::HashMap;

use featurize::{
    AttributeBag, EncoderRegistry, FeaturePipeline, FeatureSchema, LabelEncoder, UnseenPolicy,
};
use libfuzzer_sys::fuzz_target;
use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};

static PIPELINE: Lazy<FeaturePipeline> = Lazy::new(|| {
    let columns: Vec<String> = [
        "age",
        "pace",
        "shooting",
        "preferred_foot",
        "attacking_work_rate",
        "defensive_work_rate",
        "trait_Finesse Shot",
        "trait_Leadership",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let mut encoders = HashMap::new();
    encoders.insert(
        "preferred_foot".to_string(),
        LabelEncoder::new(vec!["Left".to_string(), "Right".to_string()]),
    );
    for feature in ["attacking_work_rate", "defensive_work_rate"] {
        encoders.insert(
            feature.to_string(),
            LabelEncoder::new(vec![
                "High".to_string(),
                "Low".to_string(),
                "Medium".to_string(),
            ]),
        );
    }
    for feature in ["trait_Finesse Shot", "trait_Leadership"] {
        encoders.insert(
            feature.to_string(),
            LabelEncoder::new(vec!["absent".to_string(), "present".to_string()]),
        );
    }

    let registry = EncoderRegistry::new(encoders, UnseenPolicy::Extend);
    let schema = FeatureSchema::from_training_columns(&columns, &registry.encoded_names());
    FeaturePipeline::new(schema, registry)
});

fn bounded_text(data: &[u8], offset: usize, len: usize) -> String {
    let start = offset.min(data.len());
    let end = (start + len).min(data.len());
    String::from_utf8_lossy(&data[start..end]).to_string()
}

fuzz_target!(|data: &[u8]| {
    let mut fields = Map::new();
    fields.insert(
        "age".to_string(),
        json!(data.first().copied().unwrap_or_default()),
    );
    fields.insert(
        "pace".to_string(),
        Value::String(bounded_text(data, 1, 8)),
    );
    fields.insert(
        "work_rate".to_string(),
        Value::String(bounded_text(data, 9, 24)),
    );
    fields.insert(
        "player_traits".to_string(),
        Value::String(bounded_text(data, 33, 64)),
    );
    fields.insert(
        "preferred_foot".to_string(),
        Value::String(bounded_text(data, 97, 12)),
    );

    let bag = AttributeBag::from_map(fields);
    let vector = PIPELINE
        .vectorize(&bag)
        .expect("permissive pipeline never rejects");
    assert_eq!(vector.len(), PIPELINE.schema().len());
});
