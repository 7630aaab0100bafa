//! Synthesis of derived columns from composite raw fields.
//!
//! Two rules cover the model's derived columns: a composite split (one
//! delimiter-separated field into two sub-fields) and a multi-value
//! expansion (one free-text list into per-token indicator columns).

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::bag::AttributeBag;
use crate::schema::{FeatureKind, FeatureSchema, TRAIT_PREFIX};

/// Composite source field holding "attacking/ defensive" rates.
pub const WORK_RATE_FIELD: &str = "work_rate";
pub const ATTACKING_WORK_RATE: &str = "attacking_work_rate";
pub const DEFENSIVE_WORK_RATE: &str = "defensive_work_rate";
/// Category both sub-fields take when the composite field is absent.
pub const WORK_RATE_DEFAULT: &str = "Medium";

/// Free-text multi-value source field expanded into `trait_*` indicators.
pub const TRAITS_FIELD: &str = "player_traits";
pub const TRAIT_PRESENT: &str = "present";
pub const TRAIT_ABSENT: &str = "absent";

/// Intermediate mapping from canonical feature name to its raw,
/// pre-encoding value. After `derive_row` it holds every schema name, with
/// defaults and sentinels already in place for absent inputs.
#[derive(Debug, Clone, Default)]
pub struct DerivedRow {
    values: HashMap<String, Value>,
}

impl DerivedRow {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn insert(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }
}

/// Split a composite rate field into its two sub-values.
///
/// Both halves are trimmed. A field without the delimiter duplicates the
/// single value into both sub-fields; an absent field yields the fixed
/// default for both.
pub fn split_work_rate(raw: Option<&str>) -> (String, String) {
    let Some(raw) = raw else {
        return (WORK_RATE_DEFAULT.to_string(), WORK_RATE_DEFAULT.to_string());
    };
    match raw.split_once('/') {
        Some((attacking, defensive)) => {
            (attacking.trim().to_string(), defensive.trim().to_string())
        }
        None => {
            let single = raw.trim().to_string();
            (single.clone(), single)
        }
    }
}

/// Parse the free-text multi-value field into its set of trimmed,
/// non-empty tokens. An absent field is an empty set.
pub fn parse_traits(raw: Option<&str>) -> HashSet<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Produce the complete derived row for one request: every schema column
/// gets a value — taken from the request, synthesized from a composite
/// field, or defaulted.
pub fn derive_row(schema: &FeatureSchema, bag: &AttributeBag) -> DerivedRow {
    let (attacking, defensive) = split_work_rate(bag.str_field(WORK_RATE_FIELD));
    let traits = parse_traits(bag.str_field(TRAITS_FIELD));

    let mut row = DerivedRow::default();
    for spec in schema.iter() {
        if spec.is_trait_indicator() {
            if bag.contains(TRAITS_FIELD) {
                let trait_name = &spec.name[TRAIT_PREFIX.len()..];
                let literal = if traits.contains(trait_name) {
                    TRAIT_PRESENT
                } else {
                    TRAIT_ABSENT
                };
                row.insert(&spec.name, Value::String(literal.to_string()));
            } else if let Some(value) = bag.value(&spec.name) {
                // No free-text field, but the indicator itself was supplied.
                row.insert(&spec.name, value.clone());
            } else {
                row.insert(&spec.name, Value::String(TRAIT_ABSENT.to_string()));
            }
        } else if spec.name == ATTACKING_WORK_RATE {
            row.insert(&spec.name, Value::String(attacking.clone()));
        } else if spec.name == DEFENSIVE_WORK_RATE {
            row.insert(&spec.name, Value::String(defensive.clone()));
        } else if let Some(value) = bag.value(&spec.name) {
            row.insert(&spec.name, value.clone());
        } else {
            let default = match spec.kind {
                FeatureKind::Numeric => Value::Null,
                FeatureKind::Categorical => Value::String(spec.default_category().to_string()),
            };
            row.insert(&spec.name, default);
        }
    }
    row
}
