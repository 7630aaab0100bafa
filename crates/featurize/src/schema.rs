use std::collections::HashSet;

use crate::bag::AttributeBag;
use crate::derive::{ATTACKING_WORK_RATE, DEFENSIVE_WORK_RATE, TRAITS_FIELD, WORK_RATE_FIELD};

/// Prefix marking indicator columns expanded from the multi-value trait
/// field.
pub const TRAIT_PREFIX: &str = "trait_";

/// Sentinel category for an absent plain categorical field.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Numeric,
    Categorical,
}

#[derive(Debug, Clone)]
pub struct FeatureSpec {
    pub name: String,
    pub kind: FeatureKind,
}

impl FeatureSpec {
    pub fn is_trait_indicator(&self) -> bool {
        self.name.starts_with(TRAIT_PREFIX)
    }

    /// Sentinel used when no raw or derived value exists for this column.
    /// Trait indicators fall back to the expansion's "absent" literal so
    /// they stay inside their encoders' two-word vocabulary.
    pub fn default_category(&self) -> &'static str {
        if self.is_trait_indicator() {
            crate::derive::TRAIT_ABSENT
        } else {
            UNKNOWN_CATEGORY
        }
    }
}

/// The canonical ordered column set the model was trained on. Order is
/// authoritative: every emitted vector has exactly this length and order.
#[derive(Debug, Clone, Default)]
pub struct FeatureSchema {
    features: Vec<FeatureSpec>,
}

impl FeatureSchema {
    /// Build the schema from the model's recorded training columns. A
    /// column is categorical when an encoder was trained for it or it is a
    /// trait indicator; everything else is numeric.
    pub fn from_training_columns(columns: &[String], encoded: &HashSet<String>) -> Self {
        let features = columns
            .iter()
            .map(|name| {
                let kind = if encoded.contains(name) || name.starts_with(TRAIT_PREFIX) {
                    FeatureKind::Categorical
                } else {
                    FeatureKind::Numeric
                };
                FeatureSpec {
                    name: name.clone(),
                    kind,
                }
            })
            .collect();
        Self { features }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureSpec> {
        self.features.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.features.iter().map(|f| f.name.clone()).collect()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.features.iter().position(|f| f.name == name)
    }

    /// Classify every canonical column against a raw request: directly
    /// provided, derivable from a composite source field, or absent. Never
    /// fails; absence is always representable.
    pub fn resolve(&self, bag: &AttributeBag) -> PresenceMap {
        let entries = self
            .features
            .iter()
            .map(|spec| {
                let presence = if bag.contains(&spec.name) {
                    FieldPresence::Provided
                } else if spec.is_trait_indicator() && bag.contains(TRAITS_FIELD) {
                    FieldPresence::Derivable
                } else if (spec.name == ATTACKING_WORK_RATE || spec.name == DEFENSIVE_WORK_RATE)
                    && bag.contains(WORK_RATE_FIELD)
                {
                    FieldPresence::Derivable
                } else {
                    FieldPresence::Absent
                };
                (spec.name.clone(), presence)
            })
            .collect();
        PresenceMap { entries }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPresence {
    Provided,
    Derivable,
    Absent,
}

/// Per-column presence classification, in schema order.
#[derive(Debug, Clone)]
pub struct PresenceMap {
    entries: Vec<(String, FieldPresence)>,
}

impl PresenceMap {
    pub fn of(&self, name: &str) -> Option<FieldPresence> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| *p)
    }

    pub fn absent_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, p)| *p == FieldPresence::Absent)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldPresence)> {
        self.entries.iter().map(|(n, p)| (n.as_str(), *p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn kind_follows_encoders_and_trait_prefix() {
        let cols = columns(&["age", "preferred_foot", "trait_Finesse Shot"]);
        let encoded: HashSet<String> = ["preferred_foot".to_string()].into_iter().collect();
        let schema = FeatureSchema::from_training_columns(&cols, &encoded);

        let kinds: Vec<FeatureKind> = schema.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![
                FeatureKind::Numeric,
                FeatureKind::Categorical,
                FeatureKind::Categorical,
            ]
        );
    }

    #[test]
    fn schema_preserves_training_order() {
        let cols = columns(&["b", "a", "c"]);
        let schema = FeatureSchema::from_training_columns(&cols, &HashSet::new());
        assert_eq!(schema.names(), vec!["b", "a", "c"]);
        assert_eq!(schema.position("a"), Some(1));
    }

    #[test]
    fn resolve_classifies_provided_derivable_absent() {
        let cols = columns(&[
            "age",
            "attacking_work_rate",
            "defensive_work_rate",
            "trait_Leadership",
            "club",
        ]);
        let schema = FeatureSchema::from_training_columns(&cols, &HashSet::new());
        let bag = AttributeBag::from_value(json!({
            "age": 25,
            "work_rate": "High/ Medium",
            "player_traits": "Leadership",
        }))
        .unwrap();

        let presence = schema.resolve(&bag);
        assert_eq!(presence.of("age"), Some(FieldPresence::Provided));
        assert_eq!(
            presence.of("attacking_work_rate"),
            Some(FieldPresence::Derivable)
        );
        assert_eq!(
            presence.of("defensive_work_rate"),
            Some(FieldPresence::Derivable)
        );
        assert_eq!(
            presence.of("trait_Leadership"),
            Some(FieldPresence::Derivable)
        );
        assert_eq!(presence.of("club"), Some(FieldPresence::Absent));
        assert_eq!(presence.absent_count(), 1);
    }
}
