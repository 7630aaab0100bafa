use serde_json::{Map, Value};

/// Raw request payload: an arbitrary mapping of attribute name to scalar
/// value. Carries no invariants — fields may be missing, extraneous, or of
/// the wrong type; every accessor is optional and coercing.
#[derive(Debug, Clone, Default)]
pub struct AttributeBag {
    fields: Map<String, Value>,
}

impl AttributeBag {
    /// Wrap a decoded JSON value. Returns `None` for anything that is not
    /// an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// String view of a field; non-string values are not coerced.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Numeric view of a field. Accepts JSON numbers and numeric strings;
    /// anything else (including garbage like `"abc"`) is `None`.
    pub fn numeric_field(&self, name: &str) -> Option<f64> {
        match self.fields.get(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}
