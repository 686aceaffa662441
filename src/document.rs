//! Document field snapshots.
//!
//! The engine never talks to the owning document module directly.  At
//! creation time and on every advance request the caller hands over a
//! [`FieldSnapshot`]: a consistent key → value map of the document's
//! properties at that instant.  Conditions and collaboration resolution are
//! evaluated against exactly one snapshot, never a mix of old and new values.

use std::collections::BTreeMap;

use serde_json::Value;

/// A single document property value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    None,
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl FieldValue {
    /// Numeric view of the value.  Strings holding numbers coerce, matching
    /// the lenient comparisons of condition predicates.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            FieldValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, FieldValue::None)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::None => true,
            FieldValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Build from a JSON value supplied by the owning document module.
    /// Arrays and objects are not document field types; they map to `None`.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::None,
            Value::Bool(b) => FieldValue::Boolean(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Integer(i)
                } else {
                    FieldValue::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            Value::String(s) => FieldValue::String(s.clone()),
            Value::Array(_) | Value::Object(_) => FieldValue::None,
        }
    }
}

/// Immutable key → value map of document properties, taken at one instant.
#[derive(Debug, Clone, Default)]
pub struct FieldSnapshot {
    fields: BTreeMap<String, FieldValue>,
}

impl FieldSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, property: impl Into<String>, value: FieldValue) {
        self.fields.insert(property.into(), value);
    }

    pub fn get(&self, property: &str) -> Option<&FieldValue> {
        self.fields.get(property)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a snapshot from a JSON object.
    pub fn from_json(value: &Value) -> Self {
        let mut snapshot = Self::new();
        if let Value::Object(map) = value {
            for (k, v) in map {
                snapshot.set(k.clone(), FieldValue::from_value(v));
            }
        }
        snapshot
    }
}

/// Everything the engine needs to know about the owning document, passed
/// explicitly into every call rather than read from ambient request state.
#[derive(Debug, Clone)]
pub struct DocumentContext {
    /// Identifies the owning document type, e.g. "purchase_order".
    pub app_code: String,
    /// Opaque identifier within that document type.
    pub doc_id: String,
    /// Owning company, for multi-company workflows.
    pub company: Option<String>,
    /// Field values at the time of the call.
    pub snapshot: FieldSnapshot,
}

impl DocumentContext {
    pub fn new(app_code: impl Into<String>, doc_id: impl Into<String>, snapshot: FieldSnapshot) -> Self {
        Self {
            app_code: app_code.into(),
            doc_id: doc_id.into(),
            company: None,
            snapshot,
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_scalars() {
        assert_eq!(FieldValue::from_value(&json!(null)), FieldValue::None);
        assert_eq!(FieldValue::from_value(&json!(true)), FieldValue::Boolean(true));
        assert_eq!(FieldValue::from_value(&json!(42)), FieldValue::Integer(42));
        assert_eq!(FieldValue::from_value(&json!(3.5)), FieldValue::Float(3.5));
        assert_eq!(
            FieldValue::from_value(&json!("hi")),
            FieldValue::String("hi".into())
        );
    }

    #[test]
    fn test_from_value_composites_are_none() {
        assert_eq!(FieldValue::from_value(&json!([1, 2])), FieldValue::None);
        assert_eq!(FieldValue::from_value(&json!({"a": 1})), FieldValue::None);
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(FieldValue::String("42".into()).as_f64(), Some(42.0));
        assert_eq!(FieldValue::String(" 1.5 ".into()).as_f64(), Some(1.5));
        assert_eq!(FieldValue::String("abc".into()).as_f64(), None);
        assert_eq!(FieldValue::Boolean(true).as_f64(), None);
    }

    #[test]
    fn test_emptiness() {
        assert!(FieldValue::None.is_empty());
        assert!(FieldValue::String("".into()).is_empty());
        assert!(!FieldValue::String("x".into()).is_empty());
        assert!(!FieldValue::Integer(0).is_empty());
    }

    #[test]
    fn test_snapshot_from_json() {
        let snapshot = FieldSnapshot::from_json(&json!({
            "amount": 1500,
            "approver": "emp-7",
            "urgent": true
        }));
        assert_eq!(snapshot.get("amount"), Some(&FieldValue::Integer(1500)));
        assert_eq!(
            snapshot.get("approver").and_then(|v| v.as_text()),
            Some("emp-7")
        );
        assert_eq!(snapshot.get("urgent").and_then(|v| v.as_bool()), Some(true));
        assert_eq!(snapshot.get("missing"), None);
    }

    #[test]
    fn test_document_context_builder() {
        let doc = DocumentContext::new("purchase_order", "po-1", FieldSnapshot::new())
            .with_company("acme");
        assert_eq!(doc.app_code, "purchase_order");
        assert_eq!(doc.doc_id, "po-1");
        assert_eq!(doc.company.as_deref(), Some("acme"));
    }
}
