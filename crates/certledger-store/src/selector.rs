//! Selector queries over JSON record values.
//!
//! Only the equality subset of the selector language is supported:
//! `{"selector":{"field":value, "other":{"$eq":value}}}`. All conditions must
//! hold (AND).

use crate::error::StoreError;
use serde_json::{json, Map, Value};

/// Trait for filtering decoded records during a query.
pub trait RecordFilter {
    /// Returns true if the record matches the filter criteria.
    fn matches(&self, record: &Value) -> bool;
}

/// Matches records whose top-level `field` equals `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEquals {
    /// Field name.
    pub field: String,
    /// Expected value.
    pub value: Value,
}

impl RecordFilter for FieldEquals {
    fn matches(&self, record: &Value) -> bool {
        record
            .get(&self.field)
            .map(|v| *v == self.value)
            .unwrap_or(false)
    }
}

/// Equality selector, convertible to and from its query-string form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selector {
    conditions: Vec<FieldEquals>,
}

impl Selector {
    /// Creates an empty selector (matches every JSON object).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality condition on `field`.
    pub fn equals(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(FieldEquals {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Renders the selector as a query string.
    ///
    /// Values go through the JSON encoder, so quotes and control characters in
    /// user input cannot change the query structure.
    pub fn to_query_string(&self) -> String {
        let mut fields = Map::new();
        for condition in &self.conditions {
            fields.insert(condition.field.clone(), condition.value.clone());
        }
        json!({ "selector": fields }).to_string()
    }

    /// Parses a query string into a selector.
    pub fn parse(query: &str) -> Result<Self, StoreError> {
        let parsed: Value = serde_json::from_str(query)
            .map_err(|e| StoreError::InvalidQuery(format!("malformed JSON: {}", e)))?;
        let fields = parsed
            .get("selector")
            .and_then(Value::as_object)
            .ok_or_else(|| StoreError::InvalidQuery("missing \"selector\" object".to_string()))?;

        let mut selector = Selector::new();
        for (field, condition) in fields {
            if field.starts_with('$') {
                return Err(StoreError::InvalidQuery(format!(
                    "unsupported combination operator {}",
                    field
                )));
            }
            let value = match condition {
                Value::Object(ops) => match (ops.len(), ops.get("$eq")) {
                    (1, Some(v)) => v.clone(),
                    _ => {
                        return Err(StoreError::InvalidQuery(format!(
                            "unsupported condition on {}: {}",
                            field, condition
                        )))
                    }
                },
                Value::Array(_) => {
                    return Err(StoreError::InvalidQuery(format!(
                        "array condition on {} is not supported",
                        field
                    )))
                }
                scalar => scalar.clone(),
            };
            selector = selector.equals(field.clone(), value);
        }
        Ok(selector)
    }
}

impl RecordFilter for Selector {
    fn matches(&self, record: &Value) -> bool {
        record.is_object() && self.conditions.iter().all(|c| c.matches(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(owner: &str) -> Value {
        json!({"docType": "student", "cert": "as23df", "degree": "me", "iD": 4674, "owner": owner})
    }

    #[test]
    fn query_string_matches_chaincode_shape() {
        let selector = Selector::new().equals("docType", "student").equals("owner", "hussein");
        assert_eq!(
            selector.to_query_string(),
            r#"{"selector":{"docType":"student","owner":"hussein"}}"#
        );
    }

    #[test]
    fn query_string_escapes_values() {
        let selector = Selector::new().equals("owner", "a\"},\"x\":{\"");
        let reparsed = Selector::parse(&selector.to_query_string()).unwrap();
        assert_eq!(reparsed, selector);
    }

    #[test]
    fn parse_accepts_eq_operator() {
        let selector = Selector::parse(r#"{"selector":{"owner":{"$eq":"bob"}}}"#).unwrap();
        assert_eq!(selector, Selector::new().equals("owner", "bob"));
    }

    #[test]
    fn parse_rejects_unsupported_forms() {
        for query in [
            "not json",
            r#"{"fields":["owner"]}"#,
            r#"{"selector":{"$or":[{"owner":"a"}]}}"#,
            r#"{"selector":{"iD":{"$gt":5}}}"#,
            r#"{"selector":{"owner":["a"]}}"#,
        ] {
            assert!(
                matches!(Selector::parse(query), Err(StoreError::InvalidQuery(_))),
                "{query}"
            );
        }
    }

    #[test]
    fn matches_all_conditions() {
        let selector = Selector::new().equals("docType", "student").equals("owner", "hussein");
        assert!(selector.matches(&record("hussein")));
        assert!(!selector.matches(&record("bob")));
        assert!(!selector.matches(&json!({"owner": "hussein"})));
    }

    #[test]
    fn numeric_equality() {
        let selector = Selector::new().equals("iD", 4674);
        assert!(selector.matches(&record("x")));
        assert!(!Selector::new().equals("iD", "4674").matches(&record("x")));
    }

    #[test]
    fn empty_selector_matches_objects_only() {
        assert!(Selector::new().matches(&record("x")));
        assert!(!Selector::new().matches(&json!([1, 2])));
    }
}
