//! Predicate documents and projections
//!
//! A [`Filter`] is a conjunction of per-field [`Condition`]s. It renders to a
//! Mongo-style predicate document for logging and is evaluated directly by
//! [`super::MemoryStore`].

use std::collections::BTreeMap;

use serde_json::{Value, json};

use super::{Document, ID_FIELD};

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the value
    Eq(Value),
    /// Field is absent or differs from the value
    Ne(Value),
    /// Inclusive numeric range; absent bounds are open
    Range {
        gte: Option<Value>,
        lte: Option<Value>,
    },
}

impl Condition {
    fn matches(&self, field: Option<&Value>) -> bool {
        match self {
            Condition::Eq(expected) => field.is_some_and(|v| values_equal(v, expected)),
            Condition::Ne(expected) => !field.is_some_and(|v| values_equal(v, expected)),
            Condition::Range { gte, lte } => {
                let Some(actual) = field.and_then(Value::as_f64) else {
                    return false;
                };
                let above = gte
                    .as_ref()
                    .and_then(Value::as_f64)
                    .is_none_or(|lower| actual >= lower);
                let below = lte
                    .as_ref()
                    .and_then(Value::as_f64)
                    .is_none_or(|upper| actual <= upper);
                above && below
            }
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Condition::Eq(v) => v.clone(),
            Condition::Ne(v) => json!({ "$ne": v }),
            Condition::Range { gte, lte } => {
                let mut range = serde_json::Map::new();
                if let Some(lower) = gte {
                    range.insert("$gte".into(), lower.clone());
                }
                if let Some(upper) = lte {
                    range.insert("$lte".into(), upper.clone());
                }
                Value::Object(range)
            }
        }
    }
}

/// Numbers compare by value so that `5` and `5.0` are equal
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Conjunction of field conditions. The empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: BTreeMap<String, Condition>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and_eq(field, value)
    }

    pub fn and_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses
            .insert(field.into(), Condition::Eq(value.into()));
        self
    }

    pub fn and_ne(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses
            .insert(field.into(), Condition::Ne(value.into()));
        self
    }

    pub fn and_range(
        mut self,
        field: impl Into<String>,
        gte: Option<Value>,
        lte: Option<Value>,
    ) -> Self {
        self.clauses
            .insert(field.into(), Condition::Range { gte, lte });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn condition(&self, field: &str) -> Option<&Condition> {
        self.clauses.get(field)
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.clauses
            .iter()
            .all(|(field, condition)| condition.matches(document.get(field)))
    }

    /// Render as a predicate document, e.g. `{"year": {"$gte": 2010}}`
    pub fn to_document(&self) -> Value {
        Value::Object(
            self.clauses
                .iter()
                .map(|(field, condition)| (field.clone(), condition.to_value()))
                .collect(),
        )
    }
}

/// Which fields a read returns
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Projection {
    /// Every field except the internal id
    #[default]
    ExcludeId,
    /// Only the listed fields (never the internal id)
    Only(Vec<&'static str>),
    /// Every field, internal id included
    Full,
}

impl Projection {
    pub fn only(fields: &[&'static str]) -> Self {
        Projection::Only(fields.to_vec())
    }

    pub fn apply(&self, document: &Document) -> Document {
        match self {
            Projection::Full => document.clone(),
            Projection::ExcludeId => document
                .iter()
                .filter(|(k, _)| k.as_str() != ID_FIELD)
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            Projection::Only(fields) => fields
                .iter()
                .filter(|f| **f != ID_FIELD)
                .filter_map(|f| document.get(*f).map(|v| (f.to_string(), v.clone())))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test documents are objects"),
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(Filter::all().matches(&doc(json!({}))));
        assert!(Filter::all().matches(&doc(json!({"plate": "1234ABC"}))));
    }

    #[test]
    fn test_eq_and_ne() {
        let d = doc(json!({"plate": "1234ABC", "year": 2015}));
        assert!(Filter::eq("plate", "1234ABC").matches(&d));
        assert!(!Filter::eq("plate", "9999ZZZ").matches(&d));
        assert!(Filter::eq("year", 2015.0).matches(&d));
        assert!(!Filter::eq("missing", "x").matches(&d));

        assert!(Filter::all().and_ne("plate", "9999ZZZ").matches(&d));
        assert!(!Filter::all().and_ne("plate", "1234ABC").matches(&d));
        assert!(Filter::all().and_ne("missing", "x").matches(&d));
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let d = doc(json!({"mileage": 5000}));
        let range = |gte: Option<i64>, lte: Option<i64>| {
            Filter::all().and_range("mileage", gte.map(Value::from), lte.map(Value::from))
        };
        assert!(range(Some(5000), Some(5000)).matches(&d));
        assert!(range(Some(1000), None).matches(&d));
        assert!(range(None, Some(6000)).matches(&d));
        assert!(!range(Some(5001), None).matches(&d));
        assert!(!range(None, Some(4999)).matches(&d));
    }

    #[test]
    fn test_range_requires_numeric_field() {
        let range = Filter::all().and_range("price", Some(Value::from(1)), None);
        assert!(!range.matches(&doc(json!({"price": "cheap"}))));
        assert!(!range.matches(&doc(json!({}))));
        assert!(range.matches(&doc(json!({"price": 9999.5}))));
    }

    #[test]
    fn test_predicate_document_rendering() {
        let filter = Filter::eq("brand", "Seat").and_range(
            "year",
            Some(Value::from(2010)),
            Some(Value::from(2020)),
        );
        assert_eq!(
            filter.to_document(),
            json!({"brand": "Seat", "year": {"$gte": 2010, "$lte": 2020}})
        );
        assert_eq!(
            Filter::all().and_ne("_id", "abc").to_document(),
            json!({"_id": {"$ne": "abc"}})
        );
    }

    #[test]
    fn test_projections() {
        let d = doc(json!({"_id": "01H", "name": "Pepe", "email": "p@x.com", "passwordHash": "h"}));
        assert!(!Projection::ExcludeId.apply(&d).contains_key("_id"));
        assert!(Projection::Full.apply(&d).contains_key("_id"));

        let contact = Projection::only(&["name", "email", "phone", "_id"]).apply(&d);
        assert_eq!(contact.len(), 2);
        assert_eq!(contact["name"], "Pepe");
        assert!(!contact.contains_key("passwordHash"));
    }
}
