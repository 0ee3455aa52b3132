//! Predicate compiler.
//!
//! Pure functions that turn a field, an operator and a value into one
//! clause document, plus [`Condition`], which pairs a compiled clause with
//! the [`Bucket`] of the boolean query it belongs in.

use serde_json::{json, Value};

use crate::op::Op;

/// One of the three clause lists of a boolean query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Must match and contributes to the score.
    Must,
    /// Must not match.
    MustNot,
    /// Must match, no score contribution.
    Filter,
}

impl Bucket {
    /// Returns the key of this bucket inside `query.bool`.
    pub fn key(self) -> &'static str {
        match self {
            Bucket::Must => "must",
            Bucket::MustNot => "must_not",
            Bucket::Filter => "filter",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// `{"term": {field: value}}`
pub fn term(field: &str, value: Value) -> Value {
    json!({ "term": { field: value } })
}

/// `{"terms": {field: [values]}}`
pub fn terms(field: &str, values: Vec<Value>) -> Value {
    json!({ "terms": { field: values } })
}

/// `{"range": {field: {key: value}}}` where `key` is one of `gt`, `gte`,
/// `lt`, `lte`.
pub fn range(field: &str, key: &str, value: Value) -> Value {
    json!({ "range": { field: { key: value } } })
}

/// `{"range": {field: {"gte": lower, "lte": upper}}}`
pub fn between(field: &str, lower: Value, upper: Value) -> Value {
    json!({ "range": { field: { "gte": lower, "lte": upper } } })
}

/// `{"match": {field: value}}`
pub fn text_match(field: &str, value: Value) -> Value {
    json!({ "match": { field: value } })
}

/// `{"exists": {"field": field}}`
pub fn exists(field: &str) -> Value {
    json!({ "exists": { "field": field } })
}

/// `{"geo_distance": {"distance": radius, field: point}}`
///
/// The point is not inspected: `"lat,lon"` strings, `[lon, lat]` arrays and
/// `{"lat", "lon"}` objects all pass through as given.
pub fn geo_distance(field: &str, point: Value, radius: &str) -> Value {
    json!({ "geo_distance": { "distance": radius, field: point } })
}

/// Loose truthiness used by the `exists` operator.
///
/// `null`, `false`, zero, `""`, `"0"` and empty arrays/objects are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// A single where predicate: field, operator and value.
///
/// # Example
///
/// ```
/// use esquire_query::{Bucket, Condition, Op};
/// use serde_json::json;
///
/// let (bucket, clause) = Condition::new("age", Op::Gt, 18).compile();
/// assert_eq!(bucket, Bucket::Filter);
/// assert_eq!(clause, json!({"range": {"age": {"gt": 18}}}));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// The field to test.
    pub field: String,
    /// The comparison operator.
    pub op: Op,
    /// The value to compare against.
    pub value: Value,
}

impl Condition {
    /// Creates a new condition.
    pub fn new(field: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        Condition {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Creates an equality condition.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition::new(field, Op::Eq, value)
    }

    /// Creates a condition from an operator token.
    ///
    /// When the token is not a recognised operator it is taken to be the
    /// value, the operator becomes `=`, and `value` is dropped. This mirrors
    /// the two-argument `where(field, value)` call form.
    pub fn from_token(field: impl Into<String>, token: &str, value: impl Into<Value>) -> Self {
        match Op::parse(token) {
            Some(op) => Condition::new(field, op, value),
            None => Condition::eq(field, token),
        }
    }

    /// Compiles this condition for a positive `where`.
    pub fn compile(&self) -> (Bucket, Value) {
        let field = self.field.as_str();
        match self.op {
            Op::Eq => (Bucket::Filter, term(field, self.value.clone())),
            Op::Gt | Op::Gte | Op::Lt | Op::Lte => {
                let key = self.op.range_key().unwrap_or("gte");
                (Bucket::Filter, range(field, key, self.value.clone()))
            }
            Op::Like => (Bucket::Must, text_match(field, self.value.clone())),
            Op::Exists => {
                let bucket = if is_truthy(&self.value) {
                    Bucket::Must
                } else {
                    Bucket::MustNot
                };
                (bucket, exists(field))
            }
        }
    }

    /// Compiles this condition for a `where_not`.
    ///
    /// Term, range and match clauses go to `must_not`. For `exists` the
    /// boolean is inverted and the positive routing applies.
    pub fn compile_negated(&self) -> (Bucket, Value) {
        match self.op {
            Op::Exists => self.inverted_exists().compile(),
            _ => {
                let (_, clause) = self.compile();
                (Bucket::MustNot, clause)
            }
        }
    }

    fn inverted_exists(&self) -> Condition {
        Condition::new(self.field.clone(), Op::Exists, !is_truthy(&self.value))
    }
}

/// Lower and upper bounds of a between clause.
///
/// Built from a `(lower, upper)` tuple, a two-element array, a `Vec` or a
/// JSON array. A sequence that does not hold exactly two values keeps the
/// whole sequence as the lower bound and leaves the upper bound `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    /// Inclusive lower bound (`gte`).
    pub lower: Value,
    /// Inclusive upper bound (`lte`).
    pub upper: Value,
}

impl Bounds {
    /// Creates bounds from two values.
    pub fn new(lower: impl Into<Value>, upper: impl Into<Value>) -> Self {
        Bounds {
            lower: lower.into(),
            upper: upper.into(),
        }
    }

    fn from_values(mut values: Vec<Value>) -> Self {
        if values.len() == 2 {
            let upper = values.pop().unwrap_or(Value::Null);
            let lower = values.pop().unwrap_or(Value::Null);
            Bounds { lower, upper }
        } else {
            Bounds {
                lower: Value::Array(values),
                upper: Value::Null,
            }
        }
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for Bounds {
    fn from((lower, upper): (A, B)) -> Self {
        Bounds::new(lower, upper)
    }
}

impl<V: Into<Value>> From<[V; 2]> for Bounds {
    fn from(pair: [V; 2]) -> Self {
        let [lower, upper] = pair;
        Bounds::new(lower, upper)
    }
}

impl<V: Into<Value>> From<Vec<V>> for Bounds {
    fn from(values: Vec<V>) -> Self {
        Bounds::from_values(values.into_iter().map(Into::into).collect())
    }
}

impl From<Value> for Bounds {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(values) => Bounds::from_values(values),
            other => Bounds {
                lower: other,
                upper: Value::Null,
            },
        }
    }
}
