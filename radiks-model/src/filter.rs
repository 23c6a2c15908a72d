//! Query filters over plaintext document fields.
//!
//! A filter is a conjunction of equality pairs, optionally refined by an
//! `$or` list of alternative filters, plus pagination. The `$or` list is a
//! conjunctive refinement: a document must satisfy every top-level pair
//! *and* at least one alternative.

use crate::document::{Document, keys};
use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// Match criteria for a list query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Filter {
    equals: BTreeMap<String, Value>,
    any_of: Vec<Filter>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl Filter {
    /// An empty filter matches every document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality pair, AND-ed with the others.
    #[must_use]
    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.equals.insert(field.to_string(), value.into());
        self
    }

    /// Sets the `$or` alternatives. An empty list clears the refinement.
    #[must_use]
    pub fn any_of(mut self, alternatives: impl IntoIterator<Item = Filter>) -> Self {
        self.any_of = alternatives.into_iter().collect();
        self
    }

    /// Appends one `$or` alternative.
    #[must_use]
    pub fn or(mut self, alternative: Filter) -> Self {
        self.any_of.push(alternative);
        self
    }

    /// Bounds the number of returned documents.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skips this many matching documents before returning any.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn equals(&self) -> &BTreeMap<String, Value> {
        &self.equals
    }

    pub fn alternatives(&self) -> &[Filter] {
        &self.any_of
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    /// Every field name referenced by this filter or its alternatives.
    pub fn referenced_fields(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.equals.keys().map(String::as_str).collect();
        for alt in &self.any_of {
            names.extend(alt.referenced_fields());
        }
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Whether `doc` satisfies the equality pairs and the `$or` refinement.
    ///
    /// Pagination is not considered here; see [`Filter::paginate`].
    pub fn matches(&self, doc: &Document) -> bool {
        let all_equal = self
            .equals
            .iter()
            .all(|(field, expected)| value_matches(doc.field(field).as_ref(), expected));
        all_equal && (self.any_of.is_empty() || self.any_of.iter().any(|alt| alt.matches(doc)))
    }

    /// Applies offset then limit to an already-matched sequence.
    pub fn paginate<T>(&self, items: Vec<T>) -> Vec<T> {
        let offset = self.offset.unwrap_or(0);
        let iter = items.into_iter().skip(offset);
        match self.limit {
            Some(limit) => iter.take(limit).collect(),
            None => iter.collect(),
        }
    }

    /// A copy without pagination, used for counting.
    #[must_use]
    pub fn without_pagination(&self) -> Self {
        Self {
            limit: None,
            offset: None,
            ..self.clone()
        }
    }

    /// Renders the flattened JSON form: `{ field: v, "limit": n, "$or": [...] }`.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (field, value) in &self.equals {
            map.insert(field.clone(), value.clone());
        }
        if let Some(limit) = self.limit {
            map.insert(keys::LIMIT.into(), Value::from(limit));
        }
        if let Some(offset) = self.offset {
            map.insert(keys::OFFSET.into(), Value::from(offset));
        }
        if !self.any_of.is_empty() {
            let alts = self.any_of.iter().map(Filter::to_json).collect();
            map.insert(keys::OR.into(), Value::Array(alts));
        }
        Value::Object(map)
    }

    /// Parses the flattened JSON form.
    pub fn from_json(value: &Value) -> ModelResult<Self> {
        let Value::Object(map) = value else {
            return Err(ModelError::InvalidFilter("filter must be an object".into()));
        };

        let mut filter = Filter::new();
        for (key, value) in map {
            match key.as_str() {
                keys::LIMIT => filter.limit = Some(parse_count(keys::LIMIT, value)?),
                keys::OFFSET => filter.offset = Some(parse_count(keys::OFFSET, value)?),
                keys::OR => {
                    let Value::Array(alts) = value else {
                        return Err(ModelError::InvalidFilter("`$or` must be an array".into()));
                    };
                    filter.any_of = alts
                        .iter()
                        .map(Filter::from_json)
                        .collect::<ModelResult<_>>()?;
                }
                field => {
                    filter.equals.insert(field.to_string(), value.clone());
                }
            }
        }
        Ok(filter)
    }

    /// Renders `qs`-style query pairs, e.g. `("$or[0][name]", "tester")`.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        self.push_pairs(None, &mut pairs);
        if let Some(limit) = self.limit {
            pairs.push((keys::LIMIT.to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push((keys::OFFSET.to_string(), offset.to_string()));
        }
        pairs
    }

    fn push_pairs(&self, prefix: Option<&str>, out: &mut Vec<(String, String)>) {
        let key_for = |name: &str| match prefix {
            Some(p) => format!("{p}[{name}]"),
            None => name.to_string(),
        };
        for (field, value) in &self.equals {
            out.push((key_for(field), query_value(value)));
        }
        for (i, alt) in self.any_of.iter().enumerate() {
            let alt_prefix = format!("{}[{i}]", key_for(keys::OR));
            alt.push_pairs(Some(&alt_prefix), out);
        }
    }
}

impl TryFrom<Value> for Filter {
    type Error = ModelError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Filter::from_json(&value)
    }
}

impl From<Filter> for Value {
    fn from(filter: Filter) -> Self {
        filter.to_json()
    }
}

fn parse_count(key: &str, value: &Value) -> ModelResult<usize> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse::<u64>().ok(),
        _ => None,
    };
    parsed
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| ModelError::InvalidFilter(format!("`{key}` must be a non-negative integer")))
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Mongo-style equality: exact match, numeric equality across int/float,
/// membership for array-valued fields, and `null` matching a missing field.
fn value_matches(actual: Option<&Value>, expected: &Value) -> bool {
    let Some(actual) = actual else {
        return expected.is_null();
    };
    if json_eq(actual, expected) {
        return true;
    }
    match actual {
        Value::Array(items) if !expected.is_array() => items.iter().any(|v| json_eq(v, expected)),
        _ => false,
    }
}

/// Integers compare exactly; f64 is used only when either side is a float.
fn number_eq(x: &Number, y: &Number) -> bool {
    if x.is_f64() || y.is_f64() {
        return matches!((x.as_f64(), y.as_f64()), (Some(x), Some(y)) if x == y);
    }
    match (x.as_i64(), y.as_i64()) {
        (Some(x), Some(y)) => x == y,
        _ => x.as_u64().is_some() && x.as_u64() == y.as_u64(),
    }
}

fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => number_eq(x, y),
        _ => a == b,
    }
}
