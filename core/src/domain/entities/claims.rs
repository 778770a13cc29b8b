//! Claim set carried in a token payload.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Expiration claim name (Unix seconds)
pub const EXP_CLAIM: &str = "exp";

/// Subject claim name
pub const SUB_CLAIM: &str = "sub";

/// Mapping from claim name to an arbitrary JSON value.
///
/// Keys are unique. Equality ignores insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(Map<String, Value>);

impl ClaimSet {
    /// Creates an empty claim set
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Adds a claim, returning the set for chaining
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts a claim, returning the previous value for that name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// The `sub` claim, if present and a string
    pub fn subject(&self) -> Option<&str> {
        self.get(SUB_CLAIM).and_then(Value::as_str)
    }

    /// The `exp` claim as whole Unix seconds.
    ///
    /// Returns `None` when absent, `Some(None)` when present but not a number.
    /// Fractional values round up, so `exp <= now` holds exactly when the
    /// returned seconds are `<= now`. Integers above `i64::MAX` clamp to it.
    pub fn expiration(&self) -> Option<Option<i64>> {
        self.get(EXP_CLAIM).map(numeric_date)
    }

    /// The `exp` claim as a UTC timestamp
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expiration()
            .flatten()
            .and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }

    /// Consumes the set, returning the underlying JSON object
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

fn numeric_date(value: &Value) -> Option<i64> {
    if let Some(seconds) = value.as_i64() {
        return Some(seconds);
    }
    if let Some(seconds) = value.as_u64() {
        return Some(i64::try_from(seconds).unwrap_or(i64::MAX));
    }
    let seconds = value.as_f64()?.ceil();
    if !seconds.is_finite() {
        return None;
    }
    // `as` saturates at the i64 bounds
    Some(seconds as i64)
}

impl From<Map<String, Value>> for ClaimSet {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<ClaimSet> for Value {
    fn from(claims: ClaimSet) -> Self {
        Value::Object(claims.0)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ClaimSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for ClaimSet {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for ClaimSet {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
