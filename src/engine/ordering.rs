use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

/// Orders collection results by one of their resolved fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    field: String,
    direction: Direction,
}

impl OrderBy {
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, Direction::Ascending)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, Direction::Descending)
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Stable sort by the field's resolved value. Results without the field
    /// sort as `null`.
    pub fn sort(&self, results: &mut [Value]) {
        let key = |result: &Value| result.get(&self.field).cloned().unwrap_or(Value::Null);
        match self.direction {
            Direction::Ascending => results.sort_by(|a, b| compare(&key(a), &key(b))),
            Direction::Descending => results.sort_by(|a, b| compare(&key(b), &key(a))),
        }
    }
}

impl From<&str> for OrderBy {
    fn from(field: &str) -> Self {
        Self::asc(field)
    }
}

impl From<String> for OrderBy {
    fn from(field: String) -> Self {
        Self::asc(field)
    }
}

impl<S: Into<String>> From<(S, Direction)> for OrderBy {
    fn from((field, direction): (S, Direction)) -> Self {
        Self::new(field, direction)
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values: null < bool < number < string, with
/// arrays and objects comparing equal among themselves.
pub(crate) fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
