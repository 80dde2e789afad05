pub mod record;
pub mod value;

pub use record::*;

use serde_json::Value;

/// A domain object the engine reads from.
///
/// The engine never owns a source; it borrows it for the duration of one pass.
/// Implementations only need to answer keyed-field lookups. Accessors and
/// relations are optional capabilities.
pub trait Source {
    /// Keyed-field lookup. `None` means the key is absent; a present key that
    /// holds `null` returns `Some(Value::Null)`.
    fn field(&self, name: &str) -> Option<Value>;

    /// Getter-style accessor defined on the object itself, consulted after
    /// the keyed-field lookup misses.
    fn accessor(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Related object(s) reachable under `name`, used by nested transformers.
    fn relation(&self, _name: &str) -> Option<Related<'_>> {
        None
    }

    /// Whether this source stands for an absent object.
    fn is_null(&self) -> bool {
        false
    }
}

/// The value of a relation on a source object.
pub enum Related<'a> {
    Null,
    One(&'a dyn Source),
    Many(Vec<Option<&'a dyn Source>>),
}

impl<'a> Related<'a> {
    /// Interprets a plain value as a relation: arrays are collections,
    /// `null` is absent, anything else is a single object.
    pub fn from_value(value: &'a Value) -> Self {
        match value {
            Value::Null => Related::Null,
            Value::Array(items) => Related::Many(
                items
                    .iter()
                    .map(|item| (!item.is_null()).then_some(item as &dyn Source))
                    .collect(),
            ),
            other => Related::One(other),
        }
    }

    /// All present objects of the relation.
    pub fn objects(&self) -> Vec<&'a dyn Source> {
        match self {
            Related::Null => Vec::new(),
            Related::One(object) => vec![*object],
            Related::Many(items) => items.iter().flatten().copied().collect(),
        }
    }
}
