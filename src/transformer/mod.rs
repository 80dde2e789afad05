use crate::engine::{OrderBy, Preloads};
use crate::error::SpecError;
use crate::source::Source;
use crate::structure::Structure;
use serde_json::Value;

pub mod container;

pub use container::{Container, FromContainer};

/// Which structure a transformer renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variant {
    #[default]
    Full,
    Minimal,
}

/// A configured rule set mapping a domain object to an output structure.
///
/// Only [`structure`](Self::structure) is required. Every other capability
/// has a default that leaves the pass unchanged, so a transformer implements
/// just the hooks it needs.
///
/// # Example
///
/// ```rust
/// use henkan::prelude::*;
/// use serde_json::{json, Value};
///
/// struct UserTransformer;
///
/// impl Transformer for UserTransformer {
///     fn structure(&self) -> Result<Structure, SpecError> {
///         Structure::builder().field("id").field("fullname").build()
///     }
///
///     fn get(&self, key: &str, object: &dyn Source) -> Option<Value> {
///         match key {
///             "fullname" => {
///                 let first = object.field("first_name")?;
///                 let last = object.field("last_name")?;
///                 Some(json!(format!(
///                     "{} {}",
///                     first.as_str().unwrap_or_default(),
///                     last.as_str().unwrap_or_default()
///                 )))
///             }
///             _ => None,
///         }
///     }
/// }
///
/// let user = json!({ "id": 1, "first_name": "A", "last_name": "B" });
/// let output = henkan::transform(&user, &UserTransformer).unwrap();
/// assert_eq!(output, json!({ "id": 1, "fullname": "A B" }));
/// ```
pub trait Transformer: Send + Sync {
    /// Name used in logs and debug output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// The full structure.
    fn structure(&self) -> Result<Structure, SpecError>;

    /// The minimal structure. Defaults to the full one.
    fn minimal_structure(&self) -> Result<Structure, SpecError> {
        self.structure()
    }

    fn structure_for(&self, variant: Variant) -> Result<Structure, SpecError> {
        match variant {
            Variant::Full => self.structure(),
            Variant::Minimal => self.minimal_structure(),
        }
    }

    /// Relations to load before any field is resolved.
    fn preload(&self) -> Preloads {
        Preloads::new()
    }

    /// Getter for an output key. Returning `Some` shadows every other way
    /// of resolving that key, including a raw field of the same name.
    fn get(&self, _key: &str, _object: &dyn Source) -> Option<Value> {
        None
    }

    /// Ordering applied to collection results.
    fn ordering(&self) -> Option<OrderBy> {
        None
    }

    /// The value produced for an absent object.
    fn null_state(&self) -> Value {
        Value::Null
    }

    fn before_item<'a>(&self, object: Option<&'a dyn Source>) -> Option<&'a dyn Source> {
        object
    }

    fn before_collection<'a>(
        &self,
        objects: Vec<Option<&'a dyn Source>>,
    ) -> Vec<Option<&'a dyn Source>> {
        objects
    }

    fn after_item(&self, result: Value, _object: Option<&dyn Source>) -> Value {
        result
    }

    /// Receives the ordered results and the objects they were produced from,
    /// in input order.
    fn after_collection(&self, results: Vec<Value>, _objects: &[Option<&dyn Source>]) -> Vec<Value> {
        results
    }
}
