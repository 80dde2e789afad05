//! # Henkan - Declarative Object Transformation Engine
//!
//! **Henkan** turns domain objects into plain output structures, JSON-like
//! trees of keys and values, by running them through *transformers*. A
//! transformer declares which keys its output has and how each one is
//! produced: copied or renamed from the source object, grouped under a
//! namespace, mapped through a literal table, formatted, or handed to another
//! transformer for a related object or collection.
//!
//! ## Core Workflow
//!
//! 1.  **Describe your objects**: Implement [`Source`](source::Source) for your
//!     domain type, or use the built-in implementations for
//!     `serde_json::Value` and [`Record`](source::Record).
//! 2.  **Declare a transformer**: Implement [`Transformer`](transformer::Transformer)
//!     in code, or load a [`TransformerDefinition`](definition::TransformerDefinition)
//!     from JSON and build a [`DefinedTransformer`](definition::DefinedTransformer).
//! 3.  **Transform**: Create a [`TransformEngine`](engine::TransformEngine) over an
//!     [`ObjectStore`](store::ObjectStore) and run it against a single object,
//!     a collection, or nothing at all.
//!
//! Relations a transformer declares for preloading are requested from the
//! store once per batch, before any field is resolved, and only when they
//! are not already loaded.
//!
//! ## Quick Start
//!
//! ```rust
//! use henkan::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transformer = DefinedTransformer::new(json!({
//!         "name": "posts",
//!         "fields": [
//!             { "key": "title", "rule": "copy" },
//!             { "key": "state", "rule": "map", "from": "status",
//!               "table": [{ "from": 1, "to": "Published" }],
//!               "default": "Unknown" }
//!         ],
//!         "order_by": ["title", "desc"]
//!     }))?;
//!
//!     let posts = vec![
//!         json!({ "title": "a", "status": 1 }),
//!         json!({ "title": "b", "status": 9 }),
//!     ];
//!
//!     let engine = TransformEngine::new(&Preloaded);
//!     let output = engine.transform(Input::many(&posts), &transformer, Variant::Full)?;
//!
//!     assert_eq!(
//!         output,
//!         json!([
//!             { "title": "b", "state": "Unknown" },
//!             { "title": "a", "state": "Published" }
//!         ])
//!     );
//!     Ok(())
//! }
//! ```

pub mod definition;
pub mod engine;
pub mod error;
pub mod prelude;
pub mod source;
pub mod store;
pub mod structure;
pub mod transformer;

use engine::{Input, TransformEngine};
use error::TransformError;
use serde_json::Value;
use store::Preloaded;
use transformer::{Transformer, Variant};

/// Transforms in-memory input with the full structure and no store round-trips.
pub fn transform<'a>(
    input: impl Into<Input<'a>>,
    transformer: &dyn Transformer,
) -> Result<Value, TransformError> {
    TransformEngine::new(&Preloaded).transform(input, transformer, Variant::Full)
}
