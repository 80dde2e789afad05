//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the henkan crate.
//! Import this module to get access to the core functionality without having to import
//! each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use henkan::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let definition = std::fs::read_to_string("path/to/users.json")?;
//! let transformer = DefinedTransformer::new(definition.as_str())?;
//!
//! let data: serde_json::Value = serde_json::from_str(&std::fs::read_to_string("path/to/data.json")?)?;
//! let output = TransformEngine::new(&Preloaded).transform(&data, &transformer, Variant::Minimal)?;
//!
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

// Transformers and the engine
pub use crate::engine::{
    Direction, Guard, Input, OrderBy, PRELOAD_RELATED, PreloadPlanner, Preloads, TransformEngine,
};
pub use crate::transformer::{Container, FromContainer, Transformer, Variant};

// Structures
pub use crate::structure::{Format, Nested, Rule, Structure, StructureBuilder, ValueMap};

// Sources and stores
pub use crate::source::{Record, Related, Source};
pub use crate::store::{ObjectStore, Preloaded};

// Declarative definitions
pub use crate::definition::{DefinedTransformer, IntoDefinition, TransformerDefinition};

// Error types
pub use crate::error::{
    ConstructionError, DefinitionError, SpecError, StoreError, TransformError,
};

// Result type alias for convenience
pub type Result<T, E = Box<dyn std::error::Error>> = std::result::Result<T, E>;
