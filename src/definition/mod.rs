//! Declarative transformer definitions.
//!
//! A [`TransformerDefinition`] describes a transformer as data, so rule sets
//! can live in JSON files next to the code that uses them. Any custom format
//! converts into it through [`IntoDefinition`], and [`DefinedTransformer`]
//! turns it into a ready-to-run [`Transformer`](crate::transformer::Transformer).

mod conversion;
mod model;
mod transformer;

pub use conversion::IntoDefinition;
pub use model::{
    FieldDefinition, FormatDefinition, MapEntryDefinition, OrderDefinition, PreloadDefinition,
    RuleDefinition, TransformerDefinition,
};
pub use transformer::DefinedTransformer;
