use super::model::TransformerDefinition;
use crate::error::DefinitionError;
use serde_json::Value;

/// A trait for custom data models that can be converted into a henkan
/// `TransformerDefinition`.
///
/// This is the extension point for describing transformers in your own
/// format. Implement it on your configuration structs to give
/// [`DefinedTransformer`](super::DefinedTransformer) something to build from.
///
/// # Example
///
/// ```rust
/// use henkan::definition::{FieldDefinition, IntoDefinition, RuleDefinition, TransformerDefinition};
/// use henkan::error::DefinitionError;
///
/// // A column list from some legacy configuration format.
/// struct Columns {
///     table: String,
///     columns: Vec<String>,
/// }
///
/// impl IntoDefinition for Columns {
///     fn into_definition(self) -> Result<TransformerDefinition, DefinitionError> {
///         if self.columns.is_empty() {
///             return Err(DefinitionError::Validation("no columns".to_string()));
///         }
///         Ok(TransformerDefinition {
///             name: self.table,
///             fields: self
///                 .columns
///                 .into_iter()
///                 .map(|key| FieldDefinition { key, rule: RuleDefinition::Copy })
///                 .collect(),
///             minimal: None,
///             preload: Vec::new(),
///             order_by: None,
///             null_state: serde_json::Value::Null,
///         })
///     }
/// }
///
/// let columns = Columns { table: "users".into(), columns: vec!["id".into()] };
/// assert_eq!(columns.into_definition().unwrap().fields.len(), 1);
/// ```
pub trait IntoDefinition {
    /// Consumes the object and converts it into a transformer definition.
    fn into_definition(self) -> Result<TransformerDefinition, DefinitionError>;
}

impl IntoDefinition for TransformerDefinition {
    fn into_definition(self) -> Result<TransformerDefinition, DefinitionError> {
        Ok(self)
    }
}

impl IntoDefinition for Value {
    fn into_definition(self) -> Result<TransformerDefinition, DefinitionError> {
        serde_json::from_value(self).map_err(|e| DefinitionError::Parse(e.to_string()))
    }
}

impl IntoDefinition for &str {
    fn into_definition(self) -> Result<TransformerDefinition, DefinitionError> {
        serde_json::from_str(self).map_err(|e| DefinitionError::Parse(e.to_string()))
    }
}
