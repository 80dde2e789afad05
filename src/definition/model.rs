use crate::engine::Direction;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The complete, canonical definition of a declarative transformer.
/// This is the target structure for any custom format conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerDefinition {
    pub name: String,
    pub fields: Vec<FieldDefinition>,
    /// Keys of `fields` that make up the minimal structure, in output order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimal: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preload: Vec<PreloadDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderDefinition>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub null_state: Value,
}

/// A single output key and the rule producing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub key: String,
    #[serde(flatten)]
    pub rule: RuleDefinition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleDefinition {
    Copy,
    Rename {
        from: String,
    },
    Group {
        fields: Vec<FieldDefinition>,
    },
    Map {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<String>,
        table: Vec<MapEntryDefinition>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<Value>,
    },
    Format {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<String>,
        format: FormatDefinition,
    },
    Transform {
        transformer: Box<TransformerDefinition>,
        #[serde(default)]
        minimal: bool,
        /// Preload this relation together with everything the nested
        /// transformer declares.
        #[serde(default)]
        preload_related: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEntryDefinition {
    pub from: Value,
    pub to: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormatDefinition {
    Date { pattern: String },
    Number { decimals: usize },
    Uppercase,
    Lowercase,
}

/// A preload declaration: either a bare relation path or a detailed entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreloadDefinition {
    Path(String),
    Detailed {
        relation: String,
        #[serde(default)]
        related: bool,
    },
}

/// Either `"field"` or `["field", "desc"]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderDefinition {
    Field(String),
    Directed(String, Direction),
}
