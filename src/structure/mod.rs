use crate::transformer::{Transformer, Variant};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

mod builder;
pub mod format;
pub mod map;

pub use builder::StructureBuilder;
pub use format::{Format, FormatKind, MAX_DECIMALS};
pub use map::{Fallback, ValueMap};

/// How a single output key is produced.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Copy the source field with the same name as the output key.
    Copy,
    /// Copy a source field under a different output key.
    Rename(String),
    /// Group fields of the same object under a namespace key.
    Nested(Structure),
    /// Map the raw value through a literal table.
    Map(ValueMap),
    /// Format the raw value, e.g. a date into a pattern.
    Format(Format),
    /// Delegate a related object or collection to another transformer.
    Transform(Nested),
    /// Include the inner rule only when the guard was true at build time.
    Conditional(bool, Box<Rule>),
}

impl Rule {
    /// The rule that actually applies once conditionals are unwrapped, or
    /// `None` when a guard is false.
    pub fn effective(&self) -> Option<&Rule> {
        match self {
            Rule::Conditional(false, _) => None,
            Rule::Conditional(true, inner) => inner.effective(),
            other => Some(other),
        }
    }
}

/// A nested transformer bound to an output key.
#[derive(Clone)]
pub struct Nested {
    transformer: Arc<dyn Transformer>,
    variant: Variant,
}

impl Nested {
    pub fn new(transformer: impl Transformer + 'static) -> Self {
        Self::shared(Arc::new(transformer))
    }

    pub fn shared(transformer: Arc<dyn Transformer>) -> Self {
        Self {
            transformer,
            variant: Variant::Full,
        }
    }

    /// Renders the related object(s) with the minimal structure.
    pub fn minimal(mut self) -> Self {
        self.variant = Variant::Minimal;
        self
    }

    pub fn transformer(&self) -> &dyn Transformer {
        self.transformer.as_ref()
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }
}

impl fmt::Debug for Nested {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Nested")
            .field("transformer", &self.transformer.name())
            .field("variant", &self.variant)
            .finish()
    }
}

/// An ordered, validated mapping from output key to [`Rule`].
///
/// Structures are only produced by [`StructureBuilder::build`], which rejects
/// duplicate keys and undefined defaults, so a `Structure` is always valid
/// and never changes after construction.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    rules: IndexMap<String, Rule>,
}

impl Structure {
    pub fn builder() -> StructureBuilder {
        StructureBuilder::new()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(key, rule)| (key.as_str(), rule))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Rule> {
        self.rules.get(key)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Every nested transformer reachable from this structure without
    /// leaving the object: top-level rules, inline groups and conditionals
    /// whose guard holds.
    pub fn transforms(&self) -> Vec<&Nested> {
        self.rules
            .values()
            .filter_map(Rule::effective)
            .flat_map(|rule| match rule {
                Rule::Transform(nested) => vec![nested],
                Rule::Nested(group) => group.transforms(),
                _ => Vec::new(),
            })
            .collect()
    }

    /// Finds the nested transformer bound to `relation`, looking through
    /// inline groups and conditionals whose guard holds.
    pub fn find_transform(&self, relation: &str) -> Option<&Nested> {
        self.rules.iter().find_map(|(key, rule)| match rule.effective()? {
            Rule::Transform(nested) if key == relation => Some(nested),
            Rule::Nested(group) => group.find_transform(relation),
            _ => None,
        })
    }
}
