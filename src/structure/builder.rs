use super::{Format, Nested, Rule, Structure, ValueMap};
use crate::error::SpecError;
use crate::transformer::Transformer;
use indexmap::IndexMap;
use itertools::Itertools;

/// Builds a [`Structure`], validating it in [`build`](Self::build).
///
/// Rules keep the order they are declared in. Errors from inline groups are
/// held until `build` so the chain never has to be broken up.
#[derive(Debug, Default)]
pub struct StructureBuilder {
    rules: Vec<(String, Rule)>,
    error: Option<SpecError>,
}

impl StructureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, key: impl Into<String>, rule: Rule) -> Self {
        self.rules.push((key.into(), rule));
        self
    }

    pub fn field(self, key: impl Into<String>) -> Self {
        self.rule(key, Rule::Copy)
    }

    pub fn fields<I, S>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        keys.into_iter().fold(self, |builder, key| builder.field(key))
    }

    pub fn rename(self, key: impl Into<String>, source: impl Into<String>) -> Self {
        self.rule(key, Rule::Rename(source.into()))
    }

    /// Groups fields of the same object under `key`.
    pub fn group<F>(mut self, key: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(StructureBuilder) -> StructureBuilder,
    {
        match build(StructureBuilder::new()).build() {
            Ok(group) => self.rule(key, Rule::Nested(group)),
            Err(e) => {
                self.error.get_or_insert(e);
                self
            }
        }
    }

    pub fn map(self, key: impl Into<String>, map: ValueMap) -> Self {
        self.rule(key, Rule::Map(map))
    }

    pub fn format(self, key: impl Into<String>, format: Format) -> Self {
        self.rule(key, Rule::Format(format))
    }

    pub fn transform(self, key: impl Into<String>, transformer: impl Transformer + 'static) -> Self {
        self.nested(key, Nested::new(transformer))
    }

    pub fn transform_minimal(
        self,
        key: impl Into<String>,
        transformer: impl Transformer + 'static,
    ) -> Self {
        self.nested(key, Nested::new(transformer).minimal())
    }

    pub fn nested(self, key: impl Into<String>, nested: Nested) -> Self {
        self.rule(key, Rule::Transform(nested))
    }

    /// Adds `rule` under `key` only if `condition` holds. A false condition
    /// leaves the key out of the output entirely.
    pub fn when(self, condition: bool, key: impl Into<String>, rule: Rule) -> Self {
        self.rule(key, Rule::Conditional(condition, Box::new(rule)))
    }

    pub fn build(self) -> Result<Structure, SpecError> {
        if let Some(e) = self.error {
            return Err(e);
        }

        if let Some(key) = self.rules.iter().map(|(key, _)| key).duplicates().next() {
            return Err(SpecError::DuplicateKey { key: key.clone() });
        }

        for (key, rule) in &self.rules {
            validate_rule(key, rule)?;
        }

        let rules: IndexMap<String, Rule> = self.rules.into_iter().collect();
        Ok(Structure { rules })
    }
}

fn validate_rule(key: &str, rule: &Rule) -> Result<(), SpecError> {
    match rule {
        Rule::Map(map) => map
            .check_fallback()
            .map_err(|entry| SpecError::UndefinedDefault {
                key: key.to_string(),
                entry: entry.clone(),
            }),
        // Checked even when the guard is false.
        Rule::Conditional(_, inner) => validate_rule(key, inner),
        _ => Ok(()),
    }
}
