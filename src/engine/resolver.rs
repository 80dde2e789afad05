use super::{Input, PreloadMode, TransformEngine};
use crate::error::TransformError;
use crate::source::{Related, Source};
use crate::structure::{Nested, Rule, Structure};
use crate::transformer::Transformer;
use serde_json::{Map, Value};
use tracing::trace;

/// Resolves one transformer's structure against source objects.
pub(super) struct Resolver<'e> {
    engine: &'e TransformEngine<'e>,
    transformer: &'e dyn Transformer,
    delegated: Vec<String>,
}

impl<'e> Resolver<'e> {
    pub(super) fn new(engine: &'e TransformEngine<'e>, transformer: &'e dyn Transformer) -> Self {
        let delegated = transformer
            .preload()
            .delegated()
            .map(str::to_string)
            .collect();
        Self {
            engine,
            transformer,
            delegated,
        }
    }

    pub(super) fn resolve(
        &self,
        object: &dyn Source,
        structure: &Structure,
    ) -> Result<Map<String, Value>, TransformError> {
        let mut out = Map::new();
        for (key, rule) in structure.iter() {
            if let Some(value) = self.resolve_rule(object, key, rule)? {
                out.insert(key.to_string(), value);
            }
        }
        Ok(out)
    }

    fn resolve_rule(
        &self,
        object: &dyn Source,
        key: &str,
        rule: &Rule,
    ) -> Result<Option<Value>, TransformError> {
        let value = match rule {
            Rule::Copy => self.value(object, key, key),
            Rule::Rename(source) => self.value(object, key, source),
            Rule::Nested(group) => Value::Object(self.resolve(object, group)?),
            Rule::Map(map) => map.apply(&self.value(object, key, map.source().unwrap_or(key))),
            Rule::Format(format) => {
                let raw = self.value(object, key, format.source().unwrap_or(key));
                if raw.is_null() {
                    Value::Null
                } else {
                    format
                        .apply(&raw)
                        .map_err(|reason| TransformError::Format {
                            key: key.to_string(),
                            value: raw.clone(),
                            reason,
                        })?
                }
            }
            Rule::Transform(nested) => self.nested(object, key, nested)?,
            Rule::Conditional(false, _) => {
                trace!(key, "conditional guard is false, omitting key");
                return Ok(None);
            }
            Rule::Conditional(true, inner) => return self.resolve_rule(object, key, inner),
        };
        Ok(Some(value))
    }

    /// Transformer getter for `key`, then the `source` field, then the
    /// object's accessor for `source`, then null.
    pub(super) fn value(&self, object: &dyn Source, key: &str, source: &str) -> Value {
        if let Some(value) = self.transformer.get(key, object) {
            trace!(key, "resolved through transformer getter");
            return value;
        }
        object
            .field(source)
            .or_else(|| object.accessor(source))
            .unwrap_or(Value::Null)
    }

    fn nested(
        &self,
        object: &dyn Source,
        key: &str,
        nested: &Nested,
    ) -> Result<Value, TransformError> {
        // Relations declared as related were preloaded with the parent batch.
        let mode = if self.delegated.iter().any(|relation| relation == key) {
            PreloadMode::Skip
        } else {
            PreloadMode::Plan
        };
        if let Some(value) = self.transformer.get(key, object) {
            return self.run(Input::from(Related::from_value(&value)), nested, mode);
        }
        if let Some(related) = object.relation(key) {
            return self.run(Input::from(related), nested, mode);
        }
        match object.field(key).or_else(|| object.accessor(key)) {
            Some(value) => self.run(Input::from(Related::from_value(&value)), nested, mode),
            None => self.run(Input::Null, nested, mode),
        }
    }

    fn run(
        &self,
        input: Input<'_>,
        nested: &Nested,
        mode: PreloadMode,
    ) -> Result<Value, TransformError> {
        self.engine
            .run(input, nested.transformer(), nested.variant(), mode)
    }
}
