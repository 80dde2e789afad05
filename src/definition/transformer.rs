use super::conversion::IntoDefinition;
use super::model::{
    FieldDefinition, FormatDefinition, OrderDefinition, PreloadDefinition, RuleDefinition,
    TransformerDefinition,
};
use crate::engine::{OrderBy, Preloads};
use crate::error::{DefinitionError, SpecError};
use crate::structure::{Format, MAX_DECIMALS, Nested, Rule, Structure, ValueMap};
use crate::transformer::Transformer;
use serde_json::Value;

/// A transformer built from a [`TransformerDefinition`].
///
/// Both structures are built and validated once, in [`new`](Self::new), so
/// an invalid definition never reaches a transform pass.
#[derive(Debug, Clone)]
pub struct DefinedTransformer {
    definition: TransformerDefinition,
    full: Structure,
    minimal: Structure,
    preloads: Preloads,
}

impl DefinedTransformer {
    pub fn new(source: impl IntoDefinition) -> Result<Self, DefinitionError> {
        let definition = source.into_definition()?;
        let full = build_structure(&definition.name, &definition.fields)?;
        let minimal = match &definition.minimal {
            Some(keys) => minimal_structure(&definition.name, &full, keys)?,
            None => full.clone(),
        };
        let preloads = build_preloads(&definition);
        Ok(Self {
            definition,
            full,
            minimal,
            preloads,
        })
    }

    pub fn definition(&self) -> &TransformerDefinition {
        &self.definition
    }
}

impl Transformer for DefinedTransformer {
    fn name(&self) -> &str {
        &self.definition.name
    }

    fn structure(&self) -> Result<Structure, SpecError> {
        Ok(self.full.clone())
    }

    fn minimal_structure(&self) -> Result<Structure, SpecError> {
        Ok(self.minimal.clone())
    }

    fn preload(&self) -> Preloads {
        self.preloads.clone()
    }

    fn ordering(&self) -> Option<OrderBy> {
        self.definition.order_by.as_ref().map(|order| match order {
            OrderDefinition::Field(field) => OrderBy::asc(field.as_str()),
            OrderDefinition::Directed(field, direction) => OrderBy::new(field.as_str(), *direction),
        })
    }

    fn null_state(&self) -> Value {
        self.definition.null_state.clone()
    }
}

fn build_structure(name: &str, fields: &[FieldDefinition]) -> Result<Structure, DefinitionError> {
    let spec_error = |source: SpecError| DefinitionError::Spec {
        transformer: name.to_string(),
        source,
    };

    let mut builder = Structure::builder();
    for field in fields {
        let rule = match &field.rule {
            RuleDefinition::Copy => Rule::Copy,
            RuleDefinition::Rename { from } => Rule::Rename(from.clone()),
            RuleDefinition::Group { fields } => Rule::Nested(build_structure(name, fields)?),
            RuleDefinition::Map {
                from,
                table,
                default,
            } => {
                let mut map = table
                    .iter()
                    .fold(ValueMap::new(), |map, entry| {
                        map.entry(entry.from.clone(), entry.to.clone())
                    });
                if let Some(from) = from {
                    map = map.from_field(from.as_str());
                }
                if let Some(default) = default {
                    map = map.with_default(default.clone());
                }
                Rule::Map(map)
            }
            RuleDefinition::Format { from, format } => {
                let mut format = match format {
                    FormatDefinition::Date { pattern } => Format::date(pattern.as_str()),
                    FormatDefinition::Number { decimals } if *decimals > MAX_DECIMALS => {
                        return Err(DefinitionError::Validation(format!(
                            "field '{}' of '{}' asks for {} decimals, at most {} are supported",
                            field.key, name, decimals, MAX_DECIMALS
                        )));
                    }
                    FormatDefinition::Number { decimals } => Format::number(*decimals),
                    FormatDefinition::Uppercase => Format::uppercase(),
                    FormatDefinition::Lowercase => Format::lowercase(),
                };
                if let Some(from) = from {
                    format = format.from_field(from.as_str());
                }
                Rule::Format(format)
            }
            RuleDefinition::Transform {
                transformer,
                minimal,
                ..
            } => {
                let nested = Nested::new(DefinedTransformer::new(transformer.as_ref().clone())?);
                Rule::Transform(if *minimal { nested.minimal() } else { nested })
            }
        };
        builder = builder.rule(field.key.as_str(), rule);
    }
    builder.build().map_err(spec_error)
}

fn minimal_structure(
    name: &str,
    full: &Structure,
    keys: &[String],
) -> Result<Structure, DefinitionError> {
    let mut builder = Structure::builder();
    for key in keys {
        let rule = full
            .get(key)
            .ok_or_else(|| DefinitionError::UnknownMinimalField {
                transformer: name.to_string(),
                key: key.clone(),
            })?;
        builder = builder.rule(key.as_str(), rule.clone());
    }
    builder.build().map_err(|source| DefinitionError::Spec {
        transformer: name.to_string(),
        source,
    })
}

fn build_preloads(definition: &TransformerDefinition) -> Preloads {
    let mut related = Vec::new();
    related_fields(&definition.fields, &mut related);

    let declared = definition.preload.iter().map(|preload| match preload {
        PreloadDefinition::Path(path) => (path.clone(), false),
        PreloadDefinition::Detailed { relation, related } => (relation.clone(), *related),
    });

    declared
        .chain(related.into_iter().map(|key| (key, true)))
        .fold(Preloads::new(), |preloads, (path, related)| {
            if related {
                preloads.related(path)
            } else {
                preloads.with(path)
            }
        })
}

/// Keys of `transform` fields marked `preload_related`, inline groups included.
fn related_fields(fields: &[FieldDefinition], keys: &mut Vec<String>) {
    for field in fields {
        match &field.rule {
            RuleDefinition::Transform {
                preload_related: true,
                ..
            } => keys.push(field.key.clone()),
            RuleDefinition::Group { fields } => related_fields(fields, keys),
            _ => {}
        }
    }
}
