use crate::error::{SpecError, TransformError};
use crate::source::{Related, Source};
use crate::store::ObjectStore;
use crate::structure::Structure;
use crate::transformer::{Transformer, Variant};
use ahash::AHashSet;
use serde_json::Value;
use std::fmt;
use tracing::{debug, trace};

pub mod ordering;
pub mod preload;
mod resolver;

pub use ordering::{Direction, OrderBy};
pub use preload::{Guard, PRELOAD_RELATED, PreloadPlanner, Preloads};

use resolver::Resolver;

/// What a transform pass runs over.
pub enum Input<'a> {
    Null,
    One(&'a dyn Source),
    Many(Vec<Option<&'a dyn Source>>),
}

impl<'a> Input<'a> {
    pub fn one(object: &'a dyn Source) -> Self {
        Input::One(object)
    }

    /// A collection; elements that are null sources become absent elements.
    pub fn many<T: Source>(objects: &'a [T]) -> Self {
        Input::Many(
            objects
                .iter()
                .map(|object| (!object.is_null()).then_some(object as &dyn Source))
                .collect(),
        )
    }
}

impl<'a, T: Source> From<&'a T> for Input<'a> {
    fn from(object: &'a T) -> Self {
        Input::One(object)
    }
}

impl<'a, T: Source> From<Option<&'a T>> for Input<'a> {
    fn from(object: Option<&'a T>) -> Self {
        match object {
            Some(object) => Input::One(object),
            None => Input::Null,
        }
    }
}

impl<'a> From<Related<'a>> for Input<'a> {
    fn from(related: Related<'a>) -> Self {
        match related {
            Related::Null => Input::Null,
            Related::One(object) => Input::One(object),
            Related::Many(objects) => Input::Many(objects),
        }
    }
}

/// The stages of one transform pass. A pass moves through them strictly in
/// order and never goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Created,
    PreProcessed,
    Preloaded,
    Resolved,
    Ordered,
    PostProcessed,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Created => "created",
            Stage::PreProcessed => "pre-processed",
            Stage::Preloaded => "preloaded",
            Stage::Resolved => "resolved",
            Stage::Ordered => "ordered",
            Stage::PostProcessed => "post-processed",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PreloadMode {
    Plan,
    /// The relations were already requested by an enclosing pass.
    Skip,
}

/// Runs transformers over source objects.
///
/// The engine holds nothing but a reference to the object store, so one
/// engine can serve any number of passes, from any number of threads when
/// the store allows it.
pub struct TransformEngine<'s> {
    store: &'s dyn ObjectStore,
}

impl<'s> TransformEngine<'s> {
    pub fn new(store: &'s dyn ObjectStore) -> Self {
        Self { store }
    }

    /// Transforms a single object, a collection, or nothing.
    ///
    /// Returns an ordered object for a single input, an array for a
    /// collection, and the transformer's null-state for an absent input.
    pub fn transform<'a>(
        &self,
        input: impl Into<Input<'a>>,
        transformer: &dyn Transformer,
        variant: Variant,
    ) -> Result<Value, TransformError> {
        self.run(input.into(), transformer, variant, PreloadMode::Plan)
    }

    pub(crate) fn run(
        &self,
        input: Input<'_>,
        transformer: &dyn Transformer,
        variant: Variant,
        mode: PreloadMode,
    ) -> Result<Value, TransformError> {
        match input {
            Input::Null => self.single(None, transformer, variant, mode),
            Input::One(object) => {
                self.single((!object.is_null()).then_some(object), transformer, variant, mode)
            }
            Input::Many(objects) => self.collection(objects, transformer, variant, mode),
        }
    }

    fn single(
        &self,
        object: Option<&dyn Source>,
        transformer: &dyn Transformer,
        variant: Variant,
        mode: PreloadMode,
    ) -> Result<Value, TransformError> {
        let name = transformer.name();
        stage(name, Stage::Created);

        let object = transformer.before_item(object);
        stage(name, Stage::PreProcessed);

        let Some(object) = object else {
            debug!(transformer = name, "null object, returning null-state");
            let result = transformer.after_item(transformer.null_state(), None);
            stage(name, Stage::Done);
            return Ok(result);
        };

        let structure = transformer.structure_for(variant)?;
        if mode == PreloadMode::Plan {
            validate_nested(transformer, variant, &structure)?;
            self.preload(transformer, variant, &[object])?;
        }
        stage(name, Stage::Preloaded);

        let result = Value::Object(Resolver::new(self, transformer).resolve(object, &structure)?);
        stage(name, Stage::Resolved);
        stage(name, Stage::Ordered);

        let result = transformer.after_item(result, Some(object));
        stage(name, Stage::PostProcessed);
        stage(name, Stage::Done);
        Ok(result)
    }

    fn collection(
        &self,
        objects: Vec<Option<&dyn Source>>,
        transformer: &dyn Transformer,
        variant: Variant,
        mode: PreloadMode,
    ) -> Result<Value, TransformError> {
        let name = transformer.name();
        stage(name, Stage::Created);

        let objects: Vec<Option<&dyn Source>> = objects
            .into_iter()
            .map(|object| object.filter(|object| !object.is_null()))
            .collect();
        let objects: Vec<Option<&dyn Source>> = transformer
            .before_collection(objects)
            .into_iter()
            .map(|object| transformer.before_item(object))
            .collect();
        stage(name, Stage::PreProcessed);

        let structure = transformer.structure_for(variant)?;
        let present: Vec<&dyn Source> = objects.iter().flatten().copied().collect();
        if mode == PreloadMode::Plan && !present.is_empty() {
            validate_nested(transformer, variant, &structure)?;
            self.preload(transformer, variant, &present)?;
        }
        stage(name, Stage::Preloaded);

        let resolver = Resolver::new(self, transformer);
        let mut results = objects
            .iter()
            .map(|object| -> Result<Value, TransformError> {
                let result = match object {
                    Some(object) => Value::Object(resolver.resolve(*object, &structure)?),
                    None => transformer.null_state(),
                };
                Ok(transformer.after_item(result, *object))
            })
            .collect::<Result<Vec<_>, TransformError>>()?;
        stage(name, Stage::Resolved);

        if let Some(order) = transformer.ordering() {
            debug!(
                transformer = name,
                field = order.field(),
                direction = ?order.direction(),
                "ordering results"
            );
            order.sort(&mut results);
        }
        stage(name, Stage::Ordered);

        let results = transformer.after_collection(results, &objects);
        stage(name, Stage::PostProcessed);
        stage(name, Stage::Done);
        Ok(Value::Array(results))
    }

    fn preload(
        &self,
        transformer: &dyn Transformer,
        variant: Variant,
        objects: &[&dyn Source],
    ) -> Result<(), TransformError> {
        let paths = PreloadPlanner::new(self.store).plan(transformer, variant, objects)?;
        if paths.is_empty() {
            return Ok(());
        }
        let paths: Vec<String> = paths.into_iter().collect();
        debug!(
            transformer = transformer.name(),
            objects = objects.len(),
            relations = paths.len(),
            "loading relations"
        );
        self.store.load_relations(objects, &paths)?;
        Ok(())
    }
}

/// Builds every nested structure reachable from `structure` so an invalid
/// one fails the pass before the store is touched. Each transformer and
/// variant is built once, which also stops self-nesting transformers.
fn validate_nested(
    transformer: &dyn Transformer,
    variant: Variant,
    structure: &Structure,
) -> Result<(), SpecError> {
    fn walk(
        structure: &Structure,
        seen: &mut AHashSet<(String, Variant)>,
    ) -> Result<(), SpecError> {
        for nested in structure.transforms() {
            let transformer = nested.transformer();
            if seen.insert((transformer.name().to_string(), nested.variant())) {
                walk(&transformer.structure_for(nested.variant())?, seen)?;
            }
        }
        Ok(())
    }

    let mut seen = AHashSet::new();
    seen.insert((transformer.name().to_string(), variant));
    walk(structure, &mut seen)
}

fn stage(transformer: &str, stage: Stage) {
    trace!(transformer, stage = %stage, "transform stage");
}
