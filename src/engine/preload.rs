use crate::error::SpecError;
use crate::source::Source;
use crate::store::ObjectStore;
use crate::transformer::{Transformer, Variant};
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use tracing::{debug, trace};

/// Whether a declared relation is preloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Always,
    When(bool),
    /// Load the relation and everything its nested transformer declares.
    Related,
}

/// Sentinel guard delegating preload declaration to the nested transformer
/// bound to the same relation.
pub const PRELOAD_RELATED: Guard = Guard::Related;

/// The relations a transformer declares for preloading, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preloads {
    relations: IndexMap<String, Guard>,
}

impl Preloads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `path`. Declaring a path twice keeps its first position and
    /// the later guard, except that [`Guard::Related`] is never downgraded.
    pub fn insert(mut self, path: impl Into<String>, guard: Guard) -> Self {
        let path = path.into();
        let guard = match self.relations.get(&path) {
            Some(Guard::Related) => Guard::Related,
            _ => guard,
        };
        self.relations.insert(path, guard);
        self
    }

    pub fn with(self, path: impl Into<String>) -> Self {
        self.insert(path, Guard::Always)
    }

    pub fn when(self, path: impl Into<String>, condition: bool) -> Self {
        self.insert(path, Guard::When(condition))
    }

    pub fn related(self, path: impl Into<String>) -> Self {
        self.insert(path, Guard::Related)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Guard)> {
        self.relations
            .iter()
            .map(|(path, guard)| (path.as_str(), *guard))
    }

    /// Relations declared with [`Guard::Related`].
    pub fn delegated(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, guard)| *guard == Guard::Related)
            .map(|(path, _)| path)
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }
}

impl<S: Into<String>> FromIterator<S> for Preloads {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Preloads::new(), |preloads, path| preloads.with(path))
    }
}

/// Computes the relation paths to load before a batch is resolved.
pub struct PreloadPlanner<'s> {
    store: &'s dyn ObjectStore,
}

impl<'s> PreloadPlanner<'s> {
    pub fn new(store: &'s dyn ObjectStore) -> Self {
        Self { store }
    }

    /// Every path the transformer declares, including those reached through
    /// [`Guard::Related`], in depth-first order of first discovery.
    pub fn declared(
        &self,
        transformer: &dyn Transformer,
        variant: Variant,
    ) -> Result<IndexSet<String>, SpecError> {
        let mut paths = IndexSet::new();
        collect(transformer, variant, "", &mut paths)?;
        Ok(paths)
    }

    /// The declared paths minus those already loaded on every object.
    /// Planning again after loading yields nothing.
    pub fn plan(
        &self,
        transformer: &dyn Transformer,
        variant: Variant,
        objects: &[&dyn Source],
    ) -> Result<IndexSet<String>, SpecError> {
        let mut paths = self.declared(transformer, variant)?;
        paths.retain(|path| {
            !objects
                .iter()
                .all(|object| self.store.is_relation_loaded(*object, path))
        });
        debug!(
            transformer = transformer.name(),
            objects = objects.len(),
            "planned preload [{}]",
            paths.iter().join(", ")
        );
        Ok(paths)
    }
}

fn collect(
    transformer: &dyn Transformer,
    variant: Variant,
    prefix: &str,
    paths: &mut IndexSet<String>,
) -> Result<(), SpecError> {
    let preloads = transformer.preload();
    let structure = match preloads.delegated().next() {
        Some(_) => Some(transformer.structure_for(variant)?),
        None => None,
    };

    for (relation, guard) in preloads.iter() {
        let path = if prefix.is_empty() {
            relation.to_string()
        } else {
            format!("{}.{}", prefix, relation)
        };

        match guard {
            Guard::When(false) => trace!(path = %path, "preload guard is false, skipping"),
            Guard::Always | Guard::When(true) => {
                paths.insert(path);
            }
            Guard::Related => {
                paths.insert(path.clone());
                match structure
                    .as_ref()
                    .and_then(|structure| structure.find_transform(relation))
                {
                    Some(nested) => collect(nested.transformer(), nested.variant(), &path, paths)?,
                    None => debug!(
                        transformer = transformer.name(),
                        relation, "no nested transformer bound to related preload"
                    ),
                }
            }
        }
    }
    Ok(())
}
