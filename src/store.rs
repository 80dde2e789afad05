use crate::error::StoreError;
use crate::source::Source;

/// The object store the engine preloads relations through.
///
/// The store owns the relation-loaded cache and any synchronization around
/// it. The engine only asks whether a relation is loaded and requests loads.
pub trait ObjectStore: Send + Sync {
    /// Whether the dot-delimited relation `path` is already loaded on `object`.
    fn is_relation_loaded(&self, object: &dyn Source, path: &str) -> bool;

    /// Eagerly loads `paths` on every object of the batch. Errors are passed
    /// to the caller unchanged.
    fn load_relations(&self, objects: &[&dyn Source], paths: &[String]) -> Result<(), StoreError>;
}

/// A store for sources that are already fully materialized in memory, such
/// as `serde_json::Value` trees or [`Record`](crate::source::Record)s.
/// Every relation reports as loaded, so nothing is ever requested.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preloaded;

impl ObjectStore for Preloaded {
    fn is_relation_loaded(&self, _object: &dyn Source, _path: &str) -> bool {
        true
    }

    fn load_relations(&self, _objects: &[&dyn Source], _paths: &[String]) -> Result<(), StoreError> {
        Ok(())
    }
}
