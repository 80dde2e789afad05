use crate::error::ConstructionError;
use ahash::AHashMap;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;

/// Collaborators a transformer needs, keyed by type.
///
/// Dependencies are resolved once, when the transformer is constructed.
/// A missing dependency fails construction and no transform begins.
#[derive(Default)]
pub struct Container {
    instances: AHashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: Any + Send + Sync>(mut self, instance: T) -> Self {
        self.register(instance);
        self
    }

    pub fn register<T: Any + Send + Sync>(&mut self, instance: T) -> &mut Self {
        self.instances.insert(TypeId::of::<T>(), Arc::new(instance));
        self
    }

    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.instances.contains_key(&TypeId::of::<T>())
    }

    pub fn resolve<T: Any + Send + Sync>(&self) -> Result<Arc<T>, ConstructionError> {
        self.instances
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|instance| instance.downcast::<T>().ok())
            .ok_or(ConstructionError::MissingDependency {
                type_name: type_name::<T>(),
            })
    }

    /// Constructs `T`, resolving its dependencies from this container.
    pub fn make<T: FromContainer>(&self) -> Result<T, ConstructionError> {
        T::from_container(self)
    }
}

/// A transformer that can be built from a [`Container`].
pub trait FromContainer: Sized {
    fn from_container(container: &Container) -> Result<Self, ConstructionError>;
}
