use std::{any::Any, collections::HashMap, fmt::Debug, sync::Arc};

use crate::{
    creator::Creator,
    errors::SetError,
    initiator::DiInitiator,
    types::{Injectable, Instance},
};

/// Container holding all constructed instances, keyed by the name of their type
///
/// The container is the only writer of its registry. It does no locking - share it across
/// threads only behind external synchronization.
#[derive(Default)]
pub struct DiContainer {
    instances: HashMap<String, Instance>,
}
impl Debug for DiContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_struct("DiContainer");
        for (key, instance) in &self.instances {
            map.field(key, &instance.info.type_name);
        }
        map.finish()
    }
}

impl DiContainer {
    /// Creates a container with an empty registry
    pub fn new() -> Self {
        Self {
            instances: HashMap::new(),
        }
    }

    /// Runs the given creators and registers their results
    ///
    /// Creators without arguments run first, then creators with arguments in the supplied order.
    /// Returns the first error encountered. Instances registered before the error stay in the
    /// container.
    pub fn set(&mut self, creators: impl IntoIterator<Item = Creator>) -> Result<(), SetError> {
        self.set_any(
            creators
                .into_iter()
                .map(|creator| Box::new(creator) as Box<dyn Any + Send>),
        )
    }

    /// Same as [`DiContainer::set`], but accepts arbitrary values
    ///
    /// Values which are not a [`Creator`] fail with [`SetError::InvalidCreatorType`].
    pub fn set_any(
        &mut self,
        values: impl IntoIterator<Item = Box<dyn Any + Send>>,
    ) -> Result<(), SetError> {
        DiInitiator::new(&mut self.instances).initiate(values)
    }

    /// Returns the instance registered under `key`, if any
    pub fn get(&self, key: &str) -> Option<&Instance> {
        self.instances.get(key)
    }

    /// Returns the instance registered under `key` if it is a `T`
    pub fn get_as<T: Injectable>(&self, key: &str) -> Option<Arc<T>> {
        self.get(key)?.downcast().ok()
    }

    /// Returns a clone of the instance registered under `key` if it is a `T`
    pub fn get_cloned<T: Injectable + Clone>(&self, key: &str) -> Option<T> {
        self.get(key)?.downcast_ref::<T>().cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.instances.contains_key(key)
    }

    /// All registered keys, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.instances.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
