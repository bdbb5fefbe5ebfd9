use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::Arc,
};

use wire_di::{types::TypeInfo, Creator};

use crate::{
    config::Config,
    errors::{GetConfigError, RegisterConfigError},
};

type MakeCreator = Box<dyn Fn() -> Creator + Send + Sync>;

struct ConfigEntry {
    info: TypeInfo,
    config: Arc<dyn Any + Send + Sync + 'static>,
    make_creator: MakeCreator,
}

/// A provider to register all configs.
///
/// Configs can be registered and retrieved based on type, and handed to a
/// [`DiContainer`](wire_di::DiContainer) as creators of [`Config<T>`].
#[derive(Default)]
pub struct ConfigProvider {
    configs: HashMap<TypeId, ConfigEntry>,
}
impl std::fmt::Debug for ConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.configs.values().map(|entry| entry.info.type_name))
            .finish()
    }
}

impl ConfigProvider {
    /// Initializes an empty Config Provider
    pub fn new() -> Self {
        Self {
            configs: HashMap::new(),
        }
    }

    /// Retrieve a config with specified type.
    ///
    /// If the config type is not available, it will return a [`GetConfigError`]
    pub fn get_config<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, GetConfigError> {
        self.configs
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.config.clone().downcast().ok())
            .ok_or_else(|| GetConfigError::Missing(TypeInfo::of::<T>()))
    }

    /// Add a config to the registry.
    ///
    /// If the config type is already registered, it will return a [`RegisterConfigError`]
    pub fn add_config<T: Send + Sync + 'static>(
        &mut self,
        config: T,
    ) -> Result<&mut Self, RegisterConfigError> {
        let info = TypeInfo::of::<T>();
        if self.configs.contains_key(&info.type_id) {
            return Err(RegisterConfigError::AlreadyRegistered(info));
        }

        let config = Arc::new(config);
        let shared = config.clone();
        let make_creator: MakeCreator =
            Box::new(move || Creator::instance(Config::new(shared.clone())));

        tracing::debug!("Registered config {}", info.type_name);
        self.configs.insert(
            info.type_id,
            ConfigEntry {
                info,
                config,
                make_creator,
            },
        );
        Ok(self)
    }

    /// Can optionally add a config to the registry.
    ///
    /// If the config provided is `Some(T)`, it will be the same as calling [`ConfigProvider::add_config`]
    /// If the config provided is `None`, then the function just returns `Ok(self)` for chaining
    pub fn maybe_add_config<T: Send + Sync + 'static>(
        &mut self,
        config: Option<T>,
    ) -> Result<&mut Self, RegisterConfigError> {
        match config {
            Some(c) => self.add_config(c),
            None => Ok(self),
        }
    }

    /// One creator without arguments per registered config, each providing a [`Config<T>`]
    pub fn creators(&self) -> Vec<Creator> {
        self.configs
            .values()
            .map(|entry| (entry.make_creator)())
            .collect()
    }

    pub fn into_creators(self) -> Vec<Creator> {
        self.creators()
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
