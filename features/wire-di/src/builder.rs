use crate::{
    container::DiContainer,
    creator::{Creator, CreatorFn},
    errors::SetError,
    types::{DynError, Injectable},
};

/// Collects creators and builds a [`DiContainer`] from them in one go
///
/// ```
/// use wire_di::builder::DiBuilder;
///
/// #[derive(Clone)]
/// struct Settings {
///     name: &'static str,
/// }
/// struct Greeter {
///     greeting: String,
/// }
///
/// let container = DiBuilder::new()
///     .add(|settings: Settings| Greeter {
///         greeting: format!("Hello {}", settings.name),
///     })
///     .add_instance(Settings { name: "world" })
///     .build()
///     .unwrap();
///
/// let greeter = container.get_as::<Greeter>("Greeter").unwrap();
/// assert_eq!(greeter.greeting, "Hello world");
/// ```
#[derive(Debug, Default)]
pub struct DiBuilder {
    /// Registered creators, in the order they were added
    pub(crate) registered_creators: Vec<Creator>,
}

impl DiBuilder {
    pub fn new() -> Self {
        DiBuilder {
            registered_creators: Vec::new(),
        }
    }
}
impl DiBuilder {
    /// Registers an already created instance
    pub fn add_instance<T: Injectable>(self, instance: T) -> Self {
        self.add_creator(Creator::instance(instance))
    }

    /// Registers an infallible creator function
    pub fn add<Args: 'static, T: Injectable, F: CreatorFn<Args, T>>(self, creator: F) -> Self {
        self.add_creator(Creator::new(creator))
    }

    /// Registers a creator function which may fail
    pub fn add_fallible<Args, T, E, F>(self, creator: F) -> Self
    where
        F: CreatorFn<Args, Result<T, E>>,
        Args: 'static,
        T: Injectable,
        E: Into<DynError> + 'static,
    {
        self.add_creator(Creator::fallible(creator))
    }

    pub fn add_creator(mut self, creator: Creator) -> Self {
        self.registered_creators.push(creator);
        self
    }

    /// Builds the container, running all creators in a single [`DiContainer::set`]
    pub fn build(self) -> Result<DiContainer, SetError> {
        tracing::debug!(
            "Building container with {} creators",
            self.registered_creators.len()
        );

        let mut container = DiContainer::new();
        container.set(self.registered_creators)?;
        Ok(container)
    }
}
