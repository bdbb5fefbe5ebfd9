use std::fmt::Debug;

use crate::{
    errors::SetError,
    types::{DynError, Injectable, Instance, TypeInfo, TypeKind},
};

/// A value which can be handed to a creator as a parameter
///
/// Implemented for every cloneable [`Injectable`]. The parameter is resolved by the registry key
/// of its type and receives a clone of the registered value.
pub trait Dependency: Sized {
    /// Returns the typeinfo the parameter is resolved by
    fn type_info() -> TypeInfo;

    /// Extracts the parameter from a registered instance
    fn from_instance(key: &str, instance: &Instance) -> Result<Self, SetError>;
}

impl<T: Injectable + Clone> Dependency for T {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<T>()
    }

    fn from_instance(key: &str, instance: &Instance) -> Result<Self, SetError> {
        match instance.downcast_ref::<T>() {
            Some(value) => Ok(value.clone()),
            None => Err(SetError::DependencyTypeMismatch {
                key: key.to_string(),
                expected: std::any::type_name::<T>(),
                actual: instance.info.type_name,
            }),
        }
    }
}

/// A function which can be turned into a [`Creator`]
///
/// Implemented for any `FnOnce` taking up to eight [`Dependency`] parameters.
pub trait CreatorFn<Args, Out>: Send + 'static {
    /// Returns the typeinfo of each parameter, in declaration order
    fn inputs() -> Vec<TypeInfo>;

    /// Calls the function with already resolved instances, one per parameter
    fn call(self, args: Vec<(String, Instance)>) -> Result<Out, SetError>;
}

macro_rules! impl_creator_fn {
    ($($arg:ident),*) => {
        impl<Func, Out, $($arg,)*> CreatorFn<($($arg,)*), Out> for Func
        where
            Func: FnOnce($($arg),*) -> Out + Send + 'static,
            $($arg: Dependency,)*
        {
            fn inputs() -> Vec<TypeInfo> {
                vec![$($arg::type_info()),*]
            }

            #[allow(non_snake_case, unused_mut)]
            fn call(self, args: Vec<(String, Instance)>) -> Result<Out, SetError> {
                let mut args = args.into_iter();
                $(
                    let $arg = match args.next() {
                        Some((key, instance)) => $arg::from_instance(&key, &instance)?,
                        None => {
                            return Err(SetError::MissingDependency {
                                key: $arg::type_info().key().unwrap_or_default(),
                                required_by: std::any::type_name::<Out>().to_string(),
                            })
                        }
                    };
                )*
                Ok(self($($arg),*))
            }
        }
    };
}

impl_creator_fn!();
impl_creator_fn!(A1);
impl_creator_fn!(A1, A2);
impl_creator_fn!(A1, A2, A3);
impl_creator_fn!(A1, A2, A3, A4);
impl_creator_fn!(A1, A2, A3, A4, A5);
impl_creator_fn!(A1, A2, A3, A4, A5, A6);
impl_creator_fn!(A1, A2, A3, A4, A5, A6, A7);
impl_creator_fn!(A1, A2, A3, A4, A5, A6, A7, A8);

/// One value returned by a creator
pub enum Output {
    /// A constructed value - None if the creator had nothing to return
    Value(Option<Instance>),
    /// The failure indicator - None if the creator succeeded
    Failure(Option<DynError>),
}
impl Debug for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Output::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Output::Failure(failure) => f
                .debug_tuple("Failure")
                .field(&failure.as_ref().map(ToString::to_string))
                .finish(),
        }
    }
}

/// Declared parameters and outputs of a creator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub inputs: Vec<TypeInfo>,
    pub outputs: Vec<TypeInfo>,
}
impl Signature {
    /// The type the creator's first output is registered as
    pub fn provides(&self) -> Option<TypeInfo> {
        self.outputs.first().copied()
    }
}

type Invoke = Box<dyn FnOnce(Vec<(String, Instance)>) -> Result<Vec<Output>, SetError> + Send>;

/// A single use constructor of one registry entry
///
/// ```
/// use wire_di::creator::Creator;
///
/// #[derive(Clone)]
/// struct Database {
///     url: String,
/// }
/// struct Repository {
///     db: Database,
/// }
///
/// let database = Creator::new(|| Database { url: "memory".to_string() });
/// let repository = Creator::new(|db: Database| Repository { db });
/// assert_eq!(repository.signature().inputs.len(), 1);
/// # let _ = database;
/// ```
pub struct Creator {
    signature: Signature,
    invoke: Invoke,
}
impl Debug for Creator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Creator")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

impl Creator {
    /// Creator for an infallible function
    ///
    /// A function returning `()` declares no output and is rejected when set.
    pub fn new<Args, T, F>(creator: F) -> Self
    where
        F: CreatorFn<Args, T>,
        Args: 'static,
        T: Injectable,
    {
        let provides = TypeInfo::of::<T>();
        let outputs = match provides.kind {
            TypeKind::Unit => vec![],
            _ => vec![provides],
        };

        Creator {
            signature: Signature {
                inputs: F::inputs(),
                outputs,
            },
            invoke: Box::new(move |args| {
                let value = creator.call(args)?;
                Ok(vec![Output::Value(Some(Instance::new(value)))])
            }),
        }
    }

    /// Creator for a function which may fail
    ///
    /// Returning `Err` aborts the whole [`set`](crate::container::DiContainer::set) call.
    pub fn fallible<Args, T, E, F>(creator: F) -> Self
    where
        F: CreatorFn<Args, Result<T, E>>,
        Args: 'static,
        T: Injectable,
        E: Into<DynError> + 'static,
    {
        Creator {
            signature: Signature {
                inputs: F::inputs(),
                outputs: vec![TypeInfo::of::<T>(), TypeInfo::failure()],
            },
            invoke: Box::new(move |args| {
                let outputs = match creator.call(args)? {
                    Ok(value) => vec![
                        Output::Value(Some(Instance::new(value))),
                        Output::Failure(None),
                    ],
                    Err(error) => vec![Output::Value(None), Output::Failure(Some(error.into()))],
                };
                Ok(outputs)
            }),
        }
    }

    /// Creator handing out an already existing value
    pub fn instance<T: Injectable>(instance: T) -> Self {
        Creator::new(move || instance)
    }

    /// Creator declaring its parameters and outputs as data
    ///
    /// `creator` receives one instance per declared input, in order, and may return any number of
    /// outputs. The returned outputs are validated when the creator runs.
    pub fn from_signature<F>(signature: Signature, creator: F) -> Self
    where
        F: FnOnce(Vec<Instance>) -> Vec<Output> + Send + 'static,
    {
        Creator {
            signature,
            invoke: Box::new(move |args| {
                Ok(creator(
                    args.into_iter().map(|(_, instance)| instance).collect(),
                ))
            }),
        }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Whether the creator can run without any registered instance
    pub fn is_zero_arg(&self) -> bool {
        self.signature.inputs.is_empty()
    }

    /// Runs the creator with its resolved arguments, each paired with the key it was found under
    pub(crate) fn invoke(self, args: Vec<(String, Instance)>) -> Result<Vec<Output>, SetError> {
        (self.invoke)(args)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Settings {
        name: String,
    }
    #[derive(Debug, Clone, PartialEq)]
    struct Service {
        name: String,
        retries: u32,
    }

    fn settings() -> Instance {
        Instance::new(Settings {
            name: "service".to_string(),
        })
    }

    #[test]
    fn test_new_declares_signature() {
        let creator = Creator::new(|settings: Settings, _shared: Arc<Settings>| Service {
            name: settings.name,
            retries: 0,
        });

        let signature = creator.signature();
        assert_eq!(
            signature.inputs,
            vec![TypeInfo::of::<Settings>(), TypeInfo::of::<Arc<Settings>>()]
        );
        assert_eq!(signature.outputs, vec![TypeInfo::of::<Service>()]);
        assert_eq!(signature.provides(), Some(TypeInfo::of::<Service>()));
        assert!(!creator.is_zero_arg());
    }

    #[test]
    fn test_unit_return_declares_no_output() {
        let creator = Creator::new(|| ());

        assert!(creator.signature().outputs.is_empty());
        assert!(creator.is_zero_arg());
    }

    #[test]
    fn test_fallible_declares_failure_output() {
        let creator = Creator::fallible(|| Ok::<_, std::io::Error>(Service {
            name: "service".to_string(),
            retries: 3,
        }));

        assert_eq!(
            creator.signature().outputs,
            vec![TypeInfo::of::<Service>(), TypeInfo::failure()]
        );
    }

    #[test]
    fn test_invoke_passes_arguments() {
        let creator = Creator::new(|settings: Settings| Service {
            name: settings.name,
            retries: 1,
        });

        let outputs = creator
            .invoke(vec![("Settings".to_string(), settings())])
            .unwrap();

        match outputs.as_slice() {
            [Output::Value(Some(instance))] => {
                assert_eq!(
                    instance.downcast_ref::<Service>(),
                    Some(&Service {
                        name: "service".to_string(),
                        retries: 1
                    })
                );
            }
            other => panic!("unexpected outputs: {other:?}"),
        }
    }

    #[test]
    fn test_invoke_rejects_mismatched_instance() {
        let creator = Creator::new(|settings: Settings| Service {
            name: settings.name,
            retries: 1,
        });

        let error = creator
            .invoke(vec![("Settings".to_string(), Instance::new(Arc::new(1u8)))])
            .unwrap_err();

        assert!(matches!(
            error,
            SetError::DependencyTypeMismatch { ref key, .. } if key == "Settings"
        ));
    }

    #[test]
    fn test_fallible_err_reports_failure() {
        let creator = Creator::fallible(|| {
            Err::<Service, _>(std::io::Error::new(std::io::ErrorKind::Other, "offline"))
        });

        let outputs = creator.invoke(vec![]).unwrap();

        match outputs.as_slice() {
            [Output::Value(None), Output::Failure(Some(error))] => {
                assert_eq!(error.to_string(), "offline")
            }
            other => panic!("unexpected outputs: {other:?}"),
        }
    }

    #[test]
    fn test_from_signature_receives_instances() {
        let creator = Creator::from_signature(
            Signature {
                inputs: vec![TypeInfo::of::<Settings>()],
                outputs: vec![TypeInfo::of::<Service>()],
            },
            |args| {
                let name = args[0]
                    .downcast_ref::<Settings>()
                    .map(|settings| settings.name.clone())
                    .unwrap_or_default();
                vec![Output::Value(Some(Instance::new(Service { name, retries: 2 })))]
            },
        );

        let outputs = creator
            .invoke(vec![("Settings".to_string(), settings())])
            .unwrap();

        assert!(matches!(outputs.as_slice(), [Output::Value(Some(_))]));
    }
}
