use thiserror::Error;

use crate::types::{DynError, TypeInfo};

/// Errors while setting dependencies
///
/// Returned by the first failing step of [`DiContainer::set`](crate::container::DiContainer::set).
/// Instances registered by creators before the failure stay registered.
#[derive(Error, Debug)]
pub enum SetError {
    /// The supplied value is not a [`Creator`](crate::creator::Creator)
    #[error("invalid creator type: value at position {position} is not a creator")]
    InvalidCreatorType { position: usize },

    /// The creator declares no output
    #[error("invalid creator, no return value: creator at position {position}")]
    NoReturnValue { position: usize },

    /// The primary output is neither a struct, a reference nor a trait object
    #[error("invalid dependency type: '{0}'")]
    InvalidDependencyType(TypeInfo),

    /// The primary output has no name to register it under
    #[error("undefined dependency name: '{0}'")]
    UndefinedDependencyName(TypeInfo),

    /// A parameter has no registered instance
    #[error("missing dependency: '{key}' required by '{required_by}'")]
    MissingDependency { key: String, required_by: String },

    /// A registered instance is not of the type the parameter asks for
    #[error("dependency '{key}' is registered as '{actual}', but '{expected}' was required")]
    DependencyTypeMismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// The creator returned neither one nor two values
    #[error("invalid result for '{key}', expected 1 or 2 values but got {count}")]
    InvalidResultArity { key: String, count: usize },

    /// The second returned value is not a failure indicator
    #[error("invalid result for '{key}', expected the second value to be an error")]
    InvalidErrorShape { key: String },

    /// The returned value is not of the type the creator declared
    #[error("creator for '{key}' declared '{declared}', but returned '{actual}'")]
    ResultTypeMismatch {
        key: String,
        declared: &'static str,
        actual: &'static str,
    },

    /// The creator returned no value and reported no failure
    #[error("creator for '{key}' returned no value")]
    EmptyResult { key: String },

    /// The creator reported a failure
    #[error("creator for '{key}' failed: {source}")]
    CreatorFailed {
        key: String,
        #[source]
        source: DynError,
    },
}

impl SetError {
    /// The failure reported by a creator, exactly as it was returned
    pub fn creator_failure(&self) -> Option<&DynError> {
        match self {
            SetError::CreatorFailed { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Takes the failure reported by a creator, returning any other error unchanged
    pub fn into_creator_failure(self) -> Result<DynError, SetError> {
        match self {
            SetError::CreatorFailed { source, .. } => Ok(source),
            other => Err(other),
        }
    }
}
