use wire_di::types::TypeInfo;

/// Lookup of a config type that was never added to the [`ConfigProvider`](crate::provider::ConfigProvider)
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GetConfigError {
    #[error("no config of type '{0}' was added")]
    Missing(TypeInfo),
}

/// A config type can be added only once, the first value stays
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegisterConfigError {
    #[error("config of type '{0}' was already added")]
    AlreadyRegistered(TypeInfo),
}
