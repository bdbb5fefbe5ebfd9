use std::{fmt::Debug, ops::Deref, sync::Arc};

/// A wrapper type to allow for config injections
///
/// Every config added to a [`ConfigProvider`](crate::provider::ConfigProvider) is registered in
/// the container as `Config<T>`, so creators can take it as a parameter.
///
/// # Example
/// ```rust
/// use wire_config::{config::Config, provider::ConfigProvider};
/// use wire_di::{Creator, DiContainer};
///
/// pub struct HttpConfig {
///     port: u16,
/// }
/// pub struct HttpServer {
///     port: u16,
/// }
///
/// let mut provider = ConfigProvider::new();
/// provider.add_config(HttpConfig { port: 8080 }).unwrap();
///
/// let mut container = DiContainer::new();
/// container
///     .set(
///         provider
///             .into_creators()
///             .into_iter()
///             .chain([Creator::new(|config: Config<HttpConfig>| HttpServer {
///                 port: config.port,
///             })]),
///     )
///     .unwrap();
///
/// assert_eq!(container.get_as::<HttpServer>("HttpServer").unwrap().port, 8080);
/// ```
pub struct Config<T> {
    inner: Arc<T>,
}
impl<T> Clone for Config<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}
impl<T: Debug> Debug for Config<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Config").field(&self.inner).finish()
    }
}
impl<T> Deref for Config<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
impl<T> Config<T> {
    pub(crate) fn new(inner: Arc<T>) -> Self {
        Config { inner }
    }

    pub fn inner(&self) -> Arc<T> {
        self.inner.clone()
    }

    pub fn into_inner(self) -> Arc<T> {
        self.inner
    }
}
