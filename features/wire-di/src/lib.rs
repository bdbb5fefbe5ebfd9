//! Wire DI wires an application together from plain constructor functions.
//!
//! Every creator produces one value. The value is registered under the name of its type, and
//! creators with parameters receive clones of the values registered under their parameters'
//! type names.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use wire_di::{container::DiContainer, creator::Creator};
//!
//! #[derive(Clone)]
//! struct Settings {
//!     url: String,
//! }
//! struct Pool {
//!     url: String,
//! }
//! struct Repository {
//!     pool: Arc<Pool>,
//! }
//!
//! let mut container = DiContainer::new();
//! container
//!     .set([
//!         // Creators with arguments run in the order given here
//!         Creator::new(|settings: Settings| Arc::new(Pool { url: settings.url })),
//!         Creator::new(|pool: Arc<Pool>| Repository { pool }),
//!         // Creators without arguments always run first
//!         Creator::new(|| Settings {
//!             url: "postgres://localhost".to_string(),
//!         }),
//!     ])
//!     .unwrap();
//!
//! let repository = container.get_as::<Repository>("Repository").unwrap();
//! assert_eq!(repository.pool.url, "postgres://localhost");
//! ```
//!
//! Wire DI consists of the following components:
//!
//! 1. Creator - type-erased constructor functions and their declared signature
//! 2. Classifier - splits creators into those with and without arguments
//! 3. Initiator - runs creators, resolves their arguments and validates their results
//! 4. Container - the registry of constructed instances
//! 5. Builder - fluent registration of creators
//!
//! There is no dependency graph. Creators with arguments are never reordered, so a creator must
//! be supplied after the creators with arguments it depends on.

pub mod builder;
mod classifier;
pub mod container;
pub mod creator;
pub mod errors;
mod initiator;
pub mod types;

pub use builder::DiBuilder;
pub use container::DiContainer;
pub use creator::{Creator, Output, Signature};
pub use errors::SetError;
pub use types::{DynError, Instance, TypeInfo, TypeKind};
