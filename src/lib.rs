//! # ferrous-ioc
//!
//! Namespace-keyed inversion of control container with typed contracts,
//! memoized singletons and a mock layer for tests.
//!
//! ## Features
//!
//! - **Typed contracts**: each namespace declares its value type; registering
//!   or resolving with the wrong type does not compile
//! - **Three resolution modes**: transient factory, memoized singleton, mock override
//! - **Recursive factories**: factories receive the container and resolve their
//!   own dependencies
//! - **Thread-safe**: one reentrant lock guards all state; singletons are never
//!   constructed twice
//! - **Circular dependency detection**: cycles fail with the full path instead
//!   of overflowing the stack
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_ioc::{contract, Container, Resolver};
//! use std::sync::Arc;
//!
//! pub struct Config {
//!     url: String,
//! }
//!
//! pub struct Database {
//!     url: String,
//! }
//!
//! contract! {
//!     pub Dependencies {
//!         ConfigService => "Core/Config": Config,
//!         DatabaseService => "Service/Database": Database,
//!     }
//! }
//!
//! let ioc = Container::<Dependencies>::new();
//!
//! ioc.register(ConfigService, |_| Config {
//!     url: "postgres://localhost".to_string(),
//! });
//!
//! ioc.register_singleton(DatabaseService, |dependencies| {
//!     let config = dependencies.get_required(ConfigService);
//!     Database { url: config.url.clone() }
//! });
//!
//! let db = ioc.get_required(DatabaseService);
//! assert_eq!(db.url, "postgres://localhost");
//! assert!(Arc::ptr_eq(&db, &ioc.get_required(DatabaseService)));
//! ```
//!
//! ## Mocks
//!
//! ```rust
//! use ferrous_ioc::{contract, Container, Resolver};
//!
//! contract! {
//!     pub Dependencies {
//!         Greeting => "Core/Greeting": String,
//!     }
//! }
//!
//! let ioc = Container::<Dependencies>::new();
//! ioc.register(Greeting, |_| "hello".to_string())
//!     .mock(Greeting, |_, original| format!("{} (mocked)", original))
//!     .enable_mocks();
//!
//! assert_eq!(*ioc.get_required(Greeting), "hello (mocked)");
//!
//! ioc.clear_mocks();
//! assert_eq!(*ioc.get_required(Greeting), "hello");
//! ```

// Module declarations
pub mod container;
pub mod error;
pub mod key;
pub mod observer;
pub mod options;
pub mod traits;

// Internal modules
mod internal;
mod registration;

// Re-export core types
pub use container::{Container, ContainerBuilder};
pub use error::{DiError, DiResult};
pub use internal::CircularPanic;
pub use key::{Contract, Key, Namespace};
pub use observer::{DiObserver, TracingObserver};
pub use options::ContainerOptions;
pub use traits::{Resolver, ResolverCore};
