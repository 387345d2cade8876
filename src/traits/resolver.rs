//! Resolver traits for namespace resolution.

use std::any::Any;
use std::sync::Arc;

use crate::error::DiResult;
use crate::internal::raise;
use crate::key::{Contract, Key, Namespace};
use crate::registration::downcast;

/// Core resolver trait for object-safe resolution.
///
/// Resolves a runtime [`Key`] to its type-erased value. The stored value is an
/// `Arc<N::Value>` behind `dyn Any`. Most users should use [`Resolver`], which
/// adds the typed methods on top.
pub trait ResolverCore: Send + Sync {
    /// Resolves a namespace by key, following the mock, singleton, factory
    /// precedence chain.
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<dyn Any>)` - The erased value
    /// * `Err(DiError)` - Not found, circular, depth exceeded, or an error from
    ///   a fallible factory
    fn resolve_any(&self, key: &Key) -> DiResult<Arc<dyn Any + Send + Sync>>;
}

/// Typed resolution for the namespaces of contract `C`.
///
/// The namespace is passed by value (namespace types are zero-sized), so a
/// call reads `container.get(Logger)`. Namespaces from another contract do not
/// compile.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{contract, Container, Resolver};
/// use std::sync::Arc;
///
/// pub struct Config {
///     url: String,
/// }
///
/// pub struct Database {
///     config: Arc<Config>,
/// }
///
/// contract! {
///     pub App {
///         ConfigService => "Core/Config": Config,
///         DatabaseService => "Service/Database": Database,
///     }
/// }
///
/// let container = Container::<App>::new();
/// container
///     .register(ConfigService, |_| Config { url: "postgres://localhost".to_string() })
///     .register_singleton(DatabaseService, |c| Database {
///         config: c.get_required(ConfigService),
///     });
///
/// let db = container.get(DatabaseService).unwrap();
/// assert_eq!(db.config.url, "postgres://localhost");
/// ```
pub trait Resolver<C: Contract>: ResolverCore {
    /// Resolves a namespace to its value.
    ///
    /// Returns `Err(DiError::NotFound)` naming the namespace when neither a
    /// singleton instance nor a factory is registered, whether or not mock
    /// mode is on.
    fn get<N>(&self, namespace: N) -> DiResult<Arc<N::Value>>
    where
        N: Namespace<Contract = C>,
    {
        let _ = namespace;
        let value = self.resolve_any(&Key::of::<N>())?;
        downcast::<N>(&value)
    }

    /// Resolves a namespace, panicking on failure.
    ///
    /// Convenient inside factories. A circular dependency panics with a
    /// [`CircularPanic`](crate::CircularPanic) payload, which the enclosing
    /// [`get`](Self::get) reports as `DiError::Circular`.
    ///
    /// # Panics
    ///
    /// Panics if the namespace cannot be resolved.
    fn get_required<N>(&self, namespace: N) -> Arc<N::Value>
    where
        N: Namespace<Contract = C>,
    {
        self.get(namespace).unwrap_or_else(|e| raise(N::NAME, e))
    }
}
