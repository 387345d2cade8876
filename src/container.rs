//! The namespace container.
//!
//! [`Container`] holds factories, memoized singleton instances and mock
//! factories for the namespaces of one [`Contract`], plus the mock mode flag.
//! All state sits behind a single reentrant lock, held for the whole of each
//! operation (factory invocation included), so factories can resolve their own
//! dependencies on the same thread while other threads wait.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::ReentrantMutex;

use crate::error::{DiError, DiResult};
use crate::internal::{with_circular_catch, StackGuard};
use crate::key::{Contract, Key, Namespace};
use crate::observer::{DiObserver, Observers};
use crate::options::{clamp_depth, ContainerOptions};
use crate::registration::{downcast, erase, AnyArc, Factory, MockFactory, Registry};
use crate::traits::{Resolver, ResolverCore};

static NEXT_CONTAINER_ID: AtomicUsize = AtomicUsize::new(1);

/// Inversion of control container for the namespaces of contract `C`.
///
/// Resolution (`get`) follows a fixed precedence chain:
///
/// 1. mock mode on and a mock registered: the mock, called with the original value
/// 2. a cached singleton instance
/// 3. the registered factory, invoked on every call
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{contract, Container, Resolver};
/// use std::sync::Arc;
///
/// pub trait Logger: Send + Sync {
///     fn log(&self, message: &str) -> String;
/// }
///
/// struct Console;
/// impl Logger for Console {
///     fn log(&self, message: &str) -> String {
///         format!("[console] {}", message)
///     }
/// }
///
/// struct Silent;
/// impl Logger for Silent {
///     fn log(&self, _message: &str) -> String {
///         String::new()
///     }
/// }
///
/// contract! {
///     pub Dependencies {
///         LoggerService => "Service/Logger": dyn Logger,
///     }
/// }
///
/// let container = Container::<Dependencies>::new();
/// container
///     .register(LoggerService, |_| Arc::new(Console) as Arc<dyn Logger>)
///     .mock(LoggerService, |_, _original| Arc::new(Silent) as Arc<dyn Logger>);
///
/// assert_eq!(container.get_required(LoggerService).log("hi"), "[console] hi");
///
/// container.enable_mocks();
/// assert_eq!(container.get_required(LoggerService).log("hi"), "");
///
/// container.disable_mocks();
/// assert_eq!(container.get_required(LoggerService).log("hi"), "[console] hi");
/// ```
pub struct Container<C: 'static> {
    id: usize,
    state: ReentrantMutex<RefCell<Registry<C>>>,
    observers: Observers,
    max_depth: usize,
    _contract: PhantomData<fn() -> C>,
}

impl<C: Contract> Container<C> {
    /// Creates an empty container with default options.
    pub fn new() -> Self {
        Self::with_options(ContainerOptions::default())
    }

    /// Creates an empty container from `options`.
    pub fn with_options(options: ContainerOptions) -> Self {
        Self::from_parts(options, Observers::default())
    }

    /// Starts a [`ContainerBuilder`] for options and observers.
    pub fn builder() -> ContainerBuilder<C> {
        ContainerBuilder::new()
    }

    fn from_parts(options: ContainerOptions, observers: Observers) -> Self {
        let id = NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            container = id,
            mocks_enabled = options.mocks_enabled,
            max_depth = options.max_depth,
            "container created"
        );
        Self {
            id,
            state: ReentrantMutex::new(RefCell::new(Registry::new(options.mocks_enabled))),
            observers,
            max_depth: clamp_depth(options.max_depth),
            _contract: PhantomData,
        }
    }

    /// Registers a factory for `namespace`, replacing any previous factory.
    ///
    /// The factory is not invoked here. Every `get` invokes it again; its
    /// result is never cached. A singleton already cached for the namespace
    /// keeps taking precedence.
    ///
    /// The factory may return the value itself or an `Arc` of it; returning a
    /// clone of a captured `Arc` hands out the same instance every time.
    ///
    /// ```
    /// use ferrous_ioc::{contract, Container, Resolver};
    /// use std::sync::Arc;
    ///
    /// contract! {
    ///     pub App {
    ///         Greeting => "Core/Greeting": String,
    ///     }
    /// }
    ///
    /// let container = Container::<App>::new();
    /// container.register(Greeting, |_| "hello".to_string());
    ///
    /// let a = container.get_required(Greeting);
    /// let b = container.get_required(Greeting);
    /// assert_eq!(*a, "hello");
    /// assert!(!Arc::ptr_eq(&a, &b));
    /// ```
    pub fn register<N, F, R>(&self, namespace: N, factory: F) -> &Self
    where
        N: Namespace<Contract = C>,
        F: Fn(&Self) -> R + Send + Sync + 'static,
        R: Into<Arc<N::Value>>,
    {
        let _ = namespace;
        let factory: Factory<C> = Arc::new(move |container: &Container<C>| -> DiResult<AnyArc> {
            Ok(erase::<N::Value>(factory(container).into()))
        });
        self.insert_factory(Key::of::<N>(), factory)
    }

    /// Registers a fallible factory for `namespace`.
    ///
    /// Like [`register`](Self::register); an error returned by the factory is
    /// passed through `get` unchanged, so dependencies can be resolved with `?`.
    pub fn try_register<N, F, R>(&self, namespace: N, factory: F) -> &Self
    where
        N: Namespace<Contract = C>,
        F: Fn(&Self) -> DiResult<R> + Send + Sync + 'static,
        R: Into<Arc<N::Value>>,
    {
        let _ = namespace;
        let factory: Factory<C> = Arc::new(move |container: &Container<C>| -> DiResult<AnyArc> {
            factory(container).map(|value| erase::<N::Value>(value.into()))
        });
        self.insert_factory(Key::of::<N>(), factory)
    }

    fn insert_factory(&self, key: Key, factory: Factory<C>) -> &Self {
        let state = self.state.lock();
        let replaced = state.borrow_mut().factories.insert(key, factory).is_some();
        tracing::debug!(container = self.id, namespace = key.name(), replaced, "registered factory");
        self
    }

    /// Registers a singleton for `namespace`.
    ///
    /// When no instance is cached yet, `factory` runs immediately with this
    /// container and its result becomes the cached instance. When one is
    /// cached, the call does nothing: `factory` is neither stored nor invoked.
    ///
    /// ```
    /// use ferrous_ioc::{contract, Container, Resolver};
    /// use std::sync::Arc;
    ///
    /// pub struct Database;
    ///
    /// contract! {
    ///     pub App {
    ///         DatabaseService => "Service/Database": Database,
    ///     }
    /// }
    ///
    /// let container = Container::<App>::new();
    /// container
    ///     .register_singleton(DatabaseService, |_| Database)
    ///     .register_singleton(DatabaseService, |_| -> Database { unreachable!() });
    ///
    /// let a = container.get_required(DatabaseService);
    /// let b = container.get_required(DatabaseService);
    /// assert!(Arc::ptr_eq(&a, &b));
    /// ```
    pub fn register_singleton<N, F, R>(&self, namespace: N, factory: F) -> &Self
    where
        N: Namespace<Contract = C>,
        F: FnOnce(&Self) -> R,
        R: Into<Arc<N::Value>>,
    {
        let _ = namespace;
        let key = Key::of::<N>();
        let state = self.state.lock();
        if self.singleton_cached(&state, &key) {
            return self;
        }

        let value = erase::<N::Value>(factory(self).into());
        self.store_instance(&state, key, value);
        self
    }

    /// Registers a singleton from a fallible factory.
    ///
    /// Same memoization rule as [`register_singleton`](Self::register_singleton).
    /// If the factory fails nothing is cached and the error is returned.
    pub fn try_register_singleton<N, F, R>(&self, namespace: N, factory: F) -> DiResult<&Self>
    where
        N: Namespace<Contract = C>,
        F: FnOnce(&Self) -> DiResult<R>,
        R: Into<Arc<N::Value>>,
    {
        let _ = namespace;
        let key = Key::of::<N>();
        let state = self.state.lock();
        if self.singleton_cached(&state, &key) {
            return Ok(self);
        }

        match with_circular_catch(|| factory(self)) {
            Ok(value) => {
                self.store_instance(&state, key, erase::<N::Value>(value.into()));
                Ok(self)
            }
            Err(error) => {
                tracing::debug!(container = self.id, namespace = key.name(), %error, "singleton factory failed");
                Err(error)
            }
        }
    }

    fn singleton_cached(&self, state: &RefCell<Registry<C>>, key: &Key) -> bool {
        let cached = state.borrow().instances.contains_key(key);
        if cached {
            tracing::debug!(container = self.id, namespace = key.name(), "singleton already cached, factory discarded");
        }
        cached
    }

    fn store_instance(&self, state: &RefCell<Registry<C>>, key: Key, value: AnyArc) {
        // A factory that registered the same singleton re-entrantly got there first.
        state.borrow_mut().instances.entry(key).or_insert(value);
        tracing::debug!(container = self.id, namespace = key.name(), "cached singleton instance");
    }

    /// Registers a mock for `namespace`, replacing any previous mock.
    ///
    /// The mock is only consulted while mock mode is on. It receives this
    /// container and the original value (what `get` would return without the
    /// mock), and its result is recomputed on every `get`.
    pub fn mock<N, F, R>(&self, namespace: N, mock: F) -> &Self
    where
        N: Namespace<Contract = C>,
        F: Fn(&Self, Arc<N::Value>) -> R + Send + Sync + 'static,
        R: Into<Arc<N::Value>>,
    {
        let _ = namespace;
        let key = Key::of::<N>();
        let mock: MockFactory<C> = Arc::new(move |container: &Container<C>, original: AnyArc| -> DiResult<AnyArc> {
            let original = downcast::<N>(&original)?;
            Ok(erase::<N::Value>(mock(container, original).into()))
        });

        let state = self.state.lock();
        let replaced = state.borrow_mut().mocks.insert(key, mock).is_some();
        tracing::debug!(container = self.id, namespace = key.name(), replaced, "registered mock");
        self
    }

    /// Turns mock mode on.
    pub fn enable_mocks(&self) -> &Self {
        self.use_mocks(true)
    }

    /// Turns mock mode off. Registered mocks are kept.
    pub fn disable_mocks(&self) -> &Self {
        self.use_mocks(false)
    }

    /// Sets mock mode explicitly.
    pub fn use_mocks(&self, enabled: bool) -> &Self {
        let state = self.state.lock();
        state.borrow_mut().mocks_enabled = enabled;
        tracing::debug!(container = self.id, enabled, "mock mode changed");
        self
    }

    /// Removes every registered mock. Mock mode is left as it is.
    pub fn clear_mocks(&self) -> &Self {
        let state = self.state.lock();
        let cleared = {
            let mut registry = state.borrow_mut();
            let count = registry.mocks.len();
            registry.mocks.clear();
            count
        };
        tracing::debug!(container = self.id, cleared, "cleared mocks");
        self
    }

    pub fn mocks_enabled(&self) -> bool {
        self.state.lock().borrow().mocks_enabled
    }

    /// Returns true if a factory or a singleton instance exists for `namespace`.
    pub fn is_registered<N>(&self, namespace: N) -> bool
    where
        N: Namespace<Contract = C>,
    {
        let _ = namespace;
        self.state.lock().borrow().is_registered(&Key::of::<N>())
    }

    /// Returns true if a singleton instance is cached for `namespace`.
    pub fn has_instance<N>(&self, namespace: N) -> bool
    where
        N: Namespace<Contract = C>,
    {
        let _ = namespace;
        self.state.lock().borrow().instances.contains_key(&Key::of::<N>())
    }

    /// Returns true if a mock is registered for `namespace`, regardless of mode.
    pub fn has_mock<N>(&self, namespace: N) -> bool
    where
        N: Namespace<Contract = C>,
    {
        let _ = namespace;
        self.state.lock().borrow().mocks.contains_key(&Key::of::<N>())
    }

    /// Names of contract namespaces that would fail with `NotFound`, in
    /// declaration order.
    ///
    /// ```
    /// use ferrous_ioc::{contract, Container};
    ///
    /// contract! {
    ///     pub App {
    ///         Port => "Core/Port": u16,
    ///         Host => "Core/Host": String,
    ///     }
    /// }
    ///
    /// let container = Container::<App>::new();
    /// container.register(Port, |_| 8080u16);
    /// assert_eq!(container.missing_namespaces(), vec!["Core/Host"]);
    /// ```
    pub fn missing_namespaces(&self) -> Vec<&'static str> {
        let state = self.state.lock();
        let registry = state.borrow();
        C::NAMESPACES
            .iter()
            .copied()
            .filter(|name| {
                !registry.instances.keys().any(|k| k.name() == *name)
                    && !registry.factories.keys().any(|k| k.name() == *name)
            })
            .collect()
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let state = self.state.lock();
        let registry = state.borrow();

        let sorted = |keys: Vec<&Key>| {
            let mut names: Vec<String> = keys
                .into_iter()
                .map(|k| format!("  {}: {}\n", k.name(), k.type_name()))
                .collect();
            names.sort();
            names.concat()
        };

        let mut s = String::new();
        s.push_str("=== Container Debug ===\n");
        s.push_str(&format!("Mock mode: {}\n", registry.mocks_enabled));
        s.push_str("Factories:\n");
        s.push_str(&sorted(registry.factories.keys().collect()));
        s.push_str("Singletons:\n");
        s.push_str(&sorted(registry.instances.keys().collect()));
        s.push_str("Mocks:\n");
        s.push_str(&sorted(registry.mocks.keys().collect()));
        s
    }

    fn resolve(&self, key: &Key) -> DiResult<AnyArc> {
        let state = self.state.lock();
        let _frame = StackGuard::enter(self.id, key.name(), self.max_depth)?;
        tracing::trace!(container = self.id, namespace = key.name(), "resolving");

        let mock = state.borrow().active_mock(key);
        match mock {
            Some(mock) => {
                let original = self.original_value(&state, key)?;
                tracing::debug!(container = self.id, namespace = key.name(), "applying mock");
                self.observers.mock_applied(key);
                with_circular_catch(|| mock(self, original))
            }
            None => self.original_value(&state, key),
        }
    }

    /// Non-mock path: cached instance, else a fresh factory call.
    fn original_value(&self, state: &RefCell<Registry<C>>, key: &Key) -> DiResult<AnyArc> {
        let factory = {
            let registry = state.borrow();
            if let Some(instance) = registry.instances.get(key) {
                return Ok(instance.clone());
            }
            registry.factories.get(key).cloned()
        };

        match factory {
            Some(factory) => with_circular_catch(|| factory(self)),
            None => Err(DiError::NotFound(key.name())),
        }
    }
}

impl<C: Contract> ResolverCore for Container<C> {
    fn resolve_any(&self, key: &Key) -> DiResult<Arc<dyn Any + Send + Sync>> {
        if !self.observers.has_observers() {
            return self.resolve(key);
        }

        let start = Instant::now();
        self.observers.resolving(key);
        let result = self.resolve(key);
        match &result {
            Ok(_) => self.observers.resolved(key, start.elapsed()),
            Err(error) => self.observers.resolution_failed(key, error),
        }
        result
    }
}

impl<C: Contract> Resolver<C> for Container<C> {}

impl<C: Contract> Default for Container<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Contract> fmt::Debug for Container<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        let registry = state.borrow();
        f.debug_struct("Container")
            .field("id", &self.id)
            .field("factories", &registry.factories.len())
            .field("instances", &registry.instances.len())
            .field("mocks", &registry.mocks.len())
            .field("mocks_enabled", &registry.mocks_enabled)
            .finish()
    }
}

/// Builder for a [`Container`] with options and observers.
///
/// ```
/// use ferrous_ioc::{contract, Container, ContainerOptions, TracingObserver};
/// use std::sync::Arc;
///
/// contract! {
///     pub App {
///         Port => "Core/Port": u16,
///     }
/// }
///
/// let container = Container::<App>::builder()
///     .options(ContainerOptions::new().with_mocks_enabled(true))
///     .add_observer(Arc::new(TracingObserver::new()))
///     .build();
/// assert!(container.mocks_enabled());
/// ```
pub struct ContainerBuilder<C> {
    options: ContainerOptions,
    observers: Observers,
    _contract: PhantomData<fn() -> C>,
}

impl<C: Contract> ContainerBuilder<C> {
    pub fn new() -> Self {
        Self {
            options: ContainerOptions::default(),
            observers: Observers::default(),
            _contract: PhantomData,
        }
    }

    pub fn options(mut self, options: ContainerOptions) -> Self {
        self.options = options;
        self
    }

    /// Adds an observer notified on every resolution.
    pub fn add_observer(mut self, observer: Arc<dyn DiObserver>) -> Self {
        self.observers.add(observer);
        self
    }

    pub fn build(self) -> Container<C> {
        Container::from_parts(self.options, self.observers)
    }
}

impl<C: Contract> Default for ContainerBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract;

    contract! {
        Test {
            Number => "Test/Number": u32,
        }
    }

    #[test]
    fn lock_is_reentrant_from_factories() {
        let container = Container::<Test>::new();
        container.register(Number, |c| {
            // Registration from inside a resolution must not deadlock.
            c.use_mocks(false);
            7u32
        });
        assert_eq!(*container.get(Number).unwrap(), 7);
    }

    #[test]
    fn containers_get_distinct_ids() {
        let a = Container::<Test>::new();
        let b = Container::<Test>::new();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn debug_output_reports_counts() {
        let container = Container::<Test>::new();
        container.register(Number, |_| 1u32);
        let debug = format!("{:?}", container);
        assert!(debug.contains("factories: 1"));
        assert!(debug.contains("mocks_enabled: false"));
    }
}
