//! Diagnostic observers for container resolution events.
//!
//! Observers are attached when the container is built and are notified
//! synchronously for every `get`. Keep implementations cheap.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::key::Key;

/// Observer trait for resolution events.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{contract, Container, DiObserver, Key, Resolver};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Counting(AtomicUsize);
///
/// impl DiObserver for Counting {
///     fn resolving(&self, _key: &Key) {}
///
///     fn resolved(&self, _key: &Key, _duration: Duration) {
///         self.0.fetch_add(1, Ordering::SeqCst);
///     }
/// }
///
/// contract! {
///     pub App {
///         Port => "Core/Port": u16,
///     }
/// }
///
/// let counter = Arc::new(Counting::default());
/// let container = Container::<App>::builder()
///     .add_observer(counter.clone())
///     .build();
/// container.register(Port, |_| 8080u16);
///
/// assert_eq!(*container.get_required(Port), 8080);
/// assert_eq!(counter.0.load(Ordering::SeqCst), 1);
/// ```
pub trait DiObserver: Send + Sync {
    /// Called before a namespace is resolved.
    fn resolving(&self, key: &Key);

    /// Called after a namespace resolved successfully.
    ///
    /// `duration` spans the whole resolution, including nested dependencies.
    fn resolved(&self, key: &Key, duration: Duration);

    /// Called when resolution fails.
    fn resolution_failed(&self, key: &Key, error: &DiError) {
        let _ = (key, error);
    }

    /// Called when a mock replaced the original value.
    fn mock_applied(&self, key: &Key) {
        let _ = key;
    }
}

/// Registered observers. No overhead when empty.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &Key) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &Key, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    #[inline]
    pub(crate) fn resolution_failed(&self, key: &Key, error: &DiError) {
        for observer in &self.observers {
            observer.resolution_failed(key, error);
        }
    }

    #[inline]
    pub(crate) fn mock_applied(&self, key: &Key) {
        for observer in &self.observers {
            observer.mock_applied(key);
        }
    }
}

/// Built-in observer that forwards events to `tracing`.
///
/// Events are emitted under the `ferrous_ioc::resolution` target, at `trace`
/// level for successful resolutions and `warn` for failures.
///
/// ```
/// use ferrous_ioc::{contract, Container, TracingObserver};
/// use std::sync::Arc;
///
/// contract! {
///     pub App {
///         Port => "Core/Port": u16,
///     }
/// }
///
/// let container = Container::<App>::builder()
///     .add_observer(Arc::new(TracingObserver::new()))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct TracingObserver {
    label: String,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::with_label("ioc")
    }

    /// Creates an observer whose events carry `label`, useful when several
    /// containers live in one process.
    pub fn with_label(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for TracingObserver {
    fn resolving(&self, key: &Key) {
        tracing::trace!(target: "ferrous_ioc::resolution", container = %self.label, namespace = key.name(), "resolving");
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        tracing::trace!(
            target: "ferrous_ioc::resolution",
            container = %self.label,
            namespace = key.name(),
            elapsed_us = duration.as_micros() as u64,
            "resolved"
        );
    }

    fn resolution_failed(&self, key: &Key, error: &DiError) {
        tracing::warn!(target: "ferrous_ioc::resolution", container = %self.label, namespace = key.name(), %error, "resolution failed");
    }

    fn mock_applied(&self, key: &Key) {
        tracing::debug!(target: "ferrous_ioc::resolution", container = %self.label, namespace = key.name(), "mock applied");
    }
}
