//! Registration storage: factories, singleton instances and mocks.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::container::Container;
use crate::error::{DiError, DiResult};
use crate::key::{Key, Namespace};

// Type-erased storage: always holds an `Arc<N::Value>`, boxed once more so
// unsized values fit behind `dyn Any`.
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type Factory<C> = Arc<dyn Fn(&Container<C>) -> DiResult<AnyArc> + Send + Sync>;
pub(crate) type MockFactory<C> = Arc<dyn Fn(&Container<C>, AnyArc) -> DiResult<AnyArc> + Send + Sync>;

#[cfg(feature = "ahash")]
type Map<V> = HashMap<Key, V, ahash::RandomState>;
#[cfg(not(feature = "ahash"))]
type Map<V> = HashMap<Key, V>;

/// Wraps a typed value for storage.
#[inline]
pub(crate) fn erase<V: ?Sized + Send + Sync + 'static>(value: Arc<V>) -> AnyArc {
    Arc::new(value)
}

/// Recovers the typed value stored for a namespace.
#[inline]
pub(crate) fn downcast<N: Namespace>(value: &AnyArc) -> DiResult<Arc<N::Value>> {
    value
        .downcast_ref::<Arc<N::Value>>()
        .cloned()
        .ok_or(DiError::TypeMismatch(N::NAME))
}

/// All mutable container state. Guarded as a unit by the container lock.
pub(crate) struct Registry<C: 'static> {
    pub(crate) factories: Map<Factory<C>>,
    pub(crate) instances: Map<AnyArc>,
    pub(crate) mocks: Map<MockFactory<C>>,
    pub(crate) mocks_enabled: bool,
}

impl<C: 'static> Registry<C> {
    pub(crate) fn new(mocks_enabled: bool) -> Self {
        Self {
            factories: Map::default(),
            instances: Map::default(),
            mocks: Map::default(),
            mocks_enabled,
        }
    }

    /// Mock to apply for `key`, if mock mode is on and one is registered
    #[inline]
    pub(crate) fn active_mock(&self, key: &Key) -> Option<MockFactory<C>> {
        if self.mocks_enabled {
            self.mocks.get(key).cloned()
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn is_registered(&self, key: &Key) -> bool {
        self.instances.contains_key(key) || self.factories.contains_key(key)
    }
}
