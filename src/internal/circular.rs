//! Circular dependency detection infrastructure.

use std::cell::RefCell;
use std::panic;

use crate::error::{DiError, DiResult};

// Thread-local resolution stack, shared by every container on the thread
thread_local! {
    static RESOLUTION_STACK: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

#[derive(Clone, Copy, PartialEq, Eq)]
struct Frame {
    container: usize,
    name: &'static str,
}

/// Panic payload for circular dependency detection.
///
/// Raised by [`Resolver::get_required`](crate::Resolver::get_required) when the
/// failure is a cycle, so that an infallible factory unwinds with the full path.
/// The enclosing [`get`](crate::Resolver::get) turns it back into
/// [`DiError::Circular`].
///
/// Example path: `["Service/A", "Service/B", "Service/A"]`
#[derive(Debug)]
pub struct CircularPanic {
    /// The complete circular dependency path showing the cycle.
    pub path: Box<[&'static str]>,
}

impl CircularPanic {
    pub(crate) fn new(path: Vec<&'static str>) -> Self {
        CircularPanic { path: path.into_boxed_slice() }
    }
}

/// Guard for one entry on the thread-local resolution stack
pub(crate) struct StackGuard {
    frame: Frame,
}

impl StackGuard {
    /// Pushes a frame, failing if the namespace is already being resolved by
    /// the same container on this thread or the stack is too deep.
    pub(crate) fn enter(container: usize, name: &'static str, max_depth: usize) -> DiResult<Self> {
        let frame = Frame { container, name };
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();

            if stack.contains(&frame) {
                let mut path: Vec<&'static str> = stack
                    .iter()
                    .filter(|f| f.container == container)
                    .map(|f| f.name)
                    .skip_while(|&n| n != name)
                    .collect();
                path.push(name);
                return Err(DiError::Circular(path));
            }

            // Only this container's frames count; other containers nest freely.
            let depth = stack.iter().filter(|f| f.container == container).count();
            if depth >= max_depth {
                return Err(DiError::DepthExceeded(depth));
            }

            stack.push(frame);
            Ok(StackGuard { frame })
        })
    }
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        // try_with: the thread-local may already be gone during thread teardown
        let _ = RESOLUTION_STACK.try_with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(last) = stack.pop() {
                debug_assert!(last == self.frame);
            }
        });
    }
}

/// Runs a factory, converting a [`CircularPanic`] unwinding out of it into
/// [`DiError::Circular`]. Any other panic is resumed.
pub(crate) fn with_circular_catch<T, F>(f: F) -> DiResult<T>
where
    F: FnOnce() -> DiResult<T>,
{
    match panic::catch_unwind(panic::AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => match payload.downcast::<CircularPanic>() {
            Ok(circular) => Err(DiError::Circular(circular.path.into_vec())),
            Err(other) => panic::resume_unwind(other),
        },
    }
}

/// Re-raises a circular error as a [`CircularPanic`]; other errors panic with
/// their message.
pub(crate) fn raise(namespace: &'static str, error: DiError) -> ! {
    match error {
        DiError::Circular(path) => panic::panic_any(CircularPanic::new(path)),
        other => panic!("Failed to resolve {}: {}", namespace, other),
    }
}
