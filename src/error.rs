//! Error types for the inversion of control container.

use thiserror::Error;

/// Container errors
///
/// Represents the conditions under which a namespace cannot be resolved.
/// Registration never fails; only resolution (and fallible factories) do.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{contract, Container, DiError, Resolver};
///
/// contract! {
///     pub Services {
///         NonExistent => "Service/NonExistent": String,
///     }
/// }
///
/// let container = Container::<Services>::new();
/// match container.get(NonExistent) {
///     Err(DiError::NotFound(name)) => assert_eq!(name, "Service/NonExistent"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiError {
    /// Neither a cached singleton nor a factory is registered for the namespace
    #[error("No binding found for key: {0}")]
    NotFound(&'static str),
    /// Stored value does not have the type declared by the namespace
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
    /// Cyclic factory graph (path ends with the repeated namespace)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<&'static str>),
    /// Resolution nested deeper than the configured maximum
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
}

/// Result type for container operations
///
/// A convenience alias for `Result<T, DiError>`, used by fallible factories
/// and by every resolution method.
///
/// ```rust
/// use ferrous_ioc::{DiError, DiResult};
///
/// fn lookup() -> DiResult<u32> {
///     Err(DiError::NotFound("Core/Port"))
/// }
///
/// assert!(lookup().is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;
