//! Namespace keys and contracts.
//!
//! A [`Contract`] is the compile-time mapping from namespace to value type. Each
//! namespace is a zero-sized type implementing [`Namespace`]; the container is
//! generic over the contract and only accepts namespaces that belong to it.

use std::hash::{Hash, Hasher};

/// Marker for a declared set of namespaces.
///
/// Usually implemented through the [`contract!`](crate::contract) macro.
pub trait Contract: 'static {
    /// Names of every namespace declared by the contract, in declaration order.
    const NAMESPACES: &'static [&'static str];
}

/// A dependency slot within a [`Contract`].
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Contract, Namespace};
///
/// struct App;
/// impl Contract for App {
///     const NAMESPACES: &'static [&'static str] = &["Core/Port"];
/// }
///
/// struct Port;
/// impl Namespace for Port {
///     type Contract = App;
///     type Value = u16;
///     const NAME: &'static str = "Core/Port";
/// }
///
/// assert_eq!(Port::NAME, "Core/Port");
/// ```
pub trait Namespace: 'static {
    /// Contract this namespace is declared in
    type Contract: Contract;
    /// Type of the value produced for this namespace
    type Value: ?Sized + Send + Sync + 'static;
    /// String key, unique within the contract
    const NAME: &'static str;
}

/// Runtime key for storage and lookup.
///
/// Keys compare and hash by namespace name only. The value type name is kept
/// for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct Key {
    name: &'static str,
    type_name: &'static str,
}

impl Key {
    /// Builds the key for a namespace type.
    ///
    /// ```rust
    /// use ferrous_ioc::{contract, Key};
    ///
    /// contract! {
    ///     pub App {
    ///         Port => "Core/Port": u16,
    ///     }
    /// }
    ///
    /// let key = Key::of::<Port>();
    /// assert_eq!(key.name(), "Core/Port");
    /// assert_eq!(key.type_name(), "u16");
    /// ```
    #[inline]
    pub fn of<N: Namespace>() -> Self {
        Key {
            name: N::NAME,
            type_name: std::any::type_name::<N::Value>(),
        }
    }

    /// Namespace name, e.g. `"Service/Logger"`
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name of the value type, for diagnostics
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for Key {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Key {}

impl Hash for Key {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Declares a contract and its namespace types.
///
/// Each entry reads `Type => "name": ValueType`. The value type may be
/// unsized, e.g. a trait object whose trait is `Send + Sync`.
///
/// ```rust
/// use ferrous_ioc::{contract, Contract, Namespace};
///
/// pub trait Logger: Send + Sync {
///     fn log(&self, message: &str);
/// }
///
/// contract! {
///     /// Services of the demo application
///     pub Dependencies {
///         LoggerService => "Service/Logger": dyn Logger,
///         DatabaseUrl => "Core/DatabaseUrl": String,
///     }
/// }
///
/// assert_eq!(Dependencies::NAMESPACES, &["Service/Logger", "Core/DatabaseUrl"]);
/// assert_eq!(<DatabaseUrl as Namespace>::NAME, "Core/DatabaseUrl");
/// ```
#[macro_export]
macro_rules! contract {
    (
        $(#[$meta:meta])*
        $vis:vis $contract:ident {
            $(
                $(#[$ns_meta:meta])*
                $ns:ident => $name:literal : $value:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        $vis struct $contract;

        impl $crate::Contract for $contract {
            const NAMESPACES: &'static [&'static str] = &[$($name),*];
        }

        $(
            $(#[$ns_meta])*
            #[derive(Debug, Clone, Copy, Default)]
            $vis struct $ns;

            impl $crate::Namespace for $ns {
                type Contract = $contract;
                type Value = $value;
                const NAME: &'static str = $name;
            }
        )*
    };
}
