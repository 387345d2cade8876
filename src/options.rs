//! Container configuration.
//!
//! Options are read once when the container is built. They can be set in code,
//! taken from environment variables, or (with the `config` feature) loaded from
//! JSON.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Deserializer, Serialize};

/// Default environment variable prefix used by [`ContainerOptions::from_env`]
pub const DEFAULT_ENV_PREFIX: &str = "IOC";

/// Default resolution nesting limit
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Options controlling a [`Container`](crate::Container).
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::ContainerOptions;
///
/// let options = ContainerOptions::new()
///     .with_mocks_enabled(true)
///     .with_max_depth(64);
///
/// assert!(options.mocks_enabled);
/// assert_eq!(options.max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerOptions {
    /// Initial value of the mock mode flag
    pub mocks_enabled: bool,
    /// Maximum nesting of resolutions within one container before failing
    /// with `DepthExceeded`. Values below 1 are raised to 1.
    #[cfg_attr(feature = "config", serde(deserialize_with = "deserialize_depth"))]
    pub max_depth: usize,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            mocks_enabled: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ContainerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mocks_enabled(mut self, enabled: bool) -> Self {
        self.mocks_enabled = enabled;
        self
    }

    /// Sets the nesting limit. `0` is raised to `1`, so a plain binding
    /// always resolves.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = clamp_depth(max_depth);
        self
    }

    /// Reads `IOC_ENABLE_MOCKS` and `IOC_MAX_DEPTH`, keeping defaults for unset
    /// or invalid variables.
    pub fn from_env() -> Self {
        Self::from_env_with_prefix(DEFAULT_ENV_PREFIX)
    }

    /// Like [`from_env`](Self::from_env) with a custom variable prefix.
    ///
    /// ```rust
    /// use ferrous_ioc::ContainerOptions;
    ///
    /// let options = ContainerOptions::from_env_with_prefix("MYAPP_UNSET_PREFIX");
    /// assert_eq!(options, ContainerOptions::default());
    /// ```
    pub fn from_env_with_prefix(prefix: &str) -> Self {
        let prefix = prefix.to_uppercase();
        let mut options = Self::default();

        let var = format!("{}_ENABLE_MOCKS", prefix);
        if let Ok(raw) = env::var(&var) {
            match parse_flag(&raw) {
                Some(enabled) => options.mocks_enabled = enabled,
                None => tracing::warn!(variable = %var, value = %raw, "ignoring invalid boolean"),
            }
        }

        let var = format!("{}_MAX_DEPTH", prefix);
        if let Ok(raw) = env::var(&var) {
            match raw.trim().parse::<usize>() {
                Ok(depth) => options.max_depth = clamp_depth(depth),
                Err(_) => tracing::warn!(variable = %var, value = %raw, "ignoring invalid depth"),
            }
        }

        options
    }

    /// Parses options from JSON. Missing fields keep their defaults.
    ///
    /// ```rust
    /// # #[cfg(feature = "config")]
    /// # {
    /// use ferrous_ioc::ContainerOptions;
    ///
    /// let options = ContainerOptions::from_json(r#"{ "mocks_enabled": true }"#).unwrap();
    /// assert!(options.mocks_enabled);
    /// assert_eq!(options.max_depth, 1024);
    /// # }
    /// ```
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Lowest usable nesting limit: one frame for the namespace being resolved.
pub(crate) fn clamp_depth(depth: usize) -> usize {
    if depth == 0 {
        tracing::warn!(depth, "max_depth raised to 1");
    }
    depth.max(1)
}

#[cfg(feature = "config")]
fn deserialize_depth<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    usize::deserialize(deserializer).map(clamp_depth)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
