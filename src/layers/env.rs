//! Environment-variable layer.
//!
//! For every parameter with a config-file key, the variable
//! `<prefix><key>` is looked up, exact case. Absent variables are simply
//! omitted from the layer; value tokens for booleans are case-insensitive
//! but the variable name itself is not folded.

use indexmap::IndexMap;

use crate::param::ParamSpec;

/// Trait for abstracting over environment variable sources.
///
/// This allows testing without modifying the actual process environment.
pub trait EnvSource {
    /// Get the value of an environment variable by name.
    fn get(&self, name: &str) -> Option<String>;
}

/// Environment source that reads from the actual process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnv;

impl EnvSource for StdEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Environment source backed by a map (for testing).
#[derive(Debug, Clone, Default)]
pub struct MockEnv {
    vars: IndexMap<String, String>,
}

impl MockEnv {
    /// Create a new empty mock environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock environment from an iterator of key-value pairs.
    pub fn from_pairs<I, K, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Set an environment variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }
}

impl EnvSource for MockEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Settings for the environment layer.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    /// Prefix prepended to every config-file key to form the variable name.
    pub prefix: String,
}

/// Builder for [`EnvConfig`].
#[derive(Debug, Default)]
pub struct EnvConfigBuilder {
    config: EnvConfig,
}

impl EnvConfigBuilder {
    /// Create a new env config builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the environment variable prefix, e.g. `MYPROJECT_`.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = prefix.into();
        self
    }

    pub(crate) fn build(self) -> EnvConfig {
        self.config
    }
}

/// Read the environment for every spec with a config-file key.
///
/// Returns raw values keyed by config-file key. Variables that are not set
/// are omitted; whether an omission matters is decided later by the
/// unset-value policy, not here.
pub fn read_env<'a>(
    specs: impl IntoIterator<Item = &'a ParamSpec>,
    prefix: &str,
    source: &dyn EnvSource,
) -> IndexMap<String, String> {
    let mut entries = IndexMap::new();
    for spec in specs {
        let Some(key) = spec.conffile() else { continue };
        let var_name = format!("{prefix}{key}");
        if let Some(value) = source.get(&var_name) {
            tracing::trace!(var = %var_name, param = spec.name(), "environment variable found");
            entries.insert(key.to_string(), value);
        }
    }
    entries
}
