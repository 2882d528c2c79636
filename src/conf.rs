//! The configuration object: builder, resolution and the parameter store.
//!
//! [`builder`] collects the resolution-wide settings and the parameter
//! definitions, and [`ConfBuilder::build`] checks every definition before
//! handing out a [`Conf`]. A `Conf` starts out holding only defaults;
//! [`Conf::acquire`] overlays the config file, the environment and the
//! command line, in that order, and every later call to [`Conf::set`] goes
//! through the same validation the sources did.

use core::fmt;

use indexmap::IndexMap;

use crate::error::ConfError;
use crate::layers::cli::{self, CliValue};
use crate::layers::env::{self, EnvConfig, EnvConfigBuilder, EnvSource, StdEnv};
use crate::layers::file::{self, FileConfig, FileConfigBuilder};
use crate::param::{ParamBuilder, ParamSpec};
use crate::value::Value;

/// Where a parameter's current value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// The definition-time default (or nothing, while still unset).
    Default,
    /// The config file.
    File,
    /// An environment variable.
    Env,
    /// A command-line option.
    Cli,
    /// An explicit [`Conf::set`] call.
    Set,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::Default => "default",
            Source::File => "config file",
            Source::Env => "environment",
            Source::Cli => "command line",
            Source::Set => "set",
        };
        write!(f, "{name}")
    }
}

/// One defined parameter and its current state.
pub(crate) struct Param {
    pub(crate) spec: ParamSpec,
    pub(crate) value: Option<Value>,
    pub(crate) source: Source,
}

/// Start defining a configuration.
///
/// ```
/// use confit::builder;
///
/// let conf = builder()
///     .file(|f| f.name("myproject-params.conf").locations(["", "/etc/"]))
///     .env(|e| e.prefix("MYPROJECT_"))
///     .param("baz", |p| p.int().default(123).range(1, 200).conffile("BAZ"))
///     .param("verbose", |p| p.boolean().default(false).no_conffile())
///     .build()
///     .unwrap();
/// assert_eq!(conf.keys().collect::<Vec<_>>(), ["baz", "verbose"]);
/// ```
pub fn builder() -> ConfBuilder {
    ConfBuilder {
        file: FileConfig::default(),
        env: EnvConfig::default(),
        allow_unset: false,
        env_source: Box::new(StdEnv),
        params: Vec::new(),
    }
}

/// Builder for a [`Conf`].
pub struct ConfBuilder {
    file: FileConfig,
    env: EnvConfig,
    allow_unset: bool,
    env_source: Box<dyn EnvSource>,
    params: Vec<(String, ParamBuilder)>,
}

impl ConfBuilder {
    /// Configure the config-file layer (file name and search locations).
    pub fn file<F>(mut self, f: F) -> Self
    where
        F: FnOnce(FileConfigBuilder) -> FileConfigBuilder,
    {
        self.file = f(FileConfigBuilder::new()).build();
        self
    }

    /// Configure the environment layer (variable prefix).
    pub fn env<F>(mut self, f: F) -> Self
    where
        F: FnOnce(EnvConfigBuilder) -> EnvConfigBuilder,
    {
        self.env = f(EnvConfigBuilder::new()).build();
        self
    }

    /// Allow parameters to remain unset after resolution. Defaults to
    /// false: a parameter that no source provided is then an error.
    pub fn allow_unset(mut self, allow: bool) -> Self {
        self.allow_unset = allow;
        self
    }

    /// Use a custom environment source (for testing).
    pub fn env_source(mut self, source: impl EnvSource + 'static) -> Self {
        self.env_source = Box::new(source);
        self
    }

    /// Define one parameter. Definition order is the order `keys()` and
    /// `items()` report later.
    pub fn param<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(ParamBuilder) -> ParamBuilder,
    {
        self.params.push((name.into(), f(<ParamBuilder as Default>::default())));
        self
    }

    /// Check every definition and produce the configuration object.
    ///
    /// Fails with [`ConfError::Definition`] on an inconsistent spec, a
    /// default that does not pass its own constraints, or duplicate names,
    /// config-file keys or option letters.
    pub fn build(self) -> Result<Conf, ConfError> {
        let mut params: IndexMap<String, Param> = IndexMap::new();
        let mut by_conffile: IndexMap<String, String> = IndexMap::new();
        let mut shorts_seen: IndexMap<char, String> = IndexMap::new();
        let mut longs_seen: IndexMap<String, String> = IndexMap::new();

        for (name, builder) in self.params {
            let duplicate = |reason: String| ConfError::Definition {
                name: name.clone(),
                reason,
            };

            if params.contains_key(&name) {
                return Err(duplicate("duplicate definition".into()));
            }

            let spec = builder.finish(&name)?;

            if let Some(key) = spec.conffile() {
                if by_conffile.contains_key(key) {
                    return Err(duplicate(format!(
                        "config file key '{key}' already in use"
                    )));
                }
                by_conffile.insert(key.to_string(), name.clone());
            }
            if let Some(c) = spec.short() {
                if let Some(other) = shorts_seen.get(&c) {
                    return Err(duplicate(format!(
                        "short option '-{c}' already used by '{other}'"
                    )));
                }
                shorts_seen.insert(c, name.clone());
            }
            if let Some(l) = spec.long() {
                if let Some(other) = longs_seen.get(l) {
                    return Err(duplicate(format!(
                        "long option '--{l}' already used by '{other}'"
                    )));
                }
                longs_seen.insert(l.to_string(), name.clone());
            }

            let value = spec.default().cloned();
            params.insert(
                name,
                Param {
                    spec,
                    value,
                    source: Source::Default,
                },
            );
        }

        Ok(Conf {
            params,
            by_conffile,
            file: self.file,
            env: self.env,
            allow_unset: self.allow_unset,
            env_source: self.env_source,
        })
    }
}

/// Per-call overrides for [`Conf::acquire_with`].
///
/// Anything left unset falls back to the value configured at build time,
/// for this one call only.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    config_file: Option<String>,
    env_prefix: Option<String>,
    allow_unset: Option<bool>,
}

impl Overrides {
    /// Create an empty override set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the config file name for this call.
    pub fn config_file(mut self, name: impl Into<String>) -> Self {
        self.config_file = Some(name.into());
        self
    }

    /// Override the environment variable prefix for this call.
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Override the unset-value policy for this call.
    pub fn allow_unset(mut self, allow: bool) -> Self {
        self.allow_unset = Some(allow);
        self
    }
}

/// A set of defined parameters and their resolved values.
///
/// Not internally synchronized: resolution happens once at process startup,
/// so concurrent `acquire`/`set` calls must be serialized by the caller.
pub struct Conf {
    pub(crate) params: IndexMap<String, Param>,
    by_conffile: IndexMap<String, String>,
    file: FileConfig,
    env: EnvConfig,
    allow_unset: bool,
    env_source: Box<dyn EnvSource>,
}

impl fmt::Debug for Conf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conf").finish_non_exhaustive()
    }
}

impl Conf {
    /// Resolve all parameter values from the config file, the environment
    /// and the given command-line arguments, in ascending precedence order.
    ///
    /// Every call restarts from the defaults; acquiring twice does not
    /// merge onto the previous result. The first invalid value from any
    /// source aborts the whole call.
    pub fn acquire<I, S>(&mut self, args: I) -> Result<(), ConfError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.acquire_with(args, Overrides::default())
    }

    /// Like [`acquire`](Self::acquire), with per-call overrides for the
    /// config file name, the environment prefix and the unset policy.
    pub fn acquire_with<I, S>(&mut self, args: I, overrides: Overrides) -> Result<(), ConfError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.into()).collect();

        // Start over from the defaults.
        for param in self.params.values_mut() {
            param.value = param.spec.default().cloned();
            param.source = Source::Default;
        }

        // Config file.
        let layer = file::read_file(&self.file, overrides.config_file.as_deref())?;
        tracing::debug!(
            path = ?layer.path,
            entries = layer.entries.len(),
            "applying config file layer"
        );
        for (key, raw) in layer.entries {
            // Unrecognized keys in the file are ignored; unrecognized
            // command-line options below are not.
            let Some(name) = self.by_conffile.get(&key).cloned() else {
                tracing::debug!(%key, "ignoring unrecognized config file key");
                continue;
            };
            self.overlay(&name, Value::Str(raw), Source::File)?;
        }

        // Environment.
        let prefix = overrides.env_prefix.as_deref().unwrap_or(&self.env.prefix);
        let entries = env::read_env(
            self.params.values().map(|p| &p.spec),
            prefix,
            self.env_source.as_ref(),
        );
        tracing::debug!(prefix, entries = entries.len(), "applying environment layer");
        for (key, raw) in entries {
            let name = self.by_conffile[&key].clone();
            self.overlay(&name, Value::Str(raw), Source::Env)?;
        }

        // Command line.
        let entries = cli::parse_args(self.params.values().map(|p| &p.spec), &args)?;
        tracing::debug!(entries = entries.len(), "applying command line layer");
        for (name, cli_value) in entries {
            let value = match cli_value {
                CliValue::Flag => Value::Bool(true),
                CliValue::Raw(raw) => Value::Str(raw),
            };
            self.overlay(&name, value, Source::Cli)?;
        }

        // Everything must have received a value from somewhere, unless the
        // policy says unset is fine.
        let allow_unset = overrides.allow_unset.unwrap_or(self.allow_unset);
        if !allow_unset {
            for (name, param) in &self.params {
                if param.value.is_none() {
                    return Err(ConfError::Unset { name: name.clone() });
                }
            }
        }

        Ok(())
    }

    fn overlay(&mut self, name: &str, candidate: Value, source: Source) -> Result<(), ConfError> {
        let param = self
            .params
            .get_mut(name)
            .expect("overlay target is always a defined parameter");
        param.value = Some(param.spec.validate(candidate)?);
        param.source = source;
        Ok(())
    }

    fn param(&self, name: &str) -> Result<&Param, ConfError> {
        self.params.get(name).ok_or_else(|| ConfError::UnknownParameter {
            name: name.to_string(),
        })
    }

    /// The current value of a parameter. `Ok(None)` means the parameter is
    /// defined but unset.
    pub fn get(&self, name: &str) -> Result<Option<&Value>, ConfError> {
        Ok(self.param(name)?.value.as_ref())
    }

    /// The current value of a string parameter.
    pub fn get_str(&self, name: &str) -> Result<Option<&str>, ConfError> {
        self.typed(name, crate::ParamType::Str, |v| v.as_str())
    }

    /// The current value of an integer parameter.
    pub fn get_int(&self, name: &str) -> Result<Option<i64>, ConfError> {
        self.typed(name, crate::ParamType::Int, |v| v.as_int())
    }

    /// The current value of a boolean parameter.
    pub fn get_bool(&self, name: &str) -> Result<Option<bool>, ConfError> {
        self.typed(name, crate::ParamType::Bool, |v| v.as_bool())
    }

    fn typed<'a, T>(
        &'a self,
        name: &str,
        requested: crate::ParamType,
        extract: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<Option<T>, ConfError> {
        let param = self.param(name)?;
        match &param.value {
            None => Ok(None),
            Some(value) => extract(value)
                .map(Some)
                .ok_or_else(|| ConfError::BadType {
                    name: name.to_string(),
                    value: value.to_string(),
                    expected: requested,
                }),
        }
    }

    /// The current value of a parameter, looked up by its config-file key.
    pub fn get_by_conffile_name(&self, key: &str) -> Result<Option<&Value>, ConfError> {
        let name = self
            .by_conffile
            .get(key)
            .ok_or_else(|| ConfError::UnknownParameter {
                name: key.to_string(),
            })?;
        self.get(name)
    }

    /// Where the current value of a parameter came from.
    pub fn source(&self, name: &str) -> Result<Source, ConfError> {
        Ok(self.param(name)?.source)
    }

    /// The spec a parameter was defined with.
    pub fn spec(&self, name: &str) -> Result<&ParamSpec, ConfError> {
        Ok(&self.param(name)?.spec)
    }

    /// Validate and store a new value for a parameter.
    ///
    /// On failure nothing is stored; the previous value remains in place.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ConfError> {
        let param = self
            .params
            .get_mut(name)
            .ok_or_else(|| ConfError::UnknownParameter {
                name: name.to_string(),
            })?;
        param.value = Some(param.spec.validate(value)?);
        param.source = Source::Set;
        Ok(())
    }

    /// All defined parameter names, in definition order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(|k| k.as_str())
    }

    /// All parameters with their current values (or `None` while unset),
    /// in definition order.
    pub fn items(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.params
            .iter()
            .map(|(name, param)| (name.as_str(), param.value.as_ref()))
    }
}
