//! Parameter specifications and per-parameter validation.
//!
//! A [`ParamSpec`] describes one parameter: its declared type, optional
//! default, optional allowed set or integer range, its config-file key (also
//! the environment-variable suffix) and its command-line form. Specs are
//! built once through [`ParamBuilder`], checked for internal consistency at
//! that point, and immutable afterwards.
//!
//! Validation is uniform: every candidate value, whether it came from a
//! config file, an environment variable, a command-line token or a direct
//! `set` call, goes through [`ParamSpec::validate`].

use heck::ToShoutySnakeCase;

use crate::error::ConfError;
use crate::value::{ParamType, Value};

/// The immutable description of a single parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    name: String,
    ty: ParamType,
    default: Option<Value>,
    allowed_values: Option<Vec<Value>>,
    allowed_range: Option<(i64, i64)>,
    conffile: Option<String>,
    short: Option<char>,
    long: Option<String>,
}

impl ParamSpec {
    /// The unique parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type.
    pub fn param_type(&self) -> ParamType {
        self.ty
    }

    /// The default value, if one was defined.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The allowed set of values, if one was defined.
    pub fn allowed_values(&self) -> Option<&[Value]> {
        self.allowed_values.as_deref()
    }

    /// The inclusive allowed range, if one was defined.
    pub fn allowed_range(&self) -> Option<(i64, i64)> {
        self.allowed_range
    }

    /// The key used in the config file and as environment-variable suffix.
    ///
    /// `None` means the parameter has no config-file or environment form.
    pub fn conffile(&self) -> Option<&str> {
        self.conffile.as_deref()
    }

    /// The short command-line option letter, if any.
    pub fn short(&self) -> Option<char> {
        self.short
    }

    /// The long command-line option name, if any.
    pub fn long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    /// Whether the parameter has any command-line form at all.
    pub fn has_cli(&self) -> bool {
        self.short.is_some() || self.long.is_some()
    }

    /// Whether the command-line option consumes a value token.
    ///
    /// Booleans are pure flags: presence means `true`.
    pub fn takes_value(&self) -> bool {
        self.ty != ParamType::Bool
    }

    /// Coerce a candidate to the declared type and check it against the
    /// allowed set and range.
    ///
    /// String candidates are parsed according to the declared type; typed
    /// candidates of the declared type pass through untouched, so a native
    /// boolean given to `set` skips the token table. A typed candidate of
    /// the wrong type is rejected.
    pub fn validate(&self, candidate: impl Into<Value>) -> Result<Value, ConfError> {
        let value = self.coerce(candidate.into())?;

        if let Some(allowed) = &self.allowed_values {
            if !allowed.contains(&value) {
                return Err(ConfError::NotAllowed {
                    name: self.name.clone(),
                    value: value.to_string(),
                });
            }
        }

        if let Some((min, max)) = self.allowed_range {
            if let Value::Int(n) = value {
                if n < min || n > max {
                    return Err(ConfError::OutOfRange {
                        name: self.name.clone(),
                        value: n,
                        min,
                        max,
                    });
                }
            }
        }

        Ok(value)
    }

    fn coerce(&self, candidate: Value) -> Result<Value, ConfError> {
        let bad_type = |raw: String| ConfError::BadType {
            name: self.name.clone(),
            value: raw,
            expected: self.ty,
        };

        match (self.ty, candidate) {
            (ParamType::Str, Value::Str(s)) => Ok(Value::Str(s)),
            (ParamType::Int, Value::Int(n)) => Ok(Value::Int(n)),
            (ParamType::Bool, Value::Bool(b)) => Ok(Value::Bool(b)),
            (ParamType::Int, Value::Str(s)) => match s.trim().parse::<i64>() {
                Ok(n) => Ok(Value::Int(n)),
                Err(_) => Err(bad_type(s)),
            },
            (ParamType::Bool, Value::Str(s)) => match s.to_lowercase().as_str() {
                "y" | "yes" | "1" | "true" => Ok(Value::Bool(true)),
                "n" | "no" | "0" | "false" => Ok(Value::Bool(false)),
                _ => Err(bad_type(s)),
            },
            (_, other) => Err(bad_type(other.to_string())),
        }
    }
}

/// An optional setting that is derived from the parameter name unless the
/// definition pins it down or switches it off.
#[derive(Debug, Clone, Default)]
enum Auto<T> {
    #[default]
    Derive,
    Off,
    Explicit(T),
}

/// Builder for a single [`ParamSpec`], used through the closure passed to
/// [`ConfBuilder::param`](crate::ConfBuilder::param).
///
/// Unless told otherwise, the finished spec derives a config-file key
/// (SHOUTY_SNAKE_CASE of the name), a short option (first character of the
/// name) and a long option (the full name, when longer than one character).
#[derive(Debug, Clone, Default)]
pub struct ParamBuilder {
    ty: Option<ParamType>,
    default: Option<Value>,
    allowed_values: Option<Vec<Value>>,
    allowed_range: Option<(i64, i64)>,
    conffile: Auto<String>,
    cli: Auto<(Option<char>, Option<String>)>,
}

impl ParamBuilder {
    /// Declare the parameter as a string. This is the default type.
    pub fn string(mut self) -> Self {
        self.ty = Some(ParamType::Str);
        self
    }

    /// Declare the parameter as an integer.
    pub fn int(mut self) -> Self {
        self.ty = Some(ParamType::Int);
        self
    }

    /// Declare the parameter as a boolean flag.
    pub fn boolean(mut self) -> Self {
        self.ty = Some(ParamType::Bool);
        self
    }

    /// Set the default value. It is validated against the finished spec's
    /// own constraints at build time, so a bad default fails early.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Restrict the parameter to an explicit set of values.
    pub fn allowed<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.allowed_values = Some(values.into_iter().map(|v| v.into()).collect());
        self
    }

    /// Restrict an integer parameter to an inclusive range.
    pub fn range(mut self, min: i64, max: i64) -> Self {
        self.allowed_range = Some((min, max));
        self
    }

    /// Set the config-file key explicitly. The same key, prefixed, names
    /// the environment variable.
    pub fn conffile(mut self, key: impl Into<String>) -> Self {
        self.conffile = Auto::Explicit(key.into());
        self
    }

    /// Give the parameter no config-file or environment form.
    pub fn no_conffile(mut self) -> Self {
        self.conffile = Auto::Off;
        self
    }

    /// Set both command-line forms explicitly.
    pub fn cli(mut self, short: char, long: impl Into<String>) -> Self {
        self.cli = Auto::Explicit((Some(short), Some(long.into())));
        self
    }

    /// Set only a short command-line option.
    pub fn cli_short(mut self, short: char) -> Self {
        self.cli = Auto::Explicit((Some(short), None));
        self
    }

    /// Set only a long command-line option.
    pub fn cli_long(mut self, long: impl Into<String>) -> Self {
        self.cli = Auto::Explicit((None, Some(long.into())));
        self
    }

    /// Give the parameter no command-line form.
    pub fn no_cli(mut self) -> Self {
        self.cli = Auto::Off;
        self
    }

    pub(crate) fn finish(self, name: &str) -> Result<ParamSpec, ConfError> {
        let definition_error = |reason: &str| ConfError::Definition {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let ty = self.ty.unwrap_or(ParamType::Str);

        if self.allowed_values.is_some() && self.allowed_range.is_some() {
            return Err(definition_error(
                "allowed values and allowed range are mutually exclusive",
            ));
        }
        if ty == ParamType::Bool && (self.allowed_values.is_some() || self.allowed_range.is_some())
        {
            return Err(definition_error(
                "allowed values or range not allowed for a boolean",
            ));
        }
        if ty != ParamType::Int && self.allowed_range.is_some() {
            return Err(definition_error("allowed range requires an integer type"));
        }
        if let Some((min, max)) = self.allowed_range {
            if min > max {
                return Err(definition_error("allowed range has min greater than max"));
            }
        }

        let conffile = match self.conffile {
            Auto::Derive => Some(name.to_shouty_snake_case()),
            Auto::Off => None,
            Auto::Explicit(key) => Some(key),
        };

        let (short, long) = match self.cli {
            Auto::Derive => {
                // Single-letter names only get a short option.
                let short = name.chars().next();
                let long = (name.chars().count() > 1).then(|| name.to_string());
                (short, long)
            }
            Auto::Off => (None, None),
            Auto::Explicit((short, long)) => (short, long),
        };

        let mut spec = ParamSpec {
            name: name.to_string(),
            ty,
            default: None,
            allowed_values: None,
            allowed_range: self.allowed_range,
            conffile,
            short,
            long,
        };

        // Each member of the allowed set must itself coerce to the declared
        // type, so a definition like allowed(["1", "2"]) on an integer
        // parameter is normalized here rather than compared as strings.
        if let Some(values) = self.allowed_values {
            let mut coerced = Vec::with_capacity(values.len());
            for value in values {
                coerced.push(spec.validate(value)?);
            }
            spec.allowed_values = Some(coerced);
        }

        if let Some(default) = self.default {
            spec.default = Some(spec.validate(default)?);
        }

        Ok(spec)
    }
}
