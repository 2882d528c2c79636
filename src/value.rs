//! Typed parameter values.
//!
//! Every parameter declares one of three types. Raw strings arriving from a
//! config file, an environment variable or the command line are coerced to
//! the declared type during validation; values passed programmatically (for
//! example to [`Conf::set`](crate::Conf::set)) may already be typed and then
//! skip the string coercion step.

use core::fmt;

/// The declared type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// A free-form string.
    Str,
    /// A base-10 signed integer.
    Int,
    /// A boolean flag.
    Bool,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamType::Str => "string",
            ParamType::Int => "integer",
            ParamType::Bool => "boolean",
        };
        write!(f, "{name}")
    }
}

/// A resolved parameter value.
///
/// The "unset" state is represented as `Option<Value>::None` in the public
/// API, never as a variant of this enum: an unset parameter has no value at
/// all, rather than a distinguished value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A string value.
    Str(String),
    /// An integer value.
    Int(i64),
    /// A boolean value.
    Bool(bool),
}

impl Value {
    /// The type this value inhabits.
    pub fn type_of(&self) -> ParamType {
        match self {
            Value::Str(_) => ParamType::Str,
            Value::Int(_) => ParamType::Int,
            Value::Bool(_) => ParamType::Bool,
        }
    }

    /// Returns the string contents, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer, if this is an integer value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
