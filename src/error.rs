//! Error type for definition, resolution and store operations.

use camino::Utf8PathBuf;

use crate::value::ParamType;

/// Any error raised while defining parameters, resolving their values or
/// accessing the resulting set.
///
/// All resolution errors abort the entire [`acquire`](crate::Conf::acquire)
/// call: a bad value from any source is fatal for that run, never skipped.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum ConfError {
    /// A parameter definition is internally inconsistent (bad default,
    /// range on a non-integer, duplicate option letter, ...). Raised at
    /// build time so broken definitions never reach resolution.
    Definition {
        /// The parameter (or option) being defined.
        name: String,
        /// What was wrong with the definition.
        reason: String,
    },

    /// A raw value could not be coerced to the parameter's declared type.
    BadType {
        /// The parameter the value was destined for.
        name: String,
        /// The offending raw value.
        value: String,
        /// The type the parameter expects.
        expected: ParamType,
    },

    /// A coerced value is not a member of the parameter's allowed set.
    NotAllowed {
        /// The parameter the value was destined for.
        name: String,
        /// The offending value, rendered.
        value: String,
    },

    /// A coerced integer falls outside the parameter's allowed range.
    OutOfRange {
        /// The parameter the value was destined for.
        name: String,
        /// The offending value.
        value: i64,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },

    /// A command-line token matched no defined option. Positional
    /// arguments are not supported, so any bare token lands here too.
    UnknownArgument {
        /// The offending token.
        arg: String,
    },

    /// A command-line option that takes a value appeared as the last token.
    MissingValue {
        /// The option that was left without a value.
        arg: String,
    },

    /// `get`/`set` was called with a name no spec defines.
    UnknownParameter {
        /// The undefined name.
        name: String,
    },

    /// Resolution finished with a mandatory parameter still unset.
    Unset {
        /// The parameter that never received a value.
        name: String,
    },

    /// A config-file data line did not have the `KEY VALUE` shape.
    MalformedLine {
        /// The file containing the line.
        path: Utf8PathBuf,
        /// One-based line number.
        line: usize,
    },

    /// A config file was found during the search but could not be read.
    FileRead {
        /// The file that failed.
        path: Utf8PathBuf,
        /// The underlying I/O error, rendered.
        reason: String,
    },
}

impl ConfError {
    /// A stable machine-readable code for this error kind.
    pub const fn code(&self) -> &'static str {
        match self {
            ConfError::Definition { .. } => "conf::definition",
            ConfError::BadType { .. } => "conf::bad_type",
            ConfError::NotAllowed { .. } => "conf::not_allowed",
            ConfError::OutOfRange { .. } => "conf::out_of_range",
            ConfError::UnknownArgument { .. } => "conf::unknown_argument",
            ConfError::MissingValue { .. } => "conf::missing_value",
            ConfError::UnknownParameter { .. } => "conf::unknown_parameter",
            ConfError::Unset { .. } => "conf::unset",
            ConfError::MalformedLine { .. } => "conf::malformed_line",
            ConfError::FileRead { .. } => "conf::file_read",
        }
    }
}

impl std::fmt::Display for ConfError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfError::Definition { name, reason } => {
                write!(f, "parameter '{name}': {reason}")
            }
            ConfError::BadType {
                name,
                value,
                expected,
            } => {
                write!(f, "parameter '{name}': cannot convert '{value}' to {expected}")
            }
            ConfError::NotAllowed { name, value } => {
                write!(f, "parameter '{name}': '{value}' is not one of the allowed values")
            }
            ConfError::OutOfRange {
                name,
                value,
                min,
                max,
            } => {
                write!(
                    f,
                    "parameter '{name}': {value} is outside the allowed range {min}..={max}"
                )
            }
            ConfError::UnknownArgument { arg } => {
                write!(f, "unknown argument '{arg}'")
            }
            ConfError::MissingValue { arg } => {
                write!(f, "option '{arg}' requires a value")
            }
            ConfError::UnknownParameter { name } => {
                write!(f, "unknown parameter '{name}'")
            }
            ConfError::Unset { name } => {
                write!(f, "parameter '{name}': requires a value, nothing has been set")
            }
            ConfError::MalformedLine { path, line } => {
                write!(f, "{path}: malformed line {line}")
            }
            ConfError::FileRead { path, reason } => {
                write!(f, "error reading {path}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfError {}
