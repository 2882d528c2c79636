//! Command-line layer: tokenizing an argument list against the defined
//! parameter set.
//!
//! Short options accept `-f value` and `-fvalue`; long options accept
//! `--some-param value` and `--some-param=value`. Boolean parameters are
//! pure flags (presence means true) and may be chained as `-gv`. There are
//! no positional arguments: the first token that matches no defined option
//! is an error, never passed through.

use indexmap::IndexMap;

use crate::error::ConfError;
use crate::param::ParamSpec;

/// A raw value produced by the command-line layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliValue {
    /// A boolean flag was present.
    Flag,
    /// The option consumed a value token.
    Raw(String),
}

/// Tokenize `args` against the specs that declare a command-line form.
///
/// Returns raw values keyed by parameter name. If an option occurs more
/// than once, the last occurrence wins.
pub fn parse_args<'a, I>(specs: I, args: &[String]) -> Result<IndexMap<String, CliValue>, ConfError>
where
    I: IntoIterator<Item = &'a ParamSpec>,
{
    let mut by_short: IndexMap<char, &ParamSpec> = IndexMap::new();
    let mut by_long: IndexMap<&str, &ParamSpec> = IndexMap::new();
    for spec in specs {
        if let Some(c) = spec.short() {
            by_short.insert(c, spec);
        }
        if let Some(l) = spec.long() {
            by_long.insert(l, spec);
        }
    }

    let mut entries = IndexMap::new();
    let mut tokens = args.iter();

    while let Some(arg) = tokens.next() {
        if let Some(body) = arg.strip_prefix("--") {
            if body.is_empty() {
                // A bare `--` would start positional arguments, which this
                // surface does not have.
                return Err(ConfError::UnknownArgument { arg: arg.clone() });
            }

            let (name, inline) = match body.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (body, None),
            };

            let Some(spec) = by_long.get(name) else {
                return Err(ConfError::UnknownArgument { arg: arg.clone() });
            };

            if spec.takes_value() {
                let value = match inline {
                    Some(value) => value.to_string(),
                    None => tokens
                        .next()
                        .ok_or_else(|| ConfError::MissingValue {
                            arg: format!("--{name}"),
                        })?
                        .clone(),
                };
                entries.insert(spec.name().to_string(), CliValue::Raw(value));
            } else {
                // A flag takes no value, so the `=` form matches no
                // defined option.
                if inline.is_some() {
                    return Err(ConfError::UnknownArgument { arg: arg.clone() });
                }
                entries.insert(spec.name().to_string(), CliValue::Flag);
            }
        } else if let Some(body) = arg.strip_prefix('-') {
            if body.is_empty() {
                return Err(ConfError::UnknownArgument { arg: arg.clone() });
            }

            let mut chars = body.char_indices();
            while let Some((pos, c)) = chars.next() {
                let Some(spec) = by_short.get(&c) else {
                    return Err(ConfError::UnknownArgument {
                        arg: format!("-{c}"),
                    });
                };

                if spec.takes_value() {
                    let rest = &body[pos + c.len_utf8()..];
                    let value = if !rest.is_empty() {
                        rest.to_string()
                    } else {
                        tokens
                            .next()
                            .ok_or_else(|| ConfError::MissingValue {
                                arg: format!("-{c}"),
                            })?
                            .clone()
                    };
                    entries.insert(spec.name().to_string(), CliValue::Raw(value));
                    break;
                }

                // Boolean flags may be chained: -gv sets both.
                entries.insert(spec.name().to_string(), CliValue::Flag);
            }
        } else {
            return Err(ConfError::UnknownArgument { arg: arg.clone() });
        }
    }

    Ok(entries)
}
