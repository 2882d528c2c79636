//! Source readers for layered resolution.
//!
//! Each layer reads one source and produces a flat mapping of raw values;
//! none of them validates or knows about the others. The resolver overlays
//! them in ascending precedence order:
//!
//! - `file`: the optional config file
//! - `env`: environment variables
//! - `cli`: command-line arguments

pub mod cli;
pub mod env;
pub mod file;
