#![warn(missing_docs)]
#![deny(unsafe_code)]
#![doc = include_str!("../README.md")]

pub(crate) mod conf;
pub(crate) mod dump;
pub(crate) mod error;
pub(crate) mod layers;
pub(crate) mod param;
pub(crate) mod value;

pub use conf::{builder, Conf, ConfBuilder, Overrides, Source};
pub use error::ConfError;
pub use layers::env::{EnvConfigBuilder, EnvSource, MockEnv, StdEnv};
pub use layers::file::FileConfigBuilder;
pub use param::{ParamBuilder, ParamSpec};
pub use value::{ParamType, Value};
