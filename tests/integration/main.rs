//! Integration tests exercising the public API end to end.

mod precedence;
mod resolution;
mod store;
