//! Debug log viewer: library crate behind the `dl-viewer` binary.
//!
//! Re-exports the registry and invocation parsing so external crates
//! (e.g. `dl-e2e-tests`) can drive the same dispatch path as the binary.

pub mod invocation;
pub mod registry;
