//! Versioned declarative manifest storage.
//!
//! Connectors defined declaratively publish immutable manifest versions keyed
//! by actor definition and version number, and at most one of those versions
//! is marked active per actor definition. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;
