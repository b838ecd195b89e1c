//! Versioned schema migrations for the configuration database.
//!
//! Migrations are registered in an explicit ordered registry, keyed by a
//! monotonic version tag, and applied in order by [`services::MigrationRunner`].
//! Applied versions are recorded in a history table so each migration runs at
//! most once per database. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
