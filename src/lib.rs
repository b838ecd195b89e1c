//! Configdb: configuration database schema and declarative manifest storage.
//!
//! This crate evolves the configuration database through versioned,
//! idempotent schema migrations and stores the declarative manifests that
//! those migrations make room for.
//!
//! # Architecture
//!
//! Configdb follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (`PostgreSQL`, in-memory)
//!
//! # Modules
//!
//! - [`migration`]: Schema builder, migration registry, and runner
//! - [`configs`]: Configuration database migrations
//! - [`manifest`]: Versioned declarative manifests and their active versions

pub mod configs;
pub mod manifest;
pub mod migration;
