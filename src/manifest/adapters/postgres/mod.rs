//! `PostgreSQL` adapters for declarative manifest storage.

mod models;
mod repository;
mod schema;

pub use repository::{ManifestPgPool, PostgresManifestRepository};
