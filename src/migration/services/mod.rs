//! Application services for registering and applying migrations.

mod registry;
mod runner;
mod schema;

pub use registry::MigrationRegistry;
pub use runner::{
    MigrationInfo, MigrationReport, MigrationRunner, MigrationState, MigratorOptions,
};
pub use schema::ensure_table;
