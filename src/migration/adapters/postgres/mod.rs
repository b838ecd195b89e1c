//! `PostgreSQL` adapters for schema migrations.

mod connection;
mod ddl;
mod migrator;
mod models;
mod schema;

pub use connection::{HISTORY_TABLE, history_table};
pub use ddl::{quote_identifier, render_create_table};
pub use migrator::{MigrationPgPool, PostgresMigrator};
