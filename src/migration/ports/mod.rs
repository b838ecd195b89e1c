//! Port contracts for schema migrations.
//!
//! Ports define the database operations a migration needs and the contract
//! every registered migration implements.

pub mod connection;
pub mod migration;

pub use connection::{SchemaConnection, TransactionWork};
pub use migration::Migration;
