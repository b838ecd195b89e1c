//! In-memory adapters for migration ports.

mod catalog;

pub use catalog::InMemorySchemaCatalog;
