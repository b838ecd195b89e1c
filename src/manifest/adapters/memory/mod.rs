//! In-memory adapters for declarative manifest storage.

mod repository;

pub use repository::InMemoryManifestRepository;
