//! Port contracts for declarative manifest storage.

pub mod repository;

pub use repository::{
    DeclarativeManifestRepository, ManifestRepositoryError, ManifestRepositoryResult,
};
