//! Domain model for declarative manifests.
//!
//! Values are validated on construction so that every manifest handed to a
//! repository satisfies the column bounds of the persisted schema.

mod active;
mod error;
mod ids;
mod manifest;

pub use active::{ActiveDeclarativeManifest, PersistedActiveManifestData};
pub use error::ManifestDomainError;
pub use ids::{ActiveManifestId, ActorDefinitionId, ManifestKey, ManifestVersion};
pub use manifest::{
    DeclarativeManifest, ManifestContent, ManifestDescription, PersistedManifestData,
};
