//! Repository port for declarative manifests and their active versions.

use crate::manifest::domain::{
    ActiveDeclarativeManifest, ActiveManifestId, ActorDefinitionId, DeclarativeManifest,
    ManifestKey, ManifestVersion,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for manifest repository operations.
pub type ManifestRepositoryResult<T> = Result<T, ManifestRepositoryError>;

/// Declarative manifest persistence contract.
#[async_trait]
pub trait DeclarativeManifestRepository: Send + Sync {
    /// Stores a new manifest version.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestRepositoryError::DuplicateManifestVersion`] when the
    /// actor definition already has a manifest with the same version.
    async fn store_manifest(&self, manifest: &DeclarativeManifest)
    -> ManifestRepositoryResult<()>;

    /// Finds a manifest by actor definition and version.
    ///
    /// Returns `None` when no such manifest exists.
    async fn find_manifest(
        &self,
        key: ManifestKey,
    ) -> ManifestRepositoryResult<Option<DeclarativeManifest>>;

    /// Returns the stored versions of an actor definition in ascending order.
    async fn list_versions(
        &self,
        actor_definition_id: ActorDefinitionId,
    ) -> ManifestRepositoryResult<Vec<ManifestVersion>>;

    /// Stores the active manifest designation of an actor definition.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestRepositoryError::ManifestNotFound`] when the
    /// referenced manifest does not exist,
    /// [`ManifestRepositoryError::ActiveManifestExists`] when the actor
    /// definition already has an active manifest, and
    /// [`ManifestRepositoryError::DuplicateActiveId`] when the row identifier
    /// is already in use.
    async fn store_active(&self, active: &ActiveDeclarativeManifest)
    -> ManifestRepositoryResult<()>;

    /// Finds the active manifest designation of an actor definition.
    ///
    /// Returns `None` when the actor definition has no active manifest.
    async fn find_active(
        &self,
        actor_definition_id: ActorDefinitionId,
    ) -> ManifestRepositoryResult<Option<ActiveDeclarativeManifest>>;
}

/// Errors returned by manifest repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ManifestRepositoryError {
    /// A manifest with the same actor definition and version already exists.
    #[error("duplicate manifest version: {0}")]
    DuplicateManifestVersion(ManifestKey),

    /// The referenced manifest does not exist.
    #[error("manifest not found: {0}")]
    ManifestNotFound(ManifestKey),

    /// The actor definition already has an active manifest.
    #[error("actor definition {0} already has an active manifest")]
    ActiveManifestExists(ActorDefinitionId),

    /// An active manifest with the same identifier already exists.
    #[error("duplicate active manifest identifier: {0}")]
    DuplicateActiveId(ActiveManifestId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ManifestRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
