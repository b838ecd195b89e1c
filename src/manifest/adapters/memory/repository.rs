//! In-memory repository for declarative manifest tests.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::manifest::{
    domain::{
        ActiveDeclarativeManifest, ActiveManifestId, ActorDefinitionId, DeclarativeManifest,
        ManifestKey, ManifestVersion,
    },
    ports::{DeclarativeManifestRepository, ManifestRepositoryError, ManifestRepositoryResult},
};

/// Thread-safe in-memory manifest repository.
///
/// Enforces the same keys as the `PostgreSQL` schema: a composite manifest
/// key, an active-manifest foreign key, and one active row per actor
/// definition.
#[derive(Debug, Clone, Default)]
pub struct InMemoryManifestRepository {
    state: Arc<RwLock<InMemoryManifestState>>,
}

#[derive(Debug, Default)]
struct InMemoryManifestState {
    manifests: BTreeMap<ManifestKey, DeclarativeManifest>,
    active: HashMap<ActorDefinitionId, ActiveDeclarativeManifest>,
    active_ids: HashSet<ActiveManifestId>,
}

impl InMemoryManifestRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> ManifestRepositoryError {
    ManifestRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl DeclarativeManifestRepository for InMemoryManifestRepository {
    async fn store_manifest(
        &self,
        manifest: &DeclarativeManifest,
    ) -> ManifestRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let key = manifest.key();
        if state.manifests.contains_key(&key) {
            return Err(ManifestRepositoryError::DuplicateManifestVersion(key));
        }
        state.manifests.insert(key, manifest.clone());
        Ok(())
    }

    async fn find_manifest(
        &self,
        key: ManifestKey,
    ) -> ManifestRepositoryResult<Option<DeclarativeManifest>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.manifests.get(&key).cloned())
    }

    async fn list_versions(
        &self,
        actor_definition_id: ActorDefinitionId,
    ) -> ManifestRepositoryResult<Vec<ManifestVersion>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .manifests
            .keys()
            .filter(|key| key.actor_definition_id == actor_definition_id)
            .map(|key| key.version)
            .collect())
    }

    async fn store_active(
        &self,
        active: &ActiveDeclarativeManifest,
    ) -> ManifestRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.active_ids.contains(&active.id()) {
            return Err(ManifestRepositoryError::DuplicateActiveId(active.id()));
        }
        if state.active.contains_key(&active.actor_definition_id()) {
            return Err(ManifestRepositoryError::ActiveManifestExists(
                active.actor_definition_id(),
            ));
        }
        if !state.manifests.contains_key(&active.key()) {
            return Err(ManifestRepositoryError::ManifestNotFound(active.key()));
        }

        state.active_ids.insert(active.id());
        state
            .active
            .insert(active.actor_definition_id(), active.clone());
        Ok(())
    }

    async fn find_active(
        &self,
        actor_definition_id: ActorDefinitionId,
    ) -> ManifestRepositoryResult<Option<ActiveDeclarativeManifest>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.active.get(&actor_definition_id).cloned())
    }
}
