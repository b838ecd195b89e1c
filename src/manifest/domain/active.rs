//! Pointer from an actor definition to its active manifest version.

use super::{ActiveManifestId, ActorDefinitionId, ManifestKey, ManifestVersion};
use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Active manifest designation for one actor definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveDeclarativeManifest {
    id: ActiveManifestId,
    key: ManifestKey,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted active manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedActiveManifestData {
    /// Persisted row identifier.
    pub id: ActiveManifestId,
    /// Persisted manifest key.
    pub key: ManifestKey,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ActiveDeclarativeManifest {
    /// Marks `version` as active for `actor_definition_id`.
    #[must_use]
    pub fn new(
        actor_definition_id: ActorDefinitionId,
        version: ManifestVersion,
        clock: &impl Clock,
    ) -> Self {
        Self::with_id(ActiveManifestId::new(), actor_definition_id, version, clock)
    }

    /// Marks `version` as active under a caller-chosen identifier.
    #[must_use]
    pub fn with_id(
        id: ActiveManifestId,
        actor_definition_id: ActorDefinitionId,
        version: ManifestVersion,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc().trunc_subsecs(6);
        Self {
            id,
            key: ManifestKey::new(actor_definition_id, version),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an active manifest from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedActiveManifestData) -> Self {
        Self {
            id: data.id,
            key: data.key,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the row identifier.
    #[must_use]
    pub const fn id(&self) -> ActiveManifestId {
        self.id
    }

    /// Returns the key of the referenced manifest.
    #[must_use]
    pub const fn key(&self) -> ManifestKey {
        self.key
    }

    /// Returns the actor definition.
    #[must_use]
    pub const fn actor_definition_id(&self) -> ActorDefinitionId {
        self.key.actor_definition_id
    }

    /// Returns the active version.
    #[must_use]
    pub const fn version(&self) -> ManifestVersion {
        self.key.version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
