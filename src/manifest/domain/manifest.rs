//! Versioned declarative manifest records.

use super::{ActorDefinitionId, ManifestDomainError, ManifestKey, ManifestVersion};
use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Free-text description of a manifest version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestDescription(String);

impl ManifestDescription {
    /// Maximum description length in characters, matching `VARCHAR(256)`.
    pub const MAX_LENGTH: usize = 256;

    /// Creates a validated description.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestDomainError::DescriptionTooLong`] when the value has
    /// more than [`Self::MAX_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ManifestDomainError> {
        let raw = value.into();
        let length = raw.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(ManifestDomainError::DescriptionTooLong {
                length,
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(raw))
    }

    /// Returns the description as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ManifestDescription {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ManifestDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Manifest body and connector specification documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestContent {
    manifest: Value,
    spec: Value,
}

impl ManifestContent {
    /// Creates validated manifest content.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestDomainError::InvalidDocument`] when either document
    /// is not a JSON object.
    pub fn new(manifest: Value, spec: Value) -> Result<Self, ManifestDomainError> {
        if !manifest.is_object() {
            return Err(ManifestDomainError::InvalidDocument { field: "manifest" });
        }
        if !spec.is_object() {
            return Err(ManifestDomainError::InvalidDocument { field: "spec" });
        }
        Ok(Self { manifest, spec })
    }

    /// Returns the declarative connector definition.
    #[must_use]
    pub const fn manifest(&self) -> &Value {
        &self.manifest
    }

    /// Returns the connector configuration schema.
    #[must_use]
    pub const fn spec(&self) -> &Value {
        &self.spec
    }
}

/// Immutable manifest version published for an actor definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarativeManifest {
    key: ManifestKey,
    description: ManifestDescription,
    content: ManifestContent,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedManifestData {
    /// Persisted composite key.
    pub key: ManifestKey,
    /// Persisted description.
    pub description: ManifestDescription,
    /// Persisted manifest and spec documents.
    pub content: ManifestContent,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl DeclarativeManifest {
    /// Creates a new manifest version stamped with the current time.
    ///
    /// Timestamps are truncated to microseconds, the precision of
    /// `TIMESTAMPTZ`.
    #[must_use]
    pub fn new(
        actor_definition_id: ActorDefinitionId,
        version: ManifestVersion,
        description: ManifestDescription,
        content: ManifestContent,
        clock: &impl Clock,
    ) -> Self {
        Self {
            key: ManifestKey::new(actor_definition_id, version),
            description,
            content,
            created_at: clock.utc().trunc_subsecs(6),
        }
    }

    /// Reconstructs a manifest from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedManifestData) -> Self {
        Self {
            key: data.key,
            description: data.description,
            content: data.content,
            created_at: data.created_at,
        }
    }

    /// Returns the composite key.
    #[must_use]
    pub const fn key(&self) -> ManifestKey {
        self.key
    }

    /// Returns the owning actor definition.
    #[must_use]
    pub const fn actor_definition_id(&self) -> ActorDefinitionId {
        self.key.actor_definition_id
    }

    /// Returns the manifest version.
    #[must_use]
    pub const fn version(&self) -> ManifestVersion {
        self.key.version
    }

    /// Returns the description.
    #[must_use]
    pub const fn description(&self) -> &ManifestDescription {
        &self.description
    }

    /// Returns the manifest and spec documents.
    #[must_use]
    pub const fn content(&self) -> &ManifestContent {
        &self.content
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
