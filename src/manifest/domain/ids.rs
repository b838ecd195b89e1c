//! Identifier and validated scalar types for declarative manifests.

use super::ManifestDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of a connector type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorDefinitionId(Uuid);

impl ActorDefinitionId {
    /// Creates a new random actor definition identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an actor definition identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ActorDefinitionId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for ActorDefinitionId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ActorDefinitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an active manifest pointer row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveManifestId(Uuid);

impl ActiveManifestId {
    /// Creates a new random active manifest identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an active manifest identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ActiveManifestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActiveManifestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Positive manifest version number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestVersion(u64);

impl ManifestVersion {
    /// Largest version representable in the `BIGINT` column.
    const MAX_PERSISTED_VALUE: u64 = i64::MAX as u64;

    /// Creates a validated manifest version.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestDomainError::InvalidVersion`] when the value is zero
    /// or exceeds `i64::MAX`.
    pub const fn new(value: u64) -> Result<Self, ManifestDomainError> {
        if value == 0 || value > Self::MAX_PERSISTED_VALUE {
            return Err(ManifestDomainError::InvalidVersion(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the value as stored in `PostgreSQL`.
    #[must_use]
    pub fn as_persisted(self) -> i64 {
        i64::try_from(self.0).unwrap_or(i64::MAX)
    }
}

impl TryFrom<i64> for ManifestVersion {
    type Error = ManifestDomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let unsigned = u64::try_from(value).unwrap_or_default();
        Self::new(unsigned)
    }
}

impl fmt::Display for ManifestVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Composite key of a declarative manifest row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ManifestKey {
    /// Owning actor definition.
    pub actor_definition_id: ActorDefinitionId,
    /// Manifest version.
    pub version: ManifestVersion,
}

impl ManifestKey {
    /// Creates a manifest key.
    #[must_use]
    pub const fn new(actor_definition_id: ActorDefinitionId, version: ManifestVersion) -> Self {
        Self {
            actor_definition_id,
            version,
        }
    }
}

impl fmt::Display for ManifestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.actor_definition_id, self.version)
    }
}
