//! Monotonic version tags used to order schema migrations.

use super::MigrationDomainError;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Version tag of a schema migration.
///
/// Versions are dot- or underscore-separated numeric segments such as
/// `0.41.00.002` or `0_41_00_002`. Segments compare numerically, and trailing
/// zero segments carry no meaning, so `1.0` and `1` denote the same version.
#[derive(Debug, Clone)]
pub struct MigrationVersion {
    segments: Vec<u64>,
    display: String,
}

impl MigrationVersion {
    /// Parses a version tag.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationDomainError::InvalidVersion`] when the value is
    /// empty or contains a segment that is not a base-10 integer.
    pub fn parse(value: &str) -> Result<Self, MigrationDomainError> {
        let trimmed = value.trim();
        let invalid = || MigrationDomainError::InvalidVersion(value.to_owned());
        if trimmed.is_empty() {
            return Err(invalid());
        }

        let mut segments = Vec::new();
        let mut parts = Vec::new();
        for part in trimmed.split(['.', '_']) {
            if part.is_empty() || !part.chars().all(|ch| ch.is_ascii_digit()) {
                return Err(invalid());
            }
            segments.push(part.parse::<u64>().map_err(|_| invalid())?);
            parts.push(part);
        }

        Ok(Self {
            segments,
            display: parts.join("."),
        })
    }

    /// Returns the numeric segments as parsed.
    #[must_use]
    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    /// Returns the dotted representation, preserving zero padding.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.display
    }

    fn significant_segments(&self) -> &[u64] {
        let len = self
            .segments
            .iter()
            .rposition(|segment| *segment != 0)
            .map_or(0, |index| index + 1);
        self.segments.get(..len).unwrap_or_default()
    }
}

impl PartialEq for MigrationVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MigrationVersion {}

impl PartialOrd for MigrationVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MigrationVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.significant_segments()
            .cmp(other.significant_segments())
    }
}

impl Hash for MigrationVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant_segments().hash(state);
    }
}

impl FromStr for MigrationVersion {
    type Err = MigrationDomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for MigrationVersion {
    type Error = MigrationDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl fmt::Display for MigrationVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}
