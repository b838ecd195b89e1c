//! Records describing migrations that have been applied to a database.

use super::MigrationVersion;
use chrono::{DateTime, Utc};

/// History entry for a successfully applied migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMigration {
    /// Version of the applied migration.
    pub version: MigrationVersion,
    /// Description recorded at application time.
    pub description: String,
    /// Checksum of the migration body, when the migration provides one.
    pub checksum: Option<String>,
    /// Time at which the migration was recorded.
    pub installed_on: DateTime<Utc>,
    /// Wall-clock time spent applying the migration.
    pub execution_time_ms: i64,
}
