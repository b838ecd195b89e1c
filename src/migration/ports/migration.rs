//! Port implemented by each versioned schema step.

use super::SchemaConnection;
use crate::migration::{domain::MigrationVersion, error::MigrationResult};

/// A versioned schema step registered with the migration runner.
pub trait Migration: Send + Sync {
    /// Returns the version that orders this step.
    fn version(&self) -> &MigrationVersion;

    /// Returns a short human-readable description.
    fn description(&self) -> &str;

    /// Returns a checksum of the step body, if the step can compute one.
    ///
    /// Recorded checksums are compared on later runs to detect steps that
    /// changed after being applied.
    fn checksum(&self) -> Option<String> {
        None
    }

    /// Applies the step.
    ///
    /// The runner already holds a transaction when calling this method.
    ///
    /// # Errors
    ///
    /// Returns any [`MigrationError`](crate::migration::error::MigrationError)
    /// raised by the connection or by schema verification.
    fn apply(&self, connection: &mut dyn SchemaConnection) -> MigrationResult<()>;
}
