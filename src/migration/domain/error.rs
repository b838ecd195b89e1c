//! Error types for migration domain validation.

use thiserror::Error;

/// Errors returned while constructing migration domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MigrationDomainError {
    /// The version tag is not a sequence of numeric segments.
    #[error("invalid migration version '{0}', expected numeric segments such as 0.41.00.002")]
    InvalidVersion(String),

    /// A table definition is structurally invalid.
    #[error("invalid definition for table '{table}': {reason}")]
    InvalidTableDefinition {
        /// Table being defined.
        table: String,
        /// Human-readable description of the problem.
        reason: String,
    },
}
