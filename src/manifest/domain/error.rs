//! Error types for declarative manifest validation.

use thiserror::Error;

/// Errors returned while constructing manifest domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ManifestDomainError {
    /// The manifest version is outside the persisted range.
    #[error("invalid manifest version {0}, expected a value between 1 and {max}", max = i64::MAX)]
    InvalidVersion(u64),

    /// The description exceeds the column bound.
    #[error("manifest description has {length} characters, at most {max} are allowed")]
    DescriptionTooLong {
        /// Character count of the rejected description.
        length: usize,
        /// Maximum permitted character count.
        max: usize,
    },

    /// A JSON document is not an object.
    #[error("manifest field '{field}' must be a JSON object")]
    InvalidDocument {
        /// Name of the offending field.
        field: &'static str,
    },
}
