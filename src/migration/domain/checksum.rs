//! Checksums that detect drift between recorded and registered migrations.

use super::TableDefinition;
use sha2::{Digest, Sha256};

/// Computes a hex-encoded SHA-256 checksum over table definitions.
///
/// The checksum covers every column and constraint of every table, in the
/// given order.
#[must_use]
pub fn checksum_tables<'a>(tables: impl IntoIterator<Item = &'a TableDefinition>) -> String {
    let mut hasher = Sha256::new();
    for table in tables {
        hasher.update(table.fingerprint().as_bytes());
        hasher.update(b"\n");
    }
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}
