//! Diesel schema for the migration history table.

diesel::table! {
    /// One row per applied migration.
    schema_migration_history (version) {
        /// Dotted migration version.
        #[max_length = 50]
        version -> Varchar,
        /// Migration description.
        #[max_length = 200]
        description -> Varchar,
        /// Optional checksum of the migration body.
        #[max_length = 64]
        checksum -> Nullable<Varchar>,
        /// Time the migration was recorded.
        installed_on -> Timestamptz,
        /// Time spent applying the migration.
        execution_time_ms -> Int8,
    }
}
