//! Diesel schema for declarative manifest persistence.

diesel::table! {
    /// Published manifest versions per actor definition.
    declarative_manifest (actor_definition_id, version) {
        /// Owning actor definition.
        actor_definition_id -> Uuid,
        /// Free-text description.
        #[max_length = 256]
        description -> Varchar,
        /// Declarative connector definition.
        manifest -> Jsonb,
        /// Connector configuration schema.
        spec -> Jsonb,
        /// Manifest version.
        version -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Active manifest version per actor definition.
    active_declarative_manifest (id) {
        /// Row identifier.
        id -> Uuid,
        /// Actor definition, unique across the table.
        actor_definition_id -> Uuid,
        /// Active manifest version.
        version -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
