//! Diesel row models for declarative manifest persistence.

use super::schema::{active_declarative_manifest, declarative_manifest};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query and insert row for `declarative_manifest`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = declarative_manifest)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ManifestRow {
    /// Owning actor definition.
    pub actor_definition_id: uuid::Uuid,
    /// Free-text description.
    pub description: String,
    /// Declarative connector definition.
    pub manifest: Value,
    /// Connector configuration schema.
    pub spec: Value,
    /// Manifest version.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Query and insert row for `active_declarative_manifest`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = active_declarative_manifest)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ActiveManifestRow {
    /// Row identifier.
    pub id: uuid::Uuid,
    /// Actor definition.
    pub actor_definition_id: uuid::Uuid,
    /// Active manifest version.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
