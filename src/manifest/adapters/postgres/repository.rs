//! `PostgreSQL` repository implementation for declarative manifests.

use super::{
    models::{ActiveManifestRow, ManifestRow},
    schema::{active_declarative_manifest, declarative_manifest},
};
use crate::manifest::{
    domain::{
        ActiveDeclarativeManifest, ActiveManifestId, ActorDefinitionId, DeclarativeManifest,
        ManifestContent, ManifestDescription, ManifestKey, ManifestVersion,
        PersistedActiveManifestData, PersistedManifestData,
    },
    ports::{DeclarativeManifestRepository, ManifestRepositoryError, ManifestRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by manifest adapters.
pub type ManifestPgPool = Pool<ConnectionManager<PgConnection>>;

const ACTIVE_PRIMARY_KEY: &str = "active_declarative_manifest_pkey";

/// `PostgreSQL`-backed declarative manifest repository.
#[derive(Debug, Clone)]
pub struct PostgresManifestRepository {
    pool: ManifestPgPool,
}

impl PostgresManifestRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ManifestPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ManifestRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ManifestRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ManifestRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ManifestRepositoryError::persistence)?
    }
}

#[async_trait]
impl DeclarativeManifestRepository for PostgresManifestRepository {
    async fn store_manifest(
        &self,
        manifest: &DeclarativeManifest,
    ) -> ManifestRepositoryResult<()> {
        let key = manifest.key();
        let row = to_manifest_row(manifest);

        self.run_blocking(move |connection| {
            diesel::insert_into(declarative_manifest::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ManifestRepositoryError::DuplicateManifestVersion(key)
                    }
                    _ => ManifestRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_manifest(
        &self,
        key: ManifestKey,
    ) -> ManifestRepositoryResult<Option<DeclarativeManifest>> {
        self.run_blocking(move |connection| {
            let row = declarative_manifest::table
                .filter(
                    declarative_manifest::actor_definition_id
                        .eq(key.actor_definition_id.into_inner()),
                )
                .filter(declarative_manifest::version.eq(key.version.as_persisted()))
                .select(ManifestRow::as_select())
                .first::<ManifestRow>(connection)
                .optional()
                .map_err(ManifestRepositoryError::persistence)?;
            row.map(row_to_manifest).transpose()
        })
        .await
    }

    async fn list_versions(
        &self,
        actor_definition_id: ActorDefinitionId,
    ) -> ManifestRepositoryResult<Vec<ManifestVersion>> {
        self.run_blocking(move |connection| {
            let versions = declarative_manifest::table
                .filter(declarative_manifest::actor_definition_id.eq(actor_definition_id.into_inner()))
                .select(declarative_manifest::version)
                .order(declarative_manifest::version.asc())
                .load::<i64>(connection)
                .map_err(ManifestRepositoryError::persistence)?;
            versions
                .into_iter()
                .map(|version| {
                    ManifestVersion::try_from(version).map_err(ManifestRepositoryError::persistence)
                })
                .collect()
        })
        .await
    }

    async fn store_active(
        &self,
        active: &ActiveDeclarativeManifest,
    ) -> ManifestRepositoryResult<()> {
        let id = active.id();
        let key = active.key();
        let row = to_active_row(active);

        self.run_blocking(move |connection| {
            diesel::insert_into(active_declarative_manifest::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_active_primary_key_violation(info.as_ref()) =>
                    {
                        ManifestRepositoryError::DuplicateActiveId(id)
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ManifestRepositoryError::ActiveManifestExists(key.actor_definition_id)
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        ManifestRepositoryError::ManifestNotFound(key)
                    }
                    _ => ManifestRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_active(
        &self,
        actor_definition_id: ActorDefinitionId,
    ) -> ManifestRepositoryResult<Option<ActiveDeclarativeManifest>> {
        self.run_blocking(move |connection| {
            let row = active_declarative_manifest::table
                .filter(
                    active_declarative_manifest::actor_definition_id
                        .eq(actor_definition_id.into_inner()),
                )
                .select(ActiveManifestRow::as_select())
                .first::<ActiveManifestRow>(connection)
                .optional()
                .map_err(ManifestRepositoryError::persistence)?;
            row.map(row_to_active).transpose()
        })
        .await
    }
}

fn to_manifest_row(manifest: &DeclarativeManifest) -> ManifestRow {
    ManifestRow {
        actor_definition_id: manifest.actor_definition_id().into_inner(),
        description: manifest.description().as_str().to_owned(),
        manifest: manifest.content().manifest().clone(),
        spec: manifest.content().spec().clone(),
        version: manifest.version().as_persisted(),
        created_at: manifest.created_at(),
    }
}

fn row_to_manifest(row: ManifestRow) -> ManifestRepositoryResult<DeclarativeManifest> {
    let ManifestRow {
        actor_definition_id,
        description: persisted_description,
        manifest,
        spec,
        version: persisted_version,
        created_at,
    } = row;

    let version =
        ManifestVersion::try_from(persisted_version).map_err(ManifestRepositoryError::persistence)?;
    let description = ManifestDescription::new(persisted_description)
        .map_err(ManifestRepositoryError::persistence)?;
    let content =
        ManifestContent::new(manifest, spec).map_err(ManifestRepositoryError::persistence)?;

    Ok(DeclarativeManifest::from_persisted(PersistedManifestData {
        key: ManifestKey::new(ActorDefinitionId::from_uuid(actor_definition_id), version),
        description,
        content,
        created_at,
    }))
}

fn to_active_row(active: &ActiveDeclarativeManifest) -> ActiveManifestRow {
    ActiveManifestRow {
        id: active.id().into_inner(),
        actor_definition_id: active.actor_definition_id().into_inner(),
        version: active.version().as_persisted(),
        created_at: active.created_at(),
        updated_at: active.updated_at(),
    }
}

fn row_to_active(row: ActiveManifestRow) -> ManifestRepositoryResult<ActiveDeclarativeManifest> {
    let version =
        ManifestVersion::try_from(row.version).map_err(ManifestRepositoryError::persistence)?;

    Ok(ActiveDeclarativeManifest::from_persisted(
        PersistedActiveManifestData {
            id: ActiveManifestId::from_uuid(row.id),
            key: ManifestKey::new(ActorDefinitionId::from_uuid(row.actor_definition_id), version),
            created_at: row.created_at,
            updated_at: row.updated_at,
        },
    ))
}

fn is_active_primary_key_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == ACTIVE_PRIMARY_KEY)
}
