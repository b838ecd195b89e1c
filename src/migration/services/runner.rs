//! Applies registered migrations in version order and records them.

use super::MigrationRegistry;
use crate::migration::{
    domain::{AppliedMigration, MigrationVersion},
    error::{MigrationError, MigrationResult},
    ports::{Migration, SchemaConnection},
};
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Options controlling which migrations a run applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratorOptions {
    target: Option<MigrationVersion>,
    allow_out_of_order: bool,
    validate_on_migrate: bool,
    ignore_unknown_applied: bool,
}

impl Default for MigratorOptions {
    fn default() -> Self {
        Self {
            target: None,
            allow_out_of_order: false,
            validate_on_migrate: true,
            ignore_unknown_applied: false,
        }
    }
}

impl MigratorOptions {
    /// Creates the default options: no target, strict ordering, validation on.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops applying migrations after `target`.
    #[must_use]
    pub fn with_target(mut self, target: MigrationVersion) -> Self {
        self.target = Some(target);
        self
    }

    /// Applies pending migrations older than the latest applied one.
    #[must_use]
    pub const fn with_out_of_order(mut self, allow: bool) -> Self {
        self.allow_out_of_order = allow;
        self
    }

    /// Enables or disables history validation before migrating.
    #[must_use]
    pub const fn with_validate_on_migrate(mut self, validate: bool) -> Self {
        self.validate_on_migrate = validate;
        self
    }

    /// Tolerates applied migrations that are no longer registered.
    #[must_use]
    pub const fn with_ignore_unknown_applied(mut self, ignore: bool) -> Self {
        self.ignore_unknown_applied = ignore;
        self
    }

    /// Returns the target version, if any.
    #[must_use]
    pub const fn target(&self) -> Option<&MigrationVersion> {
        self.target.as_ref()
    }
}

/// State of a migration relative to a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MigrationState {
    /// Recorded in the history table.
    Applied,
    /// Registered and due on the next run.
    Pending,
    /// Registered but newer than the configured target.
    AboveTarget,
    /// Registered, not applied, and older than the latest applied version.
    OutOfOrder,
    /// Recorded in the history table but not registered.
    Unknown,
}

/// Status line for one migration version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationInfo {
    /// Migration version.
    pub version: MigrationVersion,
    /// Migration description.
    pub description: String,
    /// State relative to the database.
    pub state: MigrationState,
    /// History record, when the migration has been applied.
    pub applied: Option<AppliedMigration>,
}

/// Outcome of a migration run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MigrationReport {
    /// Migrations applied by this run, in application order.
    pub applied: Vec<AppliedMigration>,
    /// Highest applied version after the run.
    pub current_version: Option<MigrationVersion>,
}

impl MigrationReport {
    /// Returns `true` when the run applied nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Applies registered migrations to a schema connection.
#[derive(Clone)]
pub struct MigrationRunner<C>
where
    C: Clock + Send + Sync,
{
    registry: Arc<MigrationRegistry>,
    options: MigratorOptions,
    clock: Arc<C>,
}

impl<C> MigrationRunner<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a runner with default options.
    #[must_use]
    pub fn new(registry: Arc<MigrationRegistry>, clock: Arc<C>) -> Self {
        Self {
            registry,
            options: MigratorOptions::default(),
            clock,
        }
    }

    /// Replaces the runner options.
    #[must_use]
    pub fn with_options(mut self, options: MigratorOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the registry driven by this runner.
    #[must_use]
    pub fn registry(&self) -> &MigrationRegistry {
        &self.registry
    }

    /// Returns the runner options.
    #[must_use]
    pub const fn options(&self) -> &MigratorOptions {
        &self.options
    }

    /// Applies every pending migration.
    ///
    /// Each migration runs in its own transaction together with its history
    /// record, so a failure leaves the failed migration entirely unapplied.
    /// Migrations applied earlier in the same run stay committed.
    ///
    /// # Errors
    ///
    /// Returns validation errors before any migration is applied,
    /// [`MigrationError::OutOfOrder`] when strict ordering is violated, and
    /// [`MigrationError::Failed`] wrapping the cause when a migration fails.
    pub fn migrate(
        &self,
        connection: &mut dyn SchemaConnection,
    ) -> MigrationResult<MigrationReport> {
        connection.ensure_history_table()?;
        let history = connection.applied_migrations()?;
        if self.options.validate_on_migrate {
            self.check_history(&history)?;
        }

        let pending = self.pending(&history)?;
        if pending.is_empty() {
            debug!("schema is up to date");
        }

        let mut applied = Vec::with_capacity(pending.len());
        for migration in pending {
            applied.push(self.apply_one(connection, migration.as_ref())?);
        }

        let current_version = history
            .iter()
            .chain(applied.iter())
            .map(|record| &record.version)
            .max()
            .cloned();
        Ok(MigrationReport {
            applied,
            current_version,
        })
    }

    /// Checks recorded migrations against the registry without applying any.
    ///
    /// A database without a history table has nothing to check.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::UnknownAppliedMigration`] or
    /// [`MigrationError::ChecksumMismatch`] for the first inconsistent record.
    pub fn validate(&self, connection: &mut dyn SchemaConnection) -> MigrationResult<()> {
        let history = recorded_history(connection)?;
        self.check_history(&history)
    }

    /// Reports the state of every registered or recorded migration.
    ///
    /// # Errors
    ///
    /// Returns connection errors raised while reading the history.
    pub fn info(&self, connection: &mut dyn SchemaConnection) -> MigrationResult<Vec<MigrationInfo>> {
        let history = recorded_history(connection)?;
        let latest = history.iter().map(|record| &record.version).max();

        let mut entries: Vec<MigrationInfo> = self
            .registry
            .iter()
            .map(|migration| {
                let version = migration.version();
                let record = history.iter().find(|record| &record.version == version);
                let state = if record.is_some() {
                    MigrationState::Applied
                } else if self.options.target().is_some_and(|target| version > target) {
                    MigrationState::AboveTarget
                } else if latest.is_some_and(|latest| version < latest) {
                    MigrationState::OutOfOrder
                } else {
                    MigrationState::Pending
                };
                MigrationInfo {
                    version: version.clone(),
                    description: migration.description().to_owned(),
                    state,
                    applied: record.cloned(),
                }
            })
            .collect();

        entries.extend(
            history
                .iter()
                .filter(|record| self.registry.get(&record.version).is_none())
                .map(|record| MigrationInfo {
                    version: record.version.clone(),
                    description: record.description.clone(),
                    state: MigrationState::Unknown,
                    applied: Some(record.clone()),
                }),
        );
        entries.sort_by(|left, right| left.version.cmp(&right.version));
        Ok(entries)
    }

    fn check_history(&self, history: &[AppliedMigration]) -> MigrationResult<()> {
        for record in history {
            let Some(migration) = self.registry.get(&record.version) else {
                if self.options.ignore_unknown_applied {
                    warn!(version = %record.version, "ignoring applied migration that is not registered");
                    continue;
                }
                return Err(MigrationError::UnknownAppliedMigration(
                    record.version.clone(),
                ));
            };

            if let (Some(recorded), Some(registered)) = (&record.checksum, migration.checksum()) {
                if *recorded != registered {
                    return Err(MigrationError::ChecksumMismatch {
                        version: record.version.clone(),
                        recorded: recorded.clone(),
                        registered,
                    });
                }
            }
        }
        Ok(())
    }

    fn pending(&self, history: &[AppliedMigration]) -> MigrationResult<Vec<Arc<dyn Migration>>> {
        let applied: HashSet<&MigrationVersion> =
            history.iter().map(|record| &record.version).collect();
        let latest = applied.iter().copied().max();

        let mut pending = Vec::new();
        for migration in self.registry.iter() {
            let version = migration.version();
            if applied.contains(version) {
                continue;
            }
            if self.options.target().is_some_and(|target| version > target) {
                debug!(%version, "skipping migration above target");
                continue;
            }
            if let Some(latest) = latest {
                if version < latest && !self.options.allow_out_of_order {
                    return Err(MigrationError::OutOfOrder {
                        version: version.clone(),
                        latest: latest.clone(),
                    });
                }
            }
            pending.push(Arc::clone(migration));
        }
        Ok(pending)
    }

    fn apply_one(
        &self,
        connection: &mut dyn SchemaConnection,
        migration: &dyn Migration,
    ) -> MigrationResult<AppliedMigration> {
        let version = migration.version();
        info!(%version, description = migration.description(), "applying migration");

        let started = Instant::now();
        let mut record = AppliedMigration {
            version: version.clone(),
            description: migration.description().to_owned(),
            checksum: migration.checksum(),
            installed_on: self.clock.utc(),
            execution_time_ms: 0,
        };
        connection
            .run_in_transaction(&mut |transaction| {
                migration.apply(transaction)?;
                record.execution_time_ms = elapsed_ms(started);
                transaction.record_applied(&record)
            })
            .map_err(|source| MigrationError::Failed {
                version: version.clone(),
                description: migration.description().to_owned(),
                source: Box::new(source),
            })?;

        info!(
            %version,
            execution_time_ms = record.execution_time_ms,
            "migration applied"
        );
        Ok(record)
    }
}

fn recorded_history(
    connection: &mut dyn SchemaConnection,
) -> MigrationResult<Vec<AppliedMigration>> {
    if connection.has_history_table()? {
        connection.applied_migrations()
    } else {
        Ok(Vec::new())
    }
}

fn elapsed_ms(started: Instant) -> i64 {
    i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX)
}
