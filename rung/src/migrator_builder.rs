use crate::errors::MigrationResult;
use crate::migration::{DbFn, HookPoint, Migration};
use crate::migrator::Migrator;

/// Builder for creating and configuring a [`Migrator`].
///
/// `MigratorBuilder` provides a fluent API over the migrator's settings. It is
/// obtained from [`Migrator::builder`], which takes the two required version
/// functions; everything else is optional.
///
/// Unlike registration on a built migrator, [`build`](MigratorBuilder::build)
/// validates the registered sequence when sequence checking is on, so a broken
/// ladder is reported where it is declared rather than on the first run.
///
/// # Examples
///
/// ```rust
/// use rung::migration::Migration;
/// use rung::Migrator;
///
/// struct Db {
///     version: i64,
///     log: Vec<String>,
/// }
///
/// let migrator = Migrator::builder(
///     |db: &mut Db| Ok(db.version),
///     |db: &mut Db, version| {
///         db.version = version;
///         Ok(())
///     },
/// )
/// .before_each(|db: &mut Db| {
///     db.log.push("BEGIN".to_string());
///     Ok(())
/// })
/// .after_each(|db: &mut Db| {
///     db.log.push("COMMIT".to_string());
///     Ok(())
/// })
/// .add_migration(Migration::noop(1))
/// .build()?;
///
/// let mut db = Db { version: 0, log: Vec::new() };
/// migrator.migrate_to(&mut db, 1)?;
/// assert_eq!(db.log, ["BEGIN", "COMMIT"]);
/// # Ok::<(), rung::errors::MigrationError>(())
/// ```
pub struct MigratorBuilder<D: ?Sized> {
    migrator: Migrator<D>,
}

impl<D: ?Sized> MigratorBuilder<D> {
    pub(crate) fn new(migrator: Migrator<D>) -> Self {
        MigratorBuilder { migrator }
    }

    /// Enables or disables sequence validation. Enabled by default.
    pub fn check_sequence(mut self, check_sequence: bool) -> Self {
        self.migrator.set_check_sequence(check_sequence);
        self
    }

    /// Hook fired once per run before any step, even when no step runs.
    pub fn before_all<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut D) -> MigrationResult<()> + Send + Sync + 'static,
    {
        self.migrator.set_before_all(f);
        self
    }

    /// Hook fired once per successful run after the last step.
    pub fn after_all<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut D) -> MigrationResult<()> + Send + Sync + 'static,
    {
        self.migrator.set_after_all(f);
        self
    }

    /// Hook fired before every executed step.
    ///
    /// Together with [`after_each`](MigratorBuilder::after_each) this is the place
    /// to open and commit a per-step transaction.
    pub fn before_each<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut D) -> MigrationResult<()> + Send + Sync + 'static,
    {
        self.migrator.set_before_each(f);
        self
    }

    /// Hook fired after every executed step, once its version is persisted.
    pub fn after_each<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut D) -> MigrationResult<()> + Send + Sync + 'static,
    {
        self.migrator.set_after_each(f);
        self
    }

    /// Installs an already wrapped hook, e.g. [`DbFn::noop`] as an explicit marker.
    pub fn hook(mut self, point: HookPoint, hook: DbFn<D>) -> Self {
        self.migrator.set_hook(point, hook);
        self
    }

    pub fn add_migration(mut self, migration: Migration<D>) -> Self {
        self.migrator.register_migration(migration);
        self
    }

    pub fn add_migrations<I>(mut self, migrations: I) -> Self
    where
        I: IntoIterator<Item = Migration<D>>,
    {
        self.migrator.register_migrations(migrations);
        self
    }

    /// Finishes configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::SequenceBreak`](crate::errors::ErrorKind::SequenceBreak)
    /// if sequence checking is on and the registered versions are not contiguous.
    pub fn build(self) -> MigrationResult<Migrator<D>> {
        if self.migrator.check_sequence() {
            self.migrator.migrations().validate_sequence()?;
        }
        log::debug!(
            "Built migrator with {} migration(s)",
            self.migrator.migrations().len()
        );
        Ok(self.migrator)
    }
}
