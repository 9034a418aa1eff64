use crate::common::{DEFAULT_CHECK_SEQUENCE, MIN_TARGET_VERSION};
use crate::errors::{ErrorKind, MigrationError, MigrationResult};
use crate::migration::{
    DbFn, HookPoint, Hooks, Migration, MigrationRegistry, SchemaVersion, VersionStore,
};
use crate::migrator_builder::MigratorBuilder;
use std::fmt::{Debug, Display, Formatter};

/// Direction of a migration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Up,
    Down,
}

impl Direction {
    /// `None` when the database is already at `target`.
    pub(crate) fn between(current: SchemaVersion, target: SchemaVersion) -> Option<Direction> {
        if target > current {
            Some(Direction::Up)
        } else if target < current {
            Some(Direction::Down)
        } else {
            None
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Moves a database between schema versions by running registered migrations.
///
/// A `Migrator` owns its migrations, the caller's [`VersionStore`] and up to four
/// lifecycle [`Hooks`]. The database handle `D` is never looked at; it is handed to
/// every callable unchanged. A migrator can be reused for any number of runs, one at
/// a time.
///
/// # Examples
///
/// ```rust
/// use rung::migration::Migration;
/// use rung::Migrator;
///
/// #[derive(Default)]
/// struct Db {
///     version: i64,
///     tables: Vec<String>,
/// }
///
/// let mut migrator = Migrator::new(
///     |db: &mut Db| Ok(db.version),
///     |db: &mut Db, version| {
///         db.version = version;
///         Ok(())
///     },
/// );
/// migrator.register_migrations([
///     Migration::new(
///         1,
///         |db: &mut Db| {
///             db.tables.push("customer".to_string());
///             Ok(())
///         },
///         |db: &mut Db| {
///             db.tables.clear();
///             Ok(())
///         },
///     ),
///     Migration::noop(2),
/// ]);
///
/// let mut db = Db::default();
/// migrator.migrate_to_latest(&mut db)?;
/// assert_eq!(db.version, 2);
/// assert_eq!(db.tables, ["customer"]);
/// # Ok::<(), rung::errors::MigrationError>(())
/// ```
pub struct Migrator<D: ?Sized> {
    registry: MigrationRegistry<D>,
    version_store: VersionStore<D>,
    hooks: Hooks<D>,
    check_sequence: bool,
}

impl<D: ?Sized> Migrator<D> {
    /// Creates a migrator with an empty registry, no hooks and sequence checking on.
    ///
    /// `get_version` must return the persisted version (0 for a fresh database)
    /// without changing anything; `set_version` must persist the given version.
    pub fn new<G, S>(get_version: G, set_version: S) -> Self
    where
        G: Fn(&mut D) -> MigrationResult<SchemaVersion> + Send + Sync + 'static,
        S: Fn(&mut D, SchemaVersion) -> MigrationResult<()> + Send + Sync + 'static,
    {
        Self::with_version_store(VersionStore::new(get_version, set_version))
    }

    pub fn with_version_store(version_store: VersionStore<D>) -> Self {
        Migrator {
            registry: MigrationRegistry::new(),
            version_store,
            hooks: Hooks::new(),
            check_sequence: DEFAULT_CHECK_SEQUENCE,
        }
    }

    /// Starts a [`MigratorBuilder`] for fluent configuration.
    pub fn builder<G, S>(get_version: G, set_version: S) -> MigratorBuilder<D>
    where
        G: Fn(&mut D) -> MigrationResult<SchemaVersion> + Send + Sync + 'static,
        S: Fn(&mut D, SchemaVersion) -> MigrationResult<()> + Send + Sync + 'static,
    {
        MigratorBuilder::new(Self::new(get_version, set_version))
    }

    /// Appends migrations in the order given. Nothing is validated here.
    pub fn register_migrations<I>(&mut self, migrations: I)
    where
        I: IntoIterator<Item = Migration<D>>,
    {
        self.registry.register(migrations);
    }

    pub fn register_migration(&mut self, migration: Migration<D>) {
        self.registry.register_one(migration);
    }

    pub fn migrations(&self) -> &MigrationRegistry<D> {
        &self.registry
    }

    /// Version of the last registered migration.
    pub fn latest_version(&self) -> Option<SchemaVersion> {
        self.registry.latest_version()
    }

    /// Whether each run first validates the registry. On by default.
    pub fn check_sequence(&self) -> bool {
        self.check_sequence
    }

    pub fn set_check_sequence(&mut self, check_sequence: bool) {
        self.check_sequence = check_sequence;
    }

    pub fn hooks(&self) -> &Hooks<D> {
        &self.hooks
    }

    pub fn set_hook(&mut self, point: HookPoint, hook: DbFn<D>) {
        self.hooks.set(point, hook);
    }

    pub fn clear_hook(&mut self, point: HookPoint) -> Option<DbFn<D>> {
        self.hooks.clear(point)
    }

    pub fn set_before_all<F>(&mut self, f: F)
    where
        F: Fn(&mut D) -> MigrationResult<()> + Send + Sync + 'static,
    {
        self.hooks.set(HookPoint::BeforeAll, DbFn::new(f));
    }

    pub fn set_after_all<F>(&mut self, f: F)
    where
        F: Fn(&mut D) -> MigrationResult<()> + Send + Sync + 'static,
    {
        self.hooks.set(HookPoint::AfterAll, DbFn::new(f));
    }

    pub fn set_before_each<F>(&mut self, f: F)
    where
        F: Fn(&mut D) -> MigrationResult<()> + Send + Sync + 'static,
    {
        self.hooks.set(HookPoint::BeforeEach, DbFn::new(f));
    }

    pub fn set_after_each<F>(&mut self, f: F)
    where
        F: Fn(&mut D) -> MigrationResult<()> + Send + Sync + 'static,
    {
        self.hooks.set(HookPoint::AfterEach, DbFn::new(f));
    }

    /// Brings the schema of `db` to `target`.
    ///
    /// The run goes through these stages, stopping at the first error, which is
    /// returned unchanged:
    ///
    /// 1. `target` below 1 fails with [`ErrorKind::InvalidTarget`].
    /// 2. With sequence checking on, a broken registry fails with
    ///    [`ErrorKind::SequenceBreak`].
    /// 3. The current version is read once through the version store.
    /// 4. The before-all hook fires, even if no step will run.
    /// 5. Steps run in one direction:
    ///    * up, for `current < v <= target`, in registration order;
    ///    * down, for `target <= v <= current`, in reverse registration order;
    ///    * none when `current == target`.
    ///
    ///    Each step is `before-each`, `up`/`down`, `set_version(v)`, `after-each`.
    /// 6. The after-all hook fires.
    ///
    /// Nothing before stage 4 fires any hook, and after-all never fires for a failed
    /// run. No rollback is attempted: the persisted version is the one recorded by
    /// the last step that succeeded.
    ///
    /// Going down, the step at `target` itself is reversed, and each reversed step
    /// records its own version. A run from 3 down to 1 therefore calls `down` for 3,
    /// 2 and 1 and leaves the persisted version at 1, even though the schema is then
    /// in its pre-1 state. Callers that want to end in the state of version N should
    /// target N + 1.
    pub fn migrate_to(&self, db: &mut D, target: SchemaVersion) -> MigrationResult<()> {
        if target < MIN_TARGET_VERSION {
            log::error!("SchemaVersion must be >= {}, got {}", MIN_TARGET_VERSION, target);
            return Err(MigrationError::new(
                &format!("SchemaVersion must be >= {}, got {}", MIN_TARGET_VERSION, target),
                ErrorKind::InvalidTarget,
            ));
        }

        if self.check_sequence {
            self.registry.validate_sequence()?;
        }

        let current = self.version_store.get_version(db).inspect_err(|e| {
            log::error!("Failed to read the current schema version: {}", e);
        })?;

        self.hooks.fire(HookPoint::BeforeAll, db)?;

        match Direction::between(current, target) {
            Some(direction) => {
                log::info!(
                    "Migrating {} from schema version {} to {}",
                    direction,
                    current,
                    target
                );
                let path = self.find_migration_path(direction, current, target);
                self.execute_migration_path(db, direction, &path)?;
            }
            None => log::info!("Schema is already at version {}", current),
        }

        self.hooks.fire(HookPoint::AfterAll, db)?;
        Ok(())
    }

    /// [`migrate_to`](Migrator::migrate_to) the version of the last registered
    /// migration. Fails with [`ErrorKind::EmptyRegistry`] when there is none.
    pub fn migrate_to_latest(&self, db: &mut D) -> MigrationResult<()> {
        match self.registry.latest_version() {
            Some(latest) => self.migrate_to(db, latest),
            None => {
                log::error!("Cannot migrate to latest version, no migrations are registered");
                Err(MigrationError::new(
                    "Cannot migrate to latest version, no migrations are registered",
                    ErrorKind::EmptyRegistry,
                ))
            }
        }
    }

    /// Selects the steps to run, in execution order.
    fn find_migration_path(
        &self,
        direction: Direction,
        current: SchemaVersion,
        target: SchemaVersion,
    ) -> Vec<&Migration<D>> {
        match direction {
            Direction::Up => self
                .registry
                .iter()
                .skip_while(|m| m.schema_version() <= current)
                .take_while(|m| m.schema_version() <= target)
                .collect(),
            Direction::Down => self
                .registry
                .iter_rev()
                .skip_while(|m| m.schema_version() > current)
                .take_while(|m| m.schema_version() >= target)
                .collect(),
        }
    }

    fn execute_migration_path(
        &self,
        db: &mut D,
        direction: Direction,
        path: &[&Migration<D>],
    ) -> MigrationResult<()> {
        for migration in path {
            self.execute_step(db, direction, migration)?;
        }
        log::info!("Executed {} migration step(s) {}", path.len(), direction);
        Ok(())
    }

    fn execute_step(
        &self,
        db: &mut D,
        direction: Direction,
        migration: &Migration<D>,
    ) -> MigrationResult<()> {
        let version = migration.schema_version();

        self.hooks.fire(HookPoint::BeforeEach, db)?;

        log::debug!("Running {} step of schema version {}", direction, version);
        let result = match direction {
            Direction::Up => migration.up(db),
            Direction::Down => migration.down(db),
        };
        result.inspect_err(|e| {
            log::error!(
                "The {} step of schema version {} failed: {}",
                direction,
                version,
                e
            );
        })?;

        self.version_store
            .set_version(db, version)
            .inspect_err(|e| {
                log::error!("Failed to record schema version {}: {}", version, e);
            })?;

        self.hooks.fire(HookPoint::AfterEach, db)
    }
}

impl<D: ?Sized> Clone for Migrator<D> {
    fn clone(&self) -> Self {
        Migrator {
            registry: self.registry.clone(),
            version_store: self.version_store.clone(),
            hooks: self.hooks.clone(),
            check_sequence: self.check_sequence,
        }
    }
}

impl<D: ?Sized> Debug for Migrator<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migrator")
            .field("migrations", &self.registry)
            .field("hooks", &self.hooks)
            .field("check_sequence", &self.check_sequence)
            .finish()
    }
}
