use crate::errors::MigrationResult;
use crate::migration::{DbFn, SchemaVersion};
use std::fmt::{Debug, Formatter};

/// A single rung of the migration ladder.
///
/// `schema_version` names the state the database is in after `up` has run. `down`
/// reverses `up`. The two are not checked for being inverses of each other.
///
/// A migration has no identity beyond its version; registering two migrations with
/// the same version breaks the sequence and is reported by
/// [`MigrationRegistry::validate_sequence`](crate::migration::MigrationRegistry::validate_sequence).
///
/// # Examples
///
/// ```rust
/// use rung::migration::Migration;
///
/// let add_pet = Migration::new(
///     3,
///     |columns: &mut Vec<String>| {
///         columns.push("pet".to_string());
///         Ok(())
///     },
///     |columns: &mut Vec<String>| {
///         columns.retain(|c| c != "pet");
///         Ok(())
///     },
/// );
///
/// let mut columns = vec!["id".to_string()];
/// add_pet.up(&mut columns)?;
/// assert_eq!(columns, ["id", "pet"]);
/// add_pet.down(&mut columns)?;
/// assert_eq!(columns, ["id"]);
/// # Ok::<(), rung::errors::MigrationError>(())
/// ```
pub struct Migration<D: ?Sized> {
    schema_version: SchemaVersion,
    up: DbFn<D>,
    down: DbFn<D>,
}

impl<D: ?Sized> Migration<D> {
    /// Creates a migration from two closures.
    pub fn new<U, W>(schema_version: SchemaVersion, up: U, down: W) -> Self
    where
        U: Fn(&mut D) -> MigrationResult<()> + Send + Sync + 'static,
        W: Fn(&mut D) -> MigrationResult<()> + Send + Sync + 'static,
    {
        Migration {
            schema_version,
            up: DbFn::new(up),
            down: DbFn::new(down),
        }
    }

    /// Creates a migration from already wrapped callables, e.g. shared between
    /// several migrations or built with [`DbFn::noop`].
    pub fn from_fns(schema_version: SchemaVersion, up: DbFn<D>, down: DbFn<D>) -> Self {
        Migration {
            schema_version,
            up,
            down,
        }
    }

    pub fn schema_version(&self) -> SchemaVersion {
        self.schema_version
    }

    /// Applies this step to `db`.
    pub fn up(&self, db: &mut D) -> MigrationResult<()> {
        self.up.call(db)
    }

    /// Reverses this step on `db`.
    pub fn down(&self, db: &mut D) -> MigrationResult<()> {
        self.down.call(db)
    }
}

impl<D: ?Sized + 'static> Migration<D> {
    /// A version bump with nothing to do in either direction.
    ///
    /// Useful for marking a release whose schema is unchanged.
    pub fn noop(schema_version: SchemaVersion) -> Self {
        Migration::from_fns(schema_version, DbFn::noop(), DbFn::noop())
    }
}

impl<D: ?Sized> Clone for Migration<D> {
    fn clone(&self) -> Self {
        Migration {
            schema_version: self.schema_version,
            up: self.up.clone(),
            down: self.down.clone(),
        }
    }
}

impl<D: ?Sized> Debug for Migration<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migration")
            .field("schema_version", &self.schema_version)
            .field("up", &"<fn>")
            .field("down", &"<fn>")
            .finish()
    }
}
