use crate::errors::MigrationResult;
use crate::migration::SchemaVersion;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Shared callable over the database handle `D`.
///
/// Used for migration steps and lifecycle hooks. Cloning is cheap; clones call the
/// same closure.
///
/// # Examples
///
/// ```rust
/// use rung::migration::DbFn;
///
/// let push = DbFn::new(|db: &mut Vec<String>| {
///     db.push("hello".to_string());
///     Ok(())
/// });
///
/// let mut db = Vec::new();
/// push.call(&mut db)?;
/// push.clone().call(&mut db)?;
/// assert_eq!(db, vec!["hello", "hello"]);
/// # Ok::<(), rung::errors::MigrationError>(())
/// ```
pub struct DbFn<D: ?Sized> {
    inner: Arc<dyn Fn(&mut D) -> MigrationResult<()> + Send + Sync>,
}

impl<D: ?Sized> DbFn<D> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut D) -> MigrationResult<()> + Send + Sync + 'static,
    {
        DbFn { inner: Arc::new(f) }
    }

    /// Runs the callable. Its error is returned as is.
    #[inline]
    pub fn call(&self, db: &mut D) -> MigrationResult<()> {
        (self.inner)(db)
    }
}

impl<D: ?Sized + 'static> DbFn<D> {
    /// A callable that does nothing.
    ///
    /// Installing it as a hook is observably the same as leaving the slot empty; it
    /// exists so a caller can mark a hook or step as intentionally empty.
    pub fn noop() -> Self {
        DbFn::new(|_db: &mut D| Ok(()))
    }
}

impl<D: ?Sized> Clone for DbFn<D> {
    fn clone(&self) -> Self {
        DbFn {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: ?Sized> Debug for DbFn<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "DbFn(<fn>)")
    }
}

type GetVersionFn<D> = dyn Fn(&mut D) -> MigrationResult<SchemaVersion> + Send + Sync;
type SetVersionFn<D> = dyn Fn(&mut D, SchemaVersion) -> MigrationResult<()> + Send + Sync;

/// The caller's pair of version functions.
///
/// `get` returns the persisted schema version, or
/// [`UNMIGRATED_VERSION`](crate::common::UNMIGRATED_VERSION) for a database that has
/// never been migrated, and must not change anything. `set` persists a version
/// atomically. Where the version lives (a table, `PRAGMA user_version`, a file) is
/// up to the caller.
pub struct VersionStore<D: ?Sized> {
    get: Arc<GetVersionFn<D>>,
    set: Arc<SetVersionFn<D>>,
}

impl<D: ?Sized> VersionStore<D> {
    pub fn new<G, S>(get: G, set: S) -> Self
    where
        G: Fn(&mut D) -> MigrationResult<SchemaVersion> + Send + Sync + 'static,
        S: Fn(&mut D, SchemaVersion) -> MigrationResult<()> + Send + Sync + 'static,
    {
        VersionStore {
            get: Arc::new(get),
            set: Arc::new(set),
        }
    }

    #[inline]
    pub fn get_version(&self, db: &mut D) -> MigrationResult<SchemaVersion> {
        (self.get)(db)
    }

    #[inline]
    pub fn set_version(&self, db: &mut D, version: SchemaVersion) -> MigrationResult<()> {
        (self.set)(db, version)
    }
}

impl<D: ?Sized> Clone for VersionStore<D> {
    fn clone(&self) -> Self {
        VersionStore {
            get: Arc::clone(&self.get),
            set: Arc::clone(&self.set),
        }
    }
}

impl<D: ?Sized> Debug for VersionStore<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionStore")
            .field("get", &"<fn>")
            .field("set", &"<fn>")
            .finish()
    }
}
