use crate::errors::MigrationResult;
use crate::migration::DbFn;
use std::fmt::{Debug, Display, Formatter};

/// The four points of a migration run where a hook may fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    /// Once per run, after the current version was read and before any step.
    BeforeAll,
    /// Once per run, after the last step. Skipped when the run fails.
    AfterAll,
    /// Before every executed step.
    BeforeEach,
    /// After every executed step, once its version has been persisted.
    AfterEach,
}

impl HookPoint {
    pub const ALL: [HookPoint; 4] = [
        HookPoint::BeforeAll,
        HookPoint::AfterAll,
        HookPoint::BeforeEach,
        HookPoint::AfterEach,
    ];
}

impl Display for HookPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HookPoint::BeforeAll => write!(f, "before-all"),
            HookPoint::AfterAll => write!(f, "after-all"),
            HookPoint::BeforeEach => write!(f, "before-each"),
            HookPoint::AfterEach => write!(f, "after-each"),
        }
    }
}

/// Optional lifecycle hooks of a migrator.
///
/// Each slot is either empty or holds a [`DbFn`]. Firing an empty slot calls
/// nothing.
///
/// # Examples
///
/// ```rust
/// use rung::migration::{DbFn, HookPoint, Hooks};
///
/// let mut hooks = Hooks::new();
/// hooks.set(
///     HookPoint::BeforeEach,
///     DbFn::new(|db: &mut Vec<String>| {
///         db.push("BEGIN".to_string());
///         Ok(())
///     }),
/// );
///
/// let mut db = Vec::new();
/// hooks.fire(HookPoint::BeforeEach, &mut db)?;
/// hooks.fire(HookPoint::AfterEach, &mut db)?;
/// assert_eq!(db, vec!["BEGIN"]);
/// # Ok::<(), rung::errors::MigrationError>(())
/// ```
pub struct Hooks<D: ?Sized> {
    before_all: Option<DbFn<D>>,
    after_all: Option<DbFn<D>>,
    before_each: Option<DbFn<D>>,
    after_each: Option<DbFn<D>>,
}

impl<D: ?Sized> Hooks<D> {
    pub fn new() -> Self {
        Hooks {
            before_all: None,
            after_all: None,
            before_each: None,
            after_each: None,
        }
    }

    /// Installs `hook` at `point`, replacing any hook already there.
    pub fn set(&mut self, point: HookPoint, hook: DbFn<D>) {
        *self.slot_mut(point) = Some(hook);
    }

    /// Empties the slot at `point`.
    pub fn clear(&mut self, point: HookPoint) -> Option<DbFn<D>> {
        self.slot_mut(point).take()
    }

    pub fn get(&self, point: HookPoint) -> Option<&DbFn<D>> {
        self.slot(point).as_ref()
    }

    pub fn is_set(&self, point: HookPoint) -> bool {
        self.slot(point).is_some()
    }

    /// Calls the hook at `point` if there is one.
    pub fn fire(&self, point: HookPoint, db: &mut D) -> MigrationResult<()> {
        match self.slot(point) {
            Some(hook) => {
                log::debug!("Firing {} hook", point);
                hook.call(db).inspect_err(|e| {
                    log::error!("The {} hook failed: {}", point, e);
                })
            }
            None => Ok(()),
        }
    }

    fn slot(&self, point: HookPoint) -> &Option<DbFn<D>> {
        match point {
            HookPoint::BeforeAll => &self.before_all,
            HookPoint::AfterAll => &self.after_all,
            HookPoint::BeforeEach => &self.before_each,
            HookPoint::AfterEach => &self.after_each,
        }
    }

    fn slot_mut(&mut self, point: HookPoint) -> &mut Option<DbFn<D>> {
        match point {
            HookPoint::BeforeAll => &mut self.before_all,
            HookPoint::AfterAll => &mut self.after_all,
            HookPoint::BeforeEach => &mut self.before_each,
            HookPoint::AfterEach => &mut self.after_each,
        }
    }
}

impl<D: ?Sized> Default for Hooks<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: ?Sized> Clone for Hooks<D> {
    fn clone(&self) -> Self {
        Hooks {
            before_all: self.before_all.clone(),
            after_all: self.after_all.clone(),
            before_each: self.before_each.clone(),
            after_each: self.after_each.clone(),
        }
    }
}

impl<D: ?Sized> Debug for Hooks<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("before_all", &self.before_all.is_some())
            .field("after_all", &self.after_all.is_some())
            .field("before_each", &self.before_each.is_some())
            .field("after_each", &self.after_each.is_some())
            .finish()
    }
}
