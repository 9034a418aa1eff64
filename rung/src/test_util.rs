use crate::errors::{ErrorKind, MigrationError, MigrationResult};
use crate::migration::{Migration, SchemaVersion};
use crate::migrator::Migrator;

/// In-memory database handle that records everything done to it.
#[derive(Debug, Default)]
pub(crate) struct TestDb {
    pub version: SchemaVersion,
    pub events: Vec<String>,
}

impl TestDb {
    pub fn at(version: SchemaVersion) -> Self {
        TestDb {
            version,
            events: Vec::new(),
        }
    }

    pub fn events(&self) -> Vec<&str> {
        self.events.iter().map(String::as_str).collect()
    }

    /// Only the `up(n)`/`down(n)` entries.
    pub fn steps(&self) -> Vec<&str> {
        self.events()
            .into_iter()
            .filter(|e| e.starts_with("up(") || e.starts_with("down("))
            .collect()
    }
}

pub(crate) fn step(version: SchemaVersion) -> Migration<TestDb> {
    Migration::new(
        version,
        move |db: &mut TestDb| {
            db.events.push(format!("up({})", version));
            Ok(())
        },
        move |db: &mut TestDb| {
            db.events.push(format!("down({})", version));
            Ok(())
        },
    )
}

/// A step whose `up` and `down` both fail.
pub(crate) fn failing_step(version: SchemaVersion) -> Migration<TestDb> {
    Migration::new(
        version,
        move |db: &mut TestDb| {
            db.events.push(format!("up({})", version));
            Err(MigrationError::new(
                &format!("up({}) failed", version),
                ErrorKind::CallbackError,
            ))
        },
        move |db: &mut TestDb| {
            db.events.push(format!("down({})", version));
            Err(MigrationError::new(
                &format!("down({}) failed", version),
                ErrorKind::CallbackError,
            ))
        },
    )
}

pub(crate) fn ladder(versions: &[SchemaVersion]) -> Vec<Migration<TestDb>> {
    versions.iter().map(|&v| step(v)).collect()
}

pub(crate) fn get_version(db: &mut TestDb) -> MigrationResult<SchemaVersion> {
    Ok(db.version)
}

pub(crate) fn set_version(db: &mut TestDb, version: SchemaVersion) -> MigrationResult<()> {
    db.events.push(format!("set({})", version));
    db.version = version;
    Ok(())
}

/// A migrator over [`TestDb`] with every hook recording its name.
pub(crate) fn recording_migrator(versions: &[SchemaVersion]) -> Migrator<TestDb> {
    let mut migrator = Migrator::new(get_version, set_version);
    migrator.register_migrations(ladder(versions));
    migrator.set_before_all(|db: &mut TestDb| {
        db.events.push("before_all".to_string());
        Ok(())
    });
    migrator.set_after_all(|db: &mut TestDb| {
        db.events.push("after_all".to_string());
        Ok(())
    });
    migrator.set_before_each(|db: &mut TestDb| {
        db.events.push("before_each".to_string());
        Ok(())
    });
    migrator.set_after_each(|db: &mut TestDb| {
        db.events.push("after_each".to_string());
        Ok(())
    });
    migrator
}
