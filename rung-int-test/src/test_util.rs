use anyhow::Context;
use rung::errors::{ErrorKind, MigrationError, MigrationResult};
use rung::migration::{Migration, SchemaVersion};
use rung::Migrator;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::{env, fs};

/// A file-backed SQLite database living for the duration of one test.
pub struct TestContext {
    path: PathBuf,
    conn: Connection,
}

impl TestContext {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn conn(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Drops the current connection and opens the same file again.
    pub fn reopen(&mut self) -> MigrationResult<()> {
        self.conn = open(&self.path)?;
        Ok(())
    }
}

/// Runs `test` against a fresh database and removes the file afterwards, whether
/// the test succeeded or not.
pub fn run_test<T>(test: T)
where
    T: FnOnce(&mut TestContext) -> MigrationResult<()>,
{
    let mut ctx = match create_test_context() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let result = test(&mut ctx);
    let cleaned = cleanup(ctx);

    if let Err(e) = result {
        panic!("Test failed: {:?}", e);
    }
    if let Err(e) = cleaned {
        panic!("After run failed: {:?}", e);
    }
}

pub fn random_path() -> PathBuf {
    let id = uuid::Uuid::new_v4();
    env::temp_dir().join(format!("rung-{}.db", id))
}

pub fn create_test_context() -> MigrationResult<TestContext> {
    let path = random_path();
    let conn = open(&path)?;
    log::debug!("Created test database at {}", path.display());
    Ok(TestContext { path, conn })
}

pub fn cleanup(ctx: TestContext) -> MigrationResult<()> {
    let TestContext { path, conn } = ctx;
    conn.close()
        .map_err(|(_, e)| e)
        .context("closing test database")?;
    if path.exists() {
        fs::remove_file(&path)?;
    }
    Ok(())
}

pub fn open(path: &Path) -> MigrationResult<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    Ok(conn)
}

// ==================== Version Store ====================

pub fn get_version(conn: &mut Connection) -> MigrationResult<SchemaVersion> {
    let version = conn
        .query_row("PRAGMA user_version", [], |row| row.get::<_, i64>(0))
        .context("reading user_version")?;
    Ok(version)
}

pub fn set_version(conn: &mut Connection, version: SchemaVersion) -> MigrationResult<()> {
    conn.execute_batch(&format!("PRAGMA user_version = {}", version))
        .with_context(|| format!("writing user_version {}", version))?;
    Ok(())
}

// ==================== Customer Schema ====================

fn exec(
    sql: &'static str,
    version: SchemaVersion,
) -> impl Fn(&mut Connection) -> MigrationResult<()> + Send + Sync + 'static {
    move |conn: &mut Connection| {
        conn.execute_batch(sql)
            .with_context(|| format!("applying version {}", version))?;
        Ok(())
    }
}

/// Four versions of a `Customer` table: create it, add `Birthday`, add `Pet`,
/// then an empty release.
pub fn customer_migrations() -> Vec<Migration<Connection>> {
    vec![
        Migration::new(
            1,
            exec(
                "CREATE TABLE Customer(
                    Id INTEGER NOT NULL PRIMARY KEY,
                    Firstname TEXT,
                    Lastname TEXT
                )",
                1,
            ),
            exec("DROP TABLE Customer", 1),
        ),
        Migration::new(
            2,
            exec("ALTER TABLE Customer ADD COLUMN Birthday TEXT", 2),
            exec("ALTER TABLE Customer DROP COLUMN Birthday", 2),
        ),
        Migration::new(
            3,
            exec("ALTER TABLE Customer ADD COLUMN Pet TEXT", 3),
            exec("ALTER TABLE Customer DROP COLUMN Pet", 3),
        ),
        Migration::noop(4),
    ]
}

pub fn customer_migrator() -> MigrationResult<Migrator<Connection>> {
    Migrator::builder(get_version, set_version)
        .add_migrations(customer_migrations())
        .build()
}

/// Like [`customer_migrator`], with every step wrapped in its own transaction.
pub fn transactional_customer_migrator() -> MigrationResult<Migrator<Connection>> {
    Migrator::builder(get_version, set_version)
        .before_each(begin)
        .after_each(commit)
        .add_migrations(customer_migrations())
        .build()
}

pub fn begin(conn: &mut Connection) -> MigrationResult<()> {
    conn.execute_batch("BEGIN").context("starting step transaction")?;
    Ok(())
}

pub fn commit(conn: &mut Connection) -> MigrationResult<()> {
    conn.execute_batch("COMMIT").context("committing step transaction")?;
    Ok(())
}

pub fn rollback(conn: &mut Connection) -> MigrationResult<()> {
    conn.execute_batch("ROLLBACK").context("rolling back step transaction")?;
    Ok(())
}

// ==================== Schema Inspection ====================

pub fn table_exists(conn: &Connection, table: &str) -> MigrationResult<bool> {
    let count = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get::<_, i64>(0),
        )
        .with_context(|| format!("looking up table {}", table))?;
    Ok(count > 0)
}

pub fn column_names(conn: &Connection, table: &str) -> MigrationResult<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info(?1)")
        .context("preparing table_info query")?;
    let names = stmt
        .query_map([table], |row| row.get::<_, String>(0))
        .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
        .with_context(|| format!("listing columns of {}", table))?;
    Ok(names)
}

/// A migration whose `up` is invalid SQL.
pub fn broken_migration(version: SchemaVersion) -> Migration<Connection> {
    Migration::new(
        version,
        exec("ALTER TABLE Nope ADD COLUMN Anything TEXT", version),
        exec("DROP TABLE Nope", version),
    )
}

pub fn callback_error(message: &str) -> MigrationError {
    MigrationError::new(message, ErrorKind::CallbackError)
}
