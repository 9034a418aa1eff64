//! # Rung - Schema Migration Driver
//!
//! Rung moves a relational database between integer-numbered schema versions by
//! running an ordered ladder of caller-supplied migration steps. It is meant to run
//! at application startup, or from an administrative command, to bring the persisted
//! schema version in line with the version the application expects.
//!
//! ## Key Features
//!
//! - **Database agnostic**: the database handle is an opaque type parameter handed
//!   to every callable unchanged
//! - **Caller-owned version**: reading and writing the current version is done by two
//!   caller functions (a table, `PRAGMA user_version`, a file...)
//! - **Both directions**: upgrade by running `up` steps, downgrade by running `down`
//!   steps in reverse
//! - **Sequence integrity**: registered versions must form a contiguous ladder, from
//!   any baseline
//! - **Lifecycle hooks**: optional before/after hooks around the whole run and around
//!   every step, e.g. for transactions
//!
//! ## Quick Start
//!
//! ```rust
//! use rung::errors::MigrationResult;
//! use rung::migration::Migration;
//! use rung::Migrator;
//!
//! #[derive(Default)]
//! struct Db {
//!     version: i64,
//!     columns: Vec<&'static str>,
//! }
//!
//! fn add_column(name: &'static str) -> impl Fn(&mut Db) -> MigrationResult<()> {
//!     move |db: &mut Db| {
//!         db.columns.push(name);
//!         Ok(())
//!     }
//! }
//!
//! fn drop_column(name: &'static str) -> impl Fn(&mut Db) -> MigrationResult<()> {
//!     move |db: &mut Db| {
//!         db.columns.retain(|c| *c != name);
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> MigrationResult<()> {
//! let migrator = Migrator::builder(
//!     |db: &mut Db| Ok(db.version),
//!     |db: &mut Db, version| {
//!         db.version = version;
//!         Ok(())
//!     },
//! )
//! .add_migration(Migration::new(1, add_column("id"), drop_column("id")))
//! .add_migration(Migration::new(2, add_column("birthday"), drop_column("birthday")))
//! .add_migration(Migration::new(3, add_column("pet"), drop_column("pet")))
//! .build()?;
//!
//! let mut db = Db::default();
//! migrator.migrate_to_latest(&mut db)?;
//! assert_eq!(db.version, 3);
//! assert_eq!(db.columns, ["id", "birthday", "pet"]);
//!
//! migrator.migrate_to(&mut db, 2)?;
//! assert_eq!(db.columns, ["id"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`common`] - Shared constants and helpers
//! - [`errors`] - Error types and result definitions
//! - [`migration`] - Migration descriptors, registry, version store and hooks
//! - [`migrator`] - The migration planner and executor
//! - [`migrator_builder`] - Fluent migrator configuration

pub mod common;
pub mod errors;
pub mod migration;
pub mod migrator;
pub mod migrator_builder;

#[cfg(test)]
pub(crate) mod test_util;

pub use migrator::Migrator;
pub use migrator_builder::MigratorBuilder;
