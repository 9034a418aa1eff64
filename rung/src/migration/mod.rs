//! Migration descriptors, the registry that holds them, and lifecycle hooks.
//!
//! A migration is a [`Migration`]: a schema version plus two opaque callables, `up`
//! and `down`, over the caller's database handle. The [`Migrator`](crate::Migrator)
//! owns a [`MigrationRegistry`] of them and a [`Hooks`] table, and reads and writes
//! the persisted version through a [`VersionStore`].
//!
//! # A migration ladder
//!
//! ```rust
//! use rung::migration::{Migration, MigrationRegistry};
//!
//! #[derive(Default)]
//! struct Db {
//!     tables: Vec<&'static str>,
//! }
//!
//! let mut registry = MigrationRegistry::new();
//! registry.register([
//!     Migration::new(
//!         1,
//!         |db: &mut Db| {
//!             db.tables.push("customer");
//!             Ok(())
//!         },
//!         |db: &mut Db| {
//!             db.tables.retain(|t| *t != "customer");
//!             Ok(())
//!         },
//!     ),
//!     Migration::noop(2),
//! ]);
//!
//! assert!(registry.validate_sequence().is_ok());
//! assert_eq!(registry.latest_version(), Some(2));
//! ```
//!
//! # Sequence integrity
//!
//! Registered versions must be contiguous and ascending by one. The first version is
//! the baseline and may be any positive number, so a ladder can start at 7 for a
//! database that was migrated by other means up to version 6.

mod callable;
mod hooks;
mod migration;
mod registry;

pub use callable::*;
pub use hooks::*;
pub use migration::*;
pub use registry::*;

/// Integer identifier of a discrete schema state.
///
/// Signed so that callers can pass any integer as a target and get
/// [`ErrorKind::InvalidTarget`](crate::errors::ErrorKind::InvalidTarget) back for
/// values below 1. A version store reports
/// [`UNMIGRATED_VERSION`](crate::common::UNMIGRATED_VERSION) for a fresh database.
pub type SchemaVersion = i64;
