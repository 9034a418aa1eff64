use crate::migration::SchemaVersion;

/// Version reported by a version store for a database that has never been migrated.
pub const UNMIGRATED_VERSION: SchemaVersion = 0;

/// Lowest version a migration run may target.
pub const MIN_TARGET_VERSION: SchemaVersion = 1;

/// Default for [`Migrator::check_sequence`](crate::migrator::Migrator::check_sequence).
pub const DEFAULT_CHECK_SEQUENCE: bool = true;
