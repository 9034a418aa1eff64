use crate::errors::{ErrorKind, MigrationError, MigrationResult};
use crate::migration::{Migration, SchemaVersion};
use itertools::Itertools;
use std::fmt::{Debug, Formatter};

/// Append-only, ordered collection of migrations.
///
/// Migrations are kept in registration order, which is expected to be ascending by
/// version. Nothing is checked on [`register`](MigrationRegistry::register); the
/// registry may be temporarily broken between calls and is only checked by
/// [`validate_sequence`](MigrationRegistry::validate_sequence).
pub struct MigrationRegistry<D: ?Sized> {
    migrations: Vec<Migration<D>>,
}

impl<D: ?Sized> MigrationRegistry<D> {
    pub fn new() -> Self {
        MigrationRegistry {
            migrations: Vec::new(),
        }
    }

    /// Appends migrations in the order given.
    pub fn register<I>(&mut self, migrations: I)
    where
        I: IntoIterator<Item = Migration<D>>,
    {
        self.migrations.extend(migrations);
    }

    pub fn register_one(&mut self, migration: Migration<D>) {
        self.migrations.push(migration);
    }

    /// Checks that versions are contiguous and ascending by one.
    ///
    /// The first version is the baseline and may be anything. An empty registry is
    /// valid. The first pair `(last, current)` with `current != last + 1` is reported
    /// as [`ErrorKind::SequenceBreak`].
    pub fn validate_sequence(&self) -> MigrationResult<()> {
        let broken = self
            .migrations
            .iter()
            .map(Migration::schema_version)
            .tuple_windows()
            .find(|&(last, current)| last.checked_add(1) != Some(current));

        match broken {
            Some((last, current)) => {
                log::error!("Sequence break! Migration {} is followed by {}", last, current);
                Err(MigrationError::new(
                    &format!("Sequence break! Migration {} is followed by {}", last, current),
                    ErrorKind::SequenceBreak { last, current },
                ))
            }
            None => Ok(()),
        }
    }

    /// Version of the first registered migration.
    pub fn baseline(&self) -> Option<SchemaVersion> {
        self.migrations.first().map(Migration::schema_version)
    }

    /// Version of the last registered migration.
    pub fn latest_version(&self) -> Option<SchemaVersion> {
        self.migrations.last().map(Migration::schema_version)
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    /// Iterates in registration order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Migration<D>> + '_ {
        self.migrations.iter()
    }

    /// Iterates in reverse registration order.
    pub fn iter_rev(&self) -> impl Iterator<Item = &Migration<D>> + '_ {
        self.migrations.iter().rev()
    }
}

impl<D: ?Sized> Default for MigrationRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: ?Sized> Clone for MigrationRegistry<D> {
    fn clone(&self) -> Self {
        MigrationRegistry {
            migrations: self.migrations.clone(),
        }
    }
}

impl<D: ?Sized> Debug for MigrationRegistry<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.migrations.iter().map(Migration::schema_version))
            .finish()
    }
}
