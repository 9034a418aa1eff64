use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic, WriteExecutor};
use crate::migration::SchemaVersion;

/// Error kinds for migration operations
///
/// The first three kinds are raised by the migrator itself. Failures coming out of
/// caller-supplied callables are returned to the caller untouched, with whatever kind
/// the callable gave them (usually [`ErrorKind::CallbackError`]).
///
/// # Examples
///
/// ```rust
/// use rung::errors::{ErrorKind, MigrationError, MigrationResult};
///
/// fn create_table() -> MigrationResult<()> {
///     Err(MigrationError::new("table already exists", ErrorKind::CallbackError))
/// }
///
/// assert_eq!(create_table().unwrap_err().kind(), &ErrorKind::CallbackError);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// The requested target version is below 1
    InvalidTarget,
    /// Registered versions are not contiguous; `current` does not follow `last`
    SequenceBreak {
        last: SchemaVersion,
        current: SchemaVersion,
    },
    /// `migrate_to_latest` was called without any registered migration
    EmptyRegistry,

    /// Failure raised inside a caller-supplied step, hook or version function
    CallbackError,

    /// Generic IO error
    IOError,
    /// Caller-defined category (e.g., "sqlite", "lock")
    Extension(String),
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidTarget => write!(f, "Invalid target version"),
            ErrorKind::SequenceBreak { last, current } => {
                write!(f, "Sequence break between {} and {}", last, current)
            }
            ErrorKind::EmptyRegistry => write!(f, "Empty migration registry"),
            ErrorKind::CallbackError => write!(f, "Callback error"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::Extension(name) => write!(f, "{} error", name),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Error type for every fallible migration operation.
///
/// `MigrationError` carries a message, a kind and an optional cause. A backtrace is
/// captured unresolved at construction and symbolized only when the error is printed
/// with `{:?}`.
///
/// # Examples
///
/// ```rust
/// use rung::errors::{ErrorKind, MigrationError};
///
/// let cause = MigrationError::new("disk I/O error", ErrorKind::IOError);
/// let err = MigrationError::new_with_cause("could not add column", ErrorKind::CallbackError, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct MigrationError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<MigrationError>>,
    backtrace: Atomic<Backtrace>,
}

impl MigrationError {
    /// Creates a new `MigrationError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        MigrationError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new_unresolved()),
        }
    }

    /// Creates a new `MigrationError` wrapping `cause`.
    ///
    /// The cause stays reachable through [`MigrationError::cause`] and
    /// [`Error::source`].
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: MigrationError) -> Self {
        MigrationError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new_unresolved()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&MigrationError> {
        self.cause.as_deref()
    }
}

impl Display for MigrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for MigrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => {
                let trace = self.backtrace.write_with(|bt| {
                    bt.resolve();
                    format!("{:?}", bt)
                });
                write!(f, "{}\n{}", self.message, trace)
            }
        }
    }
}

impl Error for MigrationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// Shorthand for `Result<T, MigrationError>`, returned by every fallible operation
/// and expected from every caller-supplied callable.
pub type MigrationResult<T> = Result<T, MigrationError>;

impl From<std::io::Error> for MigrationError {
    fn from(err: std::io::Error) -> Self {
        MigrationError::new(&format!("IO error: {}", err), ErrorKind::IOError)
    }
}

impl From<std::fmt::Error> for MigrationError {
    fn from(err: std::fmt::Error) -> Self {
        MigrationError::new(
            &format!("Formatting error: {}", err),
            ErrorKind::InternalError,
        )
    }
}

impl From<std::num::ParseIntError> for MigrationError {
    fn from(err: std::num::ParseIntError) -> Self {
        MigrationError::new(
            &format!("Integer parsing error: {}", err),
            ErrorKind::CallbackError,
        )
    }
}

// Lets callables use `?` on any error type through anyhow.
impl From<anyhow::Error> for MigrationError {
    fn from(err: anyhow::Error) -> Self {
        MigrationError::new(&format!("{:#}", err), ErrorKind::CallbackError)
    }
}

impl From<String> for MigrationError {
    fn from(msg: String) -> Self {
        MigrationError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for MigrationError {
    fn from(msg: &str) -> Self {
        MigrationError::new(msg, ErrorKind::InternalError)
    }
}
