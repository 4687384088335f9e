//! Caller-facing error taxonomy for the user store.
//!
//! # Responsibility
//! - Normalize SQLite failures into named, matchable error values.
//! - Give outer layers a flat `StoreErrorKind` to map onto response codes.
//!
//! # Invariants
//! - Constraint violations are classified from structured SQLite result
//!   codes, never from message text.
//! - Every error is surfaced as-is; nothing here retries.

use crate::db::DbError;
use crate::model::user::UserId;
use rusqlite::ffi;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Rejected caller-supplied identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentError {
    /// Lookup identifier is zero.
    InvalidId,
    /// Lookup identifier and payload identifier differ.
    IdMismatch { id: UserId, payload_id: UserId },
}

impl Display for ArgumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId => write!(f, "invalid user identifier"),
            Self::IdMismatch { id, payload_id } => write!(
                f,
                "user identifier mismatch: key {id} does not match payload {payload_id}"
            ),
        }
    }
}

impl Error for ArgumentError {}

/// Errors returned by every user store operation.
#[derive(Debug)]
pub enum StoreError {
    /// Database connection could not be opened or configured.
    Connection(DbError),
    /// Schema bootstrap failed.
    Schema(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Connection is missing a table the store relies on.
    MissingRequiredTable(&'static str),
    /// Table is missing a column the store relies on.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Write rejected by a UNIQUE or PRIMARY KEY constraint.
    Duplicate(rusqlite::Error),
    NotFound(UserId),
    /// Update statement affected zero rows.
    UpdateFailed(UserId),
    /// Delete statement affected zero rows.
    DeleteFailed(UserId),
    InvalidArgument(ArgumentError),
    /// Any other statement or mapping failure.
    Storage(rusqlite::Error),
    /// Persisted row cannot be converted into a `User`.
    InvalidData(String),
}

/// Flat classification of [`StoreError`] for callers mapping to status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    Connection,
    Schema,
    Duplicate,
    NotFound,
    UpdateFailed,
    DeleteFailed,
    InvalidArgument,
    Storage,
}

impl StoreErrorKind {
    /// Stable snake_case label used in log events and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connection => "connection",
            Self::Schema => "schema",
            Self::Duplicate => "duplicate",
            Self::NotFound => "not_found",
            Self::UpdateFailed => "update_failed",
            Self::DeleteFailed => "delete_failed",
            Self::InvalidArgument => "invalid_argument",
            Self::Storage => "storage",
        }
    }
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            Self::Connection(_) => StoreErrorKind::Connection,
            Self::Schema(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => StoreErrorKind::Schema,
            Self::Duplicate(_) => StoreErrorKind::Duplicate,
            Self::NotFound(_) => StoreErrorKind::NotFound,
            Self::UpdateFailed(_) => StoreErrorKind::UpdateFailed,
            Self::DeleteFailed(_) => StoreErrorKind::DeleteFailed,
            Self::InvalidArgument(_) => StoreErrorKind::InvalidArgument,
            Self::Storage(_) | Self::InvalidData(_) => StoreErrorKind::Storage,
        }
    }

    /// Maps a failed write, promoting uniqueness violations to `Duplicate`.
    pub(crate) fn from_write(err: rusqlite::Error) -> Self {
        if is_unique_violation(&err) {
            Self::Duplicate(err)
        } else {
            Self::Storage(err)
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(err) => write!(f, "{err}"),
            Self::Schema(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "user store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "user store requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "user store requires column `{column}` in table `{table}`"
            ),
            Self::Duplicate(_) => write!(f, "user already exists"),
            Self::NotFound(id) => write!(f, "user not found: {id}"),
            Self::UpdateFailed(id) => write!(f, "update affected no rows for user {id}"),
            Self::DeleteFailed(id) => write!(f, "delete affected no rows for user {id}"),
            Self::InvalidArgument(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted user data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connection(err) => Some(err),
            Self::Schema(err) => Some(err),
            Self::Duplicate(err) => Some(err),
            Self::InvalidArgument(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. }
            | Self::NotFound(_)
            | Self::UpdateFailed(_)
            | Self::DeleteFailed(_)
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        if value.is_connection_failure() {
            Self::Connection(value)
        } else {
            Self::Schema(value)
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(value)
    }
}

impl From<ArgumentError> for StoreError {
    fn from(value: ArgumentError) -> Self {
        Self::InvalidArgument(value)
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err.sqlite_error() {
        Some(sqlite_err) => {
            sqlite_err.code == ErrorCode::ConstraintViolation
                && matches!(
                    sqlite_err.extended_code,
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                )
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{ArgumentError, StoreError, StoreErrorKind};
    use crate::db::DbError;
    use rusqlite::ffi;

    fn sqlite_failure(extended_code: i32) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(ffi::Error::new(extended_code), None)
    }

    #[test]
    fn unique_violation_maps_to_duplicate() {
        let err = StoreError::from_write(sqlite_failure(ffi::SQLITE_CONSTRAINT_UNIQUE));
        assert_eq!(err.kind(), StoreErrorKind::Duplicate);

        let err = StoreError::from_write(sqlite_failure(ffi::SQLITE_CONSTRAINT_PRIMARYKEY));
        assert_eq!(err.kind(), StoreErrorKind::Duplicate);
    }

    #[test]
    fn other_constraint_violations_map_to_storage() {
        for code in [ffi::SQLITE_CONSTRAINT_CHECK, ffi::SQLITE_CONSTRAINT_NOTNULL] {
            let err = StoreError::from_write(sqlite_failure(code));
            assert_eq!(err.kind(), StoreErrorKind::Storage);
        }
    }

    #[test]
    fn non_sqlite_failures_map_to_storage() {
        let err = StoreError::from_write(rusqlite::Error::QueryReturnedNoRows);
        assert_eq!(err.kind(), StoreErrorKind::Storage);
    }

    #[test]
    fn db_errors_split_into_connection_and_schema() {
        let connection = StoreError::from(DbError::Connection(sqlite_failure(ffi::SQLITE_CANTOPEN)));
        assert_eq!(connection.kind(), StoreErrorKind::Connection);

        let schema = StoreError::from(DbError::UnsupportedSchemaVersion {
            db_version: 9,
            latest_supported: 1,
        });
        assert_eq!(schema.kind(), StoreErrorKind::Schema);
    }

    #[test]
    fn argument_errors_describe_the_mismatch() {
        let err = StoreError::from(ArgumentError::IdMismatch {
            id: 5,
            payload_id: 7,
        });
        assert_eq!(err.kind(), StoreErrorKind::InvalidArgument);
        let message = err.to_string();
        assert!(message.contains('5'));
        assert!(message.contains('7'));
    }
}
