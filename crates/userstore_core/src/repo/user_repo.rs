//! User repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide statement-level CRUD APIs over the `users` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - All statements are parameterized; values are never formatted into SQL.
//! - Read paths reject malformed rows instead of masking them.

use crate::db::migrations::{current_user_version, latest_version};
use crate::error::{StoreError, StoreResult};
use crate::model::user::{User, UserId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT id, name FROM users";

/// Repository interface for user persistence.
pub trait UserRepository {
    /// Inserts a row for `user.name` and returns the assigned identifier.
    fn insert_user(&self, user: &User) -> StoreResult<UserId>;
    /// Returns all rows in storage scan order.
    fn list_users(&self) -> StoreResult<Vec<User>>;
    fn find_user(&self, id: UserId) -> StoreResult<Option<User>>;
    /// Returns the number of rows affected.
    fn update_user_name(&self, id: UserId, name: &str) -> StoreResult<usize>;
    /// Returns the number of rows affected.
    fn delete_user(&self, id: UserId) -> StoreResult<usize>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Creates repository from a migrated connection.
    ///
    /// Rejects connections that did not go through bootstrap.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_user_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Wraps a connection already checked by [`ensure_user_connection_ready`].
    pub(crate) fn from_checked(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn insert_user(&self, user: &User) -> StoreResult<UserId> {
        self.conn
            .execute("INSERT INTO users (name) VALUES (?1);", [user.name.as_str()])
            .map_err(StoreError::from_write)?;
        Ok(self.conn.last_insert_rowid())
    }

    fn list_users(&self) -> StoreResult<Vec<User>> {
        let mut stmt = self.conn.prepare(&format!("{USER_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }
        Ok(users)
    }

    fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }

    fn update_user_name(&self, id: UserId, name: &str) -> StoreResult<usize> {
        self.conn
            .execute(
                "UPDATE users SET name = ?1 WHERE id = ?2;",
                params![name, id],
            )
            .map_err(StoreError::from_write)
    }

    fn delete_user(&self, id: UserId) -> StoreResult<usize> {
        let changed = self.conn.execute("DELETE FROM users WHERE id = ?1;", [id])?;
        Ok(changed)
    }
}

fn parse_user_row(row: &Row<'_>) -> StoreResult<User> {
    let id: UserId = row.get("id")?;
    if id <= 0 {
        return Err(StoreError::InvalidData(format!(
            "invalid id value `{id}` in users.id"
        )));
    }

    let name: Option<String> = row.get("name")?;
    let name = name.ok_or_else(|| {
        StoreError::InvalidData(format!("missing name for user {id} in users.name"))
    })?;

    Ok(User { id, name })
}

/// Verifies the connection is migrated and carries the `users` columns.
pub(crate) fn ensure_user_connection_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "users")? {
        return Err(StoreError::MissingRequiredTable("users"));
    }

    for column in ["id", "name"] {
        if !table_has_column(conn, "users", column)? {
            return Err(StoreError::MissingRequiredColumn {
                table: "users",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(exists.is_some())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
