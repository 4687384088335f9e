//! Caller-facing user record store.
//!
//! # Responsibility
//! - Own the SQLite connection for the store's lifetime.
//! - Run schema bootstrap and the readiness check once, at construction.
//! - Expose create/list/get/update/delete over `UserService`.
//!
//! # Invariants
//! - The raw connection is never handed to callers.
//! - Update rejects bad identifiers before taking the write lock; its
//!   existence check and update statement share one IMMEDIATE transaction.
//! - All statements on one store are serialized by its connection lock.

use crate::config::{DbTarget, StoreConfig};
use crate::db::{bootstrap_connection, open_db, open_db_in_memory, DEFAULT_BUSY_TIMEOUT};
use crate::error::{StoreError, StoreResult};
use crate::model::user::{User, UserId};
use crate::repo::user_repo::{ensure_user_connection_ready, SqliteUserRepository};
use crate::service::user_service::{validate_update_ids, UserService};
use log::{info, warn};
use rusqlite::{Connection, TransactionBehavior};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// SQLite-backed user record store.
///
/// `UserStore` is `Send + Sync`; share it behind an `Arc` to use one
/// connection from many threads.
pub struct UserStore {
    conn: Mutex<Connection>,
}

impl UserStore {
    /// Opens the configured database and bootstraps the `users` table.
    ///
    /// # Errors
    /// - `StoreError::Connection` when the database cannot be opened.
    /// - `StoreError::Schema` when bootstrap fails or the database carries
    ///   a newer schema version.
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        let (conn, mode) = match &config.target {
            DbTarget::Memory => (open_db_in_memory(config.busy_timeout)?, "memory"),
            DbTarget::File(path) => (open_db(path, config.busy_timeout)?, "file"),
        };
        Self::from_ready_connection(conn, mode)
    }

    /// Reuses an externally opened connection.
    ///
    /// Bootstrap runs on it exactly as in [`UserStore::open`], so a
    /// connection that was already migrated is left untouched.
    pub fn from_connection(mut conn: Connection) -> StoreResult<Self> {
        bootstrap_connection(&mut conn, DEFAULT_BUSY_TIMEOUT)?;
        Self::from_ready_connection(conn, "external")
    }

    fn from_ready_connection(conn: Connection, mode: &'static str) -> StoreResult<Self> {
        ensure_user_connection_ready(&conn)?;
        info!("event=store_open module=store status=ok mode={mode}");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn create_user(&self, user: &User) -> StoreResult<User> {
        let conn = self.lock();
        let service = user_service(&conn);
        service.create_user(user)
    }

    /// Lists every stored user. Callers must not rely on the order.
    pub fn list_users(&self) -> StoreResult<Vec<User>> {
        let conn = self.lock();
        let service = user_service(&conn);
        service.list_users()
    }

    pub fn get_user(&self, id: UserId) -> StoreResult<User> {
        let conn = self.lock();
        let service = user_service(&conn);
        service.get_user(id)
    }

    /// Renames the user stored under `id`; see
    /// [`UserService::update_user`] for the error contract.
    pub fn update_user(&self, id: UserId, user: &User) -> StoreResult<User> {
        validate_update_ids(id, user)?;

        let mut conn = self.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let updated = user_service(&tx).update_user(id, user)?;
        tx.commit()?;
        Ok(updated)
    }

    pub fn delete_user(&self, id: UserId) -> StoreResult<()> {
        let conn = self.lock();
        let service = user_service(&conn);
        service.delete_user(id)
    }

    /// Closes the connection, surfacing errors that `Drop` would swallow.
    pub fn close(self) -> StoreResult<()> {
        let conn = self
            .conn
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        conn.close().map_err(|(_, err)| StoreError::Storage(err))?;
        info!("event=store_close module=store status=ok");
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| {
            warn!("event=store_lock module=store status=recovered reason=poisoned");
            poisoned.into_inner()
        })
    }
}

fn user_service(conn: &Connection) -> UserService<SqliteUserRepository<'_>> {
    UserService::new(SqliteUserRepository::from_checked(conn))
}
