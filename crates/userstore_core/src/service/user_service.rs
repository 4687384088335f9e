//! User use-case service.
//!
//! # Responsibility
//! - Provide the caller-level CRUD contract on top of a repository.
//! - Check caller-supplied identifiers before touching storage.
//! - Turn zero-rows-affected results into named errors.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Service layer remains storage-agnostic.
//! - Success events are logged after the statement succeeded and never
//!   change the returned result.

use crate::error::{ArgumentError, StoreError, StoreResult};
use crate::model::user::{User, UserId, UNASSIGNED_USER_ID};
use crate::repo::user_repo::UserRepository;
use log::debug;

/// Use-case service wrapper for user CRUD operations.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Inserts `user.name` and returns the record with its assigned id.
    ///
    /// Any caller-provided `id` is ignored.
    pub fn create_user(&self, user: &User) -> StoreResult<User> {
        let id = self.repo.insert_user(user)?;
        debug!("event=user_create module=service status=ok id={id}");
        Ok(User {
            id,
            name: user.name.clone(),
        })
    }

    /// Lists every user; order is whatever storage scans in.
    pub fn list_users(&self) -> StoreResult<Vec<User>> {
        let users = self.repo.list_users()?;
        debug!(
            "event=user_list module=service status=ok count={}",
            users.len()
        );
        Ok(users)
    }

    pub fn get_user(&self, id: UserId) -> StoreResult<User> {
        let user = self.repo.find_user(id)?.ok_or(StoreError::NotFound(id))?;
        debug!("event=user_get module=service status=ok id={id}");
        Ok(user)
    }

    /// Renames the user stored under `id`.
    ///
    /// # Contract
    /// - `id == 0` -> `InvalidArgument(InvalidId)`.
    /// - `id != user.id` -> `InvalidArgument(IdMismatch)`.
    /// - Missing row at check time -> `NotFound`.
    /// - Zero rows affected by the update -> `UpdateFailed`.
    /// - Returns `user` as passed in, not a re-read.
    pub fn update_user(&self, id: UserId, user: &User) -> StoreResult<User> {
        validate_update_ids(id, user)?;

        self.get_user(id)?;

        let changed = self.repo.update_user_name(id, &user.name)?;
        if changed == 0 {
            return Err(StoreError::UpdateFailed(id));
        }

        debug!("event=user_update module=service status=ok id={id}");
        Ok(user.clone())
    }

    pub fn delete_user(&self, id: UserId) -> StoreResult<()> {
        let changed = self.repo.delete_user(id)?;
        if changed == 0 {
            return Err(StoreError::DeleteFailed(id));
        }

        debug!("event=user_delete module=service status=ok id={id}");
        Ok(())
    }
}

/// Rejects a zero key or a key that differs from the payload id.
pub(crate) fn validate_update_ids(id: UserId, user: &User) -> Result<(), ArgumentError> {
    if id == UNASSIGNED_USER_ID {
        return Err(ArgumentError::InvalidId);
    }
    if id != user.id {
        return Err(ArgumentError::IdMismatch {
            id,
            payload_id: user.id,
        });
    }
    Ok(())
}
