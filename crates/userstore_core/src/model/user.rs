//! User record model.
//!
//! # Responsibility
//! - Define the `User` record shared by store, service and outer layers.
//!
//! # Invariants
//! - `id` is `0` until the store assigns one on create.
//! - `id` never changes after creation; only `name` is mutable.

use serde::{Deserialize, Serialize};

/// Store-assigned user identifier (auto-incrementing primary key).
pub type UserId = i64;

/// Identifier value for records that were not persisted yet.
pub const UNASSIGNED_USER_ID: UserId = 0;

/// Maximum `name` length accepted by the `users.name` column.
pub const MAX_NAME_CHARS: usize = 100;

/// Plain user record.
///
/// Callers only ever hold copies; the store never hands out references
/// into storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    /// `0` before creation, then the primary key.
    #[serde(default)]
    pub id: UserId,
    pub name: String,
}

impl User {
    /// Creates an unsaved record carrying only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(UNASSIGNED_USER_ID, name)
    }

    /// Creates a record for an existing identifier, e.g. an update payload.
    pub fn with_id(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Returns whether the store has assigned an identifier yet.
    pub fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_USER_ID
    }
}
