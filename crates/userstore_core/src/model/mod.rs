//! Domain model for the user record store.
//!
//! # Responsibility
//! - Define the plain record exchanged between callers and storage.
//!
//! # Invariants
//! - Every persisted record is identified by a store-assigned `UserId`.
//! - Deletion is physical; there are no tombstones.

pub mod user;
