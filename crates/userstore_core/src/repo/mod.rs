//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define statement-level data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - One repository method executes exactly one SQL statement.
//! - Write methods report rows affected; interpreting zero is the caller's job.

pub mod user_repo;
