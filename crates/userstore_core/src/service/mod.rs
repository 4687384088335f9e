//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the store facade decoupled from SQL details.

pub mod user_service;
