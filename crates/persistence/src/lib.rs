//! Persistence layer for the Kinnect backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - SQL migrations (src/migrations)

pub mod db;
pub mod entities;
pub mod repositories;
