//! Shared utilities for the Kinnect backend.
//!
//! This crate provides functionality used across the other crates:
//! - Password hashing with Argon2id
//! - JWT access-token issuing and validation

pub mod jwt;
pub mod password;
