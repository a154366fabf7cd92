//! Domain layer for the Kinnect backend.
//!
//! This crate contains:
//! - Domain models (User, Group, Medication, Appointment)
//! - Request/response DTOs with validation

pub mod models;
