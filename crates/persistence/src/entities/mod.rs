//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod appointment;
pub mod group;
pub mod medication;
pub mod user;

pub use appointment::AppointmentEntity;
pub use group::GroupEntity;
pub use medication::{AdministrationEntity, MedicationEntity};
pub use user::UserEntity;
