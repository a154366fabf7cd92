//! Domain models for Kinnect.

pub mod appointment;
pub mod group;
pub mod medication;
pub mod user;

pub use appointment::Appointment;
pub use group::Group;
pub use medication::{Administration, Medication};
pub use user::User;
