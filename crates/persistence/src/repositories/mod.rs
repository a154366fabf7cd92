//! Repository implementations for database operations.

pub mod appointment;
pub mod group;
pub mod medication;
pub mod user;

pub use appointment::AppointmentRepository;
pub use group::{GroupRepository, LeaveOutcome};
pub use medication::MedicationRepository;
pub use user::UserRepository;
