//! # Storage Module
//!
//! Data persistence for patient records. The domain layer only sees the
//! [`PatientRepository`] trait; the concrete backend is chosen at startup.
//!
//! - **SQLite**: [`crate::db::SqlitePatientRepository`], backed by an `sqlx` pool
//! - **In-memory**: [`InMemoryPatientRepository`], for tests and throwaway runs

pub mod memory;
pub mod traits;

pub use memory::InMemoryPatientRepository;
pub use traits::PatientRepository;
