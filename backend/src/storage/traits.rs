//! # Storage Traits
//!
//! The repository abstraction the domain layer depends on. Backends
//! (SQLite, in-memory) implement it so the service never knows which one it
//! is talking to.

use anyhow::Result;
use async_trait::async_trait;
use shared::PatientRecord;

/// Persistence operations over patient records keyed by numeric id.
#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// All records in store iteration order. Empty when nothing is stored.
    async fn find_all(&self) -> Result<Vec<PatientRecord>>;

    /// The record with this id, if any.
    async fn find_by_id(&self, patient_id: i64) -> Result<Option<PatientRecord>>;

    /// Insert when `patient_id` is `None` (the store assigns one), otherwise
    /// overwrite the row with that id. Returns the persisted form.
    async fn save(&self, record: &PatientRecord) -> Result<PatientRecord>;

    /// Remove the record with this id. A missing id is not an error here.
    async fn delete_by_id(&self, patient_id: i64) -> Result<()>;
}
