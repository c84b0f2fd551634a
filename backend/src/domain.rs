use std::sync::Arc;

use shared::PatientRecord;
use tracing::{error, info, warn};

use crate::storage::PatientRepository;

/// Failures surfaced by [`PatientService`]
#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("{0}")]
    Validation(String),
    #[error("Patient with ID {0} does not exist.")]
    NotFound(i64),
    #[error("Storage error")]
    Storage(#[from] anyhow::Error),
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;

/// Copy the mutable fields of `incoming` onto `existing`.
///
/// The identifier of `existing` is kept no matter what `incoming` carries.
pub fn merge(mut existing: PatientRecord, incoming: PatientRecord) -> PatientRecord {
    existing.name = incoming.name;
    existing.age = incoming.age;
    existing.address = incoming.address;
    existing
}

/// Service for creating, reading, updating and deleting patient records
#[derive(Clone)]
pub struct PatientService {
    repository: Arc<dyn PatientRepository>,
}

impl PatientService {
    pub fn new(repository: Arc<dyn PatientRepository>) -> Self {
        Self { repository }
    }

    /// Every stored record, in store order
    pub async fn list_patients(&self) -> PatientResult<Vec<PatientRecord>> {
        info!("Listing all patient records");

        let records = self.repository.find_all().await?;

        info!("Found {} patient records", records.len());
        Ok(records)
    }

    pub async fn get_patient(&self, patient_id: i64) -> PatientResult<PatientRecord> {
        info!("Getting patient record: {}", patient_id);

        match self.repository.find_by_id(patient_id).await? {
            Some(record) => Ok(record),
            None => {
                warn!("Patient record not found: {}", patient_id);
                Err(PatientError::NotFound(patient_id))
            }
        }
    }

    /// Validate and insert a new record. Any client-supplied id is ignored.
    pub async fn create_patient(&self, mut record: PatientRecord) -> PatientResult<PatientRecord> {
        info!("Creating patient record: name={}", record.name);

        Self::validate_create_request(&record)?;
        record.patient_id = None;

        let saved = self.repository.save(&record).await?;

        info!("Created patient record {:?} for {}", saved.patient_id, saved.name);
        Ok(saved)
    }

    /// Overwrite name, age and address of an existing record
    pub async fn update_patient(&self, record: PatientRecord) -> PatientResult<PatientRecord> {
        let patient_id = record
            .patient_id
            .ok_or_else(|| PatientError::Validation("PatientRecord or ID must not be null!".to_string()))?;

        info!("Updating patient record: {}", patient_id);

        let existing = self
            .repository
            .find_by_id(patient_id)
            .await?
            .ok_or(PatientError::NotFound(patient_id))?;

        let saved = self.repository.save(&merge(existing, record)).await?;

        info!("Updated patient record: {}", patient_id);
        Ok(saved)
    }

    pub async fn delete_patient(&self, patient_id: i64) -> PatientResult<()> {
        info!("Deleting patient record: {}", patient_id);

        if self.repository.find_by_id(patient_id).await?.is_none() {
            error!("Patient with ID {} does not exist.", patient_id);
            return Err(PatientError::NotFound(patient_id));
        }

        self.repository.delete_by_id(patient_id).await?;

        info!("Deleted patient record: {}", patient_id);
        Ok(())
    }

    fn validate_create_request(record: &PatientRecord) -> PatientResult<()> {
        if record.name.trim().is_empty() {
            return Err(PatientError::Validation("Patient name must not be blank".to_string()));
        }
        Ok(())
    }
}
