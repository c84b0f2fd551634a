use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use shared::PatientRecord;
use tokio::sync::RwLock;

use super::traits::PatientRepository;

#[derive(Default)]
struct Inner {
    records: BTreeMap<i64, PatientRecord>,
    last_id: i64,
}

/// Process-local repository. Nothing survives a restart.
#[derive(Default)]
pub struct InMemoryPatientRepository {
    inner: RwLock<Inner>,
}

impl InMemoryPatientRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated with records that already carry ids.
    /// Records without an id get one assigned, as `save` would.
    pub fn with_records(records: impl IntoIterator<Item = PatientRecord>) -> Self {
        let mut inner = Inner::default();
        for mut record in records {
            let id = match record.patient_id {
                Some(id) => id,
                None => inner.last_id + 1,
            };
            record.patient_id = Some(id);
            inner.last_id = inner.last_id.max(id);
            inner.records.insert(id, record);
        }
        Self {
            inner: RwLock::new(inner),
        }
    }
}

#[async_trait]
impl PatientRepository for InMemoryPatientRepository {
    async fn find_all(&self) -> Result<Vec<PatientRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.records.values().cloned().collect())
    }

    async fn find_by_id(&self, patient_id: i64) -> Result<Option<PatientRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.records.get(&patient_id).cloned())
    }

    async fn save(&self, record: &PatientRecord) -> Result<PatientRecord> {
        let mut inner = self.inner.write().await;
        let id = match record.patient_id {
            Some(id) => id,
            None => inner.last_id + 1,
        };
        inner.last_id = inner.last_id.max(id);

        let mut stored = record.clone();
        stored.patient_id = Some(id);
        inner.records.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete_by_id(&self, patient_id: i64) -> Result<()> {
        self.inner.write().await.records.remove(&patient_id);
        Ok(())
    }
}
