use anyhow::{Context, Result};
use async_trait::async_trait;
use shared::PatientRecord;
use sqlx::{migrate::MigrateDatabase, sqlite::SqliteRow, Row, Sqlite, SqlitePool};
use std::sync::Arc;
use tracing::debug;

use crate::storage::PatientRepository;

/// DbConnection owns the SQLite pool and the schema
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and make sure the schema exists
    pub async fn new(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url)
                .await
                .with_context(|| format!("failed to create database {url}"))?;
        }

        let pool = SqlitePool::connect(url)
            .await
            .with_context(|| format!("failed to connect to {url}"))?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Fresh private in-memory database, one per call
    pub async fn in_memory() -> Result<Self> {
        let db_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", db_id);

        Self::new(&db_url).await
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS patient_records (
                patient_id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                age INTEGER NOT NULL,
                address TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await
        .context("failed to create patient_records table")?;

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Repository for patient records stored in SQLite
#[derive(Clone)]
pub struct SqlitePatientRepository {
    db: DbConnection,
}

impl SqlitePatientRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn map_row(row: &SqliteRow) -> PatientRecord {
        PatientRecord {
            patient_id: Some(row.get("patient_id")),
            name: row.get("name"),
            age: row.get("age"),
            address: row.get("address"),
        }
    }
}

#[async_trait]
impl PatientRepository for SqlitePatientRepository {
    async fn find_all(&self) -> Result<Vec<PatientRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT patient_id, name, age, address
            FROM patient_records
            ORDER BY patient_id ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(Self::map_row).collect())
    }

    async fn find_by_id(&self, patient_id: i64) -> Result<Option<PatientRecord>> {
        let row = sqlx::query(
            r#"
            SELECT patient_id, name, age, address
            FROM patient_records
            WHERE patient_id = ?
            "#,
        )
        .bind(patient_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(Self::map_row))
    }

    async fn save(&self, record: &PatientRecord) -> Result<PatientRecord> {
        let patient_id = match record.patient_id {
            None => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO patient_records (name, age, address)
                    VALUES (?, ?, ?)
                    "#,
                )
                .bind(&record.name)
                .bind(record.age)
                .bind(&record.address)
                .execute(self.db.pool())
                .await?;
                result.last_insert_rowid()
            }
            Some(patient_id) => {
                sqlx::query(
                    r#"
                    INSERT INTO patient_records (patient_id, name, age, address)
                    VALUES (?, ?, ?, ?)
                    ON CONFLICT(patient_id) DO UPDATE SET
                        name = excluded.name,
                        age = excluded.age,
                        address = excluded.address
                    "#,
                )
                .bind(patient_id)
                .bind(&record.name)
                .bind(record.age)
                .bind(&record.address)
                .execute(self.db.pool())
                .await?;
                patient_id
            }
        };

        debug!("Saved patient record {}", patient_id);

        let mut saved = record.clone();
        saved.patient_id = Some(patient_id);
        Ok(saved)
    }

    async fn delete_by_id(&self, patient_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM patient_records WHERE patient_id = ?")
            .bind(patient_id)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> SqlitePatientRepository {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");
        SqlitePatientRepository::new(db)
    }

    #[tokio::test]
    async fn test_save_assigns_id() {
        let repo = setup_test().await;

        let saved = repo
            .save(&PatientRecord::new("John Arc", 47, "New York USA"))
            .await
            .expect("Failed to save record");

        assert!(saved.patient_id.is_some());
        assert_eq!(saved.name, "John Arc");
        assert_eq!(saved.age, 47);
        assert_eq!(saved.address, "New York USA");

        let fetched = repo
            .find_by_id(saved.patient_id.unwrap())
            .await
            .expect("Failed to fetch record");
        assert_eq!(fetched, Some(saved));
    }

    #[tokio::test]
    async fn test_find_by_id_missing() {
        let repo = setup_test().await;
        let result = repo.find_by_id(99).await.expect("Query failed");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_find_all_empty_then_ordered() {
        let repo = setup_test().await;

        let empty = repo.find_all().await.expect("Failed to list records");
        assert!(empty.is_empty(), "Database should be empty at test start");

        for (name, age, address) in [
            ("Kopal Niranjan", 23, "Lucknow India"),
            ("Suryansh Bhadouria", 27, "Lucknow India"),
            ("Joan Arc", 31, "New York USA"),
        ] {
            repo.save(&PatientRecord::new(name, age, address))
                .await
                .expect("Failed to save record");
        }

        let all = repo.find_all().await.expect("Failed to list records");
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].name, "Kopal Niranjan");
        assert_eq!(all[2].name, "Joan Arc");
        assert!(all.windows(2).all(|w| w[0].patient_id < w[1].patient_id));
    }

    #[tokio::test]
    async fn test_save_with_id_overwrites_row() {
        let repo = setup_test().await;

        let saved = repo
            .save(&PatientRecord::new("Kopal Niranjan", 23, "Lucknow India"))
            .await
            .unwrap();
        let id = saved.patient_id.unwrap();

        let updated = repo
            .save(&PatientRecord::new("Baby Kopal", 23, "Bangalore India").with_id(id))
            .await
            .unwrap();

        assert_eq!(updated.patient_id, Some(id));
        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Baby Kopal");
        assert_eq!(all[0].address, "Bangalore India");
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let repo = setup_test().await;

        let saved = repo
            .save(&PatientRecord::new("Suryansh Bhadouria", 27, "Lucknow India"))
            .await
            .unwrap();
        let id = saved.patient_id.unwrap();

        repo.delete_by_id(id).await.expect("Failed to delete record");
        assert!(repo.find_by_id(id).await.unwrap().is_none());

        // Deleting again is left to the store and must not fail
        repo.delete_by_id(id).await.expect("Second delete should be a no-op");
    }

    #[tokio::test]
    async fn test_databases_are_isolated() {
        let first = setup_test().await;
        let second = setup_test().await;

        first.save(&PatientRecord::new("Joan Arc", 31, "New York USA")).await.unwrap();

        assert_eq!(first.find_all().await.unwrap().len(), 1);
        assert!(second.find_all().await.unwrap().is_empty());
    }
}
