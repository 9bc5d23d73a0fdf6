use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{
    ProcessName, ProcessRecord, Result,
    error::StoreError,
    store::{ProcessStore, UpsertOutcome},
};

/// PostgreSQL-backed process store implementation.
///
/// Rows are keyed by the normalized process name; the workspace and warnings
/// documents are persisted as serialized JSON text.
#[derive(Clone)]
pub struct PostgresProcessStore {
    pool: PgPool,
}

impl PostgresProcessStore {
    /// Creates a new PostgreSQL process store from an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database and creates a store around a fresh pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_record(row: PgRow) -> Result<ProcessRecord> {
        let workspace: String = row.try_get("workspace")?;
        let current_warnings: String = row.try_get("current_warnings")?;

        Ok(ProcessRecord {
            name: ProcessName::new(row.try_get::<String, _>("name")?.as_str()),
            workspace: serde_json::from_str(&workspace)?,
            current_warnings: serde_json::from_str(&current_warnings)?,
        })
    }
}

#[async_trait]
impl ProcessStore for PostgresProcessStore {
    async fn upsert(&self, record: ProcessRecord, overwrite: bool) -> Result<UpsertOutcome> {
        let workspace = serde_json::to_string(&record.workspace)?;
        let current_warnings = serde_json::to_string(&record.current_warnings)?;

        // Existence check and write share one transaction; dropping the
        // transaction on the conflict path rolls it back.
        let mut tx = self.pool.begin().await?;

        let existing: Option<String> =
            sqlx::query_scalar("SELECT name FROM processes WHERE name = $1")
                .bind(record.name.as_str())
                .fetch_optional(&mut *tx)
                .await?;

        let outcome = if existing.is_some() {
            if !overwrite {
                return Err(StoreError::Conflict {
                    name: record.name.to_string(),
                });
            }

            sqlx::query("UPDATE processes SET workspace = $2, current_warnings = $3 WHERE name = $1")
                .bind(record.name.as_str())
                .bind(&workspace)
                .bind(&current_warnings)
                .execute(&mut *tx)
                .await?;
            UpsertOutcome::Overwritten
        } else {
            sqlx::query(
                "INSERT INTO processes (name, workspace, current_warnings) VALUES ($1, $2, $3)",
            )
            .bind(record.name.as_str())
            .bind(&workspace)
            .bind(&current_warnings)
            .execute(&mut *tx)
            .await?;
            UpsertOutcome::Created
        };

        tx.commit().await?;
        Ok(outcome)
    }

    async fn get(&self, name: &ProcessName) -> Result<Option<ProcessRecord>> {
        let row: Option<PgRow> = sqlx::query(
            "SELECT name, workspace, current_warnings FROM processes WHERE name = $1",
        )
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_record(row)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, name: &ProcessName) -> Result<bool> {
        let result = sqlx::query("DELETE FROM processes WHERE name = $1")
            .bind(name.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM processes")
            .fetch_all(&self.pool)
            .await?;

        Ok(names)
    }
}
