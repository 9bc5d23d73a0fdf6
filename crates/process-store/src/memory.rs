use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    ProcessName, ProcessRecord, Result,
    error::StoreError,
    store::{ProcessStore, UpsertOutcome},
};

/// Documents of a stored process, kept in their serialized form so the
/// in-memory store round-trips values exactly like the PostgreSQL columns.
#[derive(Debug, Clone)]
struct StoredDocs {
    workspace: String,
    current_warnings: String,
}

/// In-memory process store implementation.
///
/// Used by the API integration tests and as the fallback store when no
/// database is configured. Provides the same interface and observable
/// behavior as the PostgreSQL implementation.
#[derive(Clone, Default)]
pub struct InMemoryProcessStore {
    processes: Arc<RwLock<HashMap<String, StoredDocs>>>,
}

impl InMemoryProcessStore {
    /// Creates a new empty in-memory process store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored processes.
    pub async fn len(&self) -> usize {
        self.processes.read().await.len()
    }

    /// Returns true if no processes are stored.
    pub async fn is_empty(&self) -> bool {
        self.processes.read().await.is_empty()
    }

    /// Clears all stored processes.
    pub async fn clear(&self) {
        self.processes.write().await.clear();
    }
}

#[async_trait]
impl ProcessStore for InMemoryProcessStore {
    async fn upsert(&self, record: ProcessRecord, overwrite: bool) -> Result<UpsertOutcome> {
        let docs = StoredDocs {
            workspace: serde_json::to_string(&record.workspace)?,
            current_warnings: serde_json::to_string(&record.current_warnings)?,
        };

        let mut processes = self.processes.write().await;

        let existed = processes.contains_key(record.name.as_str());
        if existed && !overwrite {
            return Err(StoreError::Conflict {
                name: record.name.to_string(),
            });
        }

        processes.insert(record.name.into(), docs);
        Ok(if existed {
            UpsertOutcome::Overwritten
        } else {
            UpsertOutcome::Created
        })
    }

    async fn get(&self, name: &ProcessName) -> Result<Option<ProcessRecord>> {
        let processes = self.processes.read().await;
        match processes.get(name.as_str()) {
            Some(docs) => Ok(Some(ProcessRecord {
                name: name.clone(),
                workspace: serde_json::from_str(&docs.workspace)?,
                current_warnings: serde_json::from_str(&docs.current_warnings)?,
            })),
            None => Ok(None),
        }
    }

    async fn delete(&self, name: &ProcessName) -> Result<bool> {
        let mut processes = self.processes.write().await;
        Ok(processes.remove(name.as_str()).is_some())
    }

    async fn list(&self) -> Result<Vec<String>> {
        let processes = self.processes.read().await;
        Ok(processes.keys().cloned().collect())
    }
}
