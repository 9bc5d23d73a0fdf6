use async_trait::async_trait;

use crate::{ProcessName, ProcessRecord, Result};

/// Result of an upsert: whether the record was newly created or replaced an
/// existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Overwritten,
}

/// Core trait for process store implementations.
///
/// All implementations must be thread-safe (Send + Sync). A record is either
/// fully created or fully overwritten; partial field updates are not part of
/// the interface.
#[async_trait]
pub trait ProcessStore: Send + Sync {
    /// Creates a process record, or replaces the workspace and warnings of an
    /// existing one when `overwrite` is true.
    ///
    /// Fails with [`StoreError::Conflict`](crate::StoreError::Conflict) if a
    /// record with the same name exists and `overwrite` is false.
    async fn upsert(&self, record: ProcessRecord, overwrite: bool) -> Result<UpsertOutcome>;

    /// Retrieves a process record by name.
    ///
    /// Returns None if no record with that name exists.
    async fn get(&self, name: &ProcessName) -> Result<Option<ProcessRecord>>;

    /// Deletes a process record by name.
    ///
    /// Returns false if no record with that name existed.
    async fn delete(&self, name: &ProcessName) -> Result<bool>;

    /// Lists the names of all stored processes. Order is not guaranteed.
    async fn list(&self) -> Result<Vec<String>>;
}
