//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency and are
//! serialized because each one truncates the processes table.

use std::sync::Arc;

use process_store::{
    PostgresProcessStore, ProcessName, ProcessRecord, ProcessStore, StoreError, UpsertOutcome,
};
use serial_test::serial;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_processes_table.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and a cleared table
async fn get_test_store() -> PostgresProcessStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE processes")
        .execute(&pool)
        .await
        .unwrap();

    PostgresProcessStore::new(pool)
}

fn test_record(name: &str, workspace: serde_json::Value) -> ProcessRecord {
    ProcessRecord::new(name, workspace, serde_json::json!([]))
}

#[tokio::test]
#[serial]
async fn upsert_and_get_roundtrip() {
    let store = get_test_store().await;

    let workspace = serde_json::json!({"nodes": [1, 2, 3], "label": "main"});
    let warnings = serde_json::json!([{"code": "W1"}]);
    let record = ProcessRecord::new("assembly", workspace.clone(), warnings.clone());

    let outcome = store.upsert(record, false).await.unwrap();
    assert_eq!(outcome, UpsertOutcome::Created);

    let stored = store
        .get(&ProcessName::new("assembly"))
        .await
        .unwrap()
        .expect("record should exist");
    assert_eq!(stored.name.as_str(), "assembly");
    assert_eq!(stored.workspace, workspace);
    assert_eq!(stored.current_warnings, warnings);
}

#[tokio::test]
#[serial]
async fn duplicate_upsert_conflicts_without_overwrite() {
    let store = get_test_store().await;

    store
        .upsert(test_record("assembly", serde_json::json!({"v": 1})), false)
        .await
        .unwrap();

    let result = store
        .upsert(test_record("assembly", serde_json::json!({"v": 2})), false)
        .await;
    assert!(matches!(result, Err(StoreError::Conflict { .. })));

    // The original documents must be unchanged after the rejected write.
    let stored = store
        .get(&ProcessName::new("assembly"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.workspace, serde_json::json!({"v": 1}));
}

#[tokio::test]
#[serial]
async fn overwrite_replaces_documents_in_place() {
    let store = get_test_store().await;

    store
        .upsert(test_record("assembly", serde_json::json!({"v": 1})), false)
        .await
        .unwrap();

    let outcome = store
        .upsert(
            ProcessRecord::new(
                "assembly",
                serde_json::json!({"v": 2}),
                serde_json::json!([{"code": "W9"}]),
            ),
            true,
        )
        .await
        .unwrap();
    assert_eq!(outcome, UpsertOutcome::Overwritten);

    let stored = store
        .get(&ProcessName::new("assembly"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.workspace, serde_json::json!({"v": 2}));
    assert_eq!(stored.current_warnings, serde_json::json!([{"code": "W9"}]));

    let names = store.list().await.unwrap();
    assert_eq!(names.len(), 1);
}

#[tokio::test]
#[serial]
async fn names_are_stored_normalized() {
    let store = get_test_store().await;

    store
        .upsert(test_record("  Assembly Line ", serde_json::json!({})), false)
        .await
        .unwrap();

    let names = store.list().await.unwrap();
    assert_eq!(names, vec!["assembly line"]);

    // Any casing of the name finds the same row.
    let stored = store
        .get(&ProcessName::new("ASSEMBLY LINE"))
        .await
        .unwrap();
    assert!(stored.is_some());
}

#[tokio::test]
#[serial]
async fn delete_removes_row_and_reports_absence() {
    let store = get_test_store().await;

    store
        .upsert(test_record("assembly", serde_json::json!({})), false)
        .await
        .unwrap();

    assert!(store.delete(&ProcessName::new("assembly")).await.unwrap());
    assert!(
        store
            .get(&ProcessName::new("assembly"))
            .await
            .unwrap()
            .is_none()
    );
    assert!(store.list().await.unwrap().is_empty());

    // Second delete finds nothing.
    assert!(!store.delete(&ProcessName::new("assembly")).await.unwrap());
}

#[tokio::test]
#[serial]
async fn list_returns_all_stored_names() {
    let store = get_test_store().await;

    for name in ["alpha", "beta", "gamma"] {
        store
            .upsert(test_record(name, serde_json::json!({})), false)
            .await
            .unwrap();
    }

    let mut names = store.list().await.unwrap();
    names.sort();
    assert_eq!(names, vec!["alpha", "beta", "gamma"]);
}

#[tokio::test]
#[serial]
async fn get_missing_returns_none() {
    let store = get_test_store().await;

    let stored = store.get(&ProcessName::new("ghost")).await.unwrap();
    assert!(stored.is_none());
}
