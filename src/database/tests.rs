//! Tests for warehouse connections

use super::*;
use crate::config::DwhConfig;
use crate::error::Error;
use pretty_assertions::assert_eq;

const CONFIG: &str = r#"
[CLUSTER]
DWH_REGION = "us-west-2"
DWH_CLUSTER_IDENTIFIER = "dwhCluster"
DB_NAME = "dwh"
DB_USER = "dwhuser"
DB_PASSWORD = "Passw0rd"
DB_PORT = 5439

[IAM_ROLE]
DWH_IAM_ROLE_NAME = "dwhRole"
"#;

// ============================================================================
// Connection Options Tests
// ============================================================================

#[test]
fn test_connect_options_from_cluster_section() {
    let mut config = DwhConfig::parse(CONFIG).unwrap();
    config.cluster.endpoint = Some("dwh.abc.us-west-2.redshift.amazonaws.com".into());

    let options = connect_options(&config.cluster).unwrap();

    assert_eq!(options.get_host(), "dwh.abc.us-west-2.redshift.amazonaws.com");
    assert_eq!(options.get_port(), 5439);
    assert_eq!(options.get_username(), "dwhuser");
    assert_eq!(options.get_database(), Some("dwh"));
}

#[test]
fn test_connect_options_require_endpoint() {
    let config = DwhConfig::parse(CONFIG).unwrap();
    let err = connect_options(&config.cluster).unwrap_err();
    assert!(matches!(err, Error::MissingConfigField { .. }));
    assert!(err.to_string().contains("DWH_ENDPOINT"));
}

#[test]
fn test_postgres_executor_is_a_send_executor() {
    fn assert_send_executor<E: SqlExecutor + Send + 'static>() {}
    assert_send_executor::<PostgresExecutor>();
    assert_send_executor::<Warehouse>();
}

#[tokio::test]
async fn test_connect_without_endpoint_fails_before_network() {
    let config = DwhConfig::parse(CONFIG).unwrap();
    let result = Warehouse::connect(&config, None).await;
    assert!(matches!(result, Err(Error::MissingConfigField { .. })));
}

// ============================================================================
// DuckDB Executor Tests
// ============================================================================

#[tokio::test]
async fn test_duckdb_execute_and_fetch() {
    let mut db = DuckDbExecutor::open_in_memory().unwrap();

    db.execute_and_commit("create table users (user_id int, first_name text, level text)")
        .await
        .unwrap();
    db.execute_and_commit("insert into users values (1, 'Ada', 'paid'), (2, NULL, 'free')")
        .await
        .unwrap();

    let rows = db
        .fetch_rows("select user_id, first_name, level from users order by user_id")
        .await
        .unwrap();

    assert_eq!(
        rows,
        vec![
            vec![Some("1".into()), Some("Ada".into()), Some("paid".into())],
            vec![Some("2".into()), None, Some("free".into())],
        ]
    );
    assert_eq!(db.target(), "duckdb::memory:");
}

#[tokio::test]
async fn test_duckdb_failed_statement_names_statement() {
    let mut db = DuckDbExecutor::open_in_memory().unwrap();

    let err = db
        .execute_and_commit("insert into missing_table values (1)")
        .await
        .unwrap_err();

    match err {
        Error::Statement { statement, .. } => {
            assert_eq!(statement, "insert into missing_table values (1)");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_duckdb_timestamps_honour_unit_and_sign() {
    let mut db = DuckDbExecutor::open_in_memory().unwrap();

    let rows = db
        .fetch_rows("select timestamp '1969-12-31 23:59:59.5', timestamp_ms '2020-01-01 00:00:00'")
        .await
        .unwrap();

    assert_eq!(
        rows,
        vec![vec![
            Some("1969-12-31T23:59:59.500000Z".to_string()),
            Some("2020-01-01T00:00:00.000000Z".to_string()),
        ]]
    );
}

#[tokio::test]
async fn test_duckdb_empty_result() {
    let mut db = DuckDbExecutor::open_in_memory().unwrap();
    db.execute_and_commit("create table songs (song_id text)")
        .await
        .unwrap();

    let rows = db.fetch_rows("select * from songs limit 5").await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_local_warehouse_persists_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dwh.duckdb");
    let config = DwhConfig::parse(CONFIG).unwrap();

    let mut warehouse = Warehouse::connect(&config, Some(&path)).await.unwrap();
    assert!(matches!(warehouse, Warehouse::Local(_)));
    warehouse
        .execute_and_commit("create table artists (artist_id text, name text)")
        .await
        .unwrap();
    warehouse
        .execute_and_commit("insert into artists values ('AR1', 'Band')")
        .await
        .unwrap();
    warehouse.close().await.unwrap();

    let mut reopened = Warehouse::connect(&config, Some(&path)).await.unwrap();
    let rows = reopened.fetch_rows("select name from artists").await.unwrap();
    assert_eq!(rows, vec![vec![Some("Band".to_string())]]);
    assert!(reopened.target().ends_with("dwh.duckdb"));
}
