//! Tests for the statement runner

use super::*;
use crate::database::{DuckDbExecutor, SqlExecutor};
use crate::error::Error;
use pretty_assertions::assert_eq;

async fn database() -> DuckDbExecutor {
    let mut db = DuckDbExecutor::open_in_memory().unwrap();
    db.execute_and_commit("create table songs (song_id text, title text)")
        .await
        .unwrap();
    db
}

async fn table_exists(db: &mut DuckDbExecutor, name: &str) -> bool {
    let rows = db
        .fetch_rows(&format!(
            "select table_name from information_schema.tables where table_name = '{name}'"
        ))
        .await
        .unwrap();
    !rows.is_empty()
}

// ============================================================================
// run_all Tests
// ============================================================================

#[tokio::test]
async fn test_run_all_in_order() {
    let mut db = database().await;

    let count = run_all(
        &[
            "insert into songs values ('S1', 'first')",
            "insert into songs values ('S2', 'second')",
            "update songs set title = upper(title) where song_id = 'S1'",
        ],
        &mut db,
    )
    .await
    .unwrap();

    assert_eq!(count, 3);
    let rows = db
        .fetch_rows("select song_id, title from songs order by song_id")
        .await
        .unwrap();
    assert_eq!(
        rows,
        vec![
            vec![Some("S1".into()), Some("FIRST".into())],
            vec![Some("S2".into()), Some("second".into())],
        ]
    );
}

#[tokio::test]
async fn test_run_all_stops_at_first_failure() {
    let mut db = database().await;
    let statements = vec![
        "create table s1 (id int)".to_string(),
        "insert into does_not_exist values (1)".to_string(),
        "create table s3 (id int)".to_string(),
    ];

    let err = run_all(&statements, &mut db).await.unwrap_err();

    assert!(matches!(err, Error::Statement { ref statement, .. } if statement == &statements[1]));
    assert!(err.to_string().contains("does_not_exist"));
    assert!(table_exists(&mut db, "s1").await);
    assert!(!table_exists(&mut db, "s3").await);
}

#[tokio::test]
async fn test_run_all_empty_list() {
    let mut db = database().await;
    let none: [&str; 0] = [];
    assert_eq!(run_all(&none, &mut db).await.unwrap(), 0);
}

// ============================================================================
// run_quality_checks Tests
// ============================================================================

#[tokio::test]
async fn test_quality_checks_return_rows() {
    let mut db = database().await;
    db.execute_and_commit("insert into songs values ('S1', 'first'), ('S2', NULL)")
        .await
        .unwrap();

    let reports = run_quality_checks(
        &[
            "select * from songs order by song_id limit 5",
            "select count(*) from songs",
        ],
        &mut db,
    )
    .await
    .unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].statement, "select * from songs order by song_id limit 5");
    assert_eq!(
        reports[0].rows,
        vec![
            vec![Some("S1".into()), Some("first".into())],
            vec![Some("S2".into()), None],
        ]
    );
    assert_eq!(reports[1].rows, vec![vec![Some("2".into())]]);
}

#[tokio::test]
async fn test_quality_check_empty_result_is_error() {
    let mut db = database().await;

    let err = run_quality_checks(&["select * from songs limit 5"], &mut db)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::EmptyResult { .. }));
    assert_eq!(
        err.to_string(),
        "Query did not return results: select * from songs limit 5"
    );
}

#[tokio::test]
async fn test_quality_checks_stop_at_first_empty() {
    let mut db = database().await;
    db.execute_and_commit("insert into songs values ('S1', 'first')")
        .await
        .unwrap();

    let err = run_quality_checks(
        &[
            "select * from songs",
            "select * from songs where song_id = 'missing'",
            "select * from no_such_table",
        ],
        &mut db,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::EmptyResult { ref statement } if statement.contains("missing")));
}

#[test]
fn test_check_report_serializes_rows() {
    let report = CheckReport {
        statement: "select 1".into(),
        rows: vec![vec![Some("1".into()), None]],
    };
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["rows"][0][0], "1");
    assert!(json["rows"][0][1].is_null());
}
