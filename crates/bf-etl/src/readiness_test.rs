use super::*;
use std::fs;

fn ddl_dir(script: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(CREATE_TABLES_SCRIPT), script).unwrap();
    dir
}

#[test]
fn test_ensure_ready_creates_tables() {
    let dir = ddl_dir("CREATE TABLE IF NOT EXISTS {{ schema }}.dwh_t (id INTEGER);");
    let wh = Warehouse::in_memory().unwrap();

    ensure_ready(&wh, "bank", dir.path()).unwrap();
    assert!(wh.relation_exists("bank.dwh_t").unwrap());
    assert!(wh.relation_exists("bank.meta_load_info").unwrap());
    assert!(wh.relation_exists("bank.meta_last_update").unwrap());
}

#[test]
fn test_ensure_ready_is_idempotent_and_keeps_data() {
    let dir = ddl_dir("CREATE TABLE IF NOT EXISTS {{ schema }}.dwh_t (id INTEGER);");
    let wh = Warehouse::in_memory().unwrap();

    ensure_ready(&wh, "bank", dir.path()).unwrap();
    wh.execute("INSERT INTO bank.dwh_t VALUES (1)").unwrap();
    ensure_ready(&wh, "bank", dir.path()).unwrap();

    assert_eq!(wh.query_count("SELECT * FROM bank.dwh_t").unwrap(), 1);
}

#[test]
fn test_ensure_ready_drops_leftover_staging() {
    let dir = ddl_dir("SELECT 1;");
    let wh = Warehouse::in_memory().unwrap();
    wh.create_schema_if_not_exists("bank").unwrap();
    wh.execute_batch("CREATE TABLE bank.stg_terminals_temp (terminal_id VARCHAR)")
        .unwrap();

    ensure_ready(&wh, "bank", dir.path()).unwrap();
    assert!(!wh.relation_exists("bank.stg_terminals_temp").unwrap());
}

#[test]
fn test_missing_ddl_script_is_init_error() {
    let dir = tempfile::tempdir().unwrap();
    let wh = Warehouse::in_memory().unwrap();

    assert!(matches!(
        ensure_ready(&wh, "bank", dir.path()),
        Err(EtlError::SchemaInit(_))
    ));
}

#[test]
fn test_broken_ddl_is_init_error() {
    let dir = ddl_dir("CREATE TABLE {{ schema }}.broken (;");
    let wh = Warehouse::in_memory().unwrap();

    let err = ensure_ready(&wh, "bank", dir.path()).unwrap_err();
    assert!(err.to_string().contains("[E001]"));
}
