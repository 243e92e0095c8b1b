use super::*;

#[test]
fn test_render_schema_and_date() {
    let date = RunDate::parse("01032021").unwrap();
    let sql = render_sql(
        "t.sql",
        "SELECT * FROM {{ schema }}.x WHERE d = DATE '{{ run_date }}'",
        "bank",
        Some(&date),
    )
    .unwrap();
    assert_eq!(sql, "SELECT * FROM bank.x WHERE d = DATE '2021-03-01'");
}

#[test]
fn test_unknown_variable_is_an_error() {
    let err = render_sql("t.sql", "SELECT {{ nope }}", "bank", None).unwrap_err();
    match err {
        EtlError::Template { script, .. } => assert_eq!(script, "t.sql"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_sql_is_not_escaped() {
    let sql = render_sql("t.sql", "SELECT '<a & b>' FROM {{ schema }}.t", "s", None).unwrap();
    assert_eq!(sql, "SELECT '<a & b>' FROM s.t");
}

#[test]
fn test_render_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("create_tables.sql");
    std::fs::write(&path, "CREATE TABLE {{ schema }}.t (x INT);").unwrap();

    let sql = render_sql_file(&path, "bank", None).unwrap();
    assert_eq!(sql, "CREATE TABLE bank.t (x INT);");
}

#[test]
fn test_render_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = render_sql_file(&dir.path().join("missing.sql"), "bank", None);
    assert!(matches!(result, Err(EtlError::Template { .. })));
}
