use super::*;
use crate::ddl::ensure_meta_tables;
use chrono::NaiveDate;

fn conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    ensure_meta_tables(&conn, "bank").unwrap();
    conn
}

fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2021, 3, 1)
        .unwrap()
        .and_hms_micro_opt(h, m, s, 250_000)
        .unwrap()
}

fn success(file_type: &str, rows: i64) -> LoadRecord {
    LoadRecord {
        run_date: "01032021".to_string(),
        file_type: file_type.to_string(),
        file_name: Some(format!("{file_type}_01032021.txt")),
        records_loaded: rows,
        status: LoadStatus::Success,
        error_message: None,
    }
}

#[test]
fn test_status_strings() {
    assert_eq!(LoadStatus::Success.as_str(), "SUCCESS");
    assert_eq!(LoadStatus::Error.as_str(), "ERROR");
}

#[test]
fn test_record_and_read_back() {
    let conn = conn();
    record_load(&conn, "bank", &success("transactions", 42), at(10, 0, 0)).unwrap();

    let rows = load_history(&conn, "bank", None).unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.run_date, "01032021");
    assert_eq!(row.file_type, "transactions");
    assert_eq!(row.file_name.as_deref(), Some("transactions_01032021.txt"));
    assert_eq!(row.records_loaded, 42);
    assert_eq!(row.load_status, "SUCCESS");
    assert_eq!(row.error_message, None);
    assert_eq!(row.loaded_at, at(10, 0, 0));
}

#[test]
fn test_rows_are_appended_in_order() {
    let conn = conn();
    record_load(&conn, "bank", &success("terminals", 3), at(10, 0, 0)).unwrap();
    record_load(&conn, "bank", &success("terminals", 3), at(11, 0, 0)).unwrap();

    let failed = LoadRecord {
        status: LoadStatus::Error,
        records_loaded: 0,
        error_message: Some("bad file".to_string()),
        ..success("passport_blacklist", 0)
    };
    record_load(&conn, "bank", &failed, at(12, 0, 0)).unwrap();

    let rows = load_history(&conn, "bank", None).unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].load_id < rows[1].load_id);
    assert!(rows[1].load_id < rows[2].load_id);
    assert_eq!(rows[2].load_status, "ERROR");
    assert_eq!(rows[2].error_message.as_deref(), Some("bad file"));
}

#[test]
fn test_history_filters_by_run_date() {
    let conn = conn();
    record_load(&conn, "bank", &success("terminals", 1), at(9, 0, 0)).unwrap();
    let other = LoadRecord {
        run_date: "02032021".to_string(),
        ..success("terminals", 2)
    };
    record_load(&conn, "bank", &other, at(9, 30, 0)).unwrap();

    let rows = load_history(&conn, "bank", Some("02032021")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].records_loaded, 2);

    assert!(load_history(&conn, "bank", Some("03032021"))
        .unwrap()
        .is_empty());
}
