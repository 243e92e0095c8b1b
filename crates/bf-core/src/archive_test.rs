use super::*;
use tempfile::TempDir;

#[test]
fn test_archive_moves_and_renames() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("transactions_01032021.txt");
    fs::write(&src, "payload").unwrap();
    let archive = temp.path().join("archive");

    let dst = archive_file(&src, &archive).unwrap();

    assert_eq!(dst, archive.join("transactions_01032021.txt.backup"));
    assert!(!src.exists());
    assert_eq!(fs::read_to_string(&dst).unwrap(), "payload");
}

#[test]
fn test_archive_twice_keeps_latest_only() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("terminals_01032021.xlsx");
    let archive = temp.path().join("archive");

    fs::write(&src, "first").unwrap();
    archive_file(&src, &archive).unwrap();

    fs::write(&src, "second").unwrap();
    let dst = archive_file(&src, &archive).unwrap();

    let entries: Vec<_> = fs::read_dir(&archive).unwrap().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(fs::read_to_string(dst).unwrap(), "second");
}

#[test]
fn test_archive_missing_source() {
    let temp = TempDir::new().unwrap();
    let err = archive_file(&temp.path().join("gone.txt"), temp.path()).unwrap_err();
    assert!(matches!(err, CoreError::ArchiveError { .. }));
}

#[test]
fn test_backup_path() {
    assert_eq!(
        backup_path(Path::new("/in/a.txt"), Path::new("/arc")),
        Some(PathBuf::from("/arc/a.txt.backup"))
    );
}
