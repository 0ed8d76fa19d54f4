use std::fs;
use tempfile::tempdir;
use timestream_sort::{ErrorKind, relocate};

#[test]
fn copy_keeps_source() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let src = dir.path().join("cam1_2019_11_02_08_30_00.jpg");
    let dst = dir.path().join("copy.jpg");
    fs::write(&src, b"jpeg bytes")?;

    relocate(&src, &dst, false)?;

    assert!(src.exists(), "source kept");
    assert_eq!(fs::read(&dst)?, b"jpeg bytes");
    Ok(())
}

#[cfg(unix)]
#[test]
fn destination_is_owner_and_group_read_write() -> Result<(), Box<dyn std::error::Error>> {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir()?;
    let src = dir.path().join("a.jpg");
    let dst = dir.path().join("b.jpg");
    fs::write(&src, b"x")?;
    fs::set_permissions(&src, fs::Permissions::from_mode(0o755))?;

    relocate(&src, &dst, false)?;

    let mode = fs::metadata(&dst)?.permissions().mode() & 0o777;
    assert_eq!(mode, 0o660);
    Ok(())
}

#[test]
fn move_removes_source() -> Result<(), Box<dyn std::error::Error>> {
    let src_dir = tempdir()?;
    let dst_dir = tempdir()?;
    let src = src_dir.path().join("a.jpg");
    let dst = dst_dir.path().join("a.jpg");
    fs::write(&src, b"payload")?;

    relocate(&src, &dst, true)?;

    assert!(!src.exists(), "source removed");
    assert_eq!(fs::read(&dst)?, b"payload");
    Ok(())
}

#[test]
fn move_onto_itself_keeps_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let src = dir.path().join("a.jpg");
    fs::write(&src, b"payload")?;
    let alias = dir.path().join(".").join("a.jpg");

    relocate(&src, &alias, true)?;

    assert!(src.exists(), "same file must not be deleted");
    Ok(())
}

#[test]
fn existing_destination_is_truncated() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let src = dir.path().join("a.jpg");
    let dst = dir.path().join("b.jpg");
    fs::write(&src, b"new")?;
    fs::write(&dst, b"much longer old content")?;

    relocate(&src, &dst, false)?;

    assert_eq!(fs::read(&dst)?, b"new");
    Ok(())
}

#[test]
fn missing_source_is_not_found() {
    let dir = tempdir().unwrap();
    let err = relocate(&dir.path().join("gone.jpg"), &dir.path().join("b.jpg"), false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(!dir.path().join("b.jpg").exists(), "nothing created");
}

#[test]
fn missing_destination_parent_is_write_failure() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("a.jpg");
    fs::write(&src, b"x").unwrap();

    let err = relocate(&src, &dir.path().join("no/such/dir/a.jpg"), true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WriteFailure);
    assert!(src.exists(), "source untouched on failure");
}

#[cfg(target_os = "linux")]
#[test]
fn failed_copy_leaves_partial_destination() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("not_a_file");
    fs::create_dir(&src).unwrap();
    let dst = dir.path().join("b.jpg");

    // Opening a directory succeeds on Linux, reading it does not
    let err = relocate(&src, &dst, true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WriteFailure);
    assert!(dst.exists(), "partial destination left in place");
    assert!(src.exists(), "source not deleted after failed copy");
}
