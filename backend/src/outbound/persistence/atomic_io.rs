//! Atomic file replacement through a temporary sibling file.
//!
//! Contents are written and synced to a hidden temporary file in the target
//! directory, then renamed over the target, so readers never observe a
//! partially written snapshot.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Component, Utf8Path};
use cap_std::fs::{Dir, OpenOptions};

use crate::domain::ports::SnapshotRepositoryError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Replace `path` inside `dir` with `contents`.
///
/// `path` must be a bare file name relative to `dir`.
///
/// # Errors
/// Returns [`SnapshotRepositoryError::Write`] naming `display_path` when any
/// step fails. The temporary file is removed on failure.
pub(crate) fn write_atomic(
    dir: &Dir,
    path: &Utf8Path,
    display_path: &str,
    contents: &str,
) -> Result<(), SnapshotRepositoryError> {
    let mut components = path.components();
    let (Some(Utf8Component::Normal(file_name)), None) = (components.next(), components.next())
    else {
        return Err(SnapshotRepositoryError::write(
            display_path,
            "snapshot path must be a file name",
        ));
    };
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_name = format!(
        ".{file_name}.tmp.{}.{suffix}.{counter}",
        std::process::id()
    );

    write_temp_file(dir, &tmp_name, contents)
        .and_then(|()| dir.rename(&tmp_name, dir, file_name))
        .map_err(|err| {
            drop(dir.remove_file(&tmp_name));
            SnapshotRepositoryError::write(display_path, err.to_string())
        })?;
    sync_directory(dir);
    Ok(())
}

fn write_temp_file(dir: &Dir, tmp_name: &str, contents: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

fn sync_directory(dir: &Dir) {
    // Best effort: some platforms cannot fsync a directory handle.
    if dir.open(".").and_then(|handle| handle.sync_all()).is_err() {
        tracing::debug!("snapshot directory sync skipped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cap_std::ambient_authority;
    use rstest::rstest;

    #[rstest]
    fn replaces_existing_contents_and_leaves_no_temp_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = Dir::open_ambient_dir(tmp.path(), ambient_authority()).expect("open dir");
        let path = Utf8Path::new("users.json");

        write_atomic(&dir, path, "users.json", "first").expect("first write");
        write_atomic(&dir, path, "users.json", "second").expect("second write");

        assert_eq!(dir.read_to_string(path).expect("read back"), "second");
        let entries: Vec<_> = dir
            .entries()
            .expect("list dir")
            .filter_map(Result::ok)
            .map(|entry| entry.file_name())
            .collect();
        assert_eq!(entries.len(), 1, "unexpected entries: {entries:?}");
    }

    #[rstest]
    fn failed_rename_removes_temp_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = Dir::open_ambient_dir(tmp.path(), ambient_authority()).expect("open dir");
        dir.create_dir("users.json").expect("blocking directory");

        let result = write_atomic(&dir, Utf8Path::new("users.json"), "users.json", "{}");

        assert!(matches!(result, Err(SnapshotRepositoryError::Write { .. })));
        let entries: Vec<_> = dir
            .entries()
            .expect("list dir")
            .filter_map(Result::ok)
            .map(|entry| entry.file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("users.json")]);
    }

    #[rstest]
    #[case("nested/users.json")]
    #[case("../users.json")]
    fn rejects_paths_that_are_not_bare_file_names(#[case] raw: &str) {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = Dir::open_ambient_dir(tmp.path(), ambient_authority()).expect("open dir");
        let result = write_atomic(&dir, Utf8Path::new(raw), raw, "{}");
        assert!(matches!(result, Err(SnapshotRepositoryError::Write { .. })));
    }
}
