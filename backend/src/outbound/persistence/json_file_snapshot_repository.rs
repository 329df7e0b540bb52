//! JSON file adapter for [`UserSnapshotRepository`].
//!
//! The file holds one object keyed by collection name:
//!
//! ```json
//! { "users": [ { "id": 1, "name": "Alice", "email": "alice@example.com" } ] }
//! ```
//!
//! Access goes through a `cap_std` directory handle opened once on the file's
//! parent, and every write replaces the file atomically.

use std::io;
use std::path::Path;

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use serde::Serialize;
use tracing::debug;

use super::atomic_io::write_atomic;
use crate::domain::User;
use crate::domain::ports::{
    SnapshotRepositoryError, USERS_COLLECTION, UserSnapshot, UserSnapshotRepository,
};

#[derive(Serialize)]
struct SnapshotDocument<'a> {
    users: &'a [User],
}

/// Stores the user collection in a single pretty-printed JSON file.
pub struct JsonFileUserSnapshotRepository {
    dir: Dir,
    file_name: Utf8PathBuf,
    display_path: String,
}

impl std::fmt::Debug for JsonFileUserSnapshotRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileUserSnapshotRepository")
            .field("path", &self.display_path)
            .finish_non_exhaustive()
    }
}

impl JsonFileUserSnapshotRepository {
    /// Open the snapshot file at `path`, creating its parent directory if needed.
    ///
    /// The file itself is created on the first write.
    ///
    /// # Errors
    /// [`SnapshotRepositoryError::Read`] when the path has no UTF-8 file name or
    /// the parent directory cannot be created or opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SnapshotRepositoryError> {
        let target = path.as_ref();
        let display_path = target.display().to_string();
        let file_name = target
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                SnapshotRepositoryError::read(&display_path, "path must end in a UTF-8 file name")
            })?;
        let parent = target
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        Dir::create_ambient_dir_all(parent, ambient_authority())
            .and_then(|()| Dir::open_ambient_dir(parent, ambient_authority()))
            .map(|dir| Self {
                dir,
                file_name: Utf8PathBuf::from(file_name),
                display_path: display_path.clone(),
            })
            .map_err(|err| SnapshotRepositoryError::read(&display_path, err.to_string()))
    }

    /// Path the adapter was opened with, for logging.
    pub fn display_path(&self) -> &str {
        self.display_path.as_str()
    }
}

impl UserSnapshotRepository for JsonFileUserSnapshotRepository {
    fn load_all(&self) -> Result<UserSnapshot, SnapshotRepositoryError> {
        let contents = match self.dir.read_to_string(&self.file_name) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.display_path, "no user snapshot yet; starting empty");
                return Ok(UserSnapshot::new());
            }
            Err(err) => {
                return Err(SnapshotRepositoryError::read(
                    &self.display_path,
                    err.to_string(),
                ));
            }
        };
        if contents.trim().is_empty() {
            return Ok(UserSnapshot::new());
        }
        serde_json::from_str(&contents)
            .map_err(|err| SnapshotRepositoryError::decode(&self.display_path, err.to_string()))
    }

    fn persist(&self, users: &[User]) -> Result<(), SnapshotRepositoryError> {
        let document = SnapshotDocument { users };
        let mut json = serde_json::to_string_pretty(&document)
            .map_err(|err| SnapshotRepositoryError::write(&self.display_path, err.to_string()))?;
        json.push('\n');
        write_atomic(&self.dir, &self.file_name, &self.display_path, &json)?;
        debug!(
            path = %self.display_path,
            collection = USERS_COLLECTION,
            users = users.len(),
            "user snapshot written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn workspace() -> TempDir {
        tempfile::tempdir().expect("tempdir")
    }

    fn user(id: i64, name: &str, email: &str) -> User {
        User::try_from_parts(id, name, email).expect("valid user")
    }

    #[rstest]
    fn missing_file_loads_as_empty(workspace: TempDir) {
        let repo =
            JsonFileUserSnapshotRepository::open(workspace.path().join("users.json")).expect("open");
        assert!(repo.load_all().expect("load").is_empty());
    }

    #[rstest]
    fn persisted_users_load_back_in_order(workspace: TempDir) {
        let path = workspace.path().join("users.json");
        let repo = JsonFileUserSnapshotRepository::open(&path).expect("open");
        let users = vec![
            user(3, "Cleo", "cleo@example.com"),
            user(1, "Ada", "Ada@Example.com"),
        ];
        repo.persist(&users).expect("persist");

        let reopened = JsonFileUserSnapshotRepository::open(&path).expect("reopen");
        let loaded = reopened.load_all().expect("load");
        assert_eq!(loaded.get(USERS_COLLECTION), Some(&users));
    }

    #[rstest]
    fn file_uses_users_key(workspace: TempDir) {
        let path = workspace.path().join("users.json");
        let repo = JsonFileUserSnapshotRepository::open(&path).expect("open");
        repo.persist(&[user(1, "Ada", "ada@example.com")])
            .expect("persist");

        let raw = repo.dir.read_to_string("users.json").expect("read raw");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(
            value,
            serde_json::json!({"users": [{"id": 1, "name": "Ada", "email": "ada@example.com"}]})
        );
    }

    #[rstest]
    fn creates_missing_parent_directories(workspace: TempDir) {
        let path = workspace.path().join("data").join("nested").join("users.json");
        let repo = JsonFileUserSnapshotRepository::open(&path).expect("open");
        repo.persist(&[]).expect("persist");
        assert!(path.exists());
    }

    #[rstest]
    fn malformed_file_is_a_decode_error(workspace: TempDir) {
        let path = workspace.path().join("users.json");
        let repo = JsonFileUserSnapshotRepository::open(&path).expect("open");
        repo.dir
            .write("users.json", b"{\"users\": [{\"id\": 0}]}")
            .expect("write raw");
        let result = repo.load_all();
        assert!(matches!(result, Err(SnapshotRepositoryError::Decode { .. })));
    }

    #[rstest]
    fn blank_file_loads_as_empty(workspace: TempDir) {
        let path = workspace.path().join("users.json");
        let repo = JsonFileUserSnapshotRepository::open(&path).expect("open");
        repo.dir.write("users.json", b"  \n").expect("write raw");
        assert!(repo.load_all().expect("load").is_empty());
    }
}
