use std::path::{Path, PathBuf};

use taskdeck_core::{ProjectStore, ProjectStoreBuilder};
use tempfile::TempDir;

/// Helper function to create a test store backed by a SQLite file
pub fn create_test_store() -> (TempDir, PathBuf, ProjectStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let store = open_store(&db_path);
    (temp_dir, db_path, store)
}

/// Opens another store over an existing database file
pub fn open_store(db_path: &Path) -> ProjectStore {
    ProjectStoreBuilder::new()
        .with_database_path(Some(db_path))
        .build()
        .expect("Failed to create store")
}
