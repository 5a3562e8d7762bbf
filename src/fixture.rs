//! On-disk monorepo fixtures for tests.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// A temporary directory populated file by file.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Writes `content` to `rel`, creating parent directories.
    pub fn file(self, rel: &str, content: &str) -> Self {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture dirs");
        }
        fs::write(&path, content).expect("write fixture file");
        self
    }

    /// Writes a package.json for workspace `rel` (use "" for the root).
    pub fn manifest(self, rel: &str, json: &str) -> Self {
        let path = if rel.is_empty() {
            "package.json".to_string()
        } else {
            format!("{rel}/package.json")
        };
        self.file(&path, json)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
