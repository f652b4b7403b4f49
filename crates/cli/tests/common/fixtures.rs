//! Scratch roots with project directories and controlled mtimes

use filetime::{set_file_mtime, FileTime};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary root directory holding one or more projects
pub struct TestRoot {
    temp_dir: TempDir,
    root: PathBuf,
}

impl TestRoot {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().canonicalize().expect("Failed to resolve temp dir");
        Self { temp_dir, root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Write a file with an explicit mtime (unix seconds)
    pub fn write(&self, rel: &str, content: &str, mtime: i64) -> &Self {
        let path = self.root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        set_file_mtime(&path, FileTime::from_unix_time(mtime, 0)).unwrap();
        self
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.root.join(rel)).unwrap()
    }

    pub fn remove(&self, rel: &str) {
        fs::remove_file(self.root.join(rel)).unwrap();
    }

    /// Parsed `.cedge/tracked/tracked.json`
    pub fn registry(&self) -> serde_json::Value {
        let bytes = fs::read(self.root.join(".cedge/tracked/tracked.json")).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Registry entry for `filename`
    pub fn entry(&self, filename: &str) -> serde_json::Value {
        self.registry()["files"]
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["filename"] == filename)
            .cloned()
            .unwrap_or_else(|| panic!("{} is not tracked", filename))
    }

    /// Parsed ledger document for `filename`
    pub fn ledger(&self, filename: &str) -> serde_json::Value {
        let base = self.entry(filename)["base_uuid"].as_str().unwrap().to_string();
        let bytes = fs::read(self.ledger_path(&base)).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    pub fn ledger_path(&self, base_uuid: &str) -> PathBuf {
        self.root.join(".cedge/diff").join(format!("{}.json", base_uuid))
    }

    #[allow(dead_code)]
    pub fn temp_dir(&self) -> &TempDir {
        &self.temp_dir
    }
}
