//! Test fixtures for creating reproducible document workspaces.
//!
//! Provides a temporary directory holding documents in the supported formats
//! and a separate data directory for snapshot storage.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary workspace of documents.
///
/// The directory is removed when the built value is dropped.
///
/// # Example
///
/// ```rust
/// use docsnap_test_utils::fixtures::TestDocs;
///
/// let docs = TestDocs::new()
///     .with_docjson("plan.docjson", &["Intro", "Budget"])
///     .build();
///
/// assert!(docs.read_file("plan.docjson").contains("Budget"));
/// ```
pub struct TestDocs {
    temp_dir: TempDir,
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl TestDocs {
    /// Create a new workspace builder.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
            files: BTreeMap::new(),
        }
    }

    /// Add a file with raw bytes.
    pub fn with_bytes(mut self, path: impl AsRef<Path>, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.as_ref().to_path_buf(), bytes.into());
        self
    }

    /// Add a plain text document.
    pub fn with_text(self, path: impl AsRef<Path>, text: &str) -> Self {
        self.with_bytes(path, text)
    }

    /// Add a Markdown document.
    pub fn with_markdown(self, path: impl AsRef<Path>, markdown: &str) -> Self {
        self.with_bytes(path, markdown)
    }

    /// Add a structured JSON document with one plain paragraph per entry.
    pub fn with_docjson(self, path: impl AsRef<Path>, paragraphs: &[&str]) -> Self {
        let bytes = content::docjson(paragraphs);
        self.with_bytes(path, bytes)
    }

    /// Write everything to disk.
    pub fn build(self) -> BuiltTestDocs {
        let root = self.temp_dir.path();

        for (path, bytes) in &self.files {
            let full_path = root.join(path);
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent).unwrap_or_else(|e| {
                    panic!(
                        "Failed to create parent directory for {}: {}",
                        full_path.display(),
                        e
                    )
                });
            }
            fs::write(&full_path, bytes)
                .unwrap_or_else(|e| panic!("Failed to write file {}: {}", full_path.display(), e));
        }

        BuiltTestDocs {
            temp_dir: self.temp_dir,
        }
    }
}

impl Default for TestDocs {
    fn default() -> Self {
        Self::new()
    }
}

/// A workspace with its documents on disk.
pub struct BuiltTestDocs {
    temp_dir: TempDir,
}

impl BuiltTestDocs {
    /// Root of the workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of a document in the workspace.
    pub fn doc(&self, path: impl AsRef<Path>) -> PathBuf {
        self.path().join(path)
    }

    /// Directory for snapshot data, kept apart from the documents.
    pub fn data_dir(&self) -> PathBuf {
        self.path().join(".docsnap-data")
    }

    pub fn read_file(&self, path: impl AsRef<Path>) -> String {
        let full_path = self.doc(path);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|e| panic!("Failed to read file {}: {}", full_path.display(), e))
    }

    pub fn read_bytes(&self, path: impl AsRef<Path>) -> Vec<u8> {
        let full_path = self.doc(path);
        fs::read(&full_path)
            .unwrap_or_else(|e| panic!("Failed to read file {}: {}", full_path.display(), e))
    }

    pub fn file_exists(&self, path: impl AsRef<Path>) -> bool {
        self.doc(path).exists()
    }

    /// Overwrite a document (for editing during tests).
    pub fn write_file(&self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) {
        let full_path = self.doc(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).ok();
        }
        fs::write(&full_path, contents.as_ref())
            .unwrap_or_else(|e| panic!("Failed to write file {}: {}", full_path.display(), e));
    }

    pub fn delete_file(&self, path: impl AsRef<Path>) {
        let full_path = self.doc(path);
        fs::remove_file(&full_path)
            .unwrap_or_else(|e| panic!("Failed to delete file {}: {}", full_path.display(), e));
    }

    /// Files directly inside `dir`, sorted, relative to the workspace root.
    pub fn list_files(&self, dir: impl AsRef<Path>) -> Vec<PathBuf> {
        let full_path = self.doc(dir);
        if !full_path.exists() {
            return Vec::new();
        }

        let mut files: Vec<PathBuf> = fs::read_dir(&full_path)
            .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", full_path.display(), e))
            .filter_map(|entry| {
                entry.ok().and_then(|e| {
                    if e.file_type().ok()?.is_file() {
                        Some(e.path().strip_prefix(self.path()).ok()?.to_path_buf())
                    } else {
                        None
                    }
                })
            })
            .collect();
        files.sort();
        files
    }
}

/// Common document contents.
pub mod content {
    /// A short report in Markdown.
    pub const REPORT_MD: &str =
        "# Quarterly report\n\nRevenue grew in every region.\n\n- North\n- South\n";

    /// Plain text meeting notes.
    pub const NOTES_TXT: &str =
        "Attendees: Ana, Bo\nDecision: ship on Friday\nFollow-up: budget review\n";

    /// A structured JSON document with one plain paragraph per entry.
    pub fn docjson(paragraphs: &[&str]) -> Vec<u8> {
        let paragraphs: Vec<serde_json::Value> = paragraphs
            .iter()
            .map(|text| serde_json::json!({ "text": text }))
            .collect();
        let mut bytes = serde_json::to_vec_pretty(&serde_json::json!({ "paragraphs": paragraphs }))
            .expect("Failed to serialize document");
        bytes.push(b'\n');
        bytes
    }

    /// `count` numbered lines, `"line 1"` to `"line {count}"`.
    pub fn numbered_lines(count: usize) -> String {
        (1..=count).map(|i| format!("line {i}\n")).collect()
    }
}
