//! Per-user locations and small path helpers.

use std::path::{Path, PathBuf};

/// Get the docsnap configuration directory.
///
/// - `$XDG_CONFIG_HOME/docsnap` if set
/// - `~/.config/docsnap` otherwise
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("docsnap"))
}

/// Get the docsnap data directory.
///
/// This is the default root for the version index and snapshot copies.
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("docsnap"))
}

/// Document name used to group snapshots: the file name of `path`.
pub fn document_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// File extension of `path`, lowercased, without the leading dot.
pub fn extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .filter(|e| !e.is_empty())
}

/// Sibling path used for write-then-rename replacement of `path`.
pub fn temp_sibling(path: &Path, tag: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{tag}.tmp"))
}
