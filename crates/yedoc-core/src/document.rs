//! Normalized on-disk handle for a persisted document.

use std::path::{Path, PathBuf};

pub const DOCUMENT_EXTENSION: &str = "graphml";
const DEFAULT_BASENAME: &str = "temp";

#[derive(Debug, Clone, Copy, Default)]
pub struct PersistOptions {
    /// Indented output instead of the compact single-line form.
    pub pretty: bool,
    pub overwrite: bool,
}

/// A document path with the format extension enforced. A missing or invalid
/// directory falls back to the current working directory.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    path: PathBuf,
}

impl DocumentFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref();
        let mut basename = raw
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_BASENAME.to_string());
        if !basename.ends_with(&format!(".{DOCUMENT_EXTENSION}")) {
            basename.push('.');
            basename.push_str(DOCUMENT_EXTENSION);
        }
        let dir = match raw.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && parent.is_dir() => {
                parent.to_path_buf()
            }
            _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };
        Self {
            path: dir.join(basename),
        }
    }

    pub fn temp() -> Self {
        Self::new(DEFAULT_BASENAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn basename(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}
