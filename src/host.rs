//! Where source documents come from.
//!
//! The driver never touches the file system directly. It asks a
//! [`DocumentProvider`] for the text of each module path it needs and
//! treats a missing document as an unresolved import.

use nz_core::ModulePath;
use rustc_hash::FxHashMap;
use std::io;
use std::path::PathBuf;

/// Supplies document text by module path.
pub trait DocumentProvider {
    /// The text of the document at `path` with the given extension, or
    /// `None` when there is no such document.
    fn try_get_document(&self, path: &ModulePath, extension: &str) -> Option<String>;
}

impl<P: DocumentProvider + ?Sized> DocumentProvider for &P {
    fn try_get_document(&self, path: &ModulePath, extension: &str) -> Option<String> {
        (**self).try_get_document(path, extension)
    }
}

/// Documents held in memory, keyed by file name (`lib/util.nz`).
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentProvider {
    documents: FxHashMap<String, String>,
}

impl MemoryDocumentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a document.
    pub fn insert(&mut self, file_name: impl Into<String>, text: impl Into<String>) {
        self.documents.insert(file_name.into(), text.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, file_name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(file_name, text);
        self
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentProvider for MemoryDocumentProvider {
    fn try_get_document(&self, path: &ModulePath, extension: &str) -> Option<String> {
        self.documents.get(&path.file_name(extension)).cloned()
    }
}

/// Documents read from a directory tree.
#[derive(Debug, Clone)]
pub struct FileSystemDocumentProvider {
    root: PathBuf,
}

impl FileSystemDocumentProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl DocumentProvider for FileSystemDocumentProvider {
    fn try_get_document(&self, path: &ModulePath, extension: &str) -> Option<String> {
        let file = self.root.join(path.file_name(extension));
        match std::fs::read_to_string(&file) {
            Ok(text) => Some(text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                log::warn!("could not read {}: {err}", file.display());
                None
            }
        }
    }
}
