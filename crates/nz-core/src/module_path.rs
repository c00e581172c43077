//! Names of documents, relative to the compile root.

use std::fmt;

/// A document name such as `collections/list`, without its extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModulePath {
    segments: Vec<String>,
}

impl ModulePath {
    /// Build a path from its segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a slash separated path like `a/b/c`.
    pub fn parse(text: &str) -> Self {
        Self::new(text.split('/').filter(|s| !s.is_empty()))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The last segment, used as a short module name.
    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    /// Resolve an import written in the document at `self`.
    ///
    /// `parents == 0` means the import is rooted at the compile root.
    /// One leading dot stays in the importing document's directory and each
    /// further dot walks one directory up. Returns `None` when the import
    /// climbs above the root.
    pub fn resolve_import(&self, parents: u32, rest: &[String]) -> Option<ModulePath> {
        let mut segments = if parents == 0 {
            Vec::new()
        } else {
            let directory_depth = self.segments.len().checked_sub(1)?;
            let keep = directory_depth.checked_sub(parents as usize - 1)?;
            self.segments[..keep].to_vec()
        };
        segments.extend(rest.iter().cloned());
        Some(ModulePath { segments })
    }

    /// The file name for this path with the given extension.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self, extension)
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}
