//! Glob resolution of workspace package patterns.

use crate::fs::{FileSystem, FileType};
use anyhow::Result;
use glob::Pattern;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::trace;

/// Resolves glob patterns under a project root to absolute candidate
/// directories. Only directories are produced; files matching a pattern
/// are ignored.
pub struct Scanner {
    fs: Arc<dyn FileSystem>,
}

impl Scanner {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Resolve `pattern` relative to `root` to an ordered list of
    /// absolute directories. An unmatched pattern yields an empty list;
    /// only I/O errors fail.
    pub fn scan(&self, root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        let mut matches = Vec::new();
        self.descend(root, Path::new(pattern), &mut matches)?;
        matches.sort();

        trace!(
            pattern = %pattern,
            count = matches.len(),
            "Resolved package pattern"
        );
        Ok(matches)
    }

    fn descend(&self, base: &Path, rest: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
        let mut components = rest.components();
        let Some(component) = components.next() else {
            if self.fs.is_dir(base) {
                out.push(base.to_path_buf());
            }
            return Ok(());
        };
        let remainder = components.as_path().to_path_buf();

        let segment = component.as_os_str().to_string_lossy();
        if segment.contains(['*', '?', '[']) {
            if !self.fs.is_dir(base) {
                return Ok(());
            }
            let matcher = Pattern::new(&segment)?;
            for entry in self.fs.read_dir(base)? {
                if entry.file_type == FileType::Directory && matcher.matches(&entry.name) {
                    self.descend(&entry.path, &remainder, out)?;
                }
            }
        } else {
            self.descend(&base.join(component), &remainder, out)?;
        }

        Ok(())
    }
}
