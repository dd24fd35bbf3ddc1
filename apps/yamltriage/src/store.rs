//! Document discovery and raw text I/O.
//!
//! Documents are identified by their path relative to the scanned root.
//! Reads tolerate a leading UTF-8 byte-order mark; writes never emit one.

use crate::utils;
use glob::{glob_with, MatchOptions};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Byte-order mark stripped from input.
const BOM: char = '\u{feff}';

/// Extensions recognized when no override is configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Names skipped when no exclude list is configured.
pub const DEFAULT_EXCLUDE: &[&str] = &["target"];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid discovery pattern '{pattern}': {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// A discovered document: relative name plus absolute location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub name: String,
    pub path: PathBuf,
}

/// List documents under `root` whose extension is in `extensions`.
///
/// Discovery is recursive but never enters hidden directories such as
/// `.git`. Any path component equal to an entry of `exclude` removes the
/// file (so both seed files and whole directories can be skipped).
/// Results are sorted by relative name.
pub fn list_documents(
    root: &Path,
    exclude: &[String],
    extensions: &[String],
) -> Result<Vec<DocumentRef>, StoreError> {
    if !root.is_dir() {
        return Err(StoreError::DirectoryNotFound(root.to_path_buf()));
    }
    let opts = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let mut docs: Vec<DocumentRef> = Vec::new();
    for ext in extensions {
        let pattern = format!(
            "{}/**/*.{}",
            glob::Pattern::escape(&root.to_string_lossy()),
            ext.trim_start_matches('.')
        );
        let entries = glob_with(&pattern, opts).map_err(|source| StoreError::Glob {
            pattern: pattern.clone(),
            source,
        })?;
        for path in entries.flatten() {
            if !path.is_file() {
                continue;
            }
            let name = utils::rel_name(&path, root);
            let excluded = Path::new(&name).components().any(|c| {
                let part = c.as_os_str().to_string_lossy();
                part.starts_with('.') || exclude.iter().any(|x| x == part.as_ref())
            });
            if excluded || docs.iter().any(|d| d.name == name) {
                continue;
            }
            docs.push(DocumentRef { name, path });
        }
    }
    docs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(docs)
}

/// Read a document as text, dropping a leading byte-order mark.
pub fn read_document(path: &Path) -> Result<String, StoreError> {
    let bytes = fs::read(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|e| StoreError::Read {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidData, e),
    })?;
    Ok(match text.strip_prefix(BOM) {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

/// Write a document as UTF-8 without a byte-order mark.
///
/// Callers only invoke this when content actually changed.
pub fn write_document(path: &Path, content: &str) -> Result<(), StoreError> {
    let body = content.strip_prefix(BOM).unwrap_or(content);
    fs::write(path, body).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}
