//! Validation pass: parse every discovered document and record failures.
//!
//! Parsing is delegated to `serde_yaml`; this module never repairs
//! anything. Beyond syntax, a document must have a mapping at its root and
//! carry the configured identity key.

use crate::models::{ErrorRecord, ValidationReport};
use crate::store::{self, StoreError};
use serde_yaml::Value as Yaml;
use std::path::Path;

/// Synthetic message for a root that is not a mapping.
pub const NOT_A_MAPPING: &str = "Content is not a dictionary";

/// Identity key required when none is configured.
pub const DEFAULT_REQUIRED_KEY: &str = "id";

/// Outcome of validating one document's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub ok: bool,
    pub raw_message: Option<String>,
    /// 1-based (line, column) of the parser problem when known.
    pub location: Option<(usize, usize)>,
}

impl ValidationResult {
    fn passed() -> Self {
        ValidationResult {
            ok: true,
            raw_message: None,
            location: None,
        }
    }

    fn failed(message: impl Into<String>, location: Option<(usize, usize)>) -> Self {
        ValidationResult {
            ok: false,
            raw_message: Some(message.into()),
            location,
        }
    }
}

/// Message used when the identity key is absent.
pub fn missing_key_message(key: &str) -> String {
    format!("'{}' is missing", key)
}

/// Validate document text against the YAML grammar and the minimal shape.
pub fn validate(content: &str, required_key: &str) -> ValidationResult {
    let value: Yaml = match serde_yaml::from_str(content) {
        Ok(v) => v,
        Err(e) => {
            let location = e.location().map(|l| (l.line(), l.column()));
            return ValidationResult::failed(e.to_string(), location);
        }
    };
    let map = match value {
        Yaml::Mapping(m) => m,
        _ => return ValidationResult::failed(NOT_A_MAPPING, None),
    };
    if !map.contains_key(required_key) {
        return ValidationResult::failed(missing_key_message(required_key), None);
    }
    ValidationResult::passed()
}

/// One document's validation outcome, kept alongside the report so callers
/// can show locations without re-parsing.
#[derive(Debug, Clone)]
pub struct DocumentOutcome {
    pub name: String,
    pub result: ValidationResult,
}

/// Result of a full validation pass.
#[derive(Debug, Clone)]
pub struct ValidationPass {
    pub outcomes: Vec<DocumentOutcome>,
    pub report: ValidationReport,
}

/// Validate every document under `root`.
///
/// A missing directory is the only hard failure. Unreadable documents are
/// recorded as failures with the read error as their message.
pub fn run_validation(
    root: &Path,
    exclude: &[String],
    extensions: &[String],
    required_key: &str,
) -> Result<ValidationPass, StoreError> {
    let docs = store::list_documents(root, exclude, extensions)?;
    let mut outcomes = Vec::with_capacity(docs.len());
    for doc in &docs {
        let result = match store::read_document(&doc.path) {
            Ok(content) => validate(&content, required_key),
            Err(e) => ValidationResult::failed(e.to_string(), None),
        };
        outcomes.push(DocumentOutcome {
            name: doc.name.clone(),
            result,
        });
    }
    let error_files: Vec<ErrorRecord> = outcomes
        .iter()
        .filter_map(|o| {
            o.result.raw_message.as_ref().map(|m| ErrorRecord {
                filename: o.name.clone(),
                error: m.clone(),
            })
        })
        .collect();
    let report = ValidationReport {
        processed_count: outcomes.iter().filter(|o| o.result.ok).count(),
        total_analyzed: outcomes.len(),
        error_files,
    };
    Ok(ValidationPass { outcomes, report })
}
