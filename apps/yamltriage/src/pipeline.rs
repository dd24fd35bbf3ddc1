//! End-to-end run: validate, classify and bucket, then dispatch fixes.
//!
//! Only a missing document directory aborts a run; everything that goes
//! wrong for an individual file ends up in the reports instead.

use crate::aggregate::{aggregate, Aggregation};
use crate::fix::{dispatch, FixRegistry};
use crate::models::{FixLogEntry, FixStatus, ValidationReport};
use crate::store::StoreError;
use crate::validate::{run_validation, ValidationPass};
use std::path::PathBuf;

/// Inputs for a run, usually derived from `config::Effective`.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub root: PathBuf,
    pub exclude: Vec<String>,
    pub extensions: Vec<String>,
    pub required_key: String,
    /// Run the fix stage at all.
    pub fix: bool,
    /// Write fixed content back to disk.
    pub write: bool,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub validation: ValidationPass,
    pub patterns: Aggregation,
    pub fixes: Vec<FixLogEntry>,
    /// Validation after write-back; set only when a fix was written.
    pub revalidation: Option<ValidationReport>,
}

impl RunReport {
    pub fn applied_count(&self) -> usize {
        self.fixes
            .iter()
            .filter(|e| e.status == FixStatus::Applied)
            .count()
    }
}

fn validate_root(opts: &RunOptions) -> Result<ValidationPass, StoreError> {
    run_validation(&opts.root, &opts.exclude, &opts.extensions, &opts.required_key)
}

/// Run the pipeline with the default fix registry.
pub fn run(opts: &RunOptions) -> Result<RunReport, StoreError> {
    run_with_registry(opts, &FixRegistry::default())
}

pub fn run_with_registry(
    opts: &RunOptions,
    registry: &FixRegistry,
) -> Result<RunReport, StoreError> {
    let validation = validate_root(opts)?;
    let patterns = aggregate(&validation.report.error_files);
    let fixes = if opts.fix {
        dispatch(&opts.root, &patterns, registry, opts.write)
    } else {
        Vec::new()
    };
    let wrote = opts.write && fixes.iter().any(|e| e.status == FixStatus::Applied);
    let revalidation = if wrote {
        Some(validate_root(opts)?.report)
    } else {
        None
    };
    Ok(RunReport {
        validation,
        patterns,
        fixes,
        revalidation,
    })
}
