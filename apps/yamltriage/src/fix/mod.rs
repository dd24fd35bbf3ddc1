//! Targeted repairs keyed by error pattern.
//!
//! - `FixRegistry` maps a pattern to an optional `FixFunction`; a pattern
//!   without an entry is reported but never dispatched.
//! - `dispatch` folds every applicable function over a document's content
//!   and records one `FixLogEntry` per document. A failure on one file is
//!   logged and the run moves on to the next.

pub mod missing_colon;
pub mod stubs;

use crate::aggregate::Aggregation;
use crate::classify::ErrorPattern;
use crate::models::{FixLogEntry, FixStatus};
use crate::store::{self, StoreError};
use std::fmt;
use std::path::Path;

/// Result of applying one fix function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    pub content: String,
    pub labels: Vec<String>,
}

impl FixOutcome {
    pub fn unchanged(content: &str) -> Self {
        FixOutcome {
            content: content.to_string(),
            labels: Vec::new(),
        }
    }
}

/// Pure text transform: `(content, filename) -> outcome`.
pub type FixFn = fn(&str, &str) -> FixOutcome;

/// A named, registered fix.
#[derive(Clone, Copy)]
pub struct FixFunction {
    pub name: &'static str,
    pub apply: FixFn,
}

impl fmt::Debug for FixFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixFunction").field("name", &self.name).finish()
    }
}

/// Registry lookup result. `NotRegistered` is distinct from a stub that
/// is registered but changes nothing.
#[derive(Debug, Clone, Copy)]
pub enum Handler {
    Fix(FixFunction),
    NotRegistered,
}

/// Ordered association of pattern to fix function.
#[derive(Debug, Clone)]
pub struct FixRegistry {
    entries: Vec<(ErrorPattern, FixFunction)>,
}

impl Default for FixRegistry {
    fn default() -> Self {
        FixRegistry {
            entries: vec![
                (
                    ErrorPattern::MissingColon,
                    FixFunction {
                        name: missing_colon::NAME,
                        apply: missing_colon::missing_colon_fix,
                    },
                ),
                (
                    ErrorPattern::BlockEndVsSequenceStart,
                    FixFunction {
                        name: stubs::BLOCK_END_VS_SEQUENCE_START,
                        apply: stubs::block_end_vs_sequence_start,
                    },
                ),
                (
                    ErrorPattern::MappingValueNotAllowed,
                    FixFunction {
                        name: stubs::MAPPING_VALUE_NOT_ALLOWED,
                        apply: stubs::mapping_value_not_allowed,
                    },
                ),
                (
                    ErrorPattern::BlockEndVsScalar,
                    FixFunction {
                        name: stubs::BLOCK_END_VS_SCALAR,
                        apply: stubs::block_end_vs_scalar,
                    },
                ),
            ],
        }
    }
}

impl FixRegistry {
    /// Register `f` for `pattern`, replacing any existing entry.
    pub fn register(&mut self, pattern: ErrorPattern, f: FixFunction) {
        match self.entries.iter_mut().find(|(p, _)| *p == pattern) {
            Some(entry) => entry.1 = f,
            None => self.entries.push((pattern, f)),
        }
    }

    pub fn lookup(&self, pattern: &ErrorPattern) -> Handler {
        self.entries
            .iter()
            .find(|(p, _)| p == pattern)
            .map(|(_, f)| Handler::Fix(*f))
            .unwrap_or(Handler::NotRegistered)
    }
}

/// Map each document to the registered fixes that apply to it, in the
/// order first encountered. Documents with no registered pattern are left
/// out entirely.
pub fn plan(aggregation: &Aggregation, registry: &FixRegistry) -> Vec<(String, Vec<FixFunction>)> {
    let mut plan: Vec<(String, Vec<FixFunction>)> = Vec::new();
    for bucket in &aggregation.buckets {
        let f = match registry.lookup(&bucket.pattern) {
            Handler::Fix(f) => f,
            Handler::NotRegistered => continue,
        };
        for ex in &bucket.examples {
            let idx = match plan.iter().position(|(name, _)| name == &ex.filename) {
                Some(i) => i,
                None => {
                    plan.push((ex.filename.clone(), Vec::new()));
                    plan.len() - 1
                }
            };
            let fixes = &mut plan[idx].1;
            if !fixes.iter().any(|g| g.name == f.name) {
                fixes.push(f);
            }
        }
    }
    plan
}

/// Read, transform, and (when `write` is set) write back a single file.
fn fix_file(
    path: &Path,
    filename: &str,
    fixes: &[FixFunction],
    write: bool,
) -> Result<(FixStatus, Vec<String>), StoreError> {
    let original = store::read_document(path)?;
    let mut content = original.clone();
    let mut labels: Vec<String> = Vec::new();
    for f in fixes {
        let outcome = (f.apply)(&content, filename);
        for label in outcome.labels {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        content = outcome.content;
    }
    if content == original {
        return Ok((FixStatus::NoEffectiveFix, Vec::new()));
    }
    if write {
        store::write_document(path, &content)?;
    }
    Ok((FixStatus::Applied, labels))
}

/// Apply registered fixes to every failing document under `root`.
///
/// With `write` unset nothing is written, but entries still report what
/// would be applied.
pub fn dispatch(
    root: &Path,
    aggregation: &Aggregation,
    registry: &FixRegistry,
    write: bool,
) -> Vec<FixLogEntry> {
    let mut log = Vec::new();
    for (filename, fixes) in plan(aggregation, registry) {
        let path = root.join(&filename);
        if !path.is_file() {
            log.push(FixLogEntry {
                filename,
                status: FixStatus::NotFound,
                fixes: Vec::new(),
                detail: None,
            });
            continue;
        }
        let entry = match fix_file(&path, &filename, &fixes, write) {
            Ok((status, labels)) => FixLogEntry {
                filename,
                status,
                fixes: labels,
                detail: None,
            },
            Err(e) => FixLogEntry {
                filename,
                status: FixStatus::Error,
                fixes: Vec::new(),
                detail: Some(e.to_string()),
            },
        };
        log.push(entry);
    }
    log
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::models::ErrorRecord;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::tempdir;

    // file that `block_write_back` turns into a directory
    static BLOCKED: Mutex<Option<PathBuf>> = Mutex::new(None);

    const MISSING: &str = "could not find expected ':' at line 2 column 1";
    const MAPPING: &str = "mapping values are not allowed in this context at line 2 column 9";
    const ALIAS: &str = "did not find expected alphabetic or numeric character, while scanning an alias";

    fn rec(file: &str, err: &str) -> ErrorRecord {
        ErrorRecord {
            filename: file.into(),
            error: err.into(),
        }
    }

    fn add_suffix(content: &str, _f: &str) -> FixOutcome {
        FixOutcome {
            content: format!("{}# seen\n", content),
            labels: vec!["suffix".into()],
        }
    }

    fn block_write_back(content: &str, filename: &str) -> FixOutcome {
        if let Some(p) = BLOCKED.lock().unwrap().as_ref() {
            fs::remove_file(p).unwrap();
            fs::create_dir(p).unwrap();
        }
        add_suffix(content, filename)
    }

    #[test]
    fn test_registry_distinguishes_stub_from_unregistered() {
        let reg = FixRegistry::default();
        assert!(matches!(reg.lookup(&ErrorPattern::MissingColon), Handler::Fix(f) if f.name == "missing_colon"));
        assert!(matches!(
            reg.lookup(&ErrorPattern::BlockEndVsScalar),
            Handler::Fix(_)
        ));
        assert!(matches!(
            reg.lookup(&ErrorPattern::AliasScanIssue),
            Handler::NotRegistered
        ));
        assert!(matches!(
            reg.lookup(&ErrorPattern::Unclassified("x".into())),
            Handler::NotRegistered
        ));
    }

    #[test]
    fn test_plan_skips_unregistered_and_dedupes() {
        let agg = aggregate(&[
            rec("a.yaml", MISSING),
            rec("b.yaml", ALIAS),
            rec("a.yaml", MISSING),
            rec("c.yaml", MAPPING),
        ]);
        let p = plan(&agg, &FixRegistry::default());
        let names: Vec<&str> = p.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a.yaml", "c.yaml"]);
        assert_eq!(p[0].1.len(), 1);
        assert_eq!(p[1].1[0].name, stubs::MAPPING_VALUE_NOT_ALLOWED);
    }

    #[test]
    fn test_dispatch_statuses() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join("a.yaml"), "id: 1\ntitle some value\n").unwrap();
        fs::write(root.join("c.yaml"), "id: 3\nbad: a: b\n").unwrap();
        let agg = aggregate(&[
            rec("a.yaml", MISSING),
            rec("c.yaml", MAPPING),
            rec("gone.yaml", MISSING),
            rec("b.yaml", ALIAS),
        ]);
        let log = dispatch(root, &agg, &FixRegistry::default(), true);
        assert_eq!(log.len(), 3);
        assert_eq!(log[0].filename, "a.yaml");
        assert_eq!(log[0].status, FixStatus::Applied);
        assert_eq!(log[0].fixes.len(), 1);
        assert_eq!(log[1].filename, "gone.yaml");
        assert_eq!(log[1].status, FixStatus::NotFound);
        assert_eq!(log[2].filename, "c.yaml");
        assert_eq!(log[2].status, FixStatus::NoEffectiveFix);
        assert_eq!(
            fs::read_to_string(root.join("a.yaml")).unwrap(),
            "id: 1\ntitle: some value\n"
        );
    }

    #[test]
    fn test_dispatch_preview_does_not_write() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join("a.yaml"), "id: 1\ntitle some value\n").unwrap();
        let agg = aggregate(&[rec("a.yaml", MISSING)]);
        let log = dispatch(root, &agg, &FixRegistry::default(), false);
        assert_eq!(log[0].status, FixStatus::Applied);
        assert_eq!(
            fs::read_to_string(root.join("a.yaml")).unwrap(),
            "id: 1\ntitle some value\n"
        );
    }

    #[test]
    fn test_fixes_fold_in_order_and_isolate_errors() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join("a.yaml"), "id: 1\ntitle some value\n").unwrap();
        // not valid UTF-8
        fs::write(root.join("z.yaml"), [0xffu8, 0xfe, 0x00]).unwrap();
        let mut reg = FixRegistry::default();
        reg.register(
            ErrorPattern::AliasScanIssue,
            FixFunction {
                name: "suffix",
                apply: add_suffix,
            },
        );
        let agg = aggregate(&[
            rec("z.yaml", MISSING),
            rec("a.yaml", MISSING),
            rec("a.yaml", ALIAS),
        ]);
        let log = dispatch(root, &agg, &reg, true);
        assert_eq!(log[0].filename, "z.yaml");
        assert_eq!(log[0].status, FixStatus::Error);
        assert!(log[0].detail.is_some());
        assert_eq!(log[1].status, FixStatus::Applied);
        assert_eq!(log[1].fixes.len(), 2);
        assert_eq!(log[1].fixes[1], "suffix");
        assert_eq!(
            fs::read_to_string(root.join("a.yaml")).unwrap(),
            "id: 1\ntitle: some value\n# seen\n"
        );
    }

    #[test]
    fn test_write_failure_is_isolated() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join("locked.yaml"), "id: 1\nnote: * x\n").unwrap();
        fs::write(root.join("a.yaml"), "id: 2\ntitle some value\n").unwrap();
        *BLOCKED.lock().unwrap() = Some(root.join("locked.yaml"));
        let mut reg = FixRegistry::default();
        reg.register(
            ErrorPattern::AliasScanIssue,
            FixFunction {
                name: "block_write_back",
                apply: block_write_back,
            },
        );
        let agg = aggregate(&[rec("locked.yaml", ALIAS), rec("a.yaml", MISSING)]);
        let log = dispatch(root, &agg, &reg, true);
        *BLOCKED.lock().unwrap() = None;

        assert_eq!(log.len(), 2);
        assert_eq!(log[0].filename, "locked.yaml");
        assert_eq!(log[0].status, FixStatus::Error);
        assert!(log[0].detail.as_deref().unwrap().starts_with("failed to write"));
        assert!(log[0].fixes.is_empty());
        assert_eq!(log[1].filename, "a.yaml");
        assert_eq!(log[1].status, FixStatus::Applied);
        assert_eq!(
            fs::read_to_string(root.join("a.yaml")).unwrap(),
            "id: 2\ntitle: some value\n"
        );
    }

    #[test]
    fn test_valid_document_comes_back_identical() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join("ok.yaml"), "id: 1\nname: test\n").unwrap();
        let agg = aggregate(&[rec("ok.yaml", MISSING), rec("ok.yaml", MAPPING)]);
        let log = dispatch(root, &agg, &FixRegistry::default(), true);
        assert_eq!(log[0].status, FixStatus::NoEffectiveFix);
        assert!(log[0].fixes.is_empty());
        assert_eq!(
            fs::read(root.join("ok.yaml")).unwrap(),
            b"id: 1\nname: test\n"
        );
    }
}
