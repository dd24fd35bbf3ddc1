//! Output rendering for validation, pattern, and fix reports.
//!
//! Supports `human` (default) and `json` outputs. The JSON forms are the
//! same documents written as report artifacts.

use crate::aggregate::Aggregation;
use crate::models::{FixLogEntry, FixStatus, ValidationReport};
use crate::pipeline::RunReport;
use crate::store::StoreError;
use crate::validate::DocumentOutcome;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::fs;
use std::path::{Path, PathBuf};

pub const VALIDATION_REPORT: &str = "validation_report.json";
pub const PATTERN_REPORT: &str = "error_patterns.json";
pub const FIX_REPORT: &str = "fix_report.json";

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

fn pretty(v: &JsonVal) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| "null".to_string())
}

/// Compose validation JSON object (pure) for testing/snapshot purposes.
pub fn compose_validation_json(report: &ValidationReport) -> JsonVal {
    serde_json::to_value(report).unwrap_or(JsonVal::Null)
}

/// Compose fix-log JSON array (pure) for testing/snapshot purposes.
pub fn compose_fix_json(entries: &[FixLogEntry]) -> JsonVal {
    serde_json::to_value(entries).unwrap_or(JsonVal::Null)
}

/// Compose the combined JSON printed on stdout for a run.
pub fn compose_run_json(run: &RunReport, fix: bool) -> JsonVal {
    let mut out = json!({
        "validation": compose_validation_json(&run.validation.report),
        "patterns": run.patterns.to_report_json(),
    });
    if fix {
        out["fixes"] = compose_fix_json(&run.fixes);
        out["revalidation"] = match &run.revalidation {
            Some(r) => compose_validation_json(r),
            None => JsonVal::Null,
        };
    }
    out
}

/// Print a run in the requested format.
pub fn print_run(run: &RunReport, output: &str, fix: bool, write: bool) {
    match output {
        "json" => println!("{}", pretty(&compose_run_json(run, fix))),
        _ => {
            let color = use_colors(output);
            print_failures(&run.validation.outcomes, &run.patterns, color);
            print_patterns(&run.patterns, color);
            if fix {
                print_fixes(&run.fixes, write, color);
            }
            let r = &run.validation.report;
            let mut summary = format!(
                "— Summary — passed={} failed={} total={} patterns={}",
                r.processed_count,
                r.error_files.len(),
                r.total_analyzed,
                run.patterns.buckets.len()
            );
            if fix {
                summary.push_str(&format!(
                    " fixed={}{}",
                    run.applied_count(),
                    if write { "" } else { " (preview)" }
                ));
            }
            if let Some(after) = &run.revalidation {
                summary.push_str(&format!(" remaining={}", after.error_files.len()));
            }
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

fn print_failures(outcomes: &[DocumentOutcome], patterns: &Aggregation, color: bool) {
    for o in outcomes {
        let Some(msg) = o.result.raw_message.as_deref() else {
            continue;
        };
        let tag = patterns
            .buckets
            .iter()
            .find(|b| b.examples.iter().any(|e| e.filename == o.name))
            .map(|b| b.pattern.to_string())
            .unwrap_or_default();
        let loc = match o.result.location {
            Some((line, col)) => format!(":{}:{}", line, col),
            None => String::new(),
        };
        let first = msg.lines().next().unwrap_or("");
        if color {
            println!(
                "{} {}{} ❲{}❳ — {}",
                "✖".red(),
                o.name.clone().bold(),
                loc,
                tag.yellow(),
                first
            );
        } else {
            println!("✖ {}{} ❲{}❳ — {}", o.name, loc, tag, first);
        }
    }
}

fn print_patterns(patterns: &Aggregation, color: bool) {
    for (pattern, count) in patterns.counts_by_frequency() {
        if color {
            println!("{:>5}  {}", count.to_string().bold(), pattern.cyan());
        } else {
            println!("{:>5}  {}", count, pattern);
        }
    }
}

fn print_fixes(entries: &[FixLogEntry], write: bool, color: bool) {
    for e in entries {
        let (icon, label) = match e.status {
            FixStatus::Applied if write => ("✏️ ", "fixed:"),
            FixStatus::Applied => ("✏️ ", "would fix:"),
            FixStatus::NoEffectiveFix => ("·", "no effective fix:"),
            FixStatus::NotFound => ("?", "not found:"),
            FixStatus::Error => ("✖", "error:"),
        };
        let mut line = if color {
            let label = match e.status {
                FixStatus::Applied => label.green().bold().to_string(),
                FixStatus::Error => label.red().bold().to_string(),
                _ => label.bright_black().to_string(),
            };
            format!("{} {} {}", icon, label, e.filename.clone().bold())
        } else {
            format!("{} {} {}", icon, label, e.filename)
        };
        if !e.fixes.is_empty() {
            line.push_str(&format!(" ({})", e.fixes.join("; ")));
        }
        if let Some(d) = &e.detail {
            line.push_str(&format!(" — {}", d));
        }
        println!("{}", line);
    }
}

/// Write report artifacts into `dir`, creating it when needed.
///
/// The fix report is only written when the fix stage ran.
pub fn write_reports(dir: &Path, run: &RunReport, fix: bool) -> Result<Vec<PathBuf>, StoreError> {
    fs::create_dir_all(dir).map_err(|source| StoreError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut docs = vec![
        (
            VALIDATION_REPORT,
            compose_validation_json(&run.validation.report),
        ),
        (PATTERN_REPORT, run.patterns.to_report_json()),
    ];
    if fix {
        docs.push((FIX_REPORT, compose_fix_json(&run.fixes)));
    }
    let mut written = Vec::new();
    for (name, value) in docs {
        let path = dir.join(name);
        fs::write(&path, format!("{}\n", pretty(&value))).map_err(|source| {
            StoreError::Write {
                path: path.clone(),
                source,
            }
        })?;
        written.push(path);
    }
    Ok(written)
}
