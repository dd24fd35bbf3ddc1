use std::fs;
use std::path::Path;
use tempfile::TempDir;
use yamltriage::classify::ErrorPattern;
use yamltriage::models::FixStatus;
use yamltriage::output;
use yamltriage::pipeline::{run, RunOptions};

fn setup_docs() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::write(root.join("valid.yaml"), "id: 1\nname: test\n").unwrap();
    fs::write(
        root.join("missing_colon.yaml"),
        "id: 2\ntitle some value\nname: second\n",
    )
    .unwrap();
    fs::write(root.join("alias.yaml"), "id: 3\nnote: * stray marker\n").unwrap();
    fs::write(root.join("seed.yaml"), "this is: [not parsed\n").unwrap();
    tmp
}

fn opts(root: &Path) -> RunOptions {
    RunOptions {
        root: root.to_path_buf(),
        exclude: vec!["seed.yaml".to_string()],
        extensions: vec!["yaml".to_string(), "yml".to_string()],
        required_key: "id".to_string(),
        fix: true,
        write: true,
    }
}

#[test]
fn end_to_end_classifies_and_repairs() {
    let tmp = setup_docs();
    let report = run(&opts(tmp.path())).unwrap();

    let validation = output::compose_validation_json(&report.validation.report);
    assert_eq!(validation["processed_count"], 1);
    assert_eq!(validation["total_analyzed"], 3);
    assert_eq!(validation["error_files"].as_array().unwrap().len(), 2);

    let patterns = report.patterns.to_report_json();
    let counts = patterns["error_pattern_counts"].as_object().unwrap();
    assert_eq!(counts.len(), 2);
    assert_eq!(counts["MISSING_COLON"], 1);
    assert_eq!(counts["ALIAS_SCAN_ISSUE"], 1);
    assert_eq!(
        patterns["detailed_errors_by_pattern"]["MISSING_COLON"][0]["filename"],
        "missing_colon.yaml"
    );
    assert_eq!(
        report
            .patterns
            .get(&ErrorPattern::AliasScanIssue)
            .unwrap()
            .examples[0]
            .filename,
        "alias.yaml"
    );

    assert_eq!(report.fixes.len(), 1);
    assert_eq!(report.fixes[0].filename, "missing_colon.yaml");
    assert_eq!(report.fixes[0].status, FixStatus::Applied);
    assert!(report.fixes.iter().all(|e| e.filename != "alias.yaml"));
    let fixes = output::compose_fix_json(&report.fixes);
    assert_eq!(fixes[0]["status"], "Applied");

    assert_eq!(
        fs::read_to_string(tmp.path().join("missing_colon.yaml")).unwrap(),
        "id: 2\ntitle: some value\nname: second\n"
    );
    let after = report.revalidation.unwrap();
    assert_eq!(after.processed_count, 2);
    assert_eq!(after.error_files.len(), 1);
    assert_eq!(after.error_files[0].filename, "alias.yaml");
}

#[test]
fn second_run_is_idempotent() {
    let tmp = setup_docs();
    run(&opts(tmp.path())).unwrap();
    let fixed = fs::read_to_string(tmp.path().join("missing_colon.yaml")).unwrap();
    let alias = fs::read_to_string(tmp.path().join("alias.yaml")).unwrap();

    let second = run(&opts(tmp.path())).unwrap();
    assert_eq!(second.validation.report.processed_count, 2);
    assert!(second.patterns.get(&ErrorPattern::MissingColon).is_none());
    assert!(second.fixes.is_empty());
    assert!(second.revalidation.is_none());
    assert_eq!(
        fs::read_to_string(tmp.path().join("missing_colon.yaml")).unwrap(),
        fixed
    );
    assert_eq!(fs::read_to_string(tmp.path().join("alias.yaml")).unwrap(), alias);
}

#[test]
fn preview_mode_leaves_files_alone() {
    let tmp = setup_docs();
    let mut o = opts(tmp.path());
    o.write = false;
    let report = run(&o).unwrap();
    assert_eq!(report.applied_count(), 1);
    assert!(report.revalidation.is_none());
    assert_eq!(
        fs::read_to_string(tmp.path().join("missing_colon.yaml")).unwrap(),
        "id: 2\ntitle some value\nname: second\n"
    );
}

#[test]
fn every_file_failing_still_yields_complete_reports() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.yaml"), "- just\n- a list\n").unwrap();
    fs::write(tmp.path().join("b.yaml"), "name: no id\n").unwrap();
    let report = run(&opts(tmp.path())).unwrap();
    assert_eq!(report.validation.report.processed_count, 0);
    assert_eq!(report.validation.report.total_analyzed, 2);
    let tags: Vec<&str> = report
        .patterns
        .buckets
        .iter()
        .map(|b| b.pattern.as_str())
        .collect();
    assert_eq!(tags, vec!["Content is not a dictionary", "'id' is missing"]);
    assert!(report.fixes.is_empty());

    let dir = tmp.path().join("reports");
    let written = output::write_reports(&dir, &report, true).unwrap();
    assert_eq!(written.len(), 3);
}
