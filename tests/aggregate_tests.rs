use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::{TempDir, tempdir};
use triage::types::{BugRecord, IssueCounts, Outcome, RunArtifact, SignatureIndex, compare_issues};
use triage::{classify_run, summarize_tracker};

/// Write a run directory with the given artifacts; `None` leaves the file out
fn write_run(
    root: &Path,
    issue: &str,
    run: &str,
    stdout: Option<&str>,
    stderr: Option<&str>,
    exit_code: Option<&str>,
) {
    let dir = root.join(issue).join(run);
    fs::create_dir_all(&dir).expect("Failed to create run directory");
    if let Some(text) = stdout {
        fs::write(dir.join("stdout.txt"), text).unwrap();
    }
    if let Some(text) = stderr {
        fs::write(dir.join("stderr.txt"), text).unwrap();
    }
    if let Some(text) = exit_code {
        fs::write(dir.join("exit_code.txt"), text).unwrap();
    }
}

fn index() -> SignatureIndex {
    let records = [
        BugRecord {
            issue: "1731".to_string(),
            commit_ids: ["c0ffee".to_string()].into_iter().collect(),
            message: "Freelist: size is".to_string(),
        },
        BugRecord {
            issue: "2075".to_string(),
            commit_ids: ["beef".to_string()].into_iter().collect(),
            message: "attempt to shift left with overflow".to_string(),
        },
    ];
    records.iter().collect()
}

fn results_tree() -> TempDir {
    let root = tempdir().expect("Failed to create temp directory");
    let p = root.path();

    // Issue resolved through commit.txt
    fs::create_dir_all(p.join("1731")).unwrap();
    fs::write(p.join("1731").join("commit.txt"), "c0ffee\n").unwrap();
    write_run(p, "1731", "iter-1", None, Some("FREELIST: size is 3"), Some("1\n"));
    write_run(p, "1731", "iter-2", None, Some("segfault"), Some("139"));
    write_run(p, "1731", "iter-3", None, Some("not yet implemented: CTE"), Some("1"));
    write_run(p, "1731", "iter-4", Some("ok"), Some(""), Some("0"));
    write_run(p, "1731", "iter-5", None, None, None);
    // Not matching the run prefix
    write_run(p, "1731", "run-1", None, Some("segfault"), Some("139"));
    // Stray file next to the runs
    fs::write(p.join("1731").join("notes.md"), "flaky").unwrap();

    // Issue without commit.txt falls back to the issue map
    write_run(p, "2075", "iter-1", None, Some("attempt to shift left with overflow"), Some("101"));
    write_run(p, "2075", "iter-2", Some("thread panicked"), None, Some("garbage"));

    // Commit with no known messages
    fs::create_dir_all(p.join("10")).unwrap();
    fs::write(p.join("10").join("commit.txt"), "unknown-sha").unwrap();
    write_run(p, "10", "iter-1", None, Some("Freelist: size is 3"), Some("1"));

    // Non-numeric issue and a stray file at the root
    write_run(p, "adhoc", "iter-1", None, Some("simulation failed"), None);
    fs::write(p.join("README"), "results").unwrap();

    root
}

#[test]
fn tracker_summary_counts_each_issue() {
    let root = results_tree();
    let report = summarize_tracker(root.path(), &index(), "iter-").unwrap();

    let rows: Vec<(String, (usize, usize, usize, usize))> = report
        .issues
        .iter()
        .map(|s| (s.issue.clone(), s.counts.as_tuple()))
        .collect();

    assert_eq!(
        rows,
        vec![
            ("10".to_string(), (0, 1, 0, 0)),
            ("1731".to_string(), (1, 1, 1, 2)),
            ("2075".to_string(), (1, 1, 0, 0)),
            ("adhoc".to_string(), (0, 1, 0, 0)),
        ]
    );
}

#[test]
fn run_prefix_selects_run_directories() {
    let root = results_tree();
    let report = summarize_tracker(root.path(), &index(), "run-").unwrap();

    let issue = report
        .issues
        .iter()
        .find(|s| s.issue == "1731")
        .expect("issue 1731 is reported");
    assert_eq!(
        issue.counts,
        IssueCounts {
            tp_unknown: 1,
            ..IssueCounts::default()
        }
    );
    assert_eq!(
        report.issues.iter().map(|s| s.counts.total()).sum::<usize>(),
        1
    );
}

#[test]
fn issues_sort_numerically_then_lexically() {
    let mut issues = vec!["adhoc", "10", "2", "1629", "Zeta", "002"];
    issues.sort_by(|a, b| compare_issues(a, b));
    assert_eq!(issues, vec!["002", "2", "10", "1629", "Zeta", "adhoc"]);
}

#[test]
fn missing_results_directory_is_an_error() {
    let root = tempdir().unwrap();
    assert!(summarize_tracker(&root.path().join("nope"), &index(), "iter-").is_err());
}

#[test]
fn exit_codes_beyond_i32_still_count_as_failures() {
    let root = tempdir().unwrap();
    write_run(root.path(), "1", "iter-1", Some(""), Some(""), Some("3221225477\n"));
    write_run(root.path(), "1", "iter-2", Some(""), Some(""), Some("3000000000000000000000"));

    let known = Default::default();
    for run in ["iter-1", "iter-2"] {
        let artifact = RunArtifact::load(&root.path().join("1").join(run)).unwrap();
        assert_ne!(artifact.exit_code, 0, "run {run}");
        assert_eq!(classify_run(&artifact, &known), Outcome::UnknownTruePositive);
    }
}

#[test]
fn invalid_utf8_artifacts_load_lossily() {
    let root = tempdir().unwrap();
    write_run(root.path(), "1", "iter-1", None, None, Some("0"));
    let run_dir = root.path().join("1").join("iter-1");
    fs::write(run_dir.join("stderr.txt"), b"\xff\xfe thread panicked \xc3(").unwrap();

    let artifact = RunArtifact::load(&run_dir).unwrap();
    assert!(artifact.stderr.contains('\u{fffd}'));
    assert!(artifact.stderr.contains("thread panicked"));
    assert_eq!(
        classify_run(&artifact, &Default::default()),
        Outcome::UnknownTruePositive
    );

    let report = summarize_tracker(root.path(), &index(), "iter-").unwrap();
    assert_eq!(report.issues[0].counts.as_tuple(), (0, 1, 0, 0));
}
