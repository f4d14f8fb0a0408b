use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Serialize, Serializer};

use crate::core::classify::classify_run;
use crate::core::replay::{SqliteOracle, extract_replay_log};
use crate::core::signatures::{ISSUE_EXPECTED, SignatureCatalog, Verdict};
use crate::types::{
    AppError, AppResult, IssueCounts, IssueSummary, Outcome, RunArtifact, SignatureIndex,
    compare_issues, read_optional,
};

pub const COMMIT_FILE: &str = "commit.txt";

/// Sorted (name, path) pairs of the subdirectories of `dir`
pub fn list_subdirs(dir: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push((entry.file_name().to_string_lossy().into_owned(), path));
        }
    }
    dirs.sort_by(|a, b| compare_issues(&a.0, &b.0));
    Ok(dirs)
}

/// Per-issue outcome counts for the bug-tracker pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackerReport {
    pub issues: Vec<IssueSummary>,
}

/// Known messages that apply to an issue directory: the commit named in
/// `commit.txt`, or the issue's own messages when that file is missing
fn known_messages<'a>(
    issue: &str,
    issue_dir: &Path,
    index: &'a SignatureIndex,
) -> AppResult<Option<&'a BTreeSet<String>>> {
    match read_optional(&issue_dir.join(COMMIT_FILE))? {
        Some(commit) => Ok(index.for_commit(commit.trim())),
        None => {
            warn!("No {COMMIT_FILE} for issue {issue}, falling back to issue messages");
            Ok(index.for_issue(issue))
        }
    }
}

/// Classify every run directory starting with `run_prefix` under each issue of `results`
pub fn summarize_tracker(
    results: &Path,
    index: &SignatureIndex,
    run_prefix: &str,
) -> AppResult<TrackerReport> {
    let empty = BTreeSet::new();
    let mut report = TrackerReport::default();

    for (issue, issue_dir) in list_subdirs(results)? {
        let known = known_messages(&issue, &issue_dir, index)?.unwrap_or(&empty);
        let mut counts = IssueCounts::default();

        for (run, run_dir) in list_subdirs(&issue_dir)? {
            if !run.starts_with(run_prefix) {
                continue;
            }
            let artifact = RunArtifact::load(&run_dir)?;
            let outcome = classify_run(&artifact, known);
            debug!("{issue}/{run}: {}", outcome.display());
            counts.record(outcome);
        }

        report.issues.push(IssueSummary { issue, counts });
    }

    Ok(report)
}

/// A run that needs a human to look at it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunCase {
    pub issue: String,
    pub run: String,
    pub artifact: RunArtifact,
}

/// A run whose replayed statement log ran cleanly on the reference engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManualInspection {
    #[serde(flatten)]
    pub case: RunCase,
    pub replay_log: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureIssueReport {
    pub issue: String,
    #[serde(flatten)]
    pub counts: IssueCounts,
    /// Non-zero signature bins, in catalog order
    #[serde(serialize_with = "serialize_bins")]
    pub known_counts: Vec<(String, usize)>,
}

// Bins render as a `{name: count}` object that keeps catalog order
fn serialize_bins<S: Serializer>(
    bins: &[(String, usize)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(bins.iter().map(|(name, n)| (name, n)))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignatureReport {
    pub issues: Vec<SignatureIssueReport>,
    pub unknowns: Vec<RunCase>,
    pub manual_inspections: Vec<ManualInspection>,
}

/// Classify every run of every issue under `results` against the catalog.
///
/// Each entry of `results` must be an issue directory. Runs hitting a replay
/// signature are replayed on `oracle`; a missing log marker aborts the walk.
pub async fn summarize_signatures(
    results: &Path,
    catalog: &SignatureCatalog,
    oracle: &SqliteOracle,
) -> AppResult<SignatureReport> {
    let mut issues = Vec::new();
    for entry in fs::read_dir(results)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            return Err(AppError::NotADirectory(path));
        }
        issues.push((entry.file_name().to_string_lossy().into_owned(), path));
    }
    issues.sort_by(|a, b| compare_issues(&a.0, &b.0));

    let mut report = SignatureReport::default();
    for (issue, issue_dir) in issues {
        let mut counts = IssueCounts::default();
        let bins = catalog.bin_names();
        let mut bin_counts = vec![0usize; bins.len()];

        for (run, run_dir) in list_subdirs(&issue_dir)? {
            let artifact = RunArtifact::load(&run_dir)?;
            let outcome = match catalog.match_run(&issue, &artifact) {
                Verdict::IssueExpected => {
                    bump(&bins, &mut bin_counts, ISSUE_EXPECTED);
                    Outcome::KnownTruePositive
                }
                Verdict::NotImplemented => Outcome::FalsePositive,
                Verdict::Known(name) => {
                    bump(&bins, &mut bin_counts, name);
                    Outcome::KnownTruePositive
                }
                Verdict::Replay(name) => {
                    let replay_log = extract_replay_log(&artifact.stderr)?;
                    match oracle.replay(&replay_log).await {
                        Ok(()) => {
                            debug!("{issue}/{run}: {name} replayed cleanly, needs inspection");
                            report.manual_inspections.push(ManualInspection {
                                case: RunCase {
                                    issue: issue.clone(),
                                    run: run.clone(),
                                    artifact,
                                },
                                replay_log,
                            });
                            Outcome::UnknownTruePositive
                        }
                        Err(e) => {
                            debug!("{issue}/{run}: {name} replay failed: {e}");
                            Outcome::FalsePositive
                        }
                    }
                }
                Verdict::Unknown => {
                    report.unknowns.push(RunCase {
                        issue: issue.clone(),
                        run: run.clone(),
                        artifact,
                    });
                    Outcome::UnknownTruePositive
                }
            };
            debug!("{issue}/{run}: {}", outcome.display());
            counts.record(outcome);
        }

        let known_counts = bins
            .iter()
            .zip(bin_counts)
            .filter(|(_, n)| *n > 0)
            .map(|(name, n)| (name.to_string(), n))
            .collect();
        report.issues.push(SignatureIssueReport {
            issue,
            counts,
            known_counts,
        });
    }

    Ok(report)
}

fn bump(bins: &[&str], counts: &mut [usize], name: &str) {
    if let Some(pos) = bins.iter().position(|b| *b == name) {
        counts[pos] += 1;
    }
}
