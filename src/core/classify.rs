use std::collections::BTreeSet;

use crate::types::{Outcome, RunArtifact};

const NOT_YET_IMPLEMENTED: &str = "not yet implemented";
const BUG_MARKERS: &[&str] = &["panic", "simulation failed"];

/// Lowercased view of a run's output used by the case-insensitive rules
pub struct LoweredRun<'a> {
    pub artifact: &'a RunArtifact,
    pub stdout: String,
    pub stderr: String,
}

impl<'a> LoweredRun<'a> {
    pub fn new(artifact: &'a RunArtifact) -> Self {
        Self {
            artifact,
            stdout: artifact.stdout.to_lowercase(),
            stderr: artifact.stderr.to_lowercase(),
        }
    }

    /// Whether either stream contains `needle`, which must already be lowercase
    pub fn mentions(&self, needle: &str) -> bool {
        self.stderr.contains(needle) || self.stdout.contains(needle)
    }

    /// Non-zero exit, a panic, or a simulator failure
    pub fn is_bug(&self) -> bool {
        self.artifact.exit_code != 0 || BUG_MARKERS.iter().any(|m| self.mentions(m))
    }
}

type Rule = fn(&LoweredRun, &BTreeSet<String>) -> bool;

fn unimplemented_feature(run: &LoweredRun, _known: &BTreeSet<String>) -> bool {
    run.stderr.contains(NOT_YET_IMPLEMENTED)
}

fn not_a_bug(run: &LoweredRun, _known: &BTreeSet<String>) -> bool {
    !run.is_bug()
}

fn known_message(run: &LoweredRun, known: &BTreeSet<String>) -> bool {
    known.iter().any(|msg| run.mentions(&msg.to_lowercase()))
}

/// Ordered classification rules, first match wins
const RULES: &[(Outcome, Rule)] = &[
    (Outcome::FalsePositive, unimplemented_feature),
    (Outcome::Negative, not_a_bug),
    (Outcome::KnownTruePositive, known_message),
];

/// Classify a run against the known messages of its commit or issue
pub fn classify_run(artifact: &RunArtifact, known: &BTreeSet<String>) -> Outcome {
    let run = LoweredRun::new(artifact);
    RULES
        .iter()
        .find(|(_, rule)| rule(&run, known))
        .map(|(outcome, _)| *outcome)
        .unwrap_or(Outcome::UnknownTruePositive)
}
