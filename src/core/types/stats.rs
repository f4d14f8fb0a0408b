use std::cmp::Ordering;

use serde::Serialize;

use crate::types::Outcome;

/// Per-issue tally of run outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IssueCounts {
    pub tp_known: usize,
    pub tp_unknown: usize,
    pub false_positive: usize,
    pub negative: usize,
}

impl IssueCounts {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::KnownTruePositive => self.tp_known += 1,
            Outcome::UnknownTruePositive => self.tp_unknown += 1,
            Outcome::FalsePositive => self.false_positive += 1,
            Outcome::Negative => self.negative += 1,
        }
    }

    /// (TP_known, TP_unknown, FP, Neg)
    pub fn as_tuple(&self) -> (usize, usize, usize, usize) {
        (
            self.tp_known,
            self.tp_unknown,
            self.false_positive,
            self.negative,
        )
    }

    pub fn total(&self) -> usize {
        self.tp_known + self.tp_unknown + self.false_positive + self.negative
    }
}

/// Outcome counts for one issue, serialized flat for JSON reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueSummary {
    pub issue: String,
    #[serde(flatten)]
    pub counts: IssueCounts,
}

/// Order issue identifiers numerically when both are numeric.
/// Numeric identifiers sort before non-numeric ones, which sort lexically.
pub fn compare_issues(a: &str, b: &str) -> Ordering {
    match (parse_issue_number(a), parse_issue_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn parse_issue_number(issue: &str) -> Option<u128> {
    if !issue.is_empty() && issue.bytes().all(|b| b.is_ascii_digit()) {
        issue.parse().ok()
    } else {
        None
    }
}
