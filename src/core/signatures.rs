//! Fine-grained bug signatures for the engine fuzzing corpus.
//!
//! A [`SignatureCatalog`] holds the per-issue expected messages, the phrases
//! that mark unimplemented features, and an ordered list of crash signatures.
//! [`SignatureCatalog::match_run`] walks them in that order and reports the
//! first hit as a [`Verdict`].

use std::collections::BTreeMap;

use regex::Regex;
use serde::Serialize;

use crate::types::config::{ExtraSignature, SignaturesConfig};
use crate::types::{AppError, AppResult, RunArtifact};

/// Name of the bin counting runs that matched their issue's expected message
pub const ISSUE_EXPECTED: &str = "issue-expected";

/// Signature whose runs must be replayed before they can be classified
pub const INVALID_STEP: &str = "invalid step";

const BUILTIN_EXPECTED: &[(u32, &str)] = &[
    (
        924,
        "called `Result::unwrap()` on an `Err` value: Corrupt(\"Free block extends beyond page\")",
    ),
    (
        1040,
        "error: entered unreachable code: Like on non-text registers",
    ),
    (1203, "assertion failed: is_empty"),
    (1629, "INFINITE LOOP"),
    (1709, "limbo and rusqlite results do not match"),
    (1731, "Freelist: size is "),
    (1734, "InternalError(\"row [["),
    (1737, "InternalError(\"row [["),
    (1815, "cell_get: idx out of bounds:"),
    (1818, "Freelist: size is"),
    (1975, "expected table or index leaf page"),
    (1991, "corrupted database, cells were to balanced properly"),
    (2024, "limbo and rusqlite results do not match"),
    (2026, "limbo and rusqlite results do not match"),
    (2047, "overflow cell with divider cell was not found"),
    (2074, "`Result::unwrap()` on an `Err` value: CacheFull"),
    (2075, "attempt to shift left with overflow"),
    (2088, "assertion failed: header_size <= 126"),
    (2106, "corrupted database, stack is bigger than expected"),
    (2116, "should return no values for table"),
];

const BUILTIN_NOT_IMPLEMENTED: &[&str] = &[
    "not implemented",
    "not supported",
    "not yet implemented",
    "todo",
    "no such module",
    "not a valid pragma name",
    "no such table: sqlite_stat1",
    "only passive mode supported",
    "create index is disabled by default",
    "unknown function",
    "enabled only with",
    "cannot use expressions in",
    "NOT NULL constraint failed",
];

/// Text predicate over a run's stderr
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Case-insensitive substring
    Contains(String),
    /// Case-sensitive substring
    ContainsExact(String),
    Pattern(Regex),
    AnyOf(Vec<Matcher>),
    AllOf(Vec<Matcher>),
    Not(Box<Matcher>),
}

impl Matcher {
    pub fn contains(needle: &str) -> Self {
        Matcher::Contains(needle.to_lowercase())
    }

    pub fn exact(needle: &str) -> Self {
        Matcher::ContainsExact(needle.to_string())
    }

    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Matcher::Pattern)
    }

    /// `raw` is the stderr as captured, `lower` its lowercase form
    pub fn is_match(&self, raw: &str, lower: &str) -> bool {
        match self {
            Matcher::Contains(needle) => lower.contains(needle.as_str()),
            Matcher::ContainsExact(needle) => raw.contains(needle.as_str()),
            Matcher::Pattern(re) => re.is_match(raw),
            Matcher::AnyOf(all) => all.iter().any(|m| m.is_match(raw, lower)),
            Matcher::AllOf(all) => all.iter().all(|m| m.is_match(raw, lower)),
            Matcher::Not(inner) => !inner.is_match(raw, lower),
        }
    }

    /// Short human-readable form for catalog listings
    pub fn describe(&self) -> String {
        match self {
            Matcher::Contains(needle) => format!("contains {needle:?} (any case)"),
            Matcher::ContainsExact(needle) => format!("contains {needle:?}"),
            Matcher::Pattern(re) => format!("matches /{}/", re.as_str()),
            Matcher::AnyOf(all) => format!(
                "any of [{}]",
                all.iter().map(Matcher::describe).collect::<Vec<_>>().join(", ")
            ),
            Matcher::AllOf(all) => all
                .iter()
                .map(Matcher::describe)
                .collect::<Vec<_>>()
                .join(" and "),
            Matcher::Not(inner) => format!("not ({})", inner.describe()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureAction {
    /// Count as a known true positive under the signature's name
    Known,
    /// Replay the run's SQL log before deciding
    Replay,
}

#[derive(Debug, Clone)]
pub struct Signature {
    pub name: String,
    pub matcher: Matcher,
    pub action: SignatureAction,
}

impl Signature {
    fn known(name: &str, matcher: Matcher) -> Self {
        Self {
            name: name.to_string(),
            matcher,
            action: SignatureAction::Known,
        }
    }
}

/// How the catalog classified a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict<'a> {
    IssueExpected,
    NotImplemented,
    Known(&'a str),
    Replay(&'a str),
    Unknown,
}

#[derive(Debug, Clone)]
pub struct SignatureCatalog {
    pub expected: BTreeMap<String, String>,
    pub not_implemented: Vec<String>,
    pub signatures: Vec<Signature>,
    pub inspect_cmd: String,
}

impl Default for SignatureCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SignatureCatalog {
    pub fn builtin() -> Self {
        Self {
            expected: BUILTIN_EXPECTED
                .iter()
                .map(|(issue, msg)| (issue.to_string(), msg.to_string()))
                .collect(),
            not_implemented: BUILTIN_NOT_IMPLEMENTED
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
            signatures: builtin_signatures(),
            inspect_cmd: crate::types::config::DEFAULT_INSPECT_CMD.to_string(),
        }
    }

    /// Built-in catalog extended by the `[signatures]` config section
    pub fn from_config(cfg: &SignaturesConfig) -> AppResult<Self> {
        let mut catalog = Self::builtin();
        catalog.expected.extend(
            cfg.expected()
                .into_iter()
                .map(|(issue, msg)| (issue_key(&issue), msg)),
        );
        catalog.not_implemented.extend(
            cfg.not_implemented()
                .iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty()),
        );
        for extra in cfg.extra() {
            catalog.signatures.push(extra_signature(extra)?);
        }
        catalog.inspect_cmd = cfg.inspect_cmd().to_string();
        Ok(catalog)
    }

    pub fn expected_for(&self, issue: &str) -> Option<&str> {
        self.expected
            .get(&issue_key(issue))
            .map(String::as_str)
            .filter(|msg| !msg.is_empty())
    }

    pub fn is_not_implemented(&self, lower_stderr: &str) -> bool {
        self.not_implemented
            .iter()
            .any(|phrase| lower_stderr.contains(phrase.as_str()))
    }

    /// Signature names in evaluation order, followed by the issue-expected bin
    pub fn bin_names(&self) -> Vec<&str> {
        self.signatures
            .iter()
            .map(|s| s.name.as_str())
            .chain(std::iter::once(ISSUE_EXPECTED))
            .collect()
    }

    /// Match a run of `issue` against the catalog, first hit wins
    pub fn match_run(&self, issue: &str, artifact: &RunArtifact) -> Verdict<'_> {
        let raw = artifact.stderr.as_str();
        if let Some(expected) = self.expected_for(issue)
            && raw.contains(expected)
        {
            return Verdict::IssueExpected;
        }

        let lower = raw.to_lowercase();
        if self.is_not_implemented(&lower) {
            return Verdict::NotImplemented;
        }

        match self.signatures.iter().find(|s| s.matcher.is_match(raw, &lower)) {
            Some(sig) if sig.action == SignatureAction::Replay => Verdict::Replay(&sig.name),
            Some(sig) => Verdict::Known(&sig.name),
            None => Verdict::Unknown,
        }
    }
}

fn builtin_signatures() -> Vec<Signature> {
    vec![
        Signature::known(
            "update c0 = c0",
            Matcher::Pattern(
                Regex::new(r#"column\s+"c\d+"\s+specified\s+more\s+than\s+once\s+at"#)
                    .expect("built-in pattern is valid"),
            ),
        ),
        Signature::known(
            "commit transaction",
            Matcher::AllOf(vec![
                Matcher::Not(Box::new(Matcher::exact("BEGIN TRANSACTION"))),
                Matcher::AnyOf(vec![
                    Matcher::exact("COMMIT TRANSACTION"),
                    Matcher::exact("COMMIT"),
                    Matcher::exact("END TRANSACTION"),
                    Matcher::exact("END"),
                    Matcher::exact("ROLLBACK TRANSACTION"),
                ]),
            ]),
        ),
        Signature {
            name: INVALID_STEP.to_string(),
            matcher: Matcher::contains("step() returned invalid result"),
            action: SignatureAction::Replay,
        },
        Signature::known(
            "like on non-text",
            Matcher::contains(
                "internal error: entered unreachable code: like on non-text registers",
            ),
        ),
        Signature::known(
            "invalid page type",
            Matcher::contains(
                "called `result::unwrap()` on an `err` value: corrupt(\"invalid page type: 1\")",
            ),
        ),
        Signature::known(
            "optimize no rewrite",
            Matcher::contains(
                "internal error: entered unreachable code: expression should have been rewritten",
            ),
        ),
        Signature::known(
            "id rewrite as col",
            Matcher::contains("id should have been rewritten as column"),
        ),
        Signature::known(
            "header sz gt nr",
            Matcher::contains("assertion failed: (header_size as usize) >= nr"),
        ),
        Signature::known("invalid float", Matcher::contains("invalid float literal")),
    ]
}

/// Numeric issue ids compare by value, so `01203` and `1203` share an entry
fn issue_key(issue: &str) -> String {
    if !issue.is_empty() && issue.bytes().all(|b| b.is_ascii_digit()) {
        let trimmed = issue.trim_start_matches('0');
        if trimmed.is_empty() { "0" } else { trimmed }.to_string()
    } else {
        issue.to_string()
    }
}

fn extra_signature(extra: &ExtraSignature) -> AppResult<Signature> {
    let matcher = match (&extra.contains, &extra.regex) {
        (Some(needle), None) => Matcher::contains(needle),
        (None, Some(pattern)) => Matcher::pattern(pattern).map_err(|e| {
            AppError::Config(format!("signature '{}' has an invalid regex: {e}", extra.name))
        })?,
        _ => {
            return Err(AppError::Config(format!(
                "signature '{}' must set exactly one of `contains` or `regex`",
                extra.name
            )));
        }
    };
    Ok(Signature::known(extra.name.trim(), matcher))
}
