use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

/// One row of the bug tracker export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BugRecord {
    pub issue: String,
    pub commit_ids: BTreeSet<String>,
    pub message: String,
}

/// Known error messages keyed by commit and by issue
#[derive(Debug, Clone, Default)]
pub struct SignatureIndex {
    commits: HashMap<String, BTreeSet<String>>,
    issues: HashMap<String, BTreeSet<String>>,
}

impl SignatureIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: &BugRecord) {
        if record.message.is_empty() {
            return;
        }
        if !record.issue.is_empty() {
            self.issues
                .entry(record.issue.clone())
                .or_default()
                .insert(record.message.clone());
        }
        for commit in record.commit_ids.iter().filter(|c| !c.is_empty()) {
            self.commits
                .entry(commit.clone())
                .or_default()
                .insert(record.message.clone());
        }
    }

    pub fn for_commit(&self, commit: &str) -> Option<&BTreeSet<String>> {
        self.commits.get(commit)
    }

    pub fn for_issue(&self, issue: &str) -> Option<&BTreeSet<String>> {
        self.issues.get(issue)
    }

    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }
}

impl<'a> FromIterator<&'a BugRecord> for SignatureIndex {
    fn from_iter<I: IntoIterator<Item = &'a BugRecord>>(iter: I) -> Self {
        let mut index = SignatureIndex::new();
        for record in iter {
            index.insert(record);
        }
        index
    }
}
