use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::types::{AppResult, BugRecord, SignatureIndex};

#[derive(Debug, Deserialize)]
struct BugRow {
    #[serde(rename = "Issue", default)]
    issue: Option<String>,
    #[serde(rename = "Commit IDs", default)]
    commit_ids: Option<String>,
    #[serde(rename = "Error message", default)]
    message: Option<String>,
}

impl BugRow {
    // Short rows and empty cells arrive as None
    fn into_record(self) -> Option<BugRecord> {
        let message = self.message.as_deref().unwrap_or("").trim();
        if message.is_empty() {
            return None;
        }
        Some(BugRecord {
            issue: self.issue.as_deref().unwrap_or("").trim().to_string(),
            commit_ids: self
                .commit_ids
                .as_deref()
                .unwrap_or("")
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect(),
            message: message.to_string(),
        })
    }
}

/// Read bug records from a CSV export with `Issue`, `Commit IDs` and `Error message` columns.
/// Rows without an error message are skipped; missing columns read as empty.
pub fn read_bug_records<R: Read>(reader: R) -> AppResult<Vec<BugRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in csv_reader.deserialize::<BugRow>() {
        if let Some(record) = row?.into_record() {
            records.push(record);
        }
    }
    Ok(records)
}

pub fn load_bug_index(path: &Path) -> AppResult<SignatureIndex> {
    let records = read_bug_records(File::open(path)?)?;
    let index: SignatureIndex = records.iter().collect();
    debug!(
        "Loaded {} bug records from {} ({} commits, {} issues)",
        records.len(),
        path.display(),
        index.commit_count(),
        index.issue_count()
    );
    Ok(index)
}
