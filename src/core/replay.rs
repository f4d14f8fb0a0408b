use log::debug;
use sqlx::Connection;
use sqlx::sqlite::SqliteConnection;

use crate::types::ExtractError;

const ASSERTION_MARKER: &str = "java.lang.AssertionError:";
const STATEMENT_END: &str = ";\n";
const LOG_START_MARKER: &str = "-- Time:";

/// Rebuild the SQL statement log a failing run printed to stderr.
///
/// The log runs from the first `-- Time:` marker to the end of stderr and is
/// followed by the statement quoted in the assertion message.
pub fn extract_replay_log(stderr: &str) -> Result<String, ExtractError> {
    let start = stderr
        .find(ASSERTION_MARKER)
        .ok_or(ExtractError::MissingLastStatement)?;
    let end = stderr[start..]
        .find(STATEMENT_END)
        .map(|offset| start + offset)
        .ok_or(ExtractError::MissingLastStatement)?;

    // Skip the marker and the single character that follows it; keep the ';'
    let after_marker = start + ASSERTION_MARKER.len();
    let statement_start = after_marker
        + stderr[after_marker..]
            .chars()
            .next()
            .map_or(0, char::len_utf8);
    let last_statement = stderr.get(statement_start..=end).unwrap_or("");

    let first = stderr
        .find(LOG_START_MARKER)
        .ok_or(ExtractError::MissingFirstStatement)?;

    Ok(format!("{}{}\n", &stderr[first..], last_statement))
}

/// Reference engine that decides whether a statement log is valid SQL
#[derive(Debug, Clone, Default)]
pub struct SqliteOracle;

impl SqliteOracle {
    pub fn new() -> Self {
        Self
    }

    /// Execute `script` against a fresh in-memory database
    pub async fn replay(&self, script: &str) -> Result<(), sqlx::Error> {
        let mut conn = SqliteConnection::connect("sqlite::memory:").await?;
        let result = sqlx::raw_sql(script).execute(&mut conn).await;
        conn.close().await?;
        let summary = result?;
        debug!(
            "Replay finished cleanly ({} rows affected)",
            summary.rows_affected()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_slice_handles_marker_directly_before_terminator() {
        // Marker immediately followed by ";\n" leaves no room for a statement
        let stderr = "java.lang.AssertionError:;\n-- Time: 0\n";
        let log = extract_replay_log(stderr).unwrap();
        assert_eq!(log, "-- Time: 0\n\n");
    }

    #[test]
    fn multibyte_separator_after_marker_keeps_statement() {
        let stderr = "java.lang.AssertionError:\u{a0}SELECT 1;\n-- Time: 0\nCREATE TABLE t(a);\n";
        let log = extract_replay_log(stderr).unwrap();
        assert_eq!(log, "-- Time: 0\nCREATE TABLE t(a);\nSELECT 1;\n");
    }
}
