use std::fs;
use std::io;
use std::num::IntErrorKind;
use std::path::Path;

use serde::Serialize;

pub const STDOUT_FILE: &str = "stdout.txt";
pub const STDERR_FILE: &str = "stderr.txt";
pub const EXIT_CODE_FILE: &str = "exit_code.txt";
pub const LOG_FILE: &str = "log.txt";

/// Captured output of one test execution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunArtifact {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i64,
    /// Harness statement log, only captured by some harnesses
    #[serde(skip_serializing_if = "String::is_empty")]
    pub log: String,
}

impl RunArtifact {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>, exit_code: i64) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
            log: String::new(),
        }
    }

    /// Load the artifacts of a run directory.
    ///
    /// Missing files read as empty text and a missing or non-numeric exit code
    /// reads as 0. Any other I/O failure is returned.
    pub fn load(run_dir: &Path) -> io::Result<Self> {
        let stdout = read_optional(&run_dir.join(STDOUT_FILE))?.unwrap_or_default();
        let stderr = read_optional(&run_dir.join(STDERR_FILE))?.unwrap_or_default();
        let log = read_optional(&run_dir.join(LOG_FILE))?.unwrap_or_default();
        let exit_code = read_optional(&run_dir.join(EXIT_CODE_FILE))
            .ok()
            .flatten()
            .map_or(0, |text| parse_exit_code(&text));

        Ok(Self {
            stdout,
            stderr,
            exit_code,
            log,
        })
    }
}

/// Out-of-range integers saturate so that they still read as a failure
fn parse_exit_code(text: &str) -> i64 {
    match text.trim().parse::<i64>() {
        Ok(code) => code,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => 0,
        },
    }
}

/// Read a text file lossily, returning `None` if it does not exist
pub fn read_optional(path: &Path) -> io::Result<Option<String>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_parse_wide_and_saturate() {
        assert_eq!(parse_exit_code("3221225477\n"), 3_221_225_477);
        assert_eq!(parse_exit_code(" -11 "), -11);
        assert_eq!(parse_exit_code("99999999999999999999999"), i64::MAX);
        assert_eq!(parse_exit_code("-99999999999999999999999"), i64::MIN);
        assert_eq!(parse_exit_code("garbage"), 0);
        assert_eq!(parse_exit_code(""), 0);
    }
}
