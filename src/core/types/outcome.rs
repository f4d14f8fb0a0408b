use console::style;
use serde::Serialize;
use strum::Display;

/// Classification bucket of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
pub enum Outcome {
    #[strum(serialize = "TP_known")]
    #[serde(rename = "TP_known")]
    KnownTruePositive,
    #[strum(serialize = "TP_unknown")]
    #[serde(rename = "TP_unknown")]
    UnknownTruePositive,
    #[strum(serialize = "FP")]
    #[serde(rename = "FP")]
    FalsePositive,
    #[strum(serialize = "Neg")]
    #[serde(rename = "Neg")]
    Negative,
}

impl Outcome {
    /// Colored label for terminal output
    pub fn display(&self) -> String {
        let label = self.to_string();
        match self {
            Outcome::KnownTruePositive => style(label).green().to_string(),
            Outcome::UnknownTruePositive => style(label).red().to_string(),
            Outcome::FalsePositive => style(label).yellow().to_string(),
            Outcome::Negative => label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_report_columns() {
        let labels: Vec<String> = [
            Outcome::KnownTruePositive,
            Outcome::UnknownTruePositive,
            Outcome::FalsePositive,
            Outcome::Negative,
        ]
        .iter()
        .map(|o| format!("{o}={}", serde_json::to_string(o).unwrap()))
        .collect();
        assert_eq!(
            labels,
            vec![
                "TP_known=\"TP_known\"",
                "TP_unknown=\"TP_unknown\"",
                "FP=\"FP\"",
                "Neg=\"Neg\"",
            ]
        );
    }
}
