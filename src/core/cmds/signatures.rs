use std::path::Path;

use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

use crate::core::aggregate::{RunCase, SignatureReport, summarize_signatures};
use crate::core::cli::SignaturesArgs;
use crate::core::replay::SqliteOracle;
use crate::core::signatures::SignatureCatalog;
use crate::types::AppResult;

#[derive(Serialize)]
struct JsonSignatureReport<'a> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    report: &'a SignatureReport,
}

pub async fn execute_signatures(args: SignaturesArgs, catalog: SignatureCatalog) -> AppResult<()> {
    let oracle = SqliteOracle::new();
    let report = summarize_signatures(Path::new(&args.results), &catalog, &oracle).await?;

    match args.format.as_str() {
        "json" => {
            let json = JsonSignatureReport {
                generated_at: Utc::now(),
                report: &report,
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => print_table_format(&report, &catalog.inspect_cmd),
    }

    Ok(())
}

fn print_case_output(case: &RunCase) {
    info!("stdout: {}", case.artifact.stdout);
    info!("stderr: {}", case.artifact.stderr);
}

fn print_table_format(report: &SignatureReport, inspect_cmd: &str) {
    for issue in &report.issues {
        let c = &issue.counts;
        info!("Issue {}:", issue.issue);
        info!(
            "TP_known: {}, TP_unknown: {}, FP: {}, Neg: {}",
            c.tp_known, c.tp_unknown, c.false_positive, c.negative
        );
        let known = issue
            .known_counts
            .iter()
            .map(|(name, n)| format!("{name}: {n}"))
            .collect::<Vec<_>>()
            .join(", ");
        info!("Known counts: {{{known}}}");
    }

    info!("");
    info!("Unknown issues:");
    for case in &report.unknowns {
        info!("Issue {}, run {}", case.issue, case.run);
        print_case_output(case);
        info!("log: {}", case.artifact.log);
    }

    info!("");
    info!("Manual inspections needed:");
    for inspection in &report.manual_inspections {
        let case = &inspection.case;
        info!("Issue {}, run {}", case.issue, case.run);
        info!("Log: {}", inspection.replay_log);
        print_case_output(case);
        info!("Run `{inspect_cmd} < log.txt` to inspect manually.");
    }

    info!("");
    info!(
        "Manual inspections total {}",
        report.manual_inspections.len()
    );
}
