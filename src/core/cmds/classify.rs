use std::path::Path;

use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

use crate::core::aggregate::{TrackerReport, summarize_tracker};
use crate::core::cli::ClassifyArgs;
use crate::core::loader::load_bug_index;
use crate::types::AppResult;

#[derive(Serialize)]
struct JsonTrackerReport<'a> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    report: &'a TrackerReport,
}

pub async fn execute_classify(args: ClassifyArgs, run_prefix: String) -> AppResult<()> {
    let index = load_bug_index(Path::new(&args.csv))?;
    let report = summarize_tracker(Path::new(&args.results), &index, &run_prefix)?;

    match args.format.as_str() {
        "json" => {
            let json = JsonTrackerReport {
                generated_at: Utc::now(),
                report: &report,
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => print_table_format(&report),
    }

    Ok(())
}

fn print_table_format(report: &TrackerReport) {
    info!("");
    info!("Issue → (TP_known, TP_unknown, FP, Neg)");
    info!("{}", "-".repeat(40));
    for summary in &report.issues {
        info!("{}: {:?}", summary.issue, summary.counts.as_tuple());
    }
}
