use console::style;
use log::info;
use serde::Serialize;

use crate::core::signatures::{SignatureAction, SignatureCatalog};
use crate::types::AppResult;

#[derive(Serialize)]
struct SignatureInfo<'a> {
    name: &'a str,
    matcher: String,
    action: SignatureAction,
}

#[derive(Serialize)]
struct JsonCatalog<'a> {
    expected: &'a std::collections::BTreeMap<String, String>,
    not_implemented: &'a [String],
    signatures: Vec<SignatureInfo<'a>>,
    inspect_cmd: &'a str,
}

pub async fn execute(catalog: &SignatureCatalog, format: String) -> AppResult<()> {
    if format == "json" {
        let json = JsonCatalog {
            expected: &catalog.expected,
            not_implemented: &catalog.not_implemented,
            signatures: catalog
                .signatures
                .iter()
                .map(|s| SignatureInfo {
                    name: &s.name,
                    matcher: s.matcher.describe(),
                    action: s.action,
                })
                .collect(),
            inspect_cmd: &catalog.inspect_cmd,
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    info!("Expected messages by issue:");
    for (issue, message) in &catalog.expected {
        info!("  {:>6} | {}", issue, message);
    }

    info!("");
    info!("Not-implemented phrases:");
    for phrase in &catalog.not_implemented {
        info!("  {phrase}");
    }

    info!("");
    info!("Signatures (checked in order):");
    for (i, sig) in catalog.signatures.iter().enumerate() {
        let action = match sig.action {
            SignatureAction::Known => style("known").green(),
            SignatureAction::Replay => style("replay").yellow(),
        };
        info!(
            "  {:>2}. {:<20} [{}] {}",
            i + 1,
            sig.name,
            action,
            sig.matcher.describe()
        );
    }

    Ok(())
}
