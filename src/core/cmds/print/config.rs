use log::info;

use crate::types::AppResult;
use crate::types::config::config;

pub async fn execute(format: String) -> AppResult<()> {
    let effective_config = config().to_effective();

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&effective_config)?);
        return Ok(());
    }

    info!("Effective Configuration:");
    info!("");
    info!("Log:");
    let log = effective_config.log.unwrap_or_default();
    info!("  level: {}", log.level());
    match log.color {
        Some(true) => info!("  color: on"),
        Some(false) => info!("  color: off"),
        None => info!("  color: auto"),
    }

    info!("");
    info!("Classify:");
    let classify = effective_config.classify.unwrap_or_default();
    info!("  run_prefix: {}", classify.run_prefix());

    info!("");
    info!("Signatures:");
    let sigs = effective_config.signatures.unwrap_or_default();
    info!("  inspect_cmd: {}", sigs.inspect_cmd());
    if sigs.not_implemented().is_empty() {
        info!("  not_implemented: (built-in only)");
    } else {
        info!("  not_implemented: [{}]", sigs.not_implemented().join(", "));
    }
    let expected = sigs.expected();
    if expected.is_empty() {
        info!("  expected: (built-in only)");
    } else {
        info!("  expected:");
        for (issue, message) in &expected {
            info!("    {issue}: {message}");
        }
    }
    if !sigs.extra().is_empty() {
        info!("  extra:");
        for rule in sigs.extra() {
            info!("    - name: {}", rule.name);
            if let Some(needle) = &rule.contains {
                info!("      contains: {needle}");
            }
            if let Some(pattern) = &rule.regex {
                info!("      regex: {pattern}");
            }
        }
    }

    Ok(())
}
