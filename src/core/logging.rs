use std::io;

use console::style;
use log::{Level, LevelFilter};

use crate::types::config::{colors_enabled, config};

fn level_tag(level: Level, colored: bool) -> String {
    let tag = format!("{level:<5}");
    if !colored {
        return tag;
    }
    match level {
        Level::Error => style(tag).red().bold().to_string(),
        Level::Warn => style(tag).yellow().to_string(),
        Level::Info => style(tag).green().to_string(),
        Level::Debug => style(tag).cyan().to_string(),
        Level::Trace => style(tag).dim().to_string(),
    }
}

/// Route `info` records verbatim to stdout (reports are printed through it)
/// and everything else to stderr with a level tag.
pub fn init_logging() {
    let level = config()
        .log()
        .level()
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::Info);
    let colored = colors_enabled();
    console::set_colors_enabled(colored);
    console::set_colors_enabled_stderr(colored);

    let report = fern::Dispatch::new()
        .filter(|metadata| metadata.level() == Level::Info)
        .format(|out, message, _| out.finish(format_args!("{message}")))
        .chain(io::stdout());

    let diagnostics = fern::Dispatch::new()
        .filter(|metadata| metadata.level() != Level::Info)
        .format(move |out, message, record| {
            let tag = level_tag(record.level(), colored);
            if record.level() >= Level::Debug {
                out.finish(format_args!(
                    "{} [{tag}] {message}",
                    chrono::Local::now().format("%H:%M:%S%.3f")
                ))
            } else {
                out.finish(format_args!("[{tag}] {message}"))
            }
        })
        .chain(io::stderr());

    // Ignore the error when a logger is already installed (e.g. repeated init in tests)
    let _ = fern::Dispatch::new()
        .level(level)
        .level_for("sqlx", level.min(LevelFilter::Warn))
        .chain(report)
        .chain(diagnostics)
        .apply();
}
