use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// All relative paths will be interpreted relative to this directory.
    #[arg(long, global = true)]
    pub cwd: Option<String>,

    /// Logging level (overrides config). One of: trace, debug, info, warn, error
    #[arg(long = "log.level", global = true)]
    pub log_level: Option<String>,

    /// Logging color control: "on" to force colors, "off" to disable; omit for auto
    #[arg(long = "log.color", global = true)]
    pub log_color: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write an example config file into the current directory
    Init,

    /// Classify runs per issue against known messages from a bug tracker export
    Classify(ClassifyArgs),

    /// Classify runs per issue against the built-in crash signature catalog
    Signatures(SignaturesArgs),

    /// Print configuration and catalog information
    Print {
        #[command(subcommand)]
        command: PrintArgs,
    },
}

/// Arguments for the classify command
#[derive(Parser, Debug)]
pub struct ClassifyArgs {
    /// Path to the bug tracker CSV export (Issue, Commit IDs, Error message)
    #[arg(long)]
    pub csv: String,

    /// Path to the root results directory (<issue>/<run>/...)
    #[arg(long)]
    pub results: String,

    /// Only run directories starting with this prefix are classified.
    /// Replaces config [classify].run_prefix if provided.
    #[arg(long = "run-prefix")]
    pub run_prefix: Option<String>,

    /// Output format: "table" (default) or "json"
    #[arg(long, default_value = "table")]
    pub format: String,
}

/// Arguments for the signatures command
#[derive(Parser, Debug)]
pub struct SignaturesArgs {
    /// Path to the root results directory (<issue>/<run>/...)
    #[arg(long)]
    pub results: String,

    /// Output format: "table" (default) or "json"
    #[arg(long, default_value = "table")]
    pub format: String,
}

/// Arguments for the print command
#[derive(Subcommand, Debug)]
pub enum PrintArgs {
    /// Print the effective global configuration
    Config(PrintFormatArgs),

    /// Print the effective signature catalog
    Signatures(PrintFormatArgs),
}

/// Arguments shared by the print subcommands
#[derive(Parser, Debug)]
pub struct PrintFormatArgs {
    /// Output format: "table" (default) or "json"
    #[arg(long, default_value = "table")]
    pub format: String,
}
