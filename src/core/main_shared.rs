use std::env;
use std::path::PathBuf;

use clap::Parser;
use log::debug;

use crate::core::cli::{Args, Commands, PrintArgs};
use crate::core::cmds;
use crate::core::logging::init_logging;
use crate::core::signatures::SignatureCatalog;
use crate::types::AppResult;
use crate::types::config::{CliOverrides, config, init_with_overrides};

pub async fn run_main() -> AppResult<()> {
    let args = Args::parse();

    // Handle global arguments
    if let Some(cwd_arg) = args.cwd.as_ref() {
        let cwd = PathBuf::from(cwd_arg).canonicalize()?;
        env::set_current_dir(&cwd)?;
    }
    let cwd = env::current_dir()?;

    // Build CLI overrides for config precedence
    let run_prefix = match &args.command {
        Commands::Classify(classify_args) => classify_args.run_prefix.clone(),
        _ => None,
    };
    let cli_overrides = CliOverrides {
        log_level: args.log_level.clone(),
        log_color: args.log_color.clone(),
        run_prefix,
    };

    // Initialize configuration (file, then CLI overrides)
    init_with_overrides(&cli_overrides);

    // Initialize logging after config so level/color are applied
    init_logging();
    debug!("Current working directory: {}", cwd.display());

    // The catalog is built from config and handed to the commands explicitly
    let catalog = || SignatureCatalog::from_config(&config().signatures());

    match args.command {
        Commands::Init => cmds::execute_init().await?,
        Commands::Classify(classify_args) => {
            let run_prefix = config().classify().run_prefix().to_string();
            cmds::execute_classify(classify_args, run_prefix).await?
        }
        Commands::Signatures(signatures_args) => {
            cmds::execute_signatures(signatures_args, catalog()?).await?
        }
        Commands::Print {
            command: print_args,
        } => match print_args {
            PrintArgs::Config(args) => {
                cmds::execute_print(cmds::print::PrintCommand::Config(args.format), &catalog()?)
                    .await?
            }
            PrintArgs::Signatures(args) => {
                cmds::execute_print(
                    cmds::print::PrintCommand::Signatures(args.format),
                    &catalog()?,
                )
                .await?
            }
        },
    }

    Ok(())
}
