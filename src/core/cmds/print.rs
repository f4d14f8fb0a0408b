use crate::core::signatures::SignatureCatalog;
use crate::types::AppResult;

pub mod config;
pub mod signatures;

pub enum PrintCommand {
    Config(String),
    Signatures(String),
}

pub async fn execute_print(command: PrintCommand, catalog: &SignatureCatalog) -> AppResult<()> {
    match command {
        PrintCommand::Config(format) => config::execute(format).await,
        PrintCommand::Signatures(format) => signatures::execute(catalog, format).await,
    }
}
