pub mod aggregate;
pub mod classify;
pub mod cli;
pub mod cmds;
pub mod loader;
pub mod logging;
pub mod main_shared;
pub mod replay;
pub mod signatures;
pub mod types;
