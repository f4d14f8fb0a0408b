pub mod core;

// Re-export key items for easy importing in this crate
pub use crate::core::types;

// Re-export key items for easy importing in other crates
pub use crate::core::aggregate::{
    SignatureReport, TrackerReport, summarize_signatures, summarize_tracker,
};
pub use crate::core::classify::classify_run;
pub use crate::core::loader::{load_bug_index, read_bug_records};
pub use crate::core::main_shared::run_main;
pub use crate::core::replay::{SqliteOracle, extract_replay_log};
pub use crate::core::signatures::{SignatureCatalog, Verdict};
