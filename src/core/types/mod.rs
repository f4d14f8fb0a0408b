mod artifact;
mod bug;
pub mod config;
mod error;
mod outcome;
mod stats;

pub use artifact::*;
pub use bug::*;
pub use error::*;
pub use outcome::*;
pub use stats::*;
