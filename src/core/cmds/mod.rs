pub mod classify;
pub mod init;
pub mod print;
pub mod signatures;

pub use classify::execute_classify;
pub use init::execute_init;
pub use print::execute_print;
pub use signatures::execute_signatures;
