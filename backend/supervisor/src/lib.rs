//! Child process launching and bookkeeping for cc-switch.

pub mod launcher;
pub mod liveness;
pub mod process_table;

pub use launcher::{LaunchSpec, Launcher};
pub use liveness::is_process_alive;
pub use process_table::{ProcessRecord, ProcessTable, PROCESSES_FILE_NAME};
