pub mod process;

pub use process::{ProcessCommand, process_command};
