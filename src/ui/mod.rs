//! Terminal window: path field, file browser, Process/Exit buttons and dialogs

pub mod file_browser;
pub mod popup;
pub mod state;
pub mod window;

pub use state::{Action, AppState, Command, Focus, Notice, Phase};
pub use window::run;
