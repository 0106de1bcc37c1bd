//! Core application functionality
//!
//! This module contains the core application logic, including:
//! - The glyph data model
//! - Settings, the user config file and CLI handling
//! - The script runner behind the `bezy-edit` binary

pub mod cli;
pub mod config_file;
pub mod platform;
pub mod runner;
pub mod settings;
pub mod state;

// Re-export commonly used items
pub use cli::CliArgs;
pub use config_file::ConfigFile;
pub use runner::{run_app, ScriptCommand, ScriptReport, ScriptSession, ScriptStep};
pub use settings::EditorSettings;
