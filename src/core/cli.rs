//! Command line interface for the bezy-edit script runner
//!
//! Handles parsing command line arguments and provides validation for user
//! inputs. Options are documented with examples to help users understand
//! the expected format.

use crate::core::config_file::ConfigFile;
use crate::core::settings::EditorSettings;
use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// bezy-edit CLI arguments
///
/// Examples:
///   bezy-edit --glyph a.json --script drag.json             # Replay onto a snapshot
///   bezy-edit --ufo MyFont.ufo --glyph-name a --script s.json
///   bezy-edit --ufo MyFont.ufo --glyph-name a --script s.json --write-ufo
///   bezy-edit --new-config                                  # Write default settings
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    name = "bezy-edit",
    version,
    about = "Replay editing gestures against a glyph",
    long_about = "bezy-edit runs the Bezy contour editing engine headless. It loads a glyph from a JSON snapshot or a UFO, replays a JSON script of tool events, undo/redo steps and editor commands, and prints the resulting glyph."
)]
pub struct CliArgs {
    /// Glyph snapshot to edit (JSON)
    #[clap(
        long = "glyph",
        short = 'g',
        help = "Glyph snapshot to edit (JSON)",
        conflicts_with = "ufo"
    )]
    pub glyph: Option<PathBuf>,

    /// UFO source to load the glyph from
    #[clap(
        long = "ufo",
        short = 'u',
        help = "UFO source to load the glyph from",
        requires = "glyph_name"
    )]
    pub ufo: Option<PathBuf>,

    /// Name of the glyph to edit inside the UFO
    #[clap(long = "glyph-name", short = 'n', help = "Glyph to edit inside the UFO")]
    pub glyph_name: Option<String>,

    /// Script of steps to replay
    ///
    /// A JSON array of tagged steps: tool, event, undo, redo, command,
    /// paste and copy.
    #[clap(
        long = "script",
        short = 's',
        help = "JSON script of editing steps to replay"
    )]
    pub script: Option<PathBuf>,

    /// Where to write the edited glyph snapshot; stdout if omitted
    #[clap(long = "output", short = 'o', help = "Write the edited glyph here")]
    pub output: Option<PathBuf>,

    /// Save the edited glyph back into the UFO it came from
    #[clap(
        long = "write-ufo",
        help = "Save the edited glyph back into the UFO",
        requires = "ufo"
    )]
    pub write_ufo: bool,

    /// Settings file overriding the user config file
    #[clap(long = "settings", help = "Editor settings JSON")]
    pub settings: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[clap(
        long = "log-level",
        default_value = "info",
        help = "Log level (error, warn, info, debug, trace)"
    )]
    pub log_level: String,

    /// Mirror logs into a daily file under the config directory
    #[clap(
        long = "log-file",
        help = "Also write logs to the bezy-edit logs directory"
    )]
    pub log_file: bool,

    /// Initialize user configuration directory with default settings
    ///
    /// This creates the bezy-edit config directory with a settings.json
    /// holding every default, ready to customize.
    #[clap(
        long = "new-config",
        help = "Initialize user config directory with default settings"
    )]
    pub new_config: bool,
}

impl CliArgs {
    /// Validate the CLI arguments after parsing
    ///
    /// This ensures that all paths exist before anything runs, providing
    /// clear error messages for common mistakes.
    pub fn validate(&self) -> Result<(), String> {
        if self.new_config {
            return Ok(());
        }

        match (&self.glyph, &self.ufo) {
            (None, None) => {
                return Err(
                    "Nothing to edit: pass --glyph <snapshot.json> or --ufo <font.ufo> --glyph-name <name>"
                        .to_string(),
                );
            }
            (Some(path), _) if !path.is_file() => {
                return Err(format!(
                    "Glyph snapshot does not exist: {}\nMake sure the path is correct and the file exists.",
                    path.display()
                ));
            }
            (_, Some(path)) => {
                if !path.join("metainfo.plist").exists() {
                    return Err(format!(
                        "Not a valid UFO directory: missing metainfo.plist in {}\nMake sure this is a valid UFO directory.",
                        path.display()
                    ));
                }
            }
            _ => {}
        }

        if let Some(path) = &self.script {
            if !path.is_file() {
                return Err(format!("Script does not exist: {}", path.display()));
            }
        }

        if let Some(path) = &self.settings {
            if !path.is_file() {
                return Err(format!("Settings file does not exist: {}", path.display()));
            }
        }

        Ok(())
    }

    /// Resolve editor settings
    ///
    /// Priority order:
    /// 1. Settings file from the command line (--settings)
    /// 2. User config file (<config dir>/bezy-edit/settings.json)
    /// 3. Built-in defaults
    pub fn editor_settings(&self) -> Result<EditorSettings> {
        if let Some(path) = &self.settings {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings {}", path.display()))?;
            let settings = serde_json::from_str(&contents)
                .with_context(|| format!("Invalid settings in {}", path.display()))?;
            debug!("Using settings from {}", path.display());
            return Ok(settings);
        }

        if let Some(config) = ConfigFile::load() {
            debug!("Using settings from config file");
            return Ok(config.editor);
        }

        debug!("Using default settings");
        Ok(EditorSettings::default())
    }
}
