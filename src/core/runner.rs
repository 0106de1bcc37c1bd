//! Application runner logic
//!
//! Loads a glyph, replays a script of editing steps against it and writes
//! the result. A script is a JSON array of tagged steps:
//!
//! ```json
//! [
//!   { "step": "tool", "tool": "pen" },
//!   { "step": "event", "event": { "type": "pointerDown", "pos": { "x": 0, "y": 0 } } },
//!   { "step": "event", "event": { "type": "pointerUp", "pos": { "x": 0, "y": 0 } } },
//!   { "step": "undo" },
//!   { "step": "command", "command": { "name": "rotate", "degrees": 90 } }
//! ]
//! ```

use crate::core::cli::CliArgs;
use crate::core::config_file::ConfigFile;
use crate::core::settings::EditorSettings;
use crate::core::state::{Glyph, GlyphSnapshot};
use crate::data::{load_engine_from_ufo, write_glyph_to_ufo};
use crate::editing::{
    Alignment, Axis, CommandResult, Editor, FontEngine, MemoryFontEngine, TransformOrigin,
};
use crate::geometry::Quadrant;
use crate::logging;
use crate::tools::{ToolEvent, ToolId, ToolManager};
use anyhow::{anyhow, Context, Result};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// One step of an editing script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum ScriptStep {
    /// Switch tools. A temporary switch lasts until the next plain one.
    Tool {
        tool: ToolId,
        #[serde(default)]
        temporary: bool,
    },
    Event {
        event: ToolEvent,
    },
    Undo,
    Redo,
    Command {
        command: ScriptCommand,
    },
    /// Paste clipboard text: a native payload or SVG path data
    Paste {
        text: String,
    },
    Copy,
}

/// Editor operations that act on the current selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum ScriptCommand {
    SelectAll,
    Align {
        alignment: Alignment,
    },
    Distribute {
        axis: Axis,
    },
    Scale {
        sx: f64,
        sy: f64,
        #[serde(default)]
        origin: TransformOrigin,
    },
    Rotate {
        degrees: f64,
        #[serde(default)]
        origin: TransformOrigin,
    },
    Reflect {
        axis: Axis,
        #[serde(default)]
        origin: TransformOrigin,
    },
    MoveSelectionTo {
        target: Point,
        #[serde(default)]
        anchor: Quadrant,
    },
    ToggleSmooth,
    RemoveSelection,
}

/// What happened while a script ran
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptReport {
    pub steps: usize,
    /// Steps that were rejected: failed commands, empty undo/redo stacks,
    /// events no behavior handled
    pub skipped: usize,
}

/// An editor and its tools, driven step by step
pub struct ScriptSession {
    editor: Editor,
    tools: ToolManager,
}

impl ScriptSession {
    /// Open an edit session on `glyph_name` inside `engine`
    pub fn new(
        engine: Box<dyn FontEngine>,
        settings: EditorSettings,
        glyph_name: &str,
    ) -> Result<Self> {
        let mut editor = Editor::new(engine, settings);
        editor
            .start_session_by_name(glyph_name)
            .with_context(|| format!("Failed to open glyph '{}'", glyph_name))?;
        let tools = ToolManager::new(&mut editor);
        Ok(Self { editor, tools })
    }

    /// Edit a standalone glyph snapshot
    pub fn from_glyph(glyph: Glyph, settings: EditorSettings) -> Result<Self> {
        let name = glyph.name.clone();
        let mut engine = MemoryFontEngine::new();
        engine.insert_glyph(glyph);
        Self::new(Box::new(engine), settings, &name)
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn tools(&self) -> &ToolManager {
        &self.tools
    }

    pub fn snapshot(&self) -> Result<GlyphSnapshot> {
        Ok(self.editor.snapshot()?)
    }

    /// Run one step; `false` when the step had no effect
    pub fn run_step(&mut self, step: &ScriptStep) -> bool {
        match step {
            ScriptStep::Tool { tool, temporary } => {
                if *temporary {
                    self.tools.push_temporary(*tool, &mut self.editor);
                    return true;
                }
                while self.tools.pop_temporary(&mut self.editor) {}
                self.tools.activate(*tool, &mut self.editor);
                true
            }
            ScriptStep::Event { event } => self.tools.handle_event(event, &mut self.editor),
            ScriptStep::Undo => report("undo", self.editor.undo()),
            ScriptStep::Redo => report("redo", self.editor.redo()),
            ScriptStep::Command { command } => {
                let result = self.run_command(command);
                report("command", Some(result))
            }
            ScriptStep::Paste { text } => {
                let result = self.editor.paste(text);
                let pasted = !result.affected_point_ids.is_empty();
                report("paste", Some(result)) && pasted
            }
            ScriptStep::Copy => self.editor.copy().is_some(),
        }
    }

    fn run_command(&mut self, command: &ScriptCommand) -> CommandResult {
        let editor = &mut self.editor;
        match command {
            ScriptCommand::SelectAll => {
                editor.select_all();
                CommandResult::ok(editor.selection().ids().iter().copied().collect())
            }
            ScriptCommand::Align { alignment } => editor.align(*alignment),
            ScriptCommand::Distribute { axis } => editor.distribute(*axis),
            ScriptCommand::Scale { sx, sy, origin } => editor.scale(*sx, *sy, *origin),
            ScriptCommand::Rotate { degrees, origin } => editor.rotate(*degrees, *origin),
            ScriptCommand::Reflect { axis, origin } => editor.reflect(*axis, *origin),
            ScriptCommand::MoveSelectionTo { target, anchor } => {
                editor.move_selection_to(*target, *anchor)
            }
            ScriptCommand::ToggleSmooth => editor.toggle_smooth_selection(),
            ScriptCommand::RemoveSelection => editor.delete_selection(),
        }
    }

    /// Replay every step in order. Rejected steps are logged and skipped.
    pub fn run_script(&mut self, steps: &[ScriptStep]) -> ScriptReport {
        let mut report = ScriptReport::default();
        for (index, step) in steps.iter().enumerate() {
            report.steps += 1;
            if !self.run_step(step) {
                debug!("Step {} had no effect: {:?}", index, step);
                report.skipped += 1;
            }
        }
        info!(
            "Replayed {} steps ({} skipped), tool {} in state {}",
            report.steps,
            report.skipped,
            self.tools.active().as_str(),
            self.tools.state_name()
        );
        report
    }
}

fn report(what: &str, result: Option<CommandResult>) -> bool {
    match result {
        Some(result) if result.success => true,
        Some(result) => {
            if let Some(error) = result.error {
                warn!("{} failed: {}", what, error);
            }
            false
        }
        None => {
            debug!("Nothing to {}", what);
            false
        }
    }
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    let steps = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid script {}", path.display()))?;
    Ok(steps)
}

pub fn load_glyph_snapshot(path: &Path) -> Result<Glyph> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read glyph {}", path.display()))?;
    let glyph = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid glyph snapshot {}", path.display()))?;
    Ok(glyph)
}

fn open_session(cli_args: &CliArgs, settings: EditorSettings) -> Result<ScriptSession> {
    if let Some(path) = &cli_args.glyph {
        let glyph = load_glyph_snapshot(path)?;
        info!("Editing glyph '{}' from {}", glyph.name, path.display());
        return ScriptSession::from_glyph(glyph, settings);
    }

    match (&cli_args.ufo, &cli_args.glyph_name) {
        (Some(ufo), Some(name)) => {
            let engine = load_engine_from_ufo(ufo)?;
            info!("Editing glyph '{}' from {}", name, ufo.display());
            ScriptSession::new(Box::new(engine), settings, name)
        }
        _ => Err(anyhow!("No glyph to edit")),
    }
}

/// Create and run the application with the given CLI arguments.
/// Handles special CLI flags and delegates to the script replay.
pub fn run_app(cli_args: CliArgs) -> Result<()> {
    let _log_guard = logging::init_logging(&cli_args.log_level, cli_args.log_file);

    // Handle --new-config flag specially
    if cli_args.new_config {
        return ConfigFile::initialize_config_directory()
            .context("Failed to initialize config directory");
    }

    cli_args.validate().map_err(|message| anyhow!(message))?;

    let settings = cli_args.editor_settings()?;
    let mut session = open_session(&cli_args, settings)?;

    if let Some(path) = &cli_args.script {
        let steps = load_script(path)?;
        session.run_script(&steps);
    }

    let snapshot = session.snapshot()?;
    let json = serde_json::to_string_pretty(&snapshot)?;
    match &cli_args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote glyph to {}", path.display());
        }
        None => println!("{}", json),
    }

    if cli_args.write_ufo {
        if let Some(ufo) = &cli_args.ufo {
            write_glyph_to_ufo(ufo, &snapshot)?;
            info!("Saved glyph '{}' to {}", snapshot.name, ufo.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{Contour, Point as GlyphPoint};

    fn square() -> Glyph {
        let mut glyph = Glyph::new("square", Some(0x25A1), 600.0);
        glyph.contours.push(Contour::with_points(
            vec![
                GlyphPoint::on_curve(0.0, 0.0),
                GlyphPoint::on_curve(100.0, 0.0),
                GlyphPoint::on_curve(100.0, 100.0),
                GlyphPoint::on_curve(0.0, 100.0),
            ],
            true,
        ));
        glyph
    }

    fn steps(json: &str) -> Vec<ScriptStep> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_every_step_kind() {
        let parsed = steps(
            r#"[
                {"step": "tool", "tool": "hand", "temporary": true},
                {"step": "event", "event": {"type": "keyDown", "key": "escape"}},
                {"step": "undo"},
                {"step": "redo"},
                {"step": "command", "command": {"name": "align", "alignment": "centerX"}},
                {"step": "command", "command": {"name": "moveSelectionTo",
                    "target": {"x": 10, "y": 20}, "anchor": "top-left"}},
                {"step": "command", "command": {"name": "rotate", "degrees": 90,
                    "origin": {"point": {"x": 0, "y": 0}}}},
                {"step": "paste", "text": "M0 0 L10 0"},
                {"step": "copy"}
            ]"#,
        );
        assert_eq!(parsed.len(), 9);
        assert_eq!(
            parsed[0],
            ScriptStep::Tool {
                tool: ToolId::Hand,
                temporary: true
            }
        );
        assert_eq!(
            parsed[5],
            ScriptStep::Command {
                command: ScriptCommand::MoveSelectionTo {
                    target: Point::new(10.0, 20.0),
                    anchor: Quadrant::TopLeft
                }
            }
        );
    }

    #[test]
    fn commands_act_on_selection_and_undo() {
        let mut session = ScriptSession::from_glyph(square(), EditorSettings::default()).unwrap();
        let report = session.run_script(&steps(
            r#"[
                {"step": "command", "command": {"name": "selectAll"}},
                {"step": "command", "command": {"name": "scale", "sx": 2, "sy": 2,
                    "origin": {"bounds": "bottom-left"}}}
            ]"#,
        ));
        assert_eq!(report.skipped, 0);
        let glyph = session.snapshot().unwrap();
        assert_eq!(glyph.contours[0].points[2].position(), Point::new(200.0, 200.0));

        assert!(session.run_step(&ScriptStep::Undo));
        let glyph = session.snapshot().unwrap();
        assert!(glyph.same_shape(&square()));
        assert!(!session.run_step(&ScriptStep::Undo));
    }

    #[test]
    fn failed_commands_are_skipped() {
        let mut session = ScriptSession::from_glyph(square(), EditorSettings::default()).unwrap();
        let report = session.run_script(&steps(
            r#"[{"step": "command", "command": {"name": "distribute", "axis": "horizontal"}}]"#,
        ));
        assert_eq!(report, ScriptReport { steps: 1, skipped: 1 });
        assert_eq!(session.editor().history().past_len(), 0);
    }

    #[test]
    fn pen_events_draw_a_contour() {
        let mut session = ScriptSession::from_glyph(
            Glyph::new("empty", None, 500.0),
            EditorSettings::default(),
        )
        .unwrap();
        session.run_script(&steps(
            r#"[
                {"step": "tool", "tool": "pen"},
                {"step": "event", "event": {"type": "pointerDown", "pos": {"x": 0, "y": 0}}},
                {"step": "event", "event": {"type": "pointerUp", "pos": {"x": 0, "y": 0}}},
                {"step": "event", "event": {"type": "pointerDown", "pos": {"x": 100, "y": 0}}},
                {"step": "event", "event": {"type": "pointerUp", "pos": {"x": 100, "y": 0}}}
            ]"#,
        ));
        assert_eq!(session.tools().active(), ToolId::Pen);
        let glyph = session.snapshot().unwrap();
        assert_eq!(glyph.contours.len(), 1);
        assert_eq!(glyph.contours[0].len(), 2);
        assert_eq!(session.editor().history().past_len(), 2);
    }

    #[test]
    fn temporary_tool_returns() {
        let mut session = ScriptSession::from_glyph(square(), EditorSettings::default()).unwrap();
        session.run_step(&ScriptStep::Tool {
            tool: ToolId::Hand,
            temporary: true,
        });
        assert_eq!(session.tools().active(), ToolId::Hand);
        session.run_step(&ScriptStep::Tool {
            tool: ToolId::Select,
            temporary: false,
        });
        assert_eq!(session.tools().active(), ToolId::Select);
        assert!(!session.tools().is_temporary());
    }

    #[test]
    fn run_app_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let glyph_path = dir.path().join("square.json");
        let script_path = dir.path().join("script.json");
        let output_path = dir.path().join("out.json");
        fs::write(&glyph_path, serde_json::to_string(&square()).unwrap()).unwrap();
        fs::write(
            &script_path,
            r#"[
                {"step": "command", "command": {"name": "selectAll"}},
                {"step": "command", "command": {"name": "reflect", "axis": "horizontal"}}
            ]"#,
        )
        .unwrap();

        let args = CliArgs {
            glyph: Some(glyph_path),
            script: Some(script_path),
            output: Some(output_path.clone()),
            settings: Some(dir.path().join("missing.json")),
            log_level: "warn".to_string(),
            ..CliArgs::default()
        };
        // A missing settings file is a usage error
        assert!(run_app(args.clone()).is_err());

        let args = CliArgs {
            settings: None,
            ..args
        };
        run_app(args).unwrap();
        let edited = load_glyph_snapshot(&output_path).unwrap();
        // Mirrored about the center of its bounds, the square keeps its outline
        assert_eq!(edited.contours[0].points[0].position(), Point::new(100.0, 0.0));
        assert_eq!(edited.contours[0].points[1].position(), Point::new(0.0, 0.0));
    }
}
