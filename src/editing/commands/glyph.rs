//! Glyph-level commands: anchors and metrics

use super::{Command, CommandContext, CommandResult};
use crate::core::state::AnchorId;
use crate::editing::error::{EditError, EditResult};

/// Translate named anchors
#[derive(Debug, Clone)]
pub struct MoveAnchorsCommand {
    ids: Vec<AnchorId>,
    dx: f64,
    dy: f64,
}

impl MoveAnchorsCommand {
    pub fn new(ids: Vec<AnchorId>, dx: f64, dy: f64) -> Self {
        Self { ids, dx, dy }
    }
}

impl Command for MoveAnchorsCommand {
    fn name(&self) -> &str {
        "Move Anchors"
    }

    fn execute(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let result = ctx.engine.move_anchors(&self.ids, self.dx, self.dy);
        CommandResult::from_result(result.map(|_| Vec::new()))
    }

    fn undo(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let result = ctx.engine.move_anchors(&self.ids, -self.dx, -self.dy);
        CommandResult::from_result(result.map(|_| Vec::new()))
    }
}

#[derive(Debug, Clone)]
pub struct SetAdvanceWidthCommand {
    width: f64,
    previous: Option<f64>,
}

impl SetAdvanceWidthCommand {
    pub fn new(width: f64) -> Self {
        Self {
            width,
            previous: None,
        }
    }
}

impl Command for SetAdvanceWidthCommand {
    fn name(&self) -> &str {
        "Set Advance Width"
    }

    fn execute(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let result = (|| -> EditResult<()> {
            let previous = ctx.engine.glyph()?.advance_width;
            ctx.engine.set_advance_width(self.width)?;
            self.previous = Some(previous);
            Ok(())
        })();
        CommandResult::from_result(result.map(|_| Vec::new()))
    }

    fn undo(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let Some(previous) = self.previous else {
            return CommandResult::failed(EditError::NotExecuted);
        };
        CommandResult::from_result(ctx.engine.set_advance_width(previous).map(|_| Vec::new()))
    }
}
