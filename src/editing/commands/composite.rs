//! Commands built from other commands or from whole-glyph snapshots

use super::{Command, CommandContext, CommandResult};
use crate::core::state::{GlyphSnapshot, PointId};
use tracing::warn;

/// Several commands sealed into one undo step
///
/// Execution is all-or-nothing: if a member fails, the members that already
/// ran are undone in reverse before the failure is reported.
#[derive(Debug)]
pub struct CompositeCommand {
    label: String,
    commands: Vec<Box<dyn Command>>,
}

impl CompositeCommand {
    pub fn new(label: impl Into<String>, commands: Vec<Box<dyn Command>>) -> Self {
        Self {
            label: label.into(),
            commands,
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn run_forward(&mut self, ctx: &mut CommandContext, redo: bool) -> CommandResult {
        let mut affected: Vec<PointId> = Vec::new();
        for index in 0..self.commands.len() {
            let command = &mut self.commands[index];
            let result = if redo {
                command.redo(ctx)
            } else {
                command.execute(ctx)
            };
            if !result.success {
                warn!(
                    "'{}' failed at step {} ({}), rolling back",
                    self.label,
                    index,
                    command.name()
                );
                for done in self.commands[..index].iter_mut().rev() {
                    done.undo(ctx);
                }
                return result;
            }
            extend_unique(&mut affected, result.affected_point_ids);
        }
        CommandResult::ok(affected)
    }
}

fn extend_unique(into: &mut Vec<PointId>, ids: Vec<PointId>) {
    for id in ids {
        if !into.contains(&id) {
            into.push(id);
        }
    }
}

impl Command for CompositeCommand {
    fn name(&self) -> &str {
        &self.label
    }

    fn execute(&mut self, ctx: &mut CommandContext) -> CommandResult {
        self.run_forward(ctx, false)
    }

    fn undo(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let mut affected = Vec::new();
        for command in self.commands.iter_mut().rev() {
            let result = command.undo(ctx);
            if !result.success {
                warn!("Undo of '{}' failed in {}", self.label, command.name());
                return result;
            }
            extend_unique(&mut affected, result.affected_point_ids);
        }
        CommandResult::ok(affected)
    }

    fn redo(&mut self, ctx: &mut CommandContext) -> CommandResult {
        self.run_forward(ctx, true)
    }
}

/// Whole-glyph before/after swap for edits that are impractical to express
/// point by point
#[derive(Debug, Clone)]
pub struct SnapshotCommand {
    label: String,
    before: GlyphSnapshot,
    after: GlyphSnapshot,
}

impl SnapshotCommand {
    pub fn new(label: impl Into<String>, before: GlyphSnapshot, after: GlyphSnapshot) -> Self {
        Self {
            label: label.into(),
            before,
            after,
        }
    }

    fn apply(ctx: &mut CommandContext, snapshot: &GlyphSnapshot) -> CommandResult {
        let ids = snapshot.points().map(|p| p.id).collect();
        CommandResult::from_result(ctx.engine.restore_snapshot(snapshot).map(|_| ids))
    }
}

impl Command for SnapshotCommand {
    fn name(&self) -> &str {
        &self.label
    }

    fn execute(&mut self, ctx: &mut CommandContext) -> CommandResult {
        Self::apply(ctx, &self.after)
    }

    fn undo(&mut self, ctx: &mut CommandContext) -> CommandResult {
        Self::apply(ctx, &self.before)
    }
}
