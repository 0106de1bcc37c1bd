//! Contour-level commands

use super::{Command, CommandContext, CommandResult};
use crate::core::state::{Contour, ContourId, PointId};
use crate::editing::error::{EditError, EditResult};

fn contour_point_ids(ctx: &CommandContext, id: ContourId) -> Vec<PointId> {
    ctx.engine
        .glyph()
        .ok()
        .and_then(|g| g.contour(id))
        .map(|c| c.points.iter().map(|p| p.id).collect())
        .unwrap_or_default()
}

/// Keep `id` only if the contour still exists
fn existing_contour(ctx: &CommandContext, id: Option<ContourId>) -> Option<ContourId> {
    let id = ctx.resolve_contour(id?);
    let glyph = ctx.engine.glyph().ok()?;
    glyph.contour(id).map(|c| c.id)
}

/// Start a new, empty, active contour
#[derive(Debug, Clone, Default)]
pub struct AddContourCommand {
    created: Option<ContourId>,
    previous_active: Option<ContourId>,
}

impl AddContourCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contour_id(&self) -> Option<ContourId> {
        self.created
    }
}

impl Command for AddContourCommand {
    fn name(&self) -> &str {
        "Add Contour"
    }

    fn execute(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let result = (|| -> EditResult<ContourId> {
            let previous_active = ctx.engine.glyph()?.active_contour_id;
            let id = ctx.engine.add_contour()?;
            self.previous_active = previous_active;
            Ok(id)
        })();
        match result {
            Ok(id) => {
                if let Some(old) = self.created.replace(id) {
                    ctx.remap.record_contour(old, id);
                }
                CommandResult::ok(Vec::new())
            }
            Err(error) => CommandResult::failed(error),
        }
    }

    fn undo(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let Some(created) = self.created else {
            return CommandResult::failed(EditError::NotExecuted);
        };
        let id = ctx.resolve_contour(created);
        let previous = existing_contour(ctx, self.previous_active);
        let result = ctx
            .engine
            .remove_contour(id)
            .and_then(|_| ctx.engine.set_active_contour(previous));
        CommandResult::from_result(result.map(|_| Vec::new()))
    }
}

/// Put a previously removed contour back
#[derive(Debug, Clone)]
pub struct RemoveContourCommand {
    contour_id: ContourId,
    removed: Option<(usize, Contour)>,
    was_active: bool,
}

impl RemoveContourCommand {
    pub fn new(contour_id: ContourId) -> Self {
        Self {
            contour_id,
            removed: None,
            was_active: false,
        }
    }
}

impl Command for RemoveContourCommand {
    fn name(&self) -> &str {
        "Remove Contour"
    }

    fn execute(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let id = ctx.resolve_contour(self.contour_id);
        let result = (|| -> EditResult<Vec<PointId>> {
            let was_active = ctx.engine.glyph()?.active_contour_id == Some(id);
            let (index, contour) = ctx.engine.remove_contour(id)?;
            let ids = contour.points.iter().map(|p| p.id).collect();
            self.removed = Some((index, contour));
            self.was_active = was_active;
            Ok(ids)
        })();
        CommandResult::from_result(result)
    }

    fn undo(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let Some((index, contour)) = self.removed.clone() else {
            return CommandResult::failed(EditError::NotExecuted);
        };
        let ids = contour.points.iter().map(|p| p.id).collect();
        let was_active = self.was_active;
        let result = ctx.engine.insert_contour(index, contour).and_then(|id| {
            if was_active {
                ctx.engine.set_active_contour(Some(id))
            } else {
                Ok(())
            }
        });
        CommandResult::from_result(result.map(|_| ids))
    }
}

/// Close the active contour, finishing it
#[derive(Debug, Clone, Default)]
pub struct CloseContourCommand {
    closed: Option<ContourId>,
}

impl CloseContourCommand {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Command for CloseContourCommand {
    fn name(&self) -> &str {
        "Close Contour"
    }

    fn execute(&mut self, ctx: &mut CommandContext) -> CommandResult {
        match ctx.engine.close_contour() {
            Ok(id) => {
                self.closed = Some(id);
                CommandResult::ok(contour_point_ids(ctx, id))
            }
            Err(error) => CommandResult::failed(error),
        }
    }

    fn undo(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let Some(closed) = self.closed else {
            return CommandResult::failed(EditError::NotExecuted);
        };
        let id = ctx.resolve_contour(closed);
        let result = ctx
            .engine
            .open_contour(id)
            .and_then(|_| ctx.engine.set_active_contour(Some(id)));
        CommandResult::from_result(result.map(|_| contour_point_ids(ctx, id)))
    }
}

/// Turn a closed contour into an open one
#[derive(Debug, Clone)]
pub struct OpenContourCommand {
    contour_id: ContourId,
    was_closed: bool,
}

impl OpenContourCommand {
    pub fn new(contour_id: ContourId) -> Self {
        Self {
            contour_id,
            was_closed: false,
        }
    }
}

impl Command for OpenContourCommand {
    fn name(&self) -> &str {
        "Open Contour"
    }

    fn execute(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let id = ctx.resolve_contour(self.contour_id);
        let result = (|| -> EditResult<()> {
            let was_closed = ctx
                .engine
                .glyph()?
                .contour(id)
                .ok_or(EditError::StaleContour(id))?
                .closed;
            ctx.engine.open_contour(id)?;
            self.was_closed = was_closed;
            Ok(())
        })();
        CommandResult::from_result(result.map(|_| contour_point_ids(ctx, id)))
    }

    fn undo(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let id = ctx.resolve_contour(self.contour_id);
        let result = ctx.engine.set_contour_closed(id, self.was_closed);
        CommandResult::from_result(result.map(|_| contour_point_ids(ctx, id)))
    }
}

/// Reverse point order (and with it, contour direction)
#[derive(Debug, Clone)]
pub struct ReverseContourCommand {
    contour_id: ContourId,
}

impl ReverseContourCommand {
    pub fn new(contour_id: ContourId) -> Self {
        Self { contour_id }
    }
}

impl Command for ReverseContourCommand {
    fn name(&self) -> &str {
        "Reverse Contour"
    }

    fn execute(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let id = ctx.resolve_contour(self.contour_id);
        let result = ctx.engine.reverse_contour(id);
        CommandResult::from_result(result.map(|_| contour_point_ids(ctx, id)))
    }

    fn undo(&mut self, ctx: &mut CommandContext) -> CommandResult {
        self.execute(ctx)
    }
}

/// Change which contour the pen appends to
#[derive(Debug, Clone)]
pub struct SetActiveContourCommand {
    contour_id: Option<ContourId>,
    previous: Option<ContourId>,
}

impl SetActiveContourCommand {
    pub fn new(contour_id: Option<ContourId>) -> Self {
        Self {
            contour_id,
            previous: None,
        }
    }
}

impl Command for SetActiveContourCommand {
    fn name(&self) -> &str {
        "Set Active Contour"
    }

    fn execute(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let target = self.contour_id.map(|id| ctx.resolve_contour(id));
        let result = (|| -> EditResult<()> {
            let previous = ctx.engine.glyph()?.active_contour_id;
            ctx.engine.set_active_contour(target)?;
            self.previous = previous;
            Ok(())
        })();
        CommandResult::from_result(result.map(|_| Vec::new()))
    }

    fn undo(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let previous = existing_contour(ctx, self.previous);
        CommandResult::from_result(ctx.engine.set_active_contour(previous).map(|_| Vec::new()))
    }
}
