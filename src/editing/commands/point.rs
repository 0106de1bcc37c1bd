//! Point-level commands

use super::{Command, CommandContext, CommandResult};
use crate::core::state::{ContourId, Point, PointId, PointType};
use crate::editing::error::{EditError, EditResult};
use std::collections::HashSet;

/// Append a point to a contour (the active one unless told otherwise)
#[derive(Debug, Clone)]
pub struct AddPointCommand {
    x: f64,
    y: f64,
    point_type: PointType,
    smooth: bool,
    contour_id: Option<ContourId>,
    created: Option<PointId>,
}

impl AddPointCommand {
    pub fn new(x: f64, y: f64, point_type: PointType, smooth: bool) -> Self {
        Self {
            x,
            y,
            point_type,
            smooth,
            contour_id: None,
            created: None,
        }
    }

    pub fn to_contour(
        contour_id: ContourId,
        x: f64,
        y: f64,
        point_type: PointType,
        smooth: bool,
    ) -> Self {
        Self {
            contour_id: Some(contour_id),
            ..Self::new(x, y, point_type, smooth)
        }
    }

    /// Id of the point created by the latest execution
    pub fn point_id(&self) -> Option<PointId> {
        self.created
    }
}

impl Command for AddPointCommand {
    fn name(&self) -> &str {
        "Add Point"
    }

    fn execute(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let result = (|| -> EditResult<PointId> {
            // Pin the target on first run so redo lands in the same contour
            let target = match self.contour_id {
                Some(id) => ctx.resolve_contour(id),
                None => ctx
                    .engine
                    .glyph()?
                    .active_contour_id
                    .ok_or(EditError::NoActiveContour)?,
            };
            let id = ctx.engine.add_point_to_contour(
                target,
                self.x,
                self.y,
                self.point_type,
                self.smooth,
            )?;
            self.contour_id = Some(target);
            Ok(id)
        })();

        match result {
            Ok(id) => {
                if let Some(old) = self.created.replace(id) {
                    ctx.remap.record_point(old, id);
                }
                CommandResult::ok(vec![id])
            }
            Err(error) => CommandResult::failed(error),
        }
    }

    fn undo(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let Some(created) = self.created else {
            return CommandResult::failed(EditError::NotExecuted);
        };
        let id = ctx.resolve(created);
        CommandResult::from_result(ctx.engine.remove_points(&[id]).map(|_| vec![id]))
    }
}

/// Insert a point directly before another one in the same contour
#[derive(Debug, Clone)]
pub struct InsertPointBeforeCommand {
    before: PointId,
    x: f64,
    y: f64,
    point_type: PointType,
    smooth: bool,
    created: Option<PointId>,
}

impl InsertPointBeforeCommand {
    pub fn new(before: PointId, x: f64, y: f64, point_type: PointType, smooth: bool) -> Self {
        Self {
            before,
            x,
            y,
            point_type,
            smooth,
            created: None,
        }
    }

    pub fn point_id(&self) -> Option<PointId> {
        self.created
    }
}

impl Command for InsertPointBeforeCommand {
    fn name(&self) -> &str {
        "Insert Point"
    }

    fn execute(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let before = ctx.resolve(self.before);
        match ctx
            .engine
            .insert_point_before(before, self.x, self.y, self.point_type, self.smooth)
        {
            Ok(id) => {
                if let Some(old) = self.created.replace(id) {
                    ctx.remap.record_point(old, id);
                }
                CommandResult::ok(vec![id])
            }
            Err(error) => CommandResult::failed(error),
        }
    }

    fn undo(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let Some(created) = self.created else {
            return CommandResult::failed(EditError::NotExecuted);
        };
        let id = ctx.resolve(created);
        CommandResult::from_result(ctx.engine.remove_points(&[id]).map(|_| vec![id]))
    }
}

/// Translate a set of points
#[derive(Debug, Clone)]
pub struct MovePointsCommand {
    ids: Vec<PointId>,
    dx: f64,
    dy: f64,
}

impl MovePointsCommand {
    pub fn new(ids: Vec<PointId>, dx: f64, dy: f64) -> Self {
        Self { ids, dx, dy }
    }

    fn apply(&self, ctx: &mut CommandContext, dx: f64, dy: f64) -> CommandResult {
        let ids = ctx.resolve_all(&self.ids);
        CommandResult::from_result(ctx.engine.move_points(&ids, dx, dy).map(|_| ids))
    }
}

impl Command for MovePointsCommand {
    fn name(&self) -> &str {
        "Move Points"
    }

    fn execute(&mut self, ctx: &mut CommandContext) -> CommandResult {
        self.apply(ctx, self.dx, self.dy)
    }

    fn undo(&mut self, ctx: &mut CommandContext) -> CommandResult {
        self.apply(ctx, -self.dx, -self.dy)
    }
}

/// Move one point to an absolute position
#[derive(Debug, Clone)]
pub struct MovePointToCommand {
    id: PointId,
    x: f64,
    y: f64,
    previous: Option<(f64, f64)>,
}

impl MovePointToCommand {
    pub fn new(id: PointId, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            previous: None,
        }
    }
}

impl Command for MovePointToCommand {
    fn name(&self) -> &str {
        "Move Point"
    }

    fn execute(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let id = ctx.resolve(self.id);
        let result = (|| -> EditResult<Vec<PointId>> {
            let point = ctx
                .engine
                .glyph()?
                .point(id)
                .ok_or(EditError::StalePoint(id))?;
            let previous = (point.x, point.y);
            ctx.engine.move_point_to(id, self.x, self.y)?;
            self.previous = Some(previous);
            Ok(vec![id])
        })();
        CommandResult::from_result(result)
    }

    fn undo(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let Some((x, y)) = self.previous else {
            return CommandResult::failed(EditError::NotExecuted);
        };
        let id = ctx.resolve(self.id);
        CommandResult::from_result(ctx.engine.move_point_to(id, x, y).map(|_| vec![id]))
    }
}

/// Write absolute positions for several points in one step
#[derive(Debug, Clone)]
pub struct SetPointPositionsCommand {
    positions: Vec<(PointId, kurbo::Point)>,
    previous: Vec<(PointId, kurbo::Point)>,
}

impl SetPointPositionsCommand {
    pub fn new(positions: Vec<(PointId, kurbo::Point)>) -> Self {
        Self {
            positions,
            previous: Vec::new(),
        }
    }
}

impl Command for SetPointPositionsCommand {
    fn name(&self) -> &str {
        "Set Point Positions"
    }

    fn execute(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let positions: Vec<(PointId, kurbo::Point)> = self
            .positions
            .iter()
            .map(|(id, pos)| (ctx.resolve(*id), *pos))
            .collect();

        let result = (|| -> EditResult<Vec<PointId>> {
            let glyph = ctx.engine.glyph()?;
            let previous = positions
                .iter()
                .map(|(id, _)| {
                    glyph
                        .point(*id)
                        .map(|p| (*id, p.position()))
                        .ok_or(EditError::StalePoint(*id))
                })
                .collect::<EditResult<Vec<_>>>()?;
            ctx.engine.set_point_positions(&positions)?;
            self.previous = previous;
            Ok(positions.iter().map(|(id, _)| *id).collect())
        })();
        CommandResult::from_result(result)
    }

    fn undo(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let previous: Vec<(PointId, kurbo::Point)> = self
            .previous
            .iter()
            .map(|(id, pos)| (ctx.resolve(*id), *pos))
            .collect();
        let ids = previous.iter().map(|(id, _)| *id).collect();
        CommandResult::from_result(ctx.engine.set_point_positions(&previous).map(|_| ids))
    }
}

/// A point captured just before removal
#[derive(Debug, Clone)]
struct RemovedPoint {
    contour_id: ContourId,
    index: usize,
    point: Point,
}

/// Remove points; undo re-creates them (with fresh ids) at their old indices
#[derive(Debug, Clone)]
pub struct RemovePointsCommand {
    ids: Vec<PointId>,
    removed: Vec<RemovedPoint>,
}

impl RemovePointsCommand {
    pub fn new(ids: Vec<PointId>) -> Self {
        Self {
            ids,
            removed: Vec::new(),
        }
    }
}

impl Command for RemovePointsCommand {
    fn name(&self) -> &str {
        "Remove Points"
    }

    fn execute(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let mut seen = HashSet::new();
        let ids: Vec<PointId> = ctx
            .resolve_all(&self.ids)
            .into_iter()
            .filter(|id| seen.insert(*id))
            .collect();
        let result = (|| -> EditResult<Vec<PointId>> {
            let glyph = ctx.engine.glyph()?;
            let mut removed = ids
                .iter()
                .map(|id| {
                    glyph
                        .locate(*id)
                        .map(|(contour, index)| RemovedPoint {
                            contour_id: contour.id,
                            index,
                            point: contour.points[index].clone(),
                        })
                        .ok_or(EditError::StalePoint(*id))
                })
                .collect::<EditResult<Vec<_>>>()?;
            removed.sort_by_key(|r| r.index);
            ctx.engine.remove_points(&ids)?;
            self.removed = removed;
            Ok(ids.clone())
        })();
        CommandResult::from_result(result)
    }

    fn undo(&mut self, ctx: &mut CommandContext) -> CommandResult {
        // Contours must all still exist before anything is re-inserted
        let contours: Vec<ContourId> = self
            .removed
            .iter()
            .map(|r| ctx.resolve_contour(r.contour_id))
            .collect();
        let glyph = match ctx.engine.glyph() {
            Ok(glyph) => glyph,
            Err(error) => return CommandResult::failed(error),
        };
        if let Some(stale) = contours.iter().find(|id| glyph.contour(**id).is_none()) {
            return CommandResult::failed(EditError::StaleContour(*stale));
        }

        // Ascending index order lets every index land where it used to be
        let mut restored = Vec::with_capacity(self.removed.len());
        for (removed, contour_id) in self.removed.iter().zip(contours) {
            let p = &removed.point;
            let before = ctx.engine.glyph().ok().and_then(|glyph| {
                glyph
                    .contour(contour_id)
                    .and_then(|c| c.points.get(removed.index))
                    .map(|p| p.id)
            });
            let result = match before {
                Some(before) => {
                    ctx.engine
                        .insert_point_before(before, p.x, p.y, p.point_type, p.smooth)
                }
                None => ctx
                    .engine
                    .add_point_to_contour(contour_id, p.x, p.y, p.point_type, p.smooth),
            };
            match result {
                Ok(new_id) => {
                    ctx.remap.record_point(p.id, new_id);
                    restored.push(new_id);
                }
                Err(error) => return CommandResult::failed(error),
            }
        }
        CommandResult::ok(restored)
    }
}

/// Flip the smooth flag of an anchor
#[derive(Debug, Clone)]
pub struct ToggleSmoothCommand {
    id: PointId,
}

impl ToggleSmoothCommand {
    pub fn new(id: PointId) -> Self {
        Self { id }
    }
}

impl Command for ToggleSmoothCommand {
    fn name(&self) -> &str {
        "Toggle Smooth"
    }

    fn execute(&mut self, ctx: &mut CommandContext) -> CommandResult {
        let id = ctx.resolve(self.id);
        CommandResult::from_result(ctx.engine.toggle_smooth(id).map(|_| vec![id]))
    }

    fn undo(&mut self, ctx: &mut CommandContext) -> CommandResult {
        self.execute(ctx)
    }
}
