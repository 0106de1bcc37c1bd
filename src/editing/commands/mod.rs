//! Reversible edit operations
//!
//! A [`Command`] captures whatever it needs for `undo` while it executes,
//! never at construction, so the same command value can be built ahead of
//! time and replayed. Commands talk to the glyph only through the
//! [`FontEngine`] reachable from their [`CommandContext`].

mod composite;
mod contour;
mod glyph;
mod point;

pub use composite::{CompositeCommand, SnapshotCommand};
pub use contour::{
    AddContourCommand, CloseContourCommand, OpenContourCommand, RemoveContourCommand,
    ReverseContourCommand, SetActiveContourCommand,
};
pub use glyph::{MoveAnchorsCommand, SetAdvanceWidthCommand};
pub use point::{
    AddPointCommand, InsertPointBeforeCommand, MovePointToCommand, MovePointsCommand,
    RemovePointsCommand, SetPointPositionsCommand, ToggleSmoothCommand,
};

use super::engine::FontEngine;
use super::error::{EditError, EditResult};
use crate::core::state::{ContourId, PointId};
use std::collections::HashMap;
use std::fmt;

/// Outcome of running a command
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandResult {
    pub success: bool,
    pub affected_point_ids: Vec<PointId>,
    pub error: Option<EditError>,
}

impl CommandResult {
    pub fn ok(affected_point_ids: Vec<PointId>) -> Self {
        Self {
            success: true,
            affected_point_ids,
            error: None,
        }
    }

    pub fn failed(error: EditError) -> Self {
        Self {
            success: false,
            affected_point_ids: Vec::new(),
            error: Some(error),
        }
    }

    pub fn from_result(result: EditResult<Vec<PointId>>) -> Self {
        match result {
            Ok(ids) => Self::ok(ids),
            Err(error) => Self::failed(error),
        }
    }

    /// Back to a `Result`, for callers that chain commands with `?`
    pub fn into_result(self) -> EditResult<Vec<PointId>> {
        if self.success {
            Ok(self.affected_point_ids)
        } else {
            Err(self.error.unwrap_or(EditError::NotExecuted))
        }
    }
}

/// Old → new id table
///
/// Re-creating a removed point (undoing a removal, redoing an addition)
/// hands out a fresh id. Commands further along the history still hold the
/// old one and look it up here.
#[derive(Debug, Default, Clone)]
pub struct IdRemap {
    points: HashMap<PointId, PointId>,
    contours: HashMap<ContourId, ContourId>,
}

/// Upper bound on remap chain length, guards against accidental cycles
const MAX_REMAP_CHAIN: usize = 64;

impl IdRemap {
    pub fn record_point(&mut self, old: PointId, new: PointId) {
        if old != new {
            self.points.insert(old, new);
        }
    }

    pub fn record_contour(&mut self, old: ContourId, new: ContourId) {
        if old != new {
            self.contours.insert(old, new);
        }
    }

    /// Follow the chain of replacements to the newest id
    pub fn point(&self, id: PointId) -> PointId {
        let mut current = id;
        for _ in 0..MAX_REMAP_CHAIN {
            match self.points.get(&current) {
                Some(next) => current = *next,
                None => break,
            }
        }
        current
    }

    pub fn contour(&self, id: ContourId) -> ContourId {
        let mut current = id;
        for _ in 0..MAX_REMAP_CHAIN {
            match self.contours.get(&current) {
                Some(next) => current = *next,
                None => break,
            }
        }
        current
    }

    pub fn points(&self, ids: &[PointId]) -> Vec<PointId> {
        ids.iter().map(|id| self.point(*id)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.contours.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.contours.clear();
    }
}

/// What a command runs against
pub struct CommandContext<'a> {
    pub engine: &'a mut dyn FontEngine,
    pub remap: &'a mut IdRemap,
}

impl<'a> CommandContext<'a> {
    pub fn new(engine: &'a mut dyn FontEngine, remap: &'a mut IdRemap) -> Self {
        Self { engine, remap }
    }

    pub fn resolve(&self, id: PointId) -> PointId {
        self.remap.point(id)
    }

    pub fn resolve_all(&self, ids: &[PointId]) -> Vec<PointId> {
        self.remap.points(ids)
    }

    pub fn resolve_contour(&self, id: ContourId) -> ContourId {
        self.remap.contour(id)
    }
}

/// A named, reversible edit
pub trait Command: fmt::Debug {
    fn name(&self) -> &str;

    fn execute(&mut self, ctx: &mut CommandContext) -> CommandResult;

    fn undo(&mut self, ctx: &mut CommandContext) -> CommandResult;

    fn redo(&mut self, ctx: &mut CommandContext) -> CommandResult {
        self.execute(ctx)
    }
}
