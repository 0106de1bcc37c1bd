//! The editor: one owner for the glyph session and everything around it
//!
//! [`Editor`] holds the font engine, the command history, the selection,
//! the preview session, the redraw scheduler and the viewport. Tools and
//! hosts go through it; it is the only thing that hands commands to the
//! history.

use super::clipboard::{default_adapters, parse_clipboard, ClipboardPayload};
use super::commands::{
    AddContourCommand, AddPointCommand, CloseContourCommand, Command, CommandResult,
    MovePointsCommand, RemoveContourCommand, RemovePointsCommand, SetActiveContourCommand,
    SetPointPositionsCommand, SnapshotCommand, ToggleSmoothCommand,
};
use super::engine::FontEngine;
use super::error::{EditError, EditResult};
use super::history::CommandHistory;
use super::preview::PreviewSession;
use super::redraw::RedrawScheduler;
use super::selection::Selection;
use super::smart_edit::{plan_move, PatternMatcher};
use super::smooth_curves::apply_tangency;
use super::viewport::Viewport;
use crate::core::settings::EditorSettings;
use crate::core::state::{ContourId, Glyph, GlyphSnapshot, PointId};
use crate::geometry::Quadrant;
use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Edge or center line to align the selection to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    Left,
    Right,
    Top,
    Bottom,
    CenterX,
    CenterY,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Fixed point of a scale, rotation or reflection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformOrigin {
    /// A grid position on the selection bounds
    Bounds(Quadrant),
    /// An explicit design-space point
    Point(Point),
}

impl Default for TransformOrigin {
    fn default() -> Self {
        TransformOrigin::Bounds(Quadrant::Center)
    }
}

/// Arrow-key direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NudgeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl NudgeDirection {
    fn unit(&self) -> Vec2 {
        match self {
            NudgeDirection::Left => Vec2::new(-1.0, 0.0),
            NudgeDirection::Right => Vec2::new(1.0, 0.0),
            NudgeDirection::Up => Vec2::new(0.0, 1.0),
            NudgeDirection::Down => Vec2::new(0.0, -1.0),
        }
    }
}

pub struct Editor {
    engine: Box<dyn FontEngine>,
    history: CommandHistory,
    selection: Selection,
    hovered: Option<PointId>,
    preview: Option<PreviewSession>,
    redraw: RedrawScheduler,
    viewport: Viewport,
    settings: EditorSettings,
    matcher: PatternMatcher,
    clipboard: Option<String>,
    last_paste: Option<String>,
    paste_count: usize,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("history", &self.history)
            .field("selection", &self.selection.len())
            .field("previewing", &self.preview.is_some())
            .field("viewport", &self.viewport)
            .finish()
    }
}

impl Editor {
    pub fn new(engine: Box<dyn FontEngine>, settings: EditorSettings) -> Self {
        let redraw = RedrawScheduler::new();
        let mut history = CommandHistory::with_max_depth(settings.history.max_depth);
        let scheduler = redraw.clone();
        history.set_dirty_callback(move || scheduler.request());

        Self {
            engine,
            history,
            selection: Selection::new(),
            hovered: None,
            preview: None,
            redraw,
            viewport: Viewport::default(),
            settings,
            matcher: PatternMatcher::new(),
            clipboard: None,
            last_paste: None,
            paste_count: 0,
        }
    }

    // Session ---------------------------------------------------------------

    pub fn start_session(&mut self, unicode: u32) -> EditResult<GlyphSnapshot> {
        let snapshot = self.engine.start_edit_session(unicode)?;
        self.reset_session_state();
        Ok(snapshot)
    }

    pub fn start_session_by_name(&mut self, name: &str) -> EditResult<GlyphSnapshot> {
        let snapshot = self.engine.start_edit_session_by_name(name)?;
        self.reset_session_state();
        Ok(snapshot)
    }

    /// Close the session, discarding any open batch or preview
    pub fn end_session(&mut self) -> EditResult<()> {
        if self.preview.is_some() {
            self.cancel_preview()?;
        }
        if self.history.is_batching() {
            self.history.cancel_batch(self.engine.as_mut())?;
        }
        self.engine.end_edit_session()?;
        self.reset_session_state();
        Ok(())
    }

    fn reset_session_state(&mut self) {
        self.history.clear();
        self.history.mark_clean();
        self.selection.clear();
        self.hovered = None;
        self.preview = None;
        self.redraw.request();
    }

    pub fn has_session(&self) -> bool {
        self.engine.has_session()
    }

    pub fn glyph(&self) -> EditResult<&Glyph> {
        self.engine.glyph()
    }

    pub fn snapshot(&self) -> EditResult<GlyphSnapshot> {
        self.engine.snapshot()
    }

    pub fn engine(&self) -> &dyn FontEngine {
        self.engine.as_ref()
    }

    // Accessors -------------------------------------------------------------

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        self.redraw.request();
        &mut self.selection
    }

    pub fn hovered(&self) -> Option<PointId> {
        self.hovered
    }

    pub fn set_hovered(&mut self, hovered: Option<PointId>) {
        if self.hovered != hovered {
            self.hovered = hovered;
            self.redraw.request();
        }
    }

    pub fn redraw(&self) -> &RedrawScheduler {
        &self.redraw
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        self.redraw.request();
        &mut self.viewport
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: EditorSettings) {
        self.settings = settings;
    }

    pub fn matcher(&self) -> &PatternMatcher {
        &self.matcher
    }

    /// A pixel tolerance in design units at the current zoom
    pub fn tolerance(&self, px: f64) -> f64 {
        self.viewport.px_to_design(px)
    }

    // History ---------------------------------------------------------------

    /// Run a command through the history
    pub fn execute(&mut self, command: Box<dyn Command>) -> CommandResult {
        let result = self.history.execute(self.engine.as_mut(), command);
        if result.success {
            self.sync_selection();
        }
        result
    }

    pub fn undo(&mut self) -> Option<CommandResult> {
        let result = self.history.undo(self.engine.as_mut());
        self.sync_selection();
        result
    }

    pub fn redo(&mut self) -> Option<CommandResult> {
        let result = self.history.redo(self.engine.as_mut());
        self.sync_selection();
        result
    }

    pub fn begin_batch(&mut self, label: &str) -> EditResult<()> {
        self.history.begin_batch(label)
    }

    pub fn end_batch(&mut self) -> EditResult<()> {
        self.history.end_batch()
    }

    pub fn cancel_batch(&mut self) -> EditResult<()> {
        let result = self.history.cancel_batch(self.engine.as_mut());
        self.sync_selection();
        result
    }

    pub fn is_batching(&self) -> bool {
        self.history.is_batching()
    }

    /// Run `f` inside a batch unless one is already open
    fn batched<F>(&mut self, label: &str, f: F) -> CommandResult
    where
        F: FnOnce(&mut Self) -> CommandResult,
    {
        if self.is_batching() {
            return f(self);
        }
        if let Err(error) = self.begin_batch(label) {
            return CommandResult::failed(error);
        }
        let result = f(self);
        let closed = if result.success {
            self.end_batch()
        } else {
            self.cancel_batch()
        };
        if let Err(error) = closed {
            warn!("Closing batch '{}' failed: {}", label, error);
        }
        result
    }

    fn sync_selection(&mut self) {
        if let Ok(glyph) = self.engine.glyph() {
            self.selection.sync(glyph, self.history.remap());
            if let Some(hovered) = self.hovered {
                if !glyph.contains_point(hovered) {
                    self.hovered = None;
                }
            }
        }
    }

    // Preview ---------------------------------------------------------------

    /// Remember the glyph as it is now; frames are applied relative to it
    pub fn begin_preview(&mut self) -> EditResult<()> {
        if self.preview.is_some() {
            return Err(EditError::PreviewActive);
        }
        let snapshot = self.engine.snapshot()?;
        debug!("Preview started");
        self.preview = Some(PreviewSession::begin(snapshot));
        Ok(())
    }

    pub fn is_previewing(&self) -> bool {
        self.preview.is_some()
    }

    pub fn preview_session(&self) -> Option<&PreviewSession> {
        self.preview.as_ref()
    }

    /// Write a frame straight into the live glyph, bypassing history
    pub fn preview_positions(&mut self, positions: &[(PointId, Point)]) -> EditResult<()> {
        if self.preview.is_none() {
            return Err(EditError::NoPreview);
        }
        self.engine.set_point_positions(positions)?;
        self.redraw.request();
        Ok(())
    }

    /// Apply `transform` to the base positions of `ids`
    pub fn preview_transform(&mut self, ids: &[PointId], transform: Affine) -> EditResult<()> {
        let positions = self
            .preview
            .as_ref()
            .ok_or(EditError::NoPreview)?
            .transformed(ids, transform);
        self.preview_positions(&positions)
    }

    /// Collapse the gesture into one history entry. A gesture that changed
    /// nothing leaves no entry.
    pub fn commit_preview(&mut self, label: &str) -> CommandResult {
        let Some(session) = self.preview.take() else {
            return CommandResult::failed(EditError::NoPreview);
        };
        let after = match self.engine.snapshot() {
            Ok(after) => after,
            Err(error) => return CommandResult::failed(error),
        };
        if after == *session.before() {
            debug!("Preview '{}' committed without changes", label);
            return CommandResult::ok(Vec::new());
        }
        let before = session.before().clone();
        if let Err(error) = self.engine.restore_snapshot(&before) {
            return CommandResult::failed(error);
        }
        info!("Preview committed as '{}'", label);
        self.execute(Box::new(SnapshotCommand::new(label, before, after)))
    }

    /// Put the glyph back the way it was when the preview began
    pub fn cancel_preview(&mut self) -> EditResult<()> {
        let session = self.preview.take().ok_or(EditError::NoPreview)?;
        self.engine.restore_snapshot(session.before())?;
        debug!("Preview cancelled");
        self.redraw.request();
        Ok(())
    }

    // Selection edits -------------------------------------------------------

    pub fn select_all(&mut self) {
        if let Ok(glyph) = self.engine.glyph() {
            let ids: Vec<PointId> = glyph.points().map(|p| p.id).collect();
            self.selection.set(ids);
            self.redraw.request();
        }
    }

    fn selected_ids(&self) -> EditResult<Vec<PointId>> {
        Ok(self.selection.ordered(self.engine.glyph()?))
    }

    pub fn selection_bounds(&self) -> Option<Rect> {
        self.selection.bounds(self.engine.glyph().ok()?)
    }

    /// Move the selection, dragging dependent handles along and re-aiming
    /// opposite handles of smooth anchors
    pub fn move_selection_by(&mut self, dx: f64, dy: f64) -> CommandResult {
        let plan = match self.engine.glyph() {
            Ok(glyph) => plan_move(&self.matcher, glyph, self.selection.ids()),
            Err(error) => return CommandResult::failed(error),
        };
        if plan.moved.is_empty() {
            return CommandResult::ok(Vec::new());
        }
        debug!(
            "Smart move of {} points ({} tangency fixes)",
            plan.moved.len(),
            plan.tangency.len()
        );

        self.batched("Move Points", |editor| {
            let mut result = editor.execute(Box::new(MovePointsCommand::new(plan.moved, dx, dy)));
            if !result.success || plan.tangency.is_empty() {
                return result;
            }
            let adjusted = match editor.engine.glyph() {
                Ok(glyph) => apply_tangency(glyph, &plan.tangency).adjusted_points,
                Err(error) => return CommandResult::failed(error),
            };
            if !adjusted.is_empty() {
                let fix = editor.execute(Box::new(SetPointPositionsCommand::new(adjusted)));
                if !fix.success {
                    return fix;
                }
                result.affected_point_ids.extend(fix.affected_point_ids);
            }
            result
        })
    }

    /// Arrow-key nudge; shift and cmd pick the larger magnitudes
    pub fn nudge(&mut self, direction: NudgeDirection, shift: bool, cmd: bool) -> CommandResult {
        let amount = if cmd {
            self.settings.nudge.cmd
        } else if shift {
            self.settings.nudge.shift
        } else {
            self.settings.nudge.default
        };
        let delta = direction.unit() * amount;
        self.batched("Nudge", |editor| editor.move_selection_by(delta.x, delta.y))
    }

    /// Remove the selected points, and any contour left empty by that
    pub fn delete_selection(&mut self) -> CommandResult {
        let ids = match self.selected_ids() {
            Ok(ids) if ids.is_empty() => return CommandResult::ok(Vec::new()),
            Ok(ids) => ids,
            Err(error) => return CommandResult::failed(error),
        };
        let touched: HashSet<ContourId> = match self.engine.glyph() {
            Ok(glyph) => ids
                .iter()
                .filter_map(|id| glyph.locate(*id).map(|(c, _)| c.id))
                .collect(),
            Err(error) => return CommandResult::failed(error),
        };

        let result = self.batched("Delete Points", |editor| {
            let result = editor.execute(Box::new(RemovePointsCommand::new(ids)));
            if !result.success {
                return result;
            }
            let emptied: Vec<ContourId> = editor
                .engine
                .glyph()
                .map(|g| {
                    g.contours
                        .iter()
                        .filter(|c| c.is_empty() && touched.contains(&c.id))
                        .map(|c| c.id)
                        .collect()
                })
                .unwrap_or_default();
            for contour_id in emptied {
                let removed = editor.execute(Box::new(RemoveContourCommand::new(contour_id)));
                if !removed.success {
                    return removed;
                }
            }
            result
        });
        if result.success {
            self.selection.clear();
        }
        result
    }

    pub fn toggle_smooth_selection(&mut self) -> CommandResult {
        let ids = match self.selected_ids() {
            Ok(ids) => ids,
            Err(error) => return CommandResult::failed(error),
        };
        let anchors: Vec<PointId> = match self.engine.glyph() {
            Ok(glyph) => ids
                .into_iter()
                .filter(|id| glyph.point(*id).is_some_and(|p| p.is_on_curve()))
                .collect(),
            Err(error) => return CommandResult::failed(error),
        };
        self.batched("Toggle Smooth", |editor| {
            let mut affected = Vec::new();
            for id in anchors {
                let result = editor.execute(Box::new(ToggleSmoothCommand::new(id)));
                if !result.success {
                    return result;
                }
                affected.extend(result.affected_point_ids);
            }
            CommandResult::ok(affected)
        })
    }

    // Transforms ------------------------------------------------------------

    /// Selected ids with their positions and the bounds they span
    fn selected_positions(&self) -> EditResult<(Vec<(PointId, Point)>, Rect)> {
        let glyph = self.engine.glyph()?;
        let positions: Vec<(PointId, Point)> = glyph
            .points()
            .filter(|p| self.selection.contains(p.id))
            .map(|p| (p.id, p.position()))
            .collect();
        let bounds = self
            .selection
            .bounds(glyph)
            .ok_or(EditError::NotEnoughPoints { needed: 1, got: 0 })?;
        Ok((positions, bounds))
    }

    fn resolve_origin(origin: TransformOrigin, bounds: Rect) -> Point {
        match origin {
            TransformOrigin::Bounds(quadrant) => quadrant.point_in_rect(bounds),
            TransformOrigin::Point(point) => point,
        }
    }

    fn write_positions(&mut self, label: &str, positions: Vec<(PointId, Point)>) -> CommandResult {
        debug!("{} ({} points)", label, positions.len());
        self.batched(label, |editor| {
            editor.execute(Box::new(SetPointPositionsCommand::new(positions)))
        })
    }

    /// Apply an affine transform about an origin to the selection
    pub fn transform_selection(
        &mut self,
        label: &str,
        transform: Affine,
        origin: TransformOrigin,
    ) -> CommandResult {
        let (positions, bounds) = match self.selected_positions() {
            Ok(found) => found,
            Err(error) => return CommandResult::failed(error),
        };
        let center = Self::resolve_origin(origin, bounds).to_vec2();
        let about = Affine::translate(center) * transform * Affine::translate(-center);
        let moved = positions.into_iter().map(|(id, p)| (id, about * p)).collect();
        self.write_positions(label, moved)
    }

    pub fn scale(&mut self, sx: f64, sy: f64, origin: TransformOrigin) -> CommandResult {
        self.transform_selection("Scale", Affine::scale_non_uniform(sx, sy), origin)
    }

    /// Rotate by `degrees`, counter-clockwise in design space
    pub fn rotate(&mut self, degrees: f64, origin: TransformOrigin) -> CommandResult {
        self.transform_selection("Rotate", Affine::rotate(degrees.to_radians()), origin)
    }

    /// Mirror across a line through the origin: `Horizontal` flips left to
    /// right, `Vertical` flips top to bottom
    pub fn reflect(&mut self, axis: Axis, origin: TransformOrigin) -> CommandResult {
        let flip = match axis {
            Axis::Horizontal => Affine::scale_non_uniform(-1.0, 1.0),
            Axis::Vertical => Affine::scale_non_uniform(1.0, -1.0),
        };
        self.transform_selection("Reflect", flip, origin)
    }

    /// Move the selection so that the `anchor` grid point of its bounds
    /// lands on `target`
    pub fn move_selection_to(&mut self, target: Point, anchor: Quadrant) -> CommandResult {
        let (positions, bounds) = match self.selected_positions() {
            Ok(found) => found,
            Err(error) => return CommandResult::failed(error),
        };
        let delta = target - anchor.point_in_rect(bounds);
        let ids = positions.into_iter().map(|(id, _)| id).collect();
        self.batched("Move Selection", |editor| {
            editor.execute(Box::new(MovePointsCommand::new(ids, delta.x, delta.y)))
        })
    }

    pub fn align(&mut self, alignment: Alignment) -> CommandResult {
        let (positions, bounds) = match self.selected_positions() {
            Ok(found) => found,
            Err(error) => return CommandResult::failed(error),
        };
        let center = bounds.center();
        let aligned = positions
            .into_iter()
            .map(|(id, p)| {
                let p = match alignment {
                    Alignment::Left => Point::new(bounds.x0, p.y),
                    Alignment::Right => Point::new(bounds.x1, p.y),
                    Alignment::Top => Point::new(p.x, bounds.y1),
                    Alignment::Bottom => Point::new(p.x, bounds.y0),
                    Alignment::CenterX => Point::new(center.x, p.y),
                    Alignment::CenterY => Point::new(p.x, center.y),
                };
                (id, p)
            })
            .collect();
        self.write_positions("Align", aligned)
    }

    /// Space the selected points evenly between the two outermost ones
    pub fn distribute(&mut self, axis: Axis) -> CommandResult {
        let (mut positions, _) = match self.selected_positions() {
            Ok(found) => found,
            Err(error) => return CommandResult::failed(error),
        };
        if positions.len() < 3 {
            return CommandResult::failed(EditError::NotEnoughPoints {
                needed: 3,
                got: positions.len(),
            });
        }

        let coord = |p: &Point| match axis {
            Axis::Horizontal => p.x,
            Axis::Vertical => p.y,
        };
        positions.sort_by(|a, b| coord(&a.1).total_cmp(&coord(&b.1)));
        let first = coord(&positions[0].1);
        let last = coord(&positions[positions.len() - 1].1);
        let step = (last - first) / (positions.len() - 1) as f64;

        let distributed = positions
            .into_iter()
            .enumerate()
            .map(|(i, (id, p))| {
                let value = first + step * i as f64;
                let p = match axis {
                    Axis::Horizontal => Point::new(value, p.y),
                    Axis::Vertical => Point::new(p.x, value),
                };
                (id, p)
            })
            .collect();
        self.write_positions("Distribute", distributed)
    }

    // Clipboard -------------------------------------------------------------

    /// Serialize the selection as a native payload and keep it as the
    /// editor's clipboard
    pub fn copy(&mut self) -> Option<String> {
        let glyph = self.engine.glyph().ok()?;
        let payload = ClipboardPayload::from_selection(glyph, self.selection.ids())?;
        match payload.to_json() {
            Ok(text) => {
                debug!("Copied {} contours", payload.contours.len());
                self.clipboard = Some(text.clone());
                Some(text)
            }
            Err(e) => {
                warn!("Failed to serialize clipboard payload: {}", e);
                None
            }
        }
    }

    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    /// Paste clipboard text as new contours and select them. Pasting the
    /// same text again offsets it a little further each time.
    pub fn paste(&mut self, text: &str) -> CommandResult {
        let adapters = default_adapters();
        let Some(payload) = parse_clipboard(text, &adapters) else {
            return CommandResult::ok(Vec::new());
        };

        if self.last_paste.as_deref() == Some(text) {
            self.paste_count += 1;
        } else {
            self.last_paste = Some(text.to_string());
            self.paste_count = 0;
        }
        let offset = self.settings.clipboard.paste_offset * self.paste_count as f64;

        let previous_active = match self.engine.glyph() {
            Ok(glyph) => glyph.active_contour_id,
            Err(error) => return CommandResult::failed(error),
        };

        let result = self.batched("Paste", |editor| {
            let mut pasted = Vec::new();
            for contour in &payload.contours {
                let added = editor.execute(Box::new(AddContourCommand::new()));
                if !added.success {
                    return added;
                }
                for p in &contour.points {
                    let point = editor.execute(Box::new(AddPointCommand::new(
                        p.x + offset,
                        p.y - offset,
                        p.point_type,
                        p.smooth,
                    )));
                    if !point.success {
                        return point;
                    }
                    pasted.extend(point.affected_point_ids);
                }
                if contour.closed {
                    let closed = editor.execute(Box::new(CloseContourCommand::new()));
                    if !closed.success {
                        return closed;
                    }
                }
            }
            let restored = editor.execute(Box::new(SetActiveContourCommand::new(previous_active)));
            if !restored.success {
                return restored;
            }
            CommandResult::ok(pasted)
        });

        if result.success {
            info!("Pasted {} points", result.affected_point_ids.len());
            self.selection.set(result.affected_point_ids.iter().copied());
        }
        result
    }
}
