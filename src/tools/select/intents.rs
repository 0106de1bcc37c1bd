//! Reading the canvas under the pointer and carrying out select intents

use super::{SelectHover, SelectIntent};
use crate::core::state::PointId;
use crate::editing::{EditResult, Editor};
use crate::geometry::hit_test::points_in_rect;
use crate::geometry::utilities::{axis_lock_position, snap_to_grid};
use crate::geometry::{hit_test_bounding_box, hit_test_glyph_point, hit_test_glyph_segments};
use kurbo::{Point, Rect, Vec2};
use std::collections::HashSet;
use tracing::debug;

/// Bounding-box handles only show for a selection that spans an area
pub(super) fn selection_box(editor: &Editor) -> Option<Rect> {
    if editor.selection().len() < 2 {
        return None;
    }
    editor
        .selection_bounds()
        .filter(|rect| rect.width() > 0.0 || rect.height() > 0.0)
}

/// Box handles win over points, points over segments
pub(super) fn hover_at(editor: &Editor, pos: Point) -> SelectHover {
    let Ok(glyph) = editor.glyph() else {
        return SelectHover::Nothing;
    };
    let hit = editor.settings().hit;

    if let Some(rect) = selection_box(editor) {
        if let Some(zone) = hit_test_bounding_box(
            rect,
            pos,
            editor.tolerance(hit.bounding_box_handle),
            editor.tolerance(hit.rotation_zone),
        ) {
            return SelectHover::BoundingBox(zone);
        }
    }
    if let Some(point) = hit_test_glyph_point(glyph, pos, editor.tolerance(hit.point_radius)) {
        return SelectHover::Point(point.id);
    }
    if let Some(hit) = hit_test_glyph_segments(glyph, pos, editor.tolerance(hit.segment_radius)) {
        return SelectHover::Segment(hit.hit.segment.id());
    }
    SelectHover::Nothing
}

pub(super) fn point_at(editor: &Editor, pos: Point) -> Option<PointId> {
    let glyph = editor.glyph().ok()?;
    let radius = editor.tolerance(editor.settings().hit.point_radius);
    hit_test_glyph_point(glyph, pos, radius).map(|p| p.id)
}

/// Every point of the segment under `pos`, handles included
pub(super) fn segment_points_at(editor: &Editor, pos: Point) -> Option<Vec<PointId>> {
    let glyph = editor.glyph().ok()?;
    let radius = editor.tolerance(editor.settings().hit.segment_radius);
    let hit = hit_test_glyph_segments(glyph, pos, radius)?;
    Some(hit.hit.segment.points().iter().map(|p| p.id).collect())
}

/// The selection a marquee would leave behind
pub(super) fn marquee_selection(editor: &Editor, rect: Rect, base: &[PointId]) -> Vec<PointId> {
    let mut seen: HashSet<PointId> = base.iter().copied().collect();
    let mut ids = base.to_vec();
    if let Ok(glyph) = editor.glyph() {
        for id in points_in_rect(glyph, rect) {
            if seen.insert(id) {
                ids.push(id);
            }
        }
    }
    ids
}

/// Total drag offset with shift axis lock and grid snap applied
pub(super) fn constrained_offset(editor: &Editor, origin: Point, pos: Point, shift: bool) -> Vec2 {
    let pos = if shift {
        axis_lock_position(pos, origin)
    } else {
        pos
    };
    let offset = pos - origin;
    match editor.settings().grid_snap() {
        Some(size) => snap_to_grid(offset.to_point(), size).to_vec2(),
        None => offset,
    }
}

pub(super) fn apply(intent: SelectIntent, editor: &mut Editor) -> EditResult<()> {
    match intent {
        SelectIntent::Hover(point) => editor.set_hovered(point),
        SelectIntent::SelectPoint { point, toggle } => {
            if toggle {
                editor.selection_mut().toggle(point);
            } else {
                editor.selection_mut().select(point);
            }
        }
        SelectIntent::SelectPoints { points, extend } => {
            if extend {
                editor.selection_mut().extend(points);
            } else {
                editor.selection_mut().set(points);
            }
        }
        SelectIntent::SetSelection(points) => editor.selection_mut().set(points),
        SelectIntent::ClearSelection => editor.selection_mut().clear(),
        SelectIntent::SelectAll => editor.select_all(),
        SelectIntent::Marquee { rect, base } => {
            let ids = marquee_selection(editor, rect, &base);
            editor.selection_mut().set(ids);
        }
        SelectIntent::BeginMove(step) => {
            editor.begin_batch("Move Points")?;
            move_by(editor, step)?;
        }
        SelectIntent::MoveBy(step) => move_by(editor, step)?,
        SelectIntent::EndMove => {
            if editor.is_batching() {
                editor.end_batch()?;
            }
        }
        SelectIntent::CancelMove => {
            if editor.is_batching() {
                editor.cancel_batch()?;
            }
        }
        SelectIntent::BeginTransform => editor.begin_preview()?,
        SelectIntent::PreviewTransform { ids, transform } => {
            editor.preview_transform(&ids, transform)?
        }
        SelectIntent::CommitTransform(label) => {
            editor.commit_preview(label).into_result()?;
        }
        SelectIntent::CancelTransform => {
            if editor.is_previewing() {
                editor.cancel_preview()?;
            }
        }
        SelectIntent::Nudge {
            direction,
            shift,
            cmd,
        } => {
            editor.nudge(direction, shift, cmd).into_result()?;
        }
        SelectIntent::Delete => {
            let removed = editor.delete_selection().into_result()?;
            debug!("Deleted {} points", removed.len());
        }
    }
    Ok(())
}

fn move_by(editor: &mut Editor, step: Vec2) -> EditResult<()> {
    if step == Vec2::ZERO {
        return Ok(());
    }
    editor.move_selection_by(step.x, step.y).into_result()?;
    Ok(())
}
