//! Working out and carrying out what a pen press means

use super::{HandleSlots, IncomingSlot, PenIntent, PenState};
use crate::core::state::{Contour, ContourId, Glyph, Point as GlyphPoint, PointId, PointType};
use crate::editing::commands::{
    AddContourCommand, AddPointCommand, CloseContourCommand, InsertPointBeforeCommand,
    ReverseContourCommand, SetActiveContourCommand, SetPointPositionsCommand, SnapshotCommand,
    ToggleSmoothCommand,
};
use crate::editing::{EditError, EditResult, Editor};
use crate::geometry::segment::points_from_curve;
use crate::geometry::utilities::calculate_final_position_with_constraints;
use crate::geometry::{hit_test_glyph_point, hit_test_glyph_segments, SegmentId, SegmentKind};
use kurbo::Point;
use std::collections::HashSet;
use tracing::debug;

/// Splits closer than this to an end of the segment would stack points
const MIN_SPLIT_T: f64 = 1e-3;

/// Decide what a press at `pos` does. `None` without an edit session.
///
/// In priority order: close the active contour, continue another open
/// contour from an end, split a contour at an anchor, split a segment,
/// otherwise place a new anchor.
pub fn resolve_click(editor: &Editor, pos: Point, shift: bool) -> Option<PenIntent> {
    let glyph = editor.glyph().ok()?;
    let settings = editor.settings();
    let point_radius = editor.tolerance(settings.hit.point_radius);
    let close_radius = editor.tolerance(settings.pen.close_radius);
    let segment_radius = editor.tolerance(settings.hit.segment_radius);
    let active = glyph.active_contour().filter(|c| !c.closed);

    if let Some(contour) = active {
        // A lone anchor with a dragged handle is not a closable shape
        if contour.points.iter().filter(|p| p.is_on_curve()).count() >= 2 {
            if let Some(first) = contour.first() {
                if first.position().distance(pos) < close_radius {
                    return Some(PenIntent::Close {
                        contour: contour.id,
                    });
                }
            }
        }
    }

    if let Some(intent) = continue_target(glyph, pos, point_radius) {
        return Some(intent);
    }

    if let Some(point) = hit_test_glyph_point(glyph, pos, point_radius) {
        if point.is_on_curve() && is_interior(glyph, point.id) {
            return Some(PenIntent::SplitPoint { point: point.id });
        }
    }

    if let Some(hit) = hit_test_glyph_segments(glyph, pos, segment_radius) {
        let t = hit.hit.closest.t;
        if t > MIN_SPLIT_T && t < 1.0 - MIN_SPLIT_T {
            return Some(PenIntent::SplitSegment {
                contour: hit.contour.id,
                segment: hit.hit.segment.id(),
                t,
            });
        }
    }

    let lock = shift
        .then(|| active.and_then(last_anchor).map(|p| p.position()))
        .flatten();
    let pos = calculate_final_position_with_constraints(pos, settings.grid_snap(), lock);
    Some(PenIntent::Place { pos })
}

fn last_anchor(contour: &Contour) -> Option<&GlyphPoint> {
    contour.points.iter().rev().find(|p| p.is_on_curve())
}

/// Nearest end of an open contour other than the one being drawn
fn continue_target(glyph: &Glyph, pos: Point, radius: f64) -> Option<PenIntent> {
    glyph
        .contours
        .iter()
        .filter(|c| !c.closed && Some(c.id) != glyph.active_contour_id)
        .filter_map(|c| {
            let (first, last) = c.endpoints()?;
            let d_first = first.position().distance(pos);
            let d_last = last.position().distance(pos);
            let (distance, from_start) = if d_first < d_last && c.len() > 1 {
                (d_first, true)
            } else {
                (d_last, false)
            };
            (distance < radius).then_some((distance, c.id, from_start))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, contour, from_start)| PenIntent::Continue {
            contour,
            from_start,
        })
}

/// Anchors that are not the open end of a contour
fn is_interior(glyph: &Glyph, id: PointId) -> bool {
    match glyph.locate(id) {
        Some((contour, _)) if contour.closed => contour.len() > 1,
        Some((contour, index)) => index > 0 && index + 1 < contour.len(),
        None => false,
    }
}

/// The glyph with a contour broken at `point`, plus the anchor to draw on
/// from
///
/// A closed contour is reopened so that it starts at `point` and ends at a
/// copy of it. An open contour keeps everything up to `point`; the rest
/// moves into a new contour starting at a copy of it.
pub fn split_contour_at(glyph: &Glyph, point: PointId) -> Option<(Glyph, PointId)> {
    let (contour, index) = glyph.locate(point)?;
    let position = glyph.contours.iter().position(|c| c.id == contour.id)?;
    let source = &contour.points[index];
    let copy = GlyphPoint::new(source.x, source.y, source.point_type, false);
    let copy_id = copy.id;
    let mut after = glyph.clone();

    if contour.closed {
        let n = contour.len();
        let mut points: Vec<GlyphPoint> = (0..n)
            .map(|k| contour.points[(index + k) % n].clone())
            .collect();
        points.push(copy);
        let target = &mut after.contours[position];
        target.points = points;
        target.closed = false;
        after.active_contour_id = Some(target.id);
        return Some((after, copy_id));
    }

    if index == 0 || index + 1 >= contour.len() {
        return None;
    }
    let tail: Vec<GlyphPoint> = std::iter::once(copy)
        .chain(contour.points[index + 1..].iter().cloned())
        .collect();
    after.contours[position].points.truncate(index + 1);
    after
        .contours
        .insert(position + 1, Contour::with_points(tail, false));
    after.active_contour_id = Some(contour.id);
    Some((after, point))
}

/// The glyph with a curve segment subdivided at `t`, plus the new anchor
///
/// The segment's handles are replaced by the handles of the two halves;
/// its end anchors keep their ids.
pub fn split_segment(
    glyph: &Glyph,
    contour: ContourId,
    segment: SegmentId,
    t: f64,
) -> Option<(Glyph, PointId)> {
    let source = glyph.contour(contour)?;
    let found = source.segments().into_iter().find(|s| s.id() == segment)?;
    let (left, right) = found.split_at(t);
    let old_handles: HashSet<PointId> = found.handles().iter().map(|p| p.id).collect();

    let left = points_from_curve(&left);
    let right = points_from_curve(&right);
    let mut middle = left.last()?.clone();
    middle.smooth = found.kind() != SegmentKind::Line;
    let middle_id = middle.id;

    let inner: Vec<GlyphPoint> = left[1..left.len() - 1]
        .iter()
        .cloned()
        .chain(std::iter::once(middle))
        .chain(right[1..right.len() - 1].iter().cloned())
        .collect();

    let mut after = glyph.clone();
    let target = after.contour_mut(contour)?;
    target.points.retain(|p| !old_handles.contains(&p.id));
    let first = target.index_of(segment.first)?;
    target.points.splice(first + 1..first + 1, inner);
    Some((after, middle_id))
}

/// Handle slots for the anchor a press resolved to
fn slots_for(intent: &PenIntent, glyph: &Glyph) -> HandleSlots {
    match intent {
        PenIntent::Place { .. } => {
            let has_previous = glyph
                .active_contour()
                .is_some_and(|c| !c.closed && !c.is_empty());
            HandleSlots {
                incoming: has_previous.then_some(IncomingSlot::BeforeAnchor),
                outgoing: true,
            }
        }
        PenIntent::Close { .. } => HandleSlots {
            incoming: Some(IncomingSlot::ContourEnd),
            outgoing: false,
        },
        PenIntent::Continue { .. } => HandleSlots {
            incoming: None,
            outgoing: true,
        },
        _ => HandleSlots::NONE,
    }
}

/// State right after a press, before the intent has run
pub(super) fn pressed_state(intent: &PenIntent, editor: &Editor, origin: Point) -> PenState {
    let (anchor, slots) = match editor.glyph() {
        Ok(glyph) => {
            let anchor = match intent {
                PenIntent::Close { contour } => {
                    glyph.contour(*contour).and_then(|c| c.first()).map(|p| p.id)
                }
                PenIntent::SplitPoint { point } => Some(*point),
                _ => None,
            };
            (anchor, slots_for(intent, glyph))
        }
        Err(_) => (None, HandleSlots::NONE),
    };
    PenState::Anchored {
        anchor,
        origin,
        slots,
    }
}

fn first_id(ids: Vec<PointId>) -> EditResult<PointId> {
    ids.first().copied().ok_or(EditError::NotExecuted)
}

/// Run the press intent inside a fresh batch; returns the anchor
pub(super) fn run_press(editor: &mut Editor, intent: &PenIntent) -> EditResult<PointId> {
    editor.begin_batch(intent.label())?;
    let result = press(editor, intent);
    if result.is_err() {
        editor.cancel_batch()?;
    }
    result
}

fn press(editor: &mut Editor, intent: &PenIntent) -> EditResult<PointId> {
    match *intent {
        PenIntent::Close { contour } => {
            let first = editor
                .glyph()?
                .contour(contour)
                .and_then(|c| c.first())
                .map(|p| p.id)
                .ok_or(EditError::StaleContour(contour))?;
            editor.execute(Box::new(CloseContourCommand::new())).into_result()?;
            Ok(first)
        }
        PenIntent::Continue {
            contour,
            from_start,
        } => {
            if from_start {
                editor
                    .execute(Box::new(ReverseContourCommand::new(contour)))
                    .into_result()?;
            }
            editor
                .execute(Box::new(SetActiveContourCommand::new(Some(contour))))
                .into_result()?;
            editor
                .glyph()?
                .contour(contour)
                .and_then(|c| c.last())
                .map(|p| p.id)
                .ok_or(EditError::StaleContour(contour))
        }
        PenIntent::SplitPoint { point } => {
            let before = editor.snapshot()?;
            let (after, anchor) =
                split_contour_at(&before, point).ok_or(EditError::StalePoint(point))?;
            editor
                .execute(Box::new(SnapshotCommand::new("Split Contour", before, after)))
                .into_result()?;
            Ok(anchor)
        }
        PenIntent::SplitSegment {
            contour,
            segment,
            t,
        } => {
            let glyph = editor.glyph()?;
            let source = glyph.contour(contour).ok_or(EditError::StaleContour(contour))?;
            let found = source
                .segments()
                .into_iter()
                .find(|s| s.id() == segment)
                .ok_or(EditError::StalePoint(segment.first))?;
            if found.kind() == SegmentKind::Line {
                let at = found.point_at(t);
                let ids = editor
                    .execute(Box::new(InsertPointBeforeCommand::new(
                        segment.last,
                        at.x,
                        at.y,
                        PointType::OnCurve,
                        false,
                    )))
                    .into_result()?;
                return first_id(ids);
            }
            let before = editor.snapshot()?;
            let (after, anchor) = split_segment(&before, contour, segment, t)
                .ok_or(EditError::StaleContour(contour))?;
            editor
                .execute(Box::new(SnapshotCommand::new("Split Segment", before, after)))
                .into_result()?;
            Ok(anchor)
        }
        PenIntent::Place { pos } => {
            let drawing = editor
                .glyph()?
                .active_contour()
                .is_some_and(|c| !c.closed);
            if !drawing {
                editor.execute(Box::new(AddContourCommand::new())).into_result()?;
            }
            let ids = editor
                .execute(Box::new(AddPointCommand::new(
                    pos.x,
                    pos.y,
                    PointType::OnCurve,
                    false,
                )))
                .into_result()?;
            first_id(ids)
        }
        _ => Err(EditError::NotExecuted),
    }
}

/// Mirror of `pos` through `anchor`
fn mirrored(anchor: Point, pos: Point) -> Point {
    anchor + (anchor - pos)
}

/// Create the handles a drag pulls out of `anchor`
pub(super) fn pull_handles(
    editor: &mut Editor,
    anchor: PointId,
    slots: HandleSlots,
    pos: Point,
) -> EditResult<(Option<PointId>, Option<PointId>)> {
    let (contour, center) = {
        let glyph = editor.glyph()?;
        let (contour, index) = glyph.locate(anchor).ok_or(EditError::StalePoint(anchor))?;
        (contour.id, contour.points[index].position())
    };
    let back = mirrored(center, pos);

    let incoming = match slots.incoming {
        Some(IncomingSlot::BeforeAnchor) => Some(editor.execute(Box::new(
            InsertPointBeforeCommand::new(anchor, back.x, back.y, PointType::OffCurve, false),
        ))),
        Some(IncomingSlot::ContourEnd) => Some(editor.execute(Box::new(
            AddPointCommand::to_contour(contour, back.x, back.y, PointType::OffCurve, false),
        ))),
        None => None,
    }
    .map(|result| result.into_result().and_then(first_id))
    .transpose()?;

    let outgoing = if slots.outgoing {
        let ids = editor
            .execute(Box::new(AddPointCommand::to_contour(
                contour,
                pos.x,
                pos.y,
                PointType::OffCurve,
                false,
            )))
            .into_result()?;
        Some(first_id(ids)?)
    } else {
        None
    };

    if needs_smooth(editor.glyph()?, anchor) {
        editor
            .execute(Box::new(ToggleSmoothCommand::new(anchor)))
            .into_result()?;
    }
    debug!(
        "Pulled handles from {} (in: {:?}, out: {:?})",
        anchor, incoming, outgoing
    );
    Ok((incoming, outgoing))
}

/// A corner anchor with handles on both sides becomes smooth
fn needs_smooth(glyph: &Glyph, anchor: PointId) -> bool {
    let Some((contour, index)) = glyph.locate(anchor) else {
        return false;
    };
    let point = &contour.points[index];
    if point.smooth || !point.is_on_curve() {
        return false;
    }
    let n = contour.len();
    let neighbour = |offset: isize| {
        let i = index as isize + offset;
        if contour.closed {
            contour.points.get(i.rem_euclid(n as isize) as usize)
        } else {
            usize::try_from(i).ok().and_then(|i| contour.points.get(i))
        }
    };
    let is_handle = |p: Option<&GlyphPoint>| p.is_some_and(|p| !p.is_on_curve());
    is_handle(neighbour(-1)) && is_handle(neighbour(1))
}

/// Move pulled handles to follow the pointer, mirrored through the anchor
pub(super) fn move_handles(
    editor: &mut Editor,
    anchor: PointId,
    incoming: Option<PointId>,
    outgoing: Option<PointId>,
    pos: Point,
    shift: bool,
) -> EditResult<()> {
    let center = editor
        .glyph()?
        .point(anchor)
        .map(|p| p.position())
        .ok_or(EditError::StalePoint(anchor))?;
    let pos = calculate_final_position_with_constraints(
        pos,
        editor.settings().grid_snap(),
        shift.then_some(center),
    );

    let mut positions = Vec::with_capacity(2);
    if let Some(out) = outgoing {
        positions.push((out, pos));
    }
    if let Some(back) = incoming {
        positions.push((back, mirrored(center, pos)));
    }
    if positions.is_empty() {
        return Ok(());
    }
    editor
        .execute(Box::new(SetPointPositionsCommand::new(positions)))
        .into_result()
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_line() -> (Glyph, Vec<PointId>) {
        let points = vec![
            GlyphPoint::on_curve(0.0, 0.0),
            GlyphPoint::on_curve(100.0, 0.0),
            GlyphPoint::on_curve(200.0, 0.0),
        ];
        let ids = points.iter().map(|p| p.id).collect();
        let mut glyph = Glyph::new("a", None, 500.0);
        glyph.contours.push(Contour::with_points(points, false));
        (glyph, ids)
    }

    #[test]
    fn split_open_contour_in_two() {
        let (glyph, ids) = open_line();
        let (after, anchor) = split_contour_at(&glyph, ids[1]).unwrap();
        assert_eq!(anchor, ids[1]);
        assert_eq!(after.contours.len(), 2);
        assert_eq!(after.contours[0].len(), 2);
        assert_eq!(after.contours[1].len(), 2);
        assert_eq!(after.contours[1].points[0].position(), Point::new(100.0, 0.0));
        assert_ne!(after.contours[1].points[0].id, ids[1]);
        assert_eq!(after.active_contour_id, Some(glyph.contours[0].id));
    }

    #[test]
    fn split_open_contour_end_is_refused() {
        let (glyph, ids) = open_line();
        assert!(split_contour_at(&glyph, ids[2]).is_none());
    }

    #[test]
    fn split_closed_contour_reopens_it() {
        let (mut glyph, ids) = open_line();
        glyph.contours[0].closed = true;
        let (after, anchor) = split_contour_at(&glyph, ids[1]).unwrap();
        let contour = &after.contours[0];
        assert!(!contour.closed);
        assert_eq!(contour.len(), 4);
        assert_eq!(contour.points[0].id, ids[1]);
        assert_eq!(contour.points[3].id, anchor);
        assert_eq!(contour.points[3].position(), Point::new(100.0, 0.0));
    }

    #[test]
    fn split_cubic_keeps_shape() {
        let points = vec![
            GlyphPoint::on_curve(0.0, 0.0),
            GlyphPoint::off_curve(0.0, 100.0),
            GlyphPoint::off_curve(100.0, 100.0),
            GlyphPoint::on_curve(100.0, 0.0),
        ];
        let (first, last) = (points[0].id, points[3].id);
        let mut glyph = Glyph::new("a", None, 500.0);
        glyph.contours.push(Contour::with_points(points, false));
        let contour = glyph.contours[0].id;
        let original = glyph.contours[0].segments()[0].to_curve();

        let (after, middle) =
            split_segment(&glyph, contour, SegmentId { first, last }, 0.5).unwrap();
        let split = &after.contours[0];
        assert_eq!(split.len(), 7);
        assert_eq!(split.points[0].id, first);
        assert_eq!(split.points[6].id, last);
        assert_eq!(split.points[3].id, middle);
        assert!(split.points[3].smooth);

        let halves = split.segments();
        assert_eq!(halves.len(), 2);
        let expected = original.point_at(0.5);
        assert!(halves[0].point_at(1.0).distance(expected) < 1e-9);
        assert!(halves[1].point_at(0.5).distance(original.point_at(0.75)) < 1e-9);
    }
}
