//! Smooth curve handling
//!
//! When one handle of a smooth anchor moves, the opposite handle is turned
//! so both stay on one straight line through the anchor. The opposite
//! handle keeps its own length; only its direction changes.
//!
//! ```text
//! [handle] ---- [SMOOTH anchor] ---- [handle]
//!     ↑                                  ↑
//!  re-aimed                           moved
//! ```

use super::smart_edit::TangencyFix;
use crate::core::state::{Glyph, PointId};
use kurbo::Point;
use tracing::debug;

/// Below this length the moved handle has no usable direction
const MIN_HANDLE_LENGTH: f64 = 1e-10;

/// Points automatically adjusted to keep smooth anchors smooth
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SmoothCurveResult {
    pub adjusted_points: Vec<(PointId, Point)>,
}

/// Where the opposite handle goes once `handle` has moved
///
/// Returns `None` when the moved handle sits on the anchor.
pub fn opposite_handle_position(anchor: Point, handle: Point, opposite: Point) -> Option<Point> {
    let direction = handle - anchor;
    let length = direction.hypot();
    if length < MIN_HANDLE_LENGTH {
        return None;
    }
    let magnitude = (opposite - anchor).hypot();
    Some(anchor - direction * (magnitude / length))
}

/// Mirror a handle through its anchor, the way the pen pulls out a
/// symmetric pair
pub fn mirror_handle(anchor: Point, handle: Point) -> Point {
    anchor - (handle - anchor)
}

/// Compute new positions for the opposite handles of `fixes`, reading the
/// already-moved glyph
pub fn apply_tangency(glyph: &Glyph, fixes: &[TangencyFix]) -> SmoothCurveResult {
    let mut adjusted_points = Vec::new();

    for fix in fixes {
        let (Some(anchor), Some(handle), Some(opposite)) = (
            glyph.point(fix.anchor),
            glyph.point(fix.handle),
            glyph.point(fix.opposite),
        ) else {
            debug!("Skipping tangency fix with stale points {:?}", fix);
            continue;
        };

        match opposite_handle_position(anchor.position(), handle.position(), opposite.position()) {
            Some(position) => {
                debug!(
                    "Smooth constraint: handle at ({:.1}, {:.1}), opposite to ({:.1}, {:.1})",
                    handle.x, handle.y, position.x, position.y
                );
                adjusted_points.push((fix.opposite, position));
            }
            None => debug!("Handle {:?} collapsed onto its anchor", fix.handle),
        }
    }

    SmoothCurveResult { adjusted_points }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{Contour, Point as GlyphPoint};

    #[test]
    fn opposite_points_away_and_keeps_length() {
        let anchor = Point::new(50.0, 50.0);
        let opposite = Point::new(0.0, 0.0);
        let moved = Point::new(100.0, 50.0);

        let result = opposite_handle_position(anchor, moved, opposite).unwrap();
        let to_opposite = result - anchor;
        let to_moved = moved - anchor;

        assert!(to_opposite.dot(to_moved) < 0.0);
        assert!((to_opposite.hypot() - (opposite - anchor).hypot()).abs() < 1e-10);
        // Collinear through the anchor
        assert!(to_opposite.cross(to_moved).abs() < 1e-9);
    }

    #[test]
    fn degenerate_handle_is_skipped() {
        let anchor = Point::new(10.0, 10.0);
        assert_eq!(
            opposite_handle_position(anchor, anchor, Point::new(0.0, 0.0)),
            None
        );
    }

    #[test]
    fn mirror() {
        assert_eq!(
            mirror_handle(Point::new(10.0, 10.0), Point::new(20.0, 15.0)),
            Point::new(0.0, 5.0)
        );
    }

    #[test]
    fn apply_reads_glyph_positions() {
        let h1 = GlyphPoint::off_curve(0.0, 0.0);
        let smooth = GlyphPoint::on_curve(50.0, 50.0).with_smooth(true);
        let h2 = GlyphPoint::off_curve(100.0, 50.0);
        let fix = TangencyFix {
            anchor: smooth.id,
            handle: h2.id,
            opposite: h1.id,
        };
        let opposite_id = h1.id;
        let mut glyph = Glyph::new("a", None, 500.0);
        glyph
            .contours
            .push(Contour::with_points(vec![h1, smooth, h2], false));

        let result = apply_tangency(&glyph, &[fix]);
        assert_eq!(result.adjusted_points.len(), 1);
        let (id, pos) = result.adjusted_points[0];
        assert_eq!(id, opposite_id);
        assert!((pos.y - 50.0).abs() < 1e-9);
        assert!(pos.x < 50.0);
    }
}
