//! Live preview sessions for resize and rotate gestures
//!
//! A session remembers the glyph as it was when the gesture began.
//! Intermediate frames are computed from those base positions, never from
//! the previous frame, so rounding never accumulates.

use crate::core::state::{GlyphSnapshot, PointId};
use kurbo::{Affine, Point, Vec2};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct PreviewSession {
    before: GlyphSnapshot,
    base_positions: HashMap<PointId, Point>,
}

impl PreviewSession {
    pub fn begin(before: GlyphSnapshot) -> Self {
        let base_positions = before.points().map(|p| (p.id, p.position())).collect();
        Self {
            before,
            base_positions,
        }
    }

    pub fn before(&self) -> &GlyphSnapshot {
        &self.before
    }

    pub fn base_position(&self, id: PointId) -> Option<Point> {
        self.base_positions.get(&id).copied()
    }

    /// Positions of `ids` with `transform` applied to their base positions.
    /// Unknown ids are skipped.
    pub fn transformed(&self, ids: &[PointId], transform: Affine) -> Vec<(PointId, Point)> {
        ids.iter()
            .filter_map(|id| self.base_position(*id).map(|p| (*id, transform * p)))
            .collect()
    }

    pub fn translated(&self, ids: &[PointId], delta: Vec2) -> Vec<(PointId, Point)> {
        self.transformed(ids, Affine::translate(delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{Contour, Glyph, Point as GlyphPoint};

    #[test]
    fn frames_are_relative_to_base() {
        let p = GlyphPoint::on_curve(10.0, 0.0);
        let id = p.id;
        let mut glyph = Glyph::new("a", None, 500.0);
        glyph.contours.push(Contour::with_points(vec![p], false));

        let session = PreviewSession::begin(glyph);
        let first = session.translated(&[id], Vec2::new(5.0, 0.0));
        let second = session.translated(&[id], Vec2::new(7.0, 0.0));
        assert_eq!(first[0].1, Point::new(15.0, 0.0));
        assert_eq!(second[0].1, Point::new(17.0, 0.0));
        assert!(session.transformed(&[PointId::new()], Affine::IDENTITY).is_empty());
    }
}
