//! Point selection

use super::commands::IdRemap;
use crate::core::state::{Glyph, PointId};
use crate::geometry::hit_test::points_bounds;
use kurbo::Rect;
use std::collections::HashSet;

/// The set of selected points
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Selection {
    points: HashSet<PointId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.points.contains(&id)
    }

    pub fn ids(&self) -> &HashSet<PointId> {
        &self.points
    }

    /// Replace the selection with a single point
    pub fn select(&mut self, id: PointId) {
        self.points.clear();
        self.points.insert(id);
    }

    pub fn add(&mut self, id: PointId) {
        self.points.insert(id);
    }

    pub fn remove(&mut self, id: PointId) {
        self.points.remove(&id);
    }

    /// Shift-click behaviour
    pub fn toggle(&mut self, id: PointId) {
        if !self.points.remove(&id) {
            self.points.insert(id);
        }
    }

    pub fn set(&mut self, ids: impl IntoIterator<Item = PointId>) {
        self.points = ids.into_iter().collect();
    }

    pub fn extend(&mut self, ids: impl IntoIterator<Item = PointId>) {
        self.points.extend(ids);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Selected ids in document order
    pub fn ordered(&self, glyph: &Glyph) -> Vec<PointId> {
        glyph
            .points()
            .map(|p| p.id)
            .filter(|id| self.points.contains(id))
            .collect()
    }

    /// Bounds of the selected points
    pub fn bounds(&self, glyph: &Glyph) -> Option<Rect> {
        points_bounds(glyph.points().filter(|p| self.points.contains(&p.id)))
    }

    /// Follow id replacements and drop ids that no longer exist
    pub fn sync(&mut self, glyph: &Glyph, remap: &IdRemap) {
        self.points = self
            .points
            .iter()
            .map(|id| remap.point(*id))
            .filter(|id| glyph.contains_point(*id))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{Contour, Point};

    #[test]
    fn toggle_adds_and_removes() {
        let id = PointId::new();
        let mut selection = Selection::new();
        selection.toggle(id);
        assert!(selection.contains(id));
        selection.toggle(id);
        assert!(selection.is_empty());
    }

    #[test]
    fn sync_drops_missing_and_follows_remap() {
        let kept = Point::on_curve(0.0, 0.0);
        let replacement = Point::on_curve(10.0, 0.0);
        let mut glyph = Glyph::new("a", None, 500.0);
        let (kept_id, replacement_id) = (kept.id, replacement.id);
        glyph
            .contours
            .push(Contour::with_points(vec![kept, replacement], false));

        let old_id = PointId::new();
        let gone = PointId::new();
        let mut remap = IdRemap::default();
        remap.record_point(old_id, replacement_id);

        let mut selection = Selection::new();
        selection.set([kept_id, old_id, gone]);
        selection.sync(&glyph, &remap);

        assert_eq!(selection.len(), 2);
        assert!(selection.contains(kept_id));
        assert!(selection.contains(replacement_id));
        assert_eq!(selection.ordered(&glyph), vec![kept_id, replacement_id]);
    }
}
