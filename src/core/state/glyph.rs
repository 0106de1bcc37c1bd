//! Glyph outline data
//!
//! A [`Glyph`] owns an ordered list of [`Contour`]s, each of which owns an
//! ordered list of [`Point`]s. The same types double as the immutable
//! snapshot exchanged with rendering, undo and preview rollback: a snapshot
//! is simply a cloned `Glyph` that nobody mutates afterwards.

use super::entity::{AnchorId, ContourId, PointId};
use crate::geometry::segment::{self, Segment};
use serde::{Deserialize, Serialize};

/// Whether the outline passes through a point or is only shaped by it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointType {
    /// Anchor: the curve passes through this point
    OnCurve,
    /// Handle: a bezier control point
    OffCurve,
}

impl PointType {
    pub fn is_on_curve(&self) -> bool {
        matches!(self, PointType::OnCurve)
    }

    /// Only anchors carry the smooth flag
    pub fn can_be_smooth(&self) -> bool {
        self.is_on_curve()
    }
}

/// A single point in a contour
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub id: PointId,
    pub x: f64,
    pub y: f64,
    pub point_type: PointType,
    #[serde(default)]
    pub smooth: bool,
}

impl Point {
    /// Create a point with a fresh id. The smooth flag is dropped for handles.
    pub fn new(x: f64, y: f64, point_type: PointType, smooth: bool) -> Self {
        Self {
            id: PointId::new(),
            x,
            y,
            point_type,
            smooth: smooth && point_type.can_be_smooth(),
        }
    }

    pub fn on_curve(x: f64, y: f64) -> Self {
        Self::new(x, y, PointType::OnCurve, false)
    }

    pub fn off_curve(x: f64, y: f64) -> Self {
        Self::new(x, y, PointType::OffCurve, false)
    }

    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth && self.point_type.can_be_smooth();
        self
    }

    pub fn is_on_curve(&self) -> bool {
        self.point_type.is_on_curve()
    }

    pub fn is_smooth(&self) -> bool {
        self.smooth && self.is_on_curve()
    }

    pub fn position(&self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Compare geometry and flags, ignoring identity
    pub fn same_shape(&self, other: &Point) -> bool {
        self.x == other.x
            && self.y == other.y
            && self.point_type == other.point_type
            && self.smooth == other.smooth
    }
}

/// An ordered, possibly closed sequence of points
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contour {
    pub id: ContourId,
    #[serde(default)]
    pub closed: bool,
    pub points: Vec<Point>,
}

impl Default for Contour {
    fn default() -> Self {
        Self::new()
    }
}

impl Contour {
    pub fn new() -> Self {
        Self {
            id: ContourId::new(),
            closed: false,
            points: Vec::new(),
        }
    }

    pub fn with_points(points: Vec<Point>, closed: bool) -> Self {
        Self {
            id: ContourId::new(),
            closed,
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn index_of(&self, id: PointId) -> Option<usize> {
        self.points.iter().position(|p| p.id == id)
    }

    pub fn point(&self, id: PointId) -> Option<&Point> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn point_mut(&mut self, id: PointId) -> Option<&mut Point> {
        self.points.iter_mut().find(|p| p.id == id)
    }

    pub fn first(&self) -> Option<&Point> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    /// First and last anchors of an open contour, the places a pen can resume from
    pub fn endpoints(&self) -> Option<(&Point, &Point)> {
        if self.closed {
            return None;
        }
        let first = self.points.iter().find(|p| p.is_on_curve())?;
        let last = self.points.iter().rev().find(|p| p.is_on_curve())?;
        Some((first, last))
    }

    /// Derive the curve segments of this contour
    pub fn segments(&self) -> Vec<Segment<'_>> {
        segment::parse(&self.points, self.closed)
    }

    pub fn same_shape(&self, other: &Contour) -> bool {
        self.closed == other.closed
            && self.points.len() == other.points.len()
            && self
                .points
                .iter()
                .zip(&other.points)
                .all(|(a, b)| a.same_shape(b))
    }
}

/// A named reference point, separate from the outline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    pub id: AnchorId,
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl Anchor {
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: AnchorId::new(),
            name: name.into(),
            x,
            y,
        }
    }
}

/// A glyph being edited
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Glyph {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unicode: Option<u32>,
    pub advance_width: f64,
    #[serde(default)]
    pub contours: Vec<Contour>,
    #[serde(default)]
    pub anchors: Vec<Anchor>,
    #[serde(default)]
    pub active_contour_id: Option<ContourId>,
}

/// Immutable point-in-time copy of a glyph
pub type GlyphSnapshot = Glyph;

impl Glyph {
    pub fn new(name: impl Into<String>, unicode: Option<u32>, advance_width: f64) -> Self {
        Self {
            name: name.into(),
            unicode,
            advance_width,
            contours: Vec::new(),
            anchors: Vec::new(),
            active_contour_id: None,
        }
    }

    pub fn contour(&self, id: ContourId) -> Option<&Contour> {
        self.contours.iter().find(|c| c.id == id)
    }

    pub fn contour_mut(&mut self, id: ContourId) -> Option<&mut Contour> {
        self.contours.iter_mut().find(|c| c.id == id)
    }

    pub fn active_contour(&self) -> Option<&Contour> {
        self.active_contour_id.and_then(|id| self.contour(id))
    }

    /// Locate a point: the contour that owns it and its index there
    pub fn locate(&self, id: PointId) -> Option<(&Contour, usize)> {
        self.contours
            .iter()
            .find_map(|c| c.index_of(id).map(|index| (c, index)))
    }

    pub fn point(&self, id: PointId) -> Option<&Point> {
        self.locate(id).map(|(c, index)| &c.points[index])
    }

    pub fn contains_point(&self, id: PointId) -> bool {
        self.locate(id).is_some()
    }

    /// Every point in document order
    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.contours.iter().flat_map(|c| c.points.iter())
    }

    pub fn point_count(&self) -> usize {
        self.contours.iter().map(Contour::len).sum()
    }

    /// Structural equality that ignores entity ids
    pub fn same_shape(&self, other: &Glyph) -> bool {
        self.name == other.name
            && self.advance_width == other.advance_width
            && self.contours.len() == other.contours.len()
            && self
                .contours
                .iter()
                .zip(&other.contours)
                .all(|(a, b)| a.same_shape(b))
            && self.anchors.len() == other.anchors.len()
            && self
                .anchors
                .iter()
                .zip(&other.anchors)
                .all(|(a, b)| a.name == b.name && a.x == b.x && a.y == b.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_cannot_be_smooth() {
        let handle = Point::new(0.0, 0.0, PointType::OffCurve, true);
        assert!(!handle.smooth);
        assert!(!handle.is_smooth());

        let anchor = Point::on_curve(10.0, 10.0).with_smooth(true);
        assert!(anchor.is_smooth());
    }

    #[test]
    fn locate_finds_owner_and_index() {
        let mut glyph = Glyph::new("a", Some(0x61), 500.0);
        let p0 = Point::on_curve(0.0, 0.0);
        let p1 = Point::on_curve(100.0, 0.0);
        let target = p1.id;
        glyph
            .contours
            .push(Contour::with_points(vec![p0, p1], false));

        let (contour, index) = glyph.locate(target).unwrap();
        assert_eq!(contour.len(), 2);
        assert_eq!(index, 1);
        assert!(glyph.locate(PointId::new()).is_none());
    }

    #[test]
    fn open_contour_endpoints_skip_trailing_handles() {
        let contour = Contour::with_points(
            vec![
                Point::on_curve(0.0, 0.0),
                Point::on_curve(100.0, 0.0),
                Point::off_curve(150.0, 50.0),
            ],
            false,
        );
        let (first, last) = contour.endpoints().unwrap();
        assert_eq!(first.x, 0.0);
        assert_eq!(last.x, 100.0);

        let closed = Contour::with_points(contour.points.clone(), true);
        assert!(closed.endpoints().is_none());
    }

    #[test]
    fn same_shape_ignores_ids() {
        let a = Contour::with_points(vec![Point::on_curve(1.0, 2.0)], true);
        let b = Contour::with_points(vec![Point::on_curve(1.0, 2.0)], true);
        assert_ne!(a, b);
        assert!(a.same_shape(&b));
    }

    #[test]
    fn snapshot_json_uses_camel_case() {
        let mut glyph = Glyph::new("A", Some(65), 600.0);
        glyph
            .contours
            .push(Contour::with_points(vec![Point::off_curve(0.0, 0.0)], false));
        let json = serde_json::to_value(&glyph).unwrap();
        assert_eq!(json["advanceWidth"], 600.0);
        assert_eq!(json["contours"][0]["points"][0]["pointType"], "offCurve");
        assert!(json["activeContourId"].is_null());
    }
}
