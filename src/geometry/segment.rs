//! Segment derivation from contour point lists
//!
//! Segments are never stored. They are re-derived from a contour's points
//! and closed flag whenever rendering or hit-testing needs them, and borrow
//! the points they span so their identity follows the points' ids.

use super::curve::{ClosestPoint, Curve};
use crate::core::state::{Point, PointId};
use kurbo::{Rect, Vec2};
use std::fmt;

/// The three kinds of outline segment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Line,
    Quad,
    Cubic,
}

/// Stable identity of a segment: its first and last on-curve point
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SegmentId {
    pub first: PointId,
    pub last: PointId,
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.first, self.last)
    }
}

/// A line, quadratic or cubic piece of a contour, borrowing its points
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Segment<'a> {
    Line(&'a Point, &'a Point),
    Quad(&'a Point, &'a Point, &'a Point),
    Cubic(&'a Point, &'a Point, &'a Point, &'a Point),
}

impl<'a> Segment<'a> {
    pub fn kind(&self) -> SegmentKind {
        match self {
            Segment::Line(..) => SegmentKind::Line,
            Segment::Quad(..) => SegmentKind::Quad,
            Segment::Cubic(..) => SegmentKind::Cubic,
        }
    }

    /// All points in order, anchors and handles
    pub fn points(&self) -> Vec<&'a Point> {
        match *self {
            Segment::Line(a, b) => vec![a, b],
            Segment::Quad(a, h, b) => vec![a, h, b],
            Segment::Cubic(a, h1, h2, b) => vec![a, h1, h2, b],
        }
    }

    pub fn first(&self) -> &'a Point {
        match *self {
            Segment::Line(a, _) | Segment::Quad(a, _, _) | Segment::Cubic(a, _, _, _) => a,
        }
    }

    pub fn last(&self) -> &'a Point {
        match *self {
            Segment::Line(_, b) | Segment::Quad(_, _, b) | Segment::Cubic(_, _, _, b) => b,
        }
    }

    /// Handles between the two anchors
    pub fn handles(&self) -> Vec<&'a Point> {
        match *self {
            Segment::Line(..) => Vec::new(),
            Segment::Quad(_, h, _) => vec![h],
            Segment::Cubic(_, h1, h2, _) => vec![h1, h2],
        }
    }

    pub fn id(&self) -> SegmentId {
        SegmentId {
            first: self.first().id,
            last: self.last().id,
        }
    }

    /// Drop point identities and keep the geometry
    pub fn to_curve(&self) -> Curve {
        match *self {
            Segment::Line(a, b) => Curve::Line(kurbo::Line::new(a.position(), b.position())),
            Segment::Quad(a, h, b) => Curve::Quad(kurbo::QuadBez::new(
                a.position(),
                h.position(),
                b.position(),
            )),
            Segment::Cubic(a, h1, h2, b) => Curve::Cubic(kurbo::CubicBez::new(
                a.position(),
                h1.position(),
                h2.position(),
                b.position(),
            )),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.to_curve().bounds()
    }

    pub fn point_at(&self, t: f64) -> kurbo::Point {
        self.to_curve().point_at(t)
    }

    pub fn tangent_at(&self, t: f64) -> Vec2 {
        self.to_curve().tangent_at(t)
    }

    pub fn closest_point(&self, pos: kurbo::Point) -> ClosestPoint {
        self.to_curve().closest_point(pos)
    }

    /// Subdivide at `t`. The halves carry no identities until they are
    /// written back into a contour.
    pub fn split_at(&self, t: f64) -> (Curve, Curve) {
        self.to_curve().split_at(t)
    }
}

/// Fresh points for a curve: endpoints on-curve, interior points off-curve
pub fn points_from_curve(curve: &Curve) -> Vec<Point> {
    let control = curve.control_points();
    let last = control.len().saturating_sub(1);
    control
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            if i == 0 || i == last {
                Point::on_curve(p.x, p.y)
            } else {
                Point::off_curve(p.x, p.y)
            }
        })
        .collect()
}

/// Classify a contour's points into segments
///
/// Closed contours wrap, so the final segment may run from the last anchor
/// through trailing handles back to the first point. Handles that never
/// reach another anchor in an open contour are left out.
pub fn parse(points: &[Point], closed: bool) -> Vec<Segment<'_>> {
    let len = points.len();
    if len < 2 {
        return Vec::new();
    }

    let at = |i: usize| -> Option<&Point> {
        if closed {
            Some(&points[i % len])
        } else {
            points.get(i)
        }
    };

    let limit = if closed { len } else { len - 1 };
    let mut segments = Vec::new();
    let mut i = 0;

    while i < limit {
        let p0 = &points[i];
        if !p0.is_on_curve() {
            i += 1;
            continue;
        }

        let Some(p1) = at(i + 1) else { break };
        if p1.is_on_curve() {
            segments.push(Segment::Line(p0, p1));
            i += 1;
            continue;
        }

        let Some(p2) = at(i + 2) else { break };
        if p2.is_on_curve() {
            segments.push(Segment::Quad(p0, p1, p2));
            i += 2;
            continue;
        }

        let Some(p3) = at(i + 3) else { break };
        if p3.is_on_curve() {
            segments.push(Segment::Cubic(p0, p1, p2, p3));
            i += 3;
        } else {
            i += 1;
        }
    }

    segments
}
