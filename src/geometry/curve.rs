//! Parametric curve math
//!
//! [`Curve`] is the id-free counterpart of a [`Segment`](super::segment::Segment):
//! plain kurbo geometry used for bounds, evaluation, projection and
//! subdivision. The heavy lifting is done by kurbo's `ParamCurve*` traits.

use kurbo::{
    CubicBez, Line, ParamCurve, ParamCurveDeriv, ParamCurveExtrema, ParamCurveNearest, Point,
    QuadBez, Rect, Vec2,
};

/// Accuracy passed to kurbo's nearest-point solver, in design units
const NEAREST_ACCURACY: f64 = 1e-6;

/// Result of projecting a position onto a curve
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClosestPoint {
    /// Curve parameter in `[0, 1]`
    pub t: f64,
    pub point: Point,
    pub distance: f64,
}

/// A line, quadratic or cubic bezier without point identities
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Curve {
    Line(Line),
    Quad(QuadBez),
    Cubic(CubicBez),
}

impl Curve {
    /// Build a curve from two, three or four control points
    pub fn from_points(points: &[Point]) -> Option<Self> {
        match *points {
            [p0, p1] => Some(Curve::Line(Line::new(p0, p1))),
            [p0, p1, p2] => Some(Curve::Quad(QuadBez::new(p0, p1, p2))),
            [p0, p1, p2, p3] => Some(Curve::Cubic(CubicBez::new(p0, p1, p2, p3))),
            _ => None,
        }
    }

    /// Control points in order, endpoints included
    pub fn control_points(&self) -> Vec<Point> {
        match self {
            Curve::Line(l) => vec![l.p0, l.p1],
            Curve::Quad(q) => vec![q.p0, q.p1, q.p2],
            Curve::Cubic(c) => vec![c.p0, c.p1, c.p2, c.p3],
        }
    }

    pub fn start(&self) -> Point {
        match self {
            Curve::Line(l) => l.p0,
            Curve::Quad(q) => q.p0,
            Curve::Cubic(c) => c.p0,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Curve::Line(l) => l.p1,
            Curve::Quad(q) => q.p2,
            Curve::Cubic(c) => c.p3,
        }
    }

    /// Tight bounds: endpoints plus any parametric extrema
    pub fn bounds(&self) -> Rect {
        match self {
            Curve::Line(l) => Rect::from_points(l.p0, l.p1),
            Curve::Quad(q) => q.bounding_box(),
            Curve::Cubic(c) => c.bounding_box(),
        }
    }

    pub fn point_at(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        match self {
            Curve::Line(l) => l.eval(t),
            Curve::Quad(q) => q.eval(t),
            Curve::Cubic(c) => c.eval(t),
        }
    }

    /// First derivative at `t`. Degenerate handles fall back to the chord.
    pub fn tangent_at(&self, t: f64) -> Vec2 {
        let t = t.clamp(0.0, 1.0);
        let deriv = match self {
            Curve::Line(l) => l.p1 - l.p0,
            Curve::Quad(q) => q.deriv().eval(t).to_vec2(),
            Curve::Cubic(c) => c.deriv().eval(t).to_vec2(),
        };
        if deriv.hypot2() < 1e-18 {
            self.end() - self.start()
        } else {
            deriv
        }
    }

    /// Project `pos` onto the curve, clamped to the curve's parameter range
    pub fn closest_point(&self, pos: Point) -> ClosestPoint {
        match self {
            Curve::Line(l) => closest_point_on_line(*l, pos),
            Curve::Quad(q) => {
                let nearest = q.nearest(pos, NEAREST_ACCURACY);
                self.closest_from_t(nearest.t, pos)
            }
            Curve::Cubic(c) => {
                let nearest = c.nearest(pos, NEAREST_ACCURACY);
                self.closest_from_t(nearest.t, pos)
            }
        }
    }

    fn closest_from_t(&self, t: f64, pos: Point) -> ClosestPoint {
        let t = t.clamp(0.0, 1.0);
        let point = self.point_at(t);
        ClosestPoint {
            t,
            point,
            distance: point.distance(pos),
        }
    }

    /// Split into two curves that together trace exactly the same shape
    pub fn split_at(&self, t: f64) -> (Curve, Curve) {
        let t = t.clamp(0.0, 1.0);
        match self {
            Curve::Line(l) => {
                let mid = l.eval(t);
                (
                    Curve::Line(Line::new(l.p0, mid)),
                    Curve::Line(Line::new(mid, l.p1)),
                )
            }
            Curve::Quad(q) => (
                Curve::Quad(q.subsegment(0.0..t)),
                Curve::Quad(q.subsegment(t..1.0)),
            ),
            Curve::Cubic(c) => (
                Curve::Cubic(c.subsegment(0.0..t)),
                Curve::Cubic(c.subsegment(t..1.0)),
            ),
        }
    }
}

/// Analytic projection onto a line segment
fn closest_point_on_line(line: Line, pos: Point) -> ClosestPoint {
    let v = line.p1 - line.p0;
    let len2 = v.hypot2();
    let t = if len2 == 0.0 {
        0.0
    } else {
        ((pos - line.p0).dot(v) / len2).clamp(0.0, 1.0)
    };
    let point = line.p0 + v * t;
    ClosestPoint {
        t,
        point,
        distance: point.distance(pos),
    }
}
