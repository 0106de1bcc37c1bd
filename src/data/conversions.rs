//! UFO format conversion utilities
//!
//! Conversion between the editing model and norad glyphs. UFO stores the
//! segment type on the on-curve point that ends a segment; the editing model
//! only knows on- and off-curve points and works the segment type out from
//! the run of handles before each anchor.

use crate::core::state::{Anchor, Contour, Glyph, Point, PointType};
use anyhow::{Context, Result};
use tracing::debug;

impl Glyph {
    /// Convert from a norad glyph. Ids are fresh.
    pub fn from_norad_glyph(norad_glyph: &norad::Glyph) -> Self {
        let unicode = norad_glyph.codepoints.iter().next().map(u32::from);
        let mut glyph = Glyph::new(norad_glyph.name().to_string(), unicode, norad_glyph.width);

        glyph.contours = norad_glyph
            .contours
            .iter()
            .map(Contour::from_norad_contour)
            .collect();

        glyph.anchors = norad_glyph
            .anchors
            .iter()
            .map(|anchor| {
                let name = anchor.name.as_ref().map(|n| n.to_string()).unwrap_or_default();
                Anchor::new(name, anchor.x, anchor.y)
            })
            .collect();

        glyph
    }

    /// Convert to a fresh norad glyph
    pub fn to_norad_glyph(&self) -> Result<norad::Glyph> {
        let _: norad::Name = self
            .name
            .parse()
            .with_context(|| format!("'{}' is not a valid glyph name", self.name))?;
        let mut glyph = norad::Glyph::new(&self.name);
        if let Some(ch) = self.unicode.and_then(char::from_u32) {
            glyph.codepoints.insert(ch);
        }
        self.apply_to_norad_glyph(&mut glyph);
        Ok(glyph)
    }

    /// Write the outline and metrics into an existing norad glyph, keeping
    /// everything the editing model doesn't track (components, guidelines,
    /// lib data). Anchors are matched by name; unmatched ones are left alone.
    pub fn apply_to_norad_glyph(&self, target: &mut norad::Glyph) {
        target.width = self.advance_width;
        target.contours = self.contours.iter().map(Contour::to_norad_contour).collect();

        for anchor in &mut target.anchors {
            let Some(name) = anchor.name.as_ref().map(|n| n.to_string()) else {
                continue;
            };
            if let Some(edited) = self.anchors.iter().find(|a| a.name == name) {
                anchor.x = edited.x;
                anchor.y = edited.y;
            }
        }
    }
}

impl Contour {
    pub fn from_norad_contour(norad_contour: &norad::Contour) -> Self {
        let closed = norad_contour
            .points
            .first()
            .is_none_or(|p| p.typ != norad::PointType::Move);

        let mut points = Vec::with_capacity(norad_contour.points.len());
        let mut pending: Vec<&norad::ContourPoint> = Vec::new();
        for point in &norad_contour.points {
            if point.typ == norad::PointType::OffCurve {
                pending.push(point);
                continue;
            }
            push_handles(&mut points, &pending, point.typ == norad::PointType::QCurve);
            pending.clear();
            points.push(Point::new(point.x, point.y, PointType::OnCurve, point.smooth));
        }

        // Handles before the wrap-around segment of a closed contour
        if !pending.is_empty() {
            let wraps_quadratic = norad_contour
                .points
                .iter()
                .find(|p| p.typ != norad::PointType::OffCurve)
                .is_some_and(|p| p.typ == norad::PointType::QCurve);
            push_handles(&mut points, &pending, closed && wraps_quadratic);
        }

        Contour::with_points(points, closed)
    }

    pub fn to_norad_contour(&self) -> norad::Contour {
        let mut source: &[Point] = &self.points;
        if !self.closed {
            // An open contour can't end on handles
            let end = source
                .iter()
                .rposition(|p| p.is_on_curve())
                .map_or(0, |i| i + 1);
            if end < source.len() {
                debug!("Dropping {} trailing handles on export", source.len() - end);
            }
            source = &source[..end];
        }

        let points = source
            .iter()
            .enumerate()
            .map(|(index, point)| {
                let typ = if !point.is_on_curve() {
                    norad::PointType::OffCurve
                } else if !self.closed && index == 0 {
                    norad::PointType::Move
                } else {
                    match handles_before(source, index, self.closed) {
                        0 => norad::PointType::Line,
                        1 => norad::PointType::QCurve,
                        _ => norad::PointType::Curve,
                    }
                };
                norad::ContourPoint::new(point.x, point.y, typ, point.smooth, None, None)
            })
            .collect();

        norad::Contour::new(points, None)
    }
}

/// Push a run of UFO handles. Quadratic runs of more than one handle get
/// their implied on-curve midpoints made explicit.
fn push_handles(points: &mut Vec<Point>, handles: &[&norad::ContourPoint], quadratic: bool) {
    for (i, handle) in handles.iter().enumerate() {
        if quadratic && i > 0 {
            let prev = handles[i - 1];
            points.push(Point::new(
                (prev.x + handle.x) / 2.0,
                (prev.y + handle.y) / 2.0,
                PointType::OnCurve,
                true,
            ));
        }
        points.push(Point::new(handle.x, handle.y, PointType::OffCurve, false));
    }
}

/// Number of handles directly before `index`, wrapping on closed contours
fn handles_before(points: &[Point], index: usize, closed: bool) -> usize {
    let n = points.len();
    let mut count = 0;
    for step in 1..n {
        if !closed && step > index {
            break;
        }
        let i = (index + n - step) % n;
        if points[i].is_on_curve() {
            break;
        }
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ufo_point(x: f64, y: f64, typ: norad::PointType) -> norad::ContourPoint {
        norad::ContourPoint::new(x, y, typ, false, None, None)
    }

    #[test]
    fn open_contour_starts_with_move() {
        let contour = Contour::with_points(
            vec![
                Point::on_curve(0.0, 0.0),
                Point::off_curve(0.0, 50.0),
                Point::off_curve(50.0, 100.0),
                Point::on_curve(100.0, 100.0),
                Point::off_curve(150.0, 100.0),
            ],
            false,
        );
        let ufo = contour.to_norad_contour();
        let types: Vec<_> = ufo.points.iter().map(|p| p.typ.clone()).collect();
        assert_eq!(
            types,
            vec![
                norad::PointType::Move,
                norad::PointType::OffCurve,
                norad::PointType::OffCurve,
                norad::PointType::Curve,
            ]
        );
    }

    #[test]
    fn closed_contour_types_wrap() {
        let contour = Contour::with_points(
            vec![
                Point::on_curve(0.0, 0.0),
                Point::on_curve(100.0, 0.0),
                Point::off_curve(100.0, 50.0),
                Point::on_curve(50.0, 100.0),
                Point::off_curve(0.0, 100.0),
                Point::off_curve(0.0, 50.0),
            ],
            true,
        );
        let ufo = contour.to_norad_contour();
        let types: Vec<_> = ufo.points.iter().map(|p| p.typ.clone()).collect();
        assert_eq!(types[0], norad::PointType::Curve);
        assert_eq!(types[1], norad::PointType::Line);
        assert_eq!(types[3], norad::PointType::QCurve);

        let back = Contour::from_norad_contour(&ufo);
        assert!(back.closed);
        assert!(back.same_shape(&contour));
    }

    #[test]
    fn implied_quadratic_points_become_explicit() {
        let ufo = norad::Contour::new(
            vec![
                ufo_point(0.0, 0.0, norad::PointType::QCurve),
                ufo_point(100.0, 0.0, norad::PointType::OffCurve),
                ufo_point(100.0, 100.0, norad::PointType::OffCurve),
                ufo_point(0.0, 100.0, norad::PointType::QCurve),
            ],
            None,
        );
        let contour = Contour::from_norad_contour(&ufo);
        assert_eq!(contour.len(), 5);
        assert!(contour.points[2].is_on_curve());
        assert_eq!(contour.points[2].position(), kurbo::Point::new(100.0, 50.0));
        assert!(contour.points[2].smooth);
    }

    #[test]
    fn glyph_round_trip_keeps_metrics() {
        let mut glyph = Glyph::new("a", Some(0x61), 520.0);
        glyph.contours.push(Contour::with_points(
            vec![
                Point::on_curve(0.0, 0.0),
                Point::on_curve(100.0, 0.0),
                Point::on_curve(100.0, 100.0),
            ],
            true,
        ));
        let ufo = glyph.to_norad_glyph().unwrap();
        assert_eq!(ufo.width, 520.0);

        let back = Glyph::from_norad_glyph(&ufo);
        assert_eq!(back.name, "a");
        assert_eq!(back.unicode, Some(0x61));
        assert!(back.same_shape(&glyph));
    }
}
