//! Clipboard payloads
//!
//! Copy produces a versioned native JSON payload. Paste accepts that
//! payload first and otherwise asks each registered [`ImportAdapter`] in
//! turn. Text nobody recognizes pastes nothing.

use crate::core::state::{Glyph, PointId, PointType};
use kurbo::{BezPath, PathEl};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

pub const CLIPBOARD_VERSION: u32 = 1;
pub const NATIVE_FORMAT: &str = "native";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardPoint {
    pub x: f64,
    pub y: f64,
    pub point_type: PointType,
    #[serde(default)]
    pub smooth: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardContour {
    #[serde(default)]
    pub closed: bool,
    pub points: Vec<ClipboardPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardPayload {
    pub version: u32,
    pub format: String,
    pub contours: Vec<ClipboardContour>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_glyph_name: Option<String>,
}

impl ClipboardPayload {
    pub fn new(format: &str, contours: Vec<ClipboardContour>, source: Option<String>) -> Self {
        Self {
            version: CLIPBOARD_VERSION,
            format: format.to_string(),
            contours,
            source_glyph_name: source,
        }
    }

    /// Build a payload from the selected points of `glyph`
    ///
    /// Fully selected contours keep their closed flag; partly selected ones
    /// become open runs of the selected points.
    pub fn from_selection(glyph: &Glyph, selected: &HashSet<PointId>) -> Option<Self> {
        let contours: Vec<ClipboardContour> = glyph
            .contours
            .iter()
            .filter_map(|contour| {
                let points: Vec<ClipboardPoint> = contour
                    .points
                    .iter()
                    .filter(|p| selected.contains(&p.id))
                    .map(|p| ClipboardPoint {
                        x: p.x,
                        y: p.y,
                        point_type: p.point_type,
                        smooth: p.smooth,
                    })
                    .collect();
                if points.is_empty() {
                    return None;
                }
                let closed = contour.closed && points.len() == contour.points.len();
                Some(ClipboardContour { closed, points })
            })
            .collect();

        if contours.is_empty() {
            return None;
        }
        Some(Self::new(NATIVE_FORMAT, contours, Some(glyph.name.clone())))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a native payload; anything else is `None`
    pub fn parse_native(text: &str) -> Option<Self> {
        let payload: Self = serde_json::from_str(text).ok()?;
        (payload.format == NATIVE_FORMAT && payload.version == CLIPBOARD_VERSION).then_some(payload)
    }
}

/// Turns foreign clipboard text into contours
pub trait ImportAdapter {
    /// Tag recorded as the payload format
    fn format(&self) -> &'static str;

    fn import(&self, text: &str) -> Option<Vec<ClipboardContour>>;
}

/// SVG path data, bare (`M0 0 L10 0 Z`) or inside a `d="..."` attribute.
/// SVG is y-down, so y is negated on the way in.
#[derive(Debug, Default, Clone, Copy)]
pub struct SvgPathImporter;

impl SvgPathImporter {
    fn path_data(text: &str) -> Option<&str> {
        let text = text.trim();
        if let Some(start) = text.find("d=\"") {
            let rest = &text[start + 3..];
            return rest.find('"').map(|end| &rest[..end]);
        }
        text.starts_with(['M', 'm']).then_some(text)
    }
}

impl ImportAdapter for SvgPathImporter {
    fn format(&self) -> &'static str {
        "svg"
    }

    fn import(&self, text: &str) -> Option<Vec<ClipboardContour>> {
        let data = Self::path_data(text)?;
        let path = BezPath::from_svg(data).ok()?;
        let contours = contours_from_bez_path(&path);
        (!contours.is_empty()).then_some(contours)
    }
}

fn on(p: kurbo::Point) -> ClipboardPoint {
    ClipboardPoint {
        x: p.x,
        y: -p.y,
        point_type: PointType::OnCurve,
        smooth: false,
    }
}

fn off(p: kurbo::Point) -> ClipboardPoint {
    ClipboardPoint {
        x: p.x,
        y: -p.y,
        point_type: PointType::OffCurve,
        smooth: false,
    }
}

fn finish(current: &mut Option<ClipboardContour>, contours: &mut Vec<ClipboardContour>) {
    if let Some(contour) = current.take() {
        if !contour.points.is_empty() {
            contours.push(contour);
        }
    }
}

fn contours_from_bez_path(path: &BezPath) -> Vec<ClipboardContour> {
    let mut contours = Vec::new();
    let mut current: Option<ClipboardContour> = None;

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                finish(&mut current, &mut contours);
                current = Some(ClipboardContour {
                    closed: false,
                    points: vec![on(p)],
                });
            }
            PathEl::LineTo(p) => {
                if let Some(contour) = current.as_mut() {
                    contour.points.push(on(p));
                }
            }
            PathEl::QuadTo(h, p) => {
                if let Some(contour) = current.as_mut() {
                    contour.points.extend([off(h), on(p)]);
                }
            }
            PathEl::CurveTo(h1, h2, p) => {
                if let Some(contour) = current.as_mut() {
                    contour.points.extend([off(h1), off(h2), on(p)]);
                }
            }
            PathEl::ClosePath => {
                if let Some(mut contour) = current.take() {
                    contour.closed = true;
                    // A closing segment that returns to the start point duplicates it
                    if contour.points.len() > 1 {
                        let first = &contour.points[0];
                        let last = &contour.points[contour.points.len() - 1];
                        if last.point_type.is_on_curve() && last.x == first.x && last.y == first.y
                        {
                            contour.points.pop();
                        }
                    }
                    contours.push(contour);
                }
            }
        }
    }
    finish(&mut current, &mut contours);
    contours
}

/// Native payload first, then each adapter in order
pub fn parse_clipboard(text: &str, adapters: &[&dyn ImportAdapter]) -> Option<ClipboardPayload> {
    if let Some(payload) = ClipboardPayload::parse_native(text) {
        return Some(payload);
    }
    for adapter in adapters {
        if let Some(contours) = adapter.import(text) {
            debug!("Clipboard text imported as {}", adapter.format());
            return Some(ClipboardPayload::new(adapter.format(), contours, None));
        }
    }
    debug!("Clipboard text not recognized");
    None
}

/// The adapters an editor tries by default
pub fn default_adapters() -> Vec<&'static dyn ImportAdapter> {
    vec![&SvgPathImporter]
}
