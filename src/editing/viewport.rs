//! Screen ↔ design space mapping
//!
//! Tool events arrive in design units; the viewport is only needed to turn
//! pixel tolerances into design units and to track panning.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

const MIN_ZOOM: f64 = 0.01;
const MAX_ZOOM: f64 = 256.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Screen pixels per design unit
    pub zoom: f64,
    /// Screen-space offset of the design origin
    pub pan: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl Viewport {
    /// Convert a pixel distance into design units
    pub fn px_to_design(&self, px: f64) -> f64 {
        px / self.zoom
    }

    /// Screen is y-down, design space is y-up
    pub fn screen_to_design(&self, screen: Point) -> Point {
        let p = screen - self.pan;
        Point::new(p.x / self.zoom, -p.y / self.zoom)
    }

    pub fn design_to_screen(&self, design: Point) -> Point {
        Point::new(design.x * self.zoom, -design.y * self.zoom) + self.pan
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }
}
