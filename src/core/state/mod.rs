//! Glyph data model shared by the engine, the commands and the tools

pub mod entity;
pub mod glyph;

pub use entity::{AnchorId, ContourId, PointId};
pub use glyph::{Anchor, Contour, Glyph, GlyphSnapshot, Point, PointType};
