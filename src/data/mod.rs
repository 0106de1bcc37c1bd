//! Font data I/O: UFO sources through norad

pub mod conversions;
pub mod ufo;

pub use ufo::{engine_from_font, load_engine_from_ufo, load_ufo_from_path, write_glyph_to_ufo};
