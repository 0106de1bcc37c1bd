//! UFO file I/O operations

use crate::core::state::Glyph;
use crate::editing::MemoryFontEngine;
use anyhow::{Context, Result};
use norad::Font;
use std::path::Path;
use tracing::info;

/// Load a UFO font file from disk
pub fn load_ufo_from_path(path: impl AsRef<Path>) -> Result<Font> {
    let path = path.as_ref();
    let font = Font::load(path).with_context(|| format!("Failed to load UFO {}", path.display()))?;
    Ok(font)
}

/// Every glyph of the default layer, ready for editing
pub fn engine_from_font(font: &Font) -> MemoryFontEngine {
    let mut engine = MemoryFontEngine::new();
    for glyph in font.default_layer().iter() {
        engine.insert_glyph(Glyph::from_norad_glyph(glyph));
    }
    engine
}

pub fn load_engine_from_ufo(path: impl AsRef<Path>) -> Result<MemoryFontEngine> {
    let font = load_ufo_from_path(&path)?;
    let engine = engine_from_font(&font);
    info!(
        "Loaded {} glyphs from {}",
        font.default_layer().len(),
        path.as_ref().display()
    );
    Ok(engine)
}

/// Write one edited glyph back into the default layer of a UFO on disk
///
/// Parts of the existing glyph the editor doesn't model survive the write.
pub fn write_glyph_to_ufo(path: impl AsRef<Path>, glyph: &Glyph) -> Result<()> {
    let path = path.as_ref();
    let mut font = load_ufo_from_path(path)?;
    let layer = font.default_layer_mut();
    match layer.get_glyph_mut(&glyph.name) {
        Some(existing) => glyph.apply_to_norad_glyph(existing),
        None => layer.insert_glyph(glyph.to_norad_glyph()?),
    }
    font.save(path)
        .with_context(|| format!("Failed to save UFO {}", path.display()))?;
    info!("Wrote glyph '{}' to {}", glyph.name, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{Contour, Point};
    use crate::editing::FontEngine;

    fn write_test_font(dir: &Path) -> std::path::PathBuf {
        let mut glyph = Glyph::new("a", Some(0x61), 500.0);
        glyph.contours.push(Contour::with_points(
            vec![
                Point::on_curve(0.0, 0.0),
                Point::off_curve(50.0, 0.0),
                Point::off_curve(100.0, 50.0),
                Point::on_curve(100.0, 100.0),
            ],
            false,
        ));
        let mut font = Font::new();
        font.default_layer_mut()
            .insert_glyph(glyph.to_norad_glyph().unwrap());
        let path = dir.join("Test.ufo");
        font.save(&path).unwrap();
        path
    }

    #[test]
    fn load_edit_and_write_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_font(dir.path());

        let mut engine = load_engine_from_ufo(&path).unwrap();
        assert_eq!(engine.glyph_names().collect::<Vec<_>>(), vec!["a"]);
        engine.start_edit_session(0x61).unwrap();
        let first = engine.glyph().unwrap().contours[0].points[0].id;
        engine.move_points(&[first], 10.0, 0.0).unwrap();
        let edited = engine.snapshot().unwrap();

        write_glyph_to_ufo(&path, &edited).unwrap();

        let reloaded = load_engine_from_ufo(&path).unwrap();
        let glyph = reloaded.get_glyph("a").unwrap();
        assert!(glyph.same_shape(&edited));
        assert!(!glyph.contours[0].closed);
        assert_eq!(glyph.contours[0].points[0].x, 10.0);
    }

    #[test]
    fn new_glyphs_are_added() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_font(dir.path());

        let glyph = Glyph::new("b", Some(0x62), 300.0);
        write_glyph_to_ufo(&path, &glyph).unwrap();

        let reloaded = load_engine_from_ufo(&path).unwrap();
        assert_eq!(reloaded.get_glyph("b").unwrap().advance_width, 300.0);
        assert!(reloaded.get_glyph("a").is_some());
    }

    #[test]
    fn missing_ufo_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_ufo_from_path(dir.path().join("Missing.ufo")).is_err());
    }
}
