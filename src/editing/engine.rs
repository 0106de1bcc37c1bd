//! Font engine collaborator
//!
//! The [`FontEngine`] trait is the narrow, synchronous surface the editing
//! core mutates glyph data through. Commands are its only callers.
//! [`MemoryFontEngine`] is the in-process implementation used by the CLI,
//! by tests and by embedding hosts that keep glyphs in memory.

use super::error::{EditError, EditResult};
use crate::core::state::{
    AnchorId, Contour, ContourId, Glyph, GlyphSnapshot, Point, PointId, PointType,
};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// Mutation primitives over the glyph in the current edit session
///
/// Every mutating call either applies completely or returns an error and
/// leaves the glyph untouched. Point ids are validated before anything is
/// written.
pub trait FontEngine {
    /// Open a session on the glyph mapped to `unicode`
    fn start_edit_session(&mut self, unicode: u32) -> EditResult<GlyphSnapshot>;

    /// Open a session on a glyph by name
    fn start_edit_session_by_name(&mut self, name: &str) -> EditResult<GlyphSnapshot>;

    fn end_edit_session(&mut self) -> EditResult<()>;

    fn has_session(&self) -> bool;

    /// Borrow the glyph being edited
    fn glyph(&self) -> EditResult<&Glyph>;

    /// Clone the glyph being edited
    fn snapshot(&self) -> EditResult<GlyphSnapshot> {
        self.glyph().cloned()
    }

    /// Append an empty contour and make it the active one
    fn add_contour(&mut self) -> EditResult<ContourId>;

    /// Put a contour back at `index`, keeping its ids
    fn insert_contour(&mut self, index: usize, contour: Contour) -> EditResult<ContourId>;

    /// Remove a contour, returning its former index and contents
    fn remove_contour(&mut self, id: ContourId) -> EditResult<(usize, Contour)>;

    /// Append a point to the active contour
    fn add_point(
        &mut self,
        x: f64,
        y: f64,
        point_type: PointType,
        smooth: bool,
    ) -> EditResult<PointId>;

    fn add_point_to_contour(
        &mut self,
        contour_id: ContourId,
        x: f64,
        y: f64,
        point_type: PointType,
        smooth: bool,
    ) -> EditResult<PointId>;

    fn insert_point_before(
        &mut self,
        before: PointId,
        x: f64,
        y: f64,
        point_type: PointType,
        smooth: bool,
    ) -> EditResult<PointId>;

    fn move_points(&mut self, ids: &[PointId], dx: f64, dy: f64) -> EditResult<()>;

    fn move_point_to(&mut self, id: PointId, x: f64, y: f64) -> EditResult<()>;

    /// Write absolute positions for many points at once
    fn set_point_positions(&mut self, positions: &[(PointId, kurbo::Point)]) -> EditResult<()>;

    fn remove_points(&mut self, ids: &[PointId]) -> EditResult<()>;

    /// Flip the smooth flag of an anchor, returning the new value.
    /// Handles are left alone and report `false`.
    fn toggle_smooth(&mut self, id: PointId) -> EditResult<bool>;

    /// Close the active contour and clear the active reference
    fn close_contour(&mut self) -> EditResult<ContourId>;

    fn set_contour_closed(&mut self, id: ContourId, closed: bool) -> EditResult<()>;

    fn open_contour(&mut self, id: ContourId) -> EditResult<()> {
        self.set_contour_closed(id, false)
    }

    fn reverse_contour(&mut self, id: ContourId) -> EditResult<()>;

    fn set_active_contour(&mut self, id: Option<ContourId>) -> EditResult<()>;

    fn clear_active_contour(&mut self) -> EditResult<()> {
        self.set_active_contour(None)
    }

    fn move_anchors(&mut self, ids: &[AnchorId], dx: f64, dy: f64) -> EditResult<()>;

    fn set_advance_width(&mut self, width: f64) -> EditResult<()>;

    /// Replace the session glyph wholesale with `snapshot`
    fn restore_snapshot(&mut self, snapshot: &GlyphSnapshot) -> EditResult<()>;
}

/// Glyph store held entirely in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryFontEngine {
    glyphs: BTreeMap<String, Glyph>,
    session: Option<String>,
}

impl MemoryFontEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a glyph
    pub fn insert_glyph(&mut self, glyph: Glyph) {
        self.glyphs.insert(glyph.name.clone(), glyph);
    }

    pub fn get_glyph(&self, name: &str) -> Option<&Glyph> {
        self.glyphs.get(name)
    }

    pub fn glyph_names(&self) -> impl Iterator<Item = &str> {
        self.glyphs.keys().map(String::as_str)
    }

    pub fn glyph_for_unicode(&self, unicode: u32) -> Option<&Glyph> {
        self.glyphs.values().find(|g| g.unicode == Some(unicode))
    }

    pub fn session_glyph_name(&self) -> Option<&str> {
        self.session.as_deref()
    }

    fn glyph_mut(&mut self) -> EditResult<&mut Glyph> {
        let name = self.session.as_ref().ok_or(EditError::NoSession)?;
        self.glyphs.get_mut(name).ok_or(EditError::NoSession)
    }

    fn open_session(&mut self, name: String) -> EditResult<GlyphSnapshot> {
        if let Some(active) = &self.session {
            return Err(EditError::SessionActive(active.clone()));
        }
        let snapshot = self
            .glyphs
            .get(&name)
            .cloned()
            .ok_or_else(|| EditError::UnknownGlyph(name.clone()))?;
        info!("Started edit session for glyph '{}'", name);
        self.session = Some(name);
        Ok(snapshot)
    }
}

/// Error for the first id in `ids` the glyph does not know about
fn check_points(glyph: &Glyph, ids: &[PointId]) -> EditResult<()> {
    match ids.iter().find(|id| !glyph.contains_point(**id)) {
        Some(stale) => Err(EditError::StalePoint(*stale)),
        None => Ok(()),
    }
}

fn point_mut(glyph: &mut Glyph, id: PointId) -> Option<&mut Point> {
    glyph.contours.iter_mut().find_map(|c| c.point_mut(id))
}

fn contour_mut(glyph: &mut Glyph, id: ContourId) -> EditResult<&mut Contour> {
    glyph.contour_mut(id).ok_or(EditError::StaleContour(id))
}

impl FontEngine for MemoryFontEngine {
    fn start_edit_session(&mut self, unicode: u32) -> EditResult<GlyphSnapshot> {
        let name = self
            .glyph_for_unicode(unicode)
            .map(|g| g.name.clone())
            .ok_or_else(|| EditError::UnknownGlyph(format!("U+{unicode:04X}")))?;
        self.open_session(name)
    }

    fn start_edit_session_by_name(&mut self, name: &str) -> EditResult<GlyphSnapshot> {
        self.open_session(name.to_string())
    }

    fn end_edit_session(&mut self) -> EditResult<()> {
        let name = self.session.take().ok_or(EditError::NoSession)?;
        info!("Ended edit session for glyph '{}'", name);
        Ok(())
    }

    fn has_session(&self) -> bool {
        self.session.is_some()
    }

    fn glyph(&self) -> EditResult<&Glyph> {
        let name = self.session.as_ref().ok_or(EditError::NoSession)?;
        self.glyphs.get(name).ok_or(EditError::NoSession)
    }

    fn add_contour(&mut self) -> EditResult<ContourId> {
        let glyph = self.glyph_mut()?;
        let contour = Contour::new();
        let id = contour.id;
        glyph.contours.push(contour);
        glyph.active_contour_id = Some(id);
        Ok(id)
    }

    fn insert_contour(&mut self, index: usize, contour: Contour) -> EditResult<ContourId> {
        let glyph = self.glyph_mut()?;
        let id = contour.id;
        let index = index.min(glyph.contours.len());
        glyph.contours.insert(index, contour);
        Ok(id)
    }

    fn remove_contour(&mut self, id: ContourId) -> EditResult<(usize, Contour)> {
        let glyph = self.glyph_mut()?;
        let index = glyph
            .contours
            .iter()
            .position(|c| c.id == id)
            .ok_or(EditError::StaleContour(id))?;
        if glyph.active_contour_id == Some(id) {
            glyph.active_contour_id = None;
        }
        Ok((index, glyph.contours.remove(index)))
    }

    fn add_point(
        &mut self,
        x: f64,
        y: f64,
        point_type: PointType,
        smooth: bool,
    ) -> EditResult<PointId> {
        let contour_id = self
            .glyph()?
            .active_contour_id
            .ok_or(EditError::NoActiveContour)?;
        self.add_point_to_contour(contour_id, x, y, point_type, smooth)
    }

    fn add_point_to_contour(
        &mut self,
        contour_id: ContourId,
        x: f64,
        y: f64,
        point_type: PointType,
        smooth: bool,
    ) -> EditResult<PointId> {
        let contour = contour_mut(self.glyph_mut()?, contour_id)?;
        let point = Point::new(x, y, point_type, smooth);
        let id = point.id;
        contour.points.push(point);
        Ok(id)
    }

    fn insert_point_before(
        &mut self,
        before: PointId,
        x: f64,
        y: f64,
        point_type: PointType,
        smooth: bool,
    ) -> EditResult<PointId> {
        let glyph = self.glyph_mut()?;
        let (contour, index) = glyph
            .contours
            .iter_mut()
            .find_map(|c| c.index_of(before).map(|i| (c, i)))
            .ok_or(EditError::StalePoint(before))?;
        let point = Point::new(x, y, point_type, smooth);
        let id = point.id;
        contour.points.insert(index, point);
        Ok(id)
    }

    fn move_points(&mut self, ids: &[PointId], dx: f64, dy: f64) -> EditResult<()> {
        let glyph = self.glyph_mut()?;
        check_points(glyph, ids)?;
        let unique: HashSet<PointId> = ids.iter().copied().collect();
        for contour in &mut glyph.contours {
            for point in &mut contour.points {
                if unique.contains(&point.id) {
                    point.translate(dx, dy);
                }
            }
        }
        Ok(())
    }

    fn move_point_to(&mut self, id: PointId, x: f64, y: f64) -> EditResult<()> {
        let glyph = self.glyph_mut()?;
        let point = point_mut(glyph, id).ok_or(EditError::StalePoint(id))?;
        point.set_position(x, y);
        Ok(())
    }

    fn set_point_positions(&mut self, positions: &[(PointId, kurbo::Point)]) -> EditResult<()> {
        let glyph = self.glyph_mut()?;
        let ids: Vec<PointId> = positions.iter().map(|(id, _)| *id).collect();
        check_points(glyph, &ids)?;
        for (id, pos) in positions {
            if let Some(point) = point_mut(glyph, *id) {
                point.set_position(pos.x, pos.y);
            }
        }
        Ok(())
    }

    fn remove_points(&mut self, ids: &[PointId]) -> EditResult<()> {
        let glyph = self.glyph_mut()?;
        check_points(glyph, ids)?;
        let doomed: HashSet<PointId> = ids.iter().copied().collect();
        for contour in &mut glyph.contours {
            contour.points.retain(|p| !doomed.contains(&p.id));
        }
        debug!("Removed {} points", doomed.len());
        Ok(())
    }

    fn toggle_smooth(&mut self, id: PointId) -> EditResult<bool> {
        let glyph = self.glyph_mut()?;
        let point = point_mut(glyph, id).ok_or(EditError::StalePoint(id))?;
        if !point.point_type.can_be_smooth() {
            debug!("Ignoring smooth toggle on handle {:?}", id);
            return Ok(false);
        }
        point.smooth = !point.smooth;
        Ok(point.smooth)
    }

    fn close_contour(&mut self) -> EditResult<ContourId> {
        let glyph = self.glyph_mut()?;
        let id = glyph.active_contour_id.ok_or(EditError::NoActiveContour)?;
        contour_mut(glyph, id)?.closed = true;
        glyph.active_contour_id = None;
        Ok(id)
    }

    fn set_contour_closed(&mut self, id: ContourId, closed: bool) -> EditResult<()> {
        contour_mut(self.glyph_mut()?, id)?.closed = closed;
        Ok(())
    }

    fn reverse_contour(&mut self, id: ContourId) -> EditResult<()> {
        contour_mut(self.glyph_mut()?, id)?.points.reverse();
        Ok(())
    }

    fn set_active_contour(&mut self, id: Option<ContourId>) -> EditResult<()> {
        let glyph = self.glyph_mut()?;
        if let Some(id) = id {
            if glyph.contour(id).is_none() {
                return Err(EditError::StaleContour(id));
            }
        }
        glyph.active_contour_id = id;
        Ok(())
    }

    fn move_anchors(&mut self, ids: &[AnchorId], dx: f64, dy: f64) -> EditResult<()> {
        let glyph = self.glyph_mut()?;
        let unique: HashSet<AnchorId> = ids.iter().copied().collect();
        for anchor in glyph.anchors.iter_mut().filter(|a| unique.contains(&a.id)) {
            anchor.x += dx;
            anchor.y += dy;
        }
        Ok(())
    }

    fn set_advance_width(&mut self, width: f64) -> EditResult<()> {
        self.glyph_mut()?.advance_width = width;
        Ok(())
    }

    fn restore_snapshot(&mut self, snapshot: &GlyphSnapshot) -> EditResult<()> {
        let glyph = self.glyph_mut()?;
        if glyph.name != snapshot.name {
            return Err(EditError::InvalidSnapshot {
                expected: glyph.name.clone(),
                found: snapshot.name.clone(),
            });
        }
        *glyph = snapshot.clone();
        Ok(())
    }
}
