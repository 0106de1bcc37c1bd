//! Smart edits: which extra points move when the selection moves
//!
//! Each selected point is classified together with its neighbours into a
//! short token window (see [`pattern`]). The window is looked up in a table
//! of rules (see [`rules`]); a match names the neighbours that follow the
//! selection and the handles that must turn to keep a smooth anchor smooth.

pub mod matcher;
pub mod pattern;
pub mod rules;

pub use matcher::{MatchedRule, PatternMatcher};
pub use rules::RuleId;

use crate::core::state::{Glyph, PointId};
use std::collections::HashSet;

/// A handle that must be re-aimed after a move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TangencyFix {
    /// The smooth anchor between the two handles
    pub anchor: PointId,
    /// The handle the user moved
    pub handle: PointId,
    /// The handle on the far side of the anchor
    pub opposite: PointId,
}

/// Everything a selection move touches
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovePlan {
    /// Points translated by the move delta, in document order
    pub moved: Vec<PointId>,
    /// Handles repositioned once the move has been applied
    pub tangency: Vec<TangencyFix>,
    pub matches: Vec<MatchedRule>,
}

/// Work out which points follow a move of `selection`
pub fn plan_move(matcher: &PatternMatcher, glyph: &Glyph, selection: &HashSet<PointId>) -> MovePlan {
    let mut moved: HashSet<PointId> = selection.iter().copied().collect();
    let mut matches = Vec::new();

    for contour in &glyph.contours {
        for point in contour.points.iter().filter(|p| selection.contains(&p.id)) {
            if let Some(matched) = matcher.match_rule(contour, point.id, selection) {
                if matched.rule_id.moves_with_center() {
                    moved.extend(matched.affected_point_ids.iter().copied());
                }
                matches.push(matched);
            }
        }
    }

    let tangency = matches
        .iter()
        .filter(|m| m.rule_id.is_tangency())
        .filter_map(|m| match m.affected_point_ids.as_slice() {
            [anchor, opposite] if !moved.contains(anchor) && !moved.contains(opposite) => {
                Some(TangencyFix {
                    anchor: *anchor,
                    handle: m.point_id,
                    opposite: *opposite,
                })
            }
            _ => None,
        })
        .collect();

    let moved = glyph
        .points()
        .map(|p| p.id)
        .filter(|id| moved.contains(id))
        .collect();

    MovePlan {
        moved,
        tangency,
        matches,
    }
}
