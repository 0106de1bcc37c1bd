//! Window building and rule lookup

use super::pattern::Token;
use super::rules::{build_rule_table, Rule, RuleId};
use crate::core::state::{Contour, PointId};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Window widths to try, narrowest first
const WINDOW_SIZES: [usize; 2] = [3, 5];

/// A rule that fired for a point, with the neighbours it touches
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedRule {
    pub point_id: PointId,
    pub rule_id: RuleId,
    pub description: &'static str,
    pub pattern: String,
    pub affected_point_ids: Vec<PointId>,
}

/// Looks up neighbour-classification windows in the rule table
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    table: HashMap<String, Rule>,
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternMatcher {
    pub fn new() -> Self {
        Self {
            table: build_rule_table(),
        }
    }

    /// Token string for the `width` points centered on `index`.
    /// Windows do not wrap around closed contours.
    pub fn window(
        contour: &Contour,
        index: usize,
        selected: &HashSet<PointId>,
        width: usize,
    ) -> String {
        let half = (width / 2) as isize;
        (-half..=half)
            .map(|offset| {
                let point = index
                    .checked_add_signed(offset)
                    .and_then(|i| contour.points.get(i));
                Token::classify(point, selected, offset == 0).as_char()
            })
            .collect()
    }

    /// Every window tried for a point, narrowest first
    pub fn windows(
        &self,
        contour: &Contour,
        point_id: PointId,
        selected: &HashSet<PointId>,
    ) -> Vec<String> {
        let Some(index) = contour.index_of(point_id) else {
            return Vec::new();
        };
        WINDOW_SIZES
            .iter()
            .map(|width| Self::window(contour, index, selected, *width))
            .collect()
    }

    /// The first rule matching a window around `point_id`
    pub fn match_rule(
        &self,
        contour: &Contour,
        point_id: PointId,
        selected: &HashSet<PointId>,
    ) -> Option<MatchedRule> {
        let index = contour.index_of(point_id)?;

        WINDOW_SIZES.iter().find_map(|width| {
            let pattern = Self::window(contour, index, selected, *width);
            let rule = self.table.get(&pattern)?;
            trace!("{:?} matched {:?} with '{}'", point_id, rule.id, pattern);
            Some(MatchedRule {
                point_id,
                rule_id: rule.id,
                description: rule.description,
                affected_point_ids: affected_points(contour, index, rule.id),
                pattern,
            })
        })
    }
}

/// Neighbour ids touched by `rule` for the point at `index`
fn affected_points(contour: &Contour, index: usize, rule: RuleId) -> Vec<PointId> {
    let offsets: &[isize] = match rule {
        RuleId::MoveRightHandle => &[1],
        RuleId::MoveLeftHandle => &[-1],
        RuleId::MoveBothHandles => &[-1, 1],
        // Adjacent anchor first, then the handle beyond it
        RuleId::MaintainTangencyRight => &[-1, -2],
        RuleId::MaintainTangencyLeft => &[1, 2],
        RuleId::MaintainCollinearity => &[],
    };
    offsets
        .iter()
        .filter_map(|offset| index.checked_add_signed(*offset))
        .filter_map(|i| contour.points.get(i))
        .map(|p| p.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Point;

    struct Fixture {
        contour: Contour,
        corner: PointId,
        handle1: PointId,
        smooth: PointId,
        handle2: PointId,
    }

    /// corner, handle, smooth anchor, handle, corner
    fn smooth_bezier() -> Fixture {
        let points = vec![
            Point::on_curve(0.0, 0.0),
            Point::off_curve(50.0, 0.0),
            Point::on_curve(100.0, 50.0).with_smooth(true),
            Point::off_curve(150.0, 100.0),
            Point::on_curve(200.0, 100.0),
        ];
        let ids: Vec<PointId> = points.iter().map(|p| p.id).collect();
        Fixture {
            contour: Contour::with_points(points, false),
            corner: ids[0],
            handle1: ids[1],
            smooth: ids[2],
            handle2: ids[3],
        }
    }

    fn selection(ids: &[PointId]) -> HashSet<PointId> {
        ids.iter().copied().collect()
    }

    #[test]
    fn window_for_smooth_anchor() {
        let f = smooth_bezier();
        let windows = PatternMatcher::new().windows(&f.contour, f.smooth, &selection(&[f.smooth]));
        assert_eq!(windows, vec!["HSH".to_string(), "CHSHC".to_string()]);
    }

    #[test]
    fn window_marks_selected_neighbours() {
        let f = smooth_bezier();
        let windows = PatternMatcher::new().windows(
            &f.contour,
            f.smooth,
            &selection(&[f.smooth, f.handle1]),
        );
        assert_eq!(windows[0], "@SH");
    }

    #[test]
    fn smooth_anchor_moves_both_handles() {
        let f = smooth_bezier();
        let matched = PatternMatcher::new()
            .match_rule(&f.contour, f.smooth, &selection(&[f.smooth]))
            .unwrap();
        assert_eq!(matched.rule_id, RuleId::MoveBothHandles);
        assert_eq!(matched.affected_point_ids, vec![f.handle1, f.handle2]);
    }

    #[test]
    fn handle_after_smooth_anchor_keeps_tangency() {
        let f = smooth_bezier();
        let matcher = PatternMatcher::new();
        let selected = selection(&[f.handle2]);

        let windows = matcher.windows(&f.contour, f.handle2, &selected);
        assert_eq!(windows, vec!["SHC".to_string(), "HSHCN".to_string()]);

        let matched = matcher.match_rule(&f.contour, f.handle2, &selected).unwrap();
        assert_eq!(matched.rule_id, RuleId::MaintainTangencyRight);
        assert_eq!(matched.pattern, "HSHCN");
        assert_eq!(matched.affected_point_ids, vec![f.smooth, f.handle1]);
    }

    #[test]
    fn handle_before_smooth_anchor_keeps_tangency() {
        let f = smooth_bezier();
        let matched = PatternMatcher::new()
            .match_rule(&f.contour, f.handle1, &selection(&[f.handle1]))
            .unwrap();
        assert_eq!(matched.rule_id, RuleId::MaintainTangencyLeft);
        assert_eq!(matched.affected_point_ids, vec![f.smooth, f.handle2]);
    }

    #[test]
    fn corner_with_following_handle() {
        let f = smooth_bezier();
        let matched = PatternMatcher::new()
            .match_rule(&f.contour, f.corner, &selection(&[f.corner]))
            .unwrap();
        assert_eq!(matched.rule_id, RuleId::MoveRightHandle);
        assert_eq!(matched.affected_point_ids, vec![f.handle1]);
    }

    #[test]
    fn corners_only_match_nothing() {
        let points = vec![Point::on_curve(0.0, 0.0), Point::on_curve(100.0, 0.0)];
        let first = points[0].id;
        let contour = Contour::with_points(points, false);
        assert!(PatternMatcher::new()
            .match_rule(&contour, first, &selection(&[first]))
            .is_none());
    }

    #[test]
    fn unknown_point_matches_nothing() {
        let f = smooth_bezier();
        assert!(PatternMatcher::new()
            .match_rule(&f.contour, PointId::new(), &HashSet::new())
            .is_none());
    }
}
