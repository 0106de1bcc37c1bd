//! The static rule table

use super::pattern;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What a matched pattern asks the editor to do
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleId {
    /// Anchor moves; its following handle moves with it
    MoveRightHandle,
    /// Anchor moves; its preceding handle moves with it
    MoveLeftHandle,
    /// Anchor moves; both neighbouring handles move with it
    MoveBothHandles,
    /// Handle after a smooth anchor moves; the handle before the anchor
    /// turns to stay collinear
    MaintainTangencyRight,
    /// Handle before a smooth anchor moves; the handle after it turns
    MaintainTangencyLeft,
    /// Reserved. No template maps to it and it has no action.
    MaintainCollinearity,
}

impl RuleId {
    /// Rules whose affected points move by the same delta as the center
    pub fn moves_with_center(&self) -> bool {
        matches!(
            self,
            RuleId::MoveRightHandle | RuleId::MoveLeftHandle | RuleId::MoveBothHandles
        )
    }

    pub fn is_tangency(&self) -> bool {
        matches!(
            self,
            RuleId::MaintainTangencyRight | RuleId::MaintainTangencyLeft
        )
    }
}

/// A template and the action it stands for
#[derive(Clone, Copy, Debug)]
pub struct Rule {
    pub id: RuleId,
    pub template: &'static str,
    pub description: &'static str,
}

/// Templates in priority order
pub const RULES: &[Rule] = &[
    Rule {
        id: RuleId::MoveRightHandle,
        template: "[X@][CS]H",
        description: "move the handle after the anchor",
    },
    Rule {
        id: RuleId::MoveLeftHandle,
        template: "H[CS][X@]",
        description: "move the handle before the anchor",
    },
    Rule {
        id: RuleId::MoveBothHandles,
        template: "H[CS]H",
        description: "move both handles of the anchor",
    },
    Rule {
        id: RuleId::MaintainTangencyRight,
        template: "HS[HC][@X][@X]",
        description: "keep the opposite handle collinear through the smooth anchor",
    },
    Rule {
        id: RuleId::MaintainTangencyLeft,
        template: "[@X]HS",
        description: "keep the opposite handle collinear through the smooth anchor",
    },
];

/// Concrete pattern → rule. When templates overlap the later rule wins,
/// so `HSH` resolves to moving both handles rather than one.
pub fn build_rule_table() -> HashMap<String, Rule> {
    let mut table = HashMap::new();
    for rule in RULES {
        for pattern in pattern::expand(rule.template) {
            table.insert(pattern, *rule);
        }
    }
    table
}
