//! Pen tool: click to place anchors, drag to pull out handles
//!
//! A press starts a batch, so an anchor and the handles dragged out of it
//! undo as one step. What a press does depends on what is under it; see
//! [`PenIntent`].

mod behaviors;
mod intents;

pub use intents::{resolve_click, split_contour_at, split_segment};

use super::behavior::{rule, StateMachine, ToolState, TransitionRule};
use super::event::EventKind;
use super::tool_state::ToolId;
use crate::core::state::{ContourId, PointId};
use crate::geometry::SegmentId;
use behaviors::{ClickBehavior, EscapeBehavior, HandleDragBehavior, HoverBehavior, ReleaseBehavior};
use kurbo::Point;

/// Where the handle on the incoming side of a new anchor goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncomingSlot {
    /// Directly before the anchor
    BeforeAnchor,
    /// At the end of the contour, for the segment closing onto its start
    ContourEnd,
}

/// Which handles a drag from the anchor may create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandleSlots {
    pub incoming: Option<IncomingSlot>,
    pub outgoing: bool,
}

impl HandleSlots {
    pub const NONE: HandleSlots = HandleSlots {
        incoming: None,
        outgoing: false,
    };

    pub fn is_empty(&self) -> bool {
        self.incoming.is_none() && !self.outgoing
    }
}

/// What a click at the current hover position would do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenHint {
    Place,
    Close,
    Continue,
    SplitPoint,
    SplitSegment,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PenState {
    Idle,
    Ready {
        hint: Option<PenHint>,
    },
    Anchored {
        /// Filled in once the press has placed or found its point
        anchor: Option<PointId>,
        origin: Point,
        slots: HandleSlots,
    },
    Dragging {
        anchor: PointId,
        origin: Point,
        incoming: Option<PointId>,
        outgoing: Option<PointId>,
    },
}

impl ToolState for PenState {
    fn name(&self) -> &'static str {
        match self {
            PenState::Idle => "idle",
            PenState::Ready { .. } => "ready",
            PenState::Anchored { .. } => "anchored",
            PenState::Dragging { .. } => "dragging",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PenIntent {
    /// Close the active contour onto its first point
    Close { contour: ContourId },
    /// Make an open contour active again, drawing on from one of its ends
    Continue { contour: ContourId, from_start: bool },
    /// Break a contour at an existing anchor and draw on from there
    SplitPoint { point: PointId },
    /// Insert an anchor into a segment at parameter `t`
    SplitSegment {
        contour: ContourId,
        segment: SegmentId,
        t: f64,
    },
    /// Append an anchor to the active contour, starting one if needed
    Place { pos: Point },
    PullHandles { pos: Point },
    MoveHandles { pos: Point },
    Commit,
    Cancel,
    /// Stop drawing the active contour without closing it
    FinishContour,
}

impl PenIntent {
    pub fn hint(&self) -> Option<PenHint> {
        match self {
            PenIntent::Close { .. } => Some(PenHint::Close),
            PenIntent::Continue { .. } => Some(PenHint::Continue),
            PenIntent::SplitPoint { .. } => Some(PenHint::SplitPoint),
            PenIntent::SplitSegment { .. } => Some(PenHint::SplitSegment),
            PenIntent::Place { .. } => Some(PenHint::Place),
            _ => None,
        }
    }

    /// History label for the batch a press opens
    pub fn label(&self) -> &'static str {
        match self {
            PenIntent::Close { .. } => "Close Contour",
            PenIntent::Continue { .. } => "Continue Contour",
            PenIntent::SplitPoint { .. } => "Split Contour",
            PenIntent::SplitSegment { .. } => "Split Segment",
            PenIntent::Place { .. } => "Add Point",
            PenIntent::PullHandles { .. } | PenIntent::MoveHandles { .. } => "Drag Handles",
            PenIntent::Commit => "Commit",
            PenIntent::Cancel => "Cancel",
            PenIntent::FinishContour => "Finish Contour",
        }
    }
}

pub const PEN_STATES: &[&str] = &["idle", "ready", "anchored", "dragging"];

pub const PEN_TRANSITIONS: &[TransitionRule] = &[
    rule("idle", EventKind::Activate, "ready"),
    rule("ready", EventKind::PointerDown, "anchored"),
    rule("anchored", EventKind::Drag, "dragging"),
    rule("dragging", EventKind::DragEnd, "anchored"),
    rule("dragging", EventKind::PointerUp, "ready"),
    rule("anchored", EventKind::PointerUp, "ready"),
    rule("anchored", EventKind::DragEnd, "ready"),
    rule("anchored", EventKind::KeyDown, "ready"),
    rule("dragging", EventKind::KeyDown, "ready"),
    rule("ready", EventKind::Deactivate, "idle"),
    rule("anchored", EventKind::Deactivate, "idle"),
    rule("dragging", EventKind::Deactivate, "idle"),
];

pub type PenTool = StateMachine<PenState, PenIntent>;

impl StateMachine<PenState, PenIntent> {
    pub fn new() -> Self {
        Self::from_parts(
            ToolId::Pen,
            PenState::Idle,
            |_| PenState::Ready { hint: None },
            PEN_STATES,
            PEN_TRANSITIONS,
            vec![
                Box::new(EscapeBehavior),
                Box::new(HoverBehavior),
                Box::new(ClickBehavior),
                Box::new(HandleDragBehavior),
                Box::new(ReleaseBehavior),
            ],
        )
    }
}

impl Default for StateMachine<PenState, PenIntent> {
    fn default() -> Self {
        Self::new()
    }
}
