//! Select tool: pick, marquee, move, resize, rotate, nudge and delete
//!
//! Each gesture is its own behavior. Moves run inside a history batch so
//! the smart-edit fixes of every drag frame undo together; resize and
//! rotation run inside a preview session and commit as a single snapshot
//! command on release.

mod behaviors;
mod intents;
mod snap;

pub use snap::{normalize_degrees, AngleSnapper};

use super::behavior::{rule, StateMachine, ToolState, TransitionRule};
use super::event::EventKind;
use super::tool_state::ToolId;
use crate::core::state::PointId;
use crate::editing::{Editor, NudgeDirection};
use crate::geometry::{BoundingBoxHit, Quadrant, SegmentId};
use behaviors::{
    ClickBehavior, DeleteBehavior, DragMoveBehavior, EscapeBehavior, HoverBehavior,
    MarqueeBehavior, NudgeBehavior, ResizeBehavior, RotateBehavior,
};
use kurbo::{Affine, Point, Rect, Vec2};

/// What the pointer is over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectHover {
    #[default]
    Nothing,
    Point(PointId),
    Segment(SegmentId),
    BoundingBox(BoundingBoxHit),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectState {
    Idle,
    /// Nothing selected
    Ready { hover: SelectHover },
    Selected { hover: SelectHover },
    /// Moving the selection; `applied` is the offset already executed
    Dragging { origin: Point, applied: Vec2 },
    Resizing {
        handle: Quadrant,
        bounds: Rect,
        ids: Vec<PointId>,
    },
    Rotating {
        center: Point,
        /// Degrees
        start_angle: f64,
        snapper: AngleSnapper,
        ids: Vec<PointId>,
    },
    Marquee {
        origin: Point,
        current: Point,
        /// Selection kept underneath the rectangle (shift-marquee)
        base: Vec<PointId>,
    },
}

impl ToolState for SelectState {
    fn name(&self) -> &'static str {
        match self {
            SelectState::Idle => "idle",
            SelectState::Ready { .. } => "ready",
            SelectState::Selected { .. } => "selected",
            SelectState::Dragging { .. } => "dragging",
            SelectState::Resizing { .. } => "resizing",
            SelectState::Rotating { .. } => "rotating",
            SelectState::Marquee { .. } => "marquee",
        }
    }
}

impl SelectState {
    /// `Selected` or `Ready`, depending on whether anything will be selected
    fn resting(has_selection: bool) -> Self {
        if has_selection {
            SelectState::Selected {
                hover: SelectHover::Nothing,
            }
        } else {
            SelectState::Ready {
                hover: SelectHover::Nothing,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectIntent {
    Hover(Option<PointId>),
    SelectPoint { point: PointId, toggle: bool },
    SelectPoints { points: Vec<PointId>, extend: bool },
    SetSelection(Vec<PointId>),
    ClearSelection,
    SelectAll,
    Marquee { rect: Rect, base: Vec<PointId> },
    BeginMove(Vec2),
    MoveBy(Vec2),
    EndMove,
    CancelMove,
    BeginTransform,
    PreviewTransform { ids: Vec<PointId>, transform: Affine },
    CommitTransform(&'static str),
    CancelTransform,
    Nudge {
        direction: NudgeDirection,
        shift: bool,
        cmd: bool,
    },
    Delete,
}

pub const SELECT_STATES: &[&str] = &[
    "idle", "ready", "selected", "dragging", "resizing", "rotating", "marquee",
];

pub const SELECT_TRANSITIONS: &[TransitionRule] = &[
    rule("idle", EventKind::Activate, "ready"),
    rule("idle", EventKind::Activate, "selected"),
    rule("ready", EventKind::PointerDown, "selected"),
    rule("selected", EventKind::PointerDown, "ready"),
    rule("selected", EventKind::PointerDown, "resizing"),
    rule("selected", EventKind::PointerDown, "rotating"),
    rule("ready", EventKind::Drag, "marquee"),
    rule("selected", EventKind::Drag, "marquee"),
    rule("selected", EventKind::Drag, "dragging"),
    rule("dragging", EventKind::DragEnd, "selected"),
    rule("dragging", EventKind::PointerUp, "selected"),
    rule("dragging", EventKind::KeyDown, "selected"),
    rule("resizing", EventKind::DragEnd, "selected"),
    rule("resizing", EventKind::PointerUp, "selected"),
    rule("resizing", EventKind::KeyDown, "selected"),
    rule("rotating", EventKind::DragEnd, "selected"),
    rule("rotating", EventKind::PointerUp, "selected"),
    rule("rotating", EventKind::KeyDown, "selected"),
    rule("marquee", EventKind::DragEnd, "ready"),
    rule("marquee", EventKind::DragEnd, "selected"),
    rule("marquee", EventKind::PointerUp, "ready"),
    rule("marquee", EventKind::PointerUp, "selected"),
    rule("marquee", EventKind::KeyDown, "ready"),
    rule("marquee", EventKind::KeyDown, "selected"),
    rule("selected", EventKind::KeyDown, "ready"),
    rule("ready", EventKind::KeyDown, "selected"),
    rule("ready", EventKind::Deactivate, "idle"),
    rule("selected", EventKind::Deactivate, "idle"),
    rule("dragging", EventKind::Deactivate, "idle"),
    rule("resizing", EventKind::Deactivate, "idle"),
    rule("rotating", EventKind::Deactivate, "idle"),
    rule("marquee", EventKind::Deactivate, "idle"),
];

pub type SelectTool = StateMachine<SelectState, SelectIntent>;

fn on_activate(editor: &Editor) -> SelectState {
    SelectState::resting(!editor.selection().is_empty())
}

impl StateMachine<SelectState, SelectIntent> {
    pub fn new() -> Self {
        Self::from_parts(
            ToolId::Select,
            SelectState::Idle,
            on_activate,
            SELECT_STATES,
            SELECT_TRANSITIONS,
            vec![
                Box::new(EscapeBehavior),
                Box::new(HoverBehavior),
                Box::new(ResizeBehavior),
                Box::new(RotateBehavior),
                Box::new(ClickBehavior),
                Box::new(DragMoveBehavior),
                Box::new(MarqueeBehavior),
                Box::new(NudgeBehavior),
                Box::new(DeleteBehavior),
            ],
        )
    }
}

impl Default for StateMachine<SelectState, SelectIntent> {
    fn default() -> Self {
        Self::new()
    }
}
