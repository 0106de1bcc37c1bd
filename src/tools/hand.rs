//! Hand tool: drag to pan the viewport
//!
//! Drag positions are measured in design units of the viewport as it was
//! when the press started; the pan is recomputed from that start on every
//! frame so it never drifts.

use super::behavior::{rule, Behavior, StateMachine, ToolState, Transition, TransitionRule};
use super::event::{EventKind, Key, ToolEvent};
use super::tool_state::ToolId;
use crate::editing::{EditResult, Editor};
use kurbo::{Point, Vec2};

#[derive(Debug, Clone, PartialEq)]
pub enum HandState {
    Idle,
    Ready,
    Panning {
        /// Viewport pan when the drag started
        start_pan: Vec2,
        zoom: f64,
        origin: Point,
    },
}

impl ToolState for HandState {
    fn name(&self) -> &'static str {
        match self {
            HandState::Idle => "idle",
            HandState::Ready => "ready",
            HandState::Panning { .. } => "panning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandIntent {
    SetPan(Vec2),
}

pub const HAND_STATES: &[&str] = &["idle", "ready", "panning"];

pub const HAND_TRANSITIONS: &[TransitionRule] = &[
    rule("idle", EventKind::Activate, "ready"),
    rule("ready", EventKind::Drag, "panning"),
    rule("panning", EventKind::DragEnd, "ready"),
    rule("panning", EventKind::PointerUp, "ready"),
    rule("panning", EventKind::KeyDown, "ready"),
    rule("ready", EventKind::Deactivate, "idle"),
    rule("panning", EventKind::Deactivate, "idle"),
];

pub type HandTool = StateMachine<HandState, HandIntent>;

impl StateMachine<HandState, HandIntent> {
    pub fn new() -> Self {
        Self::from_parts(
            ToolId::Hand,
            HandState::Idle,
            |_| HandState::Ready,
            HAND_STATES,
            HAND_TRANSITIONS,
            vec![Box::new(PanBehavior)],
        )
    }
}

impl Default for StateMachine<HandState, HandIntent> {
    fn default() -> Self {
        Self::new()
    }
}

struct PanBehavior;

impl PanBehavior {
    fn pan_for(start_pan: Vec2, zoom: f64, origin: Point, pos: Point) -> Vec2 {
        let delta = pos - origin;
        start_pan + Vec2::new(delta.x * zoom, -delta.y * zoom)
    }
}

impl Behavior<HandState, HandIntent> for PanBehavior {
    fn name(&self) -> &'static str {
        "pan"
    }

    fn can_handle(&self, state: &HandState, event: &ToolEvent) -> bool {
        match state {
            HandState::Ready => matches!(event, ToolEvent::Drag { .. }),
            HandState::Panning { .. } => matches!(
                event,
                ToolEvent::Drag { .. }
                    | ToolEvent::DragEnd { .. }
                    | ToolEvent::PointerUp { .. }
                    | ToolEvent::KeyDown {
                        key: Key::Escape,
                        ..
                    }
            ),
            HandState::Idle => false,
        }
    }

    fn transition(
        &self,
        state: &HandState,
        event: &ToolEvent,
        editor: &Editor,
    ) -> Option<Transition<HandState, HandIntent>> {
        match (state, event) {
            (HandState::Ready, ToolEvent::Drag { pos, origin, .. }) => {
                let viewport = editor.viewport();
                let next = HandState::Panning {
                    start_pan: viewport.pan,
                    zoom: viewport.zoom,
                    origin: *origin,
                };
                let pan = Self::pan_for(viewport.pan, viewport.zoom, *origin, *pos);
                Some(Transition::with(next, HandIntent::SetPan(pan)))
            }
            (
                HandState::Panning {
                    start_pan,
                    zoom,
                    origin,
                },
                ToolEvent::Drag { pos, .. },
            ) => {
                let pan = Self::pan_for(*start_pan, *zoom, *origin, *pos);
                Some(Transition::with(state.clone(), HandIntent::SetPan(pan)))
            }
            (HandState::Panning { start_pan, .. }, ToolEvent::KeyDown { .. }) => Some(
                Transition::with(HandState::Ready, HandIntent::SetPan(*start_pan)),
            ),
            (HandState::Panning { .. }, _) => Some(Transition::to(HandState::Ready)),
            _ => None,
        }
    }

    fn on_transition(
        &self,
        _prev: &HandState,
        transition: Transition<HandState, HandIntent>,
        _event: &ToolEvent,
        editor: &mut Editor,
    ) -> EditResult<HandState> {
        if let Some(HandIntent::SetPan(pan)) = transition.intent {
            editor.viewport_mut().pan = pan;
        }
        Ok(transition.next)
    }
}
