use super::intents::{move_handles, pressed_state, pull_handles, resolve_click, run_press};
use super::{HandleSlots, PenIntent, PenState};
use crate::editing::commands::SetActiveContourCommand;
use crate::editing::{EditResult, Editor};
use crate::tools::behavior::{Behavior, Transition};
use crate::tools::event::{Key, ToolEvent};

type PenTransition = Transition<PenState, PenIntent>;

/// Escape drops the gesture in flight, or stops drawing the active contour
pub(super) struct EscapeBehavior;

impl Behavior<PenState, PenIntent> for EscapeBehavior {
    fn name(&self) -> &'static str {
        "escape"
    }

    fn can_handle(&self, state: &PenState, event: &ToolEvent) -> bool {
        event.key_down() == Some(Key::Escape) && !matches!(state, PenState::Idle)
    }

    fn transition(
        &self,
        state: &PenState,
        _event: &ToolEvent,
        editor: &Editor,
    ) -> Option<PenTransition> {
        let ready = PenState::Ready { hint: None };
        match state {
            PenState::Anchored { .. } | PenState::Dragging { .. } => {
                Some(Transition::with(ready, PenIntent::Cancel))
            }
            PenState::Ready { .. } => {
                let drawing = editor.glyph().ok()?.active_contour_id.is_some();
                drawing.then(|| Transition::with(ready, PenIntent::FinishContour))
            }
            PenState::Idle => None,
        }
    }

    fn on_transition(
        &self,
        _prev: &PenState,
        transition: PenTransition,
        _event: &ToolEvent,
        editor: &mut Editor,
    ) -> EditResult<PenState> {
        match transition.intent {
            Some(PenIntent::Cancel) if editor.is_batching() => editor.cancel_batch()?,
            Some(PenIntent::FinishContour) => {
                editor
                    .execute(Box::new(SetActiveContourCommand::new(None)))
                    .into_result()?;
            }
            _ => {}
        }
        Ok(transition.next)
    }
}

/// Keeps the click hint current for cursor feedback
pub(super) struct HoverBehavior;

impl Behavior<PenState, PenIntent> for HoverBehavior {
    fn name(&self) -> &'static str {
        "hover"
    }

    fn can_handle(&self, state: &PenState, event: &ToolEvent) -> bool {
        matches!(state, PenState::Ready { .. }) && matches!(event, ToolEvent::PointerMove { .. })
    }

    fn transition(
        &self,
        _state: &PenState,
        event: &ToolEvent,
        editor: &Editor,
    ) -> Option<PenTransition> {
        let hint = resolve_click(editor, event.pos()?, false).and_then(|i| i.hint());
        Some(Transition::to(PenState::Ready { hint }))
    }
}

/// A press: close, continue, split or place
pub(super) struct ClickBehavior;

impl Behavior<PenState, PenIntent> for ClickBehavior {
    fn name(&self) -> &'static str {
        "click"
    }

    fn can_handle(&self, state: &PenState, event: &ToolEvent) -> bool {
        matches!(state, PenState::Ready { .. }) && matches!(event, ToolEvent::PointerDown { .. })
    }

    fn transition(
        &self,
        _state: &PenState,
        event: &ToolEvent,
        editor: &Editor,
    ) -> Option<PenTransition> {
        let pos = event.pos()?;
        let intent = resolve_click(editor, pos, event.modifiers().shift)?;
        let next = pressed_state(&intent, editor, pos);
        Some(Transition::with(next, intent))
    }

    fn on_transition(
        &self,
        _prev: &PenState,
        transition: PenTransition,
        _event: &ToolEvent,
        editor: &mut Editor,
    ) -> EditResult<PenState> {
        let Some(intent) = transition.intent else {
            return Ok(transition.next);
        };
        let PenState::Anchored { origin, slots, .. } = transition.next else {
            return Ok(transition.next);
        };
        let anchor = run_press(editor, &intent)?;
        editor.selection_mut().select(anchor);
        Ok(PenState::Anchored {
            anchor: Some(anchor),
            origin,
            slots,
        })
    }
}

/// Dragging away from a fresh anchor pulls out mirrored handles
pub(super) struct HandleDragBehavior;

impl Behavior<PenState, PenIntent> for HandleDragBehavior {
    fn name(&self) -> &'static str {
        "drag-handles"
    }

    fn can_handle(&self, state: &PenState, event: &ToolEvent) -> bool {
        matches!(state, PenState::Anchored { .. } | PenState::Dragging { .. })
            && matches!(event, ToolEvent::Drag { .. })
    }

    fn transition(
        &self,
        state: &PenState,
        event: &ToolEvent,
        editor: &Editor,
    ) -> Option<PenTransition> {
        let pos = event.pos()?;
        match state {
            PenState::Anchored {
                anchor: Some(anchor),
                origin,
                slots,
            } if !slots.is_empty() => {
                let threshold = editor.tolerance(editor.settings().pen.drag_threshold);
                if pos.distance(*origin) <= threshold {
                    return Some(Transition::to(state.clone()));
                }
                let next = PenState::Dragging {
                    anchor: *anchor,
                    origin: *origin,
                    incoming: None,
                    outgoing: None,
                };
                Some(Transition::with(next, PenIntent::PullHandles { pos }))
            }
            // Nothing to pull, swallow the drag
            PenState::Anchored { .. } => Some(Transition::to(state.clone())),
            PenState::Dragging { .. } => Some(Transition::with(
                state.clone(),
                PenIntent::MoveHandles { pos },
            )),
            _ => None,
        }
    }

    fn on_transition(
        &self,
        prev: &PenState,
        transition: PenTransition,
        event: &ToolEvent,
        editor: &mut Editor,
    ) -> EditResult<PenState> {
        match (transition.intent, prev, transition.next) {
            (
                Some(PenIntent::PullHandles { pos }),
                PenState::Anchored { slots, .. },
                PenState::Dragging { anchor, origin, .. },
            ) => {
                let (incoming, outgoing) = pull_handles(editor, anchor, *slots, pos)?;
                Ok(PenState::Dragging {
                    anchor,
                    origin,
                    incoming,
                    outgoing,
                })
            }
            (
                Some(PenIntent::MoveHandles { pos }),
                _,
                next @ PenState::Dragging {
                    anchor,
                    incoming,
                    outgoing,
                    ..
                },
            ) => {
                move_handles(
                    editor,
                    anchor,
                    incoming,
                    outgoing,
                    pos,
                    event.modifiers().shift,
                )?;
                Ok(next)
            }
            (_, _, next) => Ok(next),
        }
    }
}

/// Releasing commits the batch the press opened
pub(super) struct ReleaseBehavior;

impl Behavior<PenState, PenIntent> for ReleaseBehavior {
    fn name(&self) -> &'static str {
        "release"
    }

    fn can_handle(&self, state: &PenState, event: &ToolEvent) -> bool {
        matches!(state, PenState::Anchored { .. } | PenState::Dragging { .. })
            && event.is_release()
    }

    fn transition(
        &self,
        state: &PenState,
        event: &ToolEvent,
        _editor: &Editor,
    ) -> Option<PenTransition> {
        let ready = PenState::Ready { hint: None };
        match (state, event) {
            (PenState::Dragging { anchor, origin, .. }, ToolEvent::DragEnd { .. }) => {
                Some(Transition::to(PenState::Anchored {
                    anchor: Some(*anchor),
                    origin: *origin,
                    slots: HandleSlots::NONE,
                }))
            }
            _ => Some(Transition::with(ready, PenIntent::Commit)),
        }
    }

    fn on_transition(
        &self,
        _prev: &PenState,
        transition: PenTransition,
        _event: &ToolEvent,
        editor: &mut Editor,
    ) -> EditResult<PenState> {
        if transition.intent == Some(PenIntent::Commit) && editor.is_batching() {
            editor.end_batch()?;
        }
        Ok(transition.next)
    }
}
