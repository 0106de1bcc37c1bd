use super::intents::{
    apply, constrained_offset, hover_at, marquee_selection, point_at, segment_points_at,
    selection_box,
};
use super::snap::{normalize_degrees, AngleSnapper};
use super::{SelectHover, SelectIntent, SelectState};
use crate::editing::{EditResult, Editor, NudgeDirection};
use crate::geometry::{BoundingBoxHit, Quadrant};
use crate::tools::behavior::{Behavior, Transition};
use crate::tools::event::{Key, ToolEvent};
use kurbo::{Affine, Point, Rect};

type SelectTransition = Transition<SelectState, SelectIntent>;

/// Handles narrower than this can't be scaled from
const MIN_EXTENT: f64 = 1e-9;

/// Every select behavior acts the same way once the state has changed
fn run(transition: SelectTransition, editor: &mut Editor) -> EditResult<SelectState> {
    if let Some(intent) = transition.intent {
        apply(intent, editor)?;
    }
    Ok(transition.next)
}

fn is_release(event: &ToolEvent) -> bool {
    matches!(event, ToolEvent::DragEnd { .. } | ToolEvent::PointerUp { .. })
}

fn selected_ids(editor: &Editor) -> Vec<crate::core::state::PointId> {
    match editor.glyph() {
        Ok(glyph) => editor.selection().ordered(glyph),
        Err(_) => Vec::new(),
    }
}

/// Escape backs out of the current gesture, or clears the selection
pub(super) struct EscapeBehavior;

impl Behavior<SelectState, SelectIntent> for EscapeBehavior {
    fn name(&self) -> &'static str {
        "escape"
    }

    fn can_handle(&self, state: &SelectState, event: &ToolEvent) -> bool {
        event.key_down() == Some(Key::Escape) && !matches!(state, SelectState::Idle)
    }

    fn transition(
        &self,
        state: &SelectState,
        _event: &ToolEvent,
        _editor: &Editor,
    ) -> Option<SelectTransition> {
        match state {
            SelectState::Dragging { .. } => Some(Transition::with(
                SelectState::resting(true),
                SelectIntent::CancelMove,
            )),
            SelectState::Resizing { .. } | SelectState::Rotating { .. } => Some(
                Transition::with(SelectState::resting(true), SelectIntent::CancelTransform),
            ),
            SelectState::Marquee { base, .. } => Some(Transition::with(
                SelectState::resting(!base.is_empty()),
                SelectIntent::SetSelection(base.clone()),
            )),
            SelectState::Selected { .. } => Some(Transition::with(
                SelectState::resting(false),
                SelectIntent::ClearSelection,
            )),
            SelectState::Ready { .. } | SelectState::Idle => None,
        }
    }

    fn on_transition(
        &self,
        _prev: &SelectState,
        transition: SelectTransition,
        _event: &ToolEvent,
        editor: &mut Editor,
    ) -> EditResult<SelectState> {
        run(transition, editor)
    }
}

/// Tracks what is under the pointer
pub(super) struct HoverBehavior;

impl Behavior<SelectState, SelectIntent> for HoverBehavior {
    fn name(&self) -> &'static str {
        "hover"
    }

    fn can_handle(&self, state: &SelectState, event: &ToolEvent) -> bool {
        matches!(state, SelectState::Ready { .. } | SelectState::Selected { .. })
            && matches!(event, ToolEvent::PointerMove { .. })
    }

    fn transition(
        &self,
        state: &SelectState,
        event: &ToolEvent,
        editor: &Editor,
    ) -> Option<SelectTransition> {
        let hover = hover_at(editor, event.pos()?);
        let point = match hover {
            SelectHover::Point(id) => Some(id),
            _ => None,
        };
        let next = match state {
            SelectState::Selected { .. } => SelectState::Selected { hover },
            _ => SelectState::Ready { hover },
        };
        Some(Transition::with(next, SelectIntent::Hover(point)))
    }

    fn on_transition(
        &self,
        _prev: &SelectState,
        transition: SelectTransition,
        _event: &ToolEvent,
        editor: &mut Editor,
    ) -> EditResult<SelectState> {
        run(transition, editor)
    }
}

/// Dragging a bounding-box handle scales about the opposite handle
pub(super) struct ResizeBehavior;

impl ResizeBehavior {
    fn scale_for(handle: Quadrant, bounds: Rect, origin: Point, pos: Point, uniform: bool) -> Affine {
        let anchor = handle.opposite().point_in_rect(bounds);
        let start = handle.point_in_rect(bounds);
        let moved = start + (pos - origin);

        let factor = |moves: bool, start: f64, anchor: f64, moved: f64| {
            let extent = start - anchor;
            if moves && extent.abs() > MIN_EXTENT {
                (moved - anchor) / extent
            } else {
                1.0
            }
        };
        let mut sx = factor(handle.moves_x(), start.x, anchor.x, moved.x);
        let mut sy = factor(handle.moves_y(), start.y, anchor.y, moved.y);

        if uniform {
            let s = match (handle.moves_x(), handle.moves_y()) {
                (true, true) if (sx - 1.0).abs() >= (sy - 1.0).abs() => sx,
                (true, true) => sy,
                (true, false) => sx,
                _ => sy,
            };
            sx = s;
            sy = s;
        }

        Affine::translate(anchor.to_vec2())
            * Affine::scale_non_uniform(sx, sy)
            * Affine::translate(-anchor.to_vec2())
    }
}

impl Behavior<SelectState, SelectIntent> for ResizeBehavior {
    fn name(&self) -> &'static str {
        "resize"
    }

    fn can_handle(&self, state: &SelectState, event: &ToolEvent) -> bool {
        match state {
            SelectState::Selected { .. } => matches!(event, ToolEvent::PointerDown { .. }),
            SelectState::Resizing { .. } => {
                matches!(event, ToolEvent::Drag { .. }) || is_release(event)
            }
            _ => false,
        }
    }

    fn transition(
        &self,
        state: &SelectState,
        event: &ToolEvent,
        editor: &Editor,
    ) -> Option<SelectTransition> {
        match (state, event) {
            (SelectState::Selected { .. }, ToolEvent::PointerDown { pos, .. }) => {
                let SelectHover::BoundingBox(BoundingBoxHit::Resize(handle)) =
                    hover_at(editor, *pos)
                else {
                    return None;
                };
                let next = SelectState::Resizing {
                    handle,
                    bounds: selection_box(editor)?,
                    ids: selected_ids(editor),
                };
                Some(Transition::with(next, SelectIntent::BeginTransform))
            }
            (
                SelectState::Resizing {
                    handle,
                    bounds,
                    ids,
                },
                ToolEvent::Drag {
                    pos,
                    origin,
                    modifiers,
                },
            ) => {
                let transform = Self::scale_for(*handle, *bounds, *origin, *pos, modifiers.shift);
                Some(Transition::with(
                    state.clone(),
                    SelectIntent::PreviewTransform {
                        ids: ids.clone(),
                        transform,
                    },
                ))
            }
            (SelectState::Resizing { .. }, _) => Some(Transition::with(
                SelectState::resting(true),
                SelectIntent::CommitTransform("Scale"),
            )),
            _ => None,
        }
    }

    fn on_transition(
        &self,
        _prev: &SelectState,
        transition: SelectTransition,
        _event: &ToolEvent,
        editor: &mut Editor,
    ) -> EditResult<SelectState> {
        run(transition, editor)
    }
}

/// Dragging in a rotation zone rotates about the selection's center
pub(super) struct RotateBehavior;

fn angle_of(center: Point, pos: Point) -> f64 {
    let v = pos - center;
    v.y.atan2(v.x).to_degrees()
}

impl Behavior<SelectState, SelectIntent> for RotateBehavior {
    fn name(&self) -> &'static str {
        "rotate"
    }

    fn can_handle(&self, state: &SelectState, event: &ToolEvent) -> bool {
        match state {
            SelectState::Selected { .. } => matches!(event, ToolEvent::PointerDown { .. }),
            SelectState::Rotating { .. } => {
                matches!(event, ToolEvent::Drag { .. }) || is_release(event)
            }
            _ => false,
        }
    }

    fn transition(
        &self,
        state: &SelectState,
        event: &ToolEvent,
        editor: &Editor,
    ) -> Option<SelectTransition> {
        match (state, event) {
            (SelectState::Selected { .. }, ToolEvent::PointerDown { pos, .. }) => {
                let SelectHover::BoundingBox(BoundingBoxHit::Rotate(_)) = hover_at(editor, *pos)
                else {
                    return None;
                };
                let center = selection_box(editor)?.center();
                let next = SelectState::Rotating {
                    center,
                    start_angle: angle_of(center, *pos),
                    snapper: AngleSnapper::new(&editor.settings().rotation),
                    ids: selected_ids(editor),
                };
                Some(Transition::with(next, SelectIntent::BeginTransform))
            }
            (
                SelectState::Rotating {
                    center,
                    start_angle,
                    snapper,
                    ids,
                },
                ToolEvent::Drag { pos, .. },
            ) => {
                let raw = normalize_degrees(angle_of(*center, *pos) - start_angle);
                let (snapper, angle) = if editor.settings().rotation.snap {
                    snapper.apply(raw)
                } else {
                    (*snapper, raw)
                };
                let next = SelectState::Rotating {
                    center: *center,
                    start_angle: *start_angle,
                    snapper,
                    ids: ids.clone(),
                };
                let transform = Affine::rotate_about(angle.to_radians(), *center);
                Some(Transition::with(
                    next,
                    SelectIntent::PreviewTransform {
                        ids: ids.clone(),
                        transform,
                    },
                ))
            }
            (SelectState::Rotating { .. }, _) => Some(Transition::with(
                SelectState::resting(true),
                SelectIntent::CommitTransform("Rotate"),
            )),
            _ => None,
        }
    }

    fn on_transition(
        &self,
        _prev: &SelectState,
        transition: SelectTransition,
        _event: &ToolEvent,
        editor: &mut Editor,
    ) -> EditResult<SelectState> {
        run(transition, editor)
    }
}

/// Press to pick points or segments; cmd+A selects everything
pub(super) struct ClickBehavior;

impl ClickBehavior {
    fn press(editor: &Editor, pos: Point, shift: bool) -> SelectTransition {
        let selection = editor.selection();
        match hover_at(editor, pos) {
            SelectHover::Point(point) => {
                if shift {
                    let emptied = selection.len() == 1 && selection.contains(point);
                    Transition::with(
                        SelectState::resting(!emptied),
                        SelectIntent::SelectPoint {
                            point,
                            toggle: true,
                        },
                    )
                } else if selection.contains(point) {
                    // Keep a multi-point selection intact so it can be dragged
                    Transition::to(SelectState::resting(true))
                } else {
                    Transition::with(
                        SelectState::resting(true),
                        SelectIntent::SelectPoint {
                            point,
                            toggle: false,
                        },
                    )
                }
            }
            SelectHover::Segment(_) => match segment_points_at(editor, pos) {
                Some(points) => Transition::with(
                    SelectState::resting(true),
                    SelectIntent::SelectPoints {
                        points,
                        extend: shift,
                    },
                ),
                None => Transition::to(SelectState::resting(!selection.is_empty())),
            },
            _ if shift => Transition::to(SelectState::resting(!selection.is_empty())),
            _ => Transition::with(SelectState::resting(false), SelectIntent::ClearSelection),
        }
    }
}

impl Behavior<SelectState, SelectIntent> for ClickBehavior {
    fn name(&self) -> &'static str {
        "click"
    }

    fn can_handle(&self, state: &SelectState, event: &ToolEvent) -> bool {
        if !matches!(state, SelectState::Ready { .. } | SelectState::Selected { .. }) {
            return false;
        }
        match event {
            ToolEvent::PointerDown { .. } => true,
            ToolEvent::KeyDown { key, modifiers } => {
                modifiers.cmd && matches!(key, Key::Char('a') | Key::Char('A'))
            }
            _ => false,
        }
    }

    fn transition(
        &self,
        _state: &SelectState,
        event: &ToolEvent,
        editor: &Editor,
    ) -> Option<SelectTransition> {
        match event {
            ToolEvent::PointerDown { pos, modifiers } => {
                Some(Self::press(editor, *pos, modifiers.shift))
            }
            _ => {
                let any = editor.glyph().ok()?.point_count() > 0;
                Some(Transition::with(
                    SelectState::resting(any),
                    SelectIntent::SelectAll,
                ))
            }
        }
    }

    fn on_transition(
        &self,
        _prev: &SelectState,
        transition: SelectTransition,
        _event: &ToolEvent,
        editor: &mut Editor,
    ) -> EditResult<SelectState> {
        run(transition, editor)
    }
}

/// Dragging a selected point moves the whole selection
pub(super) struct DragMoveBehavior;

impl Behavior<SelectState, SelectIntent> for DragMoveBehavior {
    fn name(&self) -> &'static str {
        "drag-move"
    }

    fn can_handle(&self, state: &SelectState, event: &ToolEvent) -> bool {
        match state {
            SelectState::Selected { .. } => matches!(event, ToolEvent::Drag { .. }),
            SelectState::Dragging { .. } => {
                matches!(event, ToolEvent::Drag { .. }) || is_release(event)
            }
            _ => false,
        }
    }

    fn transition(
        &self,
        state: &SelectState,
        event: &ToolEvent,
        editor: &Editor,
    ) -> Option<SelectTransition> {
        match (state, event) {
            (
                SelectState::Selected { .. },
                ToolEvent::Drag {
                    pos,
                    origin,
                    modifiers,
                },
            ) => {
                let point = point_at(editor, *origin)?;
                if !editor.selection().contains(point) {
                    return None;
                }
                let offset = constrained_offset(editor, *origin, *pos, modifiers.shift);
                Some(Transition::with(
                    SelectState::Dragging {
                        origin: *origin,
                        applied: offset,
                    },
                    SelectIntent::BeginMove(offset),
                ))
            }
            (
                SelectState::Dragging { origin, applied },
                ToolEvent::Drag { pos, modifiers, .. },
            ) => {
                let offset = constrained_offset(editor, *origin, *pos, modifiers.shift);
                Some(Transition::with(
                    SelectState::Dragging {
                        origin: *origin,
                        applied: offset,
                    },
                    SelectIntent::MoveBy(offset - *applied),
                ))
            }
            (SelectState::Dragging { .. }, _) => Some(Transition::with(
                SelectState::resting(true),
                SelectIntent::EndMove,
            )),
            _ => None,
        }
    }

    fn on_transition(
        &self,
        _prev: &SelectState,
        transition: SelectTransition,
        _event: &ToolEvent,
        editor: &mut Editor,
    ) -> EditResult<SelectState> {
        run(transition, editor)
    }
}

/// Rubber-band selection; shift keeps what was already selected
pub(super) struct MarqueeBehavior;

impl Behavior<SelectState, SelectIntent> for MarqueeBehavior {
    fn name(&self) -> &'static str {
        "marquee"
    }

    fn can_handle(&self, state: &SelectState, event: &ToolEvent) -> bool {
        match state {
            SelectState::Ready { .. } | SelectState::Selected { .. } => {
                matches!(event, ToolEvent::Drag { .. })
            }
            SelectState::Marquee { .. } => {
                matches!(event, ToolEvent::Drag { .. }) || is_release(event)
            }
            _ => false,
        }
    }

    fn transition(
        &self,
        state: &SelectState,
        event: &ToolEvent,
        editor: &Editor,
    ) -> Option<SelectTransition> {
        let pos = event.pos()?;
        match (state, event) {
            (SelectState::Marquee { origin, base, .. }, ToolEvent::Drag { .. }) => {
                let rect = Rect::from_points(*origin, pos);
                Some(Transition::with(
                    SelectState::Marquee {
                        origin: *origin,
                        current: pos,
                        base: base.clone(),
                    },
                    SelectIntent::Marquee {
                        rect,
                        base: base.clone(),
                    },
                ))
            }
            (SelectState::Marquee { origin, base, .. }, _) => {
                let rect = Rect::from_points(*origin, pos);
                let selected = marquee_selection(editor, rect, base);
                Some(Transition::with(
                    SelectState::resting(!selected.is_empty()),
                    SelectIntent::SetSelection(selected),
                ))
            }
            (_, ToolEvent::Drag { origin, modifiers, .. }) => {
                let base = if modifiers.shift {
                    match editor.glyph() {
                        Ok(glyph) => editor.selection().ordered(glyph),
                        Err(_) => Vec::new(),
                    }
                } else {
                    Vec::new()
                };
                let rect = Rect::from_points(*origin, pos);
                Some(Transition::with(
                    SelectState::Marquee {
                        origin: *origin,
                        current: pos,
                        base: base.clone(),
                    },
                    SelectIntent::Marquee { rect, base },
                ))
            }
            _ => None,
        }
    }

    fn on_transition(
        &self,
        _prev: &SelectState,
        transition: SelectTransition,
        _event: &ToolEvent,
        editor: &mut Editor,
    ) -> EditResult<SelectState> {
        run(transition, editor)
    }
}

/// Arrow keys: plain, shift and cmd pick the step size
pub(super) struct NudgeBehavior;

impl NudgeBehavior {
    fn direction(key: Key) -> Option<NudgeDirection> {
        match key {
            Key::ArrowLeft => Some(NudgeDirection::Left),
            Key::ArrowRight => Some(NudgeDirection::Right),
            Key::ArrowUp => Some(NudgeDirection::Up),
            Key::ArrowDown => Some(NudgeDirection::Down),
            _ => None,
        }
    }
}

impl Behavior<SelectState, SelectIntent> for NudgeBehavior {
    fn name(&self) -> &'static str {
        "nudge"
    }

    fn can_handle(&self, state: &SelectState, event: &ToolEvent) -> bool {
        matches!(state, SelectState::Selected { .. })
            && event.key_down().and_then(Self::direction).is_some()
    }

    fn transition(
        &self,
        state: &SelectState,
        event: &ToolEvent,
        _editor: &Editor,
    ) -> Option<SelectTransition> {
        let direction = Self::direction(event.key_down()?)?;
        let modifiers = event.modifiers();
        Some(Transition::with(
            state.clone(),
            SelectIntent::Nudge {
                direction,
                shift: modifiers.shift,
                cmd: modifiers.cmd,
            },
        ))
    }

    fn on_transition(
        &self,
        _prev: &SelectState,
        transition: SelectTransition,
        _event: &ToolEvent,
        editor: &mut Editor,
    ) -> EditResult<SelectState> {
        run(transition, editor)
    }
}

/// Delete or Backspace removes the selection
pub(super) struct DeleteBehavior;

impl Behavior<SelectState, SelectIntent> for DeleteBehavior {
    fn name(&self) -> &'static str {
        "delete"
    }

    fn can_handle(&self, state: &SelectState, event: &ToolEvent) -> bool {
        matches!(state, SelectState::Selected { .. })
            && matches!(event.key_down(), Some(Key::Delete | Key::Backspace))
    }

    fn transition(
        &self,
        _state: &SelectState,
        _event: &ToolEvent,
        _editor: &Editor,
    ) -> Option<SelectTransition> {
        Some(Transition::with(
            SelectState::resting(false),
            SelectIntent::Delete,
        ))
    }

    fn on_transition(
        &self,
        _prev: &SelectState,
        transition: SelectTransition,
        _event: &ToolEvent,
        editor: &mut Editor,
    ) -> EditResult<SelectState> {
        run(transition, editor)
    }
}
