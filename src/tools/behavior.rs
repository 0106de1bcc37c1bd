//! State machines assembled from behaviors
//!
//! A tool is a [`StateMachine`]: a tagged state, a declared transition table
//! and an ordered list of [`Behavior`]s. On each event the behaviors are
//! asked in order; the first one that returns a [`Transition`] wins. Working
//! out the next state is kept apart from acting on it: the winning
//! behavior's [`Behavior::on_transition`] carries out the transition's
//! intent once the state has changed.

use super::event::{EventKind, ToolEvent};
use super::tool_state::ToolId;
use crate::editing::{EditResult, Editor};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Recent transitions kept for inspection
const TRANSITION_LOG_LIMIT: usize = 256;

/// A tool's state enum
pub trait ToolState: Clone + fmt::Debug {
    /// Name of the variant, as used in the transition table
    fn name(&self) -> &'static str;
}

/// One `(from, event) -> to` entry of a transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionRule {
    pub from: &'static str,
    pub event: EventKind,
    pub to: &'static str,
}

pub const fn rule(from: &'static str, event: EventKind, to: &'static str) -> TransitionRule {
    TransitionRule { from, event, to }
}

/// The next state plus whatever should happen because of it
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S, I> {
    pub next: S,
    pub intent: Option<I>,
}

impl<S, I> Transition<S, I> {
    pub fn to(next: S) -> Self {
        Self { next, intent: None }
    }

    pub fn with(next: S, intent: I) -> Self {
        Self {
            next,
            intent: Some(intent),
        }
    }
}

/// A transition that actually happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRecord {
    pub from: &'static str,
    pub event: EventKind,
    pub to: &'static str,
    pub behavior: &'static str,
}

/// One concern of a tool (hovering, nudging, placing points, ...)
pub trait Behavior<S, I> {
    fn name(&self) -> &'static str;

    /// Cheap filter on state and event kind
    fn can_handle(&self, state: &S, event: &ToolEvent) -> bool;

    /// Work out the next state. `None` passes the event to the next behavior.
    fn transition(&self, state: &S, event: &ToolEvent, editor: &Editor)
        -> Option<Transition<S, I>>;

    /// Carry out the intent after the state changed. May return a refined
    /// state of the same variant, e.g. with the id of a point it created.
    fn on_transition(
        &self,
        _prev: &S,
        transition: Transition<S, I>,
        _event: &ToolEvent,
        _editor: &mut Editor,
    ) -> EditResult<S> {
        Ok(transition.next)
    }
}

/// The object-safe face of a tool, as seen by the tool manager
pub trait Tool {
    fn id(&self) -> ToolId;

    fn state_name(&self) -> &'static str;

    fn states(&self) -> &'static [&'static str];

    fn transitions(&self) -> &'static [TransitionRule];

    fn transition_log(&self) -> &[TransitionRecord];

    /// `idle -> ready`
    fn activate(&mut self, editor: &mut Editor);

    /// Back to `idle`, dropping any gesture in flight
    fn deactivate(&mut self, editor: &mut Editor);

    /// Returns whether some behavior took the event
    fn handle_event(&mut self, event: &ToolEvent, editor: &mut Editor) -> bool;
}

pub struct StateMachine<S, I> {
    tool: ToolId,
    state: S,
    initial: S,
    on_activate: fn(&Editor) -> S,
    states: &'static [&'static str],
    transitions: &'static [TransitionRule],
    behaviors: Vec<Box<dyn Behavior<S, I>>>,
    log: Vec<TransitionRecord>,
}

impl<S: ToolState, I> fmt::Debug for StateMachine<S, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("tool", &self.tool)
            .field("state", &self.state)
            .field(
                "behaviors",
                &self.behaviors.iter().map(|b| b.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<S: ToolState, I: fmt::Debug> StateMachine<S, I> {
    pub fn from_parts(
        tool: ToolId,
        initial: S,
        on_activate: fn(&Editor) -> S,
        states: &'static [&'static str],
        transitions: &'static [TransitionRule],
        behaviors: Vec<Box<dyn Behavior<S, I>>>,
    ) -> Self {
        Self {
            tool,
            state: initial.clone(),
            initial,
            on_activate,
            states,
            transitions,
            behaviors,
            log: Vec::new(),
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn initial(&self) -> &S {
        &self.initial
    }

    pub fn behavior_names(&self) -> Vec<&'static str> {
        self.behaviors.iter().map(|b| b.name()).collect()
    }

    pub fn is_declared(&self, from: &str, event: EventKind, to: &str) -> bool {
        self.transitions
            .iter()
            .any(|r| r.from == from && r.event == event && r.to == to)
    }

    fn record(&mut self, from: &'static str, event: EventKind, to: &'static str, by: &'static str) {
        if from == to {
            return;
        }
        debug!("{:?}: {} --{}--> {} ({})", self.tool, from, event, to, by);
        self.log.push(TransitionRecord {
            from,
            event,
            to,
            behavior: by,
        });
        if self.log.len() > TRANSITION_LOG_LIMIT {
            let excess = self.log.len() - TRANSITION_LOG_LIMIT;
            self.log.drain(..excess);
        }
    }

    /// Switch state outside of behavior dispatch (activation and reset)
    fn force(&mut self, next: S, event: EventKind) {
        let (from, to) = (self.state.name(), next.name());
        if from != to && !self.is_declared(from, event, to) {
            warn!(
                "{:?}: undeclared transition {} --{}--> {}",
                self.tool, from, event, to
            );
        }
        self.state = next;
        self.record(from, event, to, "tool");
    }
}

impl<S: ToolState, I: fmt::Debug> Tool for StateMachine<S, I> {
    fn id(&self) -> ToolId {
        self.tool
    }

    fn state_name(&self) -> &'static str {
        self.state.name()
    }

    fn states(&self) -> &'static [&'static str] {
        self.states
    }

    fn transitions(&self) -> &'static [TransitionRule] {
        self.transitions
    }

    fn transition_log(&self) -> &[TransitionRecord] {
        &self.log
    }

    fn activate(&mut self, editor: &mut Editor) {
        let next = (self.on_activate)(editor);
        self.force(next, EventKind::Activate);
    }

    fn deactivate(&mut self, editor: &mut Editor) {
        if editor.is_previewing() {
            if let Err(e) = editor.cancel_preview() {
                warn!("Cancelling preview on deactivate failed: {}", e);
            }
        }
        if editor.is_batching() {
            if let Err(e) = editor.cancel_batch() {
                warn!("Cancelling batch on deactivate failed: {}", e);
            }
        }
        editor.set_hovered(None);
        let initial = self.initial.clone();
        self.force(initial, EventKind::Deactivate);
    }

    fn handle_event(&mut self, event: &ToolEvent, editor: &mut Editor) -> bool {
        let kind = event.kind();
        let mut handled = None;

        for behavior in &self.behaviors {
            if !behavior.can_handle(&self.state, event) {
                continue;
            }
            let Some(transition) = behavior.transition(&self.state, event, editor) else {
                continue;
            };

            let from = self.state.name();
            let to = transition.next.name();
            if from != to
                && !self
                    .transitions
                    .iter()
                    .any(|r| r.from == from && r.event == kind && r.to == to)
            {
                warn!(
                    "{:?}: {} proposed undeclared transition {} --{}--> {}, ignored",
                    self.tool,
                    behavior.name(),
                    from,
                    kind,
                    to
                );
                return false;
            }

            if let Some(intent) = &transition.intent {
                debug!("{:?}: {} intent {:?}", self.tool, behavior.name(), intent);
            }
            let prev = std::mem::replace(&mut self.state, transition.next.clone());
            match behavior.on_transition(&prev, transition, event, editor) {
                Ok(refined) => {
                    if refined.name() != to {
                        warn!(
                            "{:?}: {} refined {} into {}",
                            self.tool,
                            behavior.name(),
                            to,
                            refined.name()
                        );
                    }
                    self.state = refined;
                }
                Err(e) => {
                    warn!("{:?}: {} failed: {}", self.tool, behavior.name(), e);
                    self.state = prev;
                    return true;
                }
            }
            handled = Some((from, behavior.name()));
            break;
        }

        let Some((from, by)) = handled else {
            return false;
        };
        let to = self.state.name();
        self.record(from, kind, to, by);
        true
    }
}
