//! Editing tools
//!
//! Every tool is a [`behavior::StateMachine`] driven by [`event::ToolEvent`]s
//! in design units. [`ToolManager`] owns them and routes events to the
//! active one.

pub mod behavior;
pub mod event;
pub mod hand;
pub mod pen;
pub mod select;
pub mod tool_state;

#[cfg(test)]
mod tests;

pub use behavior::{
    Behavior, StateMachine, Tool, ToolState, Transition, TransitionRecord, TransitionRule,
};
pub use event::{EventKind, Key, Modifiers, ToolEvent};
pub use hand::{HandState, HandTool};
pub use pen::{PenState, PenTool};
pub use select::{SelectState, SelectTool};
pub use tool_state::{ToolId, ToolManager};
