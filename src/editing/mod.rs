//! Editing Functionality
//!
//! This module contains all editing-related functionality:
//! - The font engine seam and its in-memory implementation
//! - Reversible commands, batches and the undo/redo history
//! - Selection, preview sessions and coalesced redraw
//! - Smart edits that keep smooth curves smooth while points move
//! - Clipboard payloads and import adapters

pub mod clipboard;
pub mod commands;
pub mod editor;
pub mod engine;
pub mod error;
pub mod history;
pub mod preview;
pub mod redraw;
pub mod selection;
pub mod smart_edit;
pub mod smooth_curves;
pub mod viewport;

// Re-export commonly used items
pub use commands::{Command, CommandContext, CommandResult, IdRemap};
pub use editor::{Alignment, Axis, Editor, NudgeDirection, TransformOrigin};
pub use engine::{FontEngine, MemoryFontEngine};
pub use error::{EditError, EditResult};
pub use history::CommandHistory;
pub use preview::PreviewSession;
pub use redraw::RedrawScheduler;
pub use selection::Selection;
pub use viewport::Viewport;
