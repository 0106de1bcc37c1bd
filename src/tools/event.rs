//! Gesture input delivered to tools
//!
//! Positions are in design units. Drags carry the position where the press
//! started so behaviors can decide what the drag grabbed.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    /// Command on macOS, control elsewhere
    pub cmd: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        alt: false,
        cmd: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        alt: false,
        cmd: false,
    };

    pub const CMD: Modifiers = Modifiers {
        shift: false,
        alt: false,
        cmd: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Key {
    Escape,
    Enter,
    Delete,
    Backspace,
    Space,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Char(char),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ToolEvent {
    PointerMove {
        pos: Point,
    },
    PointerDown {
        pos: Point,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Drag {
        pos: Point,
        origin: Point,
        #[serde(default)]
        modifiers: Modifiers,
    },
    DragEnd {
        pos: Point,
        origin: Point,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerUp {
        pos: Point,
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyDown {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyUp {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
}

/// Event discriminant, used as the key of transition tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    /// The tool became the active tool
    Activate,
    /// Another tool took over
    Deactivate,
    PointerMove,
    PointerDown,
    Drag,
    DragEnd,
    PointerUp,
    KeyDown,
    KeyUp,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Activate => "activate",
            EventKind::Deactivate => "deactivate",
            EventKind::PointerMove => "pointerMove",
            EventKind::PointerDown => "pointerDown",
            EventKind::Drag => "drag",
            EventKind::DragEnd => "dragEnd",
            EventKind::PointerUp => "pointerUp",
            EventKind::KeyDown => "keyDown",
            EventKind::KeyUp => "keyUp",
        };
        f.write_str(name)
    }
}

impl ToolEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ToolEvent::PointerMove { .. } => EventKind::PointerMove,
            ToolEvent::PointerDown { .. } => EventKind::PointerDown,
            ToolEvent::Drag { .. } => EventKind::Drag,
            ToolEvent::DragEnd { .. } => EventKind::DragEnd,
            ToolEvent::PointerUp { .. } => EventKind::PointerUp,
            ToolEvent::KeyDown { .. } => EventKind::KeyDown,
            ToolEvent::KeyUp { .. } => EventKind::KeyUp,
        }
    }

    /// Pointer position, if the event has one
    pub fn pos(&self) -> Option<Point> {
        match self {
            ToolEvent::PointerMove { pos }
            | ToolEvent::PointerDown { pos, .. }
            | ToolEvent::Drag { pos, .. }
            | ToolEvent::DragEnd { pos, .. }
            | ToolEvent::PointerUp { pos, .. } => Some(*pos),
            ToolEvent::KeyDown { .. } | ToolEvent::KeyUp { .. } => None,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            ToolEvent::PointerMove { .. } => Modifiers::NONE,
            ToolEvent::PointerDown { modifiers, .. }
            | ToolEvent::Drag { modifiers, .. }
            | ToolEvent::DragEnd { modifiers, .. }
            | ToolEvent::PointerUp { modifiers, .. }
            | ToolEvent::KeyDown { modifiers, .. }
            | ToolEvent::KeyUp { modifiers, .. } => *modifiers,
        }
    }

    /// `Some(key)` for a key press
    pub fn key_down(&self) -> Option<Key> {
        match self {
            ToolEvent::KeyDown { key, .. } => Some(*key),
            _ => None,
        }
    }

    /// Whether the event finishes a press (drag end or release)
    pub fn is_release(&self) -> bool {
        matches!(self, ToolEvent::DragEnd { .. } | ToolEvent::PointerUp { .. })
    }
}
