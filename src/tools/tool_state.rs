//! Unified tool state management - single source of truth for active tool
//!
//! [`ToolManager`] owns one instance of every tool, knows which one is
//! active and routes events to it. Temporary tools (hold space to pan)
//! stack on top of the active one and pop back off when released.

use super::behavior::Tool;
use super::event::{Key, ToolEvent};
use super::hand::HandTool;
use super::pen::PenTool;
use super::select::SelectTool;
use crate::editing::Editor;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Tool identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolId {
    #[default]
    Select,
    Pen,
    Hand,
}

impl ToolId {
    pub const ALL: [ToolId; 3] = [ToolId::Select, ToolId::Pen, ToolId::Hand];

    /// Get the tool's display name
    pub fn name(&self) -> &'static str {
        match self {
            ToolId::Select => "Select",
            ToolId::Pen => "Pen",
            ToolId::Hand => "Hand",
        }
    }

    /// Convert from string ID (used in scripts and settings)
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "select" => Some(ToolId::Select),
            "pen" => Some(ToolId::Pen),
            "hand" => Some(ToolId::Hand),
            _ => None,
        }
    }

    /// Convert to string ID
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolId::Select => "select",
            ToolId::Pen => "pen",
            ToolId::Hand => "hand",
        }
    }
}

pub struct ToolManager {
    /// Currently active tool
    active: ToolId,

    /// Track if active tool changed since the host last looked
    active_changed: bool,

    /// Previous tool
    previous: Option<ToolId>,

    /// Stack for temporary tool modes (e.g., spacebar pan)
    temporary_stack: Vec<ToolId>,

    select: SelectTool,
    pen: PenTool,
    hand: HandTool,
}

impl std::fmt::Debug for ToolManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolManager")
            .field("active", &self.active)
            .field("state", &self.tool(self.active).state_name())
            .field("previous", &self.previous)
            .field("temporary_stack", &self.temporary_stack)
            .finish()
    }
}

impl ToolManager {
    /// Build every tool and activate the select tool
    pub fn new(editor: &mut Editor) -> Self {
        let mut manager = Self {
            active: ToolId::default(),
            active_changed: false,
            previous: None,
            temporary_stack: Vec::new(),
            select: SelectTool::new(),
            pen: PenTool::new(),
            hand: HandTool::new(),
        };
        manager.tool_mut(manager.active).activate(editor);
        manager
    }

    pub fn tool(&self, id: ToolId) -> &dyn Tool {
        match id {
            ToolId::Select => &self.select,
            ToolId::Pen => &self.pen,
            ToolId::Hand => &self.hand,
        }
    }

    fn tool_mut(&mut self, id: ToolId) -> &mut dyn Tool {
        match id {
            ToolId::Select => &mut self.select,
            ToolId::Pen => &mut self.pen,
            ToolId::Hand => &mut self.hand,
        }
    }

    pub fn select_tool(&self) -> &SelectTool {
        &self.select
    }

    pub fn pen_tool(&self) -> &PenTool {
        &self.pen
    }

    pub fn hand_tool(&self) -> &HandTool {
        &self.hand
    }

    pub fn active(&self) -> ToolId {
        self.active
    }

    /// State name of the active tool
    pub fn state_name(&self) -> &'static str {
        self.tool(self.active).state_name()
    }

    fn swap(&mut self, tool: ToolId, editor: &mut Editor) {
        self.tool_mut(self.active).deactivate(editor);
        self.active = tool;
        self.tool_mut(tool).activate(editor);
        self.active_changed = true;
    }

    /// Switch to a new tool
    pub fn activate(&mut self, tool: ToolId, editor: &mut Editor) {
        if self.active != tool {
            self.temporary_stack.clear();
            self.previous = Some(self.active);
            self.swap(tool, editor);
            info!("Tool switched: {:?} -> {:?}", self.previous, self.active);
        }
    }

    /// Push a temporary tool (like spacebar pan)
    pub fn push_temporary(&mut self, tool: ToolId, editor: &mut Editor) {
        self.temporary_stack.push(self.active);
        self.swap(tool, editor);
        debug!("Pushed temporary tool: {:?}", tool);
    }

    /// Pop temporary tool and return to previous
    pub fn pop_temporary(&mut self, editor: &mut Editor) -> bool {
        if let Some(previous) = self.temporary_stack.pop() {
            self.swap(previous, editor);
            debug!("Popped temporary tool, returned to: {:?}", previous);
            true
        } else {
            false
        }
    }

    pub fn is_temporary(&self) -> bool {
        !self.temporary_stack.is_empty()
    }

    /// Check if active tool changed since the last `clear_changed`
    pub fn just_changed(&self) -> bool {
        self.active_changed
    }

    pub fn clear_changed(&mut self) {
        self.active_changed = false;
    }

    /// Check if a specific tool is active
    pub fn is_active(&self, tool: ToolId) -> bool {
        self.active == tool
    }

    /// Get the previous tool
    pub fn previous(&self) -> Option<ToolId> {
        self.previous
    }

    /// Route an event to the active tool. Space held outside a gesture
    /// switches to the hand tool until it is released.
    pub fn handle_event(&mut self, event: &ToolEvent, editor: &mut Editor) -> bool {
        match event {
            ToolEvent::KeyDown {
                key: Key::Space, ..
            } if self.active != ToolId::Hand && !editor.is_batching() && !editor.is_previewing() => {
                self.push_temporary(ToolId::Hand, editor);
                true
            }
            ToolEvent::KeyUp {
                key: Key::Space, ..
            } if self.is_temporary() => self.pop_temporary(editor),
            _ => {
                let active = self.active;
                self.tool_mut(active).handle_event(event, editor)
            }
        }
    }
}
