//! Undo/redo history with batching
//!
//! The history is the only path by which commands reach the font engine.
//! Successful commands land on the past stack (or in the open batch);
//! failed commands leave no trace.

use super::commands::{Command, CommandContext, CommandResult, CompositeCommand, IdRemap};
use super::engine::FontEngine;
use super::error::{EditError, EditResult};
use tracing::{debug, warn};

/// Commands accumulated since `begin_batch`
#[derive(Debug)]
struct Batch {
    label: String,
    commands: Vec<Box<dyn Command>>,
}

/// Past/future stacks plus at most one open batch
#[derive(Default)]
pub struct CommandHistory {
    past: Vec<Box<dyn Command>>,
    future: Vec<Box<dyn Command>>,
    batch: Option<Batch>,
    remap: IdRemap,
    max_depth: Option<usize>,
    dirty: bool,
    on_dirty: Option<Box<dyn FnMut()>>,
}

impl std::fmt::Debug for CommandHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHistory")
            .field("past", &self.past.len())
            .field("future", &self.future.len())
            .field("batch", &self.batch.as_ref().map(|b| &b.label))
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `depth` undo steps; older ones are forgotten
    pub fn with_max_depth(depth: Option<usize>) -> Self {
        Self {
            max_depth: depth,
            ..Self::default()
        }
    }

    /// Called every time the document changes
    pub fn set_dirty_callback(&mut self, callback: impl FnMut() + 'static) {
        self.on_dirty = Some(Box::new(callback));
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        if let Some(callback) = self.on_dirty.as_mut() {
            callback();
        }
    }

    /// Run `command`, recording it on success
    pub fn execute(
        &mut self,
        engine: &mut dyn FontEngine,
        mut command: Box<dyn Command>,
    ) -> CommandResult {
        let result = {
            let mut ctx = CommandContext::new(engine, &mut self.remap);
            command.execute(&mut ctx)
        };

        if !result.success {
            warn!(
                "Command '{}' failed: {}",
                command.name(),
                result
                    .error
                    .as_ref()
                    .map(|e| e.to_string())
                    .unwrap_or_default()
            );
            return result;
        }

        debug!("Executed '{}'", command.name());
        // Batched commands only reach the past when the batch is sealed
        match self.batch.as_mut() {
            Some(batch) => batch.commands.push(command),
            None => {
                self.future.clear();
                self.push_past(command);
            }
        }
        self.mark_dirty();
        result
    }

    fn push_past(&mut self, command: Box<dyn Command>) {
        self.past.push(command);
        if let Some(max) = self.max_depth {
            if self.past.len() > max {
                let excess = self.past.len() - max;
                // Their remap entries stay; the table lives until `clear`
                self.past.drain(..excess);
            }
        }
    }

    /// Undo the most recent step. `None` when there is nothing to undo.
    pub fn undo(&mut self, engine: &mut dyn FontEngine) -> Option<CommandResult> {
        if let Some(batch) = &self.batch {
            warn!("Ignoring undo while batch '{}' is open", batch.label);
            return None;
        }
        let mut command = self.past.pop()?;
        let result = {
            let mut ctx = CommandContext::new(engine, &mut self.remap);
            command.undo(&mut ctx)
        };
        if result.success {
            debug!("Undid '{}'", command.name());
            self.future.push(command);
            self.mark_dirty();
        } else {
            warn!("Undo of '{}' failed", command.name());
            self.past.push(command);
        }
        Some(result)
    }

    /// Redo the most recently undone step. `None` when there is nothing to redo.
    pub fn redo(&mut self, engine: &mut dyn FontEngine) -> Option<CommandResult> {
        if let Some(batch) = &self.batch {
            warn!("Ignoring redo while batch '{}' is open", batch.label);
            return None;
        }
        let mut command = self.future.pop()?;
        let result = {
            let mut ctx = CommandContext::new(engine, &mut self.remap);
            command.redo(&mut ctx)
        };
        if result.success {
            debug!("Redid '{}'", command.name());
            self.push_past(command);
            self.mark_dirty();
        } else {
            warn!("Redo of '{}' failed", command.name());
            self.future.push(command);
        }
        Some(result)
    }

    /// Start collecting commands into one undo step
    pub fn begin_batch(&mut self, label: impl Into<String>) -> EditResult<()> {
        let label = label.into();
        if let Some(open) = &self.batch {
            warn!("begin_batch('{}') while '{}' is still open", label, open.label);
            return Err(EditError::BatchAlreadyOpen(open.label.clone()));
        }
        debug!("Batch '{}' opened", label);
        self.batch = Some(Batch {
            label,
            commands: Vec::new(),
        });
        Ok(())
    }

    /// Seal the open batch into a single history entry. Empty batches
    /// leave no entry.
    pub fn end_batch(&mut self) -> EditResult<()> {
        let batch = self.batch.take().ok_or(EditError::NoOpenBatch)?;
        if batch.commands.is_empty() {
            debug!("Batch '{}' closed empty", batch.label);
            return Ok(());
        }
        debug!(
            "Batch '{}' sealed with {} commands",
            batch.label,
            batch.commands.len()
        );
        self.future.clear();
        self.push_past(Box::new(CompositeCommand::new(batch.label, batch.commands)));
        Ok(())
    }

    /// Undo everything in the open batch, newest first, and forget it
    pub fn cancel_batch(&mut self, engine: &mut dyn FontEngine) -> EditResult<()> {
        let batch = self.batch.take().ok_or(EditError::NoOpenBatch)?;
        let count = batch.commands.len();
        {
            let mut ctx = CommandContext::new(engine, &mut self.remap);
            for mut command in batch.commands.into_iter().rev() {
                let result = command.undo(&mut ctx);
                if !result.success {
                    warn!("Cancel of '{}' could not undo '{}'", batch.label, command.name());
                }
            }
        }
        debug!("Batch '{}' cancelled ({} commands)", batch.label, count);
        if count > 0 {
            self.mark_dirty();
        }
        Ok(())
    }

    pub fn is_batching(&self) -> bool {
        self.batch.is_some()
    }

    pub fn batch_label(&self) -> Option<&str> {
        self.batch.as_ref().map(|b| b.label.as_str())
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.past.last().map(|c| c.name())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.future.last().map(|c| c.name())
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Labels of every undo step, oldest first
    pub fn labels(&self) -> Vec<&str> {
        self.past.iter().map(|c| c.name()).collect()
    }

    /// Old → new ids for the current edit session. Entries are never
    /// dropped one by one, only all at once by `clear`, which the editor
    /// calls whenever a session starts or ends.
    pub fn remap(&self) -> &IdRemap {
        &self.remap
    }

    /// Drop all history. An open batch is discarded without undoing it.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
        self.batch = None;
        self.remap.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{Glyph, PointType};
    use crate::editing::commands::{
        AddContourCommand, AddPointCommand, MovePointsCommand, RemovePointsCommand,
    };
    use crate::editing::engine::MemoryFontEngine;
    use std::cell::Cell;
    use std::rc::Rc;

    fn engine() -> MemoryFontEngine {
        let mut engine = MemoryFontEngine::new();
        engine.insert_glyph(Glyph::new("a", Some(0x61), 500.0));
        engine.start_edit_session(0x61).unwrap();
        engine
    }

    #[test]
    fn empty_stacks_are_noops() {
        let mut engine = engine();
        let mut history = CommandHistory::new();
        assert!(history.undo(&mut engine).is_none());
        assert!(history.redo(&mut engine).is_none());
    }

    #[test]
    fn execute_clears_future_and_fires_callback() {
        let mut engine = engine();
        let mut history = CommandHistory::new();
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        history.set_dirty_callback(move || counter.set(counter.get() + 1));

        history.execute(&mut engine, Box::new(AddContourCommand::new()));
        history.undo(&mut engine);
        assert!(history.can_redo());
        history.execute(&mut engine, Box::new(AddContourCommand::new()));
        assert!(!history.can_redo());
        assert_eq!(fired.get(), 3);
    }

    #[test]
    fn failed_command_is_not_recorded() {
        let mut engine = engine();
        let mut history = CommandHistory::new();
        let result = history.execute(
            &mut engine,
            Box::new(AddPointCommand::new(0.0, 0.0, PointType::OnCurve, false)),
        );
        assert!(!result.success);
        assert_eq!(result.error, Some(EditError::NoActiveContour));
        assert!(!history.can_undo());
        assert!(!history.is_dirty());
    }

    #[test]
    fn nested_batch_is_rejected() {
        let mut history = CommandHistory::new();
        history.begin_batch("outer").unwrap();
        assert_eq!(
            history.begin_batch("inner"),
            Err(EditError::BatchAlreadyOpen("outer".into()))
        );
        assert_eq!(history.batch_label(), Some("outer"));
    }

    #[test]
    fn end_without_batch_errors() {
        let mut history = CommandHistory::new();
        assert_eq!(history.end_batch(), Err(EditError::NoOpenBatch));
    }

    #[test]
    fn batch_undoes_as_one_step() {
        let mut engine = engine();
        let mut history = CommandHistory::new();
        let before = engine.snapshot().unwrap();

        history.begin_batch("Draw").unwrap();
        history.execute(&mut engine, Box::new(AddContourCommand::new()));
        let added = history.execute(
            &mut engine,
            Box::new(AddPointCommand::new(0.0, 0.0, PointType::OnCurve, false)),
        );
        history.execute(
            &mut engine,
            Box::new(MovePointsCommand::new(added.affected_point_ids, 5.0, 5.0)),
        );
        history.end_batch().unwrap();

        assert_eq!(history.labels(), vec!["Draw"]);
        let after = engine.snapshot().unwrap();

        history.undo(&mut engine).unwrap();
        assert!(engine.snapshot().unwrap().same_shape(&before));
        history.redo(&mut engine).unwrap();
        assert!(engine.snapshot().unwrap().same_shape(&after));
    }

    #[test]
    fn empty_batch_leaves_no_entry() {
        let mut history = CommandHistory::new();
        history.begin_batch("nothing").unwrap();
        history.end_batch().unwrap();
        assert!(!history.can_undo());
    }

    #[test]
    fn max_depth_drops_oldest() {
        let mut engine = engine();
        let mut history = CommandHistory::with_max_depth(Some(2));
        for _ in 0..4 {
            history.execute(&mut engine, Box::new(AddContourCommand::new()));
        }
        assert_eq!(history.past_len(), 2);
    }

    #[test]
    fn cancelled_batch_keeps_redo_stack() {
        let mut engine = engine();
        let mut history = CommandHistory::new();
        history.execute(&mut engine, Box::new(AddContourCommand::new()));
        history.undo(&mut engine).unwrap();
        assert!(history.can_redo());
        let before = engine.snapshot().unwrap();

        history.begin_batch("x").unwrap();
        history.execute(&mut engine, Box::new(AddContourCommand::new()));
        let added = history.execute(
            &mut engine,
            Box::new(AddPointCommand::new(0.0, 0.0, PointType::OnCurve, false)),
        );
        history.execute(
            &mut engine,
            Box::new(MovePointsCommand::new(added.affected_point_ids, 5.0, 5.0)),
        );
        history.cancel_batch(&mut engine).unwrap();

        assert!(engine.snapshot().unwrap().same_shape(&before));
        assert_eq!(history.past_len(), 0);
        assert_eq!(history.future_len(), 1);
        assert!(history.can_redo());
        assert!(!history.is_batching());
    }

    #[test]
    fn sealed_batch_clears_redo_stack() {
        let mut engine = engine();
        let mut history = CommandHistory::new();
        history.execute(&mut engine, Box::new(AddContourCommand::new()));
        history.undo(&mut engine).unwrap();

        history.begin_batch("Draw").unwrap();
        history.execute(&mut engine, Box::new(AddContourCommand::new()));
        // Still redoable until the batch lands
        assert!(history.can_redo());
        history.end_batch().unwrap();

        assert!(!history.can_redo());
        assert_eq!(history.labels(), vec!["Draw"]);
    }

    fn remove_and_restore(engine: &mut MemoryFontEngine, history: &mut CommandHistory) {
        history.execute(engine, Box::new(AddContourCommand::new()));
        let added = history.execute(
            engine,
            Box::new(AddPointCommand::new(0.0, 0.0, PointType::OnCurve, false)),
        );
        history.execute(
            engine,
            Box::new(RemovePointsCommand::new(added.affected_point_ids)),
        );
        history.undo(engine).unwrap();
    }

    #[test]
    fn clear_empties_remap() {
        let mut engine = engine();
        let mut history = CommandHistory::new();
        remove_and_restore(&mut engine, &mut history);
        assert!(!history.remap().is_empty());

        history.clear();
        assert!(history.remap().is_empty());
    }
}
