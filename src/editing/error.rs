//! Error types for the editing core

use crate::core::state::{ContourId, PointId};
use thiserror::Error;

/// Everything that can make an edit refuse to run
///
/// None of these are fatal: the document is left untouched and the caller
/// decides whether to surface anything.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("no active edit session")]
    NoSession,

    #[error("an edit session is already active for '{0}'")]
    SessionActive(String),

    #[error("no glyph named '{0}'")]
    UnknownGlyph(String),

    #[error("point {0:?} no longer exists")]
    StalePoint(PointId),

    #[error("contour {0:?} no longer exists")]
    StaleContour(ContourId),

    #[error("no active contour")]
    NoActiveContour,

    #[error("a batch is already open ('{0}')")]
    BatchAlreadyOpen(String),

    #[error("no batch is open")]
    NoOpenBatch,

    #[error("no preview session is active")]
    NoPreview,

    #[error("a preview session is already active")]
    PreviewActive,

    #[error("operation needs at least {needed} points, got {got}")]
    NotEnoughPoints { needed: usize, got: usize },

    #[error("command has not been executed yet")]
    NotExecuted,

    #[error("snapshot is for glyph '{found}', expected '{expected}'")]
    InvalidSnapshot { expected: String, found: String },
}

pub type EditResult<T> = Result<T, EditError>;
