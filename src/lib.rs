//! Bezy contour editing engine
//!
//! Segment geometry, hit-testing, undoable commands, smart edits and the
//! pen, select and hand tools that drive them.
pub mod core;
pub mod data;
pub mod editing;
pub mod geometry;
pub mod logging;
pub mod tools;
