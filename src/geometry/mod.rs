//! Geometric Primitives and Operations

pub mod curve;
pub mod quadrant;
pub mod segment;
pub mod utilities;

// Re-export commonly used items
pub use curve::{ClosestPoint, Curve};
pub use hit_test::{
    hit_test, hit_test_bounding_box, hit_test_glyph_point, hit_test_glyph_segments,
    hit_test_multiple, hit_test_point, BoundingBoxHit,
};
pub use quadrant::Quadrant;
pub use segment::{parse, Segment, SegmentId, SegmentKind};
pub use utilities::{axis_lock_position, calculate_final_position_with_constraints};
