//! Geometry utility functions
//!
//! Position constraints shared by the pen and select tools.

use kurbo::Point;

/// Lock a position to horizontal or vertical axis relative to another point
/// (used when shift is held to constrain movement)
pub fn axis_lock_position(pos: Point, relative_to: Point) -> Point {
    let dxy = pos - relative_to;
    if dxy.x.abs() > dxy.y.abs() {
        Point::new(pos.x, relative_to.y)
    } else {
        Point::new(relative_to.x, pos.y)
    }
}

/// Round a position to the nearest multiple of `grid_size`
pub fn snap_to_grid(pos: Point, grid_size: f64) -> Point {
    if grid_size <= 0.0 {
        return pos;
    }
    Point::new(
        (pos.x / grid_size).round() * grid_size,
        (pos.y / grid_size).round() * grid_size,
    )
}

/// Apply grid snap and axis locking to a position
///
/// Grid snapping happens first so the locked axis keeps the exact
/// coordinate of `axis_lock`.
pub fn calculate_final_position_with_constraints(
    cursor_pos: Point,
    grid_size: Option<f64>,
    axis_lock: Option<Point>,
) -> Point {
    let snapped_pos = match grid_size {
        Some(size) => snap_to_grid(cursor_pos, size),
        None => cursor_pos,
    };

    match axis_lock {
        Some(relative_to) => axis_lock_position(snapped_pos, relative_to),
        None => snapped_pos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_lock_horizontal() {
        let pos = Point::new(100.0, 80.0);
        let relative_to = Point::new(50.0, 60.0);
        // X diff is 50, Y diff is 20, so should lock to horizontal (Y)
        assert_eq!(axis_lock_position(pos, relative_to), Point::new(100.0, 60.0));
    }

    #[test]
    fn test_axis_lock_vertical() {
        let pos = Point::new(60.0, 120.0);
        let relative_to = Point::new(50.0, 60.0);
        assert_eq!(axis_lock_position(pos, relative_to), Point::new(50.0, 120.0));
    }

    #[test]
    fn test_position_with_grid_snap() {
        let result =
            calculate_final_position_with_constraints(Point::new(123.4, 567.8), Some(10.0), None);
        assert_eq!(result, Point::new(120.0, 570.0));
    }

    #[test]
    fn test_zero_grid_is_ignored() {
        let pos = Point::new(1.25, 2.5);
        assert_eq!(snap_to_grid(pos, 0.0), pos);
    }

    #[test]
    fn test_position_with_axis_lock() {
        let result = calculate_final_position_with_constraints(
            Point::new(100.0, 80.0),
            None,
            Some(Point::new(50.0, 60.0)),
        );
        assert_eq!(result, Point::new(100.0, 60.0));
    }
}
