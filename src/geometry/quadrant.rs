//! Quadrant system for bounding-box handles and alignment origins
//!
//! A 9-point grid (like a tic-tac-toe board) over a rectangle. Design space
//! is y-up, so `Top` sits on the rectangle's maximum y.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Nine positions in a 2D grid
///
/// ```text
/// TopLeft     Top     TopRight
/// Left        Center  Right
/// BottomLeft  Bottom  BottomRight
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Quadrant {
    #[default]
    Center,
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl Quadrant {
    /// The four corners, clockwise from top-left
    pub const CORNERS: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomRight,
        Quadrant::BottomLeft,
    ];

    /// The four edge midpoints, clockwise from top
    pub const EDGES: [Quadrant; 4] = [
        Quadrant::Top,
        Quadrant::Right,
        Quadrant::Bottom,
        Quadrant::Left,
    ];

    /// Horizontal position as -1 (left), 0 (center) or 1 (right)
    fn column(&self) -> i8 {
        match self {
            Quadrant::TopLeft | Quadrant::Left | Quadrant::BottomLeft => -1,
            Quadrant::Top | Quadrant::Center | Quadrant::Bottom => 0,
            Quadrant::TopRight | Quadrant::Right | Quadrant::BottomRight => 1,
        }
    }

    /// Vertical position as -1 (bottom), 0 (middle) or 1 (top)
    fn row(&self) -> i8 {
        match self {
            Quadrant::TopLeft | Quadrant::Top | Quadrant::TopRight => 1,
            Quadrant::Left | Quadrant::Center | Quadrant::Right => 0,
            Quadrant::BottomLeft | Quadrant::Bottom | Quadrant::BottomRight => -1,
        }
    }

    fn from_grid(column: i8, row: i8) -> Self {
        match (column, row) {
            (-1, 1) => Quadrant::TopLeft,
            (0, 1) => Quadrant::Top,
            (1, 1) => Quadrant::TopRight,
            (-1, 0) => Quadrant::Left,
            (1, 0) => Quadrant::Right,
            (-1, -1) => Quadrant::BottomLeft,
            (0, -1) => Quadrant::Bottom,
            (1, -1) => Quadrant::BottomRight,
            _ => Quadrant::Center,
        }
    }

    pub fn is_corner(&self) -> bool {
        self.column() != 0 && self.row() != 0
    }

    pub fn is_edge(&self) -> bool {
        (self.column() == 0) != (self.row() == 0)
    }

    /// The position mirrored through the center
    pub fn opposite(&self) -> Self {
        Self::from_grid(-self.column(), -self.row())
    }

    /// Whether dragging this handle changes the width / the height
    pub fn moves_x(&self) -> bool {
        self.column() != 0
    }

    pub fn moves_y(&self) -> bool {
        self.row() != 0
    }

    /// The grid position inside a design-space rectangle
    pub fn point_in_rect(&self, rect: Rect) -> Point {
        let center = rect.center();
        let x = match self.column() {
            -1 => rect.x0,
            1 => rect.x1,
            _ => center.x,
        };
        let y = match self.row() {
            -1 => rect.y0,
            1 => rect.y1,
            _ => center.y,
        };
        Point::new(x, y)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quadrant::Center => "center",
            Quadrant::TopLeft => "top-left",
            Quadrant::Top => "top",
            Quadrant::TopRight => "top-right",
            Quadrant::Right => "right",
            Quadrant::BottomRight => "bottom-right",
            Quadrant::Bottom => "bottom",
            Quadrant::BottomLeft => "bottom-left",
            Quadrant::Left => "left",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadrant_positioning() {
        let rect = Rect::new(10.0, 10.0, 100.0, 100.0);

        assert_eq!(Quadrant::BottomLeft.point_in_rect(rect), Point::new(10.0, 10.0));
        assert_eq!(Quadrant::Center.point_in_rect(rect), Point::new(55.0, 55.0));
        assert_eq!(Quadrant::TopRight.point_in_rect(rect), Point::new(100.0, 100.0));
        assert_eq!(Quadrant::Top.point_in_rect(rect), Point::new(55.0, 100.0));
    }

    #[test]
    fn opposites() {
        assert_eq!(Quadrant::TopLeft.opposite(), Quadrant::BottomRight);
        assert_eq!(Quadrant::Right.opposite(), Quadrant::Left);
        assert_eq!(Quadrant::Center.opposite(), Quadrant::Center);
    }

    #[test]
    fn corners_and_edges_partition_the_ring() {
        for q in Quadrant::CORNERS {
            assert!(q.is_corner() && !q.is_edge());
        }
        for q in Quadrant::EDGES {
            assert!(q.is_edge() && !q.is_corner());
        }
        assert!(!Quadrant::Center.is_corner() && !Quadrant::Center.is_edge());
    }
}
