//! Board coordinates and rotations

use serde::{Deserialize, Serialize};
use std::fmt;

/// An intersection on the board. `(0, 0)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Whether the point lies on a `size`x`size` board
    pub fn in_bounds(&self, size: u32) -> bool {
        self.x < size && self.y < size
    }

    /// Row-major index on a board of the given size
    pub fn index(&self, size: u32) -> usize {
        self.y as usize * size as usize + self.x as usize
    }

    /// Rotate clockwise around the centre of a `size`x`size` board.
    ///
    /// Points that are already out of bounds are returned unchanged so the
    /// caller's range check still reports the original coordinate.
    pub fn rotate(&self, size: u32, rotation: Rotation) -> Point {
        if !self.in_bounds(size) {
            return *self;
        }
        let max = size - 1;
        match rotation {
            Rotation::None => *self,
            Rotation::Clockwise90 => Point::new(max - self.y, self.x),
            Rotation::Clockwise180 => Point::new(max - self.x, max - self.y),
            Rotation::Clockwise270 => Point::new(self.y, max - self.x),
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl From<(u32, u32)> for Point {
    fn from((x, y): (u32, u32)) -> Self {
        Point::new(x, y)
    }
}

/// Clockwise rotation applied to stones and marks at display time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    /// The rotation that undoes this one
    pub fn inverse(&self) -> Rotation {
        match self {
            Rotation::None => Rotation::None,
            Rotation::Clockwise90 => Rotation::Clockwise270,
            Rotation::Clockwise180 => Rotation::Clockwise180,
            Rotation::Clockwise270 => Rotation::Clockwise90,
        }
    }

    /// Parse a rotation from a number of degrees
    pub fn from_degrees(deg: u32) -> Option<Rotation> {
        match deg % 360 {
            0 => Some(Rotation::None),
            90 => Some(Rotation::Clockwise90),
            180 => Some(Rotation::Clockwise180),
            270 => Some(Rotation::Clockwise270),
            _ => None,
        }
    }
}

/// Iterate every point of a board in row-major order
pub fn all_points(size: u32) -> impl Iterator<Item = Point> {
    (0..size).flat_map(move |y| (0..size).map(move |x| Point::new(x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_quarter_turns() {
        let p = Point::new(2, 0);
        assert_eq!(p.rotate(9, Rotation::None), p);
        assert_eq!(p.rotate(9, Rotation::Clockwise90), Point::new(8, 2));
        assert_eq!(p.rotate(9, Rotation::Clockwise180), Point::new(6, 8));
        assert_eq!(p.rotate(9, Rotation::Clockwise270), Point::new(0, 6));
    }

    #[test]
    fn four_quarter_turns_are_identity() {
        for p in all_points(5) {
            let mut q = p;
            for _ in 0..4 {
                q = q.rotate(5, Rotation::Clockwise90);
            }
            assert_eq!(p, q);
        }
    }

    #[test]
    fn all_points_is_row_major() {
        let pts: Vec<_> = all_points(2).collect();
        assert_eq!(
            pts,
            vec![Point::new(0, 0), Point::new(1, 0), Point::new(0, 1), Point::new(1, 1)]
        );
        assert_eq!(Point::new(1, 1).index(2), 3);
    }

    #[test]
    fn index_does_not_overflow_u32() {
        let size = 70_000;
        let p = Point::new(size - 1, size - 1);
        assert_eq!(p.index(size), 4_899_999_999);
    }

    #[test]
    fn inverse_undoes_rotation() {
        let p = Point::new(1, 5);
        for r in [Rotation::None, Rotation::Clockwise90, Rotation::Clockwise180, Rotation::Clockwise270] {
            assert_eq!(p.rotate(9, r).rotate(9, r.inverse()), p);
        }
    }

    #[test]
    fn rotation_from_degrees() {
        assert_eq!(Rotation::from_degrees(270), Some(Rotation::Clockwise270));
        assert_eq!(Rotation::from_degrees(45), None);
    }
}
