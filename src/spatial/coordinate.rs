//! Integer grid coordinates with an optional weight

use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Integer position on the grid, optionally carrying a weight
///
/// Arithmetic is component-wise on `x` and `y`; the weight of the left
/// operand is carried through. Equality ignores the weight.
#[derive(Debug, Clone, Copy, Default)]
pub struct Coordinate {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
    /// Optional height contribution
    pub weight: Option<i32>,
}

impl Coordinate {
    /// Create an unweighted coordinate
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y, weight: None }
    }

    /// Create a weighted coordinate
    pub const fn weighted(x: i32, y: i32, weight: i32) -> Self {
        Self {
            x,
            y,
            weight: Some(weight),
        }
    }

    /// Position as an array, the form used by error reports
    pub const fn to_array(self) -> [i32; 2] {
        [self.x, self.y]
    }

    /// Integer-truncated midpoint between two coordinates
    pub const fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2, (self.y + other.y) / 2)
    }

    /// Orthogonal neighbours in scan order: north, west, east, south
    pub const fn orthogonal_neighbors(self) -> [Self; 4] {
        [
            Self::new(self.x, self.y - 1),
            Self::new(self.x - 1, self.y),
            Self::new(self.x + 1, self.y),
            Self::new(self.x, self.y + 1),
        ]
    }

    /// True when the coordinate lies in `[0, size)` on both axes
    pub const fn in_bounds(self, size: usize) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as usize) < size && (self.y as usize) < size
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Coordinate {}

impl Add for Coordinate {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            weight: self.weight,
        }
    }
}

impl Sub for Coordinate {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            weight: self.weight,
        }
    }
}

impl Mul<i32> for Coordinate {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
            weight: self.weight,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}
