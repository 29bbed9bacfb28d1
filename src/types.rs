//! Core data types shared by the board and the solver.
//!
//! Coordinates are signed so that neighbors of edge cells can be expressed
//! directly; the board answers them with [`Look::OutOfBounds`].

use std::cmp::Ordering;
use std::fmt;

/// A cell position on the board.
///
/// Ordered row-major: first by `y`, then by `x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    #[inline(always)]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The up to eight cells surrounding this one, row-major.
    ///
    /// Cells outside the board are included; callers filter them through
    /// [`Board::look`](crate::board::Board::look).
    pub fn neighbors(self) -> impl Iterator<Item = Coordinate> {
        (-1..=1).flat_map(move |dy| {
            (-1..=1).filter_map(move |dx| {
                (dx != 0 || dy != 0).then(|| Coordinate::new(self.x + dx, self.y + dy))
            })
        })
    }
}

impl Ord for Coordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Coordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// What the board answers for a cell.
///
/// Every board operation is total: anything unusual comes back as one of
/// these outcomes rather than as an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Look {
    OutOfBounds,
    Marked,
    Unprobed,
    /// A probed mine.
    Boom,
    /// A probed safe cell and its number of adjacent mines.
    Count(u8),
}

impl Look {
    pub const OUT_OF_BOUNDS_CODE: i8 = -4;
    pub const MARKED_CODE: i8 = -3;
    pub const UNPROBED_CODE: i8 = -2;
    pub const BOOM_CODE: i8 = -1;

    /// The adjacent mine count, if this is a probed safe cell.
    #[inline(always)]
    pub fn count(self) -> Option<u8> {
        match self {
            Look::Count(n) => Some(n),
            _ => None,
        }
    }

    /// Flat integer code used for array interop: counts are `0..=8`,
    /// sentinels are negative.
    pub fn code(self) -> i8 {
        match self {
            Look::OutOfBounds => Self::OUT_OF_BOUNDS_CODE,
            Look::Marked => Self::MARKED_CODE,
            Look::Unprobed => Self::UNPROBED_CODE,
            Look::Boom => Self::BOOM_CODE,
            Look::Count(n) => n as i8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_row_major_order() {
        let a = Coordinate::new(5, 0);
        let b = Coordinate::new(0, 1);
        let c = Coordinate::new(1, 1);
        assert!(a < b);
        assert!(b < c);
        assert_eq!(a.cmp(&a), Ordering::Equal);
    }

    #[test]
    fn test_neighbors_interior_and_corner() {
        let interior: Vec<_> = Coordinate::new(2, 2).neighbors().collect();
        assert_eq!(interior.len(), 8);
        assert!(!interior.contains(&Coordinate::new(2, 2)));

        // Corner neighbors include out-of-board cells; the board filters them.
        let corner: Vec<_> = Coordinate::new(0, 0).neighbors().collect();
        assert_eq!(corner.len(), 8);
        assert!(corner.contains(&Coordinate::new(-1, -1)));
        assert!(corner.contains(&Coordinate::new(1, 1)));
    }

    #[test]
    fn test_neighbors_are_row_major() {
        let ns: Vec<_> = Coordinate::new(1, 1).neighbors().collect();
        let mut sorted = ns.clone();
        sorted.sort();
        assert_eq!(ns, sorted);
    }

    #[test]
    fn test_look_codes() {
        assert_eq!(Look::OutOfBounds.code(), -4);
        assert_eq!(Look::Marked.code(), -3);
        assert_eq!(Look::Unprobed.code(), -2);
        assert_eq!(Look::Boom.code(), -1);
        assert_eq!(Look::Count(7).code(), 7);
        assert_eq!(Look::Count(3).count(), Some(3));
        assert_eq!(Look::Marked.count(), None);
    }
}
