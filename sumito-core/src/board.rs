//! Hex board geometry with axial coordinates

use serde::{Deserialize, Serialize};

/// Board radius (distance from center to edge)
pub const BOARD_RADIUS: i8 = 4;

/// Number of valid cells on a radius-4 board
pub const CELL_COUNT: usize = 61;

/// Side length of the square grid the board is embedded in
pub(crate) const GRID: usize = (2 * BOARD_RADIUS as usize) + 1;

/// Total grid slots (valid cells plus the unused corners)
pub(crate) const GRID_SLOTS: usize = GRID * GRID;

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i8,
    pub r: i8,
}

impl Hex {
    pub const fn new(q: i8, r: i8) -> Self {
        Self { q, r }
    }

    /// Derived third axis
    pub const fn s(&self) -> i8 {
        -self.q - self.r
    }

    /// Check if this hex is on the board
    pub fn is_valid(&self) -> bool {
        self.q.abs() <= BOARD_RADIUS
            && self.r.abs() <= BOARD_RADIUS
            && self.s().abs() <= BOARD_RADIUS
    }

    /// Distance from center (0,0)
    pub fn distance_to_center(&self) -> i8 {
        (self.q.abs() + self.r.abs() + self.s().abs()) / 2
    }

    /// Distance between two hexes
    pub fn distance_to(&self, other: Hex) -> i8 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = ((self.q + self.r) - (other.q + other.r)).abs();
        (dq + dr + ds) / 2
    }

    /// Get neighbor in direction (0-5)
    pub fn neighbor(&self, direction: u8) -> Hex {
        let (dq, dr) = DIRECTIONS[direction as usize % 6];
        Hex::new(self.q + dq, self.r + dr)
    }

    pub fn add(&self, other: Hex) -> Hex {
        Hex::new(self.q + other.q, self.r + other.r)
    }

    pub fn sub(&self, other: Hex) -> Hex {
        Hex::new(self.q - other.q, self.r - other.r)
    }

    /// Linear index into the embedding grid. Caller must hold `is_valid`.
    pub(crate) fn index(&self) -> usize {
        (self.r + BOARD_RADIUS) as usize * GRID + (self.q + BOARD_RADIUS) as usize
    }
}

/// Direction vectors in axial coordinates (dq, dr)
/// Index: 0=N, 1=NE, 2=SE, 3=S, 4=SW, 5=NW
pub const DIRECTIONS: [(i8, i8); 6] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // NW
];

/// Direction pointing the opposite way
pub const fn opposite(direction: u8) -> u8 {
    (direction + 3) % 6
}

/// Iterate all valid cells in sorted (q, r) order
pub fn all_cells() -> impl Iterator<Item = Hex> {
    (-BOARD_RADIUS..=BOARD_RADIUS).flat_map(|q| {
        (-BOARD_RADIUS..=BOARD_RADIUS)
            .map(move |r| Hex::new(q, r))
            .filter(|h| h.is_valid())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_validity() {
        assert!(Hex::new(0, 0).is_valid());
        assert!(Hex::new(4, 0).is_valid());
        assert!(Hex::new(0, 4).is_valid());
        assert!(Hex::new(-4, 0).is_valid());
        assert!(!Hex::new(5, 0).is_valid());
        assert!(!Hex::new(3, 3).is_valid()); // s = -6 < -4
        assert!(!Hex::new(-4, -1).is_valid()); // s = 5 > 4
    }

    #[test]
    fn test_cell_count() {
        assert_eq!(all_cells().count(), CELL_COUNT);
    }

    #[test]
    fn test_distance() {
        assert_eq!(Hex::new(0, 0).distance_to_center(), 0);
        assert_eq!(Hex::new(1, 0).distance_to_center(), 1);
        assert_eq!(Hex::new(2, 2).distance_to_center(), 4);
        assert_eq!(Hex::new(0, 0).distance_to(Hex::new(0, 0)), 0);
    }

    #[test]
    fn test_distance_symmetric() {
        let a = Hex::new(-2, 3);
        let b = Hex::new(4, -1);
        assert_eq!(a.distance_to(b), b.distance_to(a));
    }

    #[test]
    fn test_triangle_inequality() {
        for a in all_cells() {
            for b in [Hex::new(0, 0), Hex::new(4, -4), Hex::new(-1, 3)] {
                for c in [Hex::new(2, 0), Hex::new(-4, 4)] {
                    assert!(a.distance_to(c) <= a.distance_to(b) + b.distance_to(c));
                }
            }
        }
    }

    #[test]
    fn test_neighbor_opposite_roundtrip() {
        let h = Hex::new(1, -2);
        for dir in 0..6u8 {
            assert_eq!(h.neighbor(dir).neighbor(opposite(dir)), h);
        }
    }

    #[test]
    fn test_index_unique() {
        let mut seen = std::collections::HashSet::new();
        for cell in all_cells() {
            assert!(cell.index() < GRID_SLOTS);
            assert!(seen.insert(cell.index()));
        }
    }
}
