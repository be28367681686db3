//! Core geometry types: sides, half-edges, grid positions, feature addresses.

use serde::{Deserialize, Serialize};

pub type PlayerId = String;
pub type PieceId = u32;
pub type TokenId = u32;

/// One edge of a square tile. Canonical numbering: 1=bottom, 2=left,
/// 3=top, 4=right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Bottom,
    Left,
    Top,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Bottom, Side::Left, Side::Top, Side::Right];

    /// Canonical side number, 1..=4.
    #[inline]
    pub fn index(self) -> u8 {
        match self {
            Side::Bottom => 1,
            Side::Left => 2,
            Side::Top => 3,
            Side::Right => 4,
        }
    }

    pub fn from_index(n: u8) -> Option<Side> {
        match n {
            1 => Some(Side::Bottom),
            2 => Some(Side::Left),
            3 => Some(Side::Top),
            4 => Some(Side::Right),
            _ => None,
        }
    }

    /// The geometrically opposite side: 1↔3, 2↔4.
    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
        }
    }

    /// Remap this side by `steps` clockwise quarter turns:
    /// `((n + steps - 1) mod 4) + 1`. Single source of truth for rotation —
    /// every subsystem goes through here.
    #[inline]
    pub fn rotated(self, steps: u8) -> Side {
        // ALL is ordered by side number, so this is the same formula on
        // zero-based indices.
        Side::ALL[(self.index() as usize - 1 + steps as usize) % 4]
    }

    /// Grid offset to the neighbor across this side. The grid is
    /// screen-oriented: y grows toward the bottom.
    #[inline]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Side::Bottom => (0, 1),
            Side::Left => (-1, 0),
            Side::Top => (0, -1),
            Side::Right => (1, 0),
        }
    }
}

/// One of the two halves of a tile side. Halves are numbered clockwise
/// around the tile perimeter, so rotation preserves the half component and
/// crossing a tile boundary flips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Half {
    First,
    Second,
}

impl Half {
    /// Half number, 1 or 2.
    #[inline]
    pub fn index(self) -> u8 {
        match self {
            Half::First => 1,
            Half::Second => 2,
        }
    }

    /// The other half: `half % 2 + 1`.
    #[inline]
    pub fn flipped(self) -> Half {
        match self {
            Half::First => Half::Second,
            Half::Second => Half::First,
        }
    }
}

/// A half-edge: the unit of field geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HalfEdge {
    pub side: Side,
    pub half: Half,
}

impl HalfEdge {
    pub const fn new(side: Side, half: Half) -> Self {
        Self { side, half }
    }

    /// Rotation remaps the side; the half is invariant.
    #[inline]
    pub fn rotated(self, steps: u8) -> HalfEdge {
        HalfEdge {
            side: self.side.rotated(steps),
            half: self.half,
        }
    }

    /// The half-edge this one touches on the neighboring tile: opposite
    /// side, flipped half. Both the compatibility checker and the field
    /// resolver cross boundaries through this map.
    #[inline]
    pub fn across(self) -> HalfEdge {
        HalfEdge {
            side: self.side.opposite(),
            half: self.half.flipped(),
        }
    }
}

/// A grid coordinate. Sparse and signed; adjacency is the four orthogonal
/// neighbors only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn to_key(self) -> String {
        format!("{},{}", self.x, self.y)
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let (x, y) = key.split_once(',')?;
        Some(Self::new(x.parse().ok()?, y.parse().ok()?))
    }

    /// The coordinate across the given side.
    pub fn neighbor(self, side: Side) -> Self {
        let (dx, dy) = side.offset();
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Which feature on a piece a token claims: a full side for roads and
/// towns, a half-edge for fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureAddress {
    Edge(Side),
    HalfEdge(HalfEdge),
}

/// The two traversable structure kinds. Fields are resolved through their
/// own half-edge entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureKind {
    Road,
    Town,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opposites() {
        assert_eq!(Side::Bottom.opposite(), Side::Top);
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Top.opposite(), Side::Bottom);
        assert_eq!(Side::Right.opposite(), Side::Left);
    }

    #[test]
    fn test_side_rotation_formula() {
        // 1→2, 2→3, 3→4, 4→1 for a single clockwise step
        assert_eq!(Side::Bottom.rotated(1), Side::Left);
        assert_eq!(Side::Left.rotated(1), Side::Top);
        assert_eq!(Side::Top.rotated(1), Side::Right);
        assert_eq!(Side::Right.rotated(1), Side::Bottom);

        assert_eq!(Side::Bottom.rotated(2), Side::Top);
        assert_eq!(Side::Bottom.rotated(3), Side::Right);
    }

    #[test]
    fn test_neighbor_offsets() {
        let pos = Position::new(0, 0);
        assert_eq!(pos.neighbor(Side::Bottom), Position::new(0, 1));
        assert_eq!(pos.neighbor(Side::Left), Position::new(-1, 0));
        assert_eq!(pos.neighbor(Side::Top), Position::new(0, -1));
        assert_eq!(pos.neighbor(Side::Right), Position::new(1, 0));
    }

    #[test]
    fn test_position_key_roundtrip() {
        let pos = Position::new(3, -1);
        assert_eq!(pos.to_key(), "3,-1");
        assert_eq!(Position::from_key("3,-1"), Some(pos));
        assert_eq!(Position::from_key("nonsense"), None);
    }

    #[test]
    fn test_half_edge_across() {
        let he = HalfEdge::new(Side::Right, Half::First);
        assert_eq!(he.across(), HalfEdge::new(Side::Left, Half::Second));
        // crossing twice lands back on the original label
        assert_eq!(he.across().across(), he);
    }

    #[test]
    fn test_half_edge_rotation_keeps_half() {
        let he = HalfEdge::new(Side::Bottom, Half::Second);
        assert_eq!(he.rotated(1), HalfEdge::new(Side::Left, Half::Second));
    }

    #[test]
    fn test_neighbor_sides_are_opposite_consistent() {
        // walking out of a side and back through its opposite returns home
        let pos = Position::new(4, 7);
        for side in Side::ALL {
            assert_eq!(pos.neighbor(side).neighbor(side.opposite()), pos);
        }
    }
}
