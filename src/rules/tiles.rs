//! Tile-shape catalogue: 24 tile types, 72 physical copies.
//!
//! The catalogue is input data for the engine — immutable for the lifetime
//! of a game. Geometry is expressed in absolute side numbers (roads, towns)
//! and half-edges (fields); a road side always leaves its two half-edges to
//! the surrounding fields.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::types::{Half, HalfEdge, Side};

use Side::{Bottom, Left, Right, Top};

/// A road segment touching one or two sides of its tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadSegment {
    pub sides: Vec<Side>,
}

/// A town wall segment spanning one or more sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TownSegment {
    pub sides: Vec<Side>,
    #[serde(default)]
    pub shield: bool,
}

/// A field region, addressed by the half-edges it occupies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSegment {
    pub halves: Vec<HalfEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGeometry {
    pub roads: Vec<RoadSegment>,
    pub towns: Vec<TownSegment>,
    pub fields: Vec<FieldSegment>,
}

/// A catalogue entry: type code, unrotated geometry, copies in the box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileDefinition {
    pub code: char,
    pub geometry: TileGeometry,
    pub count: u32,
}

// Half-edge shorthand. First/Second are clockwise within each side:
// bottom runs right→left, left runs bottom→top, top left→right,
// right top→bottom.
const B1: HalfEdge = HalfEdge::new(Side::Bottom, Half::First); // bottom, right half
const B2: HalfEdge = HalfEdge::new(Side::Bottom, Half::Second); // bottom, left half
const L1: HalfEdge = HalfEdge::new(Side::Left, Half::First); // left, bottom half
const L2: HalfEdge = HalfEdge::new(Side::Left, Half::Second); // left, top half
const T1: HalfEdge = HalfEdge::new(Side::Top, Half::First); // top, left half
const T2: HalfEdge = HalfEdge::new(Side::Top, Half::Second); // top, right half
const R1: HalfEdge = HalfEdge::new(Side::Right, Half::First); // right, top half
const R2: HalfEdge = HalfEdge::new(Side::Right, Half::Second); // right, bottom half

fn road(sides: &[Side]) -> RoadSegment {
    RoadSegment {
        sides: sides.to_vec(),
    }
}

fn town(sides: &[Side]) -> TownSegment {
    TownSegment {
        sides: sides.to_vec(),
        shield: false,
    }
}

fn shield_town(sides: &[Side]) -> TownSegment {
    TownSegment {
        shield: true,
        ..town(sides)
    }
}

fn field(halves: &[HalfEdge]) -> FieldSegment {
    FieldSegment {
        halves: halves.to_vec(),
    }
}

fn tile(code: char, count: u32, roads: Vec<RoadSegment>, towns: Vec<TownSegment>, fields: Vec<FieldSegment>) -> TileDefinition {
    TileDefinition {
        code,
        geometry: TileGeometry {
            roads,
            towns,
            fields,
        },
        count,
    }
}

pub static TILE_CATALOGUE: Lazy<Vec<TileDefinition>> = Lazy::new(|| {
    vec![
        // A: dead-end road at the bottom, fields wrapping around it (x2)
        tile(
            'A',
            2,
            vec![road(&[Bottom])],
            vec![],
            vec![field(&[T1, T2, R1, R2, L1, L2, B1, B2])],
        ),
        // B: open field on every edge (x4)
        tile(
            'B',
            4,
            vec![],
            vec![],
            vec![field(&[T1, T2, R1, R2, B1, B2, L1, L2])],
        ),
        // C: walled town on all four sides, shielded (x1)
        tile(
            'C',
            1,
            vec![],
            vec![shield_town(&[Bottom, Left, Top, Right])],
            vec![],
        ),
        // D: town top, straight road left-right (x4)
        tile(
            'D',
            4,
            vec![road(&[Right, Left])],
            vec![town(&[Top])],
            vec![field(&[R1, L2]), field(&[B1, B2, R2, L1])],
        ),
        // E: town top, field elsewhere (x5)
        tile(
            'E',
            5,
            vec![],
            vec![town(&[Top])],
            vec![field(&[R1, R2, B1, B2, L1, L2])],
        ),
        // F: shielded town spanning left-right (x2)
        tile(
            'F',
            2,
            vec![],
            vec![shield_town(&[Right, Left])],
            vec![field(&[T1, T2]), field(&[B1, B2])],
        ),
        // G: town spanning top-bottom (x1)
        tile(
            'G',
            1,
            vec![],
            vec![town(&[Top, Bottom])],
            vec![field(&[R1, R2]), field(&[L1, L2])],
        ),
        // H: two separate towns, top and bottom (x3)
        tile(
            'H',
            3,
            vec![],
            vec![town(&[Top]), town(&[Bottom])],
            vec![field(&[R1, R2]), field(&[L1, L2])],
        ),
        // I: two separate towns, top and left (x2)
        tile(
            'I',
            2,
            vec![],
            vec![town(&[Top]), town(&[Left])],
            vec![field(&[R1, R2, B1, B2])],
        ),
        // J: town top, road curving right-bottom (x3)
        tile(
            'J',
            3,
            vec![road(&[Right, Bottom])],
            vec![town(&[Top])],
            vec![field(&[L1, L2, R1, B2]), field(&[R2, B1])],
        ),
        // K: town top, road curving bottom-left (x3)
        tile(
            'K',
            3,
            vec![road(&[Bottom, Left])],
            vec![town(&[Top])],
            vec![field(&[R1, R2, B1, L2]), field(&[B2, L1])],
        ),
        // L: town top, three-way road junction (x3)
        tile(
            'L',
            3,
            vec![road(&[Right]), road(&[Bottom]), road(&[Left])],
            vec![town(&[Top])],
            vec![
                field(&[R1]),
                field(&[R2, B1]),
                field(&[B2, L1]),
                field(&[L2]),
            ],
        ),
        // M: shielded town spanning top-left (x2)
        tile(
            'M',
            2,
            vec![],
            vec![shield_town(&[Top, Left])],
            vec![field(&[R1, R2, B1, B2])],
        ),
        // N: town spanning top-left (x3)
        tile(
            'N',
            3,
            vec![],
            vec![town(&[Top, Left])],
            vec![field(&[R1, R2, B1, B2])],
        ),
        // O: shielded town top-left, road curving right-bottom (x2)
        tile(
            'O',
            2,
            vec![road(&[Right, Bottom])],
            vec![shield_town(&[Top, Left])],
            vec![field(&[R1, B2]), field(&[R2, B1])],
        ),
        // P: town top-left, road curving right-bottom (x3)
        tile(
            'P',
            3,
            vec![road(&[Right, Bottom])],
            vec![town(&[Top, Left])],
            vec![field(&[R1, B2]), field(&[R2, B1])],
        ),
        // Q: shielded town on three sides (x2)
        tile(
            'Q',
            2,
            vec![],
            vec![shield_town(&[Top, Right, Left])],
            vec![field(&[B1, B2])],
        ),
        // R: shielded three-sided town, dead-end road bottom (x2)
        tile(
            'R',
            2,
            vec![road(&[Bottom])],
            vec![shield_town(&[Top, Right, Left])],
            vec![field(&[B2]), field(&[B1])],
        ),
        // S: town on three sides (x2)
        tile(
            'S',
            2,
            vec![],
            vec![town(&[Top, Right, Left])],
            vec![field(&[B1, B2])],
        ),
        // T: three-sided town, dead-end road bottom (x1)
        tile(
            'T',
            1,
            vec![road(&[Bottom])],
            vec![town(&[Top, Right, Left])],
            vec![field(&[B2]), field(&[B1])],
        ),
        // U: straight road top-bottom (x8)
        tile(
            'U',
            8,
            vec![road(&[Top, Bottom])],
            vec![],
            vec![field(&[R1, R2, T2, B1]), field(&[L1, L2, T1, B2])],
        ),
        // V: road curving bottom-left (x9)
        tile(
            'V',
            9,
            vec![road(&[Bottom, Left])],
            vec![],
            vec![field(&[T1, T2, R1, R2, B1, L2]), field(&[B2, L1])],
        ),
        // W: three-way road junction, no town (x4)
        tile(
            'W',
            4,
            vec![road(&[Top]), road(&[Bottom]), road(&[Left])],
            vec![],
            vec![
                field(&[R1, R2, T2, B1]),
                field(&[T1, L2]),
                field(&[B2, L1]),
            ],
        ),
        // X: four-way crossroads (x1)
        tile(
            'X',
            1,
            vec![
                road(&[Top]),
                road(&[Right]),
                road(&[Bottom]),
                road(&[Left]),
            ],
            vec![],
            vec![
                field(&[T2, R1]),
                field(&[R2, B1]),
                field(&[B2, L1]),
                field(&[L2, T1]),
            ],
        ),
    ]
});

pub static TILE_LOOKUP: Lazy<HashMap<char, &'static TileDefinition>> =
    Lazy::new(|| TILE_CATALOGUE.iter().map(|t| (t.code, t)).collect());

/// Expand the catalogue into one code per physical copy, in catalogue
/// order. The draw order for a game is an externally supplied permutation
/// of this expansion.
pub fn expand_catalogue() -> Vec<char> {
    let mut codes = Vec::with_capacity(catalogue_total() as usize);
    for def in TILE_CATALOGUE.iter() {
        for _ in 0..def.count {
            codes.push(def.code);
        }
    }
    codes
}

/// Total number of physical tiles.
pub fn catalogue_total() -> u32 {
    TILE_CATALOGUE.iter().map(|t| t.count).sum()
}
