//! Piece instances and the rotation engine.
//!
//! A piece's geometry is always expressed in absolute (post-rotation) side
//! numbers. `Piece::rotated` is the only code path that produces rotated
//! geometry; nothing else may touch the labels.

use serde::{Deserialize, Serialize};

use super::error::RulesError;
use super::tiles::{FieldSegment, RoadSegment, TileDefinition, TileGeometry, TownSegment, TILE_LOOKUP};
use super::types::{FeatureAddress, Half, HalfEdge, PieceId, Position, Side};

/// A placed or held instance of a catalogue tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub tile_code: char,
    /// Quarter turns applied so far, 0..=3.
    pub rotation: u8,
    pub geometry: TileGeometry,
    /// `None` until the piece joins the board.
    pub position: Option<Position>,
}

impl Piece {
    pub fn from_definition(id: PieceId, def: &TileDefinition) -> Self {
        Self {
            id,
            tile_code: def.code,
            rotation: 0,
            geometry: def.geometry.clone(),
            position: None,
        }
    }

    /// Look the tile code up in the catalogue.
    pub fn from_code(id: PieceId, code: char) -> Option<Self> {
        TILE_LOOKUP.get(&code).map(|def| Self::from_definition(id, def))
    }

    pub fn is_placed(&self) -> bool {
        self.position.is_some()
    }

    /// Return a copy rotated by `steps` clockwise quarter turns,
    /// `steps ∈ 1..=3`. Zero-step rotation is not expressible — callers
    /// that need "no rotation" skip the call.
    pub fn rotated(&self, steps: u8) -> Result<Piece, RulesError> {
        if !(1..=3).contains(&steps) {
            return Err(RulesError::InvalidRotation(steps));
        }

        let geometry = TileGeometry {
            roads: self
                .geometry
                .roads
                .iter()
                .map(|r| RoadSegment {
                    sides: r.sides.iter().map(|s| s.rotated(steps)).collect(),
                })
                .collect(),
            towns: self
                .geometry
                .towns
                .iter()
                .map(|t| TownSegment {
                    sides: t.sides.iter().map(|s| s.rotated(steps)).collect(),
                    shield: t.shield,
                })
                .collect(),
            fields: self
                .geometry
                .fields
                .iter()
                .map(|f| FieldSegment {
                    halves: f.halves.iter().map(|h| h.rotated(steps)).collect(),
                })
                .collect(),
        };

        Ok(Piece {
            id: self.id,
            tile_code: self.tile_code,
            rotation: (self.rotation + steps) % 4,
            geometry,
            position: self.position,
        })
    }

    // --- feature queries ---

    pub fn road_through(&self, side: Side) -> Option<&RoadSegment> {
        self.geometry.roads.iter().find(|r| r.sides.contains(&side))
    }

    pub fn town_through(&self, side: Side) -> Option<&TownSegment> {
        self.geometry.towns.iter().find(|t| t.sides.contains(&side))
    }

    pub fn field_at(&self, half_edge: HalfEdge) -> Option<&FieldSegment> {
        self.geometry
            .fields
            .iter()
            .find(|f| f.halves.contains(&half_edge))
    }

    pub fn has_road_on(&self, side: Side) -> bool {
        self.road_through(side).is_some()
    }

    pub fn has_town_on(&self, side: Side) -> bool {
        self.town_through(side).is_some()
    }

    /// The field half-edges this piece exposes on the given side.
    pub fn field_halves_on(&self, side: Side) -> Vec<Half> {
        let mut halves: Vec<Half> = self
            .geometry
            .fields
            .iter()
            .flat_map(|f| f.halves.iter())
            .filter(|he| he.side == side)
            .map(|he| he.half)
            .collect();
        halves.sort();
        halves.dedup();
        halves
    }

    /// Whether a feature address names a feature present on this piece's
    /// current geometry.
    pub fn feature_exists(&self, address: &FeatureAddress) -> bool {
        match address {
            FeatureAddress::Edge(side) => self.has_road_on(*side) || self.has_town_on(*side),
            FeatureAddress::HalfEdge(he) => self.field_at(*he).is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(code: char) -> Piece {
        Piece::from_code(0, code).unwrap()
    }

    #[test]
    fn test_rotation_step_bounds() {
        let p = piece('D');
        assert_eq!(p.rotated(0), Err(RulesError::InvalidRotation(0)));
        assert_eq!(p.rotated(4), Err(RulesError::InvalidRotation(4)));
        assert!(p.rotated(1).is_ok());
        assert!(p.rotated(3).is_ok());
    }

    #[test]
    fn test_rotation_moves_town() {
        // D: town on top. One clockwise step moves top → right.
        let p = piece('D').rotated(1).unwrap();
        assert_eq!(p.rotation, 1);
        assert!(p.has_town_on(Side::Right));
        assert!(!p.has_town_on(Side::Top));
        // its road (right-left) now runs bottom-top
        assert!(p.has_road_on(Side::Bottom));
        assert!(p.has_road_on(Side::Top));
    }

    #[test]
    fn test_rotation_round_trip() {
        for def in crate::rules::tiles::TILE_CATALOGUE.iter() {
            let original = Piece::from_definition(0, def);
            for steps in 1..=3u8 {
                let there = original.rotated(steps).unwrap();
                let back = there.rotated(4 - steps).unwrap();
                assert_eq!(back.geometry, original.geometry, "tile {}", def.code);
                assert_eq!(back.rotation, 0);
            }
        }
    }

    #[test]
    fn test_four_single_steps_restore_geometry() {
        let original = piece('V');
        let mut p = original.clone();
        for _ in 0..4 {
            p = p.rotated(1).unwrap();
        }
        assert_eq!(p.geometry, original.geometry);
        assert_eq!(p.rotation, 0);
    }

    #[test]
    fn test_field_halves_follow_rotation() {
        // U exposes both halves of left and right, one half each of
        // top and bottom, on each of its two fields.
        let p = piece('U');
        assert_eq!(p.field_halves_on(Side::Right).len(), 2);
        assert_eq!(p.field_halves_on(Side::Top).len(), 2);

        let rotated = p.rotated(1).unwrap();
        // road now runs left-right; bottom and top are full field edges
        assert!(rotated.has_road_on(Side::Left));
        assert!(rotated.has_road_on(Side::Right));
        assert_eq!(rotated.field_halves_on(Side::Bottom).len(), 2);
    }

    #[test]
    fn test_feature_exists() {
        let p = piece('D');
        assert!(p.feature_exists(&FeatureAddress::Edge(Side::Top))); // town
        assert!(p.feature_exists(&FeatureAddress::Edge(Side::Right))); // road
        assert!(!p.feature_exists(&FeatureAddress::Edge(Side::Bottom))); // plain field edge
        assert!(p.feature_exists(&FeatureAddress::HalfEdge(HalfEdge::new(
            Side::Bottom,
            Half::First
        ))));
    }
}
