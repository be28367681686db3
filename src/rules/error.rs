//! Error types for rules-engine contract violations.
//!
//! Rejected player input is not an error: the action layer returns
//! `Outcome::Rejected` for that. These variants mark genuine contract
//! breaks that must abort the current call instead of producing partial
//! or wrong geometry.

use thiserror::Error;

use super::types::{HalfEdge, PlayerId, Position, Side, StructureKind};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RulesError {
    /// Rotation steps must be 1, 2 or 3; "no rotation" is expressed by not
    /// calling rotate at all.
    #[error("rotation step {0} out of range 1..=3")]
    InvalidRotation(u8),

    /// A structure resolution was started from a side that carries no
    /// feature of the requested kind.
    #[error("no {kind:?} touches side {side:?} of the piece at {position:?}")]
    NoStructureAtSide {
        position: Position,
        side: Side,
        kind: StructureKind,
    },

    /// A field resolution was started from a half-edge with no field on it.
    #[error("no field touches half-edge {half_edge:?} of the piece at {position:?}")]
    NoFieldAtHalfEdge {
        position: Position,
        half_edge: HalfEdge,
    },

    /// A traversal was asked to start from an empty coordinate.
    #[error("no piece placed at {0:?}")]
    VacantPosition(Position),

    /// Two placed pieces may never share a coordinate.
    #[error("position {0:?} is already occupied")]
    PositionOccupied(Position),

    /// A traversal crossed into a placed neighbor that lacks the matching
    /// feature on the shared edge — the board violates the compatibility
    /// invariant.
    #[error(
        "piece at {position:?} has no {kind:?} on side {side:?} reached from its neighbor"
    )]
    BrokenBoundary {
        position: Position,
        side: Side,
        kind: StructureKind,
    },

    /// A stored token references a feature address absent from its piece's
    /// current geometry.
    #[error("token {token} addresses a feature missing from the piece at {position:?}")]
    DanglingToken { token: u32, position: Position },

    /// An action referenced a player id not present in the roster.
    #[error("unknown player id {0:?}")]
    UnknownPlayer(PlayerId),
}
