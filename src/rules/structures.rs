//! Structure resolution: walk a road/town/field across tile boundaries,
//! collect its tokens, and decide whether it is closed.
//!
//! The walk is an explicit worklist over (coordinate, side) pairs — or
//! (coordinate, half-edge) pairs for fields — with one visited set shared
//! across the whole traversal. Loops of tiles are cycles in this graph;
//! the visited set is what guarantees termination and keeps tokens from
//! being counted twice.

use std::collections::HashSet;

use serde::Serialize;

use super::board::Board;
use super::error::RulesError;
use super::tokens::Token;
use super::types::{HalfEdge, Position, Side, StructureKind};

/// The result of resolving one connected road or town.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Structure {
    pub kind: StructureKind,
    /// True iff every boundary edge of the feature abuts another placed
    /// piece.
    pub closed: bool,
    /// Every token claiming any edge of the feature.
    pub tokens: Vec<Token>,
    /// The boundary set: every (coordinate, side) the feature touches.
    /// Valuation deduplicates this by piece.
    pub sides: Vec<(Position, Side)>,
}

impl Structure {
    /// Distinct pieces spanned by the boundary set.
    pub fn piece_count(&self, board: &Board) -> usize {
        let ids: HashSet<u32> = self
            .sides
            .iter()
            .filter_map(|&(pos, _)| board.piece_at(pos))
            .map(|p| p.id)
            .collect();
        ids.len()
    }
}

/// Resolve the road or town reachable from `side` of the piece at `start`.
pub fn resolve_structure(
    board: &Board,
    tokens: &[Token],
    start: Position,
    side: Side,
    kind: StructureKind,
) -> Result<Structure, RulesError> {
    let mut visited = HashSet::new();
    resolve_structure_with(board, tokens, start, side, kind, &mut visited)
}

/// Worklist resolution with a caller-supplied visited set. The turn
/// pipeline threads one set through every resolution of a scoring pass so
/// that a loop entering the placed piece through two segments is walked
/// (and scored) once.
pub(crate) fn resolve_structure_with(
    board: &Board,
    tokens: &[Token],
    start: Position,
    side: Side,
    kind: StructureKind,
    visited: &mut HashSet<(Position, Side)>,
) -> Result<Structure, RulesError> {
    let start_piece = board
        .piece_at(start)
        .ok_or(RulesError::VacantPosition(start))?;
    let present = match kind {
        StructureKind::Road => start_piece.has_road_on(side),
        StructureKind::Town => start_piece.has_town_on(side),
    };
    if !present {
        return Err(RulesError::NoStructureAtSide {
            position: start,
            side,
            kind,
        });
    }

    let mut closed = true;
    let mut collected: Vec<Token> = Vec::new();
    let mut sides: Vec<(Position, Side)> = Vec::new();
    let mut stack: Vec<(Position, Side)> = vec![(start, side)];

    while let Some((pos, entry_side)) = stack.pop() {
        if visited.contains(&(pos, entry_side)) {
            continue;
        }
        let piece = board
            .piece_at(pos)
            .ok_or(RulesError::VacantPosition(pos))?;

        // The full geometric segment of the feature on this piece.
        let segment: Vec<Side> = match kind {
            StructureKind::Road => piece.road_through(entry_side).map(|r| r.sides.clone()),
            StructureKind::Town => piece.town_through(entry_side).map(|t| t.sides.clone()),
        }
        .ok_or(RulesError::BrokenBoundary {
            position: pos,
            side: entry_side,
            kind,
        })?;

        for seg_side in segment {
            if !visited.insert((pos, seg_side)) {
                continue;
            }
            sides.push((pos, seg_side));
            collected.extend(
                super::tokens::tokens_on_edge(tokens, pos, seg_side).cloned(),
            );

            let neighbor = pos.neighbor(seg_side);
            match board.piece_at(neighbor) {
                // Open boundary: the feature is not closed here, but the
                // rest of the segment is still walked for its tokens.
                None => closed = false,
                Some(_) => {
                    let opposite = seg_side.opposite();
                    if !visited.contains(&(neighbor, opposite)) {
                        stack.push((neighbor, opposite));
                    }
                }
            }
        }
    }

    Ok(Structure {
        kind,
        closed,
        tokens: collected,
        sides,
    })
}

/// Whether the field reachable from `half_edge` of the piece at `start` is
/// fully enclosed by placed pieces. Fields cross boundaries at half-edge
/// granularity: the crossing flips the half index.
pub fn is_field_enclosed(
    board: &Board,
    start: Position,
    half_edge: HalfEdge,
) -> Result<bool, RulesError> {
    let start_piece = board
        .piece_at(start)
        .ok_or(RulesError::VacantPosition(start))?;
    if start_piece.field_at(half_edge).is_none() {
        return Err(RulesError::NoFieldAtHalfEdge {
            position: start,
            half_edge,
        });
    }

    let mut enclosed = true;
    let mut visited: HashSet<(Position, HalfEdge)> = HashSet::new();
    let mut stack: Vec<(Position, HalfEdge)> = vec![(start, half_edge)];

    while let Some((pos, entry)) = stack.pop() {
        if visited.contains(&(pos, entry)) {
            continue;
        }
        let piece = board
            .piece_at(pos)
            .ok_or(RulesError::VacantPosition(pos))?;
        let segment = piece
            .field_at(entry)
            .ok_or(RulesError::NoFieldAtHalfEdge {
                position: pos,
                half_edge: entry,
            })?;

        for &he in &segment.halves {
            if !visited.insert((pos, he)) {
                continue;
            }
            let neighbor = pos.neighbor(he.side);
            match board.piece_at(neighbor) {
                None => enclosed = false,
                Some(_) => {
                    let across = he.across();
                    if !visited.contains(&(neighbor, across)) {
                        stack.push((neighbor, across));
                    }
                }
            }
        }
    }

    Ok(enclosed)
}
