//! Scoring policy for closed structures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::board::Board;
use super::structures::Structure;
use super::tokens::Token;
use super::types::PlayerId;

/// Who scores a closed feature, and how much.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreAward {
    pub winners: Vec<PlayerId>,
    pub points: u32,
}

/// Decide the winners of a closed feature worth `value` points.
///
/// A lone token scores for its owner. With several tokens, every player
/// tied for the most tokens on the feature receives the full value — ties
/// split the reward, not the points. No tokens, no winners.
pub fn score_closed_structure(tokens: &[Token], value: u32) -> ScoreAward {
    if tokens.is_empty() {
        return ScoreAward {
            winners: Vec::new(),
            points: value,
        };
    }
    if tokens.len() == 1 {
        return ScoreAward {
            winners: vec![tokens[0].owner.clone()],
            points: value,
        };
    }

    let mut counts: HashMap<&PlayerId, usize> = HashMap::new();
    for token in tokens {
        *counts.entry(&token.owner).or_insert(0) += 1;
    }
    let max_count = counts.values().copied().max().unwrap_or(0);
    let mut winners: Vec<PlayerId> = counts
        .into_iter()
        .filter(|&(_, count)| count == max_count)
        .map(|(owner, _)| owner.clone())
        .collect();
    winners.sort();

    ScoreAward {
        winners,
        points: value,
    }
}

/// Road value: 2 points per distinct piece the road spans.
pub fn road_value(structure: &Structure, board: &Board) -> u32 {
    structure.piece_count(board) as u32 * 2
}

/// Town valuation is an extension point: the closure machinery is shared,
/// the value formula is configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TownPolicy {
    pub points_per_piece: u32,
    pub points_per_shield: u32,
}

impl Default for TownPolicy {
    fn default() -> Self {
        Self {
            points_per_piece: 2,
            points_per_shield: 2,
        }
    }
}

impl TownPolicy {
    pub fn value(&self, structure: &Structure, board: &Board) -> u32 {
        let pieces = structure.piece_count(board) as u32;

        // Count each traversed wall segment once: a segment is charged on
        // its first listed side only.
        let mut shields = 0u32;
        for &(pos, side) in &structure.sides {
            let Some(piece) = board.piece_at(pos) else {
                continue;
            };
            let Some(segment) = piece.town_through(side) else {
                continue;
            };
            if segment.shield && segment.sides.first() == Some(&side) {
                shields += 1;
            }
        }

        pieces * self.points_per_piece + shields * self.points_per_shield
    }
}
