//! Tokens (meeples) and player-pool bookkeeping.
//!
//! The engine updates these structures but does not create the roster —
//! players arrive configured from outside (see `game::setup`).

use serde::{Deserialize, Serialize};

use super::board::Board;
use super::error::RulesError;
use super::piece::Piece;
use super::types::{FeatureAddress, PlayerId, Position, Side, TokenId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenColor {
    Red,
    Yellow,
    Green,
    Blue,
    Black,
}

/// A player-owned marker claiming one feature instance on one piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub owner: PlayerId,
    pub position: Position,
    pub address: FeatureAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: TokenColor,
    pub score: u32,
    /// Tokens still in this player's pool.
    pub tokens_available: u8,
}

/// Whether `player` may put a token on `address` of `piece`: the pool must
/// be non-empty and the address must name a feature present on the piece's
/// current geometry.
pub fn can_place_token(piece: &Piece, address: &FeatureAddress, player: &Player) -> bool {
    player.tokens_available > 0 && piece.feature_exists(address)
}

/// Tokens sitting on a specific road/town edge.
pub fn tokens_on_edge<'a>(
    tokens: &'a [Token],
    position: Position,
    side: Side,
) -> impl Iterator<Item = &'a Token> {
    tokens
        .iter()
        .filter(move |t| t.position == position && t.address == FeatureAddress::Edge(side))
}

/// Remove the given tokens from the live set and hand each one back to its
/// owner's pool. Returns (token, owner) pairs for the event stream.
pub fn return_tokens(
    tokens: &mut Vec<Token>,
    players: &mut [Player],
    returned_ids: &[TokenId],
) -> Result<Vec<(TokenId, PlayerId)>, RulesError> {
    let mut returned = Vec::with_capacity(returned_ids.len());
    for &id in returned_ids {
        let Some(idx) = tokens.iter().position(|t| t.id == id) else {
            continue;
        };
        let token = tokens.remove(idx);
        let player = players
            .iter_mut()
            .find(|p| p.id == token.owner)
            .ok_or_else(|| RulesError::UnknownPlayer(token.owner.clone()))?;
        player.tokens_available += 1;
        returned.push((token.id, token.owner));
    }
    Ok(returned)
}

/// Audit the live token set against the board: every token must sit on a
/// placed piece and address a feature that piece actually has.
pub fn verify_addresses(board: &Board, tokens: &[Token]) -> Result<(), RulesError> {
    for token in tokens {
        let piece = board
            .piece_at(token.position)
            .ok_or(RulesError::VacantPosition(token.position))?;
        if !piece.feature_exists(&token.address) {
            return Err(RulesError::DanglingToken {
                token: token.id,
                position: token.position,
            });
        }
    }
    Ok(())
}

/// Credit the feature value to every winning player.
pub fn credit_players(
    players: &mut [Player],
    winners: &[PlayerId],
    points: u32,
) -> Result<(), RulesError> {
    for winner in winners {
        let player = players
            .iter_mut()
            .find(|p| p.id == *winner)
            .ok_or_else(|| RulesError::UnknownPlayer(winner.clone()))?;
        player.score += points;
    }
    Ok(())
}
