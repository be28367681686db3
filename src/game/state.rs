//! Full game state. One piece is held at a time; placed pieces never move;
//! derived fields (the legal-placement set) are recomputed from scratch,
//! never patched.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::rules::board::{Board, ANCHOR_POSITION};
use crate::rules::piece::Piece;
use crate::rules::scoring::TownPolicy;
use crate::rules::tokens::{Player, Token};
use crate::rules::types::{Position, TokenId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    /// Remaining pieces in draw order; the next draw comes off the back.
    /// The order is an externally supplied permutation of the catalogue
    /// expansion (see `game::setup`).
    pub draw_pile: Vec<Piece>,
    pub held_piece: Option<Piece>,
    /// Set when the held piece has no legal placement in any orientation.
    pub held_unplayable: bool,
    /// Where the current turn's piece was placed, if it has been.
    pub placed_this_turn: Option<Position>,
    pub tokens: Vec<Token>,
    pub players: Vec<Player>,
    pub current_player_index: usize,
    /// Legal coordinates for the held piece, recomputed after every
    /// rotation and every placement.
    pub legal_positions: HashSet<Position>,
    #[serde(default)]
    pub town_policy: TownPolicy,
    pub game_over: bool,
    /// Sequential counter for token identities.
    pub next_token_id: TokenId,
}

impl GameState {
    /// Start a game: the last piece of `draw_pile` becomes the held piece
    /// and may only go on the anchor coordinate.
    pub fn new(players: Vec<Player>, mut draw_pile: Vec<Piece>, town_policy: TownPolicy) -> Self {
        let held_piece = draw_pile.pop();
        let legal_positions = if held_piece.is_some() {
            HashSet::from([ANCHOR_POSITION])
        } else {
            HashSet::new()
        };
        let game_over = held_piece.is_none();

        Self {
            board: Board::new(),
            draw_pile,
            held_piece,
            held_unplayable: false,
            placed_this_turn: None,
            tokens: Vec::new(),
            players,
            current_player_index: 0,
            legal_positions,
            town_policy,
            game_over,
            next_token_id: 0,
        }
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player_index]
    }

    /// Immutable snapshot for the presentation layer.
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
