//! The turn state machine: a closed action vocabulary applied by pure
//! transitions.
//!
//! Illegal player input is not an error — `apply` answers `Rejected` and
//! the caller keeps its state. `RulesError` is reserved for contract
//! violations, which abort the transition without partial state.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::rules::board::legal_placements;
use crate::rules::error::RulesError;
use crate::rules::scoring::{road_value, score_closed_structure};
use crate::rules::structures::{resolve_structure_with, Structure};
use crate::rules::tokens::{can_place_token, credit_players, return_tokens, Token};
use crate::rules::types::{
    FeatureAddress, PieceId, PlayerId, Position, Side, StructureKind, TokenId,
};

use super::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationDirection {
    Left,
    Right,
}

/// Everything a player can ask the engine to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum Action {
    PlacePiece { position: Position },
    RotateHeldPiece { direction: RotationDirection },
    PlaceToken { address: FeatureAddress },
    EndTurn,
    /// Swap out a held piece that fits nowhere in any orientation.
    DrawReplacement,
}

/// What happened during a transition, for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum Event {
    PiecePlaced {
        piece: PieceId,
        position: Position,
    },
    PieceRotated {
        piece: PieceId,
        rotation: u8,
    },
    TokenPlaced {
        token: TokenId,
        player: PlayerId,
        position: Position,
        address: FeatureAddress,
    },
    StructureScored {
        kind: StructureKind,
        winners: Vec<PlayerId>,
        points: u32,
        pieces: u32,
    },
    TokenReturned {
        token: TokenId,
        player: PlayerId,
    },
    PieceUnplayable {
        piece: PieceId,
    },
    PieceDiscarded {
        piece: PieceId,
    },
    TurnEnded {
        next_player: PlayerId,
    },
    GameEnded,
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Applied {
        state: GameState,
        events: Vec<Event>,
    },
    /// The action failed a legality check; the caller's state stands.
    Rejected,
}

/// Apply one action to the state, producing the next state or `Rejected`.
/// Never mutates its input.
pub fn apply(state: &GameState, action: &Action) -> Result<Outcome, RulesError> {
    if state.game_over {
        return Ok(reject(action));
    }
    match action {
        Action::PlacePiece { position } => place_piece(state, *position),
        Action::RotateHeldPiece { direction } => rotate_held_piece(state, *direction),
        Action::PlaceToken { address } => place_token(state, address),
        Action::EndTurn => end_turn(state),
        Action::DrawReplacement => draw_replacement(state),
    }
}

fn reject(action: &Action) -> Outcome {
    tracing::debug!(?action, "action rejected");
    Outcome::Rejected
}

fn place_piece(state: &GameState, position: Position) -> Result<Outcome, RulesError> {
    if state.held_piece.is_none() || !state.legal_positions.contains(&position) {
        return Ok(reject(&Action::PlacePiece { position }));
    }

    let mut next = state.clone();
    let Some(piece) = next.held_piece.take() else {
        return Ok(Outcome::Rejected);
    };
    let piece_id = piece.id;
    next.board.place(piece, position)?;
    next.legal_positions.clear();
    next.placed_this_turn = Some(position);
    next.held_unplayable = false;

    Ok(Outcome::Applied {
        state: next,
        events: vec![Event::PiecePlaced {
            piece: piece_id,
            position,
        }],
    })
}

fn rotate_held_piece(
    state: &GameState,
    direction: RotationDirection,
) -> Result<Outcome, RulesError> {
    let Some(held) = &state.held_piece else {
        return Ok(reject(&Action::RotateHeldPiece { direction }));
    };

    let steps = match direction {
        RotationDirection::Right => 1,
        RotationDirection::Left => 3,
    };
    let rotated = held.rotated(steps)?;

    let mut next = state.clone();
    next.legal_positions = legal_placements(&next.board, &rotated);
    let events = vec![Event::PieceRotated {
        piece: rotated.id,
        rotation: rotated.rotation,
    }];
    next.held_piece = Some(rotated);

    Ok(Outcome::Applied {
        state: next,
        events,
    })
}

fn place_token(state: &GameState, address: &FeatureAddress) -> Result<Outcome, RulesError> {
    let Some(position) = state.placed_this_turn else {
        return Ok(reject(&Action::PlaceToken { address: *address }));
    };
    let piece = state
        .board
        .piece_at(position)
        .ok_or(RulesError::VacantPosition(position))?;

    let player = state.current_player();
    if !can_place_token(piece, address, player) {
        return Ok(reject(&Action::PlaceToken { address: *address }));
    }

    let mut next = state.clone();
    let owner = player.id.clone();
    let token = Token {
        id: next.next_token_id,
        owner: owner.clone(),
        position,
        address: *address,
    };
    next.next_token_id += 1;
    next.tokens.push(token.clone());
    next.players[next.current_player_index].tokens_available -= 1;

    Ok(Outcome::Applied {
        state: next,
        events: vec![Event::TokenPlaced {
            token: token.id,
            player: owner,
            position,
            address: *address,
        }],
    })
}

fn end_turn(state: &GameState) -> Result<Outcome, RulesError> {
    // A turn ends only after the held piece went down.
    let Some(placed_pos) = state.placed_this_turn else {
        return Ok(reject(&Action::EndTurn));
    };
    if state.held_piece.is_some() {
        return Ok(reject(&Action::EndTurn));
    }

    let mut next = state.clone();
    let mut events = resolve_closures(&mut next, placed_pos)?;

    next.placed_this_turn = None;
    next.current_player_index = (next.current_player_index + 1) % next.players.len();
    events.push(Event::TurnEnded {
        next_player: next.current_player().id.clone(),
    });

    draw_next(&mut next, &mut events)?;

    Ok(Outcome::Applied {
        state: next,
        events,
    })
}

fn draw_replacement(state: &GameState) -> Result<Outcome, RulesError> {
    let Some(held) = &state.held_piece else {
        return Ok(reject(&Action::DrawReplacement));
    };
    if !state.held_unplayable {
        return Ok(reject(&Action::DrawReplacement));
    }

    let mut next = state.clone();
    let mut events = vec![Event::PieceDiscarded { piece: held.id }];
    next.held_piece = None;
    next.held_unplayable = false;
    draw_next(&mut next, &mut events)?;

    Ok(Outcome::Applied {
        state: next,
        events,
    })
}

/// Closure scan for the piece placed this turn. One visited set per
/// feature kind is threaded through every resolution of the pass, so a
/// loop that enters the placed piece through two segments is walked —
/// and scored — exactly once.
fn resolve_closures(next: &mut GameState, placed_pos: Position) -> Result<Vec<Event>, RulesError> {
    let piece = next
        .board
        .piece_at(placed_pos)
        .ok_or(RulesError::VacantPosition(placed_pos))?
        .clone();

    let mut events = Vec::new();

    let road_starts: Vec<Side> = piece
        .geometry
        .roads
        .iter()
        .filter_map(|r| r.sides.first().copied())
        .collect();
    let town_starts: Vec<Side> = piece
        .geometry
        .towns
        .iter()
        .filter_map(|t| t.sides.first().copied())
        .collect();

    let mut visited: HashSet<(Position, Side)> = HashSet::new();
    for side in road_starts {
        if visited.contains(&(placed_pos, side)) {
            continue;
        }
        let structure = resolve_structure_with(
            &next.board,
            &next.tokens,
            placed_pos,
            side,
            StructureKind::Road,
            &mut visited,
        )?;
        if !structure.closed || structure.tokens.is_empty() {
            continue;
        }
        let value = road_value(&structure, &next.board);
        score_structure(next, &mut events, StructureKind::Road, &structure, value)?;
    }

    let mut visited: HashSet<(Position, Side)> = HashSet::new();
    for side in town_starts {
        if visited.contains(&(placed_pos, side)) {
            continue;
        }
        let structure = resolve_structure_with(
            &next.board,
            &next.tokens,
            placed_pos,
            side,
            StructureKind::Town,
            &mut visited,
        )?;
        if !structure.closed || structure.tokens.is_empty() {
            continue;
        }
        let value = next.town_policy.value(&structure, &next.board);
        score_structure(next, &mut events, StructureKind::Town, &structure, value)?;
    }

    Ok(events)
}

fn score_structure(
    next: &mut GameState,
    events: &mut Vec<Event>,
    kind: StructureKind,
    structure: &Structure,
    value: u32,
) -> Result<(), RulesError> {
    let award = score_closed_structure(&structure.tokens, value);
    credit_players(&mut next.players, &award.winners, award.points)?;

    let pieces = structure.piece_count(&next.board) as u32;
    tracing::info!(
        ?kind,
        winners = ?award.winners,
        points = award.points,
        pieces,
        "structure closed and scored"
    );
    events.push(Event::StructureScored {
        kind,
        winners: award.winners,
        points: award.points,
        pieces,
    });

    let ids: Vec<TokenId> = structure.tokens.iter().map(|t| t.id).collect();
    for (token, player) in return_tokens(&mut next.tokens, &mut next.players, &ids)? {
        events.push(Event::TokenReturned { token, player });
    }
    Ok(())
}

/// Draw the next piece, trying all four orientations before flagging it
/// unplayable. An empty pile ends the game.
fn draw_next(next: &mut GameState, events: &mut Vec<Event>) -> Result<(), RulesError> {
    let Some(mut piece) = next.draw_pile.pop() else {
        next.game_over = true;
        next.held_piece = None;
        next.legal_positions.clear();
        events.push(Event::GameEnded);
        return Ok(());
    };

    let mut legal = legal_placements(&next.board, &piece);
    let mut rotations = 0;
    while legal.is_empty() && rotations < 3 {
        piece = piece.rotated(1)?;
        rotations += 1;
        legal = legal_placements(&next.board, &piece);
    }

    if legal.is_empty() {
        next.held_unplayable = true;
        next.legal_positions.clear();
        events.push(Event::PieceUnplayable { piece: piece.id });
    } else {
        next.held_unplayable = false;
        next.legal_positions = legal;
    }
    next.held_piece = Some(piece);
    Ok(())
}
