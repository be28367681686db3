//! Criterion benchmarks for the placement-enumeration and structure-
//! resolution hot paths.
//!
//! Run with:
//!     cargo bench --bench legal_placements

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tessera_engine::game::action::{apply, Action, Outcome, RotationDirection};
use tessera_engine::game::setup::{build_state, GameSetup};
use tessera_engine::game::state::GameState;
use tessera_engine::rules::board::legal_placements;
use tessera_engine::rules::piece::Piece;
use tessera_engine::rules::structures::resolve_structure;
use tessera_engine::rules::tiles::TILE_CATALOGUE;
use tessera_engine::rules::types::{Position, StructureKind};

fn step(state: GameState, action: &Action) -> GameState {
    match apply(&state, action).expect("bench action errored") {
        Outcome::Applied { state, .. } => state,
        Outcome::Rejected => state,
    }
}

/// Play a random game to completion and return the final state.
fn grow_state(seed: u64, pieces: usize) -> GameState {
    let setup = GameSetup {
        seed: Some(seed),
        piece_count: Some(pieces),
        ..GameSetup::default()
    };
    let mut state = build_state(&setup);
    let mut rng = StdRng::seed_from_u64(seed);

    while !state.game_over {
        if state.held_unplayable {
            state = step(state, &Action::DrawReplacement);
            continue;
        }
        let mut turns = 0;
        while state.legal_positions.is_empty() && turns < 4 {
            state = step(
                state,
                &Action::RotateHeldPiece {
                    direction: RotationDirection::Right,
                },
            );
            turns += 1;
        }
        let mut options: Vec<Position> = state.legal_positions.iter().copied().collect();
        options.sort();
        let target = options[rng.gen_range(0..options.len())];
        state = step(state, &Action::PlacePiece { position: target });
        state = step(state, &Action::EndTurn);
    }
    state
}

fn bench_legal_placements(c: &mut Criterion) {
    let mut group = c.benchmark_group("legal_placements");

    for &pieces in &[12usize, 24, 48] {
        let state = grow_state(7, pieces);
        let candidates: Vec<Piece> = TILE_CATALOGUE
            .iter()
            .map(|def| Piece::from_definition(999, def))
            .collect();

        group.bench_with_input(
            BenchmarkId::new("all_tiles", state.board.len()),
            &state,
            |b, s| {
                b.iter(|| {
                    let mut total = 0usize;
                    for candidate in &candidates {
                        total += legal_placements(&s.board, candidate).len();
                    }
                    total
                });
            },
        );
    }

    group.finish();
}

fn bench_resolve_structure(c: &mut Criterion) {
    let state = grow_state(7, 48);
    let starts: Vec<(Position, _)> = state
        .board
        .pieces()
        .flat_map(|(&pos, piece)| {
            piece
                .geometry
                .roads
                .iter()
                .filter_map(move |r| r.sides.first().map(|&s| (pos, s)))
        })
        .collect();

    let mut group = c.benchmark_group("resolve_structure");
    group.bench_function("all_roads", |b| {
        b.iter(|| {
            let mut closed = 0usize;
            for &(pos, side) in &starts {
                let s = resolve_structure(&state.board, &state.tokens, pos, side, StructureKind::Road)
                    .expect("road resolution errored");
                if s.closed {
                    closed += 1;
                }
            }
            closed
        });
    });
    group.finish();
}

criterion_group!(benches, bench_legal_placements, bench_resolve_structure);
criterion_main!(benches);
