use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

use tessera_engine::game::action::{apply, Action, Event, Outcome, RotationDirection};
use tessera_engine::game::setup::{build_state, load_default_setup, load_setup};
use tessera_engine::game::state::GameState;
use tessera_engine::rules::types::{FeatureAddress, Position};

#[derive(Parser)]
#[command(
    name = "tessera-engine",
    about = "Seeded self-play driver for the tile-placement rules engine"
)]
struct Cli {
    /// Path to a game setup TOML (default: auto-discover)
    #[arg(long, env = "TESSERA_SETUP")]
    setup: Option<PathBuf>,

    /// Seed for draw order and move choice (overrides the setup file)
    #[arg(long, env = "TESSERA_SEED")]
    seed: Option<u64>,

    /// Percent chance of claiming a feature after each placement
    #[arg(long, default_value = "40")]
    claim_chance: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    let mut setup = match &cli.setup {
        Some(path) => load_setup(path).map_err(|e| format!("Failed to load setup: {e}"))?,
        None => load_default_setup(),
    };
    if let Some(seed) = cli.seed {
        setup.seed = Some(seed);
    }
    let seed = setup.seed.unwrap_or(0);

    let mut state = build_state(&setup);
    let mut rng = StdRng::seed_from_u64(seed);
    tracing::info!(
        seed,
        pieces = state.draw_pile.len() + 1,
        players = state.players.len(),
        "game started"
    );

    while !state.game_over {
        state = play_turn(state, &mut rng, cli.claim_chance)?;
    }

    println!("Final scores:");
    let mut standings = state.players.clone();
    standings.sort_by(|a, b| b.score.cmp(&a.score));
    for player in &standings {
        println!("  {:<16} {:>4}", player.name, player.score);
    }
    Ok(())
}

/// One full turn of the random policy: orient the held piece, place it,
/// maybe claim a feature, end the turn.
fn play_turn(
    state: GameState,
    rng: &mut StdRng,
    claim_chance: u32,
) -> Result<GameState, Box<dyn std::error::Error>> {
    if state.held_unplayable {
        return step(state, &Action::DrawReplacement);
    }

    let mut state = state;

    // Try a random orientation first, then keep turning until an
    // orientation with legal placements comes around.
    for _ in 0..rng.gen_range(0..4u8) {
        state = step(
            state,
            &Action::RotateHeldPiece {
                direction: RotationDirection::Right,
            },
        )?;
    }
    let mut turns = 0;
    while state.legal_positions.is_empty() && turns < 4 {
        state = step(
            state,
            &Action::RotateHeldPiece {
                direction: RotationDirection::Right,
            },
        )?;
        turns += 1;
    }

    let mut options: Vec<Position> = state.legal_positions.iter().copied().collect();
    options.sort();
    if options.is_empty() {
        return Err("held piece has no legal placement in any orientation".into());
    }
    let target = options[rng.gen_range(0..options.len())];
    state = step(state, &Action::PlacePiece { position: target })?;

    if claim_chance > 0 && rng.gen_ratio(claim_chance.min(100), 100) {
        if let Some(address) = random_claim(&state, target, rng) {
            state = step(state, &Action::PlaceToken { address })?;
        }
    }

    step(state, &Action::EndTurn)
}

/// Pick one claimable feature address on the piece placed at `position`.
fn random_claim(state: &GameState, position: Position, rng: &mut StdRng) -> Option<FeatureAddress> {
    let piece = state.board.piece_at(position)?;

    let mut addresses: Vec<FeatureAddress> = Vec::new();
    for road in &piece.geometry.roads {
        if let Some(&side) = road.sides.first() {
            addresses.push(FeatureAddress::Edge(side));
        }
    }
    for town in &piece.geometry.towns {
        if let Some(&side) = town.sides.first() {
            addresses.push(FeatureAddress::Edge(side));
        }
    }
    for field in &piece.geometry.fields {
        if let Some(&half_edge) = field.halves.first() {
            addresses.push(FeatureAddress::HalfEdge(half_edge));
        }
    }

    if addresses.is_empty() {
        return None;
    }
    Some(addresses[rng.gen_range(0..addresses.len())])
}

/// Apply an action, logging its events. A rejection keeps the old state.
fn step(state: GameState, action: &Action) -> Result<GameState, Box<dyn std::error::Error>> {
    match apply(&state, action)? {
        Outcome::Applied { state, events } => {
            log_events(&events);
            Ok(state)
        }
        Outcome::Rejected => Ok(state),
    }
}

fn log_events(events: &[Event]) {
    for event in events {
        match event {
            Event::StructureScored {
                kind,
                winners,
                points,
                pieces,
            } => {
                tracing::info!(?kind, ?winners, points, pieces, "structure scored");
            }
            Event::PieceUnplayable { piece } => {
                tracing::info!(piece, "piece fits nowhere, will be replaced");
            }
            Event::GameEnded => tracing::info!("draw pile empty, game over"),
            other => tracing::debug!(?other, "event"),
        }
    }
}
