//! Game setup: roster and draw-order configuration, loaded from TOML for
//! the CLI. The engine itself only ever sees the finished roster and a
//! fixed permutation of the catalogue expansion.

use std::path::Path;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Deserialize;

use crate::game::state::GameState;
use crate::rules::piece::Piece;
use crate::rules::scoring::TownPolicy;
use crate::rules::tiles::expand_catalogue;
use crate::rules::tokens::{Player, TokenColor};

#[derive(Debug, Deserialize, Clone)]
pub struct PlayerSetup {
    pub name: String,
    pub color: TokenColor,
}

/// Top-level TOML file structure.
#[derive(Debug, Deserialize, Clone)]
pub struct GameSetup {
    #[serde(default = "default_players")]
    pub players: Vec<PlayerSetup>,

    /// Seed for the draw-order shuffle. Identical seeds give identical
    /// games.
    pub seed: Option<u64>,

    /// Optional cap on the number of pieces in play (shorter games).
    pub piece_count: Option<usize>,

    #[serde(default = "default_tokens_per_player")]
    pub tokens_per_player: u8,

    #[serde(default)]
    pub town_policy: Option<TownPolicy>,
}

fn default_tokens_per_player() -> u8 {
    8
}

fn default_players() -> Vec<PlayerSetup> {
    vec![
        PlayerSetup {
            name: "Player 1".into(),
            color: TokenColor::Red,
        },
        PlayerSetup {
            name: "Player 2".into(),
            color: TokenColor::Blue,
        },
    ]
}

impl Default for GameSetup {
    fn default() -> Self {
        Self {
            players: default_players(),
            seed: None,
            piece_count: None,
            tokens_per_player: default_tokens_per_player(),
            town_policy: None,
        }
    }
}

/// Load a setup from a TOML file at the given path.
pub fn load_setup(path: &Path) -> Result<GameSetup, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    toml::from_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

/// Try well-known paths, falling back to the built-in default setup.
pub fn load_default_setup() -> GameSetup {
    let candidates = ["game_setup.toml", "../game_setup.toml"];
    for path in &candidates {
        let p = Path::new(path);
        if p.exists() {
            match load_setup(p) {
                Ok(setup) => {
                    tracing::info!(path = %p.display(), players = setup.players.len(), "loaded game setup");
                    return setup;
                }
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "failed to load game setup");
                }
            }
        }
    }
    tracing::info!("no game_setup.toml found, using built-in defaults");
    GameSetup::default()
}

/// The externally supplied draw permutation: the full catalogue expansion
/// shuffled with a seeded generator.
pub fn shuffled_draw_order(seed: u64) -> Vec<char> {
    let mut codes = expand_catalogue();
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    codes.shuffle(&mut rng);
    codes
}

/// Assemble the initial game state from a setup.
pub fn build_state(setup: &GameSetup) -> GameState {
    let mut codes = shuffled_draw_order(setup.seed.unwrap_or(0));
    if let Some(count) = setup.piece_count {
        if count < codes.len() {
            codes.truncate(count);
        }
    }

    let draw_pile: Vec<Piece> = codes
        .iter()
        .enumerate()
        .filter_map(|(i, &code)| Piece::from_code(i as u32, code))
        .collect();

    let players: Vec<Player> = setup
        .players
        .iter()
        .enumerate()
        .map(|(i, p)| Player {
            id: format!("p{i}"),
            name: p.name.clone(),
            color: p.color,
            score: 0,
            tokens_available: setup.tokens_per_player,
        })
        .collect();

    GameState::new(players, draw_pile, setup.town_policy.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_setup_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
seed = 7
piece_count = 20
tokens_per_player = 6

[[players]]
name = "Ada"
color = "green"

[[players]]
name = "Grace"
color = "black"

[town_policy]
points_per_piece = 1
points_per_shield = 2
"#
        )
        .unwrap();

        let setup = load_setup(file.path()).unwrap();
        assert_eq!(setup.seed, Some(7));
        assert_eq!(setup.piece_count, Some(20));
        assert_eq!(setup.players.len(), 2);
        assert_eq!(setup.players[0].name, "Ada");
        assert_eq!(setup.tokens_per_player, 6);
        assert_eq!(setup.town_policy.unwrap().points_per_piece, 1);
    }

    #[test]
    fn test_load_setup_missing_file() {
        let err = load_setup(Path::new("/definitely/not/here.toml"));
        assert!(err.is_err());
    }

    #[test]
    fn test_shuffle_is_deterministic_per_seed() {
        assert_eq!(shuffled_draw_order(42), shuffled_draw_order(42));
        assert_ne!(shuffled_draw_order(42), shuffled_draw_order(43));
        assert_eq!(shuffled_draw_order(42).len(), 72);
    }

    #[test]
    fn test_build_state_applies_setup() {
        let setup = GameSetup {
            seed: Some(11),
            piece_count: Some(10),
            tokens_per_player: 5,
            ..GameSetup::default()
        };
        let state = build_state(&setup);
        // one piece is already held
        assert_eq!(state.draw_pile.len(), 9);
        assert!(state.held_piece.is_some());
        assert_eq!(state.players.len(), 2);
        assert_eq!(state.players[0].id, "p0");
        assert_eq!(state.players[0].tokens_available, 5);
    }
}
