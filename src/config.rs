//! Runtime tunables for a game instance.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::{debug, warn};

use crate::constants::{self, behavior, collider, durations, movement, scoring};
use crate::systems::score::ScoringTable;

/// Everything a [`Game`](crate::game::Game) is constructed with.
///
/// The defaults mirror [`constants`]; tests and the binary override individual
/// fields with struct update syntax.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub tile_size: f32,
    pub player_radius: f32,
    pub player_speed: f32,
    pub ghost_half_size: f32,
    pub ghost_speed: f32,
    pub scared_speed_factor: f32,
    pub dot_radius: f32,
    pub pellet_radius: f32,
    pub wall_half_extent: f32,
    pub wall_separation_slop: f32,
    pub chase_radius: i32,
    pub ambush_radius: i32,
    pub patrol_radius: i32,
    pub recompute_interval: u32,
    pub power_duration: Duration,
    pub path_duration: Duration,
    pub respawn_delay: Duration,
    pub starting_lives: u8,
    pub starting_level: u32,
    pub scoring: ScoringTable,
    pub high_score_capacity: usize,
    /// Where the high-score table is persisted. `None` keeps it in memory only.
    pub high_score_path: Option<PathBuf>,
    /// Seed for the simulation RNG. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_size: constants::TILE_SIZE,
            player_radius: collider::PLAYER_RADIUS,
            player_speed: movement::PLAYER_SPEED,
            ghost_half_size: collider::GHOST_HALF_SIZE,
            ghost_speed: movement::GHOST_SPEED,
            scared_speed_factor: movement::SCARED_SPEED_FACTOR,
            dot_radius: collider::DOT_RADIUS,
            pellet_radius: collider::PELLET_RADIUS,
            wall_half_extent: collider::WALL_HALF_EXTENT,
            wall_separation_slop: constants::WALL_SEPARATION_SLOP,
            chase_radius: behavior::CHASE_RADIUS,
            ambush_radius: behavior::AMBUSH_RADIUS,
            patrol_radius: behavior::PATROL_RADIUS,
            recompute_interval: constants::PATH_RECOMPUTE_TICKS,
            power_duration: durations::POWER_PELLET,
            path_duration: durations::PATH_PELLET,
            respawn_delay: durations::GHOST_RESPAWN,
            starting_lives: constants::STARTING_LIVES,
            starting_level: 1,
            scoring: ScoringTable {
                dot: scoring::DOT,
                power_pellet: scoring::POWER_PELLET,
                path_pellet: scoring::PATH_PELLET,
                ghost_base: scoring::GHOST_BASE,
            },
            high_score_capacity: constants::high_scores::CAPACITY,
            high_score_path: None,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Builds the default configuration, then applies overrides from the environment.
    ///
    /// Recognized variables are `MAZE_CHASE_SEED`, `MAZE_CHASE_LIVES`,
    /// `MAZE_CHASE_LEVEL` and `MAZE_CHASE_SCORES` (a file path). Unparsable
    /// values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(seed) = parse_var::<u64>("MAZE_CHASE_SEED") {
            config.seed = Some(seed);
        }
        if let Some(lives) = parse_var::<u8>("MAZE_CHASE_LIVES") {
            config.starting_lives = lives.max(1);
        }
        if let Some(level) = parse_var::<u32>("MAZE_CHASE_LEVEL") {
            config.starting_level = level.clamp(1, constants::LEVEL_COUNT);
        }
        if let Ok(path) = env::var("MAZE_CHASE_SCORES") {
            config.high_score_path = Some(PathBuf::from(path));
        }

        debug!(?config, "Configuration loaded");
        config
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "Ignoring unparsable environment override");
            None
        }
    }
}
