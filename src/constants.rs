//! This module contains all the constants used by the simulation.

use std::time::Duration;

/// Fixed simulation step, 60 ticks per second.
pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// The size of each grid cell, in pixels.
pub const TILE_SIZE: f32 = 24.0;

/// The smallest accepted level, in cells, on both axes.
pub const MIN_GRID_SIZE: usize = 3;

/// How many cells are sampled before a random-point search gives up.
pub const RANDOM_POINT_ATTEMPTS: u32 = 100;

/// Ghosts run a full path search only once every this many ticks.
pub const PATH_RECOMPUTE_TICKS: u32 = 30;

/// Number of lives the player starts a session with.
pub const STARTING_LIVES: u8 = 3;

/// Extra distance added when pushing the player out of a wall, so the pair
/// does not collide again on the next frame.
pub const WALL_SEPARATION_SLOP: f32 = 1.0;

/// Number of levels shipped as embedded assets.
pub const LEVEL_COUNT: u32 = 2;

pub mod durations {
    use std::time::Duration;

    /// How long ghosts stay scared after a power pellet.
    pub const POWER_PELLET: Duration = Duration::from_millis(10_000);
    /// How long the path overlay stays visible after a path pellet.
    pub const PATH_PELLET: Duration = Duration::from_millis(15_000);
    /// Delay before an eaten ghost rejoins the level.
    pub const GHOST_RESPAWN: Duration = Duration::from_millis(5_000);
}

pub mod movement {
    /// Player speed, in pixels per second.
    pub const PLAYER_SPEED: f32 = 120.0;
    /// Ghost speed, in pixels per second.
    pub const GHOST_SPEED: f32 = 96.0;
    /// Multiplier applied to ghost speed while they are scared.
    pub const SCARED_SPEED_FACTOR: f32 = 0.5;
}

pub mod collider {
    use super::TILE_SIZE;

    pub const PLAYER_RADIUS: f32 = TILE_SIZE * 0.4;
    pub const DOT_RADIUS: f32 = TILE_SIZE * 0.1;
    pub const PELLET_RADIUS: f32 = TILE_SIZE * 0.25;
    /// Half of the side of a ghost's bounding box.
    pub const GHOST_HALF_SIZE: f32 = TILE_SIZE * 0.4;
    /// Half of the side of a wall's bounding box.
    pub const WALL_HALF_EXTENT: f32 = TILE_SIZE * 0.5;
}

pub mod behavior {
    /// Manhattan distance, in cells, within which a chaser targets the player.
    pub const CHASE_RADIUS: i32 = 8;
    /// Manhattan distance, in cells, within which an ambusher cuts the player off.
    pub const AMBUSH_RADIUS: i32 = 6;
    /// Chase radius used by patrolling ghosts.
    pub const PATROL_RADIUS: i32 = 4;
}

pub mod scoring {
    pub const DOT: f64 = 0.5;
    pub const POWER_PELLET: f64 = 1.0;
    pub const PATH_PELLET: f64 = 1.0;
    /// Points for the first ghost of a streak, doubled for every following one.
    pub const GHOST_BASE: f64 = 1.0;
}

pub mod high_scores {
    /// Maximum number of entries kept in the table.
    pub const CAPACITY: usize = 10;
    /// Maximum number of characters in a name.
    pub const NAME_LENGTH: usize = 4;
}
