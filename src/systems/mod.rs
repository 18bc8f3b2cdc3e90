//! Per-frame systems that act on the level and the player.

pub mod collision;
pub mod profiling;
pub mod score;
