//! Simulation core of a maze chase arcade game.
//!
//! The level graph and path search live in [`map`], entities in [`entity`],
//! the per-frame systems in [`systems`], the event bus in [`events`] and the
//! status state machine in [`game`].

pub mod app;
pub mod asset;
pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod events;
pub mod formatter;
pub mod game;
pub mod input;
pub mod level;
pub mod logging;
pub mod map;
pub mod scores;
pub mod systems;
