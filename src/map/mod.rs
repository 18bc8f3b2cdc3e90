//! This module defines the level grid, its navigation graph and path search.

pub mod builder;
pub mod direction;
pub mod graph;
pub mod parser;
pub mod pathfinding;
