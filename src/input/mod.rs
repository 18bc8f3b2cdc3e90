//! Input sources. The headless build has no devices, only an autopilot.

use std::collections::HashSet;

use tracing::trace;

use crate::entity::player::Player;
use crate::input::commands::GameCommand;
use crate::level::LevelAccessor;
use crate::map::direction::Direction;
use crate::map::graph::NodeId;
use crate::map::pathfinding::PathFinder;

pub mod commands;

/// Steers the player toward the nearest remaining dot.
#[derive(Debug, Default, Clone)]
pub struct Autopilot {
    last: Option<Direction>,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decides the next move, or `None` when there is nothing new to request.
    pub fn command<L: LevelAccessor + ?Sized>(&mut self, player: &Player, level: &L) -> Option<GameCommand> {
        let current = level.node_at_pixel(player.position)?;
        let graph = level.graph();

        let dots: HashSet<NodeId> = level
            .dots()
            .iter()
            .filter_map(|dot| level.node_at_pixel(dot.center))
            .collect();
        let goals = if dots.is_empty() {
            level.pellets().iter().filter_map(|pellet| level.node_at_pixel(pellet.center)).collect()
        } else {
            dots
        };

        let path = PathFinder::new(graph).find_nearest(current, |node| goals.contains(&node));
        let next = *path.get(1)?;
        let direction = Direction::toward(graph.node(current).grid, graph.node(next).grid)?;

        if self.last == Some(direction) && player.direction() == Some(direction) {
            return None;
        }
        trace!(from = current, to = next, direction = direction.as_ref(), "Autopilot steering");
        self.last = Some(direction);
        Some(GameCommand::MovePlayer(direction))
    }
}
