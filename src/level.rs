//! The live state of one loaded level.

use std::time::Duration;

use glam::{IVec2, Vec2};
use rand::RngCore;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::entity::behavior::Behavior;
use crate::entity::ghost::{Ghost, GhostId};
use crate::entity::item::{Dot, Pellet, PelletKind, Wall};
use crate::error::{LevelError, PathError};
use crate::map::builder::{MapBuilder, Spawn};
use crate::map::graph::{Graph, NodeId};

/// The query and mutation surface the simulation systems use against a level,
/// independent of how the level was built.
pub trait LevelAccessor {
    fn dots(&self) -> &[Dot];
    fn walls(&self) -> &[Wall];
    fn ghosts(&self) -> &[Ghost];
    fn ghosts_mut(&mut self) -> &mut [Ghost];
    fn pellets(&self) -> &[Pellet];

    fn remove_dot(&mut self, index: usize) -> Dot;
    fn remove_pellet(&mut self, index: usize) -> Pellet;
    fn remove_ghost(&mut self, index: usize) -> Ghost;
    fn add_ghost(&mut self, ghost: Ghost);
    /// Re-inserts `ghost` into the live collection once `delay` has elapsed.
    fn schedule_respawn(&mut self, ghost: Ghost, delay: Duration);

    fn graph(&self) -> &Graph;
    fn tile_size(&self) -> f32;
    fn start_node(&self) -> NodeId;

    fn node_at(&self, grid: IVec2) -> Option<NodeId> {
        self.graph().node_at(grid)
    }

    fn node_at_pixel(&self, position: Vec2) -> Option<NodeId> {
        self.graph().node_at_pixel(position, self.tile_size())
    }

    fn start_position(&self) -> Vec2 {
        self.graph().pixel_center(self.start_node(), self.tile_size())
    }

    fn random_point(&self, rng: &mut dyn RngCore) -> Result<NodeId, PathError> {
        self.graph().random_point(rng)
    }

    /// A level is complete once every dot has been collected.
    fn is_complete(&self) -> bool {
        self.dots().is_empty()
    }
}

/// A level built from text, owning its graph and entity collections.
#[derive(Debug, Clone)]
pub struct Level {
    number: u32,
    graph: Graph,
    start: NodeId,
    tile_size: f32,
    walls: Vec<Wall>,
    dots: Vec<Dot>,
    pellets: Vec<Pellet>,
    ghosts: Vec<Ghost>,
    respawns: Vec<(Duration, Ghost)>,
}

impl Level {
    /// Builds a level from its text.
    ///
    /// # Errors
    ///
    /// Any parse or graph failure aborts the build; no partial level is returned.
    pub fn build(number: u32, text: &str, config: &GameConfig) -> Result<Self, LevelError> {
        let built = MapBuilder::build_text(text)?;
        let tile = config.tile_size;
        let graph = built.graph;

        let mut level = Self {
            number,
            start: built.start,
            tile_size: tile,
            walls: Vec::new(),
            dots: Vec::new(),
            pellets: Vec::new(),
            ghosts: Vec::new(),
            respawns: Vec::new(),
            graph,
        };

        let mut next_ghost: GhostId = 0;
        for (node, spawn) in built.spawns {
            let center = level.graph.pixel_center(node, tile);
            match spawn {
                Spawn::Wall => level.walls.push(Wall {
                    center,
                    half_extent: config.wall_half_extent,
                }),
                Spawn::Dot => level.dots.push(Dot {
                    center,
                    radius: config.dot_radius,
                }),
                Spawn::PowerPellet | Spawn::PathPellet => level.pellets.push(Pellet {
                    center,
                    radius: config.pellet_radius,
                    kind: if spawn == Spawn::PowerPellet {
                        PelletKind::Power
                    } else {
                        PelletKind::Path
                    },
                }),
                Spawn::Ghost(kind) => {
                    level.ghosts.push(Ghost::new(
                        next_ghost,
                        kind,
                        node,
                        &level.graph,
                        tile,
                        config.ghost_half_size,
                        config.ghost_speed,
                        Behavior::for_kind(kind, config),
                    ));
                    next_ghost += 1;
                }
            }
        }

        info!(
            level = number,
            walls = level.walls.len(),
            dots = level.dots.len(),
            pellets = level.pellets.len(),
            ghosts = level.ghosts.len(),
            "Level built"
        );
        Ok(level)
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Borrows the graph alongside the live ghosts, so ghosts can plan while moving.
    pub fn graph_and_ghosts_mut(&mut self) -> (&Graph, &mut [Ghost]) {
        (&self.graph, &mut self.ghosts)
    }

    /// Puts ghost `id` on a patrol over `waypoints`, with the configured
    /// patrol chase radius. A ghost waiting to respawn is switched too.
    ///
    /// Returns false when no ghost has that id.
    pub fn assign_patrol(&mut self, id: GhostId, waypoints: Vec<NodeId>, config: &GameConfig) -> bool {
        let ghost = self
            .ghosts
            .iter_mut()
            .chain(self.respawns.iter_mut().map(|(_, ghost)| ghost))
            .find(|ghost| ghost.id == id);

        match ghost {
            Some(ghost) => {
                debug!(ghost = id, waypoints = ?waypoints, "Ghost assigned a patrol");
                ghost.set_behavior(Behavior::patrol_with(waypoints, config));
                true
            }
            None => false,
        }
    }

    /// Number of eaten ghosts waiting to rejoin the level.
    pub fn pending_respawns(&self) -> usize {
        self.respawns.len()
    }

    /// Counts down every pending respawn, re-inserting the ghosts whose delay
    /// has run out. Returns the ids of the ghosts that rejoined.
    pub fn tick_respawns(&mut self, dt: Duration) -> Vec<GhostId> {
        let mut rejoined = Vec::new();
        let mut index = 0;
        while index < self.respawns.len() {
            let remaining = self.respawns[index].0.saturating_sub(dt);
            if remaining.is_zero() {
                let (_, ghost) = self.respawns.swap_remove(index);
                debug!(ghost = ghost.id, "Ghost rejoined the level");
                rejoined.push(ghost.id);
                self.ghosts.push(ghost);
            } else {
                self.respawns[index].0 = remaining;
                index += 1;
            }
        }
        rejoined
    }
}

impl LevelAccessor for Level {
    fn dots(&self) -> &[Dot] {
        &self.dots
    }

    fn walls(&self) -> &[Wall] {
        &self.walls
    }

    fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    fn ghosts_mut(&mut self) -> &mut [Ghost] {
        &mut self.ghosts
    }

    fn pellets(&self) -> &[Pellet] {
        &self.pellets
    }

    fn remove_dot(&mut self, index: usize) -> Dot {
        self.dots.remove(index)
    }

    fn remove_pellet(&mut self, index: usize) -> Pellet {
        self.pellets.remove(index)
    }

    fn remove_ghost(&mut self, index: usize) -> Ghost {
        self.ghosts.remove(index)
    }

    fn add_ghost(&mut self, ghost: Ghost) {
        self.ghosts.push(ghost);
    }

    fn schedule_respawn(&mut self, ghost: Ghost, delay: Duration) {
        debug!(ghost = ghost.id, delay_ms = delay.as_millis() as u64, "Ghost respawn scheduled");
        self.respawns.push((delay, ghost));
    }

    fn graph(&self) -> &Graph {
        &self.graph
    }

    fn tile_size(&self) -> f32 {
        self.tile_size
    }

    fn start_node(&self) -> NodeId {
        self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "#####\n#S.P#\n#H.G#\n#####";

    #[test]
    fn test_build_collections() {
        let level = Level::build(1, SMALL, &GameConfig::default()).unwrap();
        assert_eq!(level.walls().len(), 14);
        assert_eq!(level.dots().len(), 2);
        assert_eq!(level.pellets().len(), 2);
        assert_eq!(level.ghosts().len(), 1);
        assert_eq!(level.start_node(), 6);
        assert!(!level.is_complete());
    }

    #[test]
    fn test_respawn_waits_for_delay() {
        let mut level = Level::build(1, SMALL, &GameConfig::default()).unwrap();
        let ghost = level.remove_ghost(0);
        level.schedule_respawn(ghost, Duration::from_millis(100));

        assert!(level.tick_respawns(Duration::from_millis(60)).is_empty());
        assert_eq!(level.tick_respawns(Duration::from_millis(60)), vec![0]);
        assert_eq!(level.ghosts().len(), 1);
        assert_eq!(level.pending_respawns(), 0);
    }
}
