//! Target selection policies for ghosts.

use strum_macros::IntoStaticStr;

use crate::config::GameConfig;
use crate::error::PathError;
use crate::map::graph::{Graph, NodeId};
use crate::map::parser::GhostKind;

/// Supplies a random passable node on demand.
pub type RandomPoint<'a> = dyn FnMut() -> Result<NodeId, PathError> + 'a;

/// The strategy a ghost uses to pick the node it heads for.
///
/// Every variant flees to a random node while ghosts are scared.
#[derive(Debug, Clone, PartialEq, Eq, IntoStaticStr)]
pub enum Behavior {
    /// Heads straight for the player once within `radius` cells, wanders otherwise.
    Chaser { radius: i32 },
    /// Heads for a cell next to the player once within `radius` cells.
    ///
    /// This approximates getting ahead of the player: the first passable
    /// neighbour in up/left/right/down order is used, not the cell the player
    /// is actually moving toward.
    Ambusher { radius: i32 },
    /// Walks a fixed loop of waypoints, chasing the player once within `radius` cells.
    ///
    /// `next` moves on through [`observe_arrival`](Self::observe_arrival).
    Patrol {
        waypoints: Vec<NodeId>,
        next: usize,
        radius: i32,
    },
}

impl Behavior {
    /// A chaser that never notices the player.
    pub fn random() -> Self {
        Behavior::Chaser { radius: 0 }
    }

    pub fn patrol(waypoints: Vec<NodeId>, radius: i32) -> Self {
        Behavior::Patrol {
            waypoints,
            next: 0,
            radius,
        }
    }

    /// A patrol over `waypoints` using the configured patrol chase radius.
    pub fn patrol_with(waypoints: Vec<NodeId>, config: &GameConfig) -> Self {
        Self::patrol(waypoints, config.patrol_radius)
    }

    /// The behavior a ghost of the given level-text kind starts with.
    pub fn for_kind(kind: GhostKind, config: &GameConfig) -> Self {
        match kind {
            GhostKind::Chaser => Behavior::Chaser {
                radius: config.chase_radius,
            },
            GhostKind::Ambusher => Behavior::Ambusher {
                radius: config.ambush_radius,
            },
            GhostKind::Random => Behavior::random(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Notes that the ghost has just reached `node`.
    ///
    /// A patrol moves on to its next waypoint when `node` is the current one.
    pub fn observe_arrival(&mut self, node: NodeId) {
        if let Behavior::Patrol { waypoints, next, .. } = self {
            if waypoints.get(*next) == Some(&node) {
                *next = (*next + 1) % waypoints.len();
            }
        }
    }

    /// Picks the next destination for a ghost standing on `current`.
    pub fn determine_destination(
        &mut self,
        current: NodeId,
        pacman: NodeId,
        scared: bool,
        graph: &Graph,
        random_point: &mut RandomPoint<'_>,
    ) -> Result<NodeId, PathError> {
        if scared {
            return random_point();
        }

        match self {
            Behavior::Chaser { radius } => chase(*radius, current, pacman, graph, random_point),
            Behavior::Ambusher { radius } => {
                if graph.manhattan(current, pacman) <= *radius {
                    Ok(graph.passable_neighbours(pacman).next().unwrap_or(pacman))
                } else {
                    random_point()
                }
            }
            Behavior::Patrol {
                waypoints,
                next,
                radius,
            } => {
                if waypoints.is_empty() {
                    return chase(*radius, current, pacman, graph, random_point);
                }
                if graph.manhattan(current, pacman) <= *radius {
                    return Ok(pacman);
                }
                Ok(waypoints[*next])
            }
        }
    }
}

fn chase(radius: i32, current: NodeId, pacman: NodeId, graph: &Graph, random_point: &mut RandomPoint<'_>) -> Result<NodeId, PathError> {
    if graph.manhattan(current, pacman) <= radius {
        Ok(pacman)
    } else {
        random_point()
    }
}
