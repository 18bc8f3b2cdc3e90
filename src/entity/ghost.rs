//! Ghost entity implementation.
//!
//! A ghost is composed of a pixel position, the path it is following and a
//! [`Behavior`] that picks where that path leads. Ghosts move cardinally
//! between adjacent node centers. Full path searches are throttled to one
//! every few ticks; in between, the ghost keeps consuming its last path.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use tracing::{debug, trace};

use crate::error::PathError;
use crate::map::direction::Direction;
use crate::map::graph::{Graph, NodeId};
use crate::map::parser::GhostKind;
use crate::map::pathfinding::PathFinder;

use super::behavior::Behavior;
use super::collision::{Bounds, Collider, Rect};

/// Stable identity of a ghost within a level. A respawned ghost keeps its id.
pub type GhostId = u32;

/// Everything a ghost reads from the world during one update.
#[derive(Debug, Clone, Copy)]
pub struct GhostContext<'a> {
    pub graph: &'a Graph,
    pub tile_size: f32,
    /// The node under the player.
    pub pacman: NodeId,
    pub scared: bool,
    /// Ticks between full path searches.
    pub recompute_interval: u32,
    pub scared_speed_factor: f32,
}

#[derive(Debug, Clone)]
pub struct Ghost {
    pub id: GhostId,
    pub kind: GhostKind,
    pub position: Vec2,
    pub half_size: f32,
    /// Pixels per second.
    pub speed: f32,
    behavior: Behavior,
    /// The planned route. The front is always the node the ghost last stood
    /// on; the second node, if any, is the one it is moving toward.
    path: VecDeque<NodeId>,
    destination: Option<NodeId>,
    ticks_since_plan: u32,
    direction: Option<Direction>,
}

impl Ghost {
    /// Creates a ghost standing on the center of `node` with no plan yet.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: GhostId,
        kind: GhostKind,
        node: NodeId,
        graph: &Graph,
        tile_size: f32,
        half_size: f32,
        speed: f32,
        behavior: Behavior,
    ) -> Self {
        Self {
            id,
            kind,
            position: graph.pixel_center(node, tile_size),
            half_size,
            speed,
            behavior,
            path: VecDeque::from([node]),
            destination: None,
            ticks_since_plan: 0,
            direction: None,
        }
    }

    /// The node the ghost last stood on.
    pub fn anchor(&self) -> NodeId {
        self.path[0]
    }

    /// The node the ghost is currently moving toward, if any.
    pub fn approaching(&self) -> Option<NodeId> {
        self.path.get(1).copied()
    }

    pub fn path(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.path.iter().copied()
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.destination
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    /// Swaps the targeting policy. The current plan is kept until the next replan.
    pub fn set_behavior(&mut self, behavior: Behavior) {
        self.behavior = behavior;
    }

    pub fn rect(&self) -> Rect {
        Rect::square(self.position, self.half_size)
    }

    /// Advances the ghost by `dt` seconds.
    ///
    /// Replans when no destination is set or every `recompute_interval` ticks,
    /// and picks a fresh random destination right away when the current path
    /// has nothing left to follow. Such a fallback does not move the next
    /// scheduled replan.
    pub fn update<R: Rng + ?Sized>(&mut self, ctx: &GhostContext<'_>, dt: f32, rng: &mut R) -> Result<(), PathError> {
        if self.approaching().is_none() {
            self.behavior.observe_arrival(self.anchor());
        }

        self.ticks_since_plan += 1;
        if self.destination.is_none() || self.ticks_since_plan >= ctx.recompute_interval {
            let current = self.approaching().unwrap_or(self.anchor());
            let destination = {
                let mut random_point = || ctx.graph.random_point(rng);
                self.behavior
                    .determine_destination(current, ctx.pacman, ctx.scared, ctx.graph, &mut random_point)?
            };
            self.plan_route(ctx.graph, destination);
            self.ticks_since_plan = 0;
        }

        if self.path.len() < 2 {
            let destination = ctx.graph.random_point(rng)?;
            self.plan_route(ctx.graph, destination);
        }

        let speed = if ctx.scared {
            self.speed * ctx.scared_speed_factor
        } else {
            self.speed
        };
        self.advance(ctx.graph, ctx.tile_size, speed * dt);
        Ok(())
    }

    /// Searches a path to `destination` and makes it the current plan.
    ///
    /// A ghost caught between two nodes keeps heading for the node it was
    /// approaching and searches from there, so it never cuts a corner.
    pub fn plan_route(&mut self, graph: &Graph, destination: NodeId) {
        let anchor = self.anchor();
        let start = self.approaching().unwrap_or(anchor);

        let mut path: VecDeque<NodeId> = PathFinder::new(graph).find_path(start, destination).into();
        if path.is_empty() {
            path.push_back(start);
        }
        if start != anchor {
            path.push_front(anchor);
        }

        trace!(ghost = self.id, from = start, to = destination, length = path.len(), "Ghost planned route");
        self.path = path;
        self.destination = Some(destination);
    }

    fn advance(&mut self, graph: &Graph, tile_size: f32, mut distance: f32) {
        while distance > 0.0 {
            let Some(target) = self.approaching() else {
                self.direction = None;
                return;
            };

            let anchor = self.anchor();
            self.direction = Direction::toward(graph.node(anchor).grid, graph.node(target).grid);

            let target_center = graph.pixel_center(target, tile_size);
            let remaining = self.position.distance(target_center);
            if remaining > distance {
                if let Some(direction) = self.direction {
                    self.position += direction.as_vec2() * distance;
                }
                return;
            }

            self.position = target_center;
            self.path.pop_front();
            self.behavior.observe_arrival(target);
            distance -= remaining;
        }
    }

    /// Builds the replacement for a ghost that was just eaten.
    ///
    /// The new ghost keeps the identity and behavior of the old one, stands on
    /// the center of the node the old one occupied and heads for a fresh
    /// random destination.
    pub fn respawned<R: Rng + ?Sized>(&self, graph: &Graph, tile_size: f32, rng: &mut R) -> Result<Ghost, PathError> {
        let node = graph.node_at_pixel(self.position, tile_size).unwrap_or(self.anchor());
        let mut ghost = Ghost::new(
            self.id,
            self.kind,
            node,
            graph,
            tile_size,
            self.half_size,
            self.speed,
            self.behavior.clone(),
        );
        let destination = graph.random_point(rng)?;
        ghost.plan_route(graph, destination);

        debug!(ghost = self.id, node, destination, "Ghost respawn prepared");
        Ok(ghost)
    }
}

impl Collider for Ghost {
    fn bounds(&self) -> Bounds {
        Bounds::Rect(self.rect())
    }
}
