//! The player-controlled avatar.
//!
//! The player moves freely in pixel space along its facing direction. Walls are
//! not consulted here: the collision pass pushes the player back out of any
//! wall it overlaps after movement.

use glam::Vec2;
use tracing::trace;

use crate::map::direction::Direction;
use crate::map::graph::Graph;

use super::collision::{Bounds, Collider, Rect};

#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec2,
    pub radius: f32,
    /// Pixels per second.
    pub speed: f32,
    pub lives: u8,
    direction: Option<Direction>,
    /// A turn requested by input, applied as soon as it becomes possible.
    next_direction: Option<Direction>,
}

impl Player {
    pub fn new(position: Vec2, radius: f32, speed: f32, lives: u8) -> Self {
        Self {
            position,
            radius,
            speed,
            lives,
            direction: None,
            next_direction: None,
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn next_direction(&self) -> Option<Direction> {
        self.next_direction
    }

    /// Queues a turn for the next valid moment.
    pub fn request_direction(&mut self, direction: Direction) {
        self.next_direction = Some(direction);
    }

    /// The bounding box used against walls and ghosts.
    pub fn rect(&self) -> Rect {
        Rect::square(self.position, self.radius)
    }

    /// Advances the player by `dt` seconds.
    ///
    /// Reversals and turns along the current axis apply immediately. A
    /// perpendicular turn waits until the player is within one step of a cell
    /// center whose neighbour in the new direction is passable, then snaps to
    /// that center so the player stays aligned to the corridor.
    pub fn update(&mut self, dt: f32, graph: &Graph, tile_size: f32) {
        let step = self.speed * dt;

        if let Some(next) = self.next_direction {
            match self.direction {
                None => self.turn(next),
                Some(current) if current.is_horizontal() == next.is_horizontal() => self.turn(next),
                Some(_) => {
                    if let Some(node) = graph.node_at_pixel(self.position, tile_size) {
                        let center = graph.pixel_center(node, tile_size);
                        let open = graph
                            .node(node)
                            .neighbour(next)
                            .is_some_and(|neighbour| graph.is_passable(neighbour));

                        if open && self.position.distance(center) <= step.max(f32::EPSILON) {
                            self.position = center;
                            self.turn(next);
                        }
                    }
                }
            }
        }

        if let Some(direction) = self.direction {
            self.position += direction.as_vec2() * step;
        }
    }

    fn turn(&mut self, direction: Direction) {
        trace!(direction = direction.as_ref(), "Player turned");
        self.direction = Some(direction);
        self.next_direction = None;
    }

    /// Removes one life, returning how many remain.
    pub fn lose_life(&mut self) -> u8 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    /// Teleports the player, stopping it and dropping any buffered turn.
    pub fn reset_to(&mut self, position: Vec2) {
        self.position = position;
        self.direction = None;
        self.next_direction = None;
    }
}

impl Collider for Player {
    fn bounds(&self) -> Bounds {
        Bounds::Circle {
            center: self.position,
            radius: self.radius,
        }
    }
}
