//! Static level entities: walls, dots and pellets.

use glam::Vec2;
use strum_macros::IntoStaticStr;

use super::collision::{Bounds, Collider, Rect};

/// An impassable cell, solid across its whole tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub center: Vec2,
    pub half_extent: f32,
}

impl Wall {
    pub fn rect(&self) -> Rect {
        Rect::square(self.center, self.half_extent)
    }
}

impl Collider for Wall {
    fn bounds(&self) -> Bounds {
        Bounds::Rect(self.rect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub center: Vec2,
    pub radius: f32,
}

impl Collider for Dot {
    fn bounds(&self) -> Bounds {
        Bounds::Circle {
            center: self.center,
            radius: self.radius,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
pub enum PelletKind {
    /// Scares every ghost for a while.
    Power,
    /// Reveals ghost paths for a while.
    Path,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pellet {
    pub center: Vec2,
    pub radius: f32,
    pub kind: PelletKind,
}

impl Collider for Pellet {
    fn bounds(&self) -> Bounds {
        Bounds::Circle {
            center: self.center,
            radius: self.radius,
        }
    }
}
