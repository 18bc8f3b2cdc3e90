use glam::Vec2;

/// The geometric shape an entity collides with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounds {
    Circle { center: Vec2, radius: f32 },
    Rect(Rect),
}

/// An axis-aligned rectangle described by its center and half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub center: Vec2,
    pub half: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    /// A square of side `2 * half`.
    pub fn square(center: Vec2, half: f32) -> Self {
        Self::new(center, Vec2::splat(half))
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    /// Strict overlap test: rectangles that merely touch do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        let delta = (self.center - other.center).abs();
        let reach = self.half + other.half;
        delta.x < reach.x && delta.y < reach.y
    }
}

/// Trait for entities that can participate in collision detection.
pub trait Collider {
    fn bounds(&self) -> Bounds;

    /// Checks whether this entity's bounds overlap another's.
    fn is_colliding_with(&self, other: &dyn Collider) -> bool {
        bounds_intersect(&self.bounds(), &other.bounds())
    }
}

/// `distance(centers) < r1 + r2`
pub fn circles_intersect(a_center: Vec2, a_radius: f32, b_center: Vec2, b_radius: f32) -> bool {
    a_center.distance(b_center) < a_radius + b_radius
}

fn circle_rect_intersect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = center.clamp(rect.min(), rect.max());
    center.distance(closest) < radius
}

/// Intersection test between any two shapes.
pub fn bounds_intersect(a: &Bounds, b: &Bounds) -> bool {
    match (a, b) {
        (
            Bounds::Circle {
                center: ac,
                radius: ar,
            },
            Bounds::Circle {
                center: bc,
                radius: br,
            },
        ) => circles_intersect(*ac, *ar, *bc, *br),
        (Bounds::Rect(a), Bounds::Rect(b)) => a.intersects(b),
        (Bounds::Circle { center, radius }, Bounds::Rect(rect)) | (Bounds::Rect(rect), Bounds::Circle { center, radius }) => {
            circle_rect_intersect(*center, *radius, rect)
        }
    }
}
