use glam::{IVec2, Vec2};
use strum_macros::AsRefStr;

/// The four cardinal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Up,
    Left,
    Right,
    Down,
}

impl Direction {
    /// The four cardinal directions, in neighbour order.
    pub const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Left, Direction::Right, Direction::Down];

    /// Returns the opposite direction. Constant time.
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns the grid offset of one step in this direction. `y` grows downward.
    pub fn as_ivec2(self) -> IVec2 {
        self.into()
    }

    /// Returns the unit vector of this direction in pixel space.
    pub fn as_vec2(self) -> Vec2 {
        self.as_ivec2().as_vec2()
    }

    /// Returns true for `Left` and `Right`.
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Picks the cardinal step from `from` toward `to`, preferring the horizontal axis.
    ///
    /// Returns `None` when both points are equal.
    pub fn toward(from: IVec2, to: IVec2) -> Option<Direction> {
        if to.x != from.x {
            Some(if to.x > from.x { Direction::Right } else { Direction::Left })
        } else if to.y != from.y {
            Some(if to.y > from.y { Direction::Down } else { Direction::Up })
        } else {
            None
        }
    }
}

impl From<Direction> for IVec2 {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => -IVec2::Y,
            Direction::Down => IVec2::Y,
            Direction::Left => -IVec2::X,
            Direction::Right => IVec2::X,
        }
    }
}
