use glam::{IVec2, Vec2};
use rand::Rng;
use smallvec::SmallVec;

use crate::constants::RANDOM_POINT_ATTEMPTS;
use crate::error::{LevelError, PathError};

use super::direction::Direction;

/// A unique identifier for a node, represented by its index in the graph's storage.
pub type NodeId = usize;

/// One grid cell of a level.
///
/// Nodes are created once when the level is built and never change afterwards.
#[derive(Debug, Clone)]
pub struct Node {
    /// The cell coordinate, `x` to the right and `y` downward.
    pub grid: IVec2,
    /// Whether entities can stand on this cell.
    pub passable: bool,
    /// In-bounds neighbours, ordered up, left, right, down.
    neighbours: SmallVec<[(Direction, NodeId); 4]>,
}

impl Node {
    /// Returns the ids of the in-bounds neighbours, ordered up, left, right, down.
    pub fn neighbours(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.neighbours.iter().map(|&(_, id)| id)
    }

    /// Returns the neighbour in the given direction, if it is inside the grid.
    pub fn neighbour(&self, direction: Direction) -> Option<NodeId> {
        self.neighbours
            .iter()
            .find_map(|&(dir, id)| (dir == direction).then_some(id))
    }
}

/// A rectangular grid of nodes with 4-directional links.
///
/// Nodes are stored row-major, so a node's id is `y * width + x`. This gives
/// O(1) lookups by id and by grid coordinate.
#[derive(Debug, Clone)]
pub struct Graph {
    width: usize,
    height: usize,
    nodes: Vec<Node>,
}

impl Graph {
    /// Builds a graph from a row-major passability grid.
    ///
    /// All nodes are created first, then a second pass links each node to its
    /// in-bounds up, left, right and down neighbours. There are no diagonal links.
    pub fn new(width: usize, height: usize, passable: &[bool]) -> Result<Self, LevelError> {
        let expected = width * height;
        if passable.len() != expected {
            return Err(LevelError::CellCountMismatch {
                width,
                height,
                expected,
                found: passable.len(),
            });
        }

        let mut nodes: Vec<Node> = passable
            .iter()
            .enumerate()
            .map(|(index, &passable)| Node {
                grid: IVec2::new((index % width) as i32, (index / width) as i32),
                passable,
                neighbours: SmallVec::new(),
            })
            .collect();

        for index in 0..nodes.len() {
            let grid = nodes[index].grid;
            for direction in Direction::DIRECTIONS {
                if let Some(neighbour) = Self::index_of(width, height, grid + direction.as_ivec2()) {
                    nodes[index].neighbours.push((direction, neighbour));
                }
            }
        }

        Ok(Self { width, height, nodes })
    }

    fn index_of(width: usize, height: usize, grid: IVec2) -> Option<NodeId> {
        if grid.x < 0 || grid.y < 0 || grid.x as usize >= width || grid.y as usize >= height {
            return None;
        }
        Some(grid.y as usize * width + grid.x as usize)
    }

    /// Width of the grid, in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the grid, in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Retrieves a node, if the id is inside the graph.
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Retrieves a node.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this graph. Ids handed out by the
    /// graph itself are always valid for its lifetime.
    pub fn node(&self, id: NodeId) -> &Node {
        self.nodes
            .get(id)
            .unwrap_or_else(|| panic!("Node {id} is outside a graph of {} nodes", self.nodes.len()))
    }

    /// Iterates over every node in id order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate()
    }

    /// Looks up the node at a grid coordinate.
    pub fn node_at(&self, grid: IVec2) -> Option<NodeId> {
        Self::index_of(self.width, self.height, grid)
    }

    /// Looks up the node under a pixel position.
    pub fn node_at_pixel(&self, position: Vec2, tile_size: f32) -> Option<NodeId> {
        self.node_at((position / tile_size).floor().as_ivec2())
    }

    /// Returns the pixel position of a node's center.
    pub fn pixel_center(&self, id: NodeId, tile_size: f32) -> Vec2 {
        (self.node(id).grid.as_vec2() + Vec2::splat(0.5)) * tile_size
    }

    /// Returns whether the node exists and can be stood on.
    pub fn is_passable(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|node| node.passable)
    }

    /// Iterates over the passable neighbours of a node, in neighbour order.
    pub fn passable_neighbours(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).neighbours().filter(|&neighbour| self.nodes[neighbour].passable)
    }

    /// Manhattan distance between two nodes, in cells.
    pub fn manhattan(&self, a: NodeId, b: NodeId) -> i32 {
        let delta = self.node(a).grid - self.node(b).grid;
        delta.x.abs() + delta.y.abs()
    }

    /// Draws cells uniformly until a passable one is found.
    ///
    /// Gives up after [`RANDOM_POINT_ATTEMPTS`] draws; exhausting them means the
    /// level has (almost) no passable cells.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<NodeId, PathError> {
        if !self.nodes.is_empty() {
            for _ in 0..RANDOM_POINT_ATTEMPTS {
                let candidate = rng.random_range(0..self.nodes.len());
                if self.nodes[candidate].passable {
                    return Ok(candidate);
                }
            }
        }

        Err(PathError::RandomPointExhausted {
            attempts: RANDOM_POINT_ATTEMPTS,
        })
    }
}
