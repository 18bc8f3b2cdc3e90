//! Unweighted shortest-path search over a level graph.

use ::pathfinding::prelude::bfs;

use super::graph::{Graph, NodeId};

/// Breadth-first path search bound to one graph.
///
/// Predecessors are tracked inside each search, so independent searches never
/// observe each other's bookkeeping and the graph stays read-only.
#[derive(Debug, Clone, Copy)]
pub struct PathFinder<'a> {
    graph: &'a Graph,
}

impl<'a> PathFinder<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }

    /// Finds a shortest path from `from` to `to`, both inclusive.
    ///
    /// The search expands only through passable neighbours and visits every
    /// node at most once, so it terminates after at most `node_count` steps.
    /// Returns an empty path when `to` is unreachable or either node is not
    /// part of the graph.
    pub fn find_path(&self, from: NodeId, to: NodeId) -> Vec<NodeId> {
        if self.graph.get_node(from).is_none() || self.graph.get_node(to).is_none() {
            return Vec::new();
        }
        if from == to {
            return vec![from];
        }

        bfs(
            &from,
            |&id| self.graph.passable_neighbours(id).collect::<Vec<_>>(),
            |&id| id == to,
        )
        .unwrap_or_default()
    }

    /// Finds a shortest path from `from` to the closest node accepted by `goal`.
    ///
    /// Returns an empty path when no accepted node is reachable.
    pub fn find_nearest(&self, from: NodeId, goal: impl Fn(NodeId) -> bool) -> Vec<NodeId> {
        if self.graph.get_node(from).is_none() {
            return Vec::new();
        }

        bfs(
            &from,
            |&id| self.graph.passable_neighbours(id).collect::<Vec<_>>(),
            |&id| goal(id),
        )
        .unwrap_or_default()
    }
}
