//! Graph construction from parsed level text.

use tracing::debug;

use crate::error::LevelError;

use super::graph::{Graph, NodeId};
use super::parser::{GhostKind, LevelParser, ParsedLevel, Tile};

/// An entity to instantiate once the graph exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spawn {
    Wall,
    Dot,
    PowerPellet,
    PathPellet,
    Ghost(GhostKind),
}

/// The output of [`MapBuilder`]: the navigation graph, the start node and
/// the entities found in the level text, in row-major order.
#[derive(Debug, Clone)]
pub struct BuiltMap {
    pub graph: Graph,
    pub start: NodeId,
    pub spawns: Vec<(NodeId, Spawn)>,
}

impl BuiltMap {
    /// Iterates over the spawns of a given kind.
    pub fn spawns_of(&self, kind: Spawn) -> impl Iterator<Item = NodeId> + '_ {
        self.spawns
            .iter()
            .filter(move |(_, spawn)| *spawn == kind)
            .map(|&(node, _)| node)
    }
}

/// Builds level graphs from text.
pub struct MapBuilder;

impl MapBuilder {
    /// Builds the graph and entity list for rows of level text.
    ///
    /// # Errors
    ///
    /// Fails when rows are irregular, the grid is smaller than 3x3, or no start
    /// marker exists. Nothing is returned on failure.
    pub fn build<S: AsRef<str>>(rows: &[S]) -> Result<BuiltMap, LevelError> {
        Self::from_parsed(LevelParser::parse_rows(rows)?)
    }

    /// Builds the graph and entity list for newline-separated level text.
    pub fn build_text(text: &str) -> Result<BuiltMap, LevelError> {
        Self::from_parsed(LevelParser::parse(text)?)
    }

    fn from_parsed(parsed: ParsedLevel) -> Result<BuiltMap, LevelError> {
        let passable: Vec<bool> = parsed.tiles.iter().map(|tile| tile.is_passable()).collect();
        let graph = Graph::new(parsed.width, parsed.height, &passable)?;

        let start = graph.node_at(parsed.start).ok_or(LevelError::MissingStart)?;

        let spawns: Vec<(NodeId, Spawn)> = parsed
            .iter()
            .filter_map(|(grid, tile)| {
                let spawn = match tile {
                    Tile::Wall => Spawn::Wall,
                    Tile::Dot => Spawn::Dot,
                    Tile::PowerPellet => Spawn::PowerPellet,
                    Tile::PathPellet => Spawn::PathPellet,
                    Tile::Ghost(kind) => Spawn::Ghost(kind),
                    Tile::Start | Tile::Empty | Tile::Unknown(_) => return None,
                };
                graph.node_at(grid).map(|node| (node, spawn))
            })
            .collect();

        debug!(
            width = parsed.width,
            height = parsed.height,
            start,
            spawns = spawns.len(),
            "Level graph built"
        );

        Ok(BuiltMap { graph, start, spawns })
    }
}
