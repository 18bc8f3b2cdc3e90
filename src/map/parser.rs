//! Level text parsing: turns rows of characters into a validated tile grid.

use glam::IVec2;
use tracing::warn;

use crate::constants::MIN_GRID_SIZE;
use crate::error::LevelError;

/// The policy a ghost spawned from level text follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GhostKind {
    /// `G`: chases the player directly when close.
    Chaser,
    /// `A`: cuts the player off when close.
    Ambusher,
    /// `R`: wanders between random cells.
    Random,
}

/// The semantic outcome of one level character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Dot,
    PowerPellet,
    PathPellet,
    Start,
    Ghost(GhostKind),
    Empty,
    /// Any other character: a passable cell with no entity.
    Unknown(char),
}

impl Tile {
    /// Whether entities can stand on a cell holding this tile.
    pub fn is_passable(self) -> bool {
        !matches!(self, Tile::Wall)
    }
}

/// Represents the parsed data from a level's text.
#[derive(Debug, Clone)]
pub struct ParsedLevel {
    pub width: usize,
    pub height: usize,
    /// Tiles in row-major order.
    pub tiles: Vec<Tile>,
    /// The first start marker encountered, scanning rows top to bottom.
    pub start: IVec2,
}

impl ParsedLevel {
    /// Iterates over every tile with its grid coordinate.
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, Tile)> + '_ {
        let width = self.width;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(index, &tile)| (IVec2::new((index % width) as i32, (index / width) as i32), tile))
    }
}

/// Parser for converting level text into structured tile data.
pub struct LevelParser;

impl LevelParser {
    /// Parses a single character into a tile. Never fails: unrecognized
    /// characters become [`Tile::Unknown`].
    pub fn parse_character(c: char) -> Tile {
        match c {
            '#' => Tile::Wall,
            '.' => Tile::Dot,
            'P' => Tile::PowerPellet,
            'H' => Tile::PathPellet,
            'S' => Tile::Start,
            'G' => Tile::Ghost(GhostKind::Chaser),
            'A' => Tile::Ghost(GhostKind::Ambusher),
            'R' => Tile::Ghost(GhostKind::Random),
            ' ' => Tile::Empty,
            other => Tile::Unknown(other),
        }
    }

    /// Splits newline-separated level text into rows.
    ///
    /// Carriage returns are stripped and trailing blank lines are ignored.
    pub fn split_rows(text: &str) -> Vec<&str> {
        let mut rows: Vec<&str> = text.lines().map(|line| line.trim_end_matches('\r')).collect();
        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }
        rows
    }

    /// Parses rows of equal length into a tile grid.
    ///
    /// # Errors
    ///
    /// Fails when the rows have irregular lengths, when the grid is smaller
    /// than 3x3, or when there is no start marker.
    pub fn parse_rows<S: AsRef<str>>(rows: &[S]) -> Result<ParsedLevel, LevelError> {
        let first = rows.first().ok_or(LevelError::Empty)?;
        let width = first.as_ref().chars().count();

        for (row, line) in rows.iter().enumerate() {
            let found = line.as_ref().chars().count();
            if found != width {
                return Err(LevelError::IrregularRow {
                    row,
                    expected: width,
                    found,
                });
            }
        }

        let height = rows.len();
        if width < MIN_GRID_SIZE || height < MIN_GRID_SIZE {
            return Err(LevelError::TooSmall {
                width,
                height,
                minimum: MIN_GRID_SIZE,
            });
        }

        let mut tiles = Vec::with_capacity(width * height);
        let mut start = None;

        for (y, line) in rows.iter().enumerate() {
            for (x, character) in line.as_ref().chars().enumerate() {
                let tile = Self::parse_character(character);
                let grid = IVec2::new(x as i32, y as i32);

                match tile {
                    Tile::Start if start.is_none() => start = Some(grid),
                    Tile::Start => warn!(%grid, "Ignoring additional start marker"),
                    Tile::Unknown(character) => warn!(%grid, ?character, "Unrecognized level character"),
                    _ => {}
                }

                tiles.push(tile);
            }
        }

        Ok(ParsedLevel {
            width,
            height,
            tiles,
            start: start.ok_or(LevelError::MissingStart)?,
        })
    }

    /// Parses newline-separated level text.
    pub fn parse(text: &str) -> Result<ParsedLevel, LevelError> {
        Self::parse_rows(&Self::split_rows(text))
    }
}
