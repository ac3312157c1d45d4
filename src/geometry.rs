//! Compass directions and the edge-label lookup table.
//!
//! Board coordinates grow to the right (+x) and downwards (+y), so `up` moves
//! a piece one row towards negative y.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pieces::EdgeLabel;

/// A 2D board coordinate.
pub type Position = (i32, i32);

/// One of the four sides a piece can connect through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    /// Unit offset applied to a piece's position when moving this way.
    #[inline]
    pub const fn offset(self) -> Position {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// Moves `position` one cell in this direction.
    #[inline]
    pub const fn step(self, position: Position) -> Position {
        let (dx, dy) = self.offset();
        (position.0 + dx, position.1 + dy)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Version of the built-in table.
pub const DEFAULT_TABLE_VERSION: u32 = 1;

/// Built-in edge-label assignments.
///
/// Several labels share a direction: the service emits one label per side
/// variant, and each variant still points the same way on the board.
pub const DEFAULT_EDGE_DIRECTIONS: &[(EdgeLabel, Direction)] = &[
    (501, Direction::Up),
    (502, Direction::Right),
    (503, Direction::Left),
    (504, Direction::Down),
    (505, Direction::Right),
    (506, Direction::Left),
    (507, Direction::Down),
];

/// Versioned mapping from edge label to board direction.
///
/// The layout engine takes one of these by reference; labels that are not in
/// the table never move a piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionTable {
    pub version: u32,
    pub edges: BTreeMap<EdgeLabel, Direction>,
}

impl DirectionTable {
    pub fn new(version: u32, edges: impl IntoIterator<Item = (EdgeLabel, Direction)>) -> Self {
        Self {
            version,
            edges: edges.into_iter().collect(),
        }
    }

    #[inline]
    pub fn direction(&self, label: EdgeLabel) -> Option<Direction> {
        self.edges.get(&label).copied()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Formats the table one `label -> direction` pair per line.
    pub fn describe(&self) -> String {
        let mut output = format!("direction table v{}\n", self.version);
        for (label, direction) in &self.edges {
            output.push_str(&format!("  {label:>5} -> {direction}\n"));
        }
        output
    }
}

impl Default for DirectionTable {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_VERSION, DEFAULT_EDGE_DIRECTIONS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_are_unit_steps() {
        for direction in Direction::ALL {
            let (dx, dy) = direction.offset();
            assert_eq!(dx.abs() + dy.abs(), 1, "{direction} is not a unit step");
        }
        assert_eq!(Direction::Up.step((3, 3)), (3, 2));
        assert_eq!(Direction::Left.step((0, 0)), (-1, 0));
    }

    #[test]
    fn test_default_table_lookup() {
        let table = DirectionTable::default();
        assert_eq!(table.version, DEFAULT_TABLE_VERSION);
        assert_eq!(table.len(), 7);
        assert_eq!(table.direction(501), Some(Direction::Up));
        assert_eq!(table.direction(505), Some(Direction::Right));
        assert_eq!(table.direction(507), Some(Direction::Down));
        assert_eq!(table.direction(1), None);
    }

    #[test]
    fn test_table_json_uses_lowercase_names_and_string_keys() {
        let table: DirectionTable =
            serde_json::from_str(r#"{"version": 2, "edges": {"1": "up", "2": "left"}}"#).unwrap();
        assert_eq!(table.version, 2);
        assert_eq!(table.direction(1), Some(Direction::Up));
        assert_eq!(table.direction(2), Some(Direction::Left));
    }
}
