//! Piece, connection and solution types exchanged with the puzzle service.
//!
//! A solution is a list of components. Each component is anchored at a start
//! piece and lists the connections that hang off it; a connection says that
//! `from_piece_id`, along its side labeled `edge_id`, touches `piece_id`.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Identifier of a piece within one puzzle.
pub type PieceId = u32;

/// Label of one side of a piece.
pub type EdgeLabel = u32;

/// One labeled link between two pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub piece_id: PieceId,
    pub edge_id: EdgeLabel,
    /// Piece the connection starts from. Older service builds omit it, in
    /// which case the connection belongs to the component's start piece.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_piece_id: Option<PieceId>,
}

impl Connection {
    /// Resolves the piece this connection starts from.
    #[inline]
    pub fn source(&self, start_piece: PieceId) -> PieceId {
        self.from_piece_id.unwrap_or(start_piece)
    }
}

/// A connected group of pieces anchored at `start_piece`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub start_piece: PieceId,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// The solver's answer for one puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub puzzle_name: String,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Solution {
    /// Every piece id the solution mentions, in first-mention order.
    pub fn referenced_pieces(&self) -> Vec<PieceId> {
        let mut seen = FxHashSet::default();
        let mut ids = Vec::new();
        for component in &self.components {
            let start = component.start_piece;
            let mentioned = std::iter::once(start).chain(
                component
                    .connections
                    .iter()
                    .flat_map(|conn| [conn.source(start), conn.piece_id]),
            );
            for id in mentioned {
                if seen.insert(id) {
                    ids.push(id);
                }
            }
        }
        ids
    }
}

/// A piece as stored by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceRecord {
    pub piece_id: PieceId,
    #[serde(default)]
    pub edges: Vec<EdgeLabel>,
}

/// Edge labels of every piece in a puzzle, keyed by piece id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PieceCatalog {
    edges: FxHashMap<PieceId, Vec<EdgeLabel>>,
}

impl PieceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the edge labels of a piece, or an empty slice if the piece was
    /// never fetched.
    pub fn edges(&self, piece: PieceId) -> &[EdgeLabel] {
        self.edges.get(&piece).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, piece: PieceId) -> bool {
        self.edges.contains_key(&piece)
    }

    pub fn insert(&mut self, piece: PieceId, edges: Vec<EdgeLabel>) {
        self.edges.insert(piece, edges);
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl FromIterator<PieceRecord> for PieceCatalog {
    fn from_iter<I: IntoIterator<Item = PieceRecord>>(records: I) -> Self {
        let mut catalog = Self::new();
        for record in records {
            catalog.insert(record.piece_id, record.edges);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_without_source_uses_start_piece() {
        let conn: Connection = serde_json::from_str(r#"{"piece_id": 2, "edge_id": 501}"#).unwrap();
        assert_eq!(conn.from_piece_id, None);
        assert_eq!(conn.source(7), 7);

        let conn: Connection =
            serde_json::from_str(r#"{"piece_id": 2, "edge_id": 501, "from_piece_id": 4}"#).unwrap();
        assert_eq!(conn.source(7), 4);
    }

    #[test]
    fn test_referenced_pieces_deduplicates_in_order() {
        let solution: Solution = serde_json::from_str(
            r#"{
                "puzzle_name": "p",
                "components": [
                    {"start_piece": 1, "connections": [
                        {"piece_id": 2, "edge_id": 502, "from_piece_id": 1},
                        {"piece_id": 3, "edge_id": 504, "from_piece_id": 2}
                    ]},
                    {"start_piece": 9, "connections": [{"piece_id": 1, "edge_id": 999}]}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(solution.referenced_pieces(), vec![1, 2, 3, 9]);
    }

    #[test]
    fn test_catalog_missing_piece_has_no_edges() {
        let catalog: PieceCatalog = vec![PieceRecord {
            piece_id: 5,
            edges: vec![501, 502],
        }]
        .into_iter()
        .collect();

        assert_eq!(catalog.edges(5), &[501, 502]);
        assert!(catalog.edges(6).is_empty());
        assert!(!catalog.contains(6));
        assert_eq!(catalog.len(), 1);
    }
}
