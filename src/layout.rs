//! Breadth-first board layout.
//!
//! Each component is seeded at (0, 0) and grown outwards one link at a time:
//! a neighbor reached through a labeled edge sits one cell away from the
//! current piece in that edge's direction. The first visit to a piece fixes
//! its position; later paths never move it.
//!
//! The engine is pure. It reads a `Solution` and a `DirectionTable` and
//! returns a fresh `Layout`; nothing is kept between calls.

use std::collections::VecDeque;

use log::debug;
use rustc_hash::FxHashMap;

use crate::geometry::{DirectionTable, Position};
use crate::grid::BoundingBox;
use crate::pieces::{EdgeLabel, PieceId, Solution};

/// One entry in a piece's adjacency list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub neighbor: PieceId,
    /// Edge label for outgoing links; `None` for the reverse of a connection,
    /// which is known but carries no direction.
    pub edge: Option<EdgeLabel>,
}

/// Adjacency lists for every piece a solution mentions.
///
/// Lists keep connection order so that the traversal is deterministic.
#[derive(Debug, Default)]
pub struct Adjacency {
    links: FxHashMap<PieceId, Vec<Link>>,
}

impl Adjacency {
    /// Indexes every connection of every component.
    pub fn build(solution: &Solution) -> Self {
        let mut links: FxHashMap<PieceId, Vec<Link>> = FxHashMap::default();

        for component in &solution.components {
            links.entry(component.start_piece).or_default();

            for conn in &component.connections {
                let source = conn.source(component.start_piece);
                links.entry(source).or_default().push(Link {
                    neighbor: conn.piece_id,
                    edge: Some(conn.edge_id),
                });
                links.entry(conn.piece_id).or_default().push(Link {
                    neighbor: source,
                    edge: None,
                });
            }
        }

        Self { links }
    }

    pub fn links(&self, piece: PieceId) -> &[Link] {
        self.links.get(&piece).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Piece positions in placement order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinateMap {
    positions: FxHashMap<PieceId, Position>,
    order: Vec<PieceId>,
}

impl CoordinateMap {
    #[inline]
    pub fn get(&self, piece: PieceId) -> Option<Position> {
        self.positions.get(&piece).copied()
    }

    #[inline]
    pub fn contains(&self, piece: PieceId) -> bool {
        self.positions.contains_key(&piece)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates pieces in the order the traversal placed them.
    pub fn iter(&self) -> impl Iterator<Item = (PieceId, Position)> + '_ {
        self.order.iter().map(|id| (*id, self.positions[id]))
    }

    /// Records a position; returns false if the piece already had one.
    fn place(&mut self, piece: PieceId, position: Position) -> bool {
        if self.positions.contains_key(&piece) {
            return false;
        }
        self.positions.insert(piece, position);
        self.order.push(piece);
        true
    }
}

/// Counters gathered while laying out a solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutStats {
    /// Components that started a traversal (their anchor was not yet placed).
    pub components_seeded: usize,
    /// Outgoing links skipped because their label has no direction.
    pub unmapped_edges: usize,
    /// Outgoing links to a piece placed earlier in the same traversal that
    /// would have put it somewhere else. Only cyclic solutions produce these.
    pub conflicts: usize,
    /// Outgoing links to a piece an earlier component already placed.
    pub cross_component_links: usize,
}

/// Result of one layout run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub coordinates: CoordinateMap,
    pub bounds: BoundingBox,
    pub stats: LayoutStats,
}

impl Layout {
    /// Board cell of a piece after shifting by the bounding-box offset.
    pub fn cell(&self, piece: PieceId) -> Option<(usize, usize)> {
        self.coordinates.get(piece).map(|pos| self.bounds.to_cell(pos))
    }
}

/// Lays out every component of `solution` using `table`.
pub fn layout(solution: &Solution, table: &DirectionTable) -> Layout {
    let adjacency = Adjacency::build(solution);
    let mut coordinates = CoordinateMap::default();
    // piece -> index of the traversal that placed it
    let mut placed_by: FxHashMap<PieceId, usize> = FxHashMap::default();
    let mut stats = LayoutStats::default();
    let mut queue: VecDeque<(PieceId, Position)> = VecDeque::new();

    for component in &solution.components {
        let start = component.start_piece;
        if placed_by.contains_key(&start) {
            continue;
        }

        let seed = stats.components_seeded;
        placed_by.insert(start, seed);
        coordinates.place(start, (0, 0));
        queue.push_back((start, (0, 0)));
        stats.components_seeded += 1;
        debug!("seeding component at piece {start} (0,0)");

        while let Some((piece, position)) = queue.pop_front() {
            debug!("visiting piece {piece} at {position:?}");

            for link in adjacency.links(piece) {
                // reverse links only record that the pieces touch
                let Some(edge) = link.edge else {
                    continue;
                };

                if let Some(&owner) = placed_by.get(&link.neighbor) {
                    if owner != seed {
                        stats.cross_component_links += 1;
                        debug!(
                            "piece {} belongs to an earlier component, edge {edge} ignored",
                            link.neighbor
                        );
                    } else if let (Some(direction), Some(existing)) =
                        (table.direction(edge), coordinates.get(link.neighbor))
                    {
                        if direction.step(position) != existing {
                            stats.conflicts += 1;
                            debug!(
                                "piece {} already at {existing:?}, edge {edge} points elsewhere",
                                link.neighbor
                            );
                        }
                    }
                    continue;
                }

                let Some(direction) = table.direction(edge) else {
                    stats.unmapped_edges += 1;
                    debug!("edge {edge} has no direction, not placing piece {}", link.neighbor);
                    continue;
                };

                let next = direction.step(position);
                placed_by.insert(link.neighbor, seed);
                coordinates.place(link.neighbor, next);
                queue.push_back((link.neighbor, next));
                debug!(
                    "placing piece {} at {next:?} via edge {edge} ({direction})",
                    link.neighbor
                );
            }
        }
    }

    let bounds = BoundingBox::enclosing(coordinates.iter().map(|(_, pos)| pos));

    Layout {
        coordinates,
        bounds,
        stats,
    }
}
