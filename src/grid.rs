//! Board extents and text rendering of a laid-out puzzle.
//!
//! Layout coordinates may be negative. The bounding box always contains the
//! origin, and its offset shifts every coordinate onto a non-negative board
//! cell, with cell (0, 0) in the top-left corner.

use rustc_hash::FxHashMap;

use crate::geometry::Position;
use crate::layout::Layout;
use crate::pieces::{EdgeLabel, PieceCatalog, PieceId, Solution};

/// Inclusive coordinate bounds of a layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl BoundingBox {
    /// Smallest box holding every position and the origin.
    pub fn enclosing(positions: impl IntoIterator<Item = Position>) -> Self {
        positions
            .into_iter()
            .fold(Self::default(), |bounds, (x, y)| Self {
                min_x: bounds.min_x.min(x),
                max_x: bounds.max_x.max(x),
                min_y: bounds.min_y.min(y),
                max_y: bounds.max_y.max(y),
            })
    }

    /// Number of board columns.
    #[inline]
    pub fn width(&self) -> usize {
        (self.max_x - self.min_x + 1) as usize
    }

    /// Number of board rows.
    #[inline]
    pub fn height(&self) -> usize {
        (self.max_y - self.min_y + 1) as usize
    }

    /// Per-axis shift that moves the minimum corner to (0, 0).
    #[inline]
    pub fn offset(&self) -> Position {
        (-self.min_x, -self.min_y)
    }

    /// Converts a layout coordinate inside the box to a board cell.
    #[inline]
    pub fn to_cell(&self, (x, y): Position) -> (usize, usize) {
        let (dx, dy) = self.offset();
        ((x + dx) as usize, (y + dy) as usize)
    }
}

/// Side labels shown for a piece: the first four labels of its list, read
/// as top, right, bottom, left.
pub fn side_labels(edges: &[EdgeLabel]) -> [Option<EdgeLabel>; 4] {
    [0usize, 1, 2, 3].map(|side| edges.get(side).copied())
}

/// Occupied board cells keyed by `(col, row)`, each holding the pieces placed
/// there in placement order. Empty cells have no entry.
pub fn layout_to_board(layout: &Layout) -> FxHashMap<(usize, usize), Vec<PieceId>> {
    let mut board: FxHashMap<(usize, usize), Vec<PieceId>> = FxHashMap::default();

    for (piece, position) in layout.coordinates.iter() {
        board
            .entry(layout.bounds.to_cell(position))
            .or_default()
            .push(piece);
    }

    board
}

/// Formats a layout as a text board followed by a piece legend.
///
/// Each cell shows the first piece placed there; a `*` marks cells shared by
/// several pieces, which happens when components overlap. Empty cells show
/// as '.'. Pieces the solution mentions but the layout could not place are
/// listed at the end.
pub fn format_board(solution: &Solution, layout: &Layout, catalog: &PieceCatalog) -> String {
    let board = layout_to_board(layout);
    let cell_width = layout
        .coordinates
        .iter()
        .map(|(piece, _)| piece.to_string().len())
        .max()
        .unwrap_or(1)
        + 1;

    let mut output = format!(
        "{} ({}x{}, {} placed)\n",
        solution.puzzle_name,
        layout.bounds.width(),
        layout.bounds.height(),
        layout.coordinates.len()
    );

    for row in 0..layout.bounds.height() {
        let mut line = String::new();
        for col in 0..layout.bounds.width() {
            if col > 0 {
                line.push(' ');
            }
            let cell = board.get(&(col, row)).map(Vec::as_slice).unwrap_or(&[]);
            let text = match cell {
                [] => ".".to_string(),
                [only] => only.to_string(),
                [first, ..] => format!("{first}*"),
            };
            line.push_str(&format!("{text:>cell_width$}"));
        }
        output.push_str(line.trim_end());
        output.push('\n');
    }

    if layout.coordinates.is_empty() {
        return output;
    }

    output.push('\n');
    for (piece, (x, y)) in layout.coordinates.iter() {
        let sides = side_labels(catalog.edges(piece)).map(|label| match label {
            Some(label) => label.to_string(),
            None => "-".to_string(),
        });
        output.push_str(&format!(
            "piece {piece} at ({x},{y}) edges top={} right={} bottom={} left={}\n",
            sides[0], sides[1], sides[2], sides[3]
        ));
    }

    let unplaced: Vec<String> = solution
        .referenced_pieces()
        .into_iter()
        .filter(|piece| !layout.coordinates.contains(*piece))
        .map(|piece| piece.to_string())
        .collect();
    if !unplaced.is_empty() {
        output.push_str(&format!("unplaced: {}\n", unplaced.join(", ")));
    }

    output
}

/// Counts board cells holding more than one piece.
pub fn shared_cells(layout: &Layout) -> usize {
    let mut counts: FxHashMap<Position, usize> = FxHashMap::default();
    for (_, position) in layout.coordinates.iter() {
        *counts.entry(position).or_default() += 1;
    }
    counts.values().filter(|&&count| count > 1).count()
}
