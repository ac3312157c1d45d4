//! Puzzle Board Library
//!
//! Fetches jigsaw solution graphs from the puzzle service and lays their
//! pieces out on an integer board, one breadth-first traversal per component.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod geometry;
pub mod grid;
pub mod layout;
pub mod pieces;
pub mod register;
pub mod transport;

pub use api::{ApiError, Client, FetchedSolution};
pub use geometry::{Direction, DirectionTable};
pub use layout::{layout, Layout};
pub use pieces::{Component, Connection, PieceCatalog, PieceId, Solution};
