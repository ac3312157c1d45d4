//! Creating a puzzle and uploading its pieces.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::api::{ApiError, Client, NewPiece, NewPuzzle};
use crate::pieces::{EdgeLabel, PieceId};
use crate::transport::Transport;

/// A piece to upload: its id and edge labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceSpec {
    pub piece_id: PieceId,
    pub edges: Vec<EdgeLabel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PieceSpecError {
    #[error("expected ID:EDGE,EDGE,..., got {0:?}")]
    MissingSeparator(String),
    #[error("invalid piece id {0:?}")]
    PieceId(String),
    #[error("invalid edge label {0:?}")]
    Edge(String),
}

impl FromStr for PieceSpec {
    type Err = PieceSpecError;

    /// Parses `ID:EDGE,EDGE,...`; the edge list may be empty (`7:`).
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (id, edges) = raw
            .split_once(':')
            .ok_or_else(|| PieceSpecError::MissingSeparator(raw.to_string()))?;
        let piece_id = id
            .trim()
            .parse::<PieceId>()
            .map_err(|_| PieceSpecError::PieceId(id.to_string()))?;
        let edges = edges
            .split(',')
            .map(str::trim)
            .filter(|edge| !edge.is_empty())
            .map(|edge| {
                edge.parse::<EdgeLabel>()
                    .map_err(|_| PieceSpecError::Edge(edge.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { piece_id, edges })
    }
}

/// Step of the registration sequence that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedStep {
    CreatePuzzle,
    AddPiece(PieceId),
}

impl fmt::Display for FailedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailedStep::CreatePuzzle => write!(f, "creating puzzle failed"),
            FailedStep::AddPiece(id) => write!(f, "adding piece {id} failed"),
        }
    }
}

/// Registration stopped early. Anything already stored stays stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{step}: {source} ({added} pieces added before the failure)")]
pub struct RegistrationError {
    pub step: FailedStep,
    pub added: usize,
    pub source: ApiError,
}

/// Outcome of a complete registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReport {
    pub puzzle: String,
    pub pieces_added: usize,
}

/// Creates `puzzle`, then adds `pieces` one at a time, in order.
///
/// Each add is awaited before the next one is sent. The first failure stops
/// the sequence; the puzzle and any pieces already added are not removed.
pub async fn register_puzzle<T: Transport>(
    client: &Client<T>,
    puzzle: &NewPuzzle,
    pieces: &[PieceSpec],
) -> Result<RegistrationReport, RegistrationError> {
    if pieces.len() > puzzle.total_pieces as usize {
        log::warn!(
            "{} pieces given for {}, which declares {}",
            pieces.len(),
            puzzle.name,
            puzzle.total_pieces
        );
    }

    client
        .create_puzzle(puzzle)
        .await
        .map_err(|source| RegistrationError {
            step: FailedStep::CreatePuzzle,
            added: 0,
            source,
        })?;
    log::info!("created puzzle {} ({} pieces)", puzzle.name, puzzle.total_pieces);

    for (added, spec) in pieces.iter().enumerate() {
        let piece = NewPiece {
            puzzle_name: puzzle.name.clone(),
            piece_id: spec.piece_id,
            edges: spec.edges.clone(),
        };
        client
            .add_piece(&piece)
            .await
            .map_err(|source| RegistrationError {
                step: FailedStep::AddPiece(spec.piece_id),
                added,
                source,
            })?;
        log::info!("added piece {} to {}", spec.piece_id, puzzle.name);
    }

    Ok(RegistrationReport {
        puzzle: puzzle.name.clone(),
        pieces_added: pieces.len(),
    })
}
