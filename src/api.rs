//! Typed client for the puzzle service.
//!
//! Routes:
//! - `GET  /api/puzzles`
//! - `GET  /api/solution/{name}[?start_piece_id=ID]`
//! - `GET  /api/puzzle/{name}/pieces`
//! - `POST /api/puzzle`  `{ name, total_pieces }`
//! - `POST /api/piece`   `{ puzzle_name, piece_id, edges }`
//!
//! The service reports failures with an `{ "error": "..." }` body, either with
//! an error status or, for some write routes, with a success status.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pieces::{EdgeLabel, PieceCatalog, PieceId, PieceRecord, Solution};
use crate::transport::{Endpoint, Reply, Transport};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("puzzle name is empty")]
    EmptyName,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    /// The service answered with an error payload or an error status.
    #[error("{message}")]
    Remote { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("base url {0} cannot carry a path")]
    BaseUrl(String),
}

impl ApiError {
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Transport(err.to_string())
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Remote { status: 404, .. })
    }
}

/// Entry of the puzzle list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleSummary {
    pub name: String,
    pub total_pieces: u32,
    #[serde(default)]
    pub current_pieces: u32,
}

#[derive(Debug, Deserialize)]
struct PuzzleList {
    #[serde(default)]
    puzzles: Vec<PuzzleSummary>,
}

#[derive(Debug, Deserialize)]
struct PuzzlePieces {
    #[serde(default)]
    pieces: Vec<PieceRecord>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Body of `POST /api/puzzle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPuzzle {
    pub name: String,
    pub total_pieces: u32,
}

/// Body of `POST /api/piece`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPiece {
    pub puzzle_name: String,
    pub piece_id: PieceId,
    pub edges: Vec<EdgeLabel>,
}

/// A solution together with the edge labels of its puzzle's pieces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedSolution {
    pub solution: Solution,
    pub pieces: PieceCatalog,
}

/// Extracts the service's error message from a body, if it has one.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|payload| payload.error)
}

/// Turns a reply into `T`, mapping error payloads and statuses to `ApiError`.
fn decode<T: DeserializeOwned>(reply: Reply, fallback: &str) -> Result<T, ApiError> {
    if let Some(message) = error_message(&reply.body) {
        return Err(ApiError::Remote {
            status: reply.status,
            message,
        });
    }
    if !reply.is_success() {
        return Err(ApiError::Remote {
            status: reply.status,
            message: format!("{fallback} (status {})", reply.status),
        });
    }
    serde_json::from_str(&reply.body).map_err(|err| ApiError::Decode(err.to_string()))
}

fn require_name(name: &str) -> Result<&str, ApiError> {
    if name.trim().is_empty() {
        Err(ApiError::EmptyName)
    } else {
        Ok(name)
    }
}

/// Puzzle service client over any `Transport`.
pub struct Client<T> {
    transport: T,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Lists every puzzle the service knows about.
    pub async fn list_puzzles(&self) -> Result<Vec<PuzzleSummary>, ApiError> {
        let reply = self.transport.get(&Endpoint::new(["api", "puzzles"])).await?;
        let list: PuzzleList = decode(reply, "error loading puzzles")?;
        Ok(list.puzzles)
    }

    /// Fetches the solution graph of `name`, optionally anchored at a
    /// preferred start piece.
    pub async fn solution(&self, name: &str, start_piece: Option<PieceId>) -> Result<Solution, ApiError> {
        let name = require_name(name)?;
        let mut endpoint = Endpoint::new(["api", "solution", name]);
        if let Some(start) = start_piece {
            endpoint = endpoint.with_query("start_piece_id", start);
        }
        let reply = self.transport.get(&endpoint).await?;
        decode(reply, "error loading solution")
    }

    /// Fetches the edge labels of every piece in `name`.
    pub async fn pieces(&self, name: &str) -> Result<PieceCatalog, ApiError> {
        let name = require_name(name)?;
        let reply = self
            .transport
            .get(&Endpoint::new(["api", "puzzle", name, "pieces"]))
            .await?;
        let pieces: PuzzlePieces = decode(reply, "error loading piece details")?;
        Ok(pieces.pieces.into_iter().collect())
    }

    /// Fetches a solution and then the pieces of the puzzle it names.
    ///
    /// Either request failing fails the whole fetch; no partial result is
    /// returned.
    pub async fn fetch_solution(
        &self,
        name: &str,
        start_piece: Option<PieceId>,
    ) -> Result<FetchedSolution, ApiError> {
        let solution = self.solution(name, start_piece).await?;
        let pieces = self.pieces(&solution.puzzle_name).await?;
        log::info!(
            "fetched {}: {} components, {} pieces",
            solution.puzzle_name,
            solution.components.len(),
            pieces.len()
        );
        Ok(FetchedSolution { solution, pieces })
    }

    /// Registers a new puzzle. Returns whatever the service echoes back.
    pub async fn create_puzzle(&self, puzzle: &NewPuzzle) -> Result<serde_json::Value, ApiError> {
        require_name(&puzzle.name)?;
        let body = serde_json::to_value(puzzle).map_err(|err| ApiError::Decode(err.to_string()))?;
        let reply = self.transport.post(&Endpoint::new(["api", "puzzle"]), &body).await?;
        decode(reply, "error creating puzzle")
    }

    /// Adds one piece to an existing puzzle.
    pub async fn add_piece(&self, piece: &NewPiece) -> Result<serde_json::Value, ApiError> {
        require_name(&piece.puzzle_name)?;
        let body = serde_json::to_value(piece).map_err(|err| ApiError::Decode(err.to_string()))?;
        let reply = self.transport.post(&Endpoint::new(["api", "piece"]), &body).await?;
        decode(reply, "error adding piece")
    }
}
