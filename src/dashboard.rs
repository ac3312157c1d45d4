//! Selection state: which puzzle is shown and what is known about it.
//!
//! Selecting a puzzle hands out a `Ticket` carrying a generation number.
//! The fetch result must be delivered with that ticket; results for an older
//! generation are dropped, so a slow response for a previous selection can
//! never replace the current one.

use crate::api::{ApiError, Client, FetchedSolution};
use crate::geometry::DirectionTable;
use crate::layout::{layout, Layout};
use crate::pieces::{PieceCatalog, PieceId, Solution};
use crate::transport::Transport;

/// Permission to deliver one fetch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    pub puzzle: String,
    pub start_piece: Option<PieceId>,
}

/// A fetched solution with its computed layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub solution: Solution,
    pub pieces: PieceCatalog,
    pub layout: Layout,
}

impl Board {
    pub fn new(fetched: FetchedSolution, table: &DirectionTable) -> Self {
        let layout = layout(&fetched.solution, table);
        Self {
            solution: fetched.solution,
            pieces: fetched.pieces,
            layout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Nothing selected.
    Idle,
    Loading,
    Failed(String),
    Ready(Box<Board>),
}

/// Whether a delivered result was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Applied,
    Stale,
}

pub struct Dashboard {
    table: DirectionTable,
    generation: u64,
    selected: Option<String>,
    state: ViewState,
}

impl Dashboard {
    pub fn new(table: DirectionTable) -> Self {
        Self {
            table,
            generation: 0,
            selected: None,
            state: ViewState::Idle,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ViewState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn board(&self) -> Option<&Board> {
        match &self.state {
            ViewState::Ready(board) => Some(board),
            _ => None,
        }
    }

    /// Selects a puzzle and returns the ticket its fetch must be delivered
    /// with. An empty name clears the selection instead.
    pub fn select(&mut self, puzzle: &str, start_piece: Option<PieceId>) -> Option<Ticket> {
        if puzzle.trim().is_empty() {
            self.clear();
            return None;
        }
        self.generation += 1;
        self.selected = Some(puzzle.to_string());
        self.state = ViewState::Loading;
        Some(Ticket {
            generation: self.generation,
            puzzle: puzzle.to_string(),
            start_piece,
        })
    }

    /// Drops the selection and anything fetched for it. Outstanding tickets
    /// become stale.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.selected = None;
        self.state = ViewState::Idle;
    }

    /// Delivers a fetch result. The layout is recomputed from scratch for
    /// every applied solution.
    pub fn deliver(&mut self, ticket: &Ticket, result: Result<FetchedSolution, ApiError>) -> Delivery {
        if ticket.generation != self.generation {
            log::debug!(
                "dropping stale result for {} (generation {} < {})",
                ticket.puzzle,
                ticket.generation,
                self.generation
            );
            return Delivery::Stale;
        }

        self.state = match result {
            Ok(fetched) => {
                let board = Board::new(fetched, &self.table);
                log::info!(
                    "laid out {}: {} pieces, {} unmapped edges, {} conflicts",
                    board.solution.puzzle_name,
                    board.layout.coordinates.len(),
                    board.layout.stats.unmapped_edges,
                    board.layout.stats.conflicts
                );
                ViewState::Ready(Box::new(board))
            }
            Err(err) => ViewState::Failed(err.to_string()),
        };
        Delivery::Applied
    }

    /// Selects `puzzle`, fetches it, and delivers the result. A blank name
    /// fails without touching the network.
    pub async fn load<T: Transport>(
        &mut self,
        client: &Client<T>,
        puzzle: &str,
        start_piece: Option<PieceId>,
    ) -> Delivery {
        let Some(ticket) = self.select(puzzle, start_piece) else {
            self.state = ViewState::Failed(ApiError::EmptyName.to_string());
            return Delivery::Applied;
        };
        let result = client.fetch_solution(&ticket.puzzle, ticket.start_piece).await;
        self.deliver(&ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::{Component, Connection};
    use crate::transport::mock::MockTransport;

    fn fetched(name: &str) -> FetchedSolution {
        FetchedSolution {
            solution: Solution {
                puzzle_name: name.to_string(),
                components: vec![Component {
                    start_piece: 1,
                    connections: vec![Connection {
                        piece_id: 2,
                        edge_id: 501,
                        from_piece_id: Some(1),
                    }],
                }],
            },
            pieces: PieceCatalog::new(),
        }
    }

    #[test]
    fn test_select_then_deliver() {
        let mut dashboard = Dashboard::new(DirectionTable::default());
        let ticket = dashboard.select("castle", None).unwrap();
        assert!(dashboard.is_loading());

        assert_eq!(dashboard.deliver(&ticket, Ok(fetched("castle"))), Delivery::Applied);
        let board = dashboard.board().unwrap();
        assert_eq!(board.layout.coordinates.get(2), Some((0, -1)));
        assert!(!dashboard.is_loading());
    }

    #[test]
    fn test_stale_result_is_ignored() {
        let mut dashboard = Dashboard::new(DirectionTable::default());
        let first = dashboard.select("first", None).unwrap();
        let second = dashboard.select("second", None).unwrap();

        assert_eq!(dashboard.deliver(&second, Ok(fetched("second"))), Delivery::Applied);
        // the slow response for the earlier selection arrives last
        assert_eq!(dashboard.deliver(&first, Ok(fetched("first"))), Delivery::Stale);
        assert_eq!(dashboard.board().unwrap().solution.puzzle_name, "second");
        assert_eq!(dashboard.selected(), Some("second"));
    }

    #[test]
    fn test_error_clears_loading_and_shows_no_board() {
        let mut dashboard = Dashboard::new(DirectionTable::default());
        let ticket = dashboard.select("castle", None).unwrap();
        dashboard.deliver(&ticket, Ok(fetched("castle")));

        let ticket = dashboard.select("ghost", None).unwrap();
        dashboard.deliver(
            &ticket,
            Err(ApiError::Remote {
                status: 404,
                message: "puzzle not found".to_string(),
            }),
        );

        assert!(!dashboard.is_loading());
        assert!(dashboard.board().is_none());
        assert_eq!(dashboard.error(), Some("puzzle not found"));
    }

    #[test]
    fn test_clear_discards_everything() {
        let mut dashboard = Dashboard::new(DirectionTable::default());
        let ticket = dashboard.select("castle", None).unwrap();
        dashboard.clear();

        assert_eq!(dashboard.deliver(&ticket, Ok(fetched("castle"))), Delivery::Stale);
        assert_eq!(dashboard.state(), &ViewState::Idle);
        assert_eq!(dashboard.selected(), None);
        assert!(dashboard.select("", None).is_none());
    }

    #[test]
    fn test_load_with_blank_name_reports_error() {
        let client = Client::new(MockTransport::new());
        let mut dashboard = Dashboard::new(DirectionTable::default());
        let ticket = dashboard.select("castle", None).unwrap();

        let delivery = pollster::block_on(dashboard.load(&client, "  ", None));
        assert_eq!(delivery, Delivery::Applied);
        assert_eq!(dashboard.error(), Some("puzzle name is empty"));
        assert_eq!(dashboard.selected(), None);
        assert!(!dashboard.is_loading());
        assert!(client.transport().requests.borrow().is_empty());
        // the earlier selection is gone too
        assert_eq!(dashboard.deliver(&ticket, Ok(fetched("castle"))), Delivery::Stale);
    }

    #[test]
    fn test_load_through_client() {
        let client = Client::new(
            MockTransport::new()
                .reply(
                    "/api/solution/castle",
                    200,
                    r#"{"puzzle_name": "castle", "components": [{"start_piece": 5, "connections": []}]}"#,
                )
                .reply(
                    "/api/puzzle/castle/pieces",
                    200,
                    r#"{"puzzle_name": "castle", "pieces": [{"piece_id": 5, "edges": [502]}]}"#,
                ),
        );
        let mut dashboard = Dashboard::new(DirectionTable::default());

        let delivery = pollster::block_on(dashboard.load(&client, "castle", None));
        assert_eq!(delivery, Delivery::Applied);
        let board = dashboard.board().unwrap();
        assert_eq!(board.layout.coordinates.get(5), Some((0, 0)));
        assert_eq!(board.pieces.edges(5), &[502]);
    }
}
