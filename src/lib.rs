//! Rush Hour solver.
//!
//! Vehicles of length 2 or 3 sit on a 6x6 board and slide along their own
//! axis. The puzzle is solved once the target vehicle, horizontal on row 2,
//! reaches column 4 with its front. This crate validates layouts, generates
//! legal moves and finds solutions with BFS, depth-capped DFS, uniform-cost
//! search (moves weighted by vehicle length) or A*.
//!
//! ```
//! use rush_hour::{map, search, Algorithm, CancelToken};
//!
//! let state = map::parse_map("X, 2, 0, 2, H, 1\nA, 1, 4, 2, V, 0").unwrap();
//! let result = search(&state, Algorithm::Ucs, &CancelToken::new());
//! assert_eq!(result.cost(), Some(8));
//! ```

pub mod error;
pub mod heuristic;
pub mod map;
pub mod puzzles;
pub mod render;
pub mod replay;
pub mod search;
pub mod state;
pub mod vehicle;

pub use error::{PuzzleError, Result};
pub use heuristic::Heuristic;
pub use replay::replay;
pub use search::{
    search, Algorithm, BackgroundSearch, CancelToken, SearchConfig, SearchReport, SearchResult,
    Solver,
};
pub use state::{Move, State, StateKey};
pub use vehicle::{Direction, Orientation, Vehicle, VehicleId, BOARD_SIZE};
