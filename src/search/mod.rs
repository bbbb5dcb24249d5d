//! State-space search over board states.
//!
//! All four strategies share one expansion loop and differ only in their
//! frontier and in how a successor is prioritised:
//!
//! | Algorithm | Frontier | Priority                       |
//! |-----------|----------|--------------------------------|
//! | BFS       | FIFO     | none                           |
//! | DFS       | LIFO     | none, depth-capped             |
//! | UCS       | min-heap | cost so far                    |
//! | A*        | min-heap | cost so far + [`Heuristic`]    |
//!
//! The cost of a move is the length of the vehicle moved. A state may sit in
//! the frontier several times; it is expanded only the first time it is popped.

mod frontier;
mod worker;

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::heuristic::Heuristic;
use crate::state::{Move, State, StateKey};

use self::frontier::{Entry, Fifo, Frontier, Lifo, Priority};

pub use self::worker::BackgroundSearch;

/// Default cap on DFS depth. Branches deeper than this are pruned, not failed.
pub const DEFAULT_DEPTH_LIMIT: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum Algorithm {
    /// Breadth-first: fewest moves.
    Bfs,
    /// Depth-first: first solution found.
    Dfs,
    /// Uniform-cost: cheapest weighted cost.
    Ucs,
    /// A*: uniform-cost guided by a heuristic.
    #[value(name = "astar")]
    AStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Ucs,
        Algorithm::AStar,
    ];
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::Bfs => "BFS",
            Algorithm::Dfs => "DFS",
            Algorithm::Ucs => "UCS",
            Algorithm::AStar => "A*",
        })
    }
}

/// Tunables shared by every search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// DFS only.
    pub depth_limit: usize,
    /// A* only.
    pub heuristic: Heuristic,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth_limit: DEFAULT_DEPTH_LIMIT,
            heuristic: Heuristic::default(),
        }
    }
}

/// How a search ended. "No solution" and "canceled" are ordinary outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchResult {
    Solved {
        cost: u32,
        nodes_expanded: usize,
        path: Vec<Move>,
    },
    NoSolution {
        nodes_expanded: usize,
    },
    Canceled {
        nodes_expanded: usize,
    },
}

impl SearchResult {
    pub fn nodes_expanded(&self) -> usize {
        match self {
            SearchResult::Solved { nodes_expanded, .. }
            | SearchResult::NoSolution { nodes_expanded }
            | SearchResult::Canceled { nodes_expanded } => *nodes_expanded,
        }
    }

    pub fn path(&self) -> Option<&[Move]> {
        match self {
            SearchResult::Solved { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn cost(&self) -> Option<u32> {
        match self {
            SearchResult::Solved { cost, .. } => Some(*cost),
            _ => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, SearchResult::Solved { .. })
    }
}

/// Cooperative cancellation flag, polled once per expansion.
///
/// Clones share the same flag, so one can be handed to a worker thread and
/// the other kept by whoever may want to stop it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A search result plus what it took to get it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub algorithm: Algorithm,
    pub result: SearchResult,
    pub elapsed: Duration,
    /// Largest number of entries the frontier held at once.
    pub peak_frontier: usize,
}

// Parent links for every generated successor, so paths are rebuilt once at the end
// instead of being copied into each frontier entry.
#[derive(Debug, Default)]
struct SearchTree {
    nodes: Vec<(Option<usize>, Move)>,
}

impl SearchTree {
    fn push(&mut self, parent: Option<usize>, mv: Move) -> usize {
        self.nodes.push((parent, mv));
        self.nodes.len() - 1
    }

    fn path_to(&self, mut node: Option<usize>) -> Vec<Move> {
        let mut path = Vec::new();
        while let Some(i) = node {
            let (parent, mv) = self.nodes[i];
            path.push(mv);
            node = parent;
        }
        path.reverse();
        path
    }
}

fn explore(
    initial: &State,
    mut frontier: impl Frontier,
    cancel: &CancelToken,
    depth_limit: usize,
    priority: impl Fn(u32, &State) -> u32,
) -> (SearchResult, usize) {
    if cancel.is_canceled() {
        return (SearchResult::Canceled { nodes_expanded: 0 }, 0);
    }
    if initial.is_goal() {
        let solved = SearchResult::Solved {
            cost: 0,
            nodes_expanded: 0,
            path: Vec::new(),
        };
        return (solved, 0);
    }

    let mut tree = SearchTree::default();
    let mut visited: HashSet<StateKey> = HashSet::new();
    let mut nodes_expanded = 0;

    let start = Entry {
        state: initial.clone(),
        node: None,
        cost: 0,
        depth: 0,
    };
    frontier.push(start, priority(0, initial));
    let mut peak_frontier = frontier.len();

    loop {
        if cancel.is_canceled() {
            debug!("Search canceled after {nodes_expanded} expansions");
            return (SearchResult::Canceled { nodes_expanded }, peak_frontier);
        }
        let Some(entry) = frontier.pop() else {
            break;
        };
        if !visited.insert(entry.state.canonical_key()) {
            continue;
        }
        nodes_expanded += 1;

        if entry.state.is_goal() {
            let solved = SearchResult::Solved {
                cost: entry.cost,
                nodes_expanded,
                path: tree.path_to(entry.node),
            };
            return (solved, peak_frontier);
        }
        if entry.depth >= depth_limit {
            continue;
        }

        for mv in entry.state.legal_moves() {
            let successor = entry.state.apply(&mv).zip(entry.state.move_cost(&mv));
            let Some((next, step_cost)) = successor else {
                continue;
            };
            if visited.contains(&next.canonical_key()) {
                continue;
            }
            let cost = entry.cost + step_cost;
            let node = tree.push(entry.node, mv);
            let rank = priority(cost, &next);
            frontier.push(
                Entry {
                    state: next,
                    node: Some(node),
                    cost,
                    depth: entry.depth + 1,
                },
                rank,
            );
        }
        peak_frontier = peak_frontier.max(frontier.len());
    }

    (SearchResult::NoSolution { nodes_expanded }, peak_frontier)
}

/// Runs searches with a fixed [`SearchConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Solver {
    config: SearchConfig,
}

impl Solver {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search from `initial` with `algorithm`, timing the run.
    pub fn run(&self, initial: &State, algorithm: Algorithm, cancel: &CancelToken) -> SearchReport {
        debug!(
            "Starting {algorithm} search from {} ({} vehicles)",
            initial.canonical_key(),
            initial.vehicles().len()
        );
        let started = Instant::now();

        let (result, peak_frontier) = match algorithm {
            Algorithm::Bfs => explore(initial, Fifo::default(), cancel, usize::MAX, |_, _| 0),
            Algorithm::Dfs => explore(
                initial,
                Lifo::default(),
                cancel,
                self.config.depth_limit,
                |_, _| 0,
            ),
            Algorithm::Ucs => explore(
                initial,
                Priority::default(),
                cancel,
                usize::MAX,
                |cost, _| cost,
            ),
            Algorithm::AStar => {
                let heuristic = self.config.heuristic;
                explore(
                    initial,
                    Priority::default(),
                    cancel,
                    usize::MAX,
                    move |cost, state| cost + heuristic.estimate(state),
                )
            }
        };

        let elapsed = started.elapsed();
        debug!(
            "{algorithm} finished in {:.3}s: {:?} ({} expanded, peak frontier {peak_frontier})",
            elapsed.as_secs_f64(),
            result.cost(),
            result.nodes_expanded()
        );
        SearchReport {
            algorithm,
            result,
            elapsed,
            peak_frontier,
        }
    }

    pub fn bfs(&self, initial: &State, cancel: &CancelToken) -> SearchResult {
        self.run(initial, Algorithm::Bfs, cancel).result
    }

    pub fn dfs(&self, initial: &State, cancel: &CancelToken) -> SearchResult {
        self.run(initial, Algorithm::Dfs, cancel).result
    }

    pub fn ucs(&self, initial: &State, cancel: &CancelToken) -> SearchResult {
        self.run(initial, Algorithm::Ucs, cancel).result
    }

    /// Best-effort unless the configured heuristic is admissible.
    pub fn astar(&self, initial: &State, cancel: &CancelToken) -> SearchResult {
        self.run(initial, Algorithm::AStar, cancel).result
    }
}

/// Search with the default configuration.
pub fn search(initial: &State, algorithm: Algorithm, cancel: &CancelToken) -> SearchResult {
    Solver::default().run(initial, algorithm, cancel).result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::parse_map;
    use crate::vehicle::{Direction, VehicleId};

    fn mv(id: &str, direction: Direction) -> Move {
        Move::new(VehicleId::new(id).unwrap(), direction)
    }

    #[test]
    fn tree_rebuilds_paths() {
        let mut tree = SearchTree::default();
        let a = tree.push(None, mv("A", Direction::Up));
        let b = tree.push(Some(a), mv("X", Direction::Right));
        let _sibling = tree.push(Some(a), mv("B", Direction::Left));
        assert_eq!(
            tree.path_to(Some(b)),
            [mv("A", Direction::Up), mv("X", Direction::Right)]
        );
        assert!(tree.path_to(None).is_empty());
    }

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_canceled());
        token.cancel();
        assert!(other.is_canceled());
    }

    #[test]
    fn straight_road_costs_vehicle_length_per_step() {
        let state = parse_map("X, 2, 0, 3, H, 1").unwrap();
        for algorithm in Algorithm::ALL {
            let result = search(&state, algorithm, &CancelToken::new());
            assert_eq!(
                result.path().map(<[Move]>::len),
                Some(2),
                "{algorithm}: {result:?}"
            );
            assert_eq!(result.cost(), Some(6), "{algorithm}");
        }
    }

    #[test]
    fn depth_limit_prunes_dfs() {
        let state = parse_map("X, 2, 0, 2, H, 1").unwrap();
        let shallow = Solver::new(SearchConfig {
            depth_limit: 2,
            ..SearchConfig::default()
        });
        let result = shallow.dfs(&state, &CancelToken::new());
        assert_eq!(result, SearchResult::NoSolution { nodes_expanded: 3 });

        let deep = Solver::new(SearchConfig {
            depth_limit: 3,
            ..SearchConfig::default()
        });
        assert!(deep.dfs(&state, &CancelToken::new()).is_solved());
    }

    // BFS frontier that trips the token on its `after`-th pop.
    struct CancelAfter {
        inner: Fifo,
        token: CancelToken,
        pops: usize,
        after: usize,
    }

    impl Frontier for CancelAfter {
        fn push(&mut self, entry: Entry, priority: u32) {
            self.inner.push(entry, priority);
        }

        fn pop(&mut self) -> Option<Entry> {
            self.pops += 1;
            if self.pops == self.after {
                self.token.cancel();
            }
            self.inner.pop()
        }

        fn len(&self) -> usize {
            self.inner.len()
        }
    }

    #[test]
    fn cancel_mid_search_keeps_the_expansion_count() {
        let state = crate::puzzles::by_name("classic").unwrap().state().unwrap();
        let token = CancelToken::new();
        let frontier = CancelAfter {
            inner: Fifo::default(),
            token: token.clone(),
            pops: 0,
            after: 3,
        };
        // The start and two of its successors are expanded before the check fires.
        let (result, _) = explore(&state, frontier, &token, usize::MAX, |_, _| 0);
        assert_eq!(result, SearchResult::Canceled { nodes_expanded: 3 });
    }

    #[test]
    fn reported_cost_matches_the_path() {
        let state = crate::puzzles::by_name("one-blocker").unwrap().state().unwrap();
        for algorithm in Algorithm::ALL {
            let result = search(&state, algorithm, &CancelToken::new());
            let path = result.path().unwrap();
            assert_eq!(
                result.cost(),
                Some(crate::replay::path_cost(&state, path).unwrap()),
                "{algorithm}"
            );
        }
    }

    #[test]
    fn result_serializes_with_an_outcome_tag() {
        let json = serde_json::to_value(SearchResult::NoSolution { nodes_expanded: 6 }).unwrap();
        assert_eq!(json["outcome"], "no_solution");
        assert_eq!(json["nodes_expanded"], 6);
    }
}
