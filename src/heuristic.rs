//! Remaining-cost estimates for A*.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::state::State;
use crate::vehicle::{Orientation, Vehicle, VehicleId, BOARD_SIZE};

/// Which estimate A* adds to the cost so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum Heuristic {
    /// Count of "X blocks Y" relations reachable from the target's exit route.
    /// Can overestimate, so A* results are best-effort.
    #[default]
    #[value(name = "chain")]
    BlockingChain,
    /// Distinct vehicles between the target and the right edge. Never
    /// overestimates the weighted cost, so A* stays cost-optimal.
    #[value(name = "blockers")]
    DirectBlockers,
}

impl Heuristic {
    pub fn estimate(&self, state: &State) -> u32 {
        match self {
            Heuristic::BlockingChain => blocking_chain(state),
            Heuristic::DirectBlockers => direct_blockers(state),
        }
    }

    pub fn is_admissible(&self) -> bool {
        matches!(self, Heuristic::DirectBlockers)
    }
}

// Cells right of the target's front, along its row.
fn exit_route(target: &Vehicle) -> SmallVec<[(usize, usize); BOARD_SIZE]> {
    match target.orientation() {
        Orientation::Horizontal => (target.col() + target.length()..BOARD_SIZE)
            .map(|col| (target.row(), col))
            .collect(),
        Orientation::Vertical => SmallVec::new(),
    }
}

// Cells a blocker hit at `hit` would sweep to get out of the way: `length`
// cells either side of the hit along its own axis, clipped to the board.
fn escape_route(blocker: &Vehicle, hit: (usize, usize)) -> SmallVec<[(usize, usize); BOARD_SIZE]> {
    let reach = blocker.length();
    match blocker.orientation() {
        Orientation::Horizontal => {
            let lo = hit.1.saturating_sub(reach);
            let hi = (hit.1 + reach).min(BOARD_SIZE - 1);
            (lo..=hi).map(|col| (blocker.row(), col)).collect()
        }
        Orientation::Vertical => {
            let lo = hit.0.saturating_sub(reach);
            let hi = (hit.0 + reach).min(BOARD_SIZE - 1);
            (lo..=hi).map(|row| (row, blocker.col())).collect()
        }
    }
}

/// Number of distinct blocking relations found by chasing blockers of blockers,
/// starting from the target's exit route. Each relation is worth 1.
pub fn blocking_chain(state: &State) -> u32 {
    if state.is_goal() {
        return 0;
    }

    let target = state.target();
    let mut relations: HashSet<(VehicleId, VehicleId)> = HashSet::new();
    let mut queue: VecDeque<(&Vehicle, SmallVec<[(usize, usize); BOARD_SIZE]>)> =
        VecDeque::from([(target, exit_route(target))]);
    let mut score = 0;

    while let Some((vehicle, route)) = queue.pop_front() {
        for (row, col) in route {
            let Some(blocker) = state.occupant(row, col) else {
                continue;
            };
            if blocker.id() == vehicle.id() {
                continue;
            }
            if relations.insert((vehicle.id(), blocker.id())) {
                score += 1;
                // The target only ever needs its exit lane cleared.
                let route = if blocker.is_target() {
                    exit_route(blocker)
                } else {
                    escape_route(blocker, (row, col))
                };
                queue.push_back((blocker, route));
            }
        }
    }
    score
}

/// Number of distinct vehicles on the target's row in front of it.
pub fn direct_blockers(state: &State) -> u32 {
    if state.is_goal() {
        return 0;
    }
    let mut blockers: SmallVec<[VehicleId; BOARD_SIZE]> = exit_route(state.target())
        .into_iter()
        .filter_map(|(row, col)| state.occupant(row, col).map(|v| v.id()))
        .collect();
    blockers.dedup();
    blockers.len() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::parse_map;

    #[test]
    fn zero_at_goal() {
        let state = parse_map("X, 2, 4, 2, H, 1\nA, 0, 5, 2, V, 0").unwrap();
        assert_eq!(blocking_chain(&state), 0);
        assert_eq!(direct_blockers(&state), 0);
    }

    #[test]
    fn zero_with_a_clear_road() {
        let state = parse_map("X, 2, 0, 2, H, 1\nA, 3, 2, 3, V, 0").unwrap();
        assert_eq!(blocking_chain(&state), 0);
        assert_eq!(direct_blockers(&state), 0);
    }

    #[test]
    fn chain_follows_blockers_of_blockers() {
        // A blocks X; B stands under A and A is in B's way upwards.
        let state = parse_map(
            "X, 2, 0, 2, H, 1\n\
             A, 1, 4, 2, V, 0\n\
             B, 3, 4, 3, V, 0",
        )
        .unwrap();
        assert_eq!(blocking_chain(&state), 3);
        assert_eq!(direct_blockers(&state), 1);
    }

    #[test]
    fn horizontal_blockers_count_once() {
        let state = parse_map("X, 2, 0, 2, H, 1\nY, 2, 3, 3, H, 0").unwrap();
        assert_eq!(direct_blockers(&state), 1);
        // X blocks Y on the way back as well.
        assert_eq!(blocking_chain(&state), 2);
    }

    #[test]
    fn chained_target_only_clears_its_exit_lane() {
        // Y is boxed in by X, but X's own window would also reach back to Z.
        let state = parse_map("X, 2, 2, 2, H, 1\nY, 2, 4, 2, H, 0\nZ, 2, 0, 2, H, 0").unwrap();
        assert_eq!(blocking_chain(&state), 2);
        assert_eq!(direct_blockers(&state), 1);
    }

    #[test]
    fn estimate_dispatches() {
        let state = parse_map("X, 2, 0, 2, H, 1\nA, 0, 3, 3, V, 0\nB, 1, 5, 2, V, 0").unwrap();
        assert_eq!(Heuristic::DirectBlockers.estimate(&state), 2);
        assert!(Heuristic::BlockingChain.estimate(&state) >= 2);
        assert!(Heuristic::DirectBlockers.is_admissible());
        assert!(!Heuristic::BlockingChain.is_admissible());
    }
}
