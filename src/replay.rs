//! Re-deriving the boards along a solution path, for display layers.

use crate::error::{PuzzleError, Result};
use crate::state::{Move, State};

/// Every state along `path`: the initial state first, then one per move.
///
/// # Errors
///
/// [`PuzzleError::IllegalMove`] naming the first step that cannot be applied.
pub fn replay(initial: &State, path: &[Move]) -> Result<Vec<State>> {
    let mut states = Vec::with_capacity(path.len() + 1);
    states.push(initial.clone());
    for (step, mv) in path.iter().enumerate() {
        let next = states[step]
            .apply(mv)
            .ok_or(PuzzleError::IllegalMove { step, mv: *mv })?;
        states.push(next);
    }
    Ok(states)
}

/// The state after the first `step` moves of `path` (`step == 0` is the initial state).
pub fn state_at(initial: &State, path: &[Move], step: usize) -> Result<State> {
    let mut state = initial.clone();
    for (i, mv) in path.iter().take(step).enumerate() {
        state = state
            .apply(mv)
            .ok_or(PuzzleError::IllegalMove { step: i, mv: *mv })?;
    }
    Ok(state)
}

/// Weighted cost of `path` from `initial`: the sum of the moved vehicles' lengths.
pub fn path_cost(initial: &State, path: &[Move]) -> Result<u32> {
    let states = replay(initial, path)?;
    Ok(path
        .iter()
        .zip(&states)
        .filter_map(|(mv, state)| state.move_cost(mv))
        .sum())
}
