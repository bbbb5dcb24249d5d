use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use rush_hour::{puzzles, State};

fn walk(start: &State, choices: &[usize]) -> Vec<State> {
    let mut states = vec![start.clone()];
    for &choice in choices {
        let current = states.last().unwrap();
        let moves = current.legal_moves();
        if moves.is_empty() {
            break;
        }
        let next = current.apply(&moves[choice % moves.len()]).unwrap();
        states.push(next);
    }
    states
}

fn start(index: usize) -> State {
    let catalogue = puzzles::catalogue();
    catalogue[index % catalogue.len()].state().unwrap()
}

proptest! {
    #[test]
    fn random_walks_stay_valid(puzzle in 0usize..8, choices in prop::collection::vec(any::<usize>(), 0..40)) {
        for state in walk(&start(puzzle), &choices) {
            // Rebuilding from the moved vehicles re-runs every layout check.
            let rebuilt = State::new(state.vehicles().to_vec()).unwrap();
            prop_assert_eq!(rebuilt.canonical_key(), state.canonical_key());
            prop_assert_eq!(state.target().id(), start(puzzle).target().id());
            for mv in state.legal_moves() {
                prop_assert!(state.is_legal(&mv));
                prop_assert!(state.move_cost(&mv).is_some());
            }
        }
    }

    #[test]
    fn reversed_move_restores_the_state(puzzle in 0usize..8, choices in prop::collection::vec(any::<usize>(), 1..30)) {
        for state in walk(&start(puzzle), &choices) {
            for mv in state.legal_moves() {
                let next = state.apply(&mv).unwrap();
                prop_assert_ne!(next.canonical_key(), state.canonical_key());
                let back = next.apply(&mv.reversed()).unwrap();
                prop_assert_eq!(back.canonical_key(), state.canonical_key());
                prop_assert_eq!(&back, &state);
            }
        }
    }

    #[test]
    fn key_ignores_vehicle_order(puzzle in 0usize..8, seed in any::<u64>()) {
        let state = start(puzzle);
        let mut vehicles = state.vehicles().to_vec();
        vehicles.shuffle(&mut StdRng::seed_from_u64(seed));
        let shuffled = State::new(vehicles).unwrap();
        prop_assert_eq!(shuffled.canonical_key(), state.canonical_key());
        prop_assert_eq!(shuffled.to_string(), state.to_string());
    }
}
