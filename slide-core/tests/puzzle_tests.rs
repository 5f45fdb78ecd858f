// slide-core/tests/puzzle_tests.rs
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use slide_core::{scramble, GameSession, PuzzleState};

// Helper to build a solved puzzle whose bitmaps are just their own indices
fn solved_puzzle(grid_size: usize) -> PuzzleState<usize> {
    PuzzleState::initialize((0..grid_size * grid_size).collect(), grid_size)
        .expect("Failed to initialize puzzle")
}

// Routes log output through the test harness; safe to call from every test
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// Classic solvability check for N×N sliding puzzles with the gap resting in the last
// cell: the permutation parity (gap counted as the last tile) must equal the parity of
// the gap's taxicab distance from home.
fn is_solvable(state: &PuzzleState<usize>) -> bool {
    let n = state.grid_size();
    let last = n * n - 1;
    let perm: Vec<usize> = state
        .arrangement()
        .into_iter()
        .map(|cell| cell.unwrap_or(last))
        .collect();

    let mut seen = vec![false; perm.len()];
    let mut transpositions = 0;
    for start in 0..perm.len() {
        if seen[start] {
            continue;
        }
        let mut len = 0;
        let mut i = start;
        while !seen[i] {
            seen[i] = true;
            i = perm[i];
            len += 1;
        }
        transpositions += len - 1;
    }

    let gap = state.empty_index();
    let distance = (n - 1 - gap / n) + (n - 1 - gap % n);
    transpositions % 2 == distance % 2
}

#[test]
fn test_solvability_helper_on_reachable_states() {
    let mut state = solved_puzzle(3);
    assert!(is_solvable(&state));
    // Walk the gap around a 2x2 block: that is a 3-cycle, still solvable.
    for index in [7, 4, 5, 8] {
        assert!(state.slide(index));
    }
    assert!(is_solvable(&state));
}

#[test]
fn test_reversing_the_walk_returns_to_solved() {
    init_logging();
    let mut state = solved_puzzle(4);
    let mut rng = StdRng::seed_from_u64(2024);
    let mut gaps = Vec::new();
    for _ in 0..300 {
        let gap = state.empty_index();
        let index = *state
            .legal_moves_from_empty()
            .choose(&mut rng)
            .expect("gap always has neighbours");
        assert!(state.slide(index));
        gaps.push(gap);
    }
    for gap in gaps.into_iter().rev() {
        assert!(state.slide(gap));
    }
    assert!(state.is_solved());
}

#[test]
fn test_double_slide_is_identity() {
    let mut state = solved_puzzle(5);
    scramble(&mut state, 40, &mut StdRng::seed_from_u64(3));
    for index in state.legal_moves_from_empty() {
        let before = state.arrangement();
        let gap = state.empty_index();
        assert!(state.slide(index));
        assert!(state.slide(gap));
        assert_eq!(state.arrangement(), before);
    }
}

#[test]
fn test_session_scenario_three_by_three() {
    init_logging();
    let mut state = solved_puzzle(3);
    assert!(state.is_solved());
    assert_eq!(state.empty_index(), 8);
    for slot in state.slots().take(8) {
        assert_eq!(slot.occupant.map(|t| t.correct_index()), Some(slot.index));
    }
    assert!(state.slide(7));
    assert!(!state.is_solved());
    assert!(state.slide(8));
    assert!(state.is_solved());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_fresh_puzzle_is_solved(grid_size in 2usize..8) {
        let state = solved_puzzle(grid_size);
        prop_assert!(state.is_solved());
        prop_assert_eq!(state.move_count(), 0);
    }

    #[test]
    fn prop_scramble_preserves_tiles_and_solvability(
        grid_size in 2usize..7,
        steps in 0usize..400,
        seed in any::<u64>(),
    ) {
        let mut state = solved_puzzle(grid_size);
        let ids_before = state.tile_ids();
        scramble(&mut state, steps, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(state.tile_ids(), ids_before);
        prop_assert_eq!(state.arrangement().iter().filter(|c| c.is_none()).count(), 1);
        prop_assert!(is_solvable(&state));
        prop_assert_eq!(state.move_count(), 0);
        if steps == 0 {
            prop_assert!(state.is_solved());
        } else {
            prop_assert!(!state.is_solved());
        }
    }

    #[test]
    fn prop_can_move_matches_adjacency(
        grid_size in 2usize..7,
        seed in any::<u64>(),
        target in 0usize..64,
    ) {
        let mut state = solved_puzzle(grid_size);
        scramble(&mut state, 25, &mut StdRng::seed_from_u64(seed));
        let gap = state.empty_index();
        let (gr, gc) = (gap / grid_size, gap % grid_size);
        let (tr, tc) = (target / grid_size, target % grid_size);
        let adjacent = target < grid_size * grid_size && gr.abs_diff(tr) + gc.abs_diff(tc) == 1;
        prop_assert_eq!(state.can_move(target), adjacent);
    }

    #[test]
    fn prop_session_moves_only_count_when_accepted(
        seed in any::<u64>(),
        taps in proptest::collection::vec(0usize..16, 0..60),
    ) {
        let mut session = GameSession::with_seed((0..16).collect::<Vec<usize>>(), 4, seed)
            .expect("valid session");
        let mut accepted = 0;
        for tap in taps {
            let legal = session.can_move(tap) && !session.is_solved();
            let outcome = session.move_tile(tap);
            prop_assert_eq!(outcome.accepted, legal);
            if outcome.accepted {
                accepted += 1;
            }
        }
        prop_assert_eq!(session.move_count(), accepted);
    }
}
