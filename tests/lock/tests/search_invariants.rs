//! Step-level invariants and failure semantics of the search driver.
//!
//! Proves:
//! 1. After every step: counters balance, no state is in both node sets,
//!    every discovered state lives in exactly one of them, and every parent
//!    link points at a resident node.
//! 2. Budgets stop the search with the configured limit and the counters so far.
//! 3. Misbehaving collaborators surface as `MalformedCollaborator` naming the
//!    stage, and never as a panic.
//! 4. A failed step leaves both node sets as they were.

use std::time::Duration;

use lock_tests::{reopen_world, MAZE_ROOMS, PUZZLE_MID};
use waypoint_harness::contract::SearchWorld;
use waypoint_harness::worlds::grid_maze::GridMaze;
use waypoint_harness::worlds::sliding_tile::{SlidingTile, TileHeuristic};
use waypoint_search::{
    search, CollaboratorStage, FnProblem, SearchError, SearchPolicy, SearchProblem, SearchStatus,
    Searcher,
};

fn step_until_done<P: SearchProblem>(searcher: &mut Searcher<'_, P>) -> usize {
    let mut steps = 0;
    loop {
        let status = searcher.step();
        let stats = *searcher.stats();
        assert!(stats.is_balanced(), "unbalanced after step {steps}: {stats:?}");
        assert!(searcher.sets_are_disjoint(), "overlap after step {steps}");
        assert_eq!(
            (searcher.open().len() + searcher.closed().len()) as u64,
            stats.distinct,
            "resident nodes != distinct after step {steps}"
        );
        assert!(searcher.open().high_water() >= searcher.open().len() as u64);
        for node in searcher.open().iter().chain(searcher.closed().iter()) {
            if let Some(parent) = &node.parent {
                assert!(
                    searcher.closed().contains(parent) || searcher.open().contains(parent),
                    "parent of {:?} is not resident after step {steps}",
                    node.state
                );
            }
        }
        match status {
            Ok(SearchStatus::Searching) => steps += 1,
            Ok(SearchStatus::Found(_)) | Err(_) => return steps,
        }
    }
}

// ---------------------------------------------------------------------------
// ACCEPTANCE: node-set invariants
// ---------------------------------------------------------------------------

#[test]
fn invariants_hold_every_step_on_maze() {
    let maze = GridMaze::parse("rooms", MAZE_ROOMS).unwrap();
    let mut searcher = Searcher::new(&maze, SearchPolicy::default()).unwrap();
    searcher.start(maze.start_state()).unwrap();
    let steps = step_until_done(&mut searcher);
    assert_eq!(steps as u64, searcher.stats().expanded);
    assert!(searcher.goal().is_some());
}

#[test]
fn invariants_hold_every_step_with_reopening() {
    let world = reopen_world();
    let mut searcher = Searcher::new(&world, SearchPolicy::default()).unwrap();
    searcher.start(world.start_state()).unwrap();
    step_until_done(&mut searcher);
    assert_eq!(searcher.stats().reopened, 1);
}

#[test]
fn invariants_hold_with_inadmissible_heuristic() {
    let puzzle = SlidingTile::new("mid", 3, PUZZLE_MID.to_vec())
        .unwrap()
        .with_heuristic(TileHeuristic::WeightedManhattan(3));
    let mut searcher = Searcher::new(&puzzle, SearchPolicy::default()).unwrap();
    searcher.start(puzzle.start_state()).unwrap();
    step_until_done(&mut searcher);
    assert!(searcher.goal().is_some());
}

#[test]
fn run_after_run_starts_fresh() {
    let maze = GridMaze::parse("rooms", MAZE_ROOMS).unwrap();
    let mut searcher = Searcher::new(&maze, SearchPolicy::default()).unwrap();
    let first = searcher.run(maze.start_state()).unwrap();
    let first_stats = *searcher.stats();
    let second = searcher.run(maze.start_state()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first_stats, *searcher.stats());
}

// ---------------------------------------------------------------------------
// ACCEPTANCE: budgets
// ---------------------------------------------------------------------------

#[test]
fn expansion_budget_stops_search() {
    let puzzle = SlidingTile::new("mid", 3, PUZZLE_MID.to_vec())
        .unwrap()
        .with_heuristic(TileHeuristic::Zero);
    let policy = SearchPolicy {
        max_expansions: Some(25),
        ..SearchPolicy::default()
    };
    let err = search(puzzle.start_state(), &puzzle, &policy).unwrap_err();
    match err {
        SearchError::ExpansionBudgetExceeded { limit, stats } => {
            assert_eq!(limit, 25);
            assert_eq!(stats.expanded, 25);
            assert!(stats.is_balanced());
        }
        other => panic!("expected ExpansionBudgetExceeded, got {other:?}"),
    }
}

#[test]
fn budget_large_enough_is_not_an_error() {
    let world = reopen_world();
    let policy = SearchPolicy {
        max_expansions: Some(6),
        ..SearchPolicy::default()
    };
    let solution = search(world.start_state(), &world, &policy).unwrap();
    assert_eq!(solution.stats.expanded, 6);
}

#[test]
fn time_limit_stops_search() {
    let puzzle = SlidingTile::new("mid", 3, PUZZLE_MID.to_vec())
        .unwrap()
        .with_heuristic(TileHeuristic::Zero);
    let policy = SearchPolicy {
        time_limit: Some(Duration::from_nanos(1)),
        ..SearchPolicy::default()
    };
    let err = search(puzzle.start_state(), &puzzle, &policy).unwrap_err();
    assert!(
        matches!(err, SearchError::TimeLimitExceeded { .. }),
        "got {err:?}"
    );
    assert!(err.stats().is_some());
}

#[test]
fn zero_time_limit_is_rejected_up_front() {
    let world = reopen_world();
    let policy = SearchPolicy {
        time_limit: Some(Duration::ZERO),
        ..SearchPolicy::default()
    };
    let err = search(world.start_state(), &world, &policy).unwrap_err();
    assert!(matches!(err, SearchError::InvalidPolicy { .. }));
    assert!(err.stats().is_none());
}

// ---------------------------------------------------------------------------
// ACCEPTANCE: malformed collaborators
// ---------------------------------------------------------------------------

fn stage_of(err: &SearchError) -> Option<CollaboratorStage> {
    match err {
        SearchError::MalformedCollaborator { stage, .. } => Some(*stage),
        _ => None,
    }
}

#[test]
fn negative_heuristic_is_malformed() {
    let problem = FnProblem::new(
        |s: &i32| *s == 3,
        |s: &i32| vec![s + 1],
        |s: &i32| if *s == 2 { -1 } else { 0 },
    );
    let err = search(0, &problem, &SearchPolicy::default()).unwrap_err();
    assert_eq!(stage_of(&err), Some(CollaboratorStage::Heuristic));
    assert_eq!(err.stats().map(|s| s.expanded), Some(1));
}

#[test]
fn panicking_successors_is_malformed() {
    let problem = FnProblem::new(
        |_: &i32| false,
        |s: &i32| -> Vec<i32> {
            assert!(*s < 2, "successor table has no row for {s}");
            vec![s + 1]
        },
        |_: &i32| 0,
    );
    let err = search(0, &problem, &SearchPolicy::default()).unwrap_err();
    assert_eq!(stage_of(&err), Some(CollaboratorStage::Successors));
    assert!(err.to_string().contains("no row for 2"), "{err}");
}

#[test]
fn panicking_goal_test_is_malformed() {
    let problem = FnProblem::new(
        |s: &i32| {
            assert!(*s != 1, "goal test exploded");
            false
        },
        |s: &i32| vec![s + 1],
        |_: &i32| 0,
    );
    let err = search(0, &problem, &SearchPolicy::default()).unwrap_err();
    assert_eq!(stage_of(&err), Some(CollaboratorStage::IsGoal));
}

#[test]
fn repeated_successor_is_malformed() {
    let problem = FnProblem::new(|_: &i32| false, |s: &i32| vec![s + 1, s + 1], |_: &i32| 0);
    let err = search(0, &problem, &SearchPolicy::default()).unwrap_err();
    assert_eq!(stage_of(&err), Some(CollaboratorStage::Successors));
}

#[test]
fn failed_step_leaves_node_sets_intact() {
    // 0 -> {1, 2}; the estimate for 2 is negative, 9 is reachable through 1.
    let problem = FnProblem::new(
        |s: &i32| *s == 9,
        |s: &i32| vec![s + 1, s + 2],
        |s: &i32| if *s == 2 { -1 } else { 0 },
    );
    let mut searcher = Searcher::new(&problem, SearchPolicy::default()).unwrap();
    searcher.start(0).unwrap();

    for attempt in 0..3 {
        let err = searcher.step().unwrap_err();
        assert_eq!(
            stage_of(&err),
            Some(CollaboratorStage::Heuristic),
            "attempt {attempt}: {err:?}"
        );
        let stats = *searcher.stats();
        assert_eq!(
            (searcher.open().len() + searcher.closed().len()) as u64,
            stats.distinct,
            "attempt {attempt}: a discovered state left both node sets"
        );
        assert!(searcher.open().contains(&0));
        assert_eq!(stats.expanded, 0);
        assert!(stats.is_balanced());
    }
}

#[test]
fn failed_successor_call_leaves_node_sets_intact() {
    let problem = FnProblem::new(
        |_: &i32| false,
        |s: &i32| -> Vec<i32> {
            assert!(*s < 1, "no successors defined for {s}");
            vec![s + 1]
        },
        |_: &i32| 0,
    );
    let mut searcher = Searcher::new(&problem, SearchPolicy::default()).unwrap();
    searcher.start(0).unwrap();
    assert_eq!(searcher.step(), Ok(SearchStatus::Searching));

    let err = searcher.step().unwrap_err();
    assert_eq!(stage_of(&err), Some(CollaboratorStage::Successors));
    assert!(searcher.open().contains(&1), "failed node must stay selectable");
    assert!(searcher.closed().contains(&0));
    assert!(searcher.sets_are_disjoint());
    assert_eq!(searcher.stats().distinct, 2);
}
