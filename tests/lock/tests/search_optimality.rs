//! Optimality and path validity on the reference worlds.
//!
//! Proves:
//! 1. With an admissible heuristic the path cost equals the breadth-first
//!    optimum (all worlds here have unit step cost).
//! 2. Every returned path starts at the start state, ends at a goal and
//!    follows successor edges.
//! 3. An inadmissible heuristic still returns a valid path, never shorter
//!    than the optimum.
//! 4. Unreachable goals end in `FrontierExhausted`, never a path.

use lock_tests::{bfs_distance, is_valid_path, MAZE_ROOMS, MAZE_SEALED, PUZZLE_MID, PUZZLE_TWO_MOVES};
use waypoint_harness::contract::SearchWorld;
use waypoint_harness::worlds::grid_maze::{Cell, GridMaze};
use waypoint_harness::worlds::sliding_tile::{SlidingTile, TileHeuristic};
use waypoint_search::{search, FnProblem, SearchError, SearchPolicy, SearchProblem};

// ---------------------------------------------------------------------------
// ACCEPTANCE: grid maze
// ---------------------------------------------------------------------------

#[test]
fn maze_path_is_optimal_and_valid() {
    let maze = GridMaze::parse("rooms", MAZE_ROOMS).unwrap();
    let start = maze.start_state();
    let optimum = bfs_distance(&maze, start).unwrap();

    let solution = search(start, &maze, &SearchPolicy::default()).unwrap();
    assert_eq!(solution.cost(), optimum);
    assert!(is_valid_path(&maze, &start, &solution.path));
    assert!(solution.stats.is_balanced());
}

#[test]
fn maze_heuristic_prunes_against_uniform_cost() {
    let maze = GridMaze::parse("rooms", MAZE_ROOMS).unwrap();
    let start = maze.start_state();
    let informed = search(start, &maze, &SearchPolicy::default()).unwrap();

    let blind = FnProblem::new(
        |c: &Cell| maze.is_goal(c),
        |c: &Cell| maze.successors(c),
        |_: &Cell| 0,
    );
    let uniform = search(start, &blind, &SearchPolicy::default()).unwrap();

    assert_eq!(informed.cost(), uniform.cost());
    assert!(informed.stats.expanded <= uniform.stats.expanded);
}

#[test]
fn sealed_maze_exhausts() {
    let maze = GridMaze::parse("sealed", MAZE_SEALED).unwrap();
    let err = search(maze.start_state(), &maze, &SearchPolicy::default()).unwrap_err();
    let SearchError::FrontierExhausted { stats } = &err else {
        panic!("expected FrontierExhausted, got {err:?}");
    };
    // Every reachable open cell is expanded exactly once under a consistent
    // heuristic.
    assert_eq!(stats.expanded, stats.distinct);
    assert_eq!(stats.reopened, 0);
}

// ---------------------------------------------------------------------------
// ACCEPTANCE: sliding tile
// ---------------------------------------------------------------------------

#[test]
fn two_move_puzzle() {
    let puzzle = SlidingTile::new("two", 3, PUZZLE_TWO_MOVES.to_vec()).unwrap();
    let solution = search(puzzle.start_state(), &puzzle, &SearchPolicy::default()).unwrap();
    assert_eq!(solution.cost(), 2);
    assert_eq!(solution.path.last(), Some(&puzzle.goal_board()));
}

#[test]
fn admissible_heuristics_agree_with_bfs() {
    let base = SlidingTile::new("mid", 3, PUZZLE_MID.to_vec()).unwrap();
    let optimum = bfs_distance(&base, base.start_state()).unwrap();

    for heuristic in [
        TileHeuristic::Zero,
        TileHeuristic::Misplaced,
        TileHeuristic::Manhattan,
    ] {
        let puzzle = base.clone().with_heuristic(heuristic);
        let solution = search(puzzle.start_state(), &puzzle, &SearchPolicy::default()).unwrap();
        assert_eq!(solution.cost(), optimum, "{heuristic:?} is not optimal");
        assert!(is_valid_path(&puzzle, &puzzle.start_state(), &solution.path));
        assert!(solution.stats.is_balanced());
    }
}

#[test]
fn stronger_heuristic_expands_no_more() {
    let base = SlidingTile::new("mid", 3, PUZZLE_MID.to_vec()).unwrap();
    let expanded = |h| {
        let puzzle = base.clone().with_heuristic(h);
        search(puzzle.start_state(), &puzzle, &SearchPolicy::default())
            .unwrap()
            .stats
            .expanded
    };
    let zero = expanded(TileHeuristic::Zero);
    let manhattan = expanded(TileHeuristic::Manhattan);
    assert!(manhattan < zero, "manhattan={manhattan} zero={zero}");
}

#[test]
fn inadmissible_heuristic_returns_valid_path() {
    let base = SlidingTile::new("mid", 3, PUZZLE_MID.to_vec()).unwrap();
    let optimum = bfs_distance(&base, base.start_state()).unwrap();

    let greedy = base.with_heuristic(TileHeuristic::WeightedManhattan(5));
    let solution = search(greedy.start_state(), &greedy, &SearchPolicy::default()).unwrap();
    assert!(solution.cost() >= optimum);
    assert!(is_valid_path(&greedy, &greedy.start_state(), &solution.path));
    assert!(solution.stats.is_balanced());
}

#[test]
fn unsolvable_2x2_exhausts() {
    // Swapping two tiles flips parity: unreachable from the solved layout.
    let puzzle = SlidingTile::new("odd", 2, vec![2, 1, 3, 0]).unwrap();
    let err = search(puzzle.start_state(), &puzzle, &SearchPolicy::default()).unwrap_err();
    let SearchError::FrontierExhausted { stats } = &err else {
        panic!("expected FrontierExhausted, got {err:?}");
    };
    // A 2x2 board has 4!/2 = 12 reachable layouts.
    assert_eq!(stats.distinct, 12);
}
