//! Shared workloads for the waypoint benchmark suites.
//!
//! Every workload is deterministic: the same call always builds the same
//! world, so timings are comparable across runs and machines.

use waypoint_harness::contract::SearchWorld;
use waypoint_harness::worlds::grid_maze::GridMaze;
use waypoint_harness::worlds::sliding_tile::{SlidingTile, TileHeuristic};
use waypoint_search::SearchProblem;

/// One of the two 8-puzzle layouts farthest from solved (31 moves).
pub const HARD_8_PUZZLE: [u8; 9] = [8, 6, 7, 2, 5, 4, 3, 0, 1];

/// A solved `width`×`width` puzzle scrambled by `moves` deterministic slides.
///
/// Each slide takes successor `(i * 7 + 3) % n` of the current board and
/// never immediately undoes the previous slide.
///
/// # Panics
///
/// Panics if `width` is outside `2..=16`. Benchmark setup failures are fatal.
#[must_use]
pub fn scrambled_puzzle(width: usize, moves: usize) -> SlidingTile {
    let solved_tiles: Vec<u8> = (1..width * width)
        .map(|t| u8::try_from(t).expect("tile fits u8"))
        .chain(std::iter::once(0))
        .collect();
    let solved = SlidingTile::new("scramble", width, solved_tiles).expect("solved layout");

    let mut previous = None;
    let mut board = solved.start_state();
    for i in 0..moves {
        let options: Vec<_> = solved
            .successors(&board)
            .into_iter()
            .filter(|next| Some(next) != previous.as_ref())
            .collect();
        let next = options[(i * 7 + 3) % options.len()].clone();
        previous = Some(std::mem::replace(&mut board, next));
    }

    SlidingTile::new(
        &format!("scramble_{width}x{width}_{moves}"),
        width,
        board.tiles().to_vec(),
    )
    .expect("scrambled layout is a permutation")
}

/// An obstacle-free `n`×`n` field with start and goal in opposite corners.
///
/// Many equal-`f` routes: stresses tie-breaking and frontier size.
#[must_use]
pub fn open_field_maze(n: usize) -> GridMaze {
    let mut text = String::with_capacity(n * (n + 1));
    for r in 0..n {
        for c in 0..n {
            text.push(match (r, c) {
                (0, 0) => 'S',
                _ if r == n - 1 && c == n - 1 => 'G',
                _ => '.',
            });
        }
        text.push('\n');
    }
    GridMaze::parse(&format!("open_field_{n}"), &text).expect("open field parses")
}

/// A winding corridor: full-width wall rows with a gap alternating between
/// the right and left edge.
///
/// The Manhattan estimate is badly misleading here: most of the maze is
/// expanded before the goal.
#[must_use]
pub fn serpentine_maze(rows: usize, cols: usize) -> GridMaze {
    let mut lines = Vec::with_capacity(rows);
    for r in 0..rows {
        let line: String = if r % 2 == 0 {
            ".".repeat(cols)
        } else {
            let gap = if (r / 2) % 2 == 0 { cols - 1 } else { 0 };
            (0..cols).map(|c| if c == gap { '.' } else { '#' }).collect()
        };
        lines.push(line);
    }
    if let Some(first) = lines.first_mut() {
        first.replace_range(0..1, "S");
    }
    let last_row = (rows - 1) & !1;
    let goal_col = if (last_row / 2) % 2 == 0 { 0 } else { cols - 1 };
    lines[last_row].replace_range(goal_col..=goal_col, "G");
    GridMaze::parse(&format!("serpentine_{rows}x{cols}"), &lines.join("\n"))
        .expect("serpentine parses")
}

/// Named sliding-tile workloads, each paired with a heuristic.
#[must_use]
pub fn puzzle_regimes() -> Vec<(&'static str, SlidingTile)> {
    let hard = SlidingTile::new("hard_8", 3, HARD_8_PUZZLE.to_vec()).expect("hard 8-puzzle");
    vec![
        (
            "8_puzzle_hard/manhattan",
            hard.clone().with_heuristic(TileHeuristic::Manhattan),
        ),
        (
            "8_puzzle_hard/misplaced",
            hard.clone().with_heuristic(TileHeuristic::Misplaced),
        ),
        (
            "8_puzzle_hard/weighted_3",
            hard.with_heuristic(TileHeuristic::WeightedManhattan(3)),
        ),
        ("15_puzzle_scramble_40/manhattan", scrambled_puzzle(4, 40)),
    ]
}

/// Named maze workloads.
#[must_use]
pub fn maze_regimes() -> Vec<(&'static str, GridMaze)> {
    vec![
        ("open_field_64", open_field_maze(64)),
        ("serpentine_61x60", serpentine_maze(61, 60)),
    ]
}
