//! `GridMaze`: a 4-connected ASCII maze.
//!
//! ```text
//! S..#
//! .#..
//! ...G
//! ```
//!
//! `#` is a wall, `.` open floor, `S` the unique start and `G` a goal (one or
//! more). Every move costs 1. The heuristic is Manhattan distance to the
//! nearest goal, which is consistent for unit moves.

use serde::Serialize;
use waypoint_search::SearchProblem;

use crate::contract::{SearchWorld, WorldError};

/// A maze cell, addressed by row then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
}

impl Cell {
    #[must_use]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub fn manhattan(&self, other: &Cell) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

/// Parsed maze. Rows may be ragged; cells beyond a row's end are walls.
#[derive(Debug, Clone)]
pub struct GridMaze {
    id: String,
    rows: Vec<Vec<bool>>,
    start: Cell,
    goals: Vec<Cell>,
}

impl GridMaze {
    /// Parse an ASCII maze.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Parse`] on an unknown character or a second
    /// `S`, and [`WorldError::Invalid`] when `S` or `G` is absent.
    pub fn parse(id: &str, text: &str) -> Result<Self, WorldError> {
        let mut rows = Vec::new();
        let mut start = None;
        let mut goals = Vec::new();

        for (r, line) in text.lines().filter(|l| !l.trim().is_empty()).enumerate() {
            let row = coord(r, r + 1)?;
            let mut open = Vec::new();
            for (c, ch) in line.trim_end().chars().enumerate() {
                let cell = Cell::new(row, coord(c, r + 1)?);
                match ch {
                    '#' => open.push(false),
                    '.' => open.push(true),
                    'S' => {
                        if start.replace(cell).is_some() {
                            return Err(WorldError::Parse {
                                line: r + 1,
                                detail: "more than one start cell".into(),
                            });
                        }
                        open.push(true);
                    }
                    'G' => {
                        goals.push(cell);
                        open.push(true);
                    }
                    other => {
                        return Err(WorldError::Parse {
                            line: r + 1,
                            detail: format!("unexpected character {other:?} at column {}", c + 1),
                        })
                    }
                }
            }
            rows.push(open);
        }

        let Some(start) = start else {
            return Err(WorldError::Invalid {
                detail: "maze has no start cell".into(),
            });
        };
        if goals.is_empty() {
            return Err(WorldError::Invalid {
                detail: "maze has no goal cell".into(),
            });
        }
        Ok(Self {
            id: id.to_string(),
            rows,
            start,
            goals,
        })
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Whether `cell` is inside the maze and not a wall.
    #[must_use]
    pub fn is_open(&self, cell: Cell) -> bool {
        self.rows
            .get(cell.row as usize)
            .and_then(|row| row.get(cell.col as usize))
            .copied()
            .unwrap_or(false)
    }

    /// Goal cells in reading order.
    #[must_use]
    pub fn goals(&self) -> &[Cell] {
        &self.goals
    }
}

fn coord(index: usize, line: usize) -> Result<u32, WorldError> {
    u32::try_from(index).map_err(|_| WorldError::Parse {
        line,
        detail: "maze dimension exceeds u32".into(),
    })
}

impl SearchProblem for GridMaze {
    type State = Cell;

    fn problem_id(&self) -> &str {
        &self.id
    }

    fn is_goal(&self, state: &Cell) -> bool {
        self.goals.contains(state)
    }

    /// Neighbours in fixed order: up, right, down, left.
    fn successors(&self, state: &Cell) -> Vec<Cell> {
        let Cell { row, col } = *state;
        let candidates = [
            row.checked_sub(1).map(|r| Cell::new(r, col)),
            col.checked_add(1).map(|c| Cell::new(row, c)),
            row.checked_add(1).map(|r| Cell::new(r, col)),
            col.checked_sub(1).map(|c| Cell::new(row, c)),
        ];
        candidates
            .into_iter()
            .flatten()
            .filter(|cell| self.is_open(*cell))
            .collect()
    }

    fn heuristic(&self, state: &Cell) -> i64 {
        self.goals
            .iter()
            .map(|goal| i64::from(state.manhattan(goal)))
            .min()
            .unwrap_or(0)
    }
}

impl SearchWorld for GridMaze {
    fn start_state(&self) -> Cell {
        self.start
    }

    fn fixture(&self) -> serde_json::Value {
        let rows: Vec<String> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|open| if *open { '.' } else { '#' }).collect())
            .collect();
        serde_json::json!({
            "goals": self.goals,
            "kind": "grid_maze",
            "rows": rows,
            "start": self.start,
        })
    }
}
