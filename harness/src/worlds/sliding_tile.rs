//! `SlidingTile`: the N×N sliding-tile puzzle.
//!
//! Tiles are numbered `1..N*N`, `0` is the blank. The goal layout is
//! row-major ascending with the blank last. Each slide costs 1.
//!
//! Solvability is not checked: an unsolvable board simply exhausts the
//! frontier.

use serde::Serialize;
use waypoint_search::SearchProblem;

use crate::contract::{SearchWorld, WorldError};

/// A board layout, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Board {
    tiles: Vec<u8>,
}

impl Board {
    #[must_use]
    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    fn blank(&self) -> usize {
        self.tiles.iter().position(|t| *t == 0).unwrap_or(0)
    }

    fn swapped(&self, a: usize, b: usize) -> Self {
        let mut tiles = self.tiles.clone();
        tiles.swap(a, b);
        Self { tiles }
    }
}

/// Heuristic used to estimate remaining slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileHeuristic {
    /// Always 0 (uniform-cost search).
    Zero,
    /// Number of tiles out of place, blank excluded.
    Misplaced,
    /// Sum of tile Manhattan distances, blank excluded.
    #[default]
    Manhattan,
    /// Manhattan scaled by a factor. Inadmissible above 1.
    WeightedManhattan(u32),
}

impl TileHeuristic {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Misplaced => "misplaced",
            Self::Manhattan => "manhattan",
            Self::WeightedManhattan(_) => "weighted_manhattan",
        }
    }
}

/// Sliding-tile puzzle instance.
#[derive(Debug, Clone)]
pub struct SlidingTile {
    id: String,
    width: usize,
    start: Board,
    heuristic: TileHeuristic,
}

impl SlidingTile {
    /// Build a puzzle from a row-major layout.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Invalid`] if `width < 2`, `width * width`
    /// exceeds 256 tiles, or `tiles` is not a permutation of `0..width*width`.
    pub fn new(id: &str, width: usize, tiles: Vec<u8>) -> Result<Self, WorldError> {
        if !(2..=16).contains(&width) {
            return Err(WorldError::Invalid {
                detail: format!("width {width} outside 2..=16"),
            });
        }
        let cells = width * width;
        if tiles.len() != cells {
            return Err(WorldError::Invalid {
                detail: format!("expected {cells} tiles, got {}", tiles.len()),
            });
        }
        let mut seen = vec![false; cells];
        for &tile in &tiles {
            match seen.get_mut(usize::from(tile)) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(WorldError::Invalid {
                        detail: format!("tile {tile} appears twice"),
                    })
                }
                None => {
                    return Err(WorldError::Invalid {
                        detail: format!("tile {tile} out of range for width {width}"),
                    })
                }
            }
        }
        Ok(Self {
            id: id.to_string(),
            width,
            start: Board { tiles },
            heuristic: TileHeuristic::default(),
        })
    }

    /// Parse whitespace-separated tile numbers, one row per line.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Parse`] for a non-numeric token or a ragged
    /// row, and the errors of [`SlidingTile::new`] otherwise.
    pub fn parse(id: &str, text: &str) -> Result<Self, WorldError> {
        let mut tiles = Vec::new();
        let mut width = None;
        for (idx, line) in text.lines().filter(|l| !l.trim().is_empty()).enumerate() {
            let row = line
                .split_whitespace()
                .map(|tok| {
                    tok.parse::<u8>().map_err(|e| WorldError::Parse {
                        line: idx + 1,
                        detail: format!("bad tile {tok:?}: {e}"),
                    })
                })
                .collect::<Result<Vec<u8>, WorldError>>()?;
            match width {
                None => width = Some(row.len()),
                Some(w) if w != row.len() => {
                    return Err(WorldError::Parse {
                        line: idx + 1,
                        detail: format!("row has {} tiles, expected {w}", row.len()),
                    })
                }
                Some(_) => {}
            }
            tiles.extend(row);
        }
        Self::new(id, width.unwrap_or(0), tiles)
    }

    /// Replace the heuristic.
    #[must_use]
    pub fn with_heuristic(mut self, heuristic: TileHeuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn tile_heuristic(&self) -> TileHeuristic {
        self.heuristic
    }

    /// The solved board for this width.
    #[must_use]
    pub fn goal_board(&self) -> Board {
        let cells = self.width * self.width;
        let tiles = (1..cells)
            .map(|t| u8::try_from(t).unwrap_or(u8::MAX))
            .chain(std::iter::once(0))
            .collect();
        Board { tiles }
    }

    fn target(&self, tile: u8) -> usize {
        usize::from(tile) - 1
    }

    fn manhattan(&self, board: &Board) -> u64 {
        let w = self.width;
        board
            .tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| **t != 0)
            .map(|(pos, t)| {
                let goal = self.target(*t);
                ((pos / w).abs_diff(goal / w) + (pos % w).abs_diff(goal % w)) as u64
            })
            .sum()
    }

    fn misplaced(&self, board: &Board) -> u64 {
        board
            .tiles
            .iter()
            .enumerate()
            .filter(|(pos, t)| **t != 0 && self.target(**t) != *pos)
            .count() as u64
    }
}

impl SearchProblem for SlidingTile {
    type State = Board;

    fn problem_id(&self) -> &str {
        &self.id
    }

    fn is_goal(&self, state: &Board) -> bool {
        let last = state.tiles.len() - 1;
        state
            .tiles
            .iter()
            .enumerate()
            .all(|(pos, t)| if pos == last { *t == 0 } else { usize::from(*t) == pos + 1 })
    }

    /// Blank moves in fixed order: up, right, down, left.
    fn successors(&self, state: &Board) -> Vec<Board> {
        let w = self.width;
        let blank = state.blank();
        let (row, col) = (blank / w, blank % w);
        let mut out = Vec::with_capacity(4);
        if row > 0 {
            out.push(state.swapped(blank, blank - w));
        }
        if col + 1 < w {
            out.push(state.swapped(blank, blank + 1));
        }
        if row + 1 < w {
            out.push(state.swapped(blank, blank + w));
        }
        if col > 0 {
            out.push(state.swapped(blank, blank - 1));
        }
        out
    }

    fn heuristic(&self, state: &Board) -> i64 {
        let estimate = match self.heuristic {
            TileHeuristic::Zero => 0,
            TileHeuristic::Misplaced => self.misplaced(state),
            TileHeuristic::Manhattan => self.manhattan(state),
            TileHeuristic::WeightedManhattan(k) => {
                self.manhattan(state).saturating_mul(u64::from(k))
            }
        };
        i64::try_from(estimate).unwrap_or(i64::MAX)
    }
}

impl SearchWorld for SlidingTile {
    fn start_state(&self) -> Board {
        self.start.clone()
    }

    fn fixture(&self) -> serde_json::Value {
        let weight = match self.heuristic {
            TileHeuristic::WeightedManhattan(k) => k,
            _ => 1,
        };
        serde_json::json!({
            "heuristic": self.heuristic.as_str(),
            "heuristic_weight": weight,
            "kind": "sliding_tile",
            "start": self.start,
            "width": self.width,
        })
    }
}
