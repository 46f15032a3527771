//! World contract: a search problem with a fixed start state.
//!
//! Worlds provide domain data only: a start state, the three collaborators
//! required by [`SearchProblem`], and a JSON fixture describing themselves.
//! Worlds do NOT hash, serialize reports or drive the search; those are
//! runner concerns.

use serde::Serialize;
use waypoint_search::SearchProblem;

/// Typed failure for world construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// Text input could not be parsed into a world.
    Parse { line: usize, detail: String },
    /// The parsed world is structurally invalid.
    Invalid { detail: String },
}

impl std::fmt::Display for WorldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse { line, detail } => write!(f, "parse error on line {line}: {detail}"),
            Self::Invalid { detail } => write!(f, "invalid world: {detail}"),
        }
    }
}

impl std::error::Error for WorldError {}

/// A search problem the harness runner can execute end to end.
pub trait SearchWorld: SearchProblem
where
    Self::State: Serialize,
{
    /// The state the search starts from.
    fn start_state(&self) -> Self::State;

    /// Deterministic JSON description of the world (integer-only numbers).
    fn fixture(&self) -> serde_json::Value;
}
