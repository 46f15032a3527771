//! Waypoint Search: generic best-first state-space search.
//!
//! The searcher is parameterized by a goal test, a successor generator and a
//! heuristic estimator (see [`SearchProblem`]). It keeps discovered states in
//! two node sets, resolves duplicates by strict cost dominance, and rebuilds
//! the winning route from parent links.
//!
//! # Crate dependency graph
//!
//! ```text
//! waypoint_search  ←  waypoint_harness  ←  lock-tests / benchmarks
//! (nodes, sets,       (worlds, reports,
//!  driver, trace)      canonical hashing)
//! ```
//!
//! # Key types
//!
//! - [`SearchProblem`]: collaborator contract (goal, successors, heuristic)
//! - [`SearchNode`]: a state with `g`/`h` costs and a parent link
//! - [`OpenSet`] / [`ClosedSet`]: frontier and explored set, indexed by state
//! - [`Searcher`]: per-call context owning both sets, the counters and the trace
//! - [`SearchPolicy`]: budgets, tie-break order and trace recording
//! - [`SearchError`]: exhaustion, budget and collaborator failures

#![forbid(unsafe_code)]

pub mod contract;
pub mod error;
pub mod explored;
pub mod frontier;
pub mod node;
pub mod path;
pub mod policy;
pub mod resolver;
pub mod search;
pub mod stats;
pub mod trace;

pub use contract::{FnProblem, SearchProblem};
pub use error::{CollaboratorStage, SearchError};
pub use explored::ClosedSet;
pub use frontier::OpenSet;
pub use node::{make_node, FrontierKey, SearchNode};
pub use path::reconstruct_path;
pub use policy::{SearchPolicy, TieBreak};
pub use resolver::{resolve_successor, Resolution};
pub use search::{search, search_fn, SearchStatus, Searcher, Solution};
pub use stats::SearchStats;
pub use trace::{ExpansionEvent, SearchTrace, SuccessorRecord};
