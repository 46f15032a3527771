//! Typed search errors.
//!
//! Runtime failures carry the counters accumulated up to the point of failure,
//! so callers can still inspect `generated`/`distinct`/`expanded` after a
//! search that did not produce a path.

use std::time::Duration;

use crate::stats::SearchStats;

/// The collaborator callback that misbehaved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollaboratorStage {
    /// `SearchProblem::is_goal`.
    IsGoal,
    /// `SearchProblem::successors`.
    Successors,
    /// `SearchProblem::heuristic`.
    Heuristic,
}

impl CollaboratorStage {
    /// Stable lowercase name used in logs and reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IsGoal => "is_goal",
            Self::Successors => "successors",
            Self::Heuristic => "heuristic",
        }
    }
}

/// Why a search did not produce a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The frontier emptied before any node satisfied the goal predicate.
    FrontierExhausted { stats: SearchStats },
    /// A collaborator panicked or violated its contract.
    MalformedCollaborator {
        stage: CollaboratorStage,
        detail: String,
        stats: SearchStats,
    },
    /// `max_expansions` was reached before a goal was found.
    ExpansionBudgetExceeded { limit: u64, stats: SearchStats },
    /// `time_limit` elapsed before a goal was found.
    TimeLimitExceeded { limit: Duration, stats: SearchStats },
    /// A parent link pointed at a state held by neither node set.
    BrokenParentChain { detail: String },
    /// The policy was rejected before any search step ran.
    InvalidPolicy { detail: String },
}

impl SearchError {
    /// Counters at the time of failure, if the search had started.
    #[must_use]
    pub fn stats(&self) -> Option<&SearchStats> {
        match self {
            Self::FrontierExhausted { stats }
            | Self::MalformedCollaborator { stats, .. }
            | Self::ExpansionBudgetExceeded { stats, .. }
            | Self::TimeLimitExceeded { stats, .. } => Some(stats),
            Self::BrokenParentChain { .. } | Self::InvalidPolicy { .. } => None,
        }
    }

    /// Stable snake-case tag used in run reports.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FrontierExhausted { .. } => "frontier_exhausted",
            Self::MalformedCollaborator { .. } => "malformed_collaborator",
            Self::ExpansionBudgetExceeded { .. } => "expansion_budget_exceeded",
            Self::TimeLimitExceeded { .. } => "time_limit_exceeded",
            Self::BrokenParentChain { .. } => "broken_parent_chain",
            Self::InvalidPolicy { .. } => "invalid_policy",
        }
    }
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FrontierExhausted { stats } => write!(
                f,
                "frontier exhausted after {} expansions: no goal state is reachable",
                stats.expanded
            ),
            Self::MalformedCollaborator { stage, detail, .. } => {
                write!(f, "malformed collaborator in {}: {detail}", stage.as_str())
            }
            Self::ExpansionBudgetExceeded { limit, .. } => {
                write!(f, "expansion budget of {limit} exceeded")
            }
            Self::TimeLimitExceeded { limit, .. } => {
                write!(f, "time limit of {}ms exceeded", limit.as_millis())
            }
            Self::BrokenParentChain { detail } => write!(f, "broken parent chain: {detail}"),
            Self::InvalidPolicy { detail } => write!(f, "invalid search policy: {detail}"),
        }
    }
}

impl std::error::Error for SearchError {}
