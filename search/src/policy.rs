//! Search policy types.

use std::time::Duration;

use crate::error::SearchError;

/// How the frontier breaks ties between nodes of equal `f_cost`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Most recently inserted node wins (stack scan order). Default.
    #[default]
    Lifo,
    /// Oldest inserted node wins (queue scan order).
    Fifo,
}

impl TieBreak {
    /// Stable lowercase name used in policy echoes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lifo => "lifo",
            Self::Fifo => "fifo",
        }
    }
}

/// Budgets and determinism knobs for one search invocation.
///
/// The default is unbounded: callers that cannot guarantee a finite or
/// goal-reachable state space should set `max_expansions` or `time_limit`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchPolicy {
    /// Hard cap on node expansions (`None` = unbounded).
    pub max_expansions: Option<u64>,
    /// Wall-clock cap, checked once per step (`None` = unbounded).
    pub time_limit: Option<Duration>,
    /// Frontier tie-break order.
    pub tie_break: TieBreak,
    /// Record an expansion-by-expansion audit trace.
    pub record_trace: bool,
}

impl SearchPolicy {
    /// Reject configurations that can never run a step.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] for a zero `time_limit`.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.time_limit == Some(Duration::ZERO) {
            return Err(SearchError::InvalidPolicy {
                detail: "time_limit must be positive".into(),
            });
        }
        Ok(())
    }

    /// JSON echo of the policy for run reports.
    ///
    /// The time limit is recorded in whole milliseconds.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        let time_limit_ms = self
            .time_limit
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
        serde_json::json!({
            "max_expansions": self.max_expansions,
            "record_trace": self.record_trace,
            "tie_break": self.tie_break.as_str(),
            "time_limit_ms": time_limit_ms,
        })
    }
}
