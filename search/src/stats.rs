//! Per-search counters.
//!
//! Counters live on the [`crate::search::Searcher`] context and travel with
//! its results; nothing here is process-global.

/// Observable counters for a single search invocation.
///
/// A fresh value is `{generated: 0, distinct: 1, expanded: 0}`: the start
/// state counts as the first distinct state.
///
/// Every generated child lands in exactly one of `distinct` (minus the start
/// state), `reopened`, `replaced` or `discarded`, so
/// `generated == (distinct - 1) + reopened + replaced + discarded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    /// Child nodes produced, including discarded duplicates.
    pub generated: u64,
    /// Distinct states ever discovered, including the start state.
    pub distinct: u64,
    /// Nodes moved from the frontier to the explored set.
    pub expanded: u64,
    /// Explored states pulled back into the frontier by a cheaper path.
    pub reopened: u64,
    /// Frontier entries superseded by a cheaper duplicate.
    pub replaced: u64,
    /// Duplicates dropped because the incumbent was at least as cheap.
    pub discarded: u64,
    /// Largest frontier size observed.
    pub frontier_high_water: u64,
}

impl SearchStats {
    /// Counters at the start of a search.
    #[must_use]
    pub fn new() -> Self {
        Self {
            generated: 0,
            distinct: 1,
            expanded: 0,
            reopened: 0,
            replaced: 0,
            discarded: 0,
            frontier_high_water: 0,
        }
    }

    /// Whether the per-child accounting identity holds.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        [self.reopened, self.replaced, self.discarded]
            .into_iter()
            .try_fold(self.distinct.saturating_sub(1), u64::checked_add)
            == Some(self.generated)
    }

    /// JSON projection with sorted, integer-only fields.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "discarded": self.discarded,
            "distinct": self.distinct,
            "expanded": self.expanded,
            "frontier_high_water": self.frontier_high_water,
            "generated": self.generated,
            "reopened": self.reopened,
            "replaced": self.replaced,
        })
    }
}

impl Default for SearchStats {
    fn default() -> Self {
        Self::new()
    }
}
