//! Search node and frontier ordering key.

/// A discovered state together with its cost bookkeeping.
///
/// `h_cost` is computed once when the node is created and never recomputed.
/// A node is owned by exactly one of the frontier or the explored set at a
/// time; it moves between them, it is never shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchNode<S> {
    /// The state this node stands for.
    pub state: S,
    /// State of the node this one was generated from (`None` for the start).
    pub parent: Option<S>,
    /// Steps from the start state (start = 0).
    pub g_cost: u64,
    /// Heuristic estimate of the remaining steps to a goal.
    pub h_cost: u64,
}

impl<S> SearchNode<S> {
    /// The start node: `g_cost = 0`, no parent.
    #[must_use]
    pub fn root(state: S, h_cost: u64) -> Self {
        Self {
            state,
            parent: None,
            g_cost: 0,
            h_cost,
        }
    }

    /// Total estimated path cost, `g_cost + h_cost`.
    #[must_use]
    pub fn f_cost(&self) -> u64 {
        self.g_cost.saturating_add(self.h_cost)
    }

    /// Whether this is the start node.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Build the child node for `state` reached from `parent` in one step.
#[must_use]
pub fn make_node<S: Clone>(state: S, parent: &SearchNode<S>, h_cost: u64) -> SearchNode<S> {
    SearchNode {
        state,
        parent: Some(parent.state.clone()),
        g_cost: parent.g_cost.saturating_add(1),
        h_cost,
    }
}

/// The frontier ordering key: `(f_cost, rank)`.
///
/// Lower `f_cost` first; on ties the lower `rank` wins. The frontier derives
/// `rank` from its insertion sequence according to the tie-break policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrontierKey {
    pub f_cost: u64,
    pub rank: u64,
}

impl PartialOrd for FrontierKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.f_cost
            .cmp(&other.f_cost)
            .then(self.rank.cmp(&other.rank))
    }
}
