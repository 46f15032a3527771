//! Search problem contract trait.

use std::fmt::Debug;
use std::hash::Hash;

/// A state space the searcher can explore.
///
/// # Contract
///
/// - `successors` must terminate and must not return the same state twice in
///   one call. Duplicates across calls are resolved by the searcher.
/// - `heuristic` must return a non-negative estimate. Admissible estimates
///   (never above the true remaining cost) yield shortest paths; larger
///   estimates are accepted and yield valid, possibly longer paths.
/// - `is_goal` is a pure predicate.
/// - Successor order does not affect correctness, only tie-break determinism.
///
/// A panic in any of these, a negative estimate, or a repeated successor is
/// reported as [`crate::error::SearchError::MalformedCollaborator`].
pub trait SearchProblem {
    /// Opaque state with structural equality.
    type State: Clone + Eq + Hash + Debug;

    /// Identifier used in logs and run reports.
    fn problem_id(&self) -> &str;

    /// Test whether `state` satisfies the goal.
    fn is_goal(&self, state: &Self::State) -> bool;

    /// States reachable from `state` in one step.
    fn successors(&self, state: &Self::State) -> Vec<Self::State>;

    /// Estimated remaining steps from `state` to any goal.
    fn heuristic(&self, state: &Self::State) -> i64;
}

/// Adapts three closures to [`SearchProblem`].
pub struct FnProblem<S, G, N, H> {
    goal: G,
    successors: N,
    heuristic: H,
    _state: std::marker::PhantomData<fn() -> S>,
}

impl<S, G, N, H> FnProblem<S, G, N, H>
where
    G: Fn(&S) -> bool,
    N: Fn(&S) -> Vec<S>,
    H: Fn(&S) -> i64,
{
    #[must_use]
    pub fn new(goal: G, successors: N, heuristic: H) -> Self {
        Self {
            goal,
            successors,
            heuristic,
            _state: std::marker::PhantomData,
        }
    }
}

impl<S, G, N, H> SearchProblem for FnProblem<S, G, N, H>
where
    S: Clone + Eq + Hash + Debug,
    G: Fn(&S) -> bool,
    N: Fn(&S) -> Vec<S>,
    H: Fn(&S) -> i64,
{
    type State = S;

    #[allow(clippy::unnecessary_literal_bound)]
    fn problem_id(&self) -> &str {
        "fn_problem"
    }

    fn is_goal(&self, state: &S) -> bool {
        (self.goal)(state)
    }

    fn successors(&self, state: &S) -> Vec<S> {
        (self.successors)(state)
    }

    fn heuristic(&self, state: &S) -> i64 {
        (self.heuristic)(state)
    }
}
