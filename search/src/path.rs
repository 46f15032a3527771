//! Backward path reconstruction over parent links.

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::SearchError;
use crate::explored::ClosedSet;
use crate::frontier::OpenSet;
use crate::node::SearchNode;

/// Rebuild the state sequence from the start state to `goal`.
///
/// Each ancestor is looked up by its state in the union of both node sets
/// (explored first, then frontier). The walk stops at the node without a
/// parent.
///
/// # Errors
///
/// Returns [`SearchError::BrokenParentChain`] if an ancestor is held by
/// neither set, or if the chain is longer than the number of resident nodes
/// (which can only happen if parent links form a cycle).
pub fn reconstruct_path<S: Clone + Eq + Hash + Debug>(
    goal: &SearchNode<S>,
    open: &OpenSet<S>,
    closed: &ClosedSet<S>,
) -> Result<Vec<S>, SearchError> {
    let limit = open.len() + closed.len() + 1;
    let mut path = vec![goal.state.clone()];
    let mut parent = goal.parent.clone();

    while let Some(state) = parent {
        if path.len() > limit {
            return Err(SearchError::BrokenParentChain {
                detail: format!("parent chain exceeds {limit} resident nodes"),
            });
        }
        let Some(node) = closed.get(&state).or_else(|| open.get(&state)) else {
            return Err(SearchError::BrokenParentChain {
                detail: format!("ancestor {state:?} is not held by either node set"),
            });
        };
        parent = node.parent.clone();
        path.push(state);
    }

    path.reverse();
    Ok(path)
}
