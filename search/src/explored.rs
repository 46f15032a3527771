//! Explored set (closed set) of settled nodes.
//!
//! Used for duplicate detection against already-expanded states and as the
//! parent-link store for path reconstruction.

use std::collections::HashMap;
use std::hash::Hash;

use crate::node::SearchNode;

/// Nodes whose successors have been generated, indexed by state.
#[derive(Debug)]
pub struct ClosedSet<S> {
    nodes: HashMap<S, SearchNode<S>>,
}

impl<S: Clone + Eq + Hash> ClosedSet<S> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    /// Settle a node, returning any node previously held for its state.
    pub fn insert(&mut self, node: SearchNode<S>) -> Option<SearchNode<S>> {
        self.nodes.insert(node.state.clone(), node)
    }

    pub fn remove(&mut self, state: &S) -> Option<SearchNode<S>> {
        self.nodes.remove(state)
    }

    #[must_use]
    pub fn get(&self, state: &S) -> Option<&SearchNode<S>> {
        self.nodes.get(state)
    }

    #[must_use]
    pub fn contains(&self, state: &S) -> bool {
        self.nodes.contains_key(state)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Settled nodes in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &SearchNode<S>> + '_ {
        self.nodes.values()
    }
}

impl<S: Clone + Eq + Hash> Default for ClosedSet<S> {
    fn default() -> Self {
        Self::new()
    }
}
