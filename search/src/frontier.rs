//! Best-first frontier (open set) with state-indexed lookup.
//!
//! Nodes are indexed twice: by state in a `HashMap` for duplicate detection,
//! and by [`FrontierKey`] in a `BTreeMap` for best-node selection. Both
//! indexes are updated together; a state is never held twice.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::node::{FrontierKey, SearchNode};
use crate::policy::TieBreak;

#[derive(Debug)]
struct FrontierEntry<S> {
    key: FrontierKey,
    node: SearchNode<S>,
}

/// Frontier of discovered, not yet expanded nodes.
///
/// Maintains:
/// - a `HashMap<S, FrontierEntry>` for O(1) lookup and removal by state
/// - a `BTreeMap<FrontierKey, S>` for O(log n) best-node selection
/// - a monotonic insertion sequence feeding the tie-break rank
#[derive(Debug)]
pub struct OpenSet<S> {
    entries: HashMap<S, FrontierEntry<S>>,
    order: BTreeMap<FrontierKey, S>,
    tie_break: TieBreak,
    next_seq: u64,
    high_water: u64,
}

impl<S: Clone + Eq + Hash> OpenSet<S> {
    /// Create an empty frontier with the given tie-break order.
    #[must_use]
    pub fn new(tie_break: TieBreak) -> Self {
        Self {
            entries: HashMap::new(),
            order: BTreeMap::new(),
            tie_break,
            next_seq: 0,
            high_water: 0,
        }
    }

    fn next_rank(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        match self.tie_break {
            TieBreak::Lifo => u64::MAX - seq,
            TieBreak::Fifo => seq,
        }
    }

    /// Insert a node, displacing any node already held for the same state.
    ///
    /// The inserted node always gets a fresh insertion sequence, so a
    /// replacement counts as the most recent insertion. Returns the
    /// displaced node, if any.
    pub fn insert(&mut self, node: SearchNode<S>) -> Option<SearchNode<S>> {
        let displaced = self.remove(&node.state);
        let key = FrontierKey {
            f_cost: node.f_cost(),
            rank: self.next_rank(),
        };
        self.order.insert(key, node.state.clone());
        self.entries
            .insert(node.state.clone(), FrontierEntry { key, node });

        let size = self.entries.len() as u64;
        if size > self.high_water {
            self.high_water = size;
        }
        displaced
    }

    /// Remove and return the node held for `state`.
    pub fn remove(&mut self, state: &S) -> Option<SearchNode<S>> {
        let entry = self.entries.remove(state)?;
        self.order.remove(&entry.key);
        Some(entry.node)
    }

    /// The node held for `state`, if any.
    #[must_use]
    pub fn get(&self, state: &S) -> Option<&SearchNode<S>> {
        self.entries.get(state).map(|e| &e.node)
    }

    /// Whether a node for `state` is on the frontier.
    #[must_use]
    pub fn contains(&self, state: &S) -> bool {
        self.entries.contains_key(state)
    }

    /// The node with minimum `f_cost`, ties resolved by the tie-break order.
    #[must_use]
    pub fn best(&self) -> Option<&SearchNode<S>> {
        let (_, state) = self.order.first_key_value()?;
        self.get(state)
    }

    /// Remove and return the best node.
    pub fn pop_best(&mut self) -> Option<SearchNode<S>> {
        let (_, state) = self.order.pop_first()?;
        self.entries.remove(&state).map(|e| e.node)
    }

    /// Current frontier size.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the frontier is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// High-water mark of frontier size.
    #[must_use]
    pub fn high_water(&self) -> u64 {
        self.high_water
    }

    /// Nodes in selection order (best first).
    pub fn iter(&self) -> impl Iterator<Item = &SearchNode<S>> + '_ {
        self.order
            .values()
            .filter_map(|state| self.entries.get(state).map(|e| &e.node))
    }
}

impl<S: Clone + Eq + Hash> Default for OpenSet<S> {
    fn default() -> Self {
        Self::new(TieBreak::default())
    }
}
