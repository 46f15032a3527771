//! `SearchTrace`: expansion-event audit log.
//!
//! The trace records, in expansion order, every node taken off the frontier
//! and what happened to each of its children. All numbers are integers, so
//! the JSON projection is safe for canonical hashing.

use serde::Serialize;

use crate::resolver::Resolution;

/// One generated child and its resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessorRecord<S> {
    pub state: S,
    pub f_cost: u64,
    pub outcome: Resolution,
}

/// A single frontier-pop + expansion event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionEvent<S> {
    /// Zero-based position in the expansion sequence.
    pub expansion_order: u64,
    /// The expanded state.
    pub state: S,
    pub g_cost: u64,
    pub h_cost: u64,
    /// Children in the order the problem produced them.
    pub successors: Vec<SuccessorRecord<S>>,
}

/// Ordered expansion events for one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTrace<S> {
    pub expansions: Vec<ExpansionEvent<S>>,
}

impl<S> SearchTrace<S> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            expansions: Vec::new(),
        }
    }

    pub fn push(&mut self, event: ExpansionEvent<S>) {
        self.expansions.push(event);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.expansions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expansions.is_empty()
    }

    /// Expanded states in expansion order.
    pub fn expanded_states(&self) -> impl Iterator<Item = &S> + '_ {
        self.expansions.iter().map(|e| &e.state)
    }
}

impl<S> Default for SearchTrace<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Serialize> SearchTrace<S> {
    /// Convert to a `serde_json::Value`.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if a state fails to serialize.
    pub fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        let expansions = self
            .expansions
            .iter()
            .map(expansion_to_json)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(serde_json::json!({ "expansions": expansions }))
    }
}

fn expansion_to_json<S: Serialize>(
    e: &ExpansionEvent<S>,
) -> Result<serde_json::Value, serde_json::Error> {
    let successors = e
        .successors
        .iter()
        .map(|r| -> Result<serde_json::Value, serde_json::Error> {
            Ok(serde_json::json!({
                "f_cost": r.f_cost,
                "outcome": resolution_to_json(r.outcome),
                "state": serde_json::to_value(&r.state)?,
            }))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(serde_json::json!({
        "expansion_order": e.expansion_order,
        "g_cost": e.g_cost,
        "h_cost": e.h_cost,
        "state": serde_json::to_value(&e.state)?,
        "successors": successors,
    }))
}

fn resolution_to_json(r: Resolution) -> serde_json::Value {
    let mut value = match r {
        Resolution::Discovered => serde_json::json!({}),
        Resolution::Reopened { previous_f } | Resolution::Replaced { previous_f } => {
            serde_json::json!({ "previous_f": previous_f })
        }
        Resolution::Dominated {
            incumbent_f,
            settled,
        } => serde_json::json!({ "incumbent_f": incumbent_f, "settled": settled }),
    };
    value["type"] = serde_json::Value::from(r.as_str());
    value
}
