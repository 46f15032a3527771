//! Duplicate resolution for freshly generated children.
//!
//! Each child is resolved on its own against the two node sets; no scan
//! state is carried from one child to the next.

use std::hash::Hash;

use crate::explored::ClosedSet;
use crate::frontier::OpenSet;
use crate::node::SearchNode;

/// What happened to a generated child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// First sighting of the state; inserted into the frontier.
    Discovered,
    /// The state was settled but this path is strictly cheaper; the settled
    /// node was dropped and the child inserted into the frontier.
    Reopened { previous_f: u64 },
    /// The state was on the frontier but this path is strictly cheaper; the
    /// frontier entry was superseded.
    Replaced { previous_f: u64 },
    /// An incumbent at equal or lower cost exists; the child was dropped.
    /// `settled` tells whether the incumbent was in the explored set.
    Dominated { incumbent_f: u64, settled: bool },
}

impl Resolution {
    /// Stable snake-case tag used in traces.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Discovered => "discovered",
            Self::Reopened { .. } => "reopened",
            Self::Replaced { .. } => "replaced",
            Self::Dominated { .. } => "dominated",
        }
    }
}

/// Resolve `child` against the explored set, then the frontier.
///
/// Only a strictly lower `f_cost` displaces an incumbent; at equal cost the
/// first-found node stays.
pub fn resolve_successor<S: Clone + Eq + Hash>(
    child: SearchNode<S>,
    open: &mut OpenSet<S>,
    closed: &mut ClosedSet<S>,
) -> Resolution {
    let child_f = child.f_cost();

    if let Some(held) = closed.get(&child.state) {
        let incumbent_f = held.f_cost();
        if child_f < incumbent_f {
            closed.remove(&child.state);
            open.insert(child);
            return Resolution::Reopened {
                previous_f: incumbent_f,
            };
        }
        return Resolution::Dominated {
            incumbent_f,
            settled: true,
        };
    }

    if let Some(held) = open.get(&child.state) {
        let incumbent_f = held.f_cost();
        if child_f < incumbent_f {
            open.insert(child);
            return Resolution::Replaced {
                previous_f: incumbent_f,
            };
        }
        return Resolution::Dominated {
            incumbent_f,
            settled: false,
        };
    }

    open.insert(child);
    Resolution::Discovered
}
