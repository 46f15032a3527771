//! `GraphWorld`: an explicit directed graph with a heuristic table.
//!
//! States are node names. Successors come back in edge insertion order, so
//! tie-breaking is reproducible. Nodes missing from the heuristic table
//! estimate 0.

use std::collections::{BTreeMap, BTreeSet};

use waypoint_search::SearchProblem;

use crate::contract::{SearchWorld, WorldError};

/// Explicit directed graph world.
#[derive(Debug, Clone)]
pub struct GraphWorld {
    id: String,
    start: String,
    edges: BTreeMap<String, Vec<String>>,
    heuristic: BTreeMap<String, i64>,
    goals: BTreeSet<String>,
}

impl GraphWorld {
    /// An empty graph starting at `start`.
    #[must_use]
    pub fn new(id: impl Into<String>, start: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start: start.into(),
            edges: BTreeMap::new(),
            heuristic: BTreeMap::new(),
            goals: BTreeSet::new(),
        }
    }

    /// Add a directed edge. Repeated edges are ignored.
    #[must_use]
    pub fn edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        let to = to.into();
        let targets = self.edges.entry(from.into()).or_default();
        if !targets.contains(&to) {
            targets.push(to);
        }
        self
    }

    /// Add edges from `from` to each of `targets`, in order.
    #[must_use]
    pub fn edges<I, T>(self, from: &str, targets: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        targets
            .into_iter()
            .fold(self, |world, to| world.edge(from, to))
    }

    /// Set the heuristic estimate for `node`.
    #[must_use]
    pub fn estimate(mut self, node: impl Into<String>, h: i64) -> Self {
        self.heuristic.insert(node.into(), h);
        self
    }

    /// Mark `node` as a goal.
    #[must_use]
    pub fn goal(mut self, node: impl Into<String>) -> Self {
        self.goals.insert(node.into());
        self
    }

    /// Parse a line-oriented description.
    ///
    /// ```text
    /// # comment
    /// start A
    /// goal D
    /// A -> B C
    /// h A 2
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Parse`] for an unknown directive or a bad
    /// estimate, and [`WorldError::Invalid`] if `start` or `goal` is missing.
    pub fn parse(id: &str, text: &str) -> Result<Self, WorldError> {
        let mut start = None;
        let mut world = Self::new(id, "");

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            match tokens.as_slice() {
                ["start", node] => start = Some((*node).to_string()),
                ["goal", nodes @ ..] if !nodes.is_empty() => {
                    for node in nodes {
                        world = world.goal(*node);
                    }
                }
                ["h", node, value] => {
                    let h = value.parse::<i64>().map_err(|e| WorldError::Parse {
                        line: line_no,
                        detail: format!("bad estimate {value:?}: {e}"),
                    })?;
                    world = world.estimate(*node, h);
                }
                [from, "->", targets @ ..] => {
                    world = world.edges(from, targets.iter().copied());
                }
                _ => {
                    return Err(WorldError::Parse {
                        line: line_no,
                        detail: format!("unrecognized line {line:?}"),
                    })
                }
            }
        }

        let Some(start) = start else {
            return Err(WorldError::Invalid {
                detail: "missing `start` directive".into(),
            });
        };
        if world.goals.is_empty() {
            return Err(WorldError::Invalid {
                detail: "missing `goal` directive".into(),
            });
        }
        world.start = start;
        Ok(world)
    }
}

impl SearchProblem for GraphWorld {
    type State = String;

    fn problem_id(&self) -> &str {
        &self.id
    }

    fn is_goal(&self, state: &String) -> bool {
        self.goals.contains(state)
    }

    fn successors(&self, state: &String) -> Vec<String> {
        self.edges.get(state).cloned().unwrap_or_default()
    }

    fn heuristic(&self, state: &String) -> i64 {
        self.heuristic.get(state).copied().unwrap_or(0)
    }
}

impl SearchWorld for GraphWorld {
    fn start_state(&self) -> String {
        self.start.clone()
    }

    fn fixture(&self) -> serde_json::Value {
        serde_json::json!({
            "edges": self.edges,
            "goals": self.goals,
            "heuristic": self.heuristic,
            "kind": "graph",
            "start": self.start,
        })
    }
}
