//! Search entry point and expansion loop.

use std::any::Any;
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use crate::contract::{FnProblem, SearchProblem};
use crate::error::{CollaboratorStage, SearchError};
use crate::explored::ClosedSet;
use crate::frontier::OpenSet;
use crate::node::{make_node, SearchNode};
use crate::path::reconstruct_path;
use crate::policy::SearchPolicy;
use crate::resolver::{resolve_successor, Resolution};
use crate::stats::SearchStats;
use crate::trace::{ExpansionEvent, SearchTrace, SuccessorRecord};

/// Outcome of a single [`Searcher::step`].
///
/// Exhaustion is not a status: an empty frontier is reported as
/// [`SearchError::FrontierExhausted`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus<S> {
    /// One node was expanded; the goal has not been selected yet.
    Searching,
    /// The selected node satisfies the goal predicate.
    Found(SearchNode<S>),
}

/// A successful search.
#[derive(Debug, Clone)]
pub struct Solution<S> {
    /// States from the start state to a goal state, inclusive.
    pub path: Vec<S>,
    /// Counters at the moment the goal was selected.
    pub stats: SearchStats,
    /// Expansion audit log (only when the policy records one).
    pub trace: Option<SearchTrace<S>>,
}

impl<S> Solution<S> {
    /// Number of steps on the path.
    #[must_use]
    pub fn cost(&self) -> u64 {
        self.path.len().saturating_sub(1) as u64
    }
}

/// Per-call search context.
///
/// Owns the frontier, the explored set, the counters and the optional trace
/// for exactly one search at a time. Independent searches use independent
/// `Searcher`s; nothing is shared between them.
pub struct Searcher<'p, P: SearchProblem> {
    problem: &'p P,
    policy: SearchPolicy,
    open: OpenSet<P::State>,
    closed: ClosedSet<P::State>,
    stats: SearchStats,
    trace: Option<SearchTrace<P::State>>,
    goal: Option<SearchNode<P::State>>,
    started_at: Option<Instant>,
}

impl<'p, P: SearchProblem> Searcher<'p, P> {
    /// Create a searcher for `problem` under `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] if the policy fails validation.
    pub fn new(problem: &'p P, policy: SearchPolicy) -> Result<Self, SearchError> {
        policy.validate()?;
        Ok(Self {
            problem,
            open: OpenSet::new(policy.tie_break),
            closed: ClosedSet::new(),
            stats: SearchStats::new(),
            trace: None,
            goal: None,
            started_at: None,
            policy,
        })
    }

    /// Reset all bookkeeping and seed the frontier with `start`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::MalformedCollaborator`] if the heuristic
    /// panics or returns a negative estimate for the start state.
    pub fn start(&mut self, start: P::State) -> Result<(), SearchError> {
        self.open = OpenSet::new(self.policy.tie_break);
        self.closed = ClosedSet::new();
        self.stats = SearchStats::new();
        self.trace = self.policy.record_trace.then(SearchTrace::new);
        self.goal = None;
        self.started_at = Some(Instant::now());

        let h_cost = self.evaluate(&start)?;
        log::debug!(
            "search start: problem={} start={start:?} h={h_cost}",
            self.problem.problem_id()
        );
        self.open.insert(SearchNode::root(start, h_cost));
        self.stats.frontier_high_water = self.open.high_water();
        Ok(())
    }

    /// Select the best frontier node and either report it as the goal or
    /// expand it.
    ///
    /// Once a goal has been found, further calls keep returning it. Calling
    /// `step` before [`Searcher::start`] reports an exhausted frontier.
    ///
    /// # Errors
    ///
    /// - [`SearchError::FrontierExhausted`] when no node is left to select.
    /// - [`SearchError::ExpansionBudgetExceeded`] / [`SearchError::TimeLimitExceeded`]
    ///   when a policy budget runs out before the goal is selected.
    /// - [`SearchError::MalformedCollaborator`] when a collaborator panics or
    ///   breaks its contract. The selected node is left on the frontier, so a
    ///   repeated call reports the same failure.
    pub fn step(&mut self) -> Result<SearchStatus<P::State>, SearchError> {
        if let Some(goal) = &self.goal {
            return Ok(SearchStatus::Found(goal.clone()));
        }
        self.check_time_limit()?;

        let Some(current) = self.open.best().cloned() else {
            return Err(SearchError::FrontierExhausted { stats: self.stats });
        };
        if self.test_goal(&current.state)? {
            self.goal = Some(current.clone());
            return Ok(SearchStatus::Found(current));
        }

        // Checked after the goal test: a goal selected once the budget is
        // spent is still found.
        if let Some(limit) = self.policy.max_expansions {
            if self.stats.expanded >= limit {
                return Err(SearchError::ExpansionBudgetExceeded {
                    limit,
                    stats: self.stats,
                });
            }
        }

        // The node stays on the frontier until its children are built, so a
        // collaborator failure leaves both node sets untouched.
        let successor_states = self.generate(&current.state)?;
        let mut children = Vec::with_capacity(successor_states.len());
        for state in successor_states {
            let h_cost = self.evaluate(&state)?;
            children.push(make_node(state, &current, h_cost));
        }
        if self.open.pop_best().is_none() {
            return Err(SearchError::FrontierExhausted { stats: self.stats });
        }

        let expansion_order = self.stats.expanded;
        self.stats.expanded += 1;
        self.stats.generated += children.len() as u64;
        log::trace!(
            "expand #{expansion_order}: {:?} g={} h={} children={}",
            current.state,
            current.g_cost,
            current.h_cost,
            children.len()
        );

        let mut event = self.trace.as_ref().map(|_| ExpansionEvent {
            expansion_order,
            state: current.state.clone(),
            g_cost: current.g_cost,
            h_cost: current.h_cost,
            successors: Vec::with_capacity(children.len()),
        });

        self.closed.insert(current);

        for child in children {
            let record_state = event.as_ref().map(|_| child.state.clone());
            let f_cost = child.f_cost();
            let outcome = resolve_successor(child, &mut self.open, &mut self.closed);
            match outcome {
                Resolution::Discovered => self.stats.distinct += 1,
                Resolution::Reopened { .. } => self.stats.reopened += 1,
                Resolution::Replaced { .. } => self.stats.replaced += 1,
                Resolution::Dominated { .. } => self.stats.discarded += 1,
            }
            if let (Some(ev), Some(state)) = (event.as_mut(), record_state) {
                ev.successors.push(SuccessorRecord {
                    state,
                    f_cost,
                    outcome,
                });
            }
        }

        if let (Some(trace), Some(ev)) = (self.trace.as_mut(), event) {
            trace.push(ev);
        }
        self.stats.frontier_high_water = self.open.high_water();
        Ok(SearchStatus::Searching)
    }

    /// Search from `start` until a goal is selected, then rebuild the path.
    ///
    /// # Errors
    ///
    /// Any error from [`Searcher::start`], [`Searcher::step`] or
    /// [`reconstruct_path`].
    pub fn run(&mut self, start: P::State) -> Result<Vec<P::State>, SearchError> {
        let outcome = self.drive(start);
        match &outcome {
            Ok(path) => log::debug!(
                "search done: problem={} path_len={} expanded={} generated={} distinct={}",
                self.problem.problem_id(),
                path.len(),
                self.stats.expanded,
                self.stats.generated,
                self.stats.distinct
            ),
            Err(e) => log::debug!(
                "search failed: problem={} reason={e}",
                self.problem.problem_id()
            ),
        }
        outcome
    }

    fn drive(&mut self, start: P::State) -> Result<Vec<P::State>, SearchError> {
        self.start(start)?;
        loop {
            if let SearchStatus::Found(goal) = self.step()? {
                return reconstruct_path(&goal, &self.open, &self.closed);
            }
        }
    }

    /// Counters for the current (or last) search.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    #[must_use]
    pub fn policy(&self) -> &SearchPolicy {
        &self.policy
    }

    #[must_use]
    pub fn open(&self) -> &OpenSet<P::State> {
        &self.open
    }

    #[must_use]
    pub fn closed(&self) -> &ClosedSet<P::State> {
        &self.closed
    }

    /// The goal node, once selected.
    #[must_use]
    pub fn goal(&self) -> Option<&SearchNode<P::State>> {
        self.goal.as_ref()
    }

    #[must_use]
    pub fn trace(&self) -> Option<&SearchTrace<P::State>> {
        self.trace.as_ref()
    }

    #[must_use]
    pub fn into_trace(self) -> Option<SearchTrace<P::State>> {
        self.trace
    }

    /// Whether no state is held by both the frontier and the explored set.
    ///
    /// Linear in the frontier size.
    #[must_use]
    pub fn sets_are_disjoint(&self) -> bool {
        self.open.iter().all(|n| !self.closed.contains(&n.state))
    }

    fn check_time_limit(&self) -> Result<(), SearchError> {
        if let (Some(limit), Some(started_at)) = (self.policy.time_limit, self.started_at) {
            if started_at.elapsed() >= limit {
                return Err(SearchError::TimeLimitExceeded {
                    limit,
                    stats: self.stats,
                });
            }
        }
        Ok(())
    }

    fn test_goal(&self, state: &P::State) -> Result<bool, SearchError> {
        self.guard(CollaboratorStage::IsGoal, || self.problem.is_goal(state))
    }

    /// Compute the heuristic once and check it is non-negative.
    fn evaluate(&self, state: &P::State) -> Result<u64, SearchError> {
        let raw = self.guard(CollaboratorStage::Heuristic, || {
            self.problem.heuristic(state)
        })?;
        u64::try_from(raw).map_err(|_| {
            self.malformed(
                CollaboratorStage::Heuristic,
                format!("negative estimate {raw} for {state:?}"),
            )
        })
    }

    fn generate(&self, state: &P::State) -> Result<Vec<P::State>, SearchError> {
        let successors = self.guard(CollaboratorStage::Successors, || {
            self.problem.successors(state)
        })?;
        if let Some(dup) = first_repeat(&successors) {
            return Err(self.malformed(
                CollaboratorStage::Successors,
                format!("{dup:?} returned twice as a successor of {state:?}"),
            ));
        }
        Ok(successors)
    }

    fn guard<T>(&self, stage: CollaboratorStage, f: impl FnOnce() -> T) -> Result<T, SearchError> {
        catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
            self.malformed(stage, format!("panicked: {}", panic_detail(&*payload)))
        })
    }

    fn malformed(&self, stage: CollaboratorStage, detail: String) -> SearchError {
        SearchError::MalformedCollaborator {
            stage,
            detail,
            stats: self.stats,
        }
    }
}

fn first_repeat<S: Eq + std::hash::Hash>(states: &[S]) -> Option<&S> {
    let mut seen = HashSet::with_capacity(states.len());
    states.iter().find(|s| !seen.insert(*s))
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Run best-first search from `start` under `policy`.
///
/// # Errors
///
/// See [`Searcher::new`] and [`Searcher::run`]. Callers must branch on
/// [`SearchError::FrontierExhausted`] before treating the result as a path.
pub fn search<P: SearchProblem>(
    start: P::State,
    problem: &P,
    policy: &SearchPolicy,
) -> Result<Solution<P::State>, SearchError> {
    let mut searcher = Searcher::new(problem, policy.clone())?;
    let path = searcher.run(start)?;
    let stats = *searcher.stats();
    Ok(Solution {
        path,
        stats,
        trace: searcher.into_trace(),
    })
}

/// Run best-first search over three closures with the default policy.
///
/// # Errors
///
/// See [`search`].
pub fn search_fn<S, G, N, H>(
    start: S,
    goal: G,
    successors: N,
    heuristic: H,
) -> Result<Solution<S>, SearchError>
where
    S: Clone + Eq + std::hash::Hash + std::fmt::Debug,
    G: Fn(&S) -> bool,
    N: Fn(&S) -> Vec<S>,
    H: Fn(&S) -> i64,
{
    let problem = FnProblem::new(goal, successors, heuristic);
    search(start, &problem, &SearchPolicy::default())
}
