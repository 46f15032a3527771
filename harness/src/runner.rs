//! Harness runner: drive one search and package it as a [`RunReport`].
//!
//! # Pipeline
//!
//! ```text
//! force record_trace → Searcher::new (policy validation)
//!   → Searcher::run → project outcome/stats/policy/trace to JSON
//!   → canonical bytes → build_report
//! ```
//!
//! Search failures (exhaustion, budgets, misbehaving collaborators) are
//! results, not runner errors: they are recorded in `outcome.json` with
//! `"status": "failed"` and still produce a verifiable report. [`RunError`]
//! is reserved for problems that prevent a report from being built at all.

use std::time::Instant;

use serde::Serialize;
use waypoint_search::{SearchError, SearchPolicy, SearchProblem, Searcher};

use crate::canon::canonical_json_bytes;
use crate::contract::SearchWorld;
use crate::report::{
    build_report, path_digest, ReportBuildError, RunReport, FIXTURE_ARTIFACT, OUTCOME_ARTIFACT,
    POLICY_ARTIFACT, STATS_ARTIFACT, TIMING_ARTIFACT, TRACE_ARTIFACT,
};

/// Why no report could be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// The policy was rejected before the search started.
    InvalidPolicy(SearchError),
    /// A state or fixture could not be projected to canonical JSON.
    Serialize { artifact: String, detail: String },
    /// Report assembly failed.
    Build(ReportBuildError),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPolicy(e) => write!(f, "run rejected: {e}"),
            Self::Serialize { artifact, detail } => {
                write!(f, "cannot serialize {artifact}: {detail}")
            }
            Self::Build(e) => write!(f, "report build failed: {e}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidPolicy(e) => Some(e),
            Self::Build(e) => Some(e),
            Self::Serialize { .. } => None,
        }
    }
}

impl From<ReportBuildError> for RunError {
    fn from(e: ReportBuildError) -> Self {
        Self::Build(e)
    }
}

/// Search `problem` from `start` and package the outcome.
///
/// Trace recording is forced on so the report always carries
/// `search_trace.json`.
///
/// # Errors
///
/// [`RunError::InvalidPolicy`] when the policy fails validation,
/// [`RunError::Serialize`] when a state does not project to integer-only
/// JSON, [`RunError::Build`] on report assembly failure.
pub fn run_search<P>(
    problem: &P,
    start: P::State,
    policy: &SearchPolicy,
) -> Result<RunReport, RunError>
where
    P: SearchProblem,
    P::State: Serialize,
{
    execute(problem, start, policy, None)
}

/// Like [`run_search`], starting from the world's own start state and
/// adding its fixture as `fixture.json`.
///
/// # Errors
///
/// Same as [`run_search`].
pub fn run_world<W>(world: &W, policy: &SearchPolicy) -> Result<RunReport, RunError>
where
    W: SearchWorld,
    W::State: Serialize,
{
    execute(world, world.start_state(), policy, Some(world.fixture()))
}

fn execute<P>(
    problem: &P,
    start: P::State,
    policy: &SearchPolicy,
    fixture: Option<serde_json::Value>,
) -> Result<RunReport, RunError>
where
    P: SearchProblem,
    P::State: Serialize,
{
    let effective = SearchPolicy {
        record_trace: true,
        ..policy.clone()
    };
    let mut searcher = Searcher::new(problem, effective.clone()).map_err(RunError::InvalidPolicy)?;

    let began = Instant::now();
    let outcome = searcher.run(start);
    let elapsed_us = u64::try_from(began.elapsed().as_micros()).unwrap_or(u64::MAX);

    let outcome_json = match &outcome {
        Ok(path) => {
            let path_json = to_json(OUTCOME_ARTIFACT, path)?;
            let digest = path_digest(&path_json).map_err(|detail| RunError::Serialize {
                artifact: OUTCOME_ARTIFACT.into(),
                detail,
            })?;
            serde_json::json!({
                "cost": path.len().saturating_sub(1),
                "path": path_json,
                "path_digest": digest.as_str(),
                "problem_id": problem.problem_id(),
                "status": "found",
            })
        }
        Err(e) => serde_json::json!({
            "detail": e.to_string(),
            "error_kind": e.kind(),
            "problem_id": problem.problem_id(),
            "status": "failed",
        }),
    };

    let trace_json = match searcher.trace() {
        Some(trace) => trace.to_json_value().map_err(|e| RunError::Serialize {
            artifact: TRACE_ARTIFACT.into(),
            detail: e.to_string(),
        })?,
        None => serde_json::json!({ "expansions": [] }),
    };

    let mut inputs = vec![
        artifact(OUTCOME_ARTIFACT, &outcome_json, true)?,
        artifact(STATS_ARTIFACT, &searcher.stats().to_json_value(), true)?,
        artifact(POLICY_ARTIFACT, &effective.to_json_value(), true)?,
        artifact(TRACE_ARTIFACT, &trace_json, true)?,
        artifact(
            TIMING_ARTIFACT,
            &serde_json::json!({ "elapsed_us": elapsed_us }),
            false,
        )?,
    ];
    if let Some(fixture) = fixture {
        inputs.push(artifact(FIXTURE_ARTIFACT, &fixture, true)?);
    }

    let report = build_report(inputs)?;
    log::info!(
        "run {}: {} in {elapsed_us}us, digest {}",
        problem.problem_id(),
        match &outcome {
            Ok(_) => "found",
            Err(e) => e.kind(),
        },
        report.digest
    );
    Ok(report)
}

fn to_json<T: Serialize + ?Sized>(name: &str, value: &T) -> Result<serde_json::Value, RunError> {
    serde_json::to_value(value).map_err(|e| RunError::Serialize {
        artifact: name.into(),
        detail: e.to_string(),
    })
}

fn artifact(
    name: &str,
    value: &serde_json::Value,
    normative: bool,
) -> Result<(String, Vec<u8>, bool), RunError> {
    let bytes = canonical_json_bytes(value).map_err(|e| RunError::Serialize {
        artifact: name.into(),
        detail: e.to_string(),
    })?;
    Ok((name.to_string(), bytes, normative))
}
