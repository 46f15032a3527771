//! Run report lock tests.
//!
//! Proves:
//! 1. Reports for the same problem and policy have identical digests, in
//!    process and regardless of wall-clock timing.
//! 2. Every run, found or failed, yields a report that verifies.
//! 3. Report content reflects the search (path, cost, counters, trace).
//! 4. Semantic tampering is caught even when every hash is recomputed.

use lock_tests::{abcd_world, rebuild_with_modified, reopen_world, MAZE_ROOMS, MAZE_SEALED, PUZZLE_MID};
use waypoint_harness::contract::SearchWorld;
use waypoint_harness::report::{
    verify_report, ReportVerifyError, FIXTURE_ARTIFACT, OUTCOME_ARTIFACT, POLICY_ARTIFACT,
    STATS_ARTIFACT, TIMING_ARTIFACT, TRACE_ARTIFACT,
};
use waypoint_harness::runner::{run_search, run_world};
use waypoint_harness::worlds::grid_maze::GridMaze;
use waypoint_harness::worlds::sliding_tile::SlidingTile;
use waypoint_search::{search, SearchPolicy, TieBreak};

// ---------------------------------------------------------------------------
// ACCEPTANCE: determinism
// ---------------------------------------------------------------------------

#[test]
fn report_digest_is_stable_n10() {
    let maze = GridMaze::parse("rooms", MAZE_ROOMS).unwrap();
    let first = run_world(&maze, &SearchPolicy::default()).unwrap();
    for _ in 1..10 {
        let again = run_world(&maze, &SearchPolicy::default()).unwrap();
        assert_eq!(again.digest, first.digest);
        assert_eq!(again.digest_basis, first.digest_basis);
        for (name, artifact) in &first.artifacts {
            if artifact.normative {
                assert_eq!(again.artifacts[name].content, artifact.content, "{name} differs");
            }
        }
    }
}

#[test]
fn timing_is_the_only_observational_artifact() {
    let report = run_world(&abcd_world(), &SearchPolicy::default()).unwrap();
    let observational: Vec<&str> = report
        .artifacts
        .values()
        .filter(|a| !a.normative)
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(observational, [TIMING_ARTIFACT]);
}

#[test]
fn policy_change_changes_digest() {
    let world = abcd_world();
    let lifo = run_world(&world, &SearchPolicy::default()).unwrap();
    let fifo = run_world(
        &world,
        &SearchPolicy {
            tie_break: TieBreak::Fifo,
            ..SearchPolicy::default()
        },
    )
    .unwrap();
    assert_ne!(lifo.digest, fifo.digest);
    // Same path: the policy echo alone separates them.
    assert_eq!(
        lifo.artifact_json(OUTCOME_ARTIFACT).unwrap()["path_digest"],
        fifo.artifact_json(OUTCOME_ARTIFACT).unwrap()["path_digest"]
    );
}

// ---------------------------------------------------------------------------
// ACCEPTANCE: content
// ---------------------------------------------------------------------------

#[test]
fn report_matches_direct_search() {
    let world = reopen_world();
    let direct = search(world.start_state(), &world, &SearchPolicy::default()).unwrap();
    let report = run_world(&world, &SearchPolicy::default()).unwrap();
    verify_report(&report).unwrap();

    let outcome = report.artifact_json(OUTCOME_ARTIFACT).unwrap();
    assert_eq!(outcome["status"], "found");
    assert_eq!(outcome["problem_id"], "reopen");
    assert_eq!(outcome["path"], serde_json::json!(direct.path));
    assert_eq!(outcome["cost"], direct.cost());

    let stats = report.artifact_json(STATS_ARTIFACT).unwrap();
    assert_eq!(stats, direct.stats.to_json_value());

    let trace = report.artifact_json(TRACE_ARTIFACT).unwrap();
    let expansions = trace["expansions"].as_array().unwrap();
    assert_eq!(expansions.len() as u64, direct.stats.expanded);
    let reopened = expansions
        .iter()
        .flat_map(|e| e["successors"].as_array().unwrap())
        .filter(|s| s["outcome"]["type"] == "reopened")
        .count();
    assert_eq!(reopened, 1);

    let fixture = report.artifact_json(FIXTURE_ARTIFACT).unwrap();
    assert_eq!(fixture["kind"], "graph");
}

#[test]
fn grid_states_serialize_as_cells() {
    let maze = GridMaze::parse("rooms", MAZE_ROOMS).unwrap();
    let report = run_world(&maze, &SearchPolicy::default()).unwrap();
    let outcome = report.artifact_json(OUTCOME_ARTIFACT).unwrap();
    let path = outcome["path"].as_array().unwrap();
    assert_eq!(path[0], serde_json::json!({"col": 0, "row": 0}));
    assert_eq!(path.last().unwrap(), &serde_json::json!({"col": 9, "row": 6}));
}

#[test]
fn failed_runs_verify() {
    let sealed = GridMaze::parse("sealed", MAZE_SEALED).unwrap();
    let report = run_world(&sealed, &SearchPolicy::default()).unwrap();
    verify_report(&report).unwrap();
    let outcome = report.artifact_json(OUTCOME_ARTIFACT).unwrap();
    assert_eq!(outcome["status"], "failed");
    assert_eq!(outcome["error_kind"], "frontier_exhausted");
    assert!(outcome.get("path").is_none());

    let puzzle = SlidingTile::new("mid", 3, PUZZLE_MID.to_vec()).unwrap();
    let budget = SearchPolicy {
        max_expansions: Some(3),
        ..SearchPolicy::default()
    };
    let report = run_world(&puzzle, &budget).unwrap();
    verify_report(&report).unwrap();
    let outcome = report.artifact_json(OUTCOME_ARTIFACT).unwrap();
    assert_eq!(outcome["error_kind"], "expansion_budget_exceeded");
    let policy = report.artifact_json(POLICY_ARTIFACT).unwrap();
    assert_eq!(policy["max_expansions"], 3);
}

#[test]
fn run_search_accepts_explicit_start() {
    let world = abcd_world();
    let report = run_search(&world, "B".to_string(), &SearchPolicy::default()).unwrap();
    verify_report(&report).unwrap();
    let outcome = report.artifact_json(OUTCOME_ARTIFACT).unwrap();
    assert_eq!(outcome["path"], serde_json::json!(["B", "D"]));
}

// ---------------------------------------------------------------------------
// ACCEPTANCE: tamper detection
// ---------------------------------------------------------------------------

#[test]
fn rewritten_path_with_stale_digest_is_rejected() {
    let report = run_world(&abcd_world(), &SearchPolicy::default()).unwrap();
    let forged = rebuild_with_modified(&report, OUTCOME_ARTIFACT, |v| {
        v["path"] = serde_json::json!(["A", "C", "D"]);
    });
    assert!(matches!(
        verify_report(&forged),
        Err(ReportVerifyError::PathDigestMismatch { .. })
    ));
}

#[test]
fn rewritten_cost_is_rejected() {
    let report = run_world(&abcd_world(), &SearchPolicy::default()).unwrap();
    let forged = rebuild_with_modified(&report, OUTCOME_ARTIFACT, |v| {
        v["cost"] = serde_json::json!(1);
    });
    assert!(matches!(
        verify_report(&forged),
        Err(ReportVerifyError::CostMismatch { declared: 1, path_len: 3 })
    ));
}

#[test]
fn inflated_counter_is_rejected() {
    let report = run_world(&abcd_world(), &SearchPolicy::default()).unwrap();
    let forged = rebuild_with_modified(&report, STATS_ARTIFACT, |v| {
        v["generated"] = serde_json::json!(99);
    });
    assert_eq!(verify_report(&forged), Err(ReportVerifyError::StatsUnbalanced));
}

#[test]
fn overflowing_counters_fail_closed() {
    let report = run_world(&abcd_world(), &SearchPolicy::default()).unwrap();
    let forged = rebuild_with_modified(&report, STATS_ARTIFACT, |v| {
        v["reopened"] = serde_json::json!(u64::MAX);
        v["replaced"] = serde_json::json!(u64::MAX);
    });
    assert_eq!(verify_report(&forged), Err(ReportVerifyError::StatsUnbalanced));
}

#[test]
fn forged_report_has_different_digest() {
    let report = run_world(&abcd_world(), &SearchPolicy::default()).unwrap();
    let forged = rebuild_with_modified(&report, POLICY_ARTIFACT, |v| {
        v["tie_break"] = serde_json::json!("fifo");
    });
    verify_report(&forged).unwrap();
    assert_ne!(forged.digest, report.digest);
}
