//! Binary that runs the lock-test worlds through the harness runner and
//! prints deterministic output lines for cross-process verification.
//!
//! Usage: `search_fixture`
//!
//! Output: one `key=value` line per fact, grouped by world. Wall-clock
//! timing is deliberately not printed. Logging goes to stderr (`RUST_LOG`).

use lock_tests::{abcd_world, reopen_world, MAZE_ROOMS, PUZZLE_MID};
use waypoint_harness::contract::SearchWorld;
use waypoint_harness::report::{verify_report, RunReport, OUTCOME_ARTIFACT, STATS_ARTIFACT};
use waypoint_harness::runner::run_world;
use waypoint_harness::worlds::grid_maze::GridMaze;
use waypoint_harness::worlds::sliding_tile::SlidingTile;
use waypoint_search::SearchPolicy;

fn main() {
    env_logger::init();
    let policy = SearchPolicy::default();

    let maze = GridMaze::parse("maze_rooms", MAZE_ROOMS).expect("maze fixture parses");
    let puzzle = SlidingTile::new("puzzle_mid", 3, PUZZLE_MID.to_vec()).expect("puzzle fixture");

    emit("abcd", &run(&abcd_world(), &policy));
    emit("reopen", &run(&reopen_world(), &policy));
    emit("maze", &run(&maze, &policy));
    emit("puzzle", &run(&puzzle, &policy));
}

fn run<W>(world: &W, policy: &SearchPolicy) -> RunReport
where
    W: SearchWorld,
    W::State: serde::Serialize,
{
    let report = run_world(world, policy).expect("run_world failed");
    verify_report(&report).expect("report does not verify");
    report
}

fn emit(label: &str, report: &RunReport) {
    let outcome = report
        .artifact_json(OUTCOME_ARTIFACT)
        .expect("missing outcome.json");
    let stats = report
        .artifact_json(STATS_ARTIFACT)
        .expect("missing stats.json");

    println!("{label}.report_digest={}", report.digest);
    println!("{label}.status={}", outcome["status"].as_str().unwrap_or("?"));
    println!(
        "{label}.path_digest={}",
        outcome["path_digest"].as_str().unwrap_or("none")
    );
    println!("{label}.cost={}", outcome["cost"]);
    for key in ["expanded", "generated", "distinct", "reopened", "replaced", "discarded"] {
        println!("{label}.{key}={}", stats[key]);
    }
    println!("{label}.artifact_count={}", report.artifacts.len());
}
