//! Waypoint harness: reference worlds and auditable run reports.
//!
//! The harness runs a [`waypoint_search::SearchProblem`] through the core
//! search and packages the outcome as a self-contained, content-hashed
//! report that can be written to disk and verified offline.
//!
//! The harness does NOT implement search logic; it delegates to
//! `waypoint-search`. Worlds provide domain data only.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod canon;
pub mod contract;
pub mod hash;
pub mod report;
pub mod report_dir;
pub mod runner;
pub mod worlds;
