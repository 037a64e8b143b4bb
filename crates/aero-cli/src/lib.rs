//! Aero CLI - command line tools for route and feasibility planning.
//!
//! This crate provides the CLI binaries:
//! - ffm-plan: build a route, request a feasibility plan and print the result

pub mod report;
pub mod waypoint_arg;

pub use report::{plan_summary, route_summary};
pub use waypoint_arg::parse_waypoint;
