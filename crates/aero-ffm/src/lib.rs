//! FFM client - feasibility planning requests over HTTP or from a canned plan.

pub mod client;
pub mod config;
pub mod error;

pub use client::{FfmClient, PlanMode};
pub use config::FfmConfig;
pub use error::FfmError;
