//! Request a feasibility plan for a route and print the result.
//!
//! Usage:
//!   cargo run -p aero-cli --bin ffm-plan -- \
//!     --waypoint 37.6213,-122.3790,KSFO --waypoint 37.3639,-121.9289,KSJC

use std::sync::Arc;
use std::time::Duration;

use aero_cli::{parse_waypoint, plan_summary, route_summary};
use aero_core::{AircraftProfile, Coordinate, RoutePlan, SafetyPolicy, WeightAndBalance};
use aero_ffm::{FfmClient, FfmConfig, PlanMode};
use aero_planner::{PlanStatus, PlanningSession};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Mock,
    Network,
}

impl From<Mode> for PlanMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Mock => PlanMode::Mock,
            Mode::Network => PlanMode::Network,
        }
    }
}

/// Plan a VFR route with the flight feasibility service
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Waypoint as lat,lon[,name]; repeat in route order
    #[arg(long = "waypoint", short = 'w', value_parser = parse_waypoint, required = true)]
    waypoints: Vec<(Coordinate, Option<String>)>,

    /// Aircraft profile code (C172, PA28, SR22, DA40)
    #[arg(long)]
    aircraft: Option<String>,

    /// Cruise altitude in feet MSL
    #[arg(long)]
    altitude: Option<i32>,

    /// Cruise true airspeed in knots, overrides the aircraft profile
    #[arg(long)]
    cruise: Option<f64>,

    /// Departure time (RFC 3339), defaults to now
    #[arg(long)]
    departure: Option<DateTime<Utc>>,

    /// Planning mode; defaults to network with --url, else FFM_USE_MOCK
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// FFM service base URL, overrides FFM_BASE_URL
    #[arg(long)]
    url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Final reserve in minutes
    #[arg(long, default_value_t = 45)]
    reserve_minutes: u32,

    /// Do not ask the service to enforce minimum en-route altitudes
    #[arg(long)]
    no_mef: bool,

    /// Passengers besides the pilot, for the weight and balance check
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=3))]
    passengers: u32,

    /// Fuel on board in gallons, for the weight and balance check
    #[arg(long)]
    fuel_on_board: Option<f64>,
}

fn build_route(args: &Args) -> Result<RoutePlan> {
    let mut route = RoutePlan::new();
    if let Some(code) = &args.aircraft {
        let Some(profile) = AircraftProfile::find(code) else {
            let known: Vec<&str> = AircraftProfile::catalog().iter().map(|p| p.code).collect();
            bail!("unknown aircraft {code:?}; known: {}", known.join(", "));
        };
        route.apply_aircraft(profile);
    }
    if let Some(altitude) = args.altitude {
        route.set_altitude_ft(altitude);
    }
    if let Some(cruise) = args.cruise {
        route.set_cruise_ktas(cruise);
    }
    if let Some(departure) = args.departure {
        route.set_departure_time(departure);
    }
    for (coordinate, name) in &args.waypoints {
        route.add_waypoint(*coordinate, name.as_deref());
    }
    Ok(route)
}

fn build_config(args: &Args) -> FfmConfig {
    let mut config = FfmConfig::from_env();
    if let Some(url) = &args.url {
        config.base_url = Some(url.clone());
    }
    match args.mode {
        Some(mode) => config.use_mock = matches!(mode, Mode::Mock),
        None if args.url.is_some() => config.use_mock = false,
        None => {}
    }
    if let Some(secs) = args.timeout.filter(|secs| *secs > 0) {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("aero_ffm=info".parse()?)
                .add_directive("aero_planner=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let route = build_route(&args)?;
    let policy = SafetyPolicy {
        reserve_minutes: args.reserve_minutes,
        enforce_mef: !args.no_mef,
    };

    let client = FfmClient::new(build_config(&args)).context("Failed to create FFM client")?;
    let mut session = PlanningSession::new(Arc::new(client))
        .with_route(route)
        .with_policy(policy);
    if let Some(mode) = args.mode {
        session.set_mode(mode.into());
    }

    let status = session.compute_plan().await;

    print!("{}", route_summary(session.route(), session.policy()));
    if let Some(fuel_on_board) = args.fuel_on_board {
        let wb = WeightAndBalance::new(args.passengers, fuel_on_board);
        println!(
            "W&B: gross {:.0} lb, CG {:.2} in ({})",
            wb.total_weight_lb(),
            wb.cg_in(),
            if wb.is_within_limits() { "within limits" } else { "OUT OF LIMITS" }
        );
    }
    print!("{}", plan_summary(session.presentation()));

    match status {
        PlanStatus::Applied => Ok(()),
        PlanStatus::Declined => bail!("route needs at least two waypoints"),
        PlanStatus::Failed => bail!("{}", session.presentation().advisory()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTE: [&str; 5] = [
        "ffm-plan",
        "--waypoint",
        "37.6213,-122.3790,KSFO",
        "--waypoint",
        "37.3639,-121.9289,KSJC",
    ];

    fn parse(extra: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(ROUTE.iter().chain(extra).copied())
    }

    #[test]
    fn url_alone_selects_network_mode() {
        let args = parse(&["--url", "http://ffm.local:8080"]).unwrap();
        let config = build_config(&args);
        assert!(!config.use_mock);
        assert_eq!(config.base_url.as_deref(), Some("http://ffm.local:8080"));
    }

    #[test]
    fn explicit_mode_wins_over_url() {
        let args = parse(&["--url", "http://ffm.local:8080", "--mode", "mock"]).unwrap();
        assert!(build_config(&args).use_mock);
    }

    #[test]
    fn passengers_are_limited_to_three() {
        assert_eq!(parse(&["--passengers", "3"]).unwrap().passengers, 3);
        assert!(parse(&["--passengers", "4"]).is_err());
    }

    #[test]
    fn route_takes_aircraft_and_waypoints() {
        let args = parse(&["--aircraft", "sr22", "--altitude", "25000"]).unwrap();
        let route = build_route(&args).unwrap();
        assert_eq!(route.len(), 2);
        assert_eq!(route.aircraft_type(), "SR22");
        assert_eq!(route.cruise_ktas(), 180.0);
        assert_eq!(route.altitude_ft(), 18_000);

        let args = parse(&["--aircraft", "B747"]).unwrap();
        assert!(build_route(&args).is_err());
    }
}
