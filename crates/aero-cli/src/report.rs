//! Plain-text planning reports.

use std::fmt::Write as _;

use aero_core::{RoutePlan, SafetyPolicy};
use aero_planner::Presentation;

use crate::waypoint_arg::format_waypoint;

/// Format seconds as `1h 05m` / `13m`.
pub fn format_duration(secs: f64) -> String {
    let total_minutes = (secs.max(0.0) / 60.0).round() as u64;
    let (hours, minutes) = (total_minutes / 60, total_minutes % 60);
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else {
        format!("{minutes}m")
    }
}

pub fn route_summary(route: &RoutePlan, policy: &SafetyPolicy) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Route: {} waypoints, {} @ {} ft, {:.0} kt, {:.1} gph",
        route.len(),
        route.aircraft_type(),
        route.altitude_ft(),
        route.cruise_ktas(),
        route.fuel_burn_gph()
    );
    for waypoint in route.waypoints() {
        let _ = writeln!(out, "  {}", format_waypoint(waypoint));
    }
    for leg in route.legs() {
        let _ = writeln!(
            out,
            "  leg {}: {:.1} NM, {:03.0}°",
            leg.index, leg.distance_nm, leg.initial_bearing_deg
        );
    }

    let fuel = route.fuel_plan(policy);
    let _ = writeln!(
        out,
        "Distance {:.1} NM, ETE {}, ETA {}",
        route.total_distance_nm(),
        format_duration(route.estimated_time_secs()),
        route.estimated_arrival().format("%H:%MZ")
    );
    let _ = writeln!(
        out,
        "Fuel: trip {:.1} gal + contingency {:.1} + reserve {:.1} ({} min) = {:.1} gal",
        fuel.trip_gal,
        fuel.contingency_gal,
        fuel.final_reserve_gal,
        policy.reserve_minutes,
        fuel.total_gal
    );
    out
}

pub fn plan_summary(presentation: &Presentation) -> String {
    let mut out = String::new();
    if !presentation.advisory().is_empty() {
        let _ = writeln!(out, "Advisory: {}", presentation.advisory());
    }
    if let Some(path) = presentation.computed_path() {
        let _ = writeln!(out, "Planned path: {} points", path.len());
    }
    for risk in presentation.leg_risks() {
        let _ = writeln!(
            out,
            "  leg {}->{}: icing {:.2}, turbulence {:.2}, terrain {:.2}",
            risk.from_index, risk.to_index, risk.icing, risk.turbulence, risk.terrain
        );
    }
    if !presentation.alternates().is_empty() {
        let _ = writeln!(out, "Alternates: {}", presentation.alternates().join(", "));
    }
    for overlay in presentation.overlays() {
        let _ = writeln!(out, "Risk tiles: {}", overlay.url_template);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use aero_core::{Coordinate, FeasibilityResponse};

    #[test]
    fn durations() {
        assert_eq!(format_duration(0.0), "0m");
        assert_eq!(format_duration(793.0), "13m");
        assert_eq!(format_duration(3_900.0), "1h 05m");
    }

    #[test]
    fn route_summary_lists_legs_and_fuel() {
        let mut route = RoutePlan::new();
        route.add_waypoint(Coordinate::new(37.6213, -122.3790), Some("KSFO"));
        route.add_waypoint(Coordinate::new(37.3639, -121.9289), Some("KSJC"));

        let text = route_summary(&route, &SafetyPolicy::default());
        assert!(text.contains("Route: 2 waypoints, GA @ 8000 ft, 120 kt, 8.5 gph"));
        assert!(text.contains("37.6213,-122.3790,KSFO"));
        assert!(text.contains("leg 0: 26.4 NM"));
        assert!(text.contains("Distance 26.4 NM, ETE 13m"));
        assert!(text.contains("(45 min)"));
    }

    #[test]
    fn plan_summary_shows_risks() {
        let mut presentation = Presentation::new();
        assert!(plan_summary(&presentation).is_empty());

        presentation.apply_response(FeasibilityResponse::canned());
        let text = plan_summary(&presentation);
        assert!(text.contains("Advisory: Moderate turbulence"));
        assert!(text.contains("leg 0->1: icing 0.20, turbulence 0.40, terrain 0.10"));
        assert!(text.contains("Alternates: KOAK, KSQL"));
        assert!(text.contains("Planned path: 2 points"));
    }
}
