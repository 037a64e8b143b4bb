//! Feasibility planning wire contract and request construction.
//!
//! The request/response types here are the JSON schema spoken by the FFM
//! planning service. The same types are used by the mock path, the network
//! client and the offline mock service, so switching modes never changes the
//! shape a caller sees.

use serde::{Deserialize, Serialize};

use crate::models::Coordinate;
use crate::route::RoutePlan;
use crate::rules::{
    clamp_cruise_ktas, clamp_fuel_burn_gph, SafetyPolicy, MIN_ALTITUDE_FT,
};

/// Errors raised while preparing a plan request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanningError {
    #[error("route needs at least 2 waypoints to plan, has {waypoints}")]
    InsufficientRoute { waypoints: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftDescriptor {
    #[serde(rename = "type")]
    pub aircraft_type: String,
    #[serde(rename = "trueAirspeedKTAS")]
    pub true_airspeed_ktas: f64,
    #[serde(rename = "fuelBurnGPH")]
    pub fuel_burn_gph: f64,
}

/// Body of `POST /v1/plan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityRequest {
    pub aircraft: AircraftDescriptor,
    pub route: Vec<Coordinate>,
    pub policy: SafetyPolicy,
}

/// Risk scores for one leg of the planned path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegRisk {
    pub from_index: usize,
    pub to_index: usize,
    pub icing: f64,
    pub turbulence: f64,
    pub terrain: f64,
}

impl LegRisk {
    /// Highest of the three hazard scores.
    pub fn peak(&self) -> f64 {
        self.icing.max(self.turbulence).max(self.terrain)
    }
}

/// Plan returned by the feasibility service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeasibilityResponse {
    pub polyline: Vec<Coordinate>,
    pub leg_risks: Vec<LegRisk>,
    pub alternates: Vec<String>,
    pub advisory: String,
    pub risk_tile_templates: Vec<String>,
}

impl FeasibilityResponse {
    /// The fixed plan served in offline mode.
    pub fn canned() -> Self {
        Self {
            polyline: vec![
                Coordinate::new(37.6213, -122.3790),
                Coordinate::new(37.3639, -121.9289),
            ],
            leg_risks: vec![LegRisk {
                from_index: 0,
                to_index: 1,
                icing: 0.2,
                turbulence: 0.4,
                terrain: 0.1,
            }],
            alternates: vec!["KOAK".to_string(), "KSQL".to_string()],
            advisory: "Moderate turbulence forecast along the route. Consider lower altitude after SUU."
                .to_string(),
            risk_tile_templates: vec![
                "https://tile.openweathermap.org/map/precipitation_new/{z}/{x}/{y}.png?appid=demo"
                    .to_string(),
            ],
        }
    }
}

/// Build a feasibility request for `route`.
///
/// Aircraft parameters are re-clamped to the service envelope regardless of
/// what the route holds, and the route's altitude is raised to the MEF floor.
/// Declines when the route has no leg.
pub fn build_request(
    route: &mut RoutePlan,
    policy: &SafetyPolicy,
) -> Result<FeasibilityRequest, PlanningError> {
    if route.len() < 2 {
        return Err(PlanningError::InsufficientRoute {
            waypoints: route.len(),
        });
    }

    let true_airspeed_ktas = clamp_cruise_ktas(route.cruise_ktas());
    let fuel_burn_gph = clamp_fuel_burn_gph(route.fuel_burn_gph());

    if route.enforce_altitude_floor(MIN_ALTITUDE_FT) {
        tracing::debug!(altitude_ft = MIN_ALTITUDE_FT, "Raised route altitude to MEF floor");
    }

    tracing::debug!(
        waypoints = route.len(),
        aircraft = route.aircraft_type(),
        true_airspeed_ktas,
        fuel_burn_gph,
        "Built feasibility request"
    );

    Ok(FeasibilityRequest {
        aircraft: AircraftDescriptor {
            aircraft_type: route.aircraft_type().to_string(),
            true_airspeed_ktas,
            fuel_burn_gph,
        },
        route: route.coordinates(),
        policy: *policy,
    })
}
