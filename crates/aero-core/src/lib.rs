pub mod aircraft;
pub mod feasibility;
pub mod geo;
pub mod models;
pub mod route;
pub mod rules;
pub mod weight_balance;

pub use aircraft::AircraftProfile;
pub use feasibility::{
    build_request, AircraftDescriptor, FeasibilityRequest, FeasibilityResponse, LegRisk,
    PlanningError,
};
pub use geo::{distance_nm, initial_bearing_deg, EARTH_RADIUS_NM};
pub use models::{Coordinate, Waypoint};
pub use route::{FuelPlan, Leg, RouteBounds, RoutePlan};
pub use rules::SafetyPolicy;
pub use weight_balance::WeightAndBalance;
