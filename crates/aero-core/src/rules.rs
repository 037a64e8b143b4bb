//! Safety envelope and planning policy.

use serde::{Deserialize, Serialize};

/// Lowest altitude a route may be planned at (MEF proxy), in feet.
pub const MIN_ALTITUDE_FT: i32 = 2_000;
/// Highest altitude a route may be planned at (below Class A), in feet.
pub const MAX_ALTITUDE_FT: i32 = 18_000;
/// Cruise true airspeed band, in knots.
pub const MIN_CRUISE_KTAS: f64 = 80.0;
pub const MAX_CRUISE_KTAS: f64 = 220.0;
/// Fuel burn band accepted by the feasibility service, in gallons per hour.
pub const MIN_FUEL_BURN_GPH: f64 = 6.0;
pub const MAX_FUEL_BURN_GPH: f64 = 18.0;

/// Policy sent along with every feasibility request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyPolicy {
    /// Fuel reserve to hold at destination, in minutes
    pub reserve_minutes: u32,
    /// Whether the service must keep the route above minimum elevation figures
    #[serde(rename = "enforceMEF")]
    pub enforce_mef: bool,
}

impl Default for SafetyPolicy {
    fn default() -> Self {
        Self {
            reserve_minutes: 45,
            enforce_mef: true,
        }
    }
}

pub fn clamp_altitude_ft(altitude_ft: i32) -> i32 {
    altitude_ft.clamp(MIN_ALTITUDE_FT, MAX_ALTITUDE_FT)
}

pub fn clamp_cruise_ktas(ktas: f64) -> f64 {
    ktas.clamp(MIN_CRUISE_KTAS, MAX_CRUISE_KTAS)
}

pub fn clamp_fuel_burn_gph(gph: f64) -> f64 {
    gph.clamp(MIN_FUEL_BURN_GPH, MAX_FUEL_BURN_GPH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_ga_practice() {
        let policy = SafetyPolicy::default();
        assert_eq!(policy.reserve_minutes, 45);
        assert!(policy.enforce_mef);
    }

    #[test]
    fn policy_wire_field_names() {
        let json = serde_json::to_value(SafetyPolicy::default()).unwrap();
        assert_eq!(json, serde_json::json!({"reserveMinutes": 45, "enforceMEF": true}));
    }

    #[test]
    fn clamps_hold_band_edges() {
        assert_eq!(clamp_altitude_ft(0), MIN_ALTITUDE_FT);
        assert_eq!(clamp_altitude_ft(50_000), MAX_ALTITUDE_FT);
        assert_eq!(clamp_altitude_ft(9_500), 9_500);
        assert_eq!(clamp_cruise_ktas(50.0), 80.0);
        assert_eq!(clamp_cruise_ktas(999.0), 220.0);
        assert_eq!(clamp_fuel_burn_gph(100.0), 18.0);
        assert_eq!(clamp_fuel_burn_gph(2.0), 6.0);
    }
}
