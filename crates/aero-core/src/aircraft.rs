//! Built-in aircraft performance profiles.

use serde::Serialize;

/// Cruise performance for one aircraft type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AircraftProfile {
    pub code: &'static str,
    pub name: &'static str,
    pub cruise_ktas: f64,
    pub fuel_burn_gph: f64,
}

const CATALOG: [AircraftProfile; 4] = [
    AircraftProfile {
        code: "C172",
        name: "Cessna 172 Skyhawk",
        cruise_ktas: 120.0,
        fuel_burn_gph: 8.5,
    },
    AircraftProfile {
        code: "PA28",
        name: "Piper PA-28 Cherokee",
        cruise_ktas: 130.0,
        fuel_burn_gph: 9.0,
    },
    AircraftProfile {
        code: "SR22",
        name: "Cirrus SR22",
        cruise_ktas: 180.0,
        fuel_burn_gph: 12.0,
    },
    AircraftProfile {
        code: "DA40",
        name: "Diamond DA40",
        cruise_ktas: 140.0,
        fuel_burn_gph: 9.5,
    },
];

impl AircraftProfile {
    pub fn catalog() -> &'static [AircraftProfile] {
        &CATALOG
    }

    /// Look up a profile by type code (case-insensitive).
    pub fn find(code: &str) -> Option<&'static AircraftProfile> {
        let code = code.trim();
        CATALOG.iter().find(|p| p.code.eq_ignore_ascii_case(code))
    }

    /// Profile used when the requested type is unknown.
    pub fn default_profile() -> &'static AircraftProfile {
        &CATALOG[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_is_case_insensitive() {
        let sr22 = AircraftProfile::find(" sr22 ").unwrap();
        assert_eq!(sr22.cruise_ktas, 180.0);
        assert_eq!(sr22.fuel_burn_gph, 12.0);
    }

    #[test]
    fn unknown_code_is_none() {
        assert!(AircraftProfile::find("B738").is_none());
        assert_eq!(AircraftProfile::default_profile().code, "C172");
    }
}
