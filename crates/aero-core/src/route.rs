//! Route model: ordered waypoints plus the flight parameters that drive
//! distance, time and fuel estimates.
//!
//! Derived metrics are computed on every read. Nothing here is cached, so a
//! route is never observed with metrics that disagree with its waypoints.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::aircraft::AircraftProfile;
use crate::geo::{distance_nm, initial_bearing_deg};
use crate::models::{Coordinate, Waypoint};
use crate::rules::{clamp_altitude_ft, clamp_cruise_ktas, SafetyPolicy};

const DEFAULT_ALTITUDE_FT: i32 = 8_000;
const DEFAULT_CRUISE_KTAS: f64 = 120.0;
const DEFAULT_FUEL_BURN_GPH: f64 = 8.5;
const DEFAULT_AIRCRAFT_TYPE: &str = "GA";
const CONTINGENCY_FRACTION: f64 = 0.3;
const MIN_CAMERA_DISTANCE_M: f64 = 50_000.0;
const METERS_PER_DEGREE: f64 = 111_000.0;
const CAMERA_PADDING: f64 = 1.8;

/// A multi-waypoint route with cruise parameters.
///
/// Deserialized routes go through the same clamping setters as edited ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "StoredRoutePlan")]
pub struct RoutePlan {
    waypoints: Vec<Waypoint>,
    altitude_ft: i32,
    cruise_ktas: f64,
    fuel_burn_gph: f64,
    departure_time: DateTime<Utc>,
    aircraft_type: String,
}

#[derive(Deserialize)]
struct StoredRoutePlan {
    #[serde(default)]
    waypoints: Vec<Waypoint>,
    altitude_ft: Option<i32>,
    cruise_ktas: Option<f64>,
    fuel_burn_gph: Option<f64>,
    departure_time: Option<DateTime<Utc>>,
    aircraft_type: Option<String>,
}

impl From<StoredRoutePlan> for RoutePlan {
    fn from(stored: StoredRoutePlan) -> Self {
        let mut route = RoutePlan::new();
        route.waypoints = stored.waypoints;
        if let Some(altitude_ft) = stored.altitude_ft {
            route.set_altitude_ft(altitude_ft);
        }
        if let Some(ktas) = stored.cruise_ktas {
            route.set_cruise_ktas(ktas);
        }
        if let Some(gph) = stored.fuel_burn_gph {
            route.set_fuel_burn_gph(gph);
        }
        if let Some(departure_time) = stored.departure_time {
            route.set_departure_time(departure_time);
        }
        if let Some(aircraft_type) = stored.aircraft_type {
            route.set_aircraft_type(aircraft_type);
        }
        route
    }
}

/// One leg of a route. Leg `index` connects waypoint `index` to `index + 1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leg {
    pub index: usize,
    pub from: Coordinate,
    pub to: Coordinate,
    pub distance_nm: f64,
    pub initial_bearing_deg: f64,
}

/// Fuel needed to fly a route, in gallons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FuelPlan {
    pub trip_gal: f64,
    /// 30% of trip fuel
    pub contingency_gal: f64,
    /// Reserve held at destination per the safety policy
    pub final_reserve_gal: f64,
    pub total_gal: f64,
}

/// Bounding box around a route's waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl RouteBounds {
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    /// Camera distance in meters that fits the whole box on screen.
    pub fn camera_distance_m(&self) -> f64 {
        let span = (self.max_lat - self.min_lat).max(self.max_lon - self.min_lon);
        (span * METERS_PER_DEGREE * CAMERA_PADDING).max(MIN_CAMERA_DISTANCE_M)
    }
}

impl Default for RoutePlan {
    fn default() -> Self {
        Self::new()
    }
}

impl RoutePlan {
    /// Create an empty route departing now.
    pub fn new() -> Self {
        Self {
            waypoints: Vec::new(),
            altitude_ft: DEFAULT_ALTITUDE_FT,
            cruise_ktas: DEFAULT_CRUISE_KTAS,
            fuel_burn_gph: DEFAULT_FUEL_BURN_GPH,
            departure_time: Utc::now(),
            aircraft_type: DEFAULT_AIRCRAFT_TYPE.to_string(),
        }
    }

    /// Append a point, naming it `WPT <n>` when no name is given.
    pub fn add_waypoint(&mut self, coordinate: Coordinate, name: Option<&str>) {
        let ident = match name {
            Some(name) => name.to_string(),
            None => format!("WPT {}", self.waypoints.len() + 1),
        };
        self.waypoints.push(Waypoint::new(ident, coordinate));
    }

    /// Append a fully described waypoint (e.g. an airport).
    pub fn add(&mut self, waypoint: Waypoint) {
        self.waypoints.push(waypoint);
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.waypoints.iter().map(|wp| wp.coordinate).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn altitude_ft(&self) -> i32 {
        self.altitude_ft
    }

    pub fn cruise_ktas(&self) -> f64 {
        self.cruise_ktas
    }

    pub fn fuel_burn_gph(&self) -> f64 {
        self.fuel_burn_gph
    }

    pub fn departure_time(&self) -> DateTime<Utc> {
        self.departure_time
    }

    pub fn aircraft_type(&self) -> &str {
        &self.aircraft_type
    }

    /// Set the planned altitude, clamped to the 2,000-18,000 ft band.
    pub fn set_altitude_ft(&mut self, altitude_ft: i32) {
        self.altitude_ft = clamp_altitude_ft(altitude_ft);
    }

    /// Set cruise true airspeed, clamped to the 80-220 kt band.
    /// Non-finite input is ignored.
    pub fn set_cruise_ktas(&mut self, ktas: f64) {
        if ktas.is_finite() {
            self.cruise_ktas = clamp_cruise_ktas(ktas);
        }
    }

    /// Set fuel burn. Any finite non-negative rate is stored as-is; the
    /// request builder enforces the service envelope.
    pub fn set_fuel_burn_gph(&mut self, gph: f64) {
        if gph.is_finite() {
            self.fuel_burn_gph = gph.max(0.0);
        }
    }

    pub fn set_departure_time(&mut self, departure_time: DateTime<Utc>) {
        self.departure_time = departure_time;
    }

    pub fn set_aircraft_type(&mut self, aircraft_type: impl Into<String>) {
        self.aircraft_type = aircraft_type.into();
    }

    /// Adopt an aircraft's cruise performance and type tag.
    pub fn apply_aircraft(&mut self, profile: &AircraftProfile) {
        self.aircraft_type = profile.code.to_string();
        self.set_cruise_ktas(profile.cruise_ktas);
        self.set_fuel_burn_gph(profile.fuel_burn_gph);
    }

    /// Raise the altitude to the MEF floor. Returns true if it changed.
    pub(crate) fn enforce_altitude_floor(&mut self, floor_ft: i32) -> bool {
        if self.altitude_ft < floor_ft {
            self.altitude_ft = floor_ft;
            true
        } else {
            false
        }
    }

    pub fn legs(&self) -> Vec<Leg> {
        self.waypoints
            .windows(2)
            .enumerate()
            .map(|(index, pair)| {
                let (from, to) = (pair[0].coordinate, pair[1].coordinate);
                Leg {
                    index,
                    from,
                    to,
                    distance_nm: distance_nm(from, to),
                    initial_bearing_deg: initial_bearing_deg(from, to),
                }
            })
            .collect()
    }

    /// Sum of great-circle leg distances in nautical miles.
    pub fn total_distance_nm(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|pair| distance_nm(pair[0].coordinate, pair[1].coordinate))
            .sum()
    }

    /// Estimated time enroute in seconds.
    pub fn estimated_time_secs(&self) -> f64 {
        if self.waypoints.len() < 2 || self.cruise_ktas <= 0.0 {
            return 0.0;
        }
        (self.total_distance_nm() / self.cruise_ktas) * 3600.0
    }

    pub fn estimated_duration(&self) -> Duration {
        Duration::milliseconds((self.estimated_time_secs() * 1000.0).round() as i64)
    }

    pub fn estimated_arrival(&self) -> DateTime<Utc> {
        self.departure_time + self.estimated_duration()
    }

    /// Trip fuel in gallons.
    pub fn fuel_required_gal(&self) -> f64 {
        (self.estimated_time_secs() / 3600.0) * self.fuel_burn_gph
    }

    pub fn fuel_plan(&self, policy: &SafetyPolicy) -> FuelPlan {
        let trip_gal = self.fuel_required_gal();
        let contingency_gal = trip_gal * CONTINGENCY_FRACTION;
        let final_reserve_gal = f64::from(policy.reserve_minutes) / 60.0 * self.fuel_burn_gph;
        FuelPlan {
            trip_gal,
            contingency_gal,
            final_reserve_gal,
            total_gal: trip_gal + contingency_gal + final_reserve_gal,
        }
    }

    /// Bounding box of all waypoints, or None for an empty route.
    pub fn bounds(&self) -> Option<RouteBounds> {
        let first = self.waypoints.first()?.coordinate;
        let init = RouteBounds {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lon: first.lon,
            max_lon: first.lon,
        };
        Some(self.waypoints.iter().fold(init, |b, wp| RouteBounds {
            min_lat: b.min_lat.min(wp.coordinate.lat),
            max_lat: b.max_lat.max(wp.coordinate.lat),
            min_lon: b.min_lon.min(wp.coordinate.lon),
            max_lon: b.max_lon.max(wp.coordinate.lon),
        }))
    }
}

#[cfg(test)]
impl RoutePlan {
    /// Bypass the setter clamp to model a route restored from elsewhere.
    pub(crate) fn force_altitude_ft(&mut self, altitude_ft: i32) {
        self.altitude_ft = altitude_ft;
    }
}
