//! Core data models shared by the planner, client and mock service.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A named point on a route.
///
/// Waypoints dropped on the map carry only an identifier; airports picked from
/// the browser also carry a display name and field elevation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub ident: String,
    pub coordinate: Coordinate,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub elevation_ft: Option<i32>,
}

impl Waypoint {
    pub fn new(ident: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            ident: ident.into(),
            coordinate,
            name: None,
            elevation_ft: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_elevation(mut self, elevation_ft: i32) -> Self {
        self.elevation_ft = Some(elevation_ft);
        self
    }

    /// Name to show next to the marker, falling back to the identifier.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.ident)
    }
}
