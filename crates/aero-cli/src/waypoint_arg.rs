//! `lat,lon[,name]` waypoint arguments.

use aero_core::{Coordinate, Waypoint};

/// Parse `lat,lon` or `lat,lon,name` into a coordinate and optional name. The name is
/// optional so the route can auto-number unnamed points.
pub fn parse_waypoint(value: &str) -> Result<(Coordinate, Option<String>), String> {
    let mut parts = value.splitn(3, ',').map(str::trim);
    let lat = parse_degrees(parts.next(), "latitude", 90.0)?;
    let lon = parse_degrees(parts.next(), "longitude", 180.0)?;
    let name = parts
        .next()
        .filter(|name| !name.is_empty())
        .map(str::to_string);
    Ok((Coordinate::new(lat, lon), name))
}

fn parse_degrees(part: Option<&str>, what: &str, limit: f64) -> Result<f64, String> {
    let raw = part
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("missing {what}; expected lat,lon[,name]"))?;
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("invalid {what} {raw:?}"))?;
    if !value.is_finite() || value.abs() > limit {
        return Err(format!("{what} {value} out of range"));
    }
    Ok(value)
}

/// Render a waypoint back to argument form.
pub fn format_waypoint(waypoint: &Waypoint) -> String {
    format!(
        "{:.4},{:.4},{}",
        waypoint.coordinate.lat, waypoint.coordinate.lon, waypoint.ident
    )
}
