//! Plan integration: turns a feasibility plan (or a failure) into the state a
//! map view draws from.

use std::fmt;

use aero_core::{Coordinate, FeasibilityResponse, LegRisk, RoutePlan, Waypoint};
use serde::Serialize;

/// Where a tile overlay sits in the map's layer stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayLevel {
    AboveRoads,
    AboveLabels,
}

/// A raster tile overlay ready to hand to a map surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileOverlay {
    /// `{z}/{x}/{y}` URL template, passed through untouched
    pub url_template: String,
    pub can_replace_map_content: bool,
    pub level: OverlayLevel,
}

impl TileOverlay {
    pub fn risk(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            can_replace_map_content: false,
            level: OverlayLevel::AboveLabels,
        }
    }
}

/// Map rendering surface the presentation state is pushed to.
pub trait MapSurface {
    fn clear(&mut self);
    fn add_waypoint_marker(&mut self, waypoint: &Waypoint);
    fn add_path(&mut self, path: &[Coordinate]);
    fn add_tile_overlay(&mut self, overlay: &TileOverlay);
}

/// Route presentation state derived from the latest plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Presentation {
    computed_path: Option<Vec<Coordinate>>,
    leg_risks: Vec<LegRisk>,
    alternates: Vec<String>,
    advisory: String,
    overlays: Vec<TileOverlay>,
}

impl Presentation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything with `plan`. Nothing from a previous plan survives.
    pub fn apply_response(&mut self, plan: FeasibilityResponse) {
        self.computed_path = Some(plan.polyline);
        self.leg_risks = plan.leg_risks;
        self.alternates = plan.alternates;
        self.advisory = plan.advisory;
        self.overlays = plan
            .risk_tile_templates
            .into_iter()
            .map(TileOverlay::risk)
            .collect();
    }

    /// Surface a failed request. The previous path and leg risks stay.
    pub fn apply_failure(&mut self, error: &dyn fmt::Display) {
        self.advisory = format!("Feasibility planning failed: {error}");
    }

    /// Path the map should draw: the service's polyline once one has been
    /// received, otherwise the straight waypoint line.
    pub fn display_path(&self, route: &RoutePlan) -> Vec<Coordinate> {
        match &self.computed_path {
            Some(path) => path.clone(),
            None if route.len() >= 2 => route.coordinates(),
            None => Vec::new(),
        }
    }

    pub fn render(&self, route: &RoutePlan, surface: &mut dyn MapSurface) {
        surface.clear();
        for waypoint in route.waypoints() {
            surface.add_waypoint_marker(waypoint);
        }
        let path = self.display_path(route);
        if !path.is_empty() {
            surface.add_path(&path);
        }
        for overlay in &self.overlays {
            surface.add_tile_overlay(overlay);
        }
    }

    pub fn computed_path(&self) -> Option<&[Coordinate]> {
        self.computed_path.as_deref()
    }

    pub fn leg_risks(&self) -> &[LegRisk] {
        &self.leg_risks
    }

    pub fn alternates(&self) -> &[String] {
        &self.alternates
    }

    pub fn advisory(&self) -> &str {
        &self.advisory
    }

    pub fn overlays(&self) -> &[TileOverlay] {
        &self.overlays
    }

    /// Leg with the highest single hazard score.
    pub fn riskiest_leg(&self) -> Option<&LegRisk> {
        self.leg_risks
            .iter()
            .max_by(|a, b| a.peak().total_cmp(&b.peak()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aero_ffm::FfmError;

    #[derive(Default)]
    struct RecordingSurface {
        markers: Vec<String>,
        paths: Vec<Vec<Coordinate>>,
        overlays: Vec<String>,
        clears: usize,
    }

    impl MapSurface for RecordingSurface {
        fn clear(&mut self) {
            self.clears += 1;
            self.markers.clear();
            self.paths.clear();
            self.overlays.clear();
        }

        fn add_waypoint_marker(&mut self, waypoint: &Waypoint) {
            self.markers.push(waypoint.ident.clone());
        }

        fn add_path(&mut self, path: &[Coordinate]) {
            self.paths.push(path.to_vec());
        }

        fn add_tile_overlay(&mut self, overlay: &TileOverlay) {
            self.overlays.push(overlay.url_template.clone());
        }
    }

    fn route() -> RoutePlan {
        let mut route = RoutePlan::new();
        route.add_waypoint(Coordinate::new(37.6213, -122.3790), Some("KSFO"));
        route.add_waypoint(Coordinate::new(37.7214, -122.2208), Some("KOAK"));
        route.add_waypoint(Coordinate::new(37.3639, -121.9289), Some("KSJC"));
        route
    }

    fn other_plan() -> FeasibilityResponse {
        FeasibilityResponse {
            polyline: vec![Coordinate::new(1.0, 2.0)],
            leg_risks: vec![],
            alternates: vec![],
            advisory: "Clear skies".to_string(),
            risk_tile_templates: vec![],
        }
    }

    #[test]
    fn straight_line_until_a_plan_arrives() {
        let route = route();
        let mut presentation = Presentation::new();
        assert_eq!(presentation.display_path(&route), route.coordinates());

        presentation.apply_response(FeasibilityResponse::canned());
        assert_eq!(
            presentation.display_path(&route),
            FeasibilityResponse::canned().polyline
        );
    }

    #[test]
    fn single_waypoint_has_no_path() {
        let mut route = RoutePlan::new();
        route.add_waypoint(Coordinate::new(37.0, -122.0), None);
        assert!(Presentation::new().display_path(&route).is_empty());
    }

    #[test]
    fn response_replaces_previous_plan() {
        let mut presentation = Presentation::new();
        presentation.apply_response(FeasibilityResponse::canned());
        assert_eq!(presentation.leg_risks().len(), 1);
        assert_eq!(presentation.overlays().len(), 1);

        presentation.apply_response(other_plan());
        assert!(presentation.leg_risks().is_empty());
        assert!(presentation.overlays().is_empty());
        assert!(presentation.alternates().is_empty());
        assert_eq!(presentation.advisory(), "Clear skies");
        assert_eq!(presentation.computed_path().unwrap(), &[Coordinate::new(1.0, 2.0)]);
    }

    #[test]
    fn failure_keeps_previous_plan() {
        let mut presentation = Presentation::new();
        presentation.apply_response(FeasibilityResponse::canned());

        presentation.apply_failure(&FfmError::Configuration("no FFM base URL configured".into()));
        assert!(presentation.advisory().starts_with("Feasibility planning failed:"));
        assert!(presentation.advisory().contains("no FFM base URL configured"));
        assert_eq!(
            presentation.computed_path().unwrap(),
            FeasibilityResponse::canned().polyline.as_slice()
        );
        assert_eq!(presentation.leg_risks(), FeasibilityResponse::canned().leg_risks.as_slice());
    }

    #[test]
    fn overlays_pass_templates_through() {
        let mut presentation = Presentation::new();
        presentation.apply_response(FeasibilityResponse::canned());
        let overlay = &presentation.overlays()[0];
        assert_eq!(
            overlay.url_template,
            "https://tile.openweathermap.org/map/precipitation_new/{z}/{x}/{y}.png?appid=demo"
        );
        assert!(!overlay.can_replace_map_content);
        assert_eq!(overlay.level, OverlayLevel::AboveLabels);
    }

    #[test]
    fn render_pushes_markers_path_and_overlays() {
        let route = route();
        let mut presentation = Presentation::new();
        let mut surface = RecordingSurface::default();

        presentation.render(&route, &mut surface);
        assert_eq!(surface.markers, vec!["KSFO", "KOAK", "KSJC"]);
        assert_eq!(surface.paths, vec![route.coordinates()]);
        assert!(surface.overlays.is_empty());

        presentation.apply_response(FeasibilityResponse::canned());
        presentation.render(&route, &mut surface);
        assert_eq!(surface.clears, 2);
        assert_eq!(surface.paths, vec![FeasibilityResponse::canned().polyline]);
        assert_eq!(surface.overlays.len(), 1);
    }

    #[test]
    fn riskiest_leg_uses_peak_score() {
        let mut presentation = Presentation::new();
        assert!(presentation.riskiest_leg().is_none());

        let mut plan = FeasibilityResponse::canned();
        plan.leg_risks.push(LegRisk {
            from_index: 1,
            to_index: 2,
            icing: 0.9,
            turbulence: 0.1,
            terrain: 0.0,
        });
        presentation.apply_response(plan);
        assert_eq!(presentation.riskiest_leg().unwrap().from_index, 1);
    }
}
