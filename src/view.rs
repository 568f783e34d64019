//! Map view state.
//!
//! `MapView` is the single owner of everything the page draws: center and
//! zoom, the polygon overlay, the heat map layer, the legend and the loading
//! flags. Handlers mutate it only through the methods below and send the page
//! a serialized snapshot.

use serde::{Deserialize, Serialize};

use crate::compound::Compound;
use crate::constants::{
    HEATMAP_OPACITY, INITIAL_CENTER_LAT, INITIAL_CENTER_LNG, INITIAL_ZOOM, MAX_ZOOM, MIN_ZOOM,
};
use crate::error::{SoilMapError, SoilMapResult};
use crate::geo::{Bounds, LatLng, LngLat, Polygon};
use crate::heatmap::{radius_for_zoom, rescale, HeatPoint, Legend, SoilPoint};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadingFlags {
    pub soc: bool,
    pub sand: bool,
    pub clay: bool,
}

impl LoadingFlags {
    pub fn get(&self, compound: Compound) -> bool {
        match compound {
            Compound::SocStock => self.soc,
            Compound::Sand => self.sand,
            Compound::Clay => self.clay,
        }
    }

    fn set(&mut self, compound: Compound, value: bool) {
        match compound {
            Compound::SocStock => self.soc = value,
            Compound::Sand => self.sand = value,
            Compound::Clay => self.clay = value,
        }
    }

    pub fn any(&self) -> bool {
        self.soc || self.sand || self.clay
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatLayer {
    pub points: Vec<HeatPoint>,
    pub radius: f64,
    pub opacity: f64,
}

/// Handed out when a compound request starts; identifies it when it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub compound: Compound,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: f64,
    /// Bounds the page should fit the map to after a new polygon
    pub fit_bounds: Option<Bounds>,
    pub polygon: Option<Polygon>,
    pub heatmap: HeatLayer,
    pub legend: Option<Legend>,
    pub compound: Option<Compound>,
    pub loading: LoadingFlags,
    /// Last generation handed out
    #[serde(skip)]
    issued: u64,
    /// Generation of the data currently shown
    #[serde(skip)]
    shown: u64,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: LatLng::new(INITIAL_CENTER_LAT, INITIAL_CENTER_LNG),
            zoom: INITIAL_ZOOM,
            fit_bounds: None,
            polygon: None,
            heatmap: HeatLayer {
                points: Vec::new(),
                radius: radius_for_zoom(INITIAL_ZOOM),
                opacity: HEATMAP_OPACITY,
            },
            legend: None,
            compound: None,
            loading: LoadingFlags::default(),
            issued: 0,
            shown: 0,
        }
    }
}

impl MapView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the new zoom and returns the adapted heat map radius.
    pub fn set_zoom(&mut self, zoom: f64) -> SoilMapResult<f64> {
        if !zoom.is_finite() || !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
            return Err(SoilMapError::InvalidZoom(zoom));
        }
        self.zoom = zoom;
        self.heatmap.radius = radius_for_zoom(zoom);
        Ok(self.heatmap.radius)
    }

    /// Replaces the polygon overlay and recenters on it.
    ///
    /// Returns `false` when there is nothing to draw or the path is the one
    /// already shown.
    pub fn draw_polygon(&mut self, coords: &[LngLat]) -> bool {
        let Some(polygon) = Polygon::from_coords(coords) else {
            return false;
        };
        if self.polygon.as_ref() == Some(&polygon) {
            return false;
        }

        if let Some(bounds) = polygon.bounds() {
            self.center = bounds.center();
            self.fit_bounds = Some(bounds);
        }
        self.polygon = Some(polygon);
        true
    }

    /// Marks `compound` as loading. Other compounds are not blocked.
    pub fn begin_request(&mut self, compound: Compound) -> SoilMapResult<Ticket> {
        if self.loading.get(compound) {
            return Err(SoilMapError::AlreadyLoading(compound));
        }
        self.loading.set(compound, true);
        self.issued += 1;
        Ok(Ticket {
            compound,
            generation: self.issued,
        })
    }

    /// Whether a result for `ticket` is newer than the data on screen.
    pub fn is_newer(&self, ticket: Ticket) -> bool {
        ticket.generation > self.shown
    }

    /// Replaces the heat map data with the rescaled points and selects the
    /// ticket's compound.
    ///
    /// A result older than the data already shown is discarded; returns
    /// whether the data was applied. Failed requests never call this, so they
    /// do not hide an older successful result.
    pub fn apply_points(&mut self, ticket: Ticket, points: &[SoilPoint]) -> bool {
        if !self.is_newer(ticket) {
            return false;
        }
        self.shown = ticket.generation;
        self.compound = Some(ticket.compound);

        match rescale(points) {
            Some(rescaled) => {
                self.legend = Some(Legend::new(ticket.compound, &rescaled));
                self.heatmap.points = rescaled.points;
            }
            None => {
                self.legend = None;
                self.heatmap.points.clear();
            }
        }
        true
    }

    /// Ends a request whatever its outcome.
    pub fn finish_request(&mut self, ticket: Ticket) {
        self.loading.set(ticket.compound, false);
    }

    pub fn snapshot(&self) -> MapView {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<LngLat> {
        vec![[-3.8, 40.3], [-3.6, 40.3], [-3.6, 40.5], [-3.8, 40.5]]
    }

    fn sample_points() -> Vec<SoilPoint> {
        vec![
            SoilPoint { lat: 40.4, lng: -3.7, data: 10.0 },
            SoilPoint { lat: 40.41, lng: -3.7, data: 20.0 },
            SoilPoint { lat: 40.42, lng: -3.7, data: 30.0 },
        ]
    }

    #[test]
    fn test_initial_view() {
        let view = MapView::new();
        assert_eq!(view.center, LatLng::new(40.41831, -3.70275));
        assert_eq!(view.zoom, 6.0);
        assert!(view.heatmap.points.is_empty());
        assert_eq!(view.heatmap.opacity, 0.7);
        assert!(view.legend.is_none());
        assert!(view.compound.is_none());
        assert!(!view.loading.any());
    }

    #[test]
    fn test_set_zoom_updates_radius() {
        let mut view = MapView::new();
        assert_eq!(view.set_zoom(15.0).unwrap(), 11.0);
        assert_eq!(view.heatmap.radius, 11.0);
        assert_eq!(view.zoom, 15.0);
    }

    #[test]
    fn test_zoom_out_of_range_rejected() {
        let mut view = MapView::new();
        assert!(matches!(view.set_zoom(1100.0), Err(SoilMapError::InvalidZoom(_))));
        assert!(view.set_zoom(-1.0).is_err());
        assert!(view.set_zoom(f64::NAN).is_err());
        assert_eq!(view.zoom, 6.0);
        assert!(view.heatmap.radius.is_finite());
        assert_eq!(view.set_zoom(22.0).unwrap(), 5.5 * 256.0);
    }

    #[test]
    fn test_draw_polygon_recenters() {
        let mut view = MapView::new();
        assert!(view.draw_polygon(&square()));
        let center = view.center;
        assert!((center.lat - 40.4).abs() < 1e-9);
        assert!((center.lng + 3.7).abs() < 1e-9);
        assert!(view.fit_bounds.is_some());
        assert_eq!(view.polygon.as_ref().unwrap().path.len(), 5);
    }

    #[test]
    fn test_same_polygon_not_redrawn() {
        let mut view = MapView::new();
        assert!(view.draw_polygon(&square()));
        assert!(!view.draw_polygon(&square()));
    }

    #[test]
    fn test_empty_coords_draw_nothing() {
        let mut view = MapView::new();
        assert!(!view.draw_polygon(&[]));
        assert!(view.polygon.is_none());
        assert_eq!(view.center, LatLng::new(40.41831, -3.70275));
    }

    #[test]
    fn test_different_compounds_load_concurrently() {
        let mut view = MapView::new();
        let soc = view.begin_request(Compound::SocStock).unwrap();
        let sand = view.begin_request(Compound::Sand).unwrap();
        assert!(view.loading.soc && view.loading.sand);
        assert!(!view.loading.clay);

        view.finish_request(soc);
        view.finish_request(sand);
        assert!(!view.loading.any());
    }

    #[test]
    fn test_same_compound_reentry_rejected() {
        let mut view = MapView::new();
        let _clay = view.begin_request(Compound::Clay).unwrap();
        let err = view.begin_request(Compound::Clay).unwrap_err();
        assert!(matches!(err, SoilMapError::AlreadyLoading(Compound::Clay)));
    }

    #[test]
    fn test_apply_points_sets_heatmap_and_legend() {
        let mut view = MapView::new();
        let ticket = view.begin_request(Compound::SocStock).unwrap();
        assert!(view.apply_points(ticket, &sample_points()));
        view.finish_request(ticket);

        let weights: Vec<f64> = view.heatmap.points.iter().map(|p| p.weight).collect();
        assert_eq!(weights, vec![0.0, 50.0, 100.0]);
        let legend = view.legend.as_ref().unwrap();
        assert_eq!(legend.min, 10.0);
        assert_eq!(legend.max, 30.0);
        assert_eq!(legend.unit, "t/ha");
        assert_eq!(view.compound, Some(Compound::SocStock));
        assert!(!view.loading.soc);
    }

    #[test]
    fn test_stale_result_does_not_overwrite() {
        let mut view = MapView::new();
        let soc = view.begin_request(Compound::SocStock).unwrap();
        let clay = view.begin_request(Compound::Clay).unwrap();

        assert!(view.apply_points(clay, &sample_points()));
        view.finish_request(clay);

        let stale = vec![SoilPoint { lat: 0.0, lng: 0.0, data: 1.0 }];
        assert!(!view.apply_points(soc, &stale));
        view.finish_request(soc);

        assert_eq!(view.heatmap.points.len(), 3);
        assert_eq!(view.compound, Some(Compound::Clay));
        assert_eq!(view.legend.as_ref().unwrap().unit, "mass %");
        assert!(!view.loading.any());
    }

    #[test]
    fn test_empty_result_clears_layer() {
        let mut view = MapView::new();
        let first = view.begin_request(Compound::Sand).unwrap();
        view.apply_points(first, &sample_points());
        view.finish_request(first);

        let second = view.begin_request(Compound::Sand).unwrap();
        assert!(view.apply_points(second, &[]));
        view.finish_request(second);
        assert!(view.heatmap.points.is_empty());
        assert!(view.legend.is_none());
    }

    #[test]
    fn test_failed_newer_request_keeps_older_result() {
        let mut view = MapView::new();
        let soc = view.begin_request(Compound::SocStock).unwrap();
        let clay = view.begin_request(Compound::Clay).unwrap();

        // clay fails: only its flag is cleared
        view.finish_request(clay);

        assert!(view.apply_points(soc, &sample_points()));
        view.finish_request(soc);
        assert_eq!(view.heatmap.points.len(), 3);
        assert_eq!(view.compound, Some(Compound::SocStock));
        assert_eq!(view.legend.as_ref().unwrap().compound, "SOC stock");
    }

    #[test]
    fn test_snapshot_serializes_without_generation() {
        let mut view = MapView::new();
        let _ = view.begin_request(Compound::Sand).unwrap();
        let json = serde_json::to_value(view.snapshot()).unwrap();
        assert!(json.get("issued").is_none());
        assert!(json.get("shown").is_none());
        assert_eq!(json["loading"]["sand"], true);
        assert_eq!(json["heatmap"]["opacity"], 0.7);
    }
}
