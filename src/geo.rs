//! Coordinate parsing and polygon geometry.
//!
//! User input is a JSON array of `[longitude, latitude]` pairs, the same
//! order the backend expects in its `coords` payload. Map-facing types use
//! `lat`/`lng` fields instead.

use serde::{Deserialize, Serialize};

use crate::error::{SoilMapError, SoilMapResult};

/// A `[longitude, latitude]` pair as sent to the backend.
pub type LngLat = [f64; 2];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<LngLat> for LatLng {
    fn from(pair: LngLat) -> Self {
        Self::new(pair[1], pair[0])
    }
}

/// Parses the text pasted by the user.
///
/// Empty input yields an empty list so the request can still go out with
/// `coords: []`. Anything else must be a JSON array of in-range pairs.
pub fn parse_coordinates(text: &str) -> SoilMapResult<Vec<LngLat>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let coords: Vec<LngLat> = serde_json::from_str(text)
        .map_err(|e| SoilMapError::Coordinates(format!("expected [[lng, lat], ...]: {}", e)))?;

    for (i, [lng, lat]) in coords.iter().enumerate() {
        if !lng.is_finite() || !(-180.0..=180.0).contains(lng) {
            return Err(SoilMapError::Coordinates(format!(
                "longitude {} at position {} is out of range",
                lng, i
            )));
        }
        if !lat.is_finite() || !(-90.0..=90.0).contains(lat) {
            return Err(SoilMapError::Coordinates(format!(
                "latitude {} at position {} is out of range",
                lat, i
            )));
        }
    }

    Ok(coords)
}

/// Closed polygon path in map order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub path: Vec<LatLng>,
}

impl Polygon {
    /// Builds a closed path; returns `None` for an empty coordinate list.
    pub fn from_coords(coords: &[LngLat]) -> Option<Self> {
        let mut path: Vec<LatLng> = coords.iter().copied().map(LatLng::from).collect();
        let first = *path.first()?;
        if path.last() != Some(&first) {
            path.push(first);
        }
        Some(Self { path })
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::around(&self.path)
    }
}

/// Axis-aligned bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn around(points: &[LatLng]) -> Option<Self> {
        let first = points.first()?;
        let init = Bounds {
            south: first.lat,
            west: first.lng,
            north: first.lat,
            east: first.lng,
        };
        Some(points.iter().skip(1).fold(init, |b, p| Bounds {
            south: b.south.min(p.lat),
            west: b.west.min(p.lng),
            north: b.north.max(p.lat),
            east: b.east.max(p.lng),
        }))
    }

    pub fn center(&self) -> LatLng {
        LatLng::new((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }
}
