use serde::{Deserialize, Serialize};

use crate::compound::Compound;
use crate::constants::{HEATMAP_BASE_RADIUS, HEATMAP_REFERENCE_ZOOM, WEIGHT_MAX, WEIGHT_MIN};

/// Raw point value returned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilPoint {
    pub lat: f64,
    pub lng: f64,
    pub data: f64,
}

/// Point with its value normalized into the heat map weight range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatPoint {
    pub lat: f64,
    pub lng: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rescaled {
    pub points: Vec<HeatPoint>,
    /// Observed raw minimum
    pub min: f64,
    /// Observed raw maximum
    pub max: f64,
}

/// Linearly maps raw values from [observed min, observed max] to [0, 100].
///
/// Returns `None` for an empty input. When every value is equal the range is
/// degenerate and all points get the top weight.
pub fn rescale(points: &[SoilPoint]) -> Option<Rescaled> {
    let first = points.first()?;
    let (min, max) = points
        .iter()
        .fold((first.data, first.data), |(lo, hi), p| (lo.min(p.data), hi.max(p.data)));

    let span = max - min;
    let points = points
        .iter()
        .map(|p| {
            let weight = if span > 0.0 {
                (p.data - min) / span * (WEIGHT_MAX - WEIGHT_MIN) + WEIGHT_MIN
            } else {
                WEIGHT_MAX
            };
            HeatPoint {
                lat: p.lat,
                lng: p.lng,
                weight,
            }
        })
        .collect();

    Some(Rescaled { points, min, max })
}

/// Display radius keeping point footprints consistent across zoom levels.
pub fn radius_for_zoom(zoom: f64) -> f64 {
    HEATMAP_BASE_RADIUS * 2f64.powf(zoom - HEATMAP_REFERENCE_ZOOM)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Legend content for the most recently applied data set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub compound: String,
    pub unit: String,
    pub min: f64,
    pub max: f64,
}

impl Legend {
    pub fn new(compound: Compound, rescaled: &Rescaled) -> Self {
        Self {
            compound: compound.name().to_string(),
            unit: compound.unit().to_string(),
            min: round2(rescaled.min),
            max: round2(rescaled.max),
        }
    }
}
