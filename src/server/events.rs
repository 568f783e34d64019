use serde::{Deserialize, Serialize};

use crate::compound::Compound;
use crate::view::LoadingFlags;

// SSE Event types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewEvent {
    pub event_type: String,
    pub data: ViewEventData,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ViewEventData {
    pub compound: Option<Compound>,
    pub loading: Option<LoadingFlags>,
    pub points: Option<usize>,
    pub message: Option<String>,
}

impl ViewEvent {
    pub fn loading_changed(compound: Compound, loading: LoadingFlags) -> Self {
        Self {
            event_type: "loading_changed".to_string(),
            data: ViewEventData {
                compound: Some(compound),
                loading: Some(loading),
                ..Default::default()
            },
        }
    }

    pub fn heatmap_updated(compound: Compound, points: usize) -> Self {
        Self {
            event_type: "heatmap_updated".to_string(),
            data: ViewEventData {
                compound: Some(compound),
                points: Some(points),
                ..Default::default()
            },
        }
    }

    /// A result arrived after newer data was already shown.
    pub fn result_discarded(compound: Compound, points: usize) -> Self {
        Self {
            event_type: "result_discarded".to_string(),
            data: ViewEventData {
                compound: Some(compound),
                points: Some(points),
                ..Default::default()
            },
        }
    }

    pub fn request_failed(compound: Compound, message: String) -> Self {
        Self {
            event_type: "request_failed".to_string(),
            data: ViewEventData {
                compound: Some(compound),
                message: Some(message),
                ..Default::default()
            },
        }
    }
}
