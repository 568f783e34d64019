// Port configuration
pub const DEFAULT_PORT: u16 = 3001;

// Initial map view (Madrid)
pub const INITIAL_CENTER_LAT: f64 = 40.41831;
pub const INITIAL_CENTER_LNG: f64 = -3.70275;
pub const INITIAL_ZOOM: f64 = 6.0;
pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 22.0;

// Heat map layer
pub const HEATMAP_BASE_RADIUS: f64 = 5.5;
pub const HEATMAP_REFERENCE_ZOOM: f64 = 14.0;
pub const HEATMAP_OPACITY: f64 = 0.7;

// Rescale target range for heat map weights
pub const WEIGHT_MIN: f64 = 0.0;
pub const WEIGHT_MAX: f64 = 100.0;

// Satellite imagery with labels, closest to a "hybrid" base map
pub const DEFAULT_TILE_URL: &str =
    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}";

// SSE
pub const EVENT_CHANNEL_CAPACITY: usize = 100;
pub const SSE_KEEPALIVE_SECS: u64 = 15;
