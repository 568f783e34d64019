//! SoilMap: soil composition heat maps for a user-drawn polygon.
//!
//! The library holds the data pipeline (coordinate parsing, backend wire
//! types, rescaling) and the map view state; `server` exposes it over HTTP
//! together with the embedded page.

pub mod api;
pub mod client;
pub mod compound;
pub mod constants;
pub mod error;
pub mod geo;
pub mod heatmap;
pub mod html_template;
pub mod server;
pub mod settings;
pub mod view;

pub use compound::Compound;
pub use error::{SoilMapError, SoilMapResult};
pub use settings::Settings;
pub use view::MapView;
