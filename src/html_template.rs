use axum::response::Html;
use serde::Serialize;

use crate::constants::{HEATMAP_OPACITY, INITIAL_CENTER_LAT, INITIAL_CENTER_LNG, INITIAL_ZOOM};
use crate::settings::Settings;

const CONFIG_PLACEHOLDER: &str = "<!-- MAP_CONFIG_PLACEHOLDER -->";

/// Map configuration handed to `script.js` through `window.SOILMAP_CONFIG`.
#[derive(Debug, Serialize)]
pub struct MapConfig {
    pub tile_url: String,
    pub center: [f64; 2],
    pub zoom: f64,
    pub heatmap_opacity: f64,
}

impl MapConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            tile_url: settings.resolved_tile_url(),
            center: [INITIAL_CENTER_LAT, INITIAL_CENTER_LNG],
            zoom: INITIAL_ZOOM,
            heatmap_opacity: HEATMAP_OPACITY,
        }
    }
}

pub fn render_index(template: &str, settings: &Settings) -> Html<String> {
    let config = MapConfig::from_settings(settings);
    // `</` is escaped so a value can never close the script element
    let json = serde_json::to_string(&config)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/");
    let script = format!("<script>window.SOILMAP_CONFIG = {};</script>", json);
    Html(template.replace(CONFIG_PLACEHOLDER, &script))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_injected() {
        let settings = Settings {
            tile_url: "https://tiles.example/{z}/{x}/{y}?k={key}".into(),
            map_api_key: Some("abc".into()),
            ..Settings::default()
        };
        let Html(page) = render_index("<head><!-- MAP_CONFIG_PLACEHOLDER --></head>", &settings);
        assert!(page.contains("window.SOILMAP_CONFIG"));
        assert!(page.contains("k=abc"));
        assert!(page.contains("40.41831"));
        assert!(!page.contains(CONFIG_PLACEHOLDER));
    }

    #[test]
    fn test_script_close_escaped() {
        let settings = Settings {
            tile_url: "</script><b>".into(),
            ..Settings::default()
        };
        let Html(page) = render_index(CONFIG_PLACEHOLDER, &settings);
        assert_eq!(page.matches("</script>").count(), 1);
    }
}
