use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_PORT, DEFAULT_TILE_URL};

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub port: u16,
    /// Upstream for sand estimates and the `/api/sand` proxy
    pub sand_url: Option<String>,
    /// Root of the backend serving `/api/soc` and `/api/clay`
    pub root_url: Option<String>,
    pub map_api_key: Option<String>,
    pub tile_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            sand_url: None,
            root_url: None,
            map_api_key: None,
            tile_url: DEFAULT_TILE_URL.to_string(),
        }
    }
}

impl Settings {
    /// Loads `soilmap.ini` from its default location, then applies
    /// environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut settings = Self::from_file(config_path)?;
        settings.apply_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    fn from_file(config_path: &Path) -> Result<Self> {
        let mut settings = Settings::default();
        if !config_path.exists() {
            tracing::debug!("No config file at {}, using defaults", config_path.display());
            return Ok(settings);
        }

        let file = File::open(config_path).context("Failed to open config file")?;
        let reader = BufReader::new(file);
        let mut config_map = HashMap::new();

        for line in reader.lines() {
            let line = line.context("Failed to read line from config")?;
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                config_map.insert(
                    key.trim().to_string(),
                    value.trim().trim_matches('"').to_string(),
                );
            }
        }

        if let Some(port_str) = config_map.get("port") {
            settings.port = port_str
                .parse::<u16>()
                .with_context(|| format!("Invalid port in config: {}", port_str))?;
        }
        settings.sand_url = non_empty(config_map.remove("sand_url"));
        settings.root_url = non_empty(config_map.remove("root_url"));
        settings.map_api_key = non_empty(config_map.remove("map_api_key"));
        if let Some(tile_url) = non_empty(config_map.remove("tile_url")) {
            settings.tile_url = tile_url;
        }

        tracing::info!("Loaded settings from {}", config_path.display());
        Ok(settings)
    }

    /// Environment variables win over the file.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = non_empty(lookup("SAND_URL")) {
            self.sand_url = Some(url);
        }
        if let Some(url) = non_empty(lookup("ROOT_URL")) {
            self.root_url = Some(url);
        }
        if let Some(key) = non_empty(lookup("MAP_API_KEY")) {
            self.map_api_key = Some(key);
        }
        if let Some(tile_url) = non_empty(lookup("SOILMAP_TILE_URL")) {
            self.tile_url = tile_url;
        }
        if let Some(port) = lookup("SOILMAP_PORT").and_then(|p| p.trim().parse::<u16>().ok()) {
            self.port = port;
        }
    }

    /// Tile URL with the API key substituted for `{key}`.
    pub fn resolved_tile_url(&self) -> String {
        self.tile_url
            .replace("{key}", self.map_api_key.as_deref().unwrap_or_default())
    }

    pub fn config_path() -> PathBuf {
        let mut path = std::env::current_exe()
            .unwrap_or_default()
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        if path.ends_with("target/debug") || path.ends_with("target/release") {
            path.pop();
            path.pop();
        }
        path.push("soilmap.ini");
        path
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
