// Copyright 2025 Cleanview Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Application configuration management.
//!
//! This module handles persistent configuration storage using TOML format.
//! It covers UI preferences (theme, overlay toggles, slider position), an
//! optional location override for machines without a usable geolocation
//! source, and the optional role-lookup API endpoint.

use serde::{Deserialize, Serialize};

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    /// Configuration schema version for migrations
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    /// Theme preference: "dark" or "light". Absent means follow the system.
    #[serde(default)]
    pub theme: Option<String>,

    /// Initial map zoom level
    #[serde(default = "default_zoom")]
    pub default_zoom: f64,

    /// Show the air-quality heatmap overlay
    #[serde(default)]
    pub show_air_quality: bool,

    /// Show the population-density overlay (no data source wired yet)
    #[serde(default)]
    pub show_population: bool,

    /// Month selected on the time slider (0 = January .. 11 = December)
    #[serde(default = "default_slider_month")]
    pub slider_month: u8,

    /// Override latitude (skips geolocation lookup when both are set)
    #[serde(default)]
    pub override_latitude: Option<f64>,

    /// Override longitude (skips geolocation lookup when both are set)
    #[serde(default)]
    pub override_longitude: Option<f64>,

    /// Base URL of the role-lookup API (env var takes precedence)
    #[serde(default)]
    pub role_api_base_url: Option<String>,
}

// Default value functions for serde
fn default_config_version() -> u32 {
    1
}

fn default_zoom() -> f64 {
    13.0
}

fn default_slider_month() -> u8 {
    6
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            theme: None,
            default_zoom: default_zoom(),
            show_air_quality: false,
            show_population: false,
            slider_month: default_slider_month(),
            override_latitude: None,
            override_longitude: None,
            role_api_base_url: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults on first run
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load("cleanview", "config")
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store("cleanview", "config", self)
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<std::path::PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path("cleanview", "config")
    }

    /// Explicit location override, if both halves are configured
    pub fn override_location(&self) -> Option<(f64, f64)> {
        match (self.override_latitude, self.override_longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.config_version, 1);
        assert!(config.theme.is_none());
        assert!((config.default_zoom - 13.0).abs() < f64::EPSILON);
        assert!(!config.show_air_quality);
        assert!(!config.show_population);
        assert_eq!(config.slider_month, 6);
        assert!(config.override_location().is_none());
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        // An empty document must deserialize; every field has a serde default.
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.slider_month, 6);
        assert!((config.default_zoom - 13.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_override_location_requires_both_halves() {
        let config = AppConfig {
            override_latitude: Some(51.5),
            ..AppConfig::default()
        };
        assert!(config.override_location().is_none());

        let config = AppConfig {
            override_latitude: Some(51.5),
            override_longitude: Some(-0.09),
            ..AppConfig::default()
        };
        assert_eq!(config.override_location(), Some((51.5, -0.09)));
    }
}
