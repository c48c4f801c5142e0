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

//! Geolocation resolution.
//!
//! Resolution order: explicit override (CLI or config), then IP-based
//! geolocation via ipapi.co with ip-api.com as fallback. Resolution runs
//! once at startup on the background runtime and publishes its outcome
//! through a shared handle; the dashboard renders the map only after a
//! successful resolution.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{info, warn};
use serde::Deserialize;

/// Geolocation resolution state. `Failed` is terminal for the session.
#[derive(Debug, Clone)]
pub enum LocationState {
    Resolving,
    Failed(String),
    Resolved { latitude: f64, longitude: f64 },
}

pub type SharedLocation = Arc<Mutex<LocationState>>;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct IpapiResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct IpApiComResponse {
    lat: Option<f64>,
    lon: Option<f64>,
}

/// True if the coordinate is on the globe.
pub fn is_valid_coordinate(latitude: f64, longitude: f64) -> bool {
    (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude)
}

/// Spawn the one-shot resolver task. The shared state starts as `Resolving`
/// and is written exactly once.
pub fn spawn_resolver(
    runtime: &tokio::runtime::Handle,
    shared: SharedLocation,
    ctx: egui::Context,
    override_location: Option<(f64, f64)>,
) {
    if let Some((latitude, longitude)) = override_location {
        if is_valid_coordinate(latitude, longitude) {
            info!("Using location override: {latitude}, {longitude}");
            *shared.lock().unwrap() = LocationState::Resolved {
                latitude,
                longitude,
            };
            return;
        }
        warn!("Ignoring out-of-range location override: {latitude}, {longitude}");
    }

    runtime.spawn(async move {
        let outcome = resolve().await;
        match &outcome {
            LocationState::Resolved {
                latitude,
                longitude,
            } => info!("Location resolved: {latitude}, {longitude}"),
            LocationState::Failed(reason) => warn!("Location resolution failed: {reason}"),
            LocationState::Resolving => {}
        }
        *shared.lock().unwrap() = outcome;
        ctx.request_repaint();
    });
}

async fn resolve() -> LocationState {
    let client = match reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => return LocationState::Failed(format!("could not build HTTP client: {e}")),
    };

    if let Some((latitude, longitude)) = from_ipapi(&client).await {
        return LocationState::Resolved {
            latitude,
            longitude,
        };
    }

    info!("ipapi.co lookup failed, falling back to ip-api.com");

    if let Some((latitude, longitude)) = from_ip_api_com(&client).await {
        return LocationState::Resolved {
            latitude,
            longitude,
        };
    }

    LocationState::Failed("all geolocation providers failed".to_string())
}

async fn from_ipapi(client: &reqwest::Client) -> Option<(f64, f64)> {
    let response = client
        .get("https://ipapi.co/json/")
        .send()
        .await
        .ok()?
        .json::<IpapiResponse>()
        .await
        .ok()?;

    accept(response.latitude?, response.longitude?)
}

async fn from_ip_api_com(client: &reqwest::Client) -> Option<(f64, f64)> {
    let response = client
        .get("http://ip-api.com/json/")
        .send()
        .await
        .ok()?
        .json::<IpApiComResponse>()
        .await
        .ok()?;

    accept(response.lat?, response.lon?)
}

fn accept(latitude: f64, longitude: f64) -> Option<(f64, f64)> {
    if is_valid_coordinate(latitude, longitude) {
        Some((latitude, longitude))
    } else {
        warn!("Geolocation provider returned out-of-range coordinate: {latitude}, {longitude}");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ipapi_payload() {
        let payload = r#"{"ip":"81.2.69.160","city":"London","latitude":51.5064,"longitude":-0.12}"#;
        let response: IpapiResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(response.latitude, Some(51.5064));
        assert_eq!(response.longitude, Some(-0.12));
    }

    #[test]
    fn test_parse_ip_api_com_payload() {
        let payload = r#"{"status":"success","country":"United Kingdom","lat":51.5064,"lon":-0.12}"#;
        let response: IpApiComResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(response.lat, Some(51.5064));
        assert_eq!(response.lon, Some(-0.12));
    }

    #[test]
    fn test_parse_payload_without_coordinates() {
        // Providers answer with an error body and no coordinates when rate
        // limited; that must read as "no fix", not a parse failure.
        let response: IpapiResponse = serde_json::from_str(r#"{"error":true}"#).unwrap();
        assert!(response.latitude.is_none());
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(is_valid_coordinate(51.5, -0.09));
        assert!(is_valid_coordinate(-90.0, 180.0));
        assert!(!is_valid_coordinate(90.1, 0.0));
        assert!(!is_valid_coordinate(0.0, -180.5));
    }

    #[test]
    fn test_accept_rejects_out_of_range() {
        assert_eq!(accept(200.0, 0.0), None);
        assert_eq!(accept(51.5, -0.09), Some((51.5, -0.09)));
    }
}
