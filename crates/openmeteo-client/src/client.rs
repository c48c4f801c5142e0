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

//! Async HTTP client for the Open-Meteo forecast endpoint.

use std::time::Duration;

use log::debug;

use crate::error::ForecastError;
use crate::models::ForecastResponse;

/// Default public Open-Meteo endpoint. No API key required.
pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Request timeout. Forecast responses are small; anything slower than this
/// is treated as a network failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Current-conditions variables requested on every fetch.
const CURRENT_VARIABLES: &str =
    "temperature_2m,rain,wind_speed_10m,relative_humidity_2m,precipitation,apparent_temperature";

/// Hourly variables requested on every fetch.
const HOURLY_VARIABLES: &str = "temperature_2m";

/// Async client for fetching forecasts. Cheap to clone; clones share the
/// underlying connection pool.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    http: reqwest::Client,
    base_url: String,
}

impl ForecastClient {
    /// Create a client against the public Open-Meteo endpoint.
    pub fn new() -> Result<Self, ForecastError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom endpoint (for self-hosted instances
    /// and tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ForecastError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ForecastError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Build the request URL for a coordinate.
    pub fn request_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}?latitude={:.4}&longitude={:.4}&current={}&hourly={}",
            self.base_url, latitude, longitude, CURRENT_VARIABLES, HOURLY_VARIABLES
        )
    }

    /// Fetch current and hourly conditions for a coordinate.
    pub async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ForecastResponse, ForecastError> {
        let url = self.request_url(latitude, longitude);
        debug!("Fetching forecast: {url}");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::Status(status));
        }

        let forecast = response.json::<ForecastResponse>().await?;
        Ok(forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_contains_coordinate_and_variables() {
        let client = ForecastClient::new().unwrap();
        let url = client.request_url(51.505, -0.09);

        assert!(url.starts_with(DEFAULT_BASE_URL));
        assert!(url.contains("latitude=51.5050"));
        assert!(url.contains("longitude=-0.0900"));
        assert!(url.contains("current=temperature_2m,rain,wind_speed_10m"));
        assert!(url.contains("apparent_temperature"));
        assert!(url.contains("hourly=temperature_2m"));
    }

    #[test]
    fn test_custom_base_url() {
        let client = ForecastClient::with_base_url("http://localhost:9000/v1/forecast").unwrap();
        let url = client.request_url(0.0, 0.0);
        assert!(url.starts_with("http://localhost:9000/v1/forecast?"));
    }
}
