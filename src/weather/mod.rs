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

//! Weather panel state.
//!
//! Fetches current and hourly conditions for the probe marker coordinate.
//! Each fetch is keyed by a quantized coordinate and guarded by a
//! generation counter plus a cancellation token: a newer request cancels
//! the in-flight one, and a stale response that slips through is discarded
//! by the generation check. Failures surface as `Unavailable`, never as a
//! perpetual loading state.

use std::sync::{Arc, Mutex};

use chrono::NaiveDateTime;
use log::{debug, error, warn};
use openmeteo_client::{ForecastClient, ForecastResponse};
use tokio_util::sync::CancellationToken;

/// Hourly entries shown in the panel.
const UPCOMING_HOURS: usize = 6;

/// Coordinate quantization step for fetch keying: ~11 m of latitude.
/// Marker jitter below this does not trigger a refetch.
const KEY_SCALE: f64 = 10_000.0;

/// What the weather panel shows.
#[derive(Debug, Clone)]
pub enum WeatherPhase {
    Idle,
    Loading,
    Ready(WeatherSnapshot),
    Unavailable,
}

/// Display-ready subset of a forecast response.
#[derive(Debug, Clone)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub apparent_temperature: f64,
    pub rain: f64,
    pub precipitation: f64,
    pub wind_speed: f64,
    pub humidity: f64,
    /// Next hours as (timestamp, temperature °C).
    pub upcoming: Vec<(NaiveDateTime, f64)>,
}

impl From<ForecastResponse> for WeatherSnapshot {
    fn from(forecast: ForecastResponse) -> Self {
        let upcoming = forecast
            .hourly
            .time
            .into_iter()
            .zip(forecast.hourly.temperature_2m)
            .filter(|&(time, _)| time > forecast.current.time)
            .take(UPCOMING_HOURS)
            .collect();

        Self {
            temperature: forecast.current.temperature_2m,
            apparent_temperature: forecast.current.apparent_temperature,
            rain: forecast.current.rain,
            precipitation: forecast.current.precipitation,
            wind_speed: forecast.current.wind_speed_10m,
            humidity: forecast.current.relative_humidity_2m,
            upcoming,
        }
    }
}

/// Fetch key: quantized coordinate.
pub fn quantize(latitude: f64, longitude: f64) -> (i64, i64) {
    (
        (latitude * KEY_SCALE).round() as i64,
        (longitude * KEY_SCALE).round() as i64,
    )
}

#[derive(Debug)]
struct Inner {
    phase: WeatherPhase,
    generation: u64,
}

/// Owns the in-flight fetch and the panel state.
#[derive(Debug)]
pub struct WeatherService {
    inner: Arc<Mutex<Inner>>,
    client: Option<ForecastClient>,
    cancel: Option<CancellationToken>,
    key: Option<(i64, i64)>,
}

impl WeatherService {
    pub fn new() -> Self {
        let client = match ForecastClient::new() {
            Ok(client) => Some(client),
            Err(e) => {
                error!("Weather client unavailable: {e}");
                None
            }
        };

        Self {
            inner: Arc::new(Mutex::new(Inner {
                phase: WeatherPhase::Idle,
                generation: 0,
            })),
            client,
            cancel: None,
            key: None,
        }
    }

    pub fn phase(&self) -> WeatherPhase {
        self.inner.lock().unwrap().phase.clone()
    }

    /// Drop the current key so the next `ensure` call refetches.
    pub fn retry(&mut self) {
        self.key = None;
    }

    /// Make sure a fetch for this coordinate is running or already done.
    /// A coordinate change supersedes the previous fetch: its token is
    /// cancelled and its result, should it still arrive, fails the
    /// generation check and is dropped.
    pub fn ensure(
        &mut self,
        runtime: &tokio::runtime::Handle,
        ctx: &egui::Context,
        latitude: f64,
        longitude: f64,
    ) {
        let key = quantize(latitude, longitude);
        if self.key == Some(key) {
            return;
        }
        self.key = Some(key);

        let Some(client) = self.client.clone() else {
            self.inner.lock().unwrap().phase = WeatherPhase::Unavailable;
            return;
        };

        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
        let token = CancellationToken::new();
        self.cancel = Some(token.clone());

        let generation = {
            let mut inner = self.inner.lock().unwrap();
            inner.generation += 1;
            inner.phase = WeatherPhase::Loading;
            inner.generation
        };

        let inner = self.inner.clone();
        let ctx = ctx.clone();
        runtime.spawn(async move {
            tokio::select! {
                () = token.cancelled() => {
                    debug!("Forecast fetch for {latitude:.4}, {longitude:.4} cancelled");
                }
                result = client.fetch(latitude, longitude) => {
                    let mut inner = inner.lock().unwrap();
                    if inner.generation != generation {
                        debug!("Discarding stale forecast response (generation {generation})");
                        return;
                    }
                    inner.phase = match result {
                        Ok(forecast) => WeatherPhase::Ready(forecast.into()),
                        Err(e) => {
                            warn!("Forecast fetch failed: {e}");
                            WeatherPhase::Unavailable
                        }
                    };
                    ctx.request_repaint();
                }
            }
        });
    }
}

impl Default for WeatherService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use openmeteo_client::{CurrentWeather, HourlySeries};

    fn hour(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn forecast() -> ForecastResponse {
        ForecastResponse {
            latitude: 51.5,
            longitude: -0.12,
            current: CurrentWeather {
                time: hour(12),
                temperature_2m: 18.4,
                rain: 0.2,
                wind_speed_10m: 11.2,
                relative_humidity_2m: 64.0,
                precipitation: 0.3,
                apparent_temperature: 17.1,
            },
            hourly: HourlySeries {
                time: (10..20).map(hour).collect(),
                temperature_2m: (10..20).map(f64::from).collect(),
            },
        }
    }

    #[test]
    fn test_snapshot_carries_current_conditions() {
        let snapshot = WeatherSnapshot::from(forecast());
        assert!((snapshot.temperature - 18.4).abs() < f64::EPSILON);
        assert!((snapshot.apparent_temperature - 17.1).abs() < f64::EPSILON);
        assert!((snapshot.humidity - 64.0).abs() < f64::EPSILON);
        assert!((snapshot.wind_speed - 11.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snapshot_upcoming_starts_after_current_time() {
        let snapshot = WeatherSnapshot::from(forecast());
        assert_eq!(snapshot.upcoming.len(), UPCOMING_HOURS);
        assert_eq!(snapshot.upcoming[0].0, hour(13));
        assert!((snapshot.upcoming[0].1 - 13.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snapshot_upcoming_compares_timestamps_chronologically() {
        // A series crossing midnight must stay in forecast order behind
        // a current observation late the previous day.
        let mut forecast = forecast();
        forecast.current.time = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap();
        forecast.hourly.time = vec![
            forecast.current.time,
            NaiveDate::from_ymd_opt(2025, 6, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 2)
                .unwrap()
                .and_hms_opt(1, 0, 0)
                .unwrap(),
        ];
        forecast.hourly.temperature_2m = vec![15.0, 14.0, 13.0];

        let snapshot = WeatherSnapshot::from(forecast);
        assert_eq!(snapshot.upcoming.len(), 2);
        assert!(snapshot.upcoming[0].0 < snapshot.upcoming[1].0);
        assert!((snapshot.upcoming[0].1 - 14.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_quantize_ignores_sub_threshold_jitter() {
        let key = quantize(51.50640, -0.12001);
        assert_eq!(quantize(51.506404, -0.120012), key);
        assert_ne!(quantize(51.5070, -0.1200), key);
    }
}
