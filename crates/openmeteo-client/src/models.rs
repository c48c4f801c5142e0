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

//! Typed response models for the Open-Meteo forecast endpoint.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

/// Top-level response from `/v1/forecast`.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    /// Latitude of the grid cell the forecast was computed for.
    pub latitude: f64,

    /// Longitude of the grid cell the forecast was computed for.
    pub longitude: f64,

    /// Current conditions.
    pub current: CurrentWeather,

    /// Hourly forecast series.
    pub hourly: HourlySeries,
}

/// Current conditions block. Field names match the `current` variables
/// requested by the client, which the API echoes back verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeather {
    /// Timestamp of the observation.
    #[serde(deserialize_with = "minute_timestamp")]
    pub time: NaiveDateTime,

    /// Air temperature at 2 m, °C.
    pub temperature_2m: f64,

    /// Rain of the preceding hour, mm.
    pub rain: f64,

    /// Wind speed at 10 m, km/h.
    pub wind_speed_10m: f64,

    /// Relative humidity at 2 m, %.
    pub relative_humidity_2m: f64,

    /// Total precipitation of the preceding hour, mm.
    pub precipitation: f64,

    /// Apparent ("feels like") temperature, °C.
    pub apparent_temperature: f64,
}

/// Hourly forecast series. Parallel arrays, one entry per hour.
#[derive(Debug, Clone, Deserialize)]
pub struct HourlySeries {
    /// Timestamps.
    #[serde(deserialize_with = "minute_timestamps")]
    pub time: Vec<NaiveDateTime>,

    /// Air temperature at 2 m, °C.
    pub temperature_2m: Vec<f64>,
}

/// The API emits minute-precision ISO 8601 timestamps ("2025-06-01T12:00");
/// some variants carry seconds as well.
fn parse_timestamp(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
}

fn minute_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_timestamp(&value).map_err(serde::de::Error::custom)
}

fn minute_timestamps<'de, D>(deserializer: D) -> Result<Vec<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<String>::deserialize(deserializer)?;
    values
        .iter()
        .map(|value| parse_timestamp(value).map_err(serde::de::Error::custom))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    // Trimmed from a live /v1/forecast response.
    const FIXTURE: &str = r#"{
        "latitude": 51.5,
        "longitude": -0.120000124,
        "generationtime_ms": 0.08,
        "utc_offset_seconds": 0,
        "current_units": {
            "time": "iso8601",
            "temperature_2m": "°C",
            "rain": "mm",
            "wind_speed_10m": "km/h",
            "relative_humidity_2m": "%",
            "precipitation": "mm",
            "apparent_temperature": "°C"
        },
        "current": {
            "time": "2025-06-01T12:00",
            "interval": 900,
            "temperature_2m": 18.4,
            "rain": 0.0,
            "wind_speed_10m": 11.2,
            "relative_humidity_2m": 64,
            "precipitation": 0.1,
            "apparent_temperature": 17.1
        },
        "hourly": {
            "time": ["2025-06-01T12:00", "2025-06-01T13:00", "2025-06-01T14:00"],
            "temperature_2m": [18.4, 19.0, 19.3]
        }
    }"#;

    #[test]
    fn test_deserialize_forecast_response() {
        let forecast: ForecastResponse = serde_json::from_str(FIXTURE).unwrap();

        assert!((forecast.latitude - 51.5).abs() < f64::EPSILON);
        assert!((forecast.current.temperature_2m - 18.4).abs() < f64::EPSILON);
        assert!((forecast.current.apparent_temperature - 17.1).abs() < f64::EPSILON);
        assert!((forecast.current.relative_humidity_2m - 64.0).abs() < f64::EPSILON);
        assert_eq!(forecast.current.time, timestamp(12, 0));
        assert_eq!(
            forecast.hourly.time,
            vec![timestamp(12, 0), timestamp(13, 0), timestamp(14, 0)]
        );
        assert_eq!(forecast.hourly.temperature_2m.len(), 3);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        // The API returns units blocks and timing metadata we do not model.
        let forecast: Result<ForecastResponse, _> = serde_json::from_str(FIXTURE);
        assert!(forecast.is_ok());
    }

    #[test]
    fn test_timestamps_parse_with_and_without_seconds() {
        assert_eq!(parse_timestamp("2025-06-01T12:30").unwrap(), timestamp(12, 30));
        assert_eq!(
            parse_timestamp("2025-06-01T12:30:00").unwrap(),
            timestamp(12, 30)
        );
    }

    #[test]
    fn test_malformed_timestamp_is_a_decode_error() {
        assert!(parse_timestamp("noon-ish").is_err());
        let result: Result<ForecastResponse, _> =
            serde_json::from_str(&FIXTURE.replace("2025-06-01T12:00", "noon-ish"));
        assert!(result.is_err());
    }
}
