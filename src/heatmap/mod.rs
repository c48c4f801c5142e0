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

//! Heat point data model and time filtering.
//!
//! A [`HeatPoint`] is one weighted air-quality sample at a place and time.
//! The dashboard's month slider selects a [`FilterWindow`], a five-month
//! inclusive span anchored on the first of the selected month in the fixed
//! reference year; filtering is pure and recomputed deterministically from
//! the slider value and the full point set.

pub mod layer;

pub use layer::HeatLayerPlugin;

use chrono::{Months, NaiveDate};
use lazy_static::lazy_static;

/// Reference year for the time slider. The bundled sample data and the
/// slider both live in this year.
pub const REFERENCE_YEAR: i32 = 2025;

/// One weighted sample at a place and time.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Sample weight in [0, 1].
    pub intensity: f64,
    pub date: NaiveDate,
}

impl HeatPoint {
    /// Construct a point, validating the coordinate and clamping the
    /// intensity into [0, 1]. Returns `None` for off-globe coordinates.
    pub fn new(latitude: f64, longitude: f64, intensity: f64, date: NaiveDate) -> Option<Self> {
        if !crate::location::is_valid_coordinate(latitude, longitude) {
            return None;
        }

        Some(Self {
            latitude,
            longitude,
            intensity: intensity.clamp(0.0, 1.0),
            date,
        })
    }

    pub fn position(&self) -> walkers::Position {
        walkers::lat_lon(self.latitude, self.longitude)
    }
}

/// The five-month span of data considered "current" for a slider position:
/// the first of the selected month, plus/minus two calendar months, both
/// endpoints inclusive. Windows at the edges of the year extend into the
/// neighboring years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl FilterWindow {
    /// Window for a slider value (0 = January .. 11 = December). Values
    /// above 11 are clamped.
    pub fn for_month(month_index: u8) -> Self {
        let month = u32::from(month_index.min(11)) + 1;
        let anchor = NaiveDate::from_ymd_opt(REFERENCE_YEAR, month, 1).unwrap_or_default();

        Self {
            start: anchor.checked_sub_months(Months::new(2)).unwrap_or(anchor),
            end: anchor.checked_add_months(Months::new(2)).unwrap_or(anchor),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Select the subset of `points` whose date falls within `window`.
pub fn filter_points(points: &[HeatPoint], window: FilterWindow) -> Vec<HeatPoint> {
    points
        .iter()
        .filter(|point| window.contains(point.date))
        .cloned()
        .collect()
}

lazy_static! {
    /// Bundled demo dataset: a year of readings around central London.
    pub static ref SAMPLE_POINTS: Vec<HeatPoint> = {
        let raw: &[(f64, f64, f64, u32, u32)] = &[
            (51.505, 0.0, 0.8, 1, 1),
            (51.49, -0.05, 0.55, 1, 15),
            (51.53, 0.02, 0.65, 2, 10),
            (51.515, -0.08, 0.4, 3, 1),
            (51.50, -0.12, 0.7, 4, 20),
            (51.48, -0.1, 0.3, 5, 5),
            (51.51, -0.15, 0.5, 6, 1),
            (51.525, -0.18, 0.45, 7, 12),
            (51.495, -0.02, 0.6, 8, 25),
            (51.54, -0.11, 0.75, 9, 3),
            (51.47, -0.16, 0.35, 10, 18),
            (51.50, -0.07, 0.9, 11, 8),
            (51.52, -0.2, 0.7, 12, 1),
        ];

        raw.iter()
            .filter_map(|&(lat, lon, intensity, month, day)| {
                let date = NaiveDate::from_ymd_opt(REFERENCE_YEAR, month, day)?;
                HeatPoint::new(lat, lon, intensity, date)
            })
            .collect()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_filtered_set_is_exact_subset_for_all_slider_values() {
        for value in 0..=11u8 {
            let window = FilterWindow::for_month(value);
            let filtered = filter_points(&SAMPLE_POINTS, window);

            let expected: Vec<HeatPoint> = SAMPLE_POINTS
                .iter()
                .filter(|p| window.start() <= p.date && p.date <= window.end())
                .cloned()
                .collect();

            assert_eq!(filtered, expected, "slider value {value}");
            assert!(!filtered.is_empty(), "slider value {value}");
        }
    }

    #[test]
    fn test_window_is_five_calendar_months() {
        let window = FilterWindow::for_month(6); // July
        assert_eq!(window.start(), date(2025, 5, 1));
        assert_eq!(window.end(), date(2025, 9, 1));
    }

    #[test]
    fn test_window_extends_into_neighboring_years() {
        let january = FilterWindow::for_month(0);
        assert_eq!(january.start(), date(2024, 11, 1));
        assert_eq!(january.end(), date(2025, 3, 1));

        let december = FilterWindow::for_month(11);
        assert_eq!(december.start(), date(2025, 10, 1));
        assert_eq!(december.end(), date(2026, 2, 1));
    }

    #[test]
    fn test_window_endpoints_are_inclusive() {
        let window = FilterWindow::for_month(6);
        assert!(window.contains(date(2025, 5, 1)));
        assert!(window.contains(date(2025, 9, 1)));
        assert!(!window.contains(date(2025, 4, 30)));
        assert!(!window.contains(date(2025, 9, 2)));
    }

    #[test]
    fn test_out_of_range_slider_value_clamps() {
        assert_eq!(FilterWindow::for_month(12), FilterWindow::for_month(11));
        assert_eq!(FilterWindow::for_month(200), FilterWindow::for_month(11));
    }

    #[test]
    fn test_filtering_is_deterministic() {
        let window = FilterWindow::for_month(3);
        let first = filter_points(&SAMPLE_POINTS, window);
        let second = filter_points(&SAMPLE_POINTS, window);
        assert_eq!(first, second);
    }

    #[test]
    fn test_heat_point_intensity_clamped() {
        let point = HeatPoint::new(51.5, -0.09, 1.7, date(2025, 6, 1)).unwrap();
        assert!((point.intensity - 1.0).abs() < f64::EPSILON);

        let point = HeatPoint::new(51.5, -0.09, -0.2, date(2025, 6, 1)).unwrap();
        assert!(point.intensity.abs() < f64::EPSILON);
    }

    #[test]
    fn test_heat_point_rejects_off_globe_coordinates() {
        assert!(HeatPoint::new(91.0, 0.0, 0.5, date(2025, 6, 1)).is_none());
        assert!(HeatPoint::new(0.0, 181.0, 0.5, date(2025, 6, 1)).is_none());
    }

    #[test]
    fn test_sample_points_all_valid() {
        assert!(!SAMPLE_POINTS.is_empty());
        for point in SAMPLE_POINTS.iter() {
            assert!((0.0..=1.0).contains(&point.intensity));
            assert!(crate::location::is_valid_coordinate(
                point.latitude,
                point.longitude
            ));
        }
    }
}
