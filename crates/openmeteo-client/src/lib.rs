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

//! Client library for the Open-Meteo forecast API.
//!
//! This library provides a small, reusable client for fetching current and
//! hourly weather conditions for a coordinate. It is split into layers that
//! can be used independently:
//!
//! - **Model layer**: typed response structures for the forecast endpoint
//! - **Client layer**: async HTTP client with request building and typed errors
//!
//! # Quick Start
//!
//! ```no_run
//! use openmeteo_client::ForecastClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = ForecastClient::new().unwrap();
//!     let forecast = client.fetch(51.505, -0.09).await.unwrap();
//!     println!("{:.1} °C", forecast.current.temperature_2m);
//! }
//! ```

pub mod client;
pub mod error;
pub mod models;

pub use client::ForecastClient;
pub use error::ForecastError;
pub use models::{CurrentWeather, ForecastResponse, HourlySeries};
