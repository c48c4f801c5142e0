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

//! Error types for the forecast client.

use thiserror::Error;

/// Errors that can occur while fetching a forecast.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The request failed at the transport level, or the body could not be
    /// decoded into the expected response shape.
    #[error("forecast request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status code.
    #[error("forecast service returned status {0}")]
    Status(reqwest::StatusCode),
}
