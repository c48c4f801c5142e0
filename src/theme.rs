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

//! Theme handling.
//!
//! The theme choice lives in [`crate::config::AppConfig`] and flows through
//! the app explicitly; an absent choice means "follow the system theme".
//! Every toggle writes the config back so the preference survives restarts.

use egui::ThemePreference;

/// An explicit user theme choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeChoice {
    Dark,
    Light,
}

impl ThemeChoice {
    /// Parse the persisted config value. Unknown strings are treated as
    /// unset so a hand-edited config cannot wedge the UI.
    pub fn from_config(value: Option<&str>) -> Option<Self> {
        match value {
            Some("dark") => Some(Self::Dark),
            Some("light") => Some(Self::Light),
            _ => None,
        }
    }

    /// Value stored in the config file.
    pub fn as_config_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Icon shown on the toggle button.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Dark => "🌙",
            Self::Light => "☀",
        }
    }
}

/// Apply a theme choice to the egui context. `None` defers to the system.
pub fn apply(ctx: &egui::Context, choice: Option<ThemeChoice>) {
    let preference = match choice {
        Some(ThemeChoice::Dark) => ThemePreference::Dark,
        Some(ThemeChoice::Light) => ThemePreference::Light,
        None => ThemePreference::System,
    };
    ctx.set_theme(preference);
}
