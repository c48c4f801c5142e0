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

//! Role-lookup client for the Home page.
//!
//! Fetches `GET {base}/api/py/engineer-roles?title=<title>` once at startup.
//! Any failure (no endpoint configured, network error, non-2xx, bad body)
//! collapses to the fallback line with the requested title and "unknown"
//! skill; the Home page never shows an error for this.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{info, warn};
use serde::Deserialize;

/// Title looked up on startup.
pub const DEFAULT_TITLE: &str = "Frontend Developer";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Deserialize)]
pub struct EngineerRole {
    pub title: String,
    pub mainskill: String,
}

/// Role lookup outcome shown on the Home page.
#[derive(Debug, Clone)]
pub enum RoleState {
    Pending,
    Ready(String),
}

pub type SharedRole = Arc<Mutex<RoleState>>;

/// Line rendered on the Home page. Falls back to the requested title and
/// "unknown" when the lookup produced nothing.
pub fn display_line(requested_title: &str, role: Option<&EngineerRole>) -> String {
    let title = role.map_or(requested_title, |r| r.title.as_str());
    let skill = role.map_or("unknown", |r| r.mainskill.as_str());
    format!("The main skill of a {title} is {skill}.")
}

/// Resolve the API base URL: environment variable first, then config.
pub fn resolve_base_url(config_value: Option<&str>) -> Option<String> {
    if let Ok(url) = std::env::var("CLEANVIEW_ROLE_API") {
        if !url.is_empty() {
            return Some(url);
        }
    }

    config_value
        .map(str::to_owned)
        .filter(|url| !url.is_empty())
}

/// Spawn the one-shot lookup task; writes the display line when done.
pub fn spawn_lookup(
    runtime: &tokio::runtime::Handle,
    shared: SharedRole,
    base_url: Option<String>,
    title: String,
    ctx: egui::Context,
) {
    let Some(base_url) = base_url else {
        info!("No role-lookup endpoint configured, using fallback");
        *shared.lock().unwrap() = RoleState::Ready(display_line(&title, None));
        return;
    };

    runtime.spawn(async move {
        let role = fetch_role(&base_url, &title).await;
        *shared.lock().unwrap() = RoleState::Ready(display_line(&title, role.as_ref()));
        ctx.request_repaint();
    });
}

async fn fetch_role(base_url: &str, title: &str) -> Option<EngineerRole> {
    let client = match reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => {
            warn!("Could not build role-lookup client: {e}");
            return None;
        }
    };

    let url = format!("{}/api/py/engineer-roles", base_url.trim_end_matches('/'));
    let response = match client.get(&url).query(&[("title", title)]).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("Role lookup failed: {e}");
            return None;
        }
    };

    if !response.status().is_success() {
        warn!("Role lookup returned status {}", response.status());
        return None;
    }

    match response.json::<EngineerRole>().await {
        Ok(role) => Some(role),
        Err(e) => {
            warn!("Role lookup body was not the expected shape: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_line_with_role() {
        let role = EngineerRole {
            title: "Frontend Developer".to_string(),
            mainskill: "CSS".to_string(),
        };
        assert_eq!(
            display_line("Frontend Developer", Some(&role)),
            "The main skill of a Frontend Developer is CSS."
        );
    }

    #[test]
    fn test_display_line_fallback_never_errors() {
        assert_eq!(
            display_line("Frontend Developer", None),
            "The main skill of a Frontend Developer is unknown."
        );
    }

    #[test]
    fn test_role_payload_parses() {
        let role: EngineerRole =
            serde_json::from_str(r#"{"title":"Backend Developer","mainskill":"SQL"}"#).unwrap();
        assert_eq!(role.title, "Backend Developer");
        assert_eq!(role.mainskill, "SQL");
    }

    #[test]
    fn test_empty_config_url_is_ignored() {
        // Env var absence is assumed here; an empty config value must not
        // count as a configured endpoint.
        if std::env::var("CLEANVIEW_ROLE_API").is_err() {
            assert_eq!(resolve_base_url(Some("")), None);
            assert_eq!(resolve_base_url(None), None);
            assert_eq!(
                resolve_base_url(Some("http://localhost:8000")),
                Some("http://localhost:8000".to_string())
            );
        }
    }
}
