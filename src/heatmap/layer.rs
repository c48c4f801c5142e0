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

//! Heatmap overlay rendering.
//!
//! A `walkers` map plugin that paints weighted points as soft radial blobs.
//! The overlay is rebuilt from the filtered point set every frame, so
//! toggling it off and on can never stack duplicate layers. With no points
//! to draw it logs at debug level and paints nothing.

use egui::Color32;
use log::debug;
use walkers::{MapMemory, Plugin, Projector};

use super::HeatPoint;

// Fixed visual parameters, matching the web app's heat layer.
pub const HEAT_RADIUS: f32 = 25.0;
pub const HEAT_BLUR: f32 = 15.0;
pub const HEAT_MIN_OPACITY: f32 = 0.5;

/// Number of concentric rings used to fake the blur falloff.
const BLUR_RINGS: usize = 6;

/// Map overlay that renders the filtered heat points.
pub struct HeatLayerPlugin {
    pub points: Vec<HeatPoint>,
    pub map_rect: egui::Rect,
}

impl Plugin for HeatLayerPlugin {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        _response: &egui::Response,
        projector: &Projector,
        _memory: &MapMemory,
    ) {
        if self.points.is_empty() {
            debug!("Heat layer has no points in the current filter window");
            return;
        }
        if self.map_rect.width() <= 0.0 || self.map_rect.height() <= 0.0 {
            debug!("Heat layer skipped: degenerate map viewport");
            return;
        }

        let painter = ui.painter().with_clip_rect(self.map_rect);
        let cull_rect = self.map_rect.expand(HEAT_RADIUS + HEAT_BLUR);

        for point in &self.points {
            let projected = projector.project(point.position());
            let pos = egui::pos2(projected.x, projected.y);

            if !cull_rect.contains(pos) {
                continue;
            }

            let (r, g, b) = intensity_to_color(point.intensity);

            // Outer rings first so the opaque core paints on top.
            for ring in (0..BLUR_RINGS).rev() {
                let t = ring as f32 / (BLUR_RINGS - 1) as f32;
                let radius = HEAT_RADIUS + HEAT_BLUR * t;
                let alpha = ring_alpha(t, point.intensity);
                painter.circle_filled(pos, radius, Color32::from_rgba_unmultiplied(r, g, b, alpha));
            }
        }
    }
}

/// Opacity for one blur ring. `t` runs from 0.0 at the core to 1.0 at the
/// outer edge; the core honors the layer's minimum opacity floor scaled by
/// the point's intensity.
fn ring_alpha(t: f32, intensity: f64) -> u8 {
    let core = HEAT_MIN_OPACITY + (1.0 - HEAT_MIN_OPACITY) * intensity as f32;
    let falloff = (1.0 - t).powi(2);
    // Rings stack, so each contributes a fraction of the core opacity.
    let per_ring = core * falloff / BLUR_RINGS as f32 * 2.0;
    (per_ring.clamp(0.0, 1.0) * 255.0) as u8
}

// Convert intensity to continuous color gradient
// Low intensity (blue/green) -> high intensity (red) with smooth blending
pub fn intensity_to_color(intensity: f64) -> (u8, u8, u8) {
    let value = intensity.clamp(0.0, 1.0) as f32;

    // Gradient stops as (intensity, (r, g, b))
    let stops = [
        (0.0, (0.0, 0.0, 255.0)),     // Blue
        (0.25, (0.0, 200.0, 255.0)),  // Cyan
        (0.5, (0.0, 255.0, 0.0)),     // Green
        (0.75, (255.0, 255.0, 0.0)),  // Yellow
        (1.0, (255.0, 0.0, 0.0)),     // Red
    ];

    for i in 0..stops.len() - 1 {
        let (v1, color1) = stops[i];
        let (v2, color2) = stops[i + 1];

        if value >= v1 && value <= v2 {
            let t = (value - v1) / (v2 - v1);

            let r = color1.0 + (color2.0 - color1.0) * t;
            let g = color1.1 + (color2.1 - color1.1) * t;
            let b = color1.2 + (color2.2 - color1.2) * t;

            return (r as u8, g as u8, b as u8);
        }
    }

    (255, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_endpoints() {
        assert_eq!(intensity_to_color(0.0), (0, 0, 255));
        assert_eq!(intensity_to_color(1.0), (255, 0, 0));
    }

    #[test]
    fn test_gradient_clamps_out_of_range_input() {
        assert_eq!(intensity_to_color(-3.0), intensity_to_color(0.0));
        assert_eq!(intensity_to_color(7.0), intensity_to_color(1.0));
    }

    #[test]
    fn test_gradient_midpoint_is_green() {
        let (r, g, b) = intensity_to_color(0.5);
        assert!(g > r && g > b);
    }

    #[test]
    fn test_ring_alpha_decreases_outward() {
        let core = ring_alpha(0.0, 0.8);
        let mid = ring_alpha(0.5, 0.8);
        let edge = ring_alpha(1.0, 0.8);
        assert!(core > mid);
        assert!(mid > edge);
        assert_eq!(edge, 0);
    }

    #[test]
    fn test_ring_alpha_scales_with_intensity() {
        assert!(ring_alpha(0.0, 1.0) > ring_alpha(0.0, 0.0));
        // Even a zero-intensity point keeps the minimum opacity floor.
        assert!(ring_alpha(0.0, 0.0) > 0);
    }
}
