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

//! Map view: tile map, draggable marker, optional heat overlay.
//!
//! The view is created once geolocation resolves and owns the shared map
//! engine state (`MapMemory`). It centers on the resolved coordinate until
//! the user pans, after which the engine detaches and later state changes
//! never fight user pan/zoom. Child layers are rebuilt per frame, so each
//! frame owns exactly what it painted.

pub mod marker;
pub mod osm;

pub use osm::OsmTileSource;

use std::sync::{Arc, Mutex};

use log::{debug, warn};
use walkers::sources::TileSource;
use walkers::{HttpOptions, HttpTiles, Map, MapMemory, Position};

use crate::heatmap::{HeatLayerPlugin, HeatPoint};
use marker::{DraggableMarkerPlugin, MarkerFeedback, SharedMarkerFeedback};

/// Clamp a coordinate onto the globe.
pub fn clamp_coordinate(latitude: f64, longitude: f64) -> (f64, f64) {
    (latitude.clamp(-90.0, 90.0), longitude.clamp(-180.0, 180.0))
}

/// The dashboard's map view.
pub struct MapView {
    tiles: HttpTiles,
    memory: MapMemory,
    /// Resolved geolocation; the map centers here until the user pans.
    home: Position,
    /// Probe marker position, updated on drag-end.
    marker_position: (f64, f64),
    feedback: SharedMarkerFeedback,
}

impl MapView {
    /// Create the view centered on the resolved coordinate. Centering
    /// happens once; user pan detaches the view from `home` permanently.
    pub fn new(ctx: &egui::Context, latitude: f64, longitude: f64, zoom: f64) -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| std::path::PathBuf::from(".cache"))
            .join("cleanview")
            .join("tiles");

        let http_options = HttpOptions {
            cache: Some(cache_dir),
            ..Default::default()
        };

        let tiles = HttpTiles::with_options(OsmTileSource, http_options, ctx.clone());

        let mut memory = MapMemory::default();
        if memory.set_zoom(zoom).is_err() {
            warn!("Configured zoom {zoom} is out of range, keeping engine default");
        }

        let (latitude, longitude) = clamp_coordinate(latitude, longitude);

        Self {
            tiles,
            memory,
            home: walkers::lat_lon(latitude, longitude),
            marker_position: (latitude, longitude),
            feedback: Arc::new(Mutex::new(MarkerFeedback::default())),
        }
    }

    /// Current probe marker position.
    pub fn marker_position(&self) -> (f64, f64) {
        self.marker_position
    }

    /// Re-attach the view to the resolved coordinate (explicit user action).
    pub fn center_on_home(&mut self) {
        self.memory.follow_my_position();
    }

    /// Draw the map with the marker and, if enabled, the heat overlay.
    pub fn show(&mut self, ui: &mut egui::Ui, heat_points: &[HeatPoint], show_heatmap: bool) {
        let map_rect = ui.available_rect_before_wrap();

        // Decide before the map runs who owns a drag this frame: an active
        // marker drag, or a pointer close enough to the marker that a drag
        // starting now is a marker drag, keeps the map from panning.
        let (marker_dragging, marker_screen) = {
            let feedback = self.feedback.lock().unwrap();
            (feedback.drag_active, feedback.screen_pos)
        };
        let pointer = ui.input(|i| i.pointer.interact_pos());
        let map_owns_drag = !marker::suppress_map_drag(marker_dragging, marker_screen, pointer);

        let (marker_lat, marker_lon) = self.marker_position;
        let marker_plugin = DraggableMarkerPlugin {
            position: walkers::lat_lon(marker_lat, marker_lon),
            feedback: self.feedback.clone(),
            dragging: marker_dragging,
            map_rect,
        };

        let mut map = Map::new(Some(&mut self.tiles), &mut self.memory, self.home)
            .drag_pan_buttons(if map_owns_drag {
                egui::DragPanButtons::PRIMARY
            } else {
                egui::DragPanButtons::empty()
            })
            .with_plugin(marker_plugin);

        if show_heatmap {
            map = map.with_plugin(HeatLayerPlugin {
                points: heat_points.to_vec(),
                map_rect,
            });
        }

        ui.add(map);

        // Attribution (required by OpenStreetMap)
        ui.painter().text(
            map_rect.right_bottom() + egui::vec2(-6.0, -4.0),
            egui::Align2::RIGHT_BOTTOM,
            OsmTileSource.attribution().text,
            egui::FontId::proportional(10.0),
            ui.visuals().text_color(),
        );

        // Commit a marker drop. Only the marker's own position changes;
        // center and zoom stay where the user left them.
        if let Some((lat, lon)) = self.feedback.lock().unwrap().dropped_at.take() {
            self.marker_position = clamp_coordinate(lat, lon);
            debug!(
                "Marker dropped at {:.5}, {:.5}",
                self.marker_position.0, self.marker_position.1
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_coordinate_passes_valid_values() {
        assert_eq!(clamp_coordinate(51.5, -0.09), (51.5, -0.09));
    }

    #[test]
    fn test_clamp_coordinate_limits_out_of_range_values() {
        assert_eq!(clamp_coordinate(95.0, 200.0), (90.0, 180.0));
        assert_eq!(clamp_coordinate(-95.0, -200.0), (-90.0, -180.0));
    }
}
