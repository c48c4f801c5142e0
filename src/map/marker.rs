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

//! Draggable probe marker.
//!
//! Plugins run inside the map widget by value each frame, so drag state is
//! reported back to the owning view through a shared feedback cell. The map
//! view disables its own drag gesture while a marker drag is active, and
//! also whenever the pointer hovers within the marker's hit radius, so the
//! frame a drag starts on the marker can never pan the map. The dropped
//! coordinate is committed on release only.

use std::sync::{Arc, Mutex};

use egui::{Color32, Pos2, Stroke};
use walkers::{MapMemory, Plugin, Position, Projector};

/// Pointer-to-marker distance that starts a drag, in pixels.
pub const MARKER_HIT_RADIUS: f32 = 16.0;

/// Per-frame drag state written by the plugin and read by the map view.
#[derive(Debug, Default)]
pub struct MarkerFeedback {
    /// True while the pointer is dragging the marker.
    pub drag_active: bool,

    /// Set once when the marker is dropped: (latitude, longitude).
    pub dropped_at: Option<(f64, f64)>,

    /// Where the marker anchor was projected last frame. The map view hit
    /// tests the pointer against this before the map runs its own gesture.
    pub screen_pos: Option<Pos2>,
}

/// Whether the map's own drag gesture must be off this frame: either a
/// marker drag is in progress, or the pointer sits within the marker's hit
/// radius and any drag that starts now belongs to the marker.
pub fn suppress_map_drag(
    drag_active: bool,
    marker_screen: Option<Pos2>,
    pointer: Option<Pos2>,
) -> bool {
    drag_active
        || marker_screen
            .zip(pointer)
            .is_some_and(|(marker, pointer)| pointer.distance(marker) <= MARKER_HIT_RADIUS)
}

pub type SharedMarkerFeedback = Arc<Mutex<MarkerFeedback>>;

/// Map plugin that draws the marker and tracks pointer drags on it.
pub struct DraggableMarkerPlugin {
    pub position: Position,
    pub feedback: SharedMarkerFeedback,
    /// Drag state carried over from the previous frame.
    pub dragging: bool,
    pub map_rect: egui::Rect,
}

impl Plugin for DraggableMarkerPlugin {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        _response: &egui::Response,
        projector: &Projector,
        _memory: &MapMemory,
    ) {
        let projected = projector.project(self.position);
        let anchored = egui::pos2(projected.x, projected.y);

        let pointer = ui.input(|i| i.pointer.interact_pos());
        let pos = match (self.dragging, pointer) {
            (true, Some(p)) => p,
            _ => anchored,
        };

        draw_pin(ui, self.map_rect, pos, self.dragging);

        let mut feedback = self.feedback.lock().unwrap();
        feedback.screen_pos = Some(anchored);
        if self.dragging {
            if ui.input(|i| i.pointer.primary_released()) {
                let dropped = projector.unproject(pos.to_vec2());
                feedback.dropped_at = Some((dropped.y(), dropped.x()));
                feedback.drag_active = false;
            } else {
                feedback.drag_active = true;
            }
        } else if ui.input(|i| i.pointer.primary_pressed()) {
            if let Some(p) = pointer {
                if p.distance(anchored) <= MARKER_HIT_RADIUS {
                    feedback.drag_active = true;
                }
            }
        }
    }
}

fn draw_pin(ui: &egui::Ui, map_rect: egui::Rect, pos: Pos2, dragging: bool) {
    let painter = ui.painter().with_clip_rect(map_rect);

    let head = pos - egui::vec2(0.0, 14.0);
    let fill = if dragging {
        Color32::from_rgb(255, 140, 60)
    } else {
        Color32::from_rgb(220, 60, 60)
    };
    let outline = Color32::from_rgb(120, 20, 20);

    painter.line_segment([pos, head], Stroke::new(3.0, outline));
    painter.circle_filled(head, 8.0, fill);
    painter.circle_stroke(head, 8.0, Stroke::new(2.0, outline));
    painter.circle_filled(head, 3.0, Color32::WHITE);
}
