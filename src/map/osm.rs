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

use walkers::sources::{Attribution, TileSource};
use walkers::TileId;

/// Tile source for the standard OpenStreetMap raster tiles
/// Uses subdomain load balancing across a-c.tile.openstreetmap.org
#[derive(Debug)]
pub struct OsmTileSource;

impl TileSource for OsmTileSource {
    fn tile_url(&self, tile_id: TileId) -> String {
        // Subdomain load balancing (a, b, c) based on tile coordinates
        let subdomain = ['a', 'b', 'c'][((tile_id.x + tile_id.y) % 3) as usize];

        format!(
            "https://{}.tile.openstreetmap.org/{}/{}/{}.png",
            subdomain, tile_id.zoom, tile_id.x, tile_id.y
        )
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: "© OpenStreetMap contributors",
            url: "https://www.openstreetmap.org/copyright",
            logo_light: None,
            logo_dark: None,
        }
    }

    // Use default implementations for tile_size() and max_zoom()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_url_format() {
        let url = OsmTileSource.tile_url(TileId {
            x: 2044,
            y: 1360,
            zoom: 12,
        });
        assert_eq!(url, "https://a.tile.openstreetmap.org/12/2044/1360.png");
    }

    #[test]
    fn test_subdomain_balancing() {
        let first = OsmTileSource.tile_url(TileId { x: 0, y: 0, zoom: 1 });
        let second = OsmTileSource.tile_url(TileId { x: 1, y: 0, zoom: 1 });
        let third = OsmTileSource.tile_url(TileId { x: 2, y: 0, zoom: 1 });
        assert!(first.starts_with("https://a."));
        assert!(second.starts_with("https://b."));
        assert!(third.starts_with("https://c."));
    }

    #[test]
    fn test_attribution_links_to_copyright_page() {
        let attribution = OsmTileSource.attribution();
        assert!(attribution.text.contains("OpenStreetMap"));
        assert_eq!(attribution.url, "https://www.openstreetmap.org/copyright");
    }
}
