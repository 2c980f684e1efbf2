//! Contract the session draws through.
//!
//! The map widget itself (tiles, icons, styling) lives outside the core; any
//! type implementing [`MapSurface`] can stand in for it.

use serde::{Deserialize, Serialize};
use shared::{Coordinate, RouteBounds, RouteKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Markers,
    Route,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerStyle {
    User,
    Destination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStyle {
    Solid,
    Dashed,
}

impl From<RouteKind> for PathStyle {
    fn from(kind: RouteKind) -> Self {
        match kind {
            RouteKind::Routed => PathStyle::Solid,
            RouteKind::Direct => PathStyle::Dashed,
        }
    }
}

impl MarkerStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            MarkerStyle::User => "user",
            MarkerStyle::Destination => "destination",
        }
    }
}

impl PathStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            PathStyle::Solid => "solid",
            PathStyle::Dashed => "dashed",
        }
    }
}

impl Layer {
    pub fn as_str(self) -> &'static str {
        match self {
            Layer::Markers => "markers",
            Layer::Route => "route",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathHandle(pub u32);

/// Markers go on [`Layer::Markers`], paths on [`Layer::Route`].
pub trait MapSurface {
    fn set_view(&mut self, center: Coordinate, zoom: u8);
    fn add_marker(&mut self, coord: Coordinate, style: MarkerStyle) -> MarkerHandle;
    fn draw_path(&mut self, path: &[Coordinate], style: PathStyle) -> PathHandle;
    fn clear_layer(&mut self, layer: Layer);
    fn fit_bounds(&mut self, path: PathHandle, padding_px: u32);
    fn invalidate_size(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawnMarker {
    pub handle: MarkerHandle,
    pub coord: Coordinate,
    pub style: MarkerStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawnPath {
    pub handle: PathHandle,
    pub path: Vec<Coordinate>,
    pub style: PathStyle,
}

/// In-memory surface keeping what a real map would currently show.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub markers: Vec<DrawnMarker>,
    pub paths: Vec<DrawnPath>,
    pub view: Option<(Coordinate, u8)>,
    pub fitted: Option<(RouteBounds, u32)>,
    pub resize_count: usize,
    next_id: u32,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers_with(&self, style: MarkerStyle) -> Vec<Coordinate> {
        self.markers
            .iter()
            .filter(|m| m.style == style)
            .map(|m| m.coord)
            .collect()
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

impl MapSurface for RecordingSurface {
    fn set_view(&mut self, center: Coordinate, zoom: u8) {
        self.view = Some((center, zoom));
    }

    fn add_marker(&mut self, coord: Coordinate, style: MarkerStyle) -> MarkerHandle {
        let handle = MarkerHandle(self.next_id());
        self.markers.push(DrawnMarker {
            handle,
            coord,
            style,
        });
        handle
    }

    fn draw_path(&mut self, path: &[Coordinate], style: PathStyle) -> PathHandle {
        let handle = PathHandle(self.next_id());
        self.paths.push(DrawnPath {
            handle,
            path: path.to_vec(),
            style,
        });
        handle
    }

    fn clear_layer(&mut self, layer: Layer) {
        match layer {
            Layer::Markers => self.markers.clear(),
            Layer::Route => self.paths.clear(),
        }
    }

    fn fit_bounds(&mut self, path: PathHandle, padding_px: u32) {
        // Handles from a cleared layer are ignored, as Leaflet would.
        let bounds = self
            .paths
            .iter()
            .find(|p| p.handle == path)
            .and_then(|p| RouteBounds::from_path(&p.path));
        if let Some(bounds) = bounds {
            self.fitted = Some((bounds, padding_px));
        }
    }

    fn invalidate_size(&mut self) {
        self.resize_count += 1;
    }
}
