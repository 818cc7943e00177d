//! Input contract for the map renderer.
//!
//! Coordinates always travel as `[longitude, latitude]`, which is the order
//! the renderer expects. Rendering itself lives outside this crate.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl From<[f64; 2]> for LngLat {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(point: LngLat) -> Self {
        [point.lng, point.lat]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub lng: f64,
    pub lat: f64,
    pub title: String,
}

impl Marker {
    pub fn new(position: LngLat, title: impl Into<String>) -> Self {
        Self {
            lng: position.lng,
            lat: position.lat,
            title: title.into(),
        }
    }

    pub fn position(&self) -> LngLat {
        LngLat::new(self.lng, self.lat)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: LngLat,
    pub zoom: f64,
    pub markers: Vec<Marker>,
}

impl MapView {
    /// Markers to draw, in order. A view without markers still gets a single
    /// untitled pin at its center.
    pub fn pins(&self) -> Vec<Marker> {
        if self.markers.is_empty() {
            vec![Marker::new(self.center, "")]
        } else {
            self.markers.clone()
        }
    }
}
