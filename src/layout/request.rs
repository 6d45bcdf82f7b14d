use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::{Dimensions, Position, Size};
use crate::plan::RoomType;

/// One room the builder should place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSpec {
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub label: String,
    pub size: Size,
    /// Labels of rooms this one should share a door with, in priority order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adjacent: Vec<String>,
    /// Fixed top-left corner. Anchored rooms are placed before packing starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Position>,
}

impl RoomSpec {
    pub fn new(room_type: RoomType, label: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            room_type,
            label: label.into(),
            size: Size::new(width, height),
            adjacent: Vec::new(),
            anchor: None,
        }
    }

    pub fn adjacent_to(mut self, label: impl Into<String>) -> Self {
        self.adjacent.push(label.into());
        self
    }

    pub fn anchored_at(mut self, x: f64, y: f64) -> Self {
        self.anchor = Some(Position::new(x, y));
        self
    }
}

/// Bounding dimensions plus the rooms to lay out, in placement order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    pub dimensions: Dimensions,
    #[serde(default)]
    pub rooms: Vec<RoomSpec>,
}

impl LayoutRequest {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            dimensions: Dimensions::new(width, height),
            rooms: Vec::new(),
        }
    }

    pub fn with_room(mut self, room: RoomSpec) -> Self {
        self.rooms.push(room);
        self
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
