//! Render options and engine-wide configuration knobs.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::logging::Logger;
use crate::metrics::PlanMetrics;

/// Visual parameters for the plan renderer. Defaults match the reference drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// Pixels per grid unit.
    pub cell_scale: f64,
    /// Door arc radius in pixels.
    pub door_arc_radius: f64,
    pub grid_line_color: String,
    pub grid_line_width: f64,
    pub room_fill_color: String,
    pub room_stroke_color: String,
    pub room_stroke_width: f64,
    pub label_font: String,
    pub label_color: String,
    pub door_color: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            cell_scale: 20.0,
            door_arc_radius: 10.0,
            grid_line_color: "#ddd".to_string(),
            grid_line_width: 1.0,
            room_fill_color: "#f0f0f0".to_string(),
            room_stroke_color: "#000".to_string(),
            room_stroke_width: 2.0,
            label_font: "12px Arial".to_string(),
            label_color: "#000".to_string(),
            door_color: "#000".to_string(),
        }
    }
}

impl RenderOptions {
    pub fn with_cell_scale(mut self, cell_scale: f64) -> Self {
        self.cell_scale = cell_scale;
        self
    }

    /// Missing keys fall back to their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

/// Shared configuration for builders, renderers and views.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub render: RenderOptions,
    /// Optional structured logger used by every component built from this config.
    pub logger: Option<Logger>,
    /// Metrics accumulator shared across components.
    pub metrics: Option<Arc<Mutex<PlanMetrics>>>,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            logger: None,
            metrics: None,
            metrics_target: "floorplan::metrics".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_render(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(PlanMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<PlanMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }

    /// Log the current metrics snapshot, if both a logger and metrics exist.
    pub fn emit_metrics(&self) {
        if let (Some(logger), Some(metrics)) = (self.logger.as_ref(), self.metrics.as_ref()) {
            if let Ok(guard) = metrics.lock() {
                let event = guard.snapshot().to_log_event(&self.metrics_target);
                let _ = logger.log_event(event);
            }
        }
    }
}
