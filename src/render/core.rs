use std::f64::consts::{FRAC_PI_2, PI};
use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::config::{EngineConfig, RenderOptions};
use crate::error::RenderError;
use crate::geometry::{Dimensions, Position, Rect};
use crate::logging::{LogLevel, Logger, emit, json_kv, json_str};
use crate::metrics::PlanMetrics;
use crate::plan::{DoorDirection, FloorPlan};
use crate::render::{DrawOp, Point, Surface};

const LOG_TARGET: &str = "floorplan::render";

/// Arc span for doors in horizontal walls.
pub const HORIZONTAL_DOOR_ARC: (f64, f64) = (PI, 2.0 * PI);
/// Arc span for doors in vertical walls; the sweep wraps through zero.
pub const VERTICAL_DOOR_ARC: (f64, f64) = (3.0 * FRAC_PI_2, FRAC_PI_2);

/// Upper bound on `width + height + 2` grid lines in one render.
pub const MAX_GRID_LINES: u64 = 1 << 16;

/// Drawable area in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

impl SurfaceSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Per-render transform from grid units to surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub surface_width: f64,
    pub surface_height: f64,
}

impl RenderContext {
    /// Center a `dimensions`-sized plan on `surface` at a fixed cell scale.
    pub fn new(
        dimensions: Dimensions,
        surface: SurfaceSize,
        cell_scale: f64,
    ) -> Result<Self, RenderError> {
        if !surface.is_drawable() {
            return Err(RenderError::InvalidSurface {
                width: surface.width,
                height: surface.height,
            });
        }
        if dimensions.is_empty() {
            return Err(RenderError::EmptyPlan);
        }
        if grid_line_count(dimensions) > MAX_GRID_LINES {
            return Err(RenderError::GridTooLarge {
                width: dimensions.width,
                height: dimensions.height,
                limit: MAX_GRID_LINES,
            });
        }
        if !cell_scale.is_finite() || cell_scale <= 0.0 {
            return Err(RenderError::InvalidScale(cell_scale));
        }

        Ok(Self {
            scale: cell_scale,
            offset_x: (surface.width - dimensions.width as f64 * cell_scale) / 2.0,
            offset_y: (surface.height - dimensions.height as f64 * cell_scale) / 2.0,
            surface_width: surface.width,
            surface_height: surface.height,
        })
    }

    pub fn to_surface(&self, position: Position) -> Point {
        Point::new(
            self.offset_x + position.x * self.scale,
            self.offset_y + position.y * self.scale,
        )
    }

    pub fn to_grid(&self, point: Point) -> Position {
        Position::new(
            (point.x - self.offset_x) / self.scale,
            (point.y - self.offset_y) / self.scale,
        )
    }

    pub fn to_grid_rect(&self, x: f64, y: f64, width: f64, height: f64) -> Rect {
        let origin = self.to_grid(Point::new(x, y));
        Rect::new(origin.x, origin.y, width / self.scale, height / self.scale)
    }
}

fn grid_line_count(dimensions: Dimensions) -> u64 {
    u64::from(dimensions.width) + u64::from(dimensions.height) + 2
}

/// Turns a [`FloorPlan`] into an ordered list of draw operations.
#[derive(Debug, Clone)]
pub struct PlanRenderer {
    options: RenderOptions,
    logger: Option<Logger>,
    metrics: Option<Arc<Mutex<PlanMetrics>>>,
}

impl Default for PlanRenderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl PlanRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            logger: None,
            metrics: None,
        }
    }

    pub fn with_default() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            options: config.render.clone(),
            logger: config.logger.clone(),
            metrics: config.metrics_handle(),
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn context(&self, plan: &FloorPlan, surface: SurfaceSize) -> Result<RenderContext, RenderError> {
        RenderContext::new(plan.dimensions(), surface, self.options.cell_scale)
    }

    /// Produce the full operation list, or an error and no operations.
    ///
    /// Order: clear, vertical grid lines, horizontal grid lines, then fill,
    /// outline and label per room, then one arc per door.
    pub fn render(&self, plan: &FloorPlan, surface: SurfaceSize) -> Result<Vec<DrawOp>, RenderError> {
        let ctx = match self.context(plan, surface) {
            Ok(ctx) => ctx,
            Err(err) => {
                self.record(PlanMetrics::record_render_failure);
                emit(
                    self.logger.as_ref(),
                    LogLevel::Warn,
                    LOG_TARGET,
                    "render_failed",
                    [json_str("error", err.to_string())],
                );
                return Err(err);
            }
        };

        let dims = plan.dimensions();
        let opts = &self.options;
        let mut ops = Vec::with_capacity(
            1 + grid_line_count(dims) as usize + plan.rooms().len() * 3 + plan.doors().len(),
        );

        ops.push(DrawOp::Clear {
            width: surface.width,
            height: surface.height,
        });

        let (w, h) = (dims.width as f64, dims.height as f64);
        for i in 0..=dims.width {
            let x = i as f64;
            ops.push(DrawOp::Line {
                from: ctx.to_surface(Position::new(x, 0.0)),
                to: ctx.to_surface(Position::new(x, h)),
                color: opts.grid_line_color.clone(),
                width: opts.grid_line_width,
            });
        }
        for j in 0..=dims.height {
            let y = j as f64;
            ops.push(DrawOp::Line {
                from: ctx.to_surface(Position::new(0.0, y)),
                to: ctx.to_surface(Position::new(w, y)),
                color: opts.grid_line_color.clone(),
                width: opts.grid_line_width,
            });
        }

        for room in plan.rooms() {
            let origin = ctx.to_surface(room.position);
            let width = room.size.width * ctx.scale;
            let height = room.size.height * ctx.scale;
            ops.push(DrawOp::FillRect {
                x: origin.x,
                y: origin.y,
                width,
                height,
                color: opts.room_fill_color.clone(),
            });
            ops.push(DrawOp::StrokeRect {
                x: origin.x,
                y: origin.y,
                width,
                height,
                color: opts.room_stroke_color.clone(),
                line_width: opts.room_stroke_width,
            });
            ops.push(DrawOp::Text {
                at: ctx.to_surface(room.rect().center()),
                text: room.label.clone(),
                font: opts.label_font.clone(),
                color: opts.label_color.clone(),
            });
        }

        for door in plan.doors() {
            let (start_angle, end_angle) = match door.direction {
                DoorDirection::Horizontal => HORIZONTAL_DOOR_ARC,
                DoorDirection::Vertical => VERTICAL_DOOR_ARC,
            };
            ops.push(DrawOp::Arc {
                center: ctx.to_surface(door.position),
                radius: opts.door_arc_radius,
                start_angle,
                end_angle,
                color: opts.door_color.clone(),
            });
        }

        self.record(|metrics| metrics.record_render(ops.len()));
        emit(
            self.logger.as_ref(),
            LogLevel::Debug,
            LOG_TARGET,
            "plan_rendered",
            [
                json_kv("ops", json!(ops.len())),
                json_kv("scale", json!(ctx.scale)),
                json_kv("offset_x", json!(ctx.offset_x)),
                json_kv("offset_y", json!(ctx.offset_y)),
            ],
        );
        Ok(ops)
    }

    /// Render, then replay onto `target`. The target is untouched on error.
    pub fn render_into<S: Surface + ?Sized>(
        &self,
        plan: &FloorPlan,
        surface: SurfaceSize,
        target: &mut S,
    ) -> Result<usize, RenderError> {
        let ops = self.render(plan, surface)?;
        for op in &ops {
            op.apply(target);
        }
        Ok(ops.len())
    }

    fn record(&self, apply: impl FnOnce(&mut PlanMetrics)) {
        if let Some(metrics) = self.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                apply(&mut guard);
            }
        }
    }
}
