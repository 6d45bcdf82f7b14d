use serde::Serialize;

use crate::geometry::Rect;
use crate::render::RenderContext;

/// Absolute surface coordinate in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One primitive drawing instruction in surface pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    Clear {
        width: f64,
        height: f64,
    },
    Line {
        from: Point,
        to: Point,
        color: String,
        width: f64,
    },
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: String,
    },
    StrokeRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: String,
        line_width: f64,
    },
    /// Text centered both ways on `at`.
    Text {
        at: Point,
        text: String,
        font: String,
        color: String,
    },
    /// Clockwise arc from `start_angle` to `end_angle`, radians, y axis down.
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        color: String,
    },
}

impl DrawOp {
    pub fn kind(&self) -> &'static str {
        match self {
            DrawOp::Clear { .. } => "clear",
            DrawOp::Line { .. } => "line",
            DrawOp::FillRect { .. } => "fillRect",
            DrawOp::StrokeRect { .. } => "strokeRect",
            DrawOp::Text { .. } => "text",
            DrawOp::Arc { .. } => "arc",
        }
    }

    pub fn apply<S: Surface + ?Sized>(&self, surface: &mut S) {
        match self {
            DrawOp::Clear { width, height } => surface.clear(*width, *height),
            DrawOp::Line {
                from,
                to,
                color,
                width,
            } => surface.line(*from, *to, color, *width),
            DrawOp::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => surface.fill_rect(*x, *y, *width, *height, color),
            DrawOp::StrokeRect {
                x,
                y,
                width,
                height,
                color,
                line_width,
            } => surface.stroke_rect(*x, *y, *width, *height, color, *line_width),
            DrawOp::Text {
                at,
                text,
                font,
                color,
            } => surface.text_centered(*at, text, font, color),
            DrawOp::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                color,
            } => surface.arc(*center, *radius, *start_angle, *end_angle, color),
        }
    }
}

/// The primitives a drawing target must support.
pub trait Surface {
    /// Wipe everything and (re)size the drawable area.
    fn clear(&mut self, width: f64, height: f64);
    fn line(&mut self, from: Point, to: Point, color: &str, width: f64);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str);
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str, line_width: f64);
    fn text_centered(&mut self, at: Point, text: &str, font: &str, color: &str);
    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64, color: &str);
}

/// Surface that records operations. `clear` drops everything recorded before it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawLog {
    ops: Vec<DrawOp>,
}

impl DrawLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.ops)
    }
}

impl Surface for DrawLog {
    fn clear(&mut self, width: f64, height: f64) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear { width, height });
    }

    fn line(&mut self, from: Point, to: Point, color: &str, width: f64) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            color: color.to_string(),
            width,
        });
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) {
        self.ops.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color: color.to_string(),
        });
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str, line_width: f64) {
        self.ops.push(DrawOp::StrokeRect {
            x,
            y,
            width,
            height,
            color: color.to_string(),
            line_width,
        });
    }

    fn text_centered(&mut self, at: Point, text: &str, font: &str, color: &str) {
        self.ops.push(DrawOp::Text {
            at,
            text: text.to_string(),
            font: font.to_string(),
            color: color.to_string(),
        });
    }

    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64, color: &str) {
        self.ops.push(DrawOp::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            color: color.to_string(),
        });
    }
}

/// Room rectangles in grid units, recovered from the filled rects of a render.
pub fn recover_rooms(ops: &[DrawOp], ctx: &RenderContext) -> Vec<Rect> {
    ops.iter()
        .filter_map(|op| match op {
            DrawOp::FillRect {
                x,
                y,
                width,
                height,
                ..
            } => Some(ctx.to_grid_rect(*x, *y, *width, *height)),
            _ => None,
        })
        .collect()
}
