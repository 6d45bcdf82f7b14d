use std::f64::consts::TAU;
use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::Print;

use crate::render::{Point, Surface};
use crate::width::{display_width, visible_chars};

const BLANK: char = ' ';
/// Second half of a double-width glyph.
const CONTINUATION: char = '\0';
const GRID_GLYPH: char = '.';
const DOOR_GLYPH: char = '*';

/// Character-cell raster of a pixel surface, for terminals.
///
/// Each cell covers `px_per_col` by `px_per_row` pixels. Colors and fonts are
/// ignored; outlines use ASCII box glyphs.
#[derive(Debug, Clone)]
pub struct CellCanvas {
    px_per_col: f64,
    px_per_row: f64,
    origin: (u16, u16),
    cells: Vec<Vec<char>>,
}

impl Default for CellCanvas {
    fn default() -> Self {
        Self::new(5.0, 10.0)
    }
}

impl CellCanvas {
    pub fn new(px_per_col: f64, px_per_row: f64) -> Self {
        Self {
            px_per_col: px_per_col.max(1.0),
            px_per_row: px_per_row.max(1.0),
            origin: (0, 0),
            cells: Vec::new(),
        }
    }

    /// Terminal column/row where [`present`](Self::present) starts drawing.
    pub fn with_origin(mut self, col: u16, row: u16) -> Self {
        self.origin = (col, row);
        self
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn glyph(&self, col: usize, row: usize) -> Option<char> {
        self.cells.get(row).and_then(|line| line.get(col)).copied()
    }

    pub fn to_lines(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|line| line.iter().filter(|&&ch| ch != CONTINUATION).collect())
            .collect()
    }

    /// Queue every row at the configured origin and flush.
    pub fn present(&self, writer: &mut impl Write) -> io::Result<()> {
        let (col, row) = self.origin;
        for (offset, line) in self.to_lines().iter().enumerate() {
            queue!(
                writer,
                MoveTo(col, row.saturating_add(offset as u16)),
                Print(line)
            )?;
        }
        writer.flush()
    }

    fn cell_of(&self, point: Point) -> Option<(usize, usize)> {
        let col = (point.x / self.px_per_col).floor();
        let row = (point.y / self.px_per_row).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        (row < self.rows() && col < self.cols()).then_some((col, row))
    }

    fn put(&mut self, col: usize, row: usize, glyph: char) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|line| line.get_mut(col)) {
            *cell = glyph;
        }
    }

    fn plot(&mut self, point: Point, glyph: char) {
        if let Some((col, row)) = self.cell_of(point) {
            self.put(col, row, glyph);
        }
    }

    /// Inclusive cell span covered by a pixel rect, clamped to the canvas.
    fn span(&self, x: f64, y: f64, width: f64, height: f64) -> Option<(usize, usize, usize, usize)> {
        if self.cells.is_empty() {
            return None;
        }
        let max_col = self.cols() as f64 - 1.0;
        let max_row = self.rows() as f64 - 1.0;
        let left = (x / self.px_per_col).floor().clamp(0.0, max_col);
        let top = (y / self.px_per_row).floor().clamp(0.0, max_row);
        let right = (((x + width) / self.px_per_col).ceil() - 1.0).clamp(left, max_col);
        let bottom = (((y + height) / self.px_per_row).ceil() - 1.0).clamp(top, max_row);
        Some((left as usize, top as usize, right as usize, bottom as usize))
    }
}

impl Surface for CellCanvas {
    fn clear(&mut self, width: f64, height: f64) {
        let cols = (width.max(0.0) / self.px_per_col).ceil() as usize;
        let rows = (height.max(0.0) / self.px_per_row).ceil() as usize;
        self.cells = vec![vec![BLANK; cols]; rows];
    }

    fn line(&mut self, from: Point, to: Point, _color: &str, _width: f64) {
        let dx = (to.x - from.x) / self.px_per_col;
        let dy = (to.y - from.y) / self.px_per_row;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        for step in 0..=steps {
            let t = step as f64 / steps as f64;
            let point = Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
            if let Some((col, row)) = self.cell_of(point) {
                if self.cells[row][col] == BLANK {
                    self.put(col, row, GRID_GLYPH);
                }
            }
        }
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, _color: &str) {
        let Some((left, top, right, bottom)) = self.span(x, y, width, height) else {
            return;
        };
        for row in top..=bottom {
            for col in left..=right {
                self.put(col, row, BLANK);
            }
        }
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, _color: &str, _line_width: f64) {
        let Some((left, top, right, bottom)) = self.span(x, y, width, height) else {
            return;
        };
        for col in left..=right {
            self.put(col, top, '-');
            self.put(col, bottom, '-');
        }
        for row in top..=bottom {
            self.put(left, row, '|');
            self.put(right, row, '|');
        }
        for (col, row) in [(left, top), (right, top), (left, bottom), (right, bottom)] {
            self.put(col, row, '+');
        }
    }

    fn text_centered(&mut self, at: Point, text: &str, _font: &str, _color: &str) {
        let Some((center_col, row)) = self.cell_of(at) else {
            return;
        };
        let mut col = center_col.saturating_sub(display_width(text) / 2);
        for (ch, width) in visible_chars(text) {
            if col + width > self.cols() {
                break;
            }
            self.put(col, row, ch);
            if width == 2 {
                self.put(col + 1, row, CONTINUATION);
            }
            col += width;
        }
    }

    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64, _color: &str) {
        let mut sweep = end_angle - start_angle;
        if sweep <= 0.0 {
            sweep += TAU;
        }
        let samples = 8;
        for step in 0..=samples {
            let theta = start_angle + sweep * step as f64 / samples as f64;
            let point = Point::new(center.x + radius * theta.cos(), center.y + radius * theta.sin());
            self.plot(point, DOOR_GLYPH);
        }
        self.plot(center, DOOR_GLYPH);
    }
}
