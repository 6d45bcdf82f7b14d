//! Render module orchestrator.
//!
//! [`PlanRenderer`] turns a plan into [`DrawOp`]s; any [`Surface`] can replay
//! them. [`DrawLog`] records, [`CellCanvas`] rasterises into terminal cells.

mod cells;
mod core;
mod ops;

pub use cells::CellCanvas;
pub use core::{
    HORIZONTAL_DOOR_ARC, MAX_GRID_LINES, PlanRenderer, RenderContext, SurfaceSize, VERTICAL_DOOR_ARC,
};
pub use ops::{DrawLog, DrawOp, Point, Surface, recover_rooms};
