//! Parametric floor plans: pack labelled rooms into a grid, place doors on
//! shared walls, and render the result as a replayable draw-op sequence.
//!
//! The pipeline is `LayoutResolver -> LayoutBuilder -> FloorPlan ->
//! PlanRenderer -> Surface`. Each stage is synchronous and pure apart from
//! optional structured logging and metrics.

pub mod analysis;
pub mod config;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod plan;
pub mod render;
pub mod resolver;
pub mod template;
pub mod view;
pub mod width;

#[cfg(test)]
mod properties;

pub use analysis::{Analysis, AnalysisPayload, FinancialProfile, RequestTicket, ResponseGate};
pub use config::{EngineConfig, RenderOptions};
pub use error::{ConfigError, Error, LayoutError, LayoutWarning, RenderError, Result};
pub use geometry::{Dimensions, Position, Rect, Size};
pub use layout::{LayoutBuilder, LayoutOutcome, LayoutRequest, RoomSpec, build_floor_plan, shared_wall};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult, MemorySink,
    NullSink,
};
pub use metrics::{MetricSnapshot, PlanMetrics};
pub use plan::{Door, DoorDirection, FloorPlan, Room, RoomType};
pub use render::{
    CellCanvas, DrawLog, DrawOp, PlanRenderer, Point, RenderContext, Surface, SurfaceSize,
};
pub use resolver::{JsonResolver, LayoutResolver, TemplateResolver};
pub use template::{reference_plan, reference_request};
pub use view::{PlanView, ViewUpdate};
