//! Layout module orchestrator.
//!
//! Callers import the builder and request types from here; placement and door
//! resolution live in private submodules.

mod core;
mod doors;
mod request;

pub use core::{LayoutBuilder, LayoutOutcome, build_floor_plan};
pub use doors::shared_wall;
pub use request::{LayoutRequest, RoomSpec};
