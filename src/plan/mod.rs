//! Floor plan value types.
//!
//! A [`FloorPlan`] owns its rooms and doors. Doors refer to rooms by label and
//! are resolved through the plan's label index.

mod core;

pub use core::{Door, DoorDirection, FloorPlan, Room, RoomType};
