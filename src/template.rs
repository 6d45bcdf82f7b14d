//! The fixed seven-room house used when no resolver supplies a request.

use crate::error::LayoutError;
use crate::layout::{LayoutRequest, RoomSpec, build_floor_plan};
use crate::plan::{FloorPlan, RoomType};

pub const LIVING_ROOM: &str = "Living Room";
pub const DINING_AREA: &str = "Dining Area";
pub const KITCHEN: &str = "Kitchen";
pub const BEDROOM_1: &str = "Bedroom 1";
pub const BEDROOM_2: &str = "Bedroom 2";
pub const BATHROOM_1: &str = "Bathroom 1";
pub const BATHROOM_2: &str = "Bathroom 2";

/// 20x10 grid, seven anchored rooms, six doors.
pub fn reference_request() -> LayoutRequest {
    LayoutRequest::new(20, 10)
        .with_room(
            RoomSpec::new(RoomType::LivingRoom, LIVING_ROOM, 6.0, 5.0)
                .anchored_at(7.0, 0.0)
                .adjacent_to(BEDROOM_1)
                .adjacent_to(BEDROOM_2)
                .adjacent_to(DINING_AREA),
        )
        .with_room(
            RoomSpec::new(RoomType::DiningArea, DINING_AREA, 4.0, 3.0)
                .anchored_at(7.0, 5.0)
                .adjacent_to(KITCHEN),
        )
        .with_room(RoomSpec::new(RoomType::Kitchen, KITCHEN, 3.0, 3.0).anchored_at(11.0, 5.0))
        .with_room(
            RoomSpec::new(RoomType::Bedroom, BEDROOM_1, 7.0, 5.0)
                .anchored_at(0.0, 0.0)
                .adjacent_to(BATHROOM_1),
        )
        .with_room(
            RoomSpec::new(RoomType::Bedroom, BEDROOM_2, 7.0, 5.0)
                .anchored_at(13.0, 0.0)
                .adjacent_to(BATHROOM_2),
        )
        .with_room(RoomSpec::new(RoomType::Bathroom, BATHROOM_1, 4.0, 2.0).anchored_at(0.0, 5.0))
        .with_room(RoomSpec::new(RoomType::Bathroom, BATHROOM_2, 3.0, 2.0).anchored_at(14.0, 5.0))
}

pub fn reference_plan() -> Result<FloorPlan, LayoutError> {
    build_floor_plan(&reference_request()).map(|outcome| outcome.plan)
}
