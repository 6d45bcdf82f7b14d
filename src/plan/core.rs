use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::geometry::{Dimensions, Position, Rect, Segment, Size};

/// Doors loaded from outside the builder may sit up to half a grid unit off
/// the wall the two rooms share.
const DOOR_TOLERANCE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoomType {
    LivingRoom,
    DiningArea,
    Kitchen,
    Bedroom,
    Bathroom,
    Hallway,
    Office,
    Laundry,
    Storage,
    Garage,
    Other,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::LivingRoom => "livingRoom",
            RoomType::DiningArea => "diningArea",
            RoomType::Kitchen => "kitchen",
            RoomType::Bedroom => "bedroom",
            RoomType::Bathroom => "bathroom",
            RoomType::Hallway => "hallway",
            RoomType::Office => "office",
            RoomType::Laundry => "laundry",
            RoomType::Storage => "storage",
            RoomType::Garage => "garage",
            RoomType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub label: String,
    pub position: Position,
    pub size: Size,
}

impl Room {
    pub fn new(room_type: RoomType, label: impl Into<String>, position: Position, size: Size) -> Self {
        Self {
            room_type,
            label: label.into(),
            position,
            size,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }
}

/// Which wall orientation a door sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DoorDirection {
    /// Door in a horizontal wall (rooms stacked vertically).
    Horizontal,
    /// Door in a vertical wall (rooms side by side).
    Vertical,
}

impl DoorDirection {
    /// Orientation of a door placed in `wall`.
    pub fn along(wall: &Segment) -> Self {
        if wall.is_vertical() {
            DoorDirection::Vertical
        } else {
            DoorDirection::Horizontal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub from: String,
    pub to: String,
    pub position: Position,
    pub direction: DoorDirection,
}

impl Door {
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}

/// Wire form of a plan; every decode goes through [`FloorPlan::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PlanData {
    dimensions: Dimensions,
    rooms: Vec<Room>,
    #[serde(default)]
    doors: Vec<Door>,
}

/// A validated, immutable floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PlanData", into = "PlanData")]
pub struct FloorPlan {
    dimensions: Dimensions,
    rooms: Vec<Room>,
    doors: Vec<Door>,
    index: BTreeMap<String, usize>,
}

impl FloorPlan {
    /// Validate containment, label uniqueness, non-overlap and door references.
    pub fn new(
        dimensions: Dimensions,
        rooms: Vec<Room>,
        doors: Vec<Door>,
    ) -> Result<Self, LayoutError> {
        if dimensions.is_empty() {
            return Err(LayoutError::InvalidDimensions {
                width: dimensions.width,
                height: dimensions.height,
            });
        }

        let mut index = BTreeMap::new();
        for (idx, room) in rooms.iter().enumerate() {
            if room.label.is_empty() {
                return Err(LayoutError::EmptyLabel);
            }
            if !room.size.is_valid() {
                return Err(LayoutError::InvalidRoomSize {
                    label: room.label.clone(),
                });
            }
            if !room.rect().fits_within(dimensions) {
                return Err(LayoutError::RoomOutOfBounds {
                    label: room.label.clone(),
                });
            }
            if index.insert(room.label.clone(), idx).is_some() {
                return Err(LayoutError::DuplicateLabel(room.label.clone()));
            }
        }

        for (i, first) in rooms.iter().enumerate() {
            for second in &rooms[i + 1..] {
                if first.rect().intersects(&second.rect()) {
                    return Err(LayoutError::RoomOverlap {
                        first: first.label.clone(),
                        second: second.label.clone(),
                    });
                }
            }
        }

        let plan = Self {
            dimensions,
            rooms,
            doors,
            index,
        };

        for door in &plan.doors {
            let (from, to) = plan.door_endpoints(door)?;
            let on_wall = from
                .rect()
                .shared_edge(&to.rect(), DOOR_TOLERANCE)
                .is_some_and(|wall| {
                    DoorDirection::along(&wall) == door.direction
                        && wall.distance_to(door.position) <= DOOR_TOLERANCE
                });
            if !on_wall {
                return Err(LayoutError::DoorOffBoundary {
                    from: door.from.clone(),
                    to: door.to.clone(),
                });
            }
        }

        Ok(plan)
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Rooms in rendering order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Doors in rendering order.
    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    pub fn room(&self, label: &str) -> Option<&Room> {
        self.index.get(label).map(|&idx| &self.rooms[idx])
    }

    /// Resolve a door's weak references to the rooms they name.
    pub fn door_endpoints(&self, door: &Door) -> Result<(&Room, &Room), LayoutError> {
        if door.from == door.to {
            return Err(LayoutError::SelfAdjacency {
                label: door.from.clone(),
            });
        }
        match (self.room(&door.from), self.room(&door.to)) {
            (Some(from), Some(to)) => Ok((from, to)),
            _ => Err(LayoutError::DanglingReference {
                from: door.from.clone(),
                to: door.to.clone(),
            }),
        }
    }

    pub fn doors_of<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Door> + 'a {
        self.doors
            .iter()
            .filter(move |door| door.from == label || door.to == label)
    }

    /// Content hash over dimensions, rooms and doors in order.
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.dimensions.width.to_le_bytes());
        hasher.update(&self.dimensions.height.to_le_bytes());
        for room in &self.rooms {
            hasher.update(room.room_type.as_str().as_bytes());
            hash_str(&mut hasher, &room.label);
            hash_f64s(
                &mut hasher,
                &[room.position.x, room.position.y, room.size.width, room.size.height],
            );
        }
        for door in &self.doors {
            hash_str(&mut hasher, &door.from);
            hash_str(&mut hasher, &door.to);
            hash_f64s(&mut hasher, &[door.position.x, door.position.y]);
            hasher.update(&[matches!(door.direction, DoorDirection::Vertical) as u8]);
        }
        hasher.finalize()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

fn hash_str(hasher: &mut blake3::Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

fn hash_f64s(hasher: &mut blake3::Hasher, values: &[f64]) {
    for value in values {
        hasher.update(&value.to_bits().to_le_bytes());
    }
}

impl TryFrom<PlanData> for FloorPlan {
    type Error = LayoutError;

    fn try_from(data: PlanData) -> Result<Self, Self::Error> {
        FloorPlan::new(data.dimensions, data.rooms, data.doors)
    }
}

impl From<FloorPlan> for PlanData {
    fn from(plan: FloorPlan) -> Self {
        PlanData {
            dimensions: plan.dimensions,
            rooms: plan.rooms,
            doors: plan.doors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_rooms() -> Vec<Room> {
        vec![
            Room::new(
                RoomType::Bedroom,
                "Bedroom",
                Position::new(0.0, 0.0),
                Size::new(4.0, 3.0),
            ),
            Room::new(
                RoomType::Bathroom,
                "Bathroom",
                Position::new(4.0, 0.0),
                Size::new(2.0, 3.0),
            ),
        ]
    }

    fn door() -> Door {
        Door {
            from: "Bedroom".into(),
            to: "Bathroom".into(),
            position: Position::new(4.0, 1.5),
            direction: DoorDirection::Vertical,
        }
    }

    #[test]
    fn lookup_by_label_uses_index() {
        let plan = FloorPlan::new(Dimensions::new(6, 3), two_rooms(), vec![door()]).unwrap();
        assert_eq!(plan.room("Bathroom").unwrap().position.x, 4.0);
        assert!(plan.room("Garage").is_none());
        let (from, to) = plan.door_endpoints(&plan.doors()[0]).unwrap();
        assert_eq!((from.label.as_str(), to.label.as_str()), ("Bedroom", "Bathroom"));
        assert_eq!(plan.doors_of("Bathroom").count(), 1);
    }

    #[test]
    fn rejects_duplicate_labels() {
        let mut rooms = two_rooms();
        rooms[1].label = "Bedroom".into();
        let err = FloorPlan::new(Dimensions::new(6, 3), rooms, Vec::new()).unwrap_err();
        assert_eq!(err, LayoutError::DuplicateLabel("Bedroom".into()));
    }

    #[test]
    fn rejects_overlap_and_out_of_bounds() {
        let mut rooms = two_rooms();
        rooms[1].position.x = 3.0;
        let err = FloorPlan::new(Dimensions::new(6, 3), rooms, Vec::new()).unwrap_err();
        assert!(matches!(err, LayoutError::RoomOverlap { .. }));

        let err = FloorPlan::new(Dimensions::new(5, 3), two_rooms(), Vec::new()).unwrap_err();
        assert_eq!(
            err,
            LayoutError::RoomOutOfBounds {
                label: "Bathroom".into()
            }
        );
    }

    #[test]
    fn rejects_dangling_and_misplaced_doors() {
        let mut dangling = door();
        dangling.to = "Garage".into();
        let err = FloorPlan::new(Dimensions::new(6, 3), two_rooms(), vec![dangling]).unwrap_err();
        assert!(matches!(err, LayoutError::DanglingReference { .. }));

        let mut off_wall = door();
        off_wall.position = Position::new(2.0, 1.5);
        let err = FloorPlan::new(Dimensions::new(6, 3), two_rooms(), vec![off_wall]).unwrap_err();
        assert!(matches!(err, LayoutError::DoorOffBoundary { .. }));
    }

    fn pair(second: Position) -> Vec<Room> {
        vec![
            Room::new(RoomType::Bedroom, "A", Position::new(0.0, 0.0), Size::new(2.0, 2.0)),
            Room::new(RoomType::Bedroom, "B", second, Size::new(2.0, 2.0)),
        ]
    }

    fn door_between(x: f64, y: f64, direction: DoorDirection) -> Door {
        Door {
            from: "A".into(),
            to: "B".into(),
            position: Position::new(x, y),
            direction,
        }
    }

    #[test]
    fn door_must_sit_on_the_shared_wall() {
        let dims = Dimensions::new(6, 6);

        let separated = FloorPlan::new(
            dims,
            pair(Position::new(3.0, 0.0)),
            vec![door_between(2.5, 1.0, DoorDirection::Horizontal)],
        );
        assert!(matches!(separated, Err(LayoutError::DoorOffBoundary { .. })));
        let separated = FloorPlan::new(
            dims,
            pair(Position::new(3.0, 0.0)),
            vec![door_between(2.5, 1.0, DoorDirection::Vertical)],
        );
        assert!(matches!(separated, Err(LayoutError::DoorOffBoundary { .. })));

        let corner = FloorPlan::new(
            dims,
            pair(Position::new(2.0, 2.0)),
            vec![door_between(2.0, 2.0, DoorDirection::Vertical)],
        );
        assert!(matches!(corner, Err(LayoutError::DoorOffBoundary { .. })));

        let mut sideways = door();
        sideways.direction = DoorDirection::Horizontal;
        let err = FloorPlan::new(Dimensions::new(6, 3), two_rooms(), vec![sideways]).unwrap_err();
        assert!(matches!(err, LayoutError::DoorOffBoundary { .. }));
    }

    #[test]
    fn door_may_sit_within_half_a_unit_of_the_wall() {
        let mut nudged = door();
        nudged.position = Position::new(4.3, 1.5);
        assert!(FloorPlan::new(Dimensions::new(6, 3), two_rooms(), vec![nudged]).is_ok());

        let mut past_end = door();
        past_end.position = Position::new(4.0, 3.4);
        assert!(FloorPlan::new(Dimensions::new(6, 3), two_rooms(), vec![past_end]).is_ok());

        let mut far = door();
        far.position = Position::new(4.0, 4.0);
        assert!(FloorPlan::new(Dimensions::new(6, 3), two_rooms(), vec![far]).is_err());
    }

    #[test]
    fn json_decode_rejects_door_between_separated_rooms() {
        let raw = r#"{
            "dimensions": {"width": 6, "height": 6},
            "rooms": [
                {"type": "bedroom", "label": "A", "position": {"x": 0, "y": 0}, "size": {"width": 2, "height": 2}},
                {"type": "bedroom", "label": "B", "position": {"x": 3, "y": 0}, "size": {"width": 2, "height": 2}}
            ],
            "doors": [
                {"from": "A", "to": "B", "position": {"x": 2.5, "y": 1}, "direction": "horizontal"}
            ]
        }"#;
        assert!(FloorPlan::from_json_str(raw).is_err());
    }

    #[test]
    fn json_decode_runs_validation() {
        let plan = FloorPlan::new(Dimensions::new(6, 3), two_rooms(), vec![door()]).unwrap();
        let json = plan.to_json_pretty().unwrap();
        assert!(json.contains("\"type\": \"bedroom\""));
        let decoded = FloorPlan::from_json_str(&json).unwrap();
        assert_eq!(decoded, plan);
        assert_eq!(decoded.fingerprint(), plan.fingerprint());

        let broken = json.replace("\"width\": 6", "\"width\": 5");
        assert!(FloorPlan::from_json_str(&broken).is_err());
    }

    #[test]
    fn fingerprint_tracks_content() {
        let plan = FloorPlan::new(Dimensions::new(6, 3), two_rooms(), vec![door()]).unwrap();
        let without_door = FloorPlan::new(Dimensions::new(6, 3), two_rooms(), Vec::new()).unwrap();
        assert_ne!(plan.fingerprint(), without_door.fingerprint());
    }
}
