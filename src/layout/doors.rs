use std::collections::{BTreeSet, HashMap};

use crate::error::LayoutWarning;
use crate::geometry::{EPSILON, Position, Rect};
use crate::layout::RoomSpec;
use crate::plan::{Door, DoorDirection, Room};

/// Midpoint and orientation of the wall segment two rectangles share.
///
/// Returns `None` when the rectangles only meet at a corner or not at all.
pub fn shared_wall(a: &Rect, b: &Rect) -> Option<(Position, DoorDirection)> {
    a.shared_edge(b, EPSILON)
        .map(|edge| (edge.midpoint(), DoorDirection::along(&edge)))
}

/// Turn adjacency hints into doors. Each unordered pair yields at most one door.
pub(crate) fn resolve_doors(rooms: &[Room], specs: &[RoomSpec]) -> (Vec<Door>, Vec<LayoutWarning>) {
    let index: HashMap<&str, usize> = rooms
        .iter()
        .enumerate()
        .map(|(idx, room)| (room.label.as_str(), idx))
        .collect();

    let mut doors = Vec::new();
    let mut warnings = Vec::new();
    let mut seen = BTreeSet::new();

    for (from_idx, spec) in specs.iter().enumerate() {
        for hint in &spec.adjacent {
            if *hint == spec.label {
                warnings.push(LayoutWarning::SelfAdjacency {
                    label: spec.label.clone(),
                });
                continue;
            }
            let Some(&to_idx) = index.get(hint.as_str()) else {
                warnings.push(LayoutWarning::DanglingReference {
                    from: spec.label.clone(),
                    to: hint.clone(),
                });
                continue;
            };
            if !seen.insert((from_idx.min(to_idx), from_idx.max(to_idx))) {
                continue;
            }

            match shared_wall(&rooms[from_idx].rect(), &rooms[to_idx].rect()) {
                Some((position, direction)) => doors.push(Door {
                    from: spec.label.clone(),
                    to: hint.clone(),
                    position,
                    direction,
                }),
                None => warnings.push(LayoutWarning::NoSharedBoundary {
                    from: spec.label.clone(),
                    to: hint.clone(),
                }),
            }
        }
    }

    (doors, warnings)
}
