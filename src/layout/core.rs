use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::config::EngineConfig;
use crate::error::{LayoutError, LayoutWarning};
use crate::geometry::{Dimensions, EPSILON, Position, Rect};
use crate::layout::doors::resolve_doors;
use crate::layout::{LayoutRequest, RoomSpec};
use crate::logging::{LogLevel, Logger, emit, json_kv, json_str};
use crate::metrics::PlanMetrics;
use crate::plan::{FloorPlan, Room};

const LOG_TARGET: &str = "floorplan::layout";

/// A built plan plus the adjacency problems recovered along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOutcome {
    pub plan: FloorPlan,
    pub warnings: Vec<LayoutWarning>,
}

impl LayoutOutcome {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_plan(self) -> FloorPlan {
        self.plan
    }
}

/// Build a plan with no logging or metrics attached.
pub fn build_floor_plan(request: &LayoutRequest) -> Result<LayoutOutcome, LayoutError> {
    LayoutBuilder::new().build(request)
}

/// Packs rooms into a grid and resolves doors between neighbours.
#[derive(Debug, Clone, Default)]
pub struct LayoutBuilder {
    logger: Option<Logger>,
    metrics: Option<Arc<Mutex<PlanMetrics>>>,
}

impl LayoutBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            logger: config.logger.clone(),
            metrics: config.metrics_handle(),
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Mutex<PlanMetrics>>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Place every room, then resolve doors.
    ///
    /// Fails without a plan when the request is malformed or a room does not
    /// fit. Unresolvable adjacencies only produce warnings.
    pub fn build(&self, request: &LayoutRequest) -> Result<LayoutOutcome, LayoutError> {
        match self.build_inner(request) {
            Ok(outcome) => {
                self.record(|metrics| {
                    metrics.record_layout(outcome.plan.doors().len(), outcome.warnings.len())
                });
                for warning in &outcome.warnings {
                    emit(
                        self.logger.as_ref(),
                        LogLevel::Warn,
                        LOG_TARGET,
                        "door_skipped",
                        [json_str("reason", warning.to_string())],
                    );
                }
                emit(
                    self.logger.as_ref(),
                    LogLevel::Info,
                    LOG_TARGET,
                    "layout_built",
                    [
                        json_kv("rooms", json!(outcome.plan.rooms().len())),
                        json_kv("doors", json!(outcome.plan.doors().len())),
                        json_kv("warnings", json!(outcome.warnings.len())),
                    ],
                );
                Ok(outcome)
            }
            Err(err) => {
                self.record(PlanMetrics::record_layout_failure);
                emit(
                    self.logger.as_ref(),
                    LogLevel::Error,
                    LOG_TARGET,
                    "layout_failed",
                    [json_str("error", err.to_string())],
                );
                Err(err)
            }
        }
    }

    fn build_inner(&self, request: &LayoutRequest) -> Result<LayoutOutcome, LayoutError> {
        validate(request)?;
        let rects = place_rooms(request)?;
        let rooms: Vec<Room> = request
            .rooms
            .iter()
            .zip(rects)
            .map(|(spec, rect)| {
                Room::new(
                    spec.room_type,
                    spec.label.clone(),
                    Position::new(rect.x, rect.y),
                    spec.size,
                )
            })
            .collect();
        let (doors, warnings) = resolve_doors(&rooms, &request.rooms);
        let plan = FloorPlan::new(request.dimensions, rooms, doors)?;
        Ok(LayoutOutcome { plan, warnings })
    }

    fn record(&self, apply: impl FnOnce(&mut PlanMetrics)) {
        if let Some(metrics) = self.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                apply(&mut guard);
            }
        }
    }
}

fn validate(request: &LayoutRequest) -> Result<(), LayoutError> {
    let dims = request.dimensions;
    if dims.is_empty() {
        return Err(LayoutError::InvalidDimensions {
            width: dims.width,
            height: dims.height,
        });
    }

    let mut labels = HashSet::new();
    for spec in &request.rooms {
        if spec.label.is_empty() {
            return Err(LayoutError::EmptyLabel);
        }
        if !labels.insert(spec.label.as_str()) {
            return Err(LayoutError::DuplicateLabel(spec.label.clone()));
        }
        if !spec.size.is_valid() {
            return Err(LayoutError::InvalidRoomSize {
                label: spec.label.clone(),
            });
        }
    }
    Ok(())
}

/// Resolve a rectangle per room, in request order.
fn place_rooms(request: &LayoutRequest) -> Result<Vec<Rect>, LayoutError> {
    let dims = request.dimensions;
    let specs = &request.rooms;
    let neighbours = neighbour_sets(specs);
    let mut placed: Vec<Option<Rect>> = vec![None; specs.len()];

    for (idx, spec) in specs.iter().enumerate() {
        let Some(anchor) = spec.anchor else {
            continue;
        };
        let rect = Rect::from_parts(anchor, spec.size);
        if !rect.fits_within(dims) {
            return Err(LayoutError::LayoutOverflow {
                label: spec.label.clone(),
            });
        }
        if let Some(other) = placed
            .iter()
            .enumerate()
            .find_map(|(other, slot)| slot.filter(|r| r.intersects(&rect)).map(|_| other))
        {
            return Err(LayoutError::AnchorOverlap {
                label: spec.label.clone(),
                other: specs[other].label.clone(),
            });
        }
        placed[idx] = Some(rect);
    }

    for (idx, spec) in specs.iter().enumerate() {
        if placed[idx].is_some() {
            continue;
        }
        let rect = best_slot(dims, spec, &placed, &neighbours[idx]).ok_or_else(|| {
            LayoutError::LayoutOverflow {
                label: spec.label.clone(),
            }
        })?;
        placed[idx] = Some(rect);
    }

    Ok(placed.into_iter().flatten().collect())
}

/// Indices each room has an adjacency relation with, in either direction.
fn neighbour_sets(specs: &[RoomSpec]) -> Vec<BTreeSet<usize>> {
    let mut sets = vec![BTreeSet::new(); specs.len()];
    for (idx, spec) in specs.iter().enumerate() {
        for hint in &spec.adjacent {
            if let Some(other) = specs.iter().position(|s| s.label == *hint) {
                if other != idx {
                    sets[idx].insert(other);
                    sets[other].insert(idx);
                }
            }
        }
    }
    sets
}

#[derive(Debug, Clone, Copy)]
struct SlotScore {
    unused_area: f64,
    neighbour_distance: f64,
}

impl SlotScore {
    fn beats(&self, other: &SlotScore) -> bool {
        if self.unused_area < other.unused_area - EPSILON {
            return true;
        }
        (self.unused_area - other.unused_area).abs() <= EPSILON
            && self.neighbour_distance < other.neighbour_distance - EPSILON
    }
}

/// Scan candidate corners top-to-bottom, left-to-right and keep the best.
/// Work grows with the number of placed rooms, not with the plan area.
/// Earlier candidates win ties.
fn best_slot(
    dims: Dimensions,
    spec: &RoomSpec,
    placed: &[Option<Rect>],
    neighbours: &BTreeSet<usize>,
) -> Option<Rect> {
    if spec.size.width > dims.width as f64 + EPSILON || spec.size.height > dims.height as f64 + EPSILON
    {
        return None;
    }

    let occupied: Vec<Rect> = placed.iter().flatten().copied().collect();
    let used_area: f64 = occupied.iter().map(Rect::area).sum();
    let bounds = occupied.iter().copied().reduce(|acc, r| acc.union(&r));

    let xs = candidate_axis(
        dims.width,
        spec.size.width,
        occupied.iter().flat_map(|r| [r.x, r.right()]),
    );
    let ys = candidate_axis(
        dims.height,
        spec.size.height,
        occupied.iter().flat_map(|r| [r.y, r.bottom()]),
    );

    let mut best: Option<(Rect, SlotScore)> = None;
    for &y in &ys {
        for &x in &xs {
            let rect = Rect::new(x, y, spec.size.width, spec.size.height);
            if !rect.fits_within(dims) || occupied.iter().any(|r| r.intersects(&rect)) {
                continue;
            }

            let bbox = bounds.map_or(rect, |b| b.union(&rect));
            let score = SlotScore {
                unused_area: bbox.area() - used_area - rect.area(),
                neighbour_distance: neighbours
                    .iter()
                    .filter_map(|&n| placed[n])
                    .map(|n| rect.gap_distance(&n))
                    .sum(),
            };

            match &best {
                Some((_, current)) if !score.beats(current) => {}
                _ => best = Some((rect, score)),
            }
        }
    }

    best.map(|(rect, _)| rect)
}

/// Start offsets along one axis: flush with either plan edge, or flush with
/// either side of a placed room. Every bottom-left justified slot is among them.
fn candidate_axis(limit: u32, extent: f64, edges: impl Iterator<Item = f64>) -> Vec<f64> {
    let max = f64::from(limit) - extent;
    let mut values: Vec<f64> = [0.0, max]
        .into_iter()
        .chain(edges.flat_map(|edge| [edge, edge - extent]))
        .filter(|&v| v >= -EPSILON && v <= max + EPSILON)
        .collect();
    values.sort_by(f64::total_cmp);
    values.dedup_by(|a, b| (*a - *b).abs() <= EPSILON);
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;
    use crate::plan::{DoorDirection, RoomType};
    use crate::template::reference_request;

    fn assert_valid_layout(plan: &FloorPlan) {
        let rooms = plan.rooms();
        for (i, a) in rooms.iter().enumerate() {
            assert!(a.rect().fits_within(plan.dimensions()), "{} out of bounds", a.label);
            for b in &rooms[i + 1..] {
                assert!(!a.rect().intersects(&b.rect()), "{} overlaps {}", a.label, b.label);
            }
        }
    }

    #[test]
    fn reference_template_places_rooms_and_resolves_all_doors() {
        let outcome = build_floor_plan(&reference_request()).unwrap();
        assert!(outcome.is_clean(), "unexpected warnings: {:?}", outcome.warnings);
        let plan = &outcome.plan;
        assert_eq!(plan.rooms().len(), 7);
        assert_valid_layout(plan);

        let living = plan.room("Living Room").unwrap();
        assert_eq!(living.position, Position::new(7.0, 0.0));
        assert_eq!(plan.room("Bathroom 2").unwrap().position, Position::new(14.0, 5.0));

        let expected = [
            ("Living Room", "Bedroom 1", DoorDirection::Vertical, Position::new(7.0, 2.5)),
            ("Living Room", "Bedroom 2", DoorDirection::Vertical, Position::new(13.0, 2.5)),
            ("Living Room", "Dining Area", DoorDirection::Horizontal, Position::new(9.0, 5.0)),
            ("Dining Area", "Kitchen", DoorDirection::Vertical, Position::new(11.0, 6.5)),
            ("Bedroom 1", "Bathroom 1", DoorDirection::Horizontal, Position::new(2.0, 5.0)),
            ("Bedroom 2", "Bathroom 2", DoorDirection::Horizontal, Position::new(15.5, 5.0)),
        ];
        assert_eq!(plan.doors().len(), expected.len());
        for (from, to, direction, position) in expected {
            let door = plan
                .doors()
                .iter()
                .find(|d| d.connects(from, to))
                .unwrap_or_else(|| panic!("missing door {from} -> {to}"));
            assert_eq!(door.direction, direction, "{from} -> {to}");
            assert_eq!(door.position, position, "{from} -> {to}");
        }
    }

    #[test]
    fn oversized_room_overflows_without_a_plan() {
        let request = LayoutRequest::new(20, 10)
            .with_room(RoomSpec::new(RoomType::LivingRoom, "Hall", 21.0, 4.0));
        assert_eq!(
            build_floor_plan(&request).unwrap_err(),
            LayoutError::LayoutOverflow {
                label: "Hall".into()
            }
        );

        let tall = LayoutRequest::new(20, 10)
            .with_room(RoomSpec::new(RoomType::Bedroom, "Tower", 2.0, 11.0));
        assert!(matches!(
            build_floor_plan(&tall),
            Err(LayoutError::LayoutOverflow { .. })
        ));
    }

    #[test]
    fn overflow_when_no_slot_remains() {
        let request = LayoutRequest::new(4, 4)
            .with_room(RoomSpec::new(RoomType::Bedroom, "A", 3.0, 3.0))
            .with_room(RoomSpec::new(RoomType::Bedroom, "B", 3.0, 3.0));
        assert_eq!(
            build_floor_plan(&request).unwrap_err(),
            LayoutError::LayoutOverflow { label: "B".into() }
        );
    }

    #[test]
    fn packing_fills_left_to_right_then_top_to_bottom() {
        let request = LayoutRequest::new(6, 4)
            .with_room(RoomSpec::new(RoomType::Bedroom, "A", 3.0, 2.0))
            .with_room(RoomSpec::new(RoomType::Bedroom, "B", 3.0, 2.0))
            .with_room(RoomSpec::new(RoomType::Bedroom, "C", 6.0, 2.0));
        let plan = build_floor_plan(&request).unwrap().into_plan();
        assert_eq!(plan.room("A").unwrap().position, Position::new(0.0, 0.0));
        assert_eq!(plan.room("B").unwrap().position, Position::new(3.0, 0.0));
        assert_eq!(plan.room("C").unwrap().position, Position::new(0.0, 2.0));
    }

    #[test]
    fn huge_plans_pack_from_room_edges() {
        let request = LayoutRequest::new(1_000_000, 1_000_000)
            .with_room(RoomSpec::new(RoomType::Storage, "A", 1.0, 1.0))
            .with_room(RoomSpec::new(RoomType::Storage, "B", 1.0, 1.0).adjacent_to("A"))
            .with_room(RoomSpec::new(RoomType::Storage, "C", 999_999.0, 2.0));
        let outcome = build_floor_plan(&request).unwrap();
        let plan = &outcome.plan;
        assert_eq!(plan.room("A").unwrap().position, Position::new(0.0, 0.0));
        assert_eq!(plan.room("B").unwrap().position, Position::new(1.0, 0.0));
        assert_eq!(plan.room("C").unwrap().position, Position::new(0.0, 1.0));
        assert_eq!(plan.doors().len(), 1);
        assert_valid_layout(plan);
    }

    #[test]
    fn candidate_axis_keeps_only_reachable_offsets() {
        let axis = candidate_axis(10, 3.0, [2.0, 5.0, 9.0].into_iter());
        assert_eq!(axis, vec![0.0, 2.0, 5.0, 6.0, 7.0]);
        assert!(candidate_axis(2, 3.0, std::iter::empty()).is_empty());
    }

    #[test]
    fn adjacency_pulls_room_next_to_its_neighbour() {
        let request = LayoutRequest::new(10, 10)
            .with_room(RoomSpec::new(RoomType::LivingRoom, "Living", 4.0, 4.0))
            .with_room(RoomSpec::new(RoomType::Kitchen, "Kitchen", 4.0, 4.0).adjacent_to("Living"));
        let outcome = build_floor_plan(&request).unwrap();
        assert!(outcome.is_clean());
        let door = &outcome.plan.doors()[0];
        assert_eq!(door.from, "Kitchen");
        assert_eq!(door.to, "Living");
        assert!(outcome.plan.room("Living").unwrap().rect().on_boundary(door.position, EPSILON));
    }

    #[test]
    fn unreachable_neighbours_become_warnings() {
        let request = LayoutRequest::new(10, 10)
            .with_room(RoomSpec::new(RoomType::Bedroom, "A", 2.0, 2.0).anchored_at(0.0, 0.0))
            .with_room(
                RoomSpec::new(RoomType::Bathroom, "B", 2.0, 2.0)
                    .anchored_at(8.0, 8.0)
                    .adjacent_to("A")
                    .adjacent_to("Ghost")
                    .adjacent_to("B"),
            );
        let outcome = build_floor_plan(&request).unwrap();
        assert!(outcome.plan.doors().is_empty());
        assert_eq!(
            outcome.warnings,
            vec![
                LayoutWarning::NoSharedBoundary {
                    from: "B".into(),
                    to: "A".into()
                },
                LayoutWarning::DanglingReference {
                    from: "B".into(),
                    to: "Ghost".into()
                },
                LayoutWarning::SelfAdjacency { label: "B".into() },
            ]
        );
    }

    #[test]
    fn symmetric_hints_produce_one_door() {
        let request = LayoutRequest::new(8, 4)
            .with_room(RoomSpec::new(RoomType::Bedroom, "A", 4.0, 4.0).adjacent_to("B"))
            .with_room(RoomSpec::new(RoomType::Bedroom, "B", 4.0, 4.0).adjacent_to("A"));
        let outcome = build_floor_plan(&request).unwrap();
        assert_eq!(outcome.plan.doors().len(), 1);
        assert_eq!(outcome.plan.doors()[0].from, "A");
    }

    #[test]
    fn rejects_malformed_requests() {
        let dup = LayoutRequest::new(10, 10)
            .with_room(RoomSpec::new(RoomType::Bedroom, "A", 1.0, 1.0))
            .with_room(RoomSpec::new(RoomType::Bedroom, "A", 1.0, 1.0));
        assert_eq!(
            build_floor_plan(&dup).unwrap_err(),
            LayoutError::DuplicateLabel("A".into())
        );

        let zero = LayoutRequest::new(0, 10);
        assert!(matches!(
            build_floor_plan(&zero),
            Err(LayoutError::InvalidDimensions { .. })
        ));

        let flat = LayoutRequest::new(10, 10)
            .with_room(RoomSpec::new(RoomType::Bedroom, "Flat", 0.0, 1.0));
        assert!(matches!(
            build_floor_plan(&flat),
            Err(LayoutError::InvalidRoomSize { .. })
        ));

        let clash = LayoutRequest::new(10, 10)
            .with_room(RoomSpec::new(RoomType::Bedroom, "A", 3.0, 3.0).anchored_at(0.0, 0.0))
            .with_room(RoomSpec::new(RoomType::Bedroom, "B", 3.0, 3.0).anchored_at(2.0, 2.0));
        assert_eq!(
            build_floor_plan(&clash).unwrap_err(),
            LayoutError::AnchorOverlap {
                label: "B".into(),
                other: "A".into()
            }
        );
    }

    #[test]
    fn build_logs_and_counts() {
        let sink = MemorySink::new();
        let metrics = Arc::new(Mutex::new(PlanMetrics::new()));
        let builder = LayoutBuilder::new()
            .with_logger(Logger::new(sink.clone()))
            .with_metrics(Arc::clone(&metrics));

        builder.build(&reference_request()).unwrap();
        let oversized = LayoutRequest::new(2, 2)
            .with_room(RoomSpec::new(RoomType::Garage, "Garage", 3.0, 3.0));
        builder.build(&oversized).unwrap_err();

        assert_eq!(sink.messages(), vec!["layout_built", "layout_failed"]);
        let snapshot = metrics.lock().unwrap().snapshot();
        assert_eq!(snapshot.layouts_built, 1);
        assert_eq!(snapshot.layout_failures, 1);
        assert_eq!(snapshot.doors_resolved, 6);
    }
}
