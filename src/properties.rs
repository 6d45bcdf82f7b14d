use proptest::prelude::*;

use crate::geometry::EPSILON;
use crate::layout::{LayoutOutcome, LayoutRequest, RoomSpec, build_floor_plan, shared_wall};
use crate::plan::{FloorPlan, RoomType};
use crate::render::{DrawOp, PlanRenderer, SurfaceSize, recover_rooms};

const SURFACE: SurfaceSize = SurfaceSize::new(600.0, 400.0);

fn request_from(width: u32, height: u32, rooms: Vec<(u32, u32, Vec<usize>)>) -> LayoutRequest {
    let count = rooms.len();
    rooms
        .into_iter()
        .enumerate()
        .fold(LayoutRequest::new(width, height), |request, (idx, (w, h, hints))| {
            let spec = hints.into_iter().fold(
                RoomSpec::new(RoomType::Other, format!("R{idx}"), f64::from(w), f64::from(h)),
                |spec, hint| spec.adjacent_to(format!("R{}", hint % count)),
            );
            request.with_room(spec)
        })
}

/// Requests that may not fit; overflow is a legal outcome.
fn request_strategy() -> impl Strategy<Value = LayoutRequest> {
    let room = (1u32..=6, 1u32..=6, prop::collection::vec(0usize..6, 0..3));
    (4u32..=24, 4u32..=16, prop::collection::vec(room, 1..6))
        .prop_map(|(width, height, rooms)| request_from(width, height, rooms))
}

/// Requests that always fit. At most three rooms of up to 3x3 are placed
/// before the last one, and they can cover at most 12 of the 20 disjoint
/// 3x3 blocks of a 16x12 plan, so a free slot always remains.
fn fitting_request_strategy() -> impl Strategy<Value = LayoutRequest> {
    let room = (1u32..=3, 1u32..=3, prop::collection::vec(0usize..4, 0..3));
    (16u32..=24, 12u32..=16, prop::collection::vec(room, 1..=4))
        .prop_map(|(width, height, rooms)| request_from(width, height, rooms))
}

fn build_fitting(request: &LayoutRequest) -> Result<LayoutOutcome, TestCaseError> {
    build_floor_plan(request)
        .map_err(|err| TestCaseError::fail(format!("fitting request failed: {err}")))
}

fn assert_request_order(plan: &FloorPlan, request: &LayoutRequest) -> Result<(), TestCaseError> {
    prop_assert_eq!(plan.rooms().len(), request.rooms.len());
    for (room, spec) in plan.rooms().iter().zip(&request.rooms) {
        prop_assert_eq!(&room.label, &spec.label);
        prop_assert_eq!(room.size, spec.size);
    }
    Ok(())
}

fn assert_no_overlap(plan: &FloorPlan) -> Result<(), TestCaseError> {
    let rooms = plan.rooms();
    for (i, a) in rooms.iter().enumerate() {
        prop_assert!(a.rect().fits_within(plan.dimensions()), "{} out of bounds", a.label);
        for b in &rooms[i + 1..] {
            prop_assert!(!a.rect().intersects(&b.rect()), "{} overlaps {}", a.label, b.label);
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn built_rooms_are_contained_and_disjoint(request in request_strategy()) {
        if let Ok(outcome) = build_floor_plan(&request) {
            assert_request_order(&outcome.plan, &request)?;
            assert_no_overlap(&outcome.plan)?;
        }
    }

    #[test]
    fn fitting_requests_always_build(request in fitting_request_strategy()) {
        let outcome = build_fitting(&request)?;
        assert_request_order(&outcome.plan, &request)?;
        assert_no_overlap(&outcome.plan)?;
    }

    #[test]
    fn layout_is_deterministic(request in request_strategy()) {
        prop_assert_eq!(build_floor_plan(&request), build_floor_plan(&request));
    }

    #[test]
    fn doors_sit_on_shared_walls_once_per_pair(request in fitting_request_strategy()) {
        let outcome = build_fitting(&request)?;
        let plan = &outcome.plan;
        let mut pairs = Vec::new();
        for door in plan.doors() {
            let (a, b) = plan.door_endpoints(door).unwrap();
            let wall = shared_wall(&a.rect(), &b.rect());
            prop_assert_eq!(wall, Some((door.position, door.direction)));
            prop_assert!(a.rect().on_boundary(door.position, EPSILON), "door off {}", a.label);
            prop_assert!(b.rect().on_boundary(door.position, EPSILON), "door off {}", b.label);

            let mut key = [door.from.clone(), door.to.clone()];
            key.sort();
            prop_assert!(!pairs.contains(&key), "duplicate door {:?}", key);
            pairs.push(key);
        }
    }

    #[test]
    fn render_is_idempotent_and_recovers_rooms(request in fitting_request_strategy()) {
        let outcome = build_fitting(&request)?;
        let plan = &outcome.plan;
        let renderer = PlanRenderer::with_default();
        let ops = renderer.render(plan, SURFACE).unwrap();
        prop_assert_eq!(&ops, &renderer.render(plan, SURFACE).unwrap());

        let dims = plan.dimensions();
        let expected = 1 + (dims.width as usize + 1) + (dims.height as usize + 1)
            + 3 * plan.rooms().len()
            + plan.doors().len();
        prop_assert_eq!(ops.len(), expected);
        prop_assert!(matches!(ops[0], DrawOp::Clear { .. }), "first op is {}", ops[0].kind());

        let ctx = renderer.context(plan, SURFACE).unwrap();
        let recovered = recover_rooms(&ops, &ctx);
        prop_assert_eq!(recovered.len(), plan.rooms().len());
        for (rect, room) in recovered.iter().zip(plan.rooms()) {
            let expected = room.rect();
            prop_assert!((rect.x - expected.x).abs() <= EPSILON, "x of {}", room.label);
            prop_assert!((rect.y - expected.y).abs() <= EPSILON, "y of {}", room.label);
            prop_assert!((rect.width - expected.width).abs() <= EPSILON, "width of {}", room.label);
            prop_assert!((rect.height - expected.height).abs() <= EPSILON, "height of {}", room.label);
        }
    }

    #[test]
    fn plan_json_round_trips(request in fitting_request_strategy()) {
        let outcome = build_fitting(&request)?;
        let raw = outcome.plan.to_json_pretty().unwrap();
        let restored = FloorPlan::from_json_str(&raw).unwrap();
        prop_assert_eq!(restored.fingerprint(), outcome.plan.fingerprint());
        prop_assert_eq!(restored, outcome.plan);
    }
}
