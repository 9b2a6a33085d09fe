use crate::common::{count, record, scene, table};
use schemacanvas_core::{MouseButton, ObjectId, Point, SceneEvent, Size};
use schemacanvas_scene::{
    ArrowKey, DiagramScene, LabelKind, Modifiers, MoveSource, SpatialObject, TimerKind,
};
use std::time::Duration;

fn started(e: &SceneEvent) -> bool {
    *e == SceneEvent::ObjectsMoved { settled: false }
}

fn settled(e: &SceneEvent) -> bool {
    *e == SceneEvent::ObjectsMoved { settled: true }
}

#[test]
fn test_pointer_drag_moves_selection() {
    let (mut scene, _) = scene();
    let t = scene.add_object(table(40.0, 40.0)).unwrap();
    let log = record(&scene);

    scene.mouse_press(Point::new(50.0, 50.0), MouseButton::Primary, Modifiers::NONE);
    assert_eq!(scene.selected_objects(), &[t]);

    scene.mouse_move(Point::new(70.0, 80.0), true);
    assert!(scene.is_moving_objects());
    assert_eq!(
        scene.interaction_state().session().map(|s| s.source),
        Some(MoveSource::Pointer)
    );
    assert_eq!(scene.object(t).unwrap().position(), Point::new(60.0, 70.0));

    scene.mouse_release(Point::new(70.0, 80.0), MouseButton::Primary);
    assert!(scene.interaction_state().is_idle());
    assert_eq!(scene.object(t).unwrap().position(), Point::new(60.0, 70.0));
    assert_eq!(count(&log, started), 1);
    assert_eq!(count(&log, settled), 1);

    // canvas grows to the content plus two grid cells
    assert_eq!(scene.scene_rect().width, 200.0);
    assert_eq!(scene.scene_rect().height, 170.0);
}

#[test]
fn test_drag_with_grid_alignment_snaps() {
    let (mut scene, _) = scene();
    scene.set_align_objects_to_grid(true);
    let t = scene.add_object(table(40.0, 40.0)).unwrap();

    scene.mouse_press(Point::new(50.0, 50.0), MouseButton::Primary, Modifiers::NONE);
    scene.mouse_move(Point::new(73.0, 88.0), true);
    assert_eq!(scene.object(t).unwrap().position(), Point::new(70.0, 70.0));

    scene.mouse_release(Point::new(73.0, 88.0), MouseButton::Primary);
    assert_eq!(scene.object(t).unwrap().position(), Point::new(80.0, 80.0));
}

#[test]
fn test_release_clamps_to_positive_quadrant() {
    let (mut scene, _) = scene();
    let t = scene.add_object(table(10.0, 10.0)).unwrap();

    scene.mouse_press(Point::new(20.0, 20.0), MouseButton::Primary, Modifiers::NONE);
    scene.mouse_move(Point::new(0.0, 5.0), true);
    assert_eq!(scene.object(t).unwrap().position(), Point::new(-10.0, -5.0));

    scene.mouse_release(Point::new(0.0, 5.0), MouseButton::Primary);
    assert_eq!(scene.object(t).unwrap().position(), Point::new(0.0, 0.0));
}

#[test]
fn test_keyboard_move_settles_once() {
    let (mut scene, clock) = scene();
    let t = scene.add_object(table(40.0, 40.0)).unwrap();
    scene.select_object(t, true).unwrap();
    let log = record(&scene);

    assert!(scene.key_press(ArrowKey::Right, Modifiers::NONE));
    assert_eq!(scene.object(t).unwrap().position(), Point::new(41.0, 40.0));
    assert!(scene.key_press(ArrowKey::Right, Modifiers::CONTROL));
    assert_eq!(scene.object(t).unwrap().position(), Point::new(51.0, 40.0));

    assert!(scene.key_release(ArrowKey::Right, false));
    assert!(scene.is_move_settle_pending());

    // a new keystroke before the timer fires continues the same gesture
    assert!(scene.key_press(ArrowKey::Down, Modifiers::CONTROL_SHIFT));
    assert_eq!(scene.object(t).unwrap().position(), Point::new(51.0, 140.0));
    assert!(scene.key_release(ArrowKey::Down, false));

    clock.advance(Duration::from_millis(600));
    let fired = scene.process_timers();
    assert_eq!(fired, vec![TimerKind::MoveSettle]);
    assert!(scene.interaction_state().is_idle());
    assert!(!scene.is_move_settle_pending());

    assert!(scene.process_timers().is_empty());
    assert_eq!(count(&log, started), 1);
    assert_eq!(count(&log, settled), 1);
}

#[test]
fn test_auto_repeat_release_is_ignored() {
    let (mut scene, _) = scene();
    let t = scene.add_object(table(40.0, 40.0)).unwrap();
    scene.select_object(t, true).unwrap();

    scene.key_press(ArrowKey::Left, Modifiers::NONE);
    assert!(!scene.key_release(ArrowKey::Left, true));
    assert!(!scene.is_move_settle_pending());
    assert!(scene.is_moving_objects());
}

#[test]
fn test_keys_without_selection_are_not_consumed() {
    let (mut scene, _) = scene();
    scene.add_object(table(40.0, 40.0)).unwrap();
    assert!(!scene.key_press(ArrowKey::Up, Modifiers::NONE));
    assert!(!scene.key_release(ArrowKey::Up, false));
    assert!(scene.interaction_state().is_idle());
}

#[test]
fn test_protected_objects_stay_put() {
    let (mut scene, _) = scene();
    let t = scene
        .add_object(table(40.0, 40.0).with_protected(true))
        .unwrap();
    scene.select_object(t, true).unwrap();

    assert!(scene.key_press(ArrowKey::Right, Modifiers::CONTROL));
    assert_eq!(scene.object(t).unwrap().position(), Point::new(40.0, 40.0));
    assert!(!scene.is_object_movable(t));
}

#[test]
fn test_schema_move_carries_members_and_marks_modified() {
    let (mut scene, clock) = scene();
    let schema = scene
        .add_object(SpatialObject::schema(Point::default(), Size::new(10.0, 10.0)))
        .unwrap();
    let t = scene
        .add_object(table(100.0, 100.0).with_schema(schema))
        .unwrap();
    assert_eq!(scene.object(schema).unwrap().position(), Point::new(90.0, 70.0));

    let log = record(&scene);
    scene.select_object(schema, true).unwrap();
    scene.key_press(ArrowKey::Down, Modifiers::NONE);
    scene.key_release(ArrowKey::Down, false);
    assert_eq!(scene.object(t).unwrap().position(), Point::new(100.0, 101.0));
    assert_eq!(scene.object(schema).unwrap().position(), Point::new(90.0, 71.0));

    clock.advance(Duration::from_millis(600));
    scene.process_timers();

    let data = scene.object(schema).unwrap().schema_data().unwrap();
    assert!(data.modified);
    assert_eq!(
        count(&log, |e| *e == SceneEvent::ObjectModified { object: schema }),
        1
    );
}

#[test]
fn test_multi_item_move_translates_waypoints() {
    let (mut scene, _) = scene();
    let a = scene.add_object(table(0.0, 0.0)).unwrap();
    let b = scene.add_object(table(300.0, 0.0)).unwrap();
    let rel = scene
        .add_object(SpatialObject::relationship(a, b).with_waypoints([Point::new(200.0, 200.0)]))
        .unwrap();
    for id in [a, b, rel] {
        scene.select_object(id, true).unwrap();
    }

    scene.mouse_press(Point::new(50.0, 30.0), MouseButton::Primary, Modifiers::NONE);
    assert_eq!(scene.selected_objects().len(), 3);
    scene.mouse_move(Point::new(60.0, 30.0), true);
    scene.mouse_release(Point::new(60.0, 30.0), MouseButton::Primary);

    assert_eq!(scene.object(a).unwrap().position(), Point::new(10.0, 0.0));
    assert_eq!(scene.object(b).unwrap().position(), Point::new(310.0, 0.0));
    assert_eq!(
        scene.object(rel).unwrap().waypoints(),
        &[Point::new(210.0, 200.0)]
    );
}

#[test]
fn test_single_relationship_drag_keeps_waypoints() {
    let (mut scene, _) = scene();
    let a = scene.add_object(table(0.0, 0.0)).unwrap();
    let b = scene.add_object(table(300.0, 0.0)).unwrap();
    let rel = scene
        .add_object(SpatialObject::relationship(a, b).with_waypoints([Point::new(200.0, 200.0)]))
        .unwrap();

    // press on the waypoint picks the line alone
    scene.mouse_press(Point::new(200.0, 200.0), MouseButton::Primary, Modifiers::NONE);
    assert_eq!(scene.selected_objects(), &[rel]);
    scene.mouse_move(Point::new(210.0, 200.0), true);
    scene.mouse_release(Point::new(210.0, 200.0), MouseButton::Primary);

    // waypoints only follow a move that involves more than one item
    assert_eq!(
        scene.object(rel).unwrap().waypoints(),
        &[Point::new(200.0, 200.0)]
    );
    assert_eq!(scene.object(rel).unwrap().position(), Point::default());
    assert_eq!(scene.object(a).unwrap().position(), Point::new(0.0, 0.0));
}

/// Schema at (90,70)-(510,170) holding two tables, one routed relationship,
/// one straight relationship, plus a routed relationship outside the schema.
struct SchemaFixture {
    schema: ObjectId,
    routed: ObjectId,
    straight: ObjectId,
    outside: ObjectId,
}

fn schema_fixture(scene: &mut DiagramScene) -> SchemaFixture {
    let schema = scene
        .add_object(SpatialObject::schema(Point::default(), Size::new(10.0, 10.0)))
        .unwrap();
    let a = scene
        .add_object(table(100.0, 100.0).with_schema(schema))
        .unwrap();
    let b = scene
        .add_object(table(400.0, 100.0).with_schema(schema))
        .unwrap();
    let routed = scene
        .add_object(
            SpatialObject::relationship(a, b)
                .with_schema(schema)
                .with_waypoints([Point::new(250.0, 300.0)]),
        )
        .unwrap();
    let straight = scene
        .add_object(SpatialObject::relationship(b, a).with_schema(schema))
        .unwrap();
    let c = scene.add_object(table(100.0, 400.0)).unwrap();
    let outside = scene
        .add_object(SpatialObject::relationship(a, c).with_waypoints([Point::new(40.0, 450.0)]))
        .unwrap();
    SchemaFixture {
        schema,
        routed,
        straight,
        outside,
    }
}

#[test]
fn test_schema_move_carries_routed_relationships() {
    let (mut scene, clock) = scene();
    let f = schema_fixture(&mut scene);
    assert_eq!(scene.object(f.schema).unwrap().position(), Point::new(90.0, 70.0));

    scene.select_object(f.schema, true).unwrap();
    scene.key_press(ArrowKey::Down, Modifiers::CONTROL);
    scene.key_release(ArrowKey::Down, false);
    clock.advance(Duration::from_millis(600));
    scene.process_timers();

    assert_eq!(scene.object(f.schema).unwrap().position(), Point::new(90.0, 80.0));
    assert_eq!(
        scene.object(f.routed).unwrap().waypoints(),
        &[Point::new(250.0, 310.0)]
    );
    assert!(scene.object(f.straight).unwrap().waypoints().is_empty());
    assert_eq!(
        scene.object(f.outside).unwrap().waypoints(),
        &[Point::new(40.0, 450.0)]
    );
}

#[test]
fn test_selected_relationship_in_moved_schema_moves_once() {
    let (mut scene, _) = scene();
    let f = schema_fixture(&mut scene);
    scene.select_object(f.schema, true).unwrap();
    scene.select_object(f.routed, true).unwrap();

    // title band of the schema, clear of tables and lines
    scene.mouse_press(Point::new(95.0, 75.0), MouseButton::Primary, Modifiers::NONE);
    assert_eq!(scene.selected_objects().len(), 2);
    scene.mouse_move(Point::new(95.0, 95.0), true);
    scene.mouse_release(Point::new(95.0, 95.0), MouseButton::Primary);

    assert_eq!(scene.object(f.schema).unwrap().position(), Point::new(90.0, 90.0));
    assert_eq!(
        scene.object(f.routed).unwrap().waypoints(),
        &[Point::new(250.0, 320.0)]
    );
}

#[test]
fn test_protected_schema_leaves_routing_alone() {
    let (mut scene, _) = scene();
    let schema = scene
        .add_object(
            SpatialObject::schema(Point::default(), Size::new(10.0, 10.0)).with_protected(true),
        )
        .unwrap();
    let a = scene
        .add_object(table(100.0, 100.0).with_schema(schema))
        .unwrap();
    let b = scene
        .add_object(table(400.0, 100.0).with_schema(schema))
        .unwrap();
    let routed = scene
        .add_object(
            SpatialObject::relationship(a, b)
                .with_schema(schema)
                .with_waypoints([Point::new(250.0, 300.0)]),
        )
        .unwrap();
    let free = scene.add_object(table(100.0, 400.0)).unwrap();
    scene.select_object(schema, true).unwrap();
    scene.select_object(free, true).unwrap();

    scene.mouse_press(Point::new(150.0, 430.0), MouseButton::Primary, Modifiers::NONE);
    scene.mouse_move(Point::new(150.0, 450.0), true);
    scene.mouse_release(Point::new(150.0, 450.0), MouseButton::Primary);

    assert_eq!(scene.object(free).unwrap().position(), Point::new(100.0, 420.0));
    assert_eq!(scene.object(schema).unwrap().position(), Point::new(90.0, 70.0));
    assert_eq!(
        scene.object(routed).unwrap().waypoints(),
        &[Point::new(250.0, 300.0)]
    );
}

#[test]
fn test_relationship_line_box_follows_endpoints() {
    let (mut scene, _) = scene();
    let a = scene.add_object(table(0.0, 0.0)).unwrap();
    let b = scene.add_object(table(300.0, 0.0)).unwrap();
    let rel = scene.add_object(SpatialObject::relationship(a, b)).unwrap();

    let before = scene.object(rel).unwrap().scene_rect();
    scene.move_object(b, Point::new(300.0, 200.0)).unwrap();
    let after = scene.object(rel).unwrap().scene_rect();

    assert!(after.bottom() > before.bottom());
    assert!(after.contains(&Point::new(350.0, 230.0)));
    assert!(scene.move_object(rel, Point::default()).is_err());
}

#[test]
fn test_align_objects_to_grid() {
    let (mut scene, _) = scene();
    let t = scene.add_object(table(33.0, 47.0)).unwrap();

    scene.align_objects_to_grid();
    assert_eq!(scene.object(t).unwrap().position(), Point::new(40.0, 40.0));
    assert_eq!(scene.align_point_to_grid(Point::new(-7.0, 11.0)), Point::new(0.0, 20.0));
}

#[test]
fn test_align_snaps_waypoints_and_labels() {
    let (mut scene, _) = scene();
    let schema = scene
        .add_object(SpatialObject::schema(Point::default(), Size::new(10.0, 10.0)))
        .unwrap();
    let a = scene
        .add_object(table(100.0, 100.0).with_schema(schema))
        .unwrap();
    let b = scene.add_object(table(400.0, 100.0)).unwrap();
    let rel = scene
        .add_object(SpatialObject::relationship(a, b).with_waypoints([Point::new(233.0, 307.0)]))
        .unwrap();
    scene
        .set_label_position(rel, LabelKind::Name, Some(Point::new(61.0, 89.0)))
        .unwrap();
    let log = record(&scene);

    scene.align_objects_to_grid();

    let obj = scene.object(rel).unwrap();
    assert_eq!(obj.waypoints(), &[Point::new(240.0, 300.0)]);
    let data = obj.relationship_data().unwrap();
    assert_eq!(data.label(LabelKind::Name), Some(Point::new(60.0, 80.0)));
    assert_eq!(data.label(LabelKind::SourceCardinality), None);
    assert_eq!(obj.position(), Point::default());

    assert!(scene.object(schema).unwrap().schema_data().unwrap().modified);
    assert_eq!(
        count(&log, |e| *e == SceneEvent::ObjectModified { object: schema }),
        1
    );
}

#[test]
fn test_grid_size_has_minimum() {
    let (mut scene, _) = scene();
    scene.set_grid_size(5);
    assert_eq!(scene.grid_size(), 20);
    scene.set_grid_size(50);
    assert_eq!(scene.grid_size(), 50);
    assert_eq!(scene.config().grid.size, 50);
}
