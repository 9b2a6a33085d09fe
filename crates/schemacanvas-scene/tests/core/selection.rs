use crate::common::{count, record, scene, table};
use schemacanvas_core::{ChildRef, MouseButton, Point, Rect, SceneError, SceneEvent, Size};
use schemacanvas_scene::{Modifiers, SpatialObject};

fn press(scene: &mut schemacanvas_scene::DiagramScene, x: f64, y: f64, modifiers: Modifiers) {
    scene.mouse_press(Point::new(x, y), MouseButton::Primary, modifiers);
}

#[test]
fn test_press_on_empty_canvas_reports_scene_press() {
    let (mut scene, _) = scene();
    let log = record(&scene);

    press(&mut scene, 500.0, 500.0, Modifiers::NONE);

    assert_eq!(
        count(&log, |e| *e
            == SceneEvent::ScenePressed {
                button: MouseButton::Primary
            }),
        1
    );
    assert_eq!(scene.selected_item_count(), 0);
}

#[test]
fn test_press_replaces_and_control_toggles() {
    let (mut scene, _) = scene();
    let a = scene.add_object(table(0.0, 0.0)).unwrap();
    let b = scene.add_object(table(200.0, 0.0)).unwrap();

    press(&mut scene, 10.0, 10.0, Modifiers::NONE);
    assert_eq!(scene.selected_objects(), &[a]);

    press(&mut scene, 210.0, 10.0, Modifiers::NONE);
    assert_eq!(scene.selected_objects(), &[b]);

    press(&mut scene, 10.0, 10.0, Modifiers::CONTROL);
    assert_eq!(scene.selected_objects(), &[b, a]);

    press(&mut scene, 210.0, 10.0, Modifiers::CONTROL);
    assert_eq!(scene.selected_objects(), &[a]);
}

#[test]
fn test_deselection_emits_single_cleared_event() {
    let (mut scene, _) = scene();
    let a = scene.add_object(table(0.0, 0.0)).unwrap();
    scene.select_object(a, true).unwrap();
    let log = record(&scene);

    press(&mut scene, 500.0, 500.0, Modifiers::NONE);

    assert!(scene.selected_objects().is_empty());
    let events = log.lock().clone();
    assert_eq!(
        events,
        vec![SceneEvent::ObjectSelected {
            object: None,
            selected: false
        }]
    );
    assert!(!scene.item_signals_blocked());
}

#[test]
fn test_topmost_object_wins_hit_test() {
    let (mut scene, _) = scene();
    let schema = scene
        .add_object(SpatialObject::schema(Point::default(), Size::new(10.0, 10.0)))
        .unwrap();
    let t = scene
        .add_object(table(100.0, 100.0).with_schema(schema))
        .unwrap();
    let front = scene
        .add_object(table(150.0, 120.0).with_z_order(5))
        .unwrap();

    assert_eq!(scene.object_at(Point::new(120.0, 110.0)), Some(t));
    assert_eq!(scene.object_at(Point::new(160.0, 130.0)), Some(front));
    // schema padding around the member
    assert_eq!(scene.object_at(Point::new(95.0, 80.0)), Some(schema));
    assert_eq!(scene.object_at(Point::new(900.0, 900.0)), None);
}

#[test]
fn test_rubber_band_selection() {
    let (mut scene, _) = scene();
    let a = scene.add_object(table(20.0, 20.0)).unwrap();
    let b = scene.add_object(table(150.0, 20.0)).unwrap();
    let far = scene.add_object(table(600.0, 600.0)).unwrap();
    let log = record(&scene);

    press(&mut scene, 0.0, 0.0, Modifiers::SHIFT);
    assert!(scene.interaction_state().is_range_selecting());

    scene.mouse_move(Point::new(300.0, 300.0), true);
    assert_eq!(
        scene.rubber_band(),
        Some(Rect::new(0.0, 0.0, 300.0, 300.0))
    );

    scene.mouse_release(Point::new(300.0, 300.0), MouseButton::Primary);

    assert!(scene.interaction_state().is_idle());
    assert_eq!(scene.selected_objects(), &[a, b]);
    assert!(!scene.selection().is_selected(far));
    assert_eq!(count(&log, |e| *e == SceneEvent::ObjectsSelectedInRange), 1);
    assert_eq!(
        count(&log, |e| matches!(
            e,
            SceneEvent::ObjectSelected {
                object: Some(_),
                ..
            }
        )),
        0
    );
}

#[test]
fn test_empty_rubber_band_reports_nothing() {
    let (mut scene, _) = scene();
    scene.add_object(table(600.0, 600.0)).unwrap();
    let log = record(&scene);

    press(&mut scene, 0.0, 0.0, Modifiers::SHIFT);
    scene.mouse_move(Point::new(50.0, 50.0), true);
    scene.mouse_release(Point::new(50.0, 50.0), MouseButton::Primary);

    assert_eq!(scene.selected_item_count(), 0);
    assert_eq!(count(&log, |e| *e == SceneEvent::ObjectsSelectedInRange), 0);
}

#[test]
fn test_inverted_range_trigger() {
    let (mut scene, _) = scene();
    scene.set_invert_range_selection_trigger(true);

    press(&mut scene, 0.0, 0.0, Modifiers::SHIFT);
    assert!(!scene.interaction_state().is_range_selecting());
    scene.mouse_release(Point::default(), MouseButton::Primary);

    press(&mut scene, 0.0, 0.0, Modifiers::NONE);
    assert!(scene.interaction_state().is_range_selecting());
}

#[test]
fn test_disabled_range_selection() {
    let (mut scene, _) = scene();
    scene.enable_range_selection(false);
    assert!(!scene.is_range_selection_enabled());

    press(&mut scene, 0.0, 0.0, Modifiers::SHIFT);
    assert!(scene.interaction_state().is_idle());
    assert_eq!(scene.rubber_band(), None);
}

#[test]
fn test_disabling_range_selection_cancels_band() {
    let (mut scene, _) = scene();
    press(&mut scene, 0.0, 0.0, Modifiers::SHIFT);
    assert!(scene.interaction_state().is_range_selecting());

    scene.enable_range_selection(false);
    assert!(scene.interaction_state().is_idle());
}

#[test]
fn test_secondary_press_requests_popup() {
    let (mut scene, _) = scene();
    let a = scene.add_object(table(0.0, 0.0)).unwrap();
    scene.select_object(a, true).unwrap();
    let log = record(&scene);

    // over the selection: keeps it
    scene.mouse_press(Point::new(10.0, 10.0), MouseButton::Secondary, Modifiers::NONE);
    assert_eq!(scene.selected_objects(), &[a]);

    scene.mouse_press(Point::new(500.0, 500.0), MouseButton::Secondary, Modifiers::NONE);
    assert!(scene.selected_objects().is_empty());
    assert_eq!(
        count(&log, |e| *e == SceneEvent::PopupMenuRequested { child: None }),
        2
    );
}

#[test]
fn test_double_click_reports_single_selection() {
    let (mut scene, _) = scene();
    let a = scene.add_object(table(0.0, 0.0)).unwrap();
    let b = scene.add_object(table(200.0, 0.0)).unwrap();
    let log = record(&scene);

    scene.select_object(a, true).unwrap();
    scene.mouse_double_click(MouseButton::Primary);
    scene.select_object(b, true).unwrap();
    scene.mouse_double_click(MouseButton::Primary);

    let clicks: Vec<SceneEvent> = log
        .lock()
        .iter()
        .filter(|e| matches!(e, SceneEvent::ObjectDoubleClicked { .. }))
        .cloned()
        .collect();
    assert_eq!(
        clicks,
        vec![
            SceneEvent::ObjectDoubleClicked { object: Some(a) },
            SceneEvent::ObjectDoubleClicked { object: None },
        ]
    );
}

#[test]
fn test_child_selection() {
    let (mut scene, _) = scene();
    let t = scene
        .add_object(table(0.0, 0.0).with_children(["id", "name", "email"]))
        .unwrap();
    let log = record(&scene);

    scene.set_child_selected(ChildRef::new(t, 1), true).unwrap();
    assert_eq!(scene.selected_item_count(), 1);
    assert!(scene.selection().has_only_children_selection());
    assert_eq!(count(&log, |e| *e == SceneEvent::ChildrenSelectionChanged), 1);

    scene.mouse_double_click(MouseButton::Primary);
    assert_eq!(
        count(&log, |e| *e == SceneEvent::ObjectDoubleClicked { object: Some(t) }),
        1
    );

    // pressing empty canvas deselects the child
    press(&mut scene, 500.0, 500.0, Modifiers::NONE);
    assert_eq!(scene.selected_item_count(), 0);
    assert!(!scene.object(t).unwrap().has_selected_children());
}

#[test]
fn test_child_selection_validation() {
    let (mut scene, _) = scene();
    let t = scene.add_object(table(0.0, 0.0).with_children(["id"])).unwrap();
    let note = scene
        .add_object(SpatialObject::textbox(Point::new(300.0, 0.0), Size::new(50.0, 20.0)))
        .unwrap();

    let err = scene.set_child_selected(ChildRef::new(t, 3), true).unwrap_err();
    assert!(matches!(err, SceneError::UnknownChild(_)));

    let err = scene.set_child_selected(ChildRef::new(note, 0), true).unwrap_err();
    assert!(matches!(err, SceneError::InvalidKind { .. }));
}

#[test]
fn test_relationship_line_collects_endpoints() {
    let (mut scene, _) = scene();
    let a = scene.add_object(table(0.0, 0.0)).unwrap();
    let b = scene.add_object(table(300.0, 0.0)).unwrap();

    scene.show_relationship_line(true, Point::new(50.0, 30.0));
    assert!(scene.is_relationship_line_visible());

    press(&mut scene, 50.0, 30.0, Modifiers::NONE);
    scene.mouse_move(Point::new(340.0, 20.0), false);
    assert_eq!(
        scene.relationship_line().map(|l| l.end),
        Some(Point::new(340.0, 20.0))
    );
    // the line does not drag objects
    assert_eq!(scene.object(a).unwrap().position(), Point::new(0.0, 0.0));
    assert!(!scene.is_moving_objects());

    press(&mut scene, 340.0, 20.0, Modifiers::NONE);
    assert_eq!(scene.selected_objects(), &[a, b]);

    scene.show_relationship_line(false, Point::NAN);
    assert!(scene.relationship_line().is_none());
}

#[test]
fn test_removed_object_leaves_selection() {
    let (mut scene, _) = scene();
    let a = scene.add_object(table(0.0, 0.0)).unwrap();
    let b = scene.add_object(table(300.0, 0.0)).unwrap();
    let rel = scene.add_object(SpatialObject::relationship(a, b)).unwrap();
    scene.select_object(a, true).unwrap();
    scene.select_object(rel, true).unwrap();

    scene.remove_object(a).unwrap();

    assert!(scene.selected_objects().is_empty());
    assert!(scene.object(rel).is_none());
    assert_eq!(scene.object_count(), 1);
    assert!(matches!(
        scene.remove_object(a),
        Err(SceneError::UnknownObject(_))
    ));
}
