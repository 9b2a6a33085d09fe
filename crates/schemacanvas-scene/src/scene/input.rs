//! Pointer, keyboard and timer input.
//!
//! Hosts translate their toolkit events into these calls. Positions are in
//! canvas coordinates.

use super::DiagramScene;
use crate::interaction::{
    ArrowKey, InteractionState, Modifiers, MoveSession, MoveSource, RelationshipLine,
};
use crate::scheduler::TimerKind;
use crate::view::HostView;
use schemacanvas_core::{MouseButton, ObjectId, Point, Rect, SceneEvent};

impl DiagramScene {
    /// Whether a pointer drag may move `id` right now.
    pub fn is_object_movable(&self, id: ObjectId) -> bool {
        self.relationship_line.is_none()
            && self
                .store
                .get(id)
                .is_some_and(|o| !o.kind().is_relationship() && !o.is_protected())
    }

    pub fn mouse_press(&mut self, pos: Point, button: MouseButton, modifiers: Modifiers) {
        let item = self.store.object_at(pos);
        let had_selection = self.selected_item_count() > 0;
        let is_deselection = had_selection && item.is_none();

        if !had_selection {
            self.emit(SceneEvent::ScenePressed { button });
        }

        // drawing a relationship multi-selects its endpoints
        let modifiers = if self.relationship_line.is_some() {
            Modifiers::CONTROL
        } else {
            modifiers
        };

        if is_deselection {
            self.block_item_signals();
        }
        if is_deselection || (button == MouseButton::Primary && !modifiers.control) {
            self.clear_children_selection();
        }

        self.press_selection(item, button, modifiers);

        if is_deselection {
            self.unblock_item_signals();
            self.emit(SceneEvent::ObjectSelected {
                object: None,
                selected: false,
            });
        }

        match button {
            MouseButton::Primary => {
                self.press_point = pos;

                let interaction = &self.config.interaction;
                let range_trigger = if interaction.invert_range_selection_trigger {
                    modifiers.is_none()
                } else {
                    modifiers == Modifiers::SHIFT
                };

                if range_trigger {
                    if interaction.range_selection_enabled && self.selected_item_count() == 0 {
                        self.interaction = InteractionState::RangeSelecting {
                            anchor: pos,
                            current: pos,
                        };
                        self.emit(SceneEvent::ObjectSelected {
                            object: None,
                            selected: false,
                        });
                    }
                } else if let Some(id) = item.filter(|_| self.relationship_line.is_some()) {
                    let selectable = self
                        .store
                        .get(id)
                        .is_some_and(|o| o.is_enabled() && !o.is_selected());
                    if selectable && self.selection.set_selected(&mut self.store, id, true) {
                        self.emit_selection_changes(&[(id, true)]);
                    }
                }

                self.press_grab = item
                    .filter(|id| self.selection.is_selected(*id) && self.is_object_movable(*id));
            }
            MouseButton::Secondary => {
                if item.is_none() {
                    self.clear_selection();
                    self.emit(SceneEvent::ObjectSelected {
                        object: None,
                        selected: false,
                    });
                }
                self.emit(SceneEvent::PopupMenuRequested { child: None });
            }
            MouseButton::Middle => {}
        }
    }

    /// Hit-test selection: Control toggles, a plain press on an unselected
    /// object makes it the only selected one, a press on empty canvas
    /// clears the selection.
    fn press_selection(&mut self, item: Option<ObjectId>, button: MouseButton, modifiers: Modifiers) {
        match item {
            Some(id) if button == MouseButton::Primary => {
                let was_selected = self.selection.is_selected(id);
                if modifiers.control {
                    if self.selection.set_selected(&mut self.store, id, !was_selected) {
                        self.emit_selection_changes(&[(id, !was_selected)]);
                    }
                } else if !was_selected {
                    let changes = self.selection.clear(&mut self.store);
                    self.emit_selection_changes(&changes);
                    if self.selection.set_selected(&mut self.store, id, true) {
                        self.emit_selection_changes(&[(id, true)]);
                    }
                }
            }
            Some(_) => {}
            None => {
                if !modifiers.control {
                    let changes = self.selection.clear(&mut self.store);
                    self.emit_selection_changes(&changes);
                }
            }
        }
    }

    /// Pointer motion. Only acts while the primary button is held or a
    /// relationship is being drawn.
    pub fn mouse_move(&mut self, pos: Point, primary_down: bool) {
        let drawing_line = self.relationship_line.is_some();
        if !primary_down && !drawing_line {
            return;
        }

        if self.config.interaction.corner_move {
            let view = self
                .views
                .iter()
                .find(|(_, v)| v.is_active())
                .map(|(_, v)| v.as_ref());
            self.auto_scroll.on_drag(view, &mut self.scheduler);
        }

        if !drawing_line {
            let count = self.selected_item_count();
            if count > 0 && !self.interaction.is_moving() {
                self.begin_pointer_move(pos);
            }

            let mut pos = pos;
            if self.config.grid.align_objects_to_grid
                && !self.interaction.is_range_selecting()
                && count <= 1
            {
                pos = self.grid.snap_point(pos);
            } else if let InteractionState::RangeSelecting { current, .. } = &mut self.interaction {
                *current = pos;
            }

            if primary_down && self.press_grab.is_some() {
                self.drag_selection_to(pos);
            }
        }

        if let Some(line) = self.relationship_line.as_mut() {
            line.end = pos;
        }
    }

    fn begin_pointer_move(&mut self, pos: Point) {
        self.emit(SceneEvent::ObjectsMoved { settled: false });

        let anchor = if self.press_point.is_nan() {
            pos
        } else {
            self.press_point
        };
        let origins = self
            .move_set()
            .into_iter()
            .filter_map(|id| self.store.get(id).map(|o| (id, o.position())))
            .collect();

        tracing::debug!("Pointer move started at {}", anchor);
        self.interaction = InteractionState::Moving(MoveSession::pointer(anchor, origins));
    }

    fn drag_selection_to(&mut self, pos: Point) {
        let Some(session) = self
            .interaction
            .session()
            .filter(|s| s.source == MoveSource::Pointer)
        else {
            return;
        };

        let delta = pos - session.anchor;
        let placements: Vec<(ObjectId, Point)> = session
            .origins
            .iter()
            .map(|(id, origin)| (*id, origin.translated(delta.x, delta.y)))
            .collect();

        self.place_objects(&placements);
        self.update_layer_rects();
    }

    pub fn mouse_release(&mut self, pos: Point, button: MouseButton) {
        let primary = button == MouseButton::Primary;

        if primary && self.config.interaction.corner_move {
            self.auto_scroll.enable(false, &mut self.scheduler);
        }

        if primary && self.selected_item_count() > 0 && self.interaction.is_moving() {
            self.finish_objects_move(pos);
        } else if let Some(area) = self.interaction.rubber_band().filter(|_| primary) {
            self.block_item_signals();
            self.select_objects_in_area(area);
            self.unblock_item_signals();
            self.interaction = InteractionState::Idle;

            if self.selected_item_count() > 0 {
                self.emit(SceneEvent::ObjectsSelectedInRange);
            }
        }

        if primary {
            self.press_point = Point::NAN;
            self.press_grab = None;
        }
    }

    /// Reports the double-clicked object: the single selected object, or
    /// the container of the single selected child.
    pub fn mouse_double_click(&mut self, button: MouseButton) {
        let object = if self.selected_item_count() == 1
            && button == MouseButton::Primary
            && self.relationship_line.is_none()
        {
            self.selection
                .selected()
                .first()
                .or_else(|| self.selection.containers_with_child_selection().first())
                .copied()
        } else {
            None
        };

        self.emit(SceneEvent::ObjectDoubleClicked { object });
    }

    /// Arrow key press. Returns true if the key was consumed.
    pub fn key_press(&mut self, key: ArrowKey, modifiers: Modifiers) -> bool {
        if self.selected_item_count() == 0 {
            return false;
        }

        if !self.interaction.is_moving() {
            let center = self.items_bounding_rect(true, false).center();
            self.interaction = InteractionState::Moving(MoveSession::keyboard(center));

            // a pending settle means the undo checkpoint was already taken
            if !self.scheduler.is_active(TimerKind::MoveSettle) {
                self.emit(SceneEvent::ObjectsMoved { settled: false });
            }
        }

        let (ux, uy) = key.unit_delta();
        let factor = ArrowKey::step_factor(modifiers);
        self.move_selection_by(ux * factor, uy * factor);
        self.update_layer_rects();
        self.adjust_scene_position_on_key(key);
        true
    }

    /// Arrow key release. Auto-repeat releases are ignored; a real release
    /// arms the settle timer that finalizes the move.
    pub fn key_release(&mut self, key: ArrowKey, auto_repeat: bool) -> bool {
        if auto_repeat || self.selected_item_count() == 0 {
            return false;
        }

        if self.interaction.is_moving() {
            self.scheduler.start(TimerKind::MoveSettle);
            self.adjust_scene_position_on_key(key);
        }
        true
    }

    /// Fires every due timer. Returns the timers that fired.
    pub fn process_timers(&mut self) -> Vec<TimerKind> {
        let fired = self.scheduler.due();

        for kind in &fired {
            match kind {
                TimerKind::MoveSettle => {
                    self.scheduler.stop(TimerKind::MoveSettle);
                    if self.interaction.is_moving() {
                        let center = self.items_bounding_rect(true, false).center();
                        self.finish_objects_move(center);
                    }
                }
                TimerKind::CornerHover => self.auto_scroll.enable(true, &mut self.scheduler),
                TimerKind::AutoScrollTick => {
                    let view: Option<&mut dyn HostView> = match self.active_view_index() {
                        Some(idx) => Some(self.views[idx].1.as_mut()),
                        None => None,
                    };
                    self.auto_scroll.tick(view, &mut self.scheduler);
                }
            }
        }

        fired
    }

    /// Scrolls the active view so the selection stays visible after a
    /// keyboard step. Moving right or down past the canvas extent grows it.
    pub fn adjust_scene_position_on_key(&mut self, key: ArrowKey) {
        let Some(idx) = self.active_view_index() else {
            return;
        };
        let brect = self.items_bounding_rect(true, false);
        let view_rect = self.views[idx].1.visible_rect();
        let mut scroll = self.views[idx].1.scroll_position();

        match key {
            ArrowKey::Right if view_rect.right() < brect.right() => {
                self.set_scene_rect(Rect::new(
                    0.0,
                    0.0,
                    self.scene_rect.width.max(brect.right()),
                    self.scene_rect.height,
                ));
                scroll.x += 2.0 * (brect.right() - view_rect.right());
            }
            ArrowKey::Left if view_rect.left() > brect.left() => {
                scroll.x -= 2.0 * (view_rect.left() - brect.left());
            }
            ArrowKey::Down if view_rect.bottom() < brect.bottom() => {
                self.set_scene_rect(Rect::new(
                    0.0,
                    0.0,
                    self.scene_rect.width,
                    self.scene_rect.height.max(brect.bottom()),
                ));
                scroll.y += 2.0 * (brect.bottom() - view_rect.bottom());
            }
            ArrowKey::Up if view_rect.top() > brect.top() => {
                scroll.y -= 2.0 * (view_rect.top() - brect.top());
            }
            _ => return,
        }

        self.views[idx].1.set_scroll_position(scroll);
    }

    /// Shows or hides the relationship preview line. A non-NaN `start`
    /// restarts the line there.
    pub fn show_relationship_line(&mut self, visible: bool, start: Point) {
        let start = if start.is_nan() {
            self.relationship_line.map(|l| l.start).unwrap_or_default()
        } else {
            start
        };

        self.relationship_line = visible.then_some(RelationshipLine { start, end: start });
        if visible {
            // endpoints are picked, not dragged
            self.press_grab = None;
        }
    }

    pub fn enable_range_selection(&mut self, enable: bool) {
        self.config.interaction.range_selection_enabled = enable;
        if !enable {
            self.cancel_range_selection();
        }
    }

    pub fn is_range_selection_enabled(&self) -> bool {
        self.config.interaction.range_selection_enabled
    }

    pub fn set_invert_range_selection_trigger(&mut self, invert: bool) {
        self.config.interaction.invert_range_selection_trigger = invert;
    }

    pub fn set_corner_move_enabled(&mut self, enable: bool) {
        self.config.interaction.corner_move = enable;
        if !enable {
            self.auto_scroll.enable(false, &mut self.scheduler);
        }
    }
}
