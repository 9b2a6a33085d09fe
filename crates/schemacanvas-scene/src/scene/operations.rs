//! Object placement, move finalization, grid alignment, selection and
//! print tiling.

use super::DiagramScene;
use crate::grid::GridSnapper;
use crate::interaction::InteractionState;
use crate::object::{LabelKind, ObjectKind, SpatialObject};
use crate::pagination::{PrintLayout, PrintPaginator};
use crate::scheduler::TimerKind;
use schemacanvas_core::{ChildRef, LayerId, ObjectId, Point, Rect, SceneError, SceneEvent, Size};
use std::collections::BTreeSet;

impl DiagramScene {
    // Placement

    /// Places an object on the scene and returns its id.
    ///
    /// Relationship endpoints, parent and schema must already be placed.
    /// The object starts unselected; its visibility follows the active
    /// layers (relationships follow their endpoints).
    pub fn add_object(&mut self, mut object: SpatialObject) -> Result<ObjectId, SceneError> {
        let pos = object.position;
        let size = object.size;
        if !(pos.x.is_finite() && pos.y.is_finite() && size.width.is_finite() && size.height.is_finite())
        {
            return Err(SceneError::InvalidGeometry {
                reason: format!("{} at {} has non-finite geometry", object.kind(), pos),
            });
        }

        if let Some(rel) = object.relationship_data() {
            for end in [rel.source, rel.destination] {
                if !self.store.contains(end) {
                    return Err(SceneError::UnknownObject(end));
                }
            }
        }
        if let Some(parent) = object.parent {
            if !self.store.contains(parent) {
                return Err(SceneError::UnknownObject(parent));
            }
        }
        if let Some(schema) = object.schema {
            self.expect_kind(schema, ObjectKind::Schema)?;
        }
        if let Some(bad) = object.layers().iter().find(|l| !self.layers.is_valid(**l)) {
            return Err(SceneError::InvalidLayer {
                index: *bad,
                count: self.layers.len(),
            });
        }

        let kind = object.kind();
        object.selected = false;
        object.visible = if object.parent.is_some() || kind.is_relationship() {
            true
        } else {
            self.layers.is_any_active(object.layers()) && object.is_rect_visible()
        };
        let schema = object.schema;

        let id = self.store.insert(object);
        if kind.is_relationship() {
            self.refresh_relationship(id);
            self.refresh_relationship_visibility();
        }
        if let Some(schema) = schema.filter(|_| kind.is_table_like()) {
            self.refresh_schema(schema);
        }
        if kind.has_layer_decoration() {
            self.update_layer_rects();
        }

        tracing::debug!("{} {} added", kind, id);
        Ok(id)
    }

    /// Removes an object. Relationships attached to it go with it.
    pub fn remove_object(&mut self, id: ObjectId) -> Result<SpatialObject, SceneError> {
        let object = self.store.remove(id).ok_or(SceneError::UnknownObject(id))?;
        self.forget(id);

        for rel in self.store.relationships_of(id) {
            self.store.remove(rel);
            self.forget(rel);
        }

        for other in self.store.iter_mut() {
            if other.parent == Some(id) {
                other.parent = None;
            }
            if other.schema == Some(id) {
                other.schema = None;
            }
        }

        if let Some(schema) = object.schema.filter(|_| object.kind().is_table_like()) {
            self.refresh_schema(schema);
        }
        if object.kind().has_layer_decoration() {
            self.update_layer_rects();
        }

        tracing::debug!("{} {} removed", object.kind(), id);
        Ok(object)
    }

    fn forget(&mut self, id: ObjectId) {
        self.selection.forget(id);
        if self.press_grab == Some(id) {
            self.press_grab = None;
        }
    }

    fn expect_kind(&self, id: ObjectId, expected: ObjectKind) -> Result<&SpatialObject, SceneError> {
        let obj = self.store.get(id).ok_or(SceneError::UnknownObject(id))?;
        if obj.kind() != expected {
            return Err(SceneError::InvalidKind {
                object: id,
                kind: obj.kind().to_string(),
                expected: expected.to_string(),
            });
        }
        Ok(obj)
    }

    fn expect_relationship(&self, id: ObjectId) -> Result<&SpatialObject, SceneError> {
        let obj = self.store.get(id).ok_or(SceneError::UnknownObject(id))?;
        if !obj.kind().is_relationship() {
            return Err(SceneError::InvalidKind {
                object: id,
                kind: obj.kind().to_string(),
                expected: ObjectKind::Relationship.to_string(),
            });
        }
        Ok(obj)
    }

    /// Moves an object to `position`. Schemas carry their members along.
    pub fn move_object(&mut self, id: ObjectId, position: Point) -> Result<(), SceneError> {
        let obj = self.store.get(id).ok_or(SceneError::UnknownObject(id))?;
        if obj.kind().is_relationship() {
            return Err(SceneError::InvalidKind {
                object: id,
                kind: obj.kind().to_string(),
                expected: "placeable object".to_string(),
            });
        }

        let delta = position - obj.position;
        self.translate_objects(&[id], delta.x, delta.y);
        self.update_layer_rects();
        Ok(())
    }

    pub fn set_object_size(&mut self, id: ObjectId, size: Size) -> Result<(), SceneError> {
        let obj = self.store.get_mut(id).ok_or(SceneError::UnknownObject(id))?;
        if obj.kind().is_relationship() {
            return Err(SceneError::InvalidKind {
                object: id,
                kind: obj.kind().to_string(),
                expected: "placeable object".to_string(),
            });
        }

        obj.size = size;
        let schema = if obj.kind().is_table_like() {
            obj.schema
        } else {
            None
        };
        self.refresh_relationships_of(&[id]);
        if let Some(schema) = schema {
            self.refresh_schema(schema);
        }
        self.update_layer_rects();
        Ok(())
    }

    /// Replaces an object's layer membership and re-evaluates its
    /// visibility.
    pub fn set_object_layers(&mut self, id: ObjectId, layers: &[LayerId]) -> Result<(), SceneError> {
        if let Some(bad) = layers.iter().find(|l| !self.layers.is_valid(**l)) {
            return Err(SceneError::InvalidLayer {
                index: *bad,
                count: self.layers.len(),
            });
        }

        let obj = self.store.get(id).ok_or(SceneError::UnknownObject(id))?;
        if obj.kind().is_relationship() {
            return Err(SceneError::InvalidKind {
                object: id,
                kind: obj.kind().to_string(),
                expected: "layered object".to_string(),
            });
        }

        let top_level = obj.is_top_level();
        if let Some(obj) = self.store.get_mut(id) {
            obj.set_layers(layers.iter().copied());
        }
        if top_level {
            let visible = self
                .store
                .get(id)
                .is_some_and(|o| self.layers.is_any_active(o.layers()) && o.is_rect_visible());
            if let Some(obj) = self.store.get_mut(id) {
                obj.visible = visible;
            }
        }

        self.refresh_relationship_visibility();
        self.update_layer_rects();
        Ok(())
    }

    /// Replaces a relationship's waypoints and reconfigures its line.
    pub fn set_waypoints(&mut self, id: ObjectId, points: Vec<Point>) -> Result<(), SceneError> {
        self.expect_relationship(id)?;
        if let Some(rel) = self.store.get_mut(id).and_then(|o| o.relationship_data_mut()) {
            rel.waypoints = points;
        }
        self.refresh_relationship(id);
        Ok(())
    }

    pub fn set_label_position(
        &mut self,
        id: ObjectId,
        label: LabelKind,
        position: Option<Point>,
    ) -> Result<(), SceneError> {
        self.expect_relationship(id)?;
        if let Some(rel) = self.store.get_mut(id).and_then(|o| o.relationship_data_mut()) {
            rel.labels[label.index()] = position;
        }
        self.refresh_relationship(id);
        Ok(())
    }

    /// Recomputes a relationship's line box.
    pub fn configure_relationship_line(&mut self, id: ObjectId) -> Result<(), SceneError> {
        self.expect_relationship(id)?;
        self.refresh_relationship(id);
        Ok(())
    }

    /// Shows or hides a schema box. A shown box still needs an active layer.
    pub fn set_schema_rect_visible(&mut self, id: ObjectId, visible: bool) -> Result<(), SceneError> {
        self.expect_kind(id, ObjectKind::Schema)?;
        let layers_active = self
            .store
            .get(id)
            .is_some_and(|o| self.layers.is_any_active(o.layers()));

        if let Some(obj) = self.store.get_mut(id) {
            if let Some(data) = obj.schema_data_mut() {
                data.rect_visible = visible;
            }
            obj.visible = visible && layers_active;
        }
        Ok(())
    }

    /// Flags a schema as modified and refits its box around its members.
    pub fn mark_schema_modified(&mut self, id: ObjectId) -> Result<(), SceneError> {
        self.expect_kind(id, ObjectKind::Schema)?;
        if let Some(data) = self.store.get_mut(id).and_then(|o| o.schema_data_mut()) {
            data.modified = true;
        }
        self.refresh_schema(id);
        self.emit(SceneEvent::ObjectModified { object: id });
        Ok(())
    }

    // Moves

    /// Objects a move of the current selection displaces: selected,
    /// unprotected, non-relationship objects plus the members of selected
    /// schemas.
    pub(crate) fn move_set(&self) -> Vec<ObjectId> {
        let mut set: Vec<ObjectId> = Vec::new();
        for id in self.selection.selected() {
            let Some(obj) = self.store.get(*id) else {
                continue;
            };
            if obj.kind().is_relationship() || obj.is_protected() {
                continue;
            }
            set.push(*id);
            if obj.kind().is_schema() {
                set.extend(
                    self.store
                        .schema_members(*id)
                        .into_iter()
                        .filter(|m| self.store.get(*m).is_some_and(|o| !o.is_protected())),
                );
            }
        }
        let mut seen = BTreeSet::new();
        set.retain(|id| seen.insert(*id));
        set
    }

    /// Sets absolute positions, then follows up on attached relationships and
    /// the schemas of moved tables.
    pub(crate) fn place_objects(&mut self, placements: &[(ObjectId, Point)]) {
        let mut schemas = BTreeSet::new();
        for (id, pos) in placements {
            if let Some(obj) = self.store.get_mut(*id) {
                obj.position = *pos;
                if obj.kind().is_table_like() {
                    schemas.extend(obj.schema);
                }
            }
        }

        let ids: Vec<ObjectId> = placements.iter().map(|(id, _)| *id).collect();
        self.refresh_relationships_of(&ids);
        for schema in schemas {
            self.refresh_schema(schema);
        }
    }

    /// Translates objects; schemas drag their members along.
    fn translate_objects(&mut self, ids: &[ObjectId], dx: f64, dy: f64) {
        let mut targets: Vec<ObjectId> = ids.to_vec();
        for id in ids {
            if self.store.get(*id).is_some_and(|o| o.kind().is_schema()) {
                targets.extend(self.store.schema_members(*id));
            }
        }
        let mut seen = BTreeSet::new();
        targets.retain(|id| seen.insert(*id));

        let placements: Vec<(ObjectId, Point)> = targets
            .iter()
            .filter_map(|id| self.store.get(*id))
            .map(|o| (o.id(), o.position.translated(dx, dy)))
            .collect();
        self.place_objects(&placements);
    }

    /// Moves the selection by a keyboard step.
    pub(crate) fn move_selection_by(&mut self, dx: f64, dy: f64) {
        let placements: Vec<(ObjectId, Point)> = self
            .move_set()
            .iter()
            .filter_map(|id| self.store.get(*id))
            .map(|o| (o.id(), o.position.translated(dx, dy)))
            .collect();
        self.place_objects(&placements);
    }

    /// Settles the current move gesture at `end`.
    ///
    /// Positions are snapped to the grid (or clamped to the positive
    /// quadrant). Waypoints of moved relationships, and of unselected
    /// relationships routed inside a moved schema, follow the gesture delta
    /// when more than one item takes part. The canvas extent grows to fit
    /// the new content.
    pub fn finish_objects_move(&mut self, end: Point) {
        let selected: Vec<ObjectId> = self.selection.selected().to_vec();
        let mut tables: BTreeSet<ObjectId> = BTreeSet::new();
        let mut routed: Vec<ObjectId> = Vec::new();

        for id in &selected {
            let Some(obj) = self.store.get(*id) else {
                continue;
            };
            if obj.kind().is_table_like() {
                tables.insert(*id);
            } else if obj.kind().is_schema() && !obj.is_protected() {
                routed.extend(self.store.relationships_in_schema(*id).into_iter().filter(|rel| {
                    self.store
                        .get(*rel)
                        .is_some_and(|r| !r.is_selected() && !r.waypoints().is_empty())
                }));
                tables.extend(self.store.schema_members(*id));
            }
        }

        let mut items = selected;
        items.extend(routed);

        let anchor = self.interaction.anchor();
        let (dx, dy) = if anchor.is_nan() || end.is_nan() {
            (0.0, 0.0)
        } else {
            (end.x - anchor.x, end.y - anchor.y)
        };
        let align = self.config.grid.align_objects_to_grid;
        let grid = self.grid;
        let multiple = items.len() > 1;
        let mut moved_rels = Vec::new();

        for id in &items {
            let Some(obj) = self.store.get_mut(*id) else {
                continue;
            };
            if !obj.kind().is_relationship() {
                obj.position = if align {
                    grid.snap_point(obj.position)
                } else {
                    obj.position.clamped_non_negative()
                };
            } else if multiple {
                if let Some(rel) = obj.relationship_data_mut().filter(|r| !r.waypoints.is_empty()) {
                    for p in rel.waypoints.iter_mut() {
                        *p = p.translated(dx, dy);
                        if align {
                            *p = grid.snap_point(*p);
                        }
                    }
                    moved_rels.push(*id);
                }
            }
        }
        for rel in moved_rels {
            self.refresh_relationship(rel);
        }

        let mut schemas = BTreeSet::new();
        for id in &tables {
            if let Some(obj) = self.store.get_mut(*id) {
                if align {
                    obj.position = grid.snap_point(obj.position);
                }
                schemas.extend(obj.schema);
            }
        }
        let placed: Vec<ObjectId> = items.iter().chain(tables.iter()).copied().collect();
        self.refresh_relationships_of(&placed);
        for schema in schemas {
            if let Err(e) = self.mark_schema_modified(schema) {
                tracing::warn!("Cannot refresh schema after move: {}", e);
            }
        }

        self.interaction = InteractionState::Idle;
        self.update_layer_rects();

        let content = self.items_bounding_rect(false, true);
        let margin = 2.0 * f64::from(self.grid.size());
        let grown = Rect::new(
            0.0,
            0.0,
            (content.right() + margin).max(self.scene_rect.width),
            (content.bottom() + margin).max(self.scene_rect.height),
        );
        self.set_scene_rect(grown);

        tracing::debug!("Move finished with delta ({:.1}, {:.1})", dx, dy);
        self.emit(SceneEvent::ObjectsMoved { settled: true });
    }

    /// Snaps every top-level object to the grid.
    ///
    /// Relationships snap their waypoints and labels instead of a position.
    /// Touched schemas are marked modified.
    pub fn align_objects_to_grid(&mut self) {
        let grid = self.grid;
        let mut rels = Vec::new();
        let mut schemas = Vec::new();

        for obj in self.store.top_level_mut() {
            match obj.kind() {
                k if k.is_relationship() => {
                    if let Some(rel) = obj.relationship_data_mut() {
                        for p in rel.waypoints.iter_mut() {
                            *p = grid.snap_point(*p);
                        }
                        for label in rel.labels.iter_mut().flatten() {
                            *label = grid.snap_point(*label);
                        }
                    }
                    rels.push(obj.id());
                }
                ObjectKind::Schema => schemas.push(obj.id()),
                _ => obj.position = grid.snap_point(obj.position),
            }
        }

        for rel in rels {
            self.refresh_relationship(rel);
        }
        for schema in schemas {
            if let Err(e) = self.mark_schema_modified(schema) {
                tracing::warn!("Cannot refresh schema after alignment: {}", e);
            }
        }
        self.update_layer_rects();
        tracing::info!("Objects aligned to a {} unit grid", grid.size());
    }

    // Geometry queries

    /// Bounding rectangle of the visible objects (or only the selected
    /// ones), optionally including layer outlines.
    pub fn items_bounding_rect(&self, selected_only: bool, include_layer_rects: bool) -> Rect {
        let calc = self.bounds_calculator();
        if selected_only {
            let selected = self
                .selection
                .selected()
                .iter()
                .filter_map(|id| self.store.get(*id));
            calc.compute(selected, include_layer_rects)
        } else {
            calc.compute(self.store.top_level(), include_layer_rects)
        }
    }

    pub fn align_point_to_grid(&self, point: Point) -> Point {
        self.grid.snap_point(point)
    }

    /// Sets the grid size, raised to the minimum if needed.
    pub fn set_grid_size(&mut self, size: u32) {
        self.grid = GridSnapper::new(size);
        self.config.grid.set_size(size);
    }

    pub fn set_align_objects_to_grid(&mut self, align: bool) {
        self.config.grid.align_objects_to_grid = align;
    }

    /// Sets the logical canvas extent. The canvas is always anchored at the
    /// origin; only the size of `rect` is used.
    pub fn set_scene_rect(&mut self, rect: Rect) {
        self.scene_rect = Rect::new(0.0, 0.0, rect.width.max(0.0), rect.height.max(0.0));
    }

    /// Tiles the occupied canvas into printable pages at `scale`.
    pub fn pages_for_printing(&self, scale: f64) -> PrintLayout {
        let content = self.items_bounding_rect(false, true);
        let canvas = Rect::new(0.0, 0.0, self.scene_rect.right(), self.scene_rect.bottom())
            .united(&Rect::new(0.0, 0.0, content.right(), content.bottom()));

        let calc = self.bounds_calculator();
        let footprints: Vec<Rect> = self
            .store
            .top_level()
            .filter(|o| o.is_visible())
            .map(|o| calc.footprint(o, true))
            .collect();

        PrintPaginator::new(&self.config.page, &self.config.print).paginate(
            canvas,
            &footprints,
            scale,
        )
    }

    // Selection

    /// Selects or deselects one object. Returns whether the flag changed.
    pub fn select_object(&mut self, id: ObjectId, selected: bool) -> Result<bool, SceneError> {
        if !self.store.contains(id) {
            return Err(SceneError::UnknownObject(id));
        }
        let changed = self.selection.set_selected(&mut self.store, id, selected);
        if changed {
            self.emit_selection_changes(&[(id, selected)]);
        }
        Ok(changed)
    }

    /// Deselects every object and child item.
    pub fn clear_selection(&mut self) {
        let changes = self.selection.clear(&mut self.store);
        self.emit_selection_changes(&changes);
        self.clear_children_selection();
    }

    pub(crate) fn clear_children_selection(&mut self) {
        if self.selection.clear_children(&mut self.store) {
            self.emit_object_event(SceneEvent::ChildrenSelectionChanged);
        }
    }

    /// Replaces the selection with the visible objects intersecting `area`.
    pub fn select_objects_in_area(&mut self, area: Rect) {
        let changes = self.selection.select_in_area(&mut self.store, &area);
        self.emit_selection_changes(&changes);
    }

    /// Selects or deselects a child item (a column inside a table, ...).
    pub fn set_child_selected(&mut self, child: ChildRef, selected: bool) -> Result<(), SceneError> {
        let obj = self
            .store
            .get(child.container)
            .ok_or(SceneError::UnknownObject(child.container))?;
        if !obj.kind().is_table_like() {
            return Err(SceneError::InvalidKind {
                object: child.container,
                kind: obj.kind().to_string(),
                expected: "container".to_string(),
            });
        }
        if child.index >= obj.children().len() {
            return Err(SceneError::UnknownChild(child));
        }

        if self.selection.set_child_selected(&mut self.store, child, selected) {
            self.emit_object_event(SceneEvent::ChildrenSelectionChanged);
        }
        Ok(())
    }

    /// Asks the host for a context menu over a child item.
    pub fn request_child_popup(&self, child: Option<ChildRef>) {
        self.emit(SceneEvent::PopupMenuRequested { child });
    }

    /// Whether the keyboard settle timer is waiting to finish a move.
    pub fn is_move_settle_pending(&self) -> bool {
        self.scheduler.is_active(TimerKind::MoveSettle)
    }
}
