//! Selection bookkeeping.
//!
//! Top-level selection and child selection (columns inside a table) are
//! tracked separately; a container can hold a child selection while not
//! being selected itself.

use crate::store::ObjectStore;
use schemacanvas_core::{ChildRef, ObjectId, Rect};

/// A change of one object's selection flag.
pub type SelectionChange = (ObjectId, bool);

/// Tracks which objects are selected.
///
/// Two sets are kept apart:
/// - **Top-level selection**: placed objects selected on the canvas
/// - **Child selection**: containers (tables, views) with selected children
///   such as columns
///
/// A container may have only child selection and no top-level selection.
/// The `selected` flags on the objects and children are kept in sync with
/// these sets; every method returns the flag changes it made so the scene
/// can notify observers.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    /// Top-level selection, in selection order
    selected: Vec<ObjectId>,
    /// Containers that currently have at least one selected child
    child_containers: Vec<ObjectId>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected top-level objects, in selection order.
    pub fn selected(&self) -> &[ObjectId] {
        &self.selected
    }

    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selected.contains(&id)
    }

    /// True when no top-level object is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Containers with a child selection.
    pub fn containers_with_child_selection(&self) -> &[ObjectId] {
        &self.child_containers
    }

    /// Selected items, counting selected children individually.
    pub fn count(&self, store: &ObjectStore) -> usize {
        let children: usize = self
            .child_containers
            .iter()
            .filter_map(|id| store.get(*id))
            .map(|o| o.selected_children().count())
            .sum();
        self.selected.len() + children
    }

    /// True when children are selected but no top-level object is.
    pub fn has_only_children_selection(&self) -> bool {
        self.selected.is_empty() && !self.child_containers.is_empty()
    }

    /// Selects or deselects one object. Disabled or unknown objects are
    /// ignored. Returns true if the flag changed.
    pub fn set_selected(&mut self, store: &mut ObjectStore, id: ObjectId, selected: bool) -> bool {
        let Some(obj) = store.get_mut(id) else {
            return false;
        };
        if obj.selected == selected || (selected && !obj.enabled) {
            return false;
        }

        obj.selected = selected;
        if selected {
            self.selected.push(id);
        } else {
            self.selected.retain(|s| *s != id);
        }
        true
    }

    /// Deselects every top-level object.
    pub fn clear(&mut self, store: &mut ObjectStore) -> Vec<SelectionChange> {
        let changes: Vec<SelectionChange> = self.selected.iter().map(|id| (*id, false)).collect();
        for id in self.selected.drain(..) {
            if let Some(obj) = store.get_mut(id) {
                obj.selected = false;
            }
        }
        changes
    }

    /// Replaces the selection with the visible objects intersecting `area`.
    pub fn select_in_area(&mut self, store: &mut ObjectStore, area: &Rect) -> Vec<SelectionChange> {
        let hits = store.objects_in(area);
        let previous = self.selected.clone();
        self.clear(store);

        let mut changes: Vec<SelectionChange> = previous
            .iter()
            .filter(|id| !hits.contains(id))
            .map(|id| (*id, false))
            .collect();

        for id in hits {
            if self.set_selected(store, id, true) && !previous.contains(&id) {
                changes.push((id, true));
            }
        }
        changes
    }

    /// Sets the selection flag of one child item. Returns true if it changed.
    pub fn set_child_selected(
        &mut self,
        store: &mut ObjectStore,
        child: ChildRef,
        selected: bool,
    ) -> bool {
        let Some(item) = store
            .get_mut(child.container)
            .and_then(|o| o.children_mut())
            .and_then(|children| children.get_mut(child.index))
        else {
            return false;
        };
        if item.selected == selected {
            return false;
        }
        item.selected = selected;

        let has_selection = store
            .get(child.container)
            .is_some_and(|o| o.has_selected_children());
        if has_selection {
            if !self.child_containers.contains(&child.container) {
                self.child_containers.push(child.container);
            }
        } else {
            self.child_containers.retain(|c| *c != child.container);
        }
        true
    }

    /// Clears every child selection. Returns true if anything was selected.
    pub fn clear_children(&mut self, store: &mut ObjectStore) -> bool {
        let had_any = !self.child_containers.is_empty();
        for id in self.child_containers.drain(..) {
            if let Some(children) = store.get_mut(id).and_then(|o| o.children_mut()) {
                for child in children.iter_mut() {
                    child.selected = false;
                }
            }
        }
        had_any
    }

    /// Forgets an object that is leaving the scene.
    pub fn forget(&mut self, id: ObjectId) {
        self.selected.retain(|s| *s != id);
        self.child_containers.retain(|c| *c != id);
    }
}
