//! Layer operations on the scene.
//!
//! The registry keeps names and the active set; these methods keep object
//! membership, visibility and decorations consistent with it.

use super::DiagramScene;
use crate::layers::LayerDecoration;
use schemacanvas_core::constants::DEFAULT_LAYER;
use schemacanvas_core::{LayerId, SceneEvent};

impl DiagramScene {
    /// Layer names, indexed by layer id.
    pub fn layers(&self) -> &[String] {
        self.layers.names()
    }

    /// Active layer names, in activation order.
    pub fn active_layers(&self) -> &[String] {
        self.layers.active_names()
    }

    pub fn active_layer_indices(&self) -> Vec<LayerId> {
        self.layers.active_indices()
    }

    pub fn layer_decorations(&self) -> &[LayerDecoration] {
        self.layers.decorations()
    }

    pub fn is_layer_active(&self, index: LayerId) -> bool {
        self.layers.is_active(index)
    }

    pub fn is_layer_name_active(&self, name: &str) -> bool {
        self.layers.is_name_active(name)
    }

    /// Whether any of `indices` names an active layer.
    pub fn is_any_layer_active(&self, indices: &[LayerId]) -> bool {
        self.layers.is_any_active(indices)
    }

    /// Adds a layer and returns its final (sanitized, unique) name.
    ///
    /// Returns an empty string and changes nothing when `name` is empty.
    pub fn add_layer(&mut self, name: &str) -> String {
        let name = self.layers.add(name);
        if !name.is_empty() {
            tracing::debug!("Layer '{}' added", name);
            self.emit(SceneEvent::LayersChanged);
        }
        name
    }

    /// Replaces every layer with `names`. The first name goes to the default
    /// layer.
    pub fn add_layers(&mut self, names: &[String], reset_objects_layers: bool) {
        let Some((first, rest)) = names.split_first() else {
            return;
        };

        self.remove_layers(reset_objects_layers);
        if self.layers.default_name() != first {
            self.rename_layer(DEFAULT_LAYER, first);
        }
        for name in rest {
            self.add_layer(name);
        }
    }

    /// Renames a layer and returns its resulting name, or an empty string
    /// for an empty name or unknown index.
    pub fn rename_layer(&mut self, index: LayerId, name: &str) -> String {
        let outcome = self.layers.rename(index, name);
        if let crate::layers::RenameOutcome::Renamed(new_name) = &outcome {
            tracing::debug!("Layer {} renamed to '{}'", index, new_name);
            self.update_layer_rects();
            self.emit(SceneEvent::LayersChanged);
        }
        outcome.name().to_string()
    }

    /// Removes a layer by name. The default layer cannot be removed.
    ///
    /// Objects in the removed layer move to the default layer; higher layer
    /// ids shift down by one.
    pub fn remove_layer(&mut self, name: &str) {
        let Some(index) = self.layers.index_of(name).filter(|idx| *idx != DEFAULT_LAYER) else {
            return;
        };

        self.rehome_layer_members(index);
        self.layers.remove(name);
        self.refresh_relationship_visibility();
        self.update_layer_rects();

        tracing::info!("Layer '{}' removed", name);
        self.emit(SceneEvent::LayersChanged);
    }

    fn rehome_layer_members(&mut self, removed: LayerId) {
        let default_active = self.layers.is_active(DEFAULT_LAYER);

        // Parented objects carry layer ids too; only top-level visibility
        // follows the default layer.
        for obj in self.store.iter_mut() {
            if obj.is_in_layer(removed) {
                obj.remove_from_layer(removed);
                obj.add_to_layer(DEFAULT_LAYER);
                if obj.parent().is_none() {
                    obj.visible = default_active;
                }
            }

            let shifted: Vec<LayerId> = obj
                .layers()
                .iter()
                .map(|l| if *l > removed { l - 1 } else { *l })
                .collect();
            obj.set_layers(shifted);
        }

        self.emit(SceneEvent::ObjectsMovedLayer);
    }

    /// Drops every layer except the default one.
    ///
    /// With `reset_objects_layers`, every object goes back to the default
    /// layer only; top-level objects are shown if that layer is active.
    pub fn remove_layers(&mut self, reset_objects_layers: bool) {
        let default_active = self.layers.clear_to_default();

        if reset_objects_layers {
            for obj in self.store.iter_mut() {
                if !obj.kind().is_relationship() {
                    obj.reset_layers();
                }
                if obj.parent().is_none() {
                    obj.visible = default_active;
                }
            }
            self.refresh_relationship_visibility();
        }

        self.emit(SceneEvent::LayersChanged);
        self.update_active_layers();
    }

    /// Makes exactly the layers at `indices` active and updates object
    /// visibility. An empty list hides every object.
    pub fn set_active_layers(&mut self, indices: &[LayerId]) {
        if indices.is_empty() {
            for obj in self.store.top_level_mut() {
                obj.visible = false;
            }
            self.layers.set_active(&[]);
        } else {
            for obj in self
                .store
                .top_level_mut()
                .filter(|o| !o.kind().is_relationship())
            {
                let in_layer = indices.iter().any(|idx| obj.is_in_layer(*idx));
                if !obj.visible && in_layer {
                    if obj.is_rect_visible() {
                        obj.visible = true;
                    }
                } else if obj.visible && !in_layer {
                    obj.visible = false;
                }
            }
            self.layers.set_active(indices);
            self.refresh_relationship_visibility();
        }

        tracing::debug!("Active layers: {:?}", self.layers.active_names());
        self.update_layer_rects();
        self.emit(SceneEvent::ActiveLayersChanged);
    }

    /// Same as [`set_active_layers`](Self::set_active_layers), by name.
    /// Unknown names are ignored.
    pub fn set_active_layers_by_name(&mut self, names: &[String]) {
        let indices = self.layers.indices_of(names);
        self.set_active_layers(&indices);
    }

    /// Re-applies the current active set.
    pub fn update_active_layers(&mut self) {
        let indices = self.layers.active_indices();
        self.set_active_layers(&indices);
    }

    pub fn set_layer_rects_visible(&mut self, visible: bool) {
        self.layers.set_rects_visible(visible);
        self.config.layers.show_layer_rects = visible;
        self.update_layer_rects();
    }

    pub fn set_layer_names_visible(&mut self, visible: bool) {
        self.layers.set_names_visible(visible);
        self.config.layers.show_layer_names = visible;
        self.update_layer_rects();
    }

    /// Recomputes the outline drawn around each active layer.
    pub fn update_layer_rects(&mut self) {
        self.layers.update_decorations(self.store.iter());
    }
}
