//! Layer registry and per-layer decoration.
//!
//! Layers are addressed by their index in the registry. Index 0 is the
//! default layer: it can be renamed but never removed. The registry only
//! tracks names, the active set and decorations; re-homing objects after a
//! removal is done by the scene, which owns the objects.

use crate::bounds::DecorationMetrics;
use crate::object::SpatialObject;
use schemacanvas_core::constants::DEFAULT_LAYER;
use schemacanvas_core::{LayerId, Rect};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Horizontal placement of a layer name on its outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlignment {
    #[default]
    Left,
    Right,
}

/// Outline drawn around the objects of one layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayerDecoration {
    pub rects: Vec<Rect>,
    pub text: String,
    pub alignment: TextAlignment,
    pub visible: bool,
}

/// Result of a rename request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// Empty name or unknown index.
    Rejected,
    /// The sanitized name equals the current one.
    Unchanged(String),
    /// The layer now carries this name.
    Renamed(String),
}

impl RenameOutcome {
    /// The layer's name after the request, empty when rejected.
    pub fn name(&self) -> &str {
        match self {
            RenameOutcome::Rejected => "",
            RenameOutcome::Unchanged(name) | RenameOutcome::Renamed(name) => name,
        }
    }
}

/// Ordered, unique layer names plus the active (visible) subset.
#[derive(Debug, Clone)]
pub struct LayerRegistry {
    names: Vec<String>,
    active: Vec<String>,
    decorations: Vec<LayerDecoration>,
    metrics: DecorationMetrics,
}

impl LayerRegistry {
    /// Creates a registry holding only the (active) default layer.
    pub fn new(default_name: &str, metrics: DecorationMetrics) -> Self {
        let name = sanitize(default_name);
        let name = if name.is_empty() {
            schemacanvas_core::constants::DEFAULT_LAYER_NAME.to_string()
        } else {
            name
        };

        Self {
            names: vec![name.clone()],
            active: vec![name],
            decorations: vec![LayerDecoration::default()],
            metrics,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false: the default layer cannot be removed.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name(&self, index: LayerId) -> Option<&str> {
        self.names.get(index as usize).map(String::as_str)
    }

    pub fn default_name(&self) -> &str {
        &self.names[DEFAULT_LAYER as usize]
    }

    pub fn index_of(&self, name: &str) -> Option<LayerId> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| i as LayerId)
    }

    pub fn is_valid(&self, index: LayerId) -> bool {
        (index as usize) < self.names.len()
    }

    /// Active layer names, in activation order.
    pub fn active_names(&self) -> &[String] {
        &self.active
    }

    pub fn active_indices(&self) -> Vec<LayerId> {
        self.active
            .iter()
            .filter_map(|name| self.index_of(name))
            .collect()
    }

    pub fn is_active(&self, index: LayerId) -> bool {
        self.name(index)
            .is_some_and(|name| self.active.iter().any(|a| a == name))
    }

    pub fn is_name_active(&self, name: &str) -> bool {
        self.active.iter().any(|a| a == name)
    }

    /// True when at least one valid index in `indices` is active.
    pub fn is_any_active(&self, indices: &[LayerId]) -> bool {
        indices.iter().any(|idx| self.is_active(*idx))
    }

    pub fn metrics(&self) -> DecorationMetrics {
        self.metrics
    }

    pub fn set_metrics(&mut self, metrics: DecorationMetrics) {
        self.metrics = metrics;
    }

    pub fn set_rects_visible(&mut self, visible: bool) {
        self.metrics.rects_visible = visible;
    }

    pub fn set_names_visible(&mut self, visible: bool) {
        self.metrics.names_visible = visible;
    }

    pub fn decorations(&self) -> &[LayerDecoration] {
        &self.decorations
    }

    pub fn decoration(&self, index: LayerId) -> Option<&LayerDecoration> {
        self.decorations.get(index as usize)
    }

    /// Sanitizes `name` and makes it unique among the other layers.
    ///
    /// Characters other than letters, digits, spaces and underscores become
    /// `_`. Clashes get a counter suffix: `"name 2"`, `"name 3"`...
    pub fn format_name(&self, name: &str) -> String {
        self.format_name_excluding(name, None)
    }

    fn format_name_excluding(&self, name: &str, skip: Option<usize>) -> String {
        let base = sanitize(name);
        let taken = |candidate: &str| {
            self.names
                .iter()
                .enumerate()
                .any(|(i, n)| Some(i) != skip && n == candidate)
        };

        let mut candidate = base.clone();
        let mut counter = 2u32;
        while taken(&candidate) {
            candidate = format!("{} {}", base, counter);
            counter += 1;
        }
        candidate
    }

    /// Appends a layer and returns its final name, or an empty string for
    /// an empty `name`.
    pub fn add(&mut self, name: &str) -> String {
        if name.is_empty() {
            return String::new();
        }

        let name = self.format_name(name);
        self.names.push(name.clone());
        self.decorations.push(LayerDecoration::default());
        name
    }

    /// Renames the layer at `index`, rewriting its active-set entry.
    pub fn rename(&mut self, index: LayerId, name: &str) -> RenameOutcome {
        let idx = index as usize;
        if name.is_empty() || idx >= self.names.len() {
            return RenameOutcome::Rejected;
        }

        if sanitize(name) == self.names[idx] {
            return RenameOutcome::Unchanged(self.names[idx].clone());
        }

        let new_name = self.format_name_excluding(name, Some(idx));
        let old_name = std::mem::replace(&mut self.names[idx], new_name.clone());
        for active in self.active.iter_mut().filter(|a| **a == old_name) {
            *active = new_name.clone();
        }
        RenameOutcome::Renamed(new_name)
    }

    /// Removes a non-default layer by name, returning its former index.
    pub fn remove(&mut self, name: &str) -> Option<LayerId> {
        let index = self.index_of(name)?;
        if index == DEFAULT_LAYER {
            return None;
        }

        self.names.remove(index as usize);
        self.decorations.remove(index as usize);
        self.active.retain(|a| a != name);
        Some(index)
    }

    /// Drops every layer except the default one. Returns whether the default
    /// layer was active.
    pub fn clear_to_default(&mut self) -> bool {
        let default = self.default_name().to_string();
        let was_active = self.is_name_active(&default);

        self.names.truncate(1);
        self.decorations.truncate(1);
        self.active.clear();
        if was_active {
            self.active.push(default);
        }
        was_active
    }

    /// Replaces the active set with the names of the valid `indices`.
    pub fn set_active(&mut self, indices: &[LayerId]) {
        self.active = indices
            .iter()
            .filter_map(|idx| self.name(*idx).map(str::to_string))
            .fold(Vec::new(), |mut acc, name| {
                if !acc.contains(&name) {
                    acc.push(name);
                }
                acc
            });
    }

    /// Maps names to indices, dropping unknown ones.
    pub fn indices_of(&self, names: &[String]) -> Vec<LayerId> {
        names.iter().filter_map(|n| self.index_of(n)).collect()
    }

    /// Recomputes every decoration from the given objects.
    ///
    /// All decorations are hidden first; nothing else happens while layer
    /// outlines are turned off. Schemas and relationships never contribute
    /// since their boxes are large enough to swamp the outlines.
    pub fn update_decorations<'a, I>(&mut self, objects: I)
    where
        I: IntoIterator<Item = &'a SpatialObject>,
    {
        for deco in &mut self.decorations {
            deco.visible = false;
        }

        if !self.metrics.rects_visible {
            return;
        }

        let top = self.metrics.top_margin();
        let pad = self.metrics.padding;
        let mut rects: BTreeMap<LayerId, Vec<Rect>> = BTreeMap::new();

        for obj in objects
            .into_iter()
            .filter(|o| o.is_top_level() && o.kind().has_layer_decoration())
        {
            let mut brect = obj.scene_rect();
            for layer in obj.layers() {
                if !self.is_active(*layer) {
                    continue;
                }
                // each active layer nests its outline around the previous one
                brect = brect.adjusted(-pad, -top, pad, pad);
                rects.entry(*layer).or_default().push(brect);
            }
        }

        for (act_idx, name) in self.active.iter().enumerate() {
            let Some(index) = self.names.iter().position(|n| n == name) else {
                continue;
            };
            let deco = &mut self.decorations[index];
            deco.alignment = if act_idx % 2 == 0 {
                TextAlignment::Left
            } else {
                TextAlignment::Right
            };
            deco.text = if self.metrics.names_visible {
                name.clone()
            } else {
                String::new()
            };
            deco.rects = rects.remove(&(index as LayerId)).unwrap_or_default();
            deco.visible = true;
        }
    }
}

/// Replaces characters other than letters, digits, spaces and underscores.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
