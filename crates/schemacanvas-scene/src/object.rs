//! Placed graphical objects.
//!
//! A [`SpatialObject`] carries an explicit [`ObjectKind`] plus a
//! kind-specific [`ObjectPayload`]; everything kind-dependent in the scene
//! dispatches with a `match` over these two.

use schemacanvas_core::constants::DEFAULT_LAYER;
use schemacanvas_core::{ChildRef, LayerId, ObjectId, Point, Rect, Size};
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use std::fmt;

/// Kind of a placed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Table,
    ForeignTable,
    View,
    Schema,
    Relationship,
    BaseRelationship,
    Textbox,
}

impl ObjectKind {
    pub fn is_relationship(self) -> bool {
        matches!(self, ObjectKind::Relationship | ObjectKind::BaseRelationship)
    }

    /// Tables, foreign tables and views.
    pub fn is_table_like(self) -> bool {
        matches!(
            self,
            ObjectKind::Table | ObjectKind::ForeignTable | ObjectKind::View
        )
    }

    pub fn is_schema(self) -> bool {
        self == ObjectKind::Schema
    }

    /// Kinds that get a per-layer outline drawn around them.
    pub fn has_layer_decoration(self) -> bool {
        self.is_table_like() || self == ObjectKind::Textbox
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Table => write!(f, "table"),
            ObjectKind::ForeignTable => write!(f, "foreign table"),
            ObjectKind::View => write!(f, "view"),
            ObjectKind::Schema => write!(f, "schema"),
            ObjectKind::Relationship => write!(f, "relationship"),
            ObjectKind::BaseRelationship => write!(f, "base relationship"),
            ObjectKind::Textbox => write!(f, "textbox"),
        }
    }
}

/// Labels attached to a relationship line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelKind {
    SourceCardinality,
    DestinationCardinality,
    Name,
}

impl LabelKind {
    pub const ALL: [LabelKind; 3] = [
        LabelKind::SourceCardinality,
        LabelKind::DestinationCardinality,
        LabelKind::Name,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            LabelKind::SourceCardinality => 0,
            LabelKind::DestinationCardinality => 1,
            LabelKind::Name => 2,
        }
    }
}

/// Child item of a container (a column, constraint, index...).
#[derive(Debug, Clone, PartialEq)]
pub struct ChildItem {
    pub name: String,
    pub selected: bool,
}

impl ChildItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selected: false,
        }
    }
}

/// Connection and routing data of a relationship.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipData {
    pub source: ObjectId,
    pub destination: ObjectId,
    /// User-added intermediate points, in canvas coordinates.
    pub waypoints: Vec<Point>,
    /// Custom label positions; `None` keeps the label at its default spot.
    pub labels: [Option<Point>; 3],
    /// Box spanning endpoints, waypoints and labels. Recomputed by the scene.
    pub line_rect: Rect,
}

impl RelationshipData {
    pub fn label(&self, kind: LabelKind) -> Option<Point> {
        self.labels[kind.index()]
    }

    /// Whether `object` is one of the two connected objects.
    pub fn connects(&self, object: ObjectId) -> bool {
        self.source == object || self.destination == object
    }
}

/// Schema box state.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaData {
    /// Whether the schema box is drawn at all.
    pub rect_visible: bool,
    /// Set when the schema's contents changed and its box was recomputed.
    pub modified: bool,
}

/// Kind-specific data of an object.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectPayload {
    Plain,
    Container { children: Vec<ChildItem> },
    Schema(SchemaData),
    Relationship(RelationshipData),
}

/// A graphical object placed on the canvas.
#[derive(Debug, Clone)]
pub struct SpatialObject {
    pub(crate) id: ObjectId,
    kind: ObjectKind,
    pub name: String,
    pub(crate) position: Point,
    pub(crate) size: Size,
    pub(crate) parent: Option<ObjectId>,
    pub(crate) schema: Option<ObjectId>,
    pub(crate) z_order: i32,
    pub(crate) layers: SmallVec<[LayerId; 4]>,
    pub(crate) protected: bool,
    pub(crate) visible: bool,
    pub(crate) selected: bool,
    pub(crate) enabled: bool,
    pub(crate) payload: ObjectPayload,
}

impl SpatialObject {
    fn new(kind: ObjectKind, position: Point, size: Size, payload: ObjectPayload) -> Self {
        Self {
            id: ObjectId(0),
            kind,
            name: String::new(),
            position,
            size,
            parent: None,
            schema: None,
            z_order: 0,
            layers: smallvec![DEFAULT_LAYER],
            protected: false,
            visible: true,
            selected: false,
            enabled: true,
            payload,
        }
    }

    /// Table-like container (table, foreign table or view).
    ///
    /// Any other kind falls back to a plain table.
    pub fn table_like(kind: ObjectKind, position: Point, size: Size) -> Self {
        let kind = if kind.is_table_like() {
            kind
        } else {
            ObjectKind::Table
        };
        Self::new(
            kind,
            position,
            size,
            ObjectPayload::Container {
                children: Vec::new(),
            },
        )
    }

    pub fn table(position: Point, size: Size) -> Self {
        Self::table_like(ObjectKind::Table, position, size)
    }

    pub fn view(position: Point, size: Size) -> Self {
        Self::table_like(ObjectKind::View, position, size)
    }

    pub fn textbox(position: Point, size: Size) -> Self {
        Self::new(ObjectKind::Textbox, position, size, ObjectPayload::Plain)
    }

    /// Schema box. Its geometry follows its members once they are placed.
    pub fn schema(position: Point, size: Size) -> Self {
        Self::new(
            ObjectKind::Schema,
            position,
            size,
            ObjectPayload::Schema(SchemaData {
                rect_visible: true,
                modified: false,
            }),
        )
    }

    /// Relationship between two placed objects.
    pub fn relationship(source: ObjectId, destination: ObjectId) -> Self {
        Self::connector(ObjectKind::Relationship, source, destination)
    }

    /// Table-view style link (a base relationship).
    pub fn base_relationship(source: ObjectId, destination: ObjectId) -> Self {
        Self::connector(ObjectKind::BaseRelationship, source, destination)
    }

    fn connector(kind: ObjectKind, source: ObjectId, destination: ObjectId) -> Self {
        let mut obj = Self::new(
            kind,
            Point::default(),
            Size::default(),
            ObjectPayload::Relationship(RelationshipData {
                source,
                destination,
                waypoints: Vec::new(),
                labels: [None; 3],
                line_rect: Rect::default(),
            }),
        );
        obj.layers.clear();
        obj
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_schema(mut self, schema: ObjectId) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_parent(mut self, parent: ObjectId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_z_order(mut self, z_order: i32) -> Self {
        self.z_order = z_order;
        self
    }

    pub fn with_layers(mut self, layers: impl IntoIterator<Item = LayerId>) -> Self {
        self.set_layers(layers);
        self
    }

    pub fn with_protected(mut self, protected: bool) -> Self {
        self.protected = protected;
        self
    }

    pub fn with_children<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let ObjectPayload::Container { children } = &mut self.payload {
            children.extend(names.into_iter().map(ChildItem::new));
        }
        self
    }

    pub fn with_waypoints(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        if let ObjectPayload::Relationship(rel) = &mut self.payload {
            rel.waypoints = points.into_iter().collect();
        }
        self
    }

    pub fn with_rect_visible(mut self, visible: bool) -> Self {
        if let ObjectPayload::Schema(schema) = &mut self.payload {
            schema.rect_visible = visible;
        }
        self
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Top-left anchor. Relationships have no meaningful position.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }

    pub fn schema_id(&self) -> Option<ObjectId> {
        self.schema
    }

    pub fn z_order(&self) -> i32 {
        self.z_order
    }

    pub fn is_protected(&self) -> bool {
        self.protected
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn payload(&self) -> &ObjectPayload {
        &self.payload
    }

    /// Local bounding box, anchored at the origin.
    pub fn bounding_rect(&self) -> Rect {
        Rect::from_origin_size(Point::default(), self.size)
    }

    /// Footprint in canvas coordinates.
    ///
    /// Relationships use their line box instead of `position` + size.
    pub fn scene_rect(&self) -> Rect {
        match &self.payload {
            ObjectPayload::Relationship(rel) => rel.line_rect,
            _ => Rect::from_origin_size(self.position, self.size),
        }
    }

    pub fn center(&self) -> Point {
        self.scene_rect().center()
    }

    // Layer membership

    pub fn layers(&self) -> &[LayerId] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn is_in_layer(&self, layer: LayerId) -> bool {
        self.layers.contains(&layer)
    }

    /// Replaces the layer set. Non-relationship objects always keep at
    /// least the default layer.
    pub(crate) fn set_layers(&mut self, layers: impl IntoIterator<Item = LayerId>) {
        let mut list: SmallVec<[LayerId; 4]> = layers.into_iter().collect();
        list.sort_unstable();
        list.dedup();
        if list.is_empty() && !self.kind.is_relationship() {
            list.push(DEFAULT_LAYER);
        }
        self.layers = list;
    }

    pub(crate) fn add_to_layer(&mut self, layer: LayerId) {
        if let Err(pos) = self.layers.binary_search(&layer) {
            self.layers.insert(pos, layer);
        }
    }

    pub(crate) fn remove_from_layer(&mut self, layer: LayerId) {
        self.layers.retain(|l| *l != layer);
    }

    pub(crate) fn reset_layers(&mut self) {
        self.layers = smallvec![DEFAULT_LAYER];
    }

    // Kind-specific accessors

    pub fn relationship_data(&self) -> Option<&RelationshipData> {
        match &self.payload {
            ObjectPayload::Relationship(rel) => Some(rel),
            _ => None,
        }
    }

    pub(crate) fn relationship_data_mut(&mut self) -> Option<&mut RelationshipData> {
        match &mut self.payload {
            ObjectPayload::Relationship(rel) => Some(rel),
            _ => None,
        }
    }

    pub fn waypoints(&self) -> &[Point] {
        self.relationship_data()
            .map(|rel| rel.waypoints.as_slice())
            .unwrap_or(&[])
    }

    pub fn schema_data(&self) -> Option<&SchemaData> {
        match &self.payload {
            ObjectPayload::Schema(schema) => Some(schema),
            _ => None,
        }
    }

    pub(crate) fn schema_data_mut(&mut self) -> Option<&mut SchemaData> {
        match &mut self.payload {
            ObjectPayload::Schema(schema) => Some(schema),
            _ => None,
        }
    }

    /// Whether a schema box is drawn. Other kinds always report true.
    pub fn is_rect_visible(&self) -> bool {
        self.schema_data().map_or(true, |s| s.rect_visible)
    }

    pub fn children(&self) -> &[ChildItem] {
        match &self.payload {
            ObjectPayload::Container { children } => children.as_slice(),
            _ => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<ChildItem>> {
        match &mut self.payload {
            ObjectPayload::Container { children } => Some(children),
            _ => None,
        }
    }

    /// References to the currently selected children.
    pub fn selected_children(&self) -> impl Iterator<Item = ChildRef> + '_ {
        self.children()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.selected)
            .map(move |(i, _)| ChildRef::new(self.id, i))
    }

    pub fn has_selected_children(&self) -> bool {
        self.children().iter().any(|c| c.selected)
    }

    /// Stacking key used for hit-testing: schemas sit below relationships,
    /// which sit below everything else. Only the last group honours
    /// `z_order`.
    pub(crate) fn stacking_key(&self) -> (u8, i32, ObjectId) {
        match self.kind {
            ObjectKind::Schema => (0, 0, self.id),
            k if k.is_relationship() => (1, 0, self.id),
            _ => (2, self.z_order, self.id),
        }
    }
}
