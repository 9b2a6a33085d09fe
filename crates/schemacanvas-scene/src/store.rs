//! Storage for placed objects.

use crate::object::{ObjectKind, SpatialObject};
use schemacanvas_core::{ObjectId, Point, Rect};
use std::collections::BTreeMap;

/// Distance from a relationship line that still counts as a hit.
const LINE_HIT_TOLERANCE: f64 = 4.0;

/// Owns every placed object, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ObjectStore {
    objects: BTreeMap<ObjectId, SpatialObject>,
    next_id: u64,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Generates a new unique ID.
    pub fn generate_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        id
    }

    /// Inserts an object under a freshly generated id.
    pub fn insert(&mut self, mut object: SpatialObject) -> ObjectId {
        let id = self.generate_id();
        object.id = id;
        self.objects.insert(id, object);
        id
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<SpatialObject> {
        self.objects.remove(&id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&SpatialObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SpatialObject> {
        self.objects.get_mut(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpatialObject> {
        self.objects.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SpatialObject> {
        self.objects.values_mut()
    }

    /// Objects without a parent.
    pub fn top_level(&self) -> impl Iterator<Item = &SpatialObject> {
        self.objects.values().filter(|o| o.is_top_level())
    }

    pub fn top_level_mut(&mut self) -> impl Iterator<Item = &mut SpatialObject> {
        self.objects.values_mut().filter(|o| o.is_top_level())
    }

    pub fn ids(&self) -> Vec<ObjectId> {
        self.objects.keys().copied().collect()
    }

    /// Relationships connected to `object`.
    pub fn relationships_of(&self, object: ObjectId) -> Vec<ObjectId> {
        self.objects
            .values()
            .filter(|o| o.relationship_data().is_some_and(|r| r.connects(object)))
            .map(|o| o.id)
            .collect()
    }

    /// Relationships that belong to `schema`.
    pub fn relationships_in_schema(&self, schema: ObjectId) -> Vec<ObjectId> {
        self.objects
            .values()
            .filter(|o| o.kind().is_relationship() && o.schema == Some(schema))
            .map(|o| o.id)
            .collect()
    }

    /// Table-like objects that belong to `schema`.
    pub fn schema_members(&self, schema: ObjectId) -> Vec<ObjectId> {
        self.objects
            .values()
            .filter(|o| o.kind().is_table_like() && o.schema == Some(schema))
            .map(|o| o.id)
            .collect()
    }

    /// Polyline of a relationship: source center, waypoints, destination
    /// center. Empty when an endpoint is missing.
    pub fn relationship_path(&self, id: ObjectId) -> Vec<Point> {
        let Some(rel) = self.get(id).and_then(|o| o.relationship_data()) else {
            return Vec::new();
        };
        let (Some(src), Some(dst)) = (self.get(rel.source), self.get(rel.destination)) else {
            return Vec::new();
        };

        let mut path = Vec::with_capacity(rel.waypoints.len() + 2);
        path.push(src.center());
        path.extend(rel.waypoints.iter().copied());
        path.push(dst.center());
        path
    }

    /// Topmost visible top-level object under `point`.
    pub fn object_at(&self, point: Point) -> Option<ObjectId> {
        self.top_level()
            .filter(|o| o.visible && self.hit(o, point))
            .max_by_key(|o| o.stacking_key())
            .map(|o| o.id)
    }

    fn hit(&self, object: &SpatialObject, point: Point) -> bool {
        if object.kind().is_relationship() {
            let path = self.relationship_path(object.id);
            return path
                .windows(2)
                .any(|seg| distance_to_segment(point, seg[0], seg[1]) <= LINE_HIT_TOLERANCE);
        }
        object.scene_rect().contains(&point)
    }

    /// Visible top-level objects whose footprint intersects `area`.
    pub fn objects_in(&self, area: &Rect) -> Vec<ObjectId> {
        self.top_level()
            .filter(|o| o.visible && touches(area, &o.scene_rect()))
            .map(|o| o.id)
            .collect()
    }

    pub fn count_of(&self, kind: ObjectKind) -> usize {
        self.objects.values().filter(|o| o.kind() == kind).count()
    }
}

/// Overlap test that also accepts zero-area footprints lying inside `area`.
pub(crate) fn touches(area: &Rect, footprint: &Rect) -> bool {
    area.intersects(footprint)
        || (footprint.is_degenerate() && area.contains(&footprint.top_left()))
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance_to(&a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance_to(&Point::new(a.x + t * dx, a.y + t * dy))
}
