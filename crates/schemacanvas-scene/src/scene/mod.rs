//! The diagram scene: sole owner and mutator of the spatial model.

mod input;
mod layers;
mod operations;

use crate::auto_scroll::AutoScrollController;
use crate::bounds::{BoundingRectCalculator, DecorationMetrics};
use crate::grid::GridSnapper;
use crate::interaction::{EdgeScrollState, InteractionState, RelationshipLine};
use crate::layers::LayerRegistry;
use crate::object::SpatialObject;
use crate::scheduler::{Clock, Scheduler, SystemClock, TimerKind};
use crate::selection::{SelectionChange, SelectionTracker};
use crate::store::ObjectStore;
use crate::view::{HostView, ViewHandle};
use schemacanvas_core::constants::{RELATIONSHIP_LINE_PADDING, SCHEMA_PADDING, SCHEMA_TITLE_HEIGHT};
use schemacanvas_core::{EventBus, EventBusError, ObjectId, Point, Rect, SceneEvent};
use schemacanvas_settings::{CanvasConfig, ConfigResult};
use std::sync::Arc;
use std::time::Instant;

/// A live diagram: placed objects, layers, selection and the interaction
/// state machine, plus the event bus observers subscribe to.
///
/// Every scene carries its own [`CanvasConfig`]; nothing is shared between
/// two open diagrams.
#[derive(Debug)]
pub struct DiagramScene {
    config: CanvasConfig,
    grid: GridSnapper,
    store: ObjectStore,
    layers: LayerRegistry,
    selection: SelectionTracker,
    interaction: InteractionState,
    /// Scene position of the last primary press, NaN when released.
    press_point: Point,
    /// Movable selected object under the last primary press.
    press_grab: Option<ObjectId>,
    auto_scroll: AutoScrollController,
    scheduler: Scheduler,
    views: Vec<(ViewHandle, Box<dyn HostView>)>,
    next_view: usize,
    events: EventBus,
    /// Nesting depth of per-object notification suppression.
    signals_blocked: u32,
    scene_rect: Rect,
    relationship_line: Option<RelationshipLine>,
}

impl DiagramScene {
    /// Creates an empty scene driven by the wall clock.
    pub fn new(config: CanvasConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates an empty scene whose timers read `clock`.
    pub fn with_clock(config: CanvasConfig, clock: Arc<dyn Clock>) -> Self {
        let interaction = &config.interaction;
        let scheduler = Scheduler::new(
            clock,
            interaction.scroll_interval(),
            interaction.hover_delay(),
            interaction.settle_delay(),
        );
        let layers = LayerRegistry::new(
            &config.layers.default_layer_name,
            Self::metrics_of(&config),
        );

        tracing::debug!(
            "Creating diagram scene (grid {}, default layer '{}')",
            config.grid.size,
            layers.default_name()
        );

        Self {
            grid: GridSnapper::new(config.grid.size),
            auto_scroll: AutoScrollController::from_settings(interaction),
            store: ObjectStore::new(),
            layers,
            selection: SelectionTracker::new(),
            interaction: InteractionState::Idle,
            press_point: Point::NAN,
            press_grab: None,
            scheduler,
            views: Vec::new(),
            next_view: 0,
            events: EventBus::new(),
            signals_blocked: 0,
            scene_rect: Rect::default(),
            relationship_line: None,
            config,
        }
    }

    fn metrics_of(config: &CanvasConfig) -> DecorationMetrics {
        DecorationMetrics {
            padding: config.layers.padding,
            label_height: config.layers.label_height,
            rects_visible: config.layers.show_layer_rects,
            names_visible: config.layers.show_layer_names,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Replaces the configuration after validating it.
    ///
    /// The default layer keeps its current name; the configured name only
    /// applies to new scenes.
    pub fn apply_config(&mut self, config: CanvasConfig) -> ConfigResult<()> {
        config.validate()?;

        let interaction = &config.interaction;
        self.scheduler
            .set_interval(TimerKind::AutoScrollTick, interaction.scroll_interval());
        self.scheduler
            .set_interval(TimerKind::CornerHover, interaction.hover_delay());
        self.scheduler
            .set_interval(TimerKind::MoveSettle, interaction.settle_delay());
        self.auto_scroll
            .set_step(interaction.scroll_step, interaction.scroll_threshold);
        if !interaction.corner_move {
            self.auto_scroll.enable(false, &mut self.scheduler);
        }
        if !interaction.range_selection_enabled {
            self.cancel_range_selection();
        }

        self.grid = GridSnapper::new(config.grid.size);
        self.layers.set_metrics(Self::metrics_of(&config));
        self.config = config;
        self.update_layer_rects();

        tracing::info!("Canvas configuration applied");
        Ok(())
    }

    /// The scene's event bus. Subscribe here to receive notifications.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // Model access

    pub fn object(&self, id: ObjectId) -> Option<&SpatialObject> {
        self.store.get(id)
    }

    pub fn objects(&self) -> impl Iterator<Item = &SpatialObject> {
        self.store.iter()
    }

    pub fn object_count(&self) -> usize {
        self.store.len()
    }

    /// Topmost visible object under `point`.
    pub fn object_at(&self, point: Point) -> Option<ObjectId> {
        self.store.object_at(point)
    }

    pub fn layer_registry(&self) -> &LayerRegistry {
        &self.layers
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    /// Selected top-level objects, in selection order.
    pub fn selected_objects(&self) -> &[ObjectId] {
        self.selection.selected()
    }

    /// Number of selected items, children of containers included.
    pub fn selected_item_count(&self) -> usize {
        self.selection.count(&self.store)
    }

    pub fn interaction_state(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn is_moving_objects(&self) -> bool {
        self.interaction.is_moving()
    }

    /// Current rubber-band rectangle, if a range selection is in progress.
    pub fn rubber_band(&self) -> Option<Rect> {
        self.interaction.rubber_band()
    }

    pub fn edge_scroll_state(&self) -> EdgeScrollState {
        self.auto_scroll.state()
    }

    pub fn is_timer_active(&self, kind: TimerKind) -> bool {
        self.scheduler.is_active(kind)
    }

    /// Earliest pending timer deadline, if any timer runs.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Logical canvas extent.
    pub fn scene_rect(&self) -> Rect {
        self.scene_rect
    }

    pub fn relationship_line(&self) -> Option<RelationshipLine> {
        self.relationship_line
    }

    pub fn is_relationship_line_visible(&self) -> bool {
        self.relationship_line.is_some()
    }

    pub fn grid_size(&self) -> u32 {
        self.grid.size()
    }

    // Views

    /// Attaches a host viewport. Views are queried in attach order.
    pub fn attach_view(&mut self, view: Box<dyn HostView>) -> ViewHandle {
        let handle = ViewHandle(self.next_view);
        self.next_view += 1;
        self.views.push((handle, view));
        tracing::debug!("{} attached", handle);
        handle
    }

    pub fn detach_view(&mut self, handle: ViewHandle) -> Option<Box<dyn HostView>> {
        let idx = self.views.iter().position(|(h, _)| *h == handle)?;
        tracing::debug!("{} detached", handle);
        Some(self.views.remove(idx).1)
    }

    pub fn view(&self, handle: ViewHandle) -> Option<&dyn HostView> {
        self.views
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, v)| v.as_ref())
    }

    /// First attached view that reports itself active.
    pub fn active_view(&self) -> Option<&dyn HostView> {
        self.views
            .iter()
            .find(|(_, v)| v.is_active())
            .map(|(_, v)| v.as_ref())
    }

    fn active_view_index(&self) -> Option<usize> {
        self.views.iter().position(|(_, v)| v.is_active())
    }

    // Notifications

    fn emit(&self, event: SceneEvent) {
        match self.events.publish(event) {
            Ok(_) | Err(EventBusError::NoSubscribers) => {}
            Err(e) => tracing::warn!("Failed to publish scene event: {}", e),
        }
    }

    /// Per-object notifications, skipped while signals are blocked.
    fn emit_object_event(&self, event: SceneEvent) {
        if self.signals_blocked == 0 {
            self.emit(event);
        }
    }

    fn emit_selection_changes(&self, changes: &[SelectionChange]) {
        for (id, selected) in changes {
            self.emit_object_event(SceneEvent::ObjectSelected {
                object: Some(*id),
                selected: *selected,
            });
        }
    }

    /// Suppresses per-object notifications until the matching
    /// [`unblock_item_signals`](Self::unblock_item_signals).
    pub fn block_item_signals(&mut self) {
        self.signals_blocked += 1;
    }

    pub fn unblock_item_signals(&mut self) {
        self.signals_blocked = self.signals_blocked.saturating_sub(1);
    }

    pub fn item_signals_blocked(&self) -> bool {
        self.signals_blocked > 0
    }

    // Derived geometry

    fn bounds_calculator(&self) -> BoundingRectCalculator {
        BoundingRectCalculator::new(self.layers.metrics())
    }

    /// Recomputes a relationship's line box from its endpoints, waypoints
    /// and labels.
    fn refresh_relationship(&mut self, id: ObjectId) {
        let mut points = self.store.relationship_path(id);
        let Some(obj) = self.store.get_mut(id) else {
            return;
        };
        let Some(rel) = obj.relationship_data_mut() else {
            return;
        };

        if points.is_empty() {
            points.extend(rel.waypoints.iter().copied());
        }
        points.extend(rel.labels.iter().flatten().copied());

        rel.line_rect = Rect::bounding(points)
            .map(|r| {
                r.adjusted(
                    -RELATIONSHIP_LINE_PADDING,
                    -RELATIONSHIP_LINE_PADDING,
                    RELATIONSHIP_LINE_PADDING,
                    RELATIONSHIP_LINE_PADDING,
                )
            })
            .unwrap_or_default();
    }

    fn refresh_relationships_of(&mut self, ids: &[ObjectId]) {
        let mut rels: Vec<ObjectId> = ids
            .iter()
            .flat_map(|id| self.store.relationships_of(*id))
            .collect();
        rels.sort_unstable();
        rels.dedup();
        for rel in rels {
            self.refresh_relationship(rel);
        }
    }

    /// Refits a schema box around its members.
    fn refresh_schema(&mut self, schema: ObjectId) {
        let members = self.store.schema_members(schema);
        let member_rects = members
            .iter()
            .filter_map(|id| self.store.get(*id))
            .map(|o| o.scene_rect());
        let corners = member_rects.flat_map(|r| [r.top_left(), r.bottom_right()]);
        let Some(fit) = Rect::bounding(corners) else {
            return;
        };

        let rect = fit.adjusted(
            -SCHEMA_PADDING,
            -SCHEMA_PADDING - SCHEMA_TITLE_HEIGHT,
            SCHEMA_PADDING,
            SCHEMA_PADDING,
        );
        if let Some(obj) = self.store.get_mut(schema) {
            if obj.kind().is_schema() {
                obj.position = rect.top_left();
                obj.size = rect.size();
            }
        }
    }

    /// A relationship is shown while at least one endpoint is shown.
    fn refresh_relationship_visibility(&mut self) {
        let updates: Vec<(ObjectId, bool)> = self
            .store
            .iter()
            .filter_map(|o| {
                let rel = o.relationship_data()?;
                let shown = |id| self.store.get(id).is_some_and(|e| e.visible);
                Some((o.id(), shown(rel.source) || shown(rel.destination)))
            })
            .collect();

        for (id, visible) in updates {
            if let Some(obj) = self.store.get_mut(id) {
                obj.visible = visible;
            }
        }
    }

    fn cancel_range_selection(&mut self) {
        if self.interaction.is_range_selecting() {
            self.interaction = InteractionState::Idle;
        }
    }
}

impl Default for DiagramScene {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}
