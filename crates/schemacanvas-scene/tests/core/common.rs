use parking_lot::Mutex;
use schemacanvas_core::{EventFilter, Point, Rect, SceneEvent, Size};
use schemacanvas_scene::{DiagramScene, HostView, ManualClock, SpatialObject};
use schemacanvas_settings::CanvasConfig;
use std::sync::Arc;

pub fn scene() -> (DiagramScene, Arc<ManualClock>) {
    scene_with(CanvasConfig::default())
}

pub fn scene_with(config: CanvasConfig) -> (DiagramScene, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let scene = DiagramScene::with_clock(config, clock.clone());
    (scene, clock)
}

pub fn table(x: f64, y: f64) -> SpatialObject {
    SpatialObject::table(Point::new(x, y), Size::new(100.0, 60.0))
}

pub type EventLog = Arc<Mutex<Vec<SceneEvent>>>;

pub fn record(scene: &DiagramScene) -> EventLog {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    scene
        .events()
        .subscribe(EventFilter::All, move |event| sink.lock().push(event));
    log
}

pub fn count(log: &EventLog, pred: impl Fn(&SceneEvent) -> bool) -> usize {
    log.lock().iter().filter(|e| pred(e)).count()
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub cursor: Option<Point>,
    pub scroll: Point,
    pub active: bool,
}

/// Viewport whose state stays observable after the scene takes ownership.
#[derive(Debug)]
pub struct MockView {
    state: Arc<Mutex<ViewState>>,
}

impl HostView for MockView {
    fn is_active(&self) -> bool {
        self.state.lock().active
    }

    fn size(&self) -> Size {
        Size::new(800.0, 600.0)
    }

    fn scrollbar_extent(&self) -> Size {
        Size::new(15.0, 15.0)
    }

    fn cursor_position(&self) -> Option<Point> {
        self.state.lock().cursor
    }

    fn visible_rect(&self) -> Rect {
        Rect::from_origin_size(self.state.lock().scroll, self.size())
    }

    fn scroll_position(&self) -> Point {
        self.state.lock().scroll
    }

    fn set_scroll_position(&mut self, position: Point) {
        self.state.lock().scroll = position;
    }
}

pub fn mock_view(cursor: Option<Point>) -> (Box<MockView>, Arc<Mutex<ViewState>>) {
    let state = Arc::new(Mutex::new(ViewState {
        cursor,
        scroll: Point::default(),
        active: true,
    }));
    let view = Box::new(MockView {
        state: Arc::clone(&state),
    });
    (view, state)
}
