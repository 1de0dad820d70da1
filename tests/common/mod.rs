//! Shared test fixtures: an in-memory engine and tab constructors.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Once};

use image::{Rgba, RgbaImage};
use parking_lot::Mutex;
use render_tab::{
    Engine, EngineSettings, ErrorInfo, Frame, Geometry, HarRecorder, HttpMethod, JsConsole,
    PageRequest, ResultReceiver, SignalReceiver, SignalSender, Size, Tab, TabOptions, channel,
};
use serde_json::Value;
use url::Url;

// ============================================================================
// Tracing
// ============================================================================

static TRACING: Once = Once::new();

/// Installs a test subscriber honoring `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// FakeFrame
// ============================================================================

/// Static frame tree node.
#[derive(Debug, Clone, Default)]
pub struct FakeFrame {
    pub url: String,
    pub requested_url: String,
    pub geometry: Geometry,
    pub title: String,
    pub name: String,
    pub html: String,
    pub children: Vec<FakeFrame>,
}

impl FakeFrame {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            requested_url: url.to_string(),
            geometry: Geometry {
                x: 0,
                y: 0,
                width: 1024,
                height: 768,
            },
            title: String::new(),
            name: String::new(),
            html: "<html><head></head><body></body></html>".to_string(),
            children: Vec::new(),
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_html(mut self, html: &str) -> Self {
        self.html = html.to_string();
        self
    }

    pub fn with_child(mut self, child: FakeFrame) -> Self {
        self.children.push(child);
        self
    }
}

impl Frame for FakeFrame {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn requested_url(&self) -> String {
        self.requested_url.clone()
    }

    fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn to_html(&self) -> String {
        self.html.clone()
    }

    fn child_frames(&self) -> Vec<&dyn Frame> {
        self.children.iter().map(|f| f as &dyn Frame).collect()
    }
}

// ============================================================================
// EngineLog
// ============================================================================

/// Everything the tab asked the engine to do, plus knobs tests turn.
#[derive(Debug, Default)]
pub struct EngineLog {
    pub loads: Vec<(PageRequest, HttpMethod, Option<Vec<u8>>)>,
    pub fetches: Vec<PageRequest>,
    pub contents: Vec<(Vec<u8>, String, Url)>,
    pub scripts: Vec<String>,
    pub consoles: Vec<(String, JsConsole)>,
    pub settings: Vec<EngineSettings>,
    pub viewports: Vec<Size>,
    pub user_agent: Option<String>,
    pub stops: usize,
    pub refresh_stops: usize,
    pub closed: usize,

    pub error_info: Option<ErrorInfo>,
    pub contents_size: Size,
    pub script_results: HashMap<String, Value>,
}

// ============================================================================
// FakeEngine
// ============================================================================

/// Colour of the top tenth of every rendered viewport.
pub const TOP_BAND: Rgba<u8> = Rgba([30, 200, 30, 255]);

/// Colour of the rest of the rendered viewport.
pub const PAGE_BODY: Rgba<u8> = Rgba([200, 30, 30, 255]);

/// Engine that records calls and paints a solid viewport.
pub struct FakeEngine {
    log: Arc<Mutex<EngineLog>>,
    frame: FakeFrame,
    viewport: Size,
}

impl FakeEngine {
    pub fn new() -> (Self, Arc<Mutex<EngineLog>>) {
        Self::with_frame(FakeFrame::new("about:blank"))
    }

    pub fn with_frame(frame: FakeFrame) -> (Self, Arc<Mutex<EngineLog>>) {
        let log = Arc::new(Mutex::new(EngineLog::default()));
        let engine = Self {
            log: Arc::clone(&log),
            frame,
            viewport: Size::default(),
        };
        (engine, log)
    }
}

impl Engine for FakeEngine {
    fn load(&mut self, request: PageRequest, method: HttpMethod, body: Option<Vec<u8>>) {
        self.log.lock().loads.push((request, method, body));
    }

    fn fetch(&mut self, request: PageRequest) {
        self.log.lock().fetches.push(request);
    }

    fn set_content(&mut self, data: Vec<u8>, mime_type: &str, base_url: Url) {
        self.log
            .lock()
            .contents
            .push((data, mime_type.to_string(), base_url));
    }

    fn error_info(&self) -> Option<ErrorInfo> {
        self.log.lock().error_info.clone()
    }

    fn stop_scheduled_refresh(&mut self) {
        self.log.lock().refresh_stops += 1;
    }

    fn stop(&mut self) {
        self.log.lock().stops += 1;
    }

    fn close(&mut self) {
        self.log.lock().closed += 1;
    }

    fn main_frame(&self) -> &dyn Frame {
        &self.frame
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn set_viewport_size(&mut self, size: Size) {
        self.viewport = size;
        self.log.lock().viewports.push(size);
    }

    fn contents_size(&self) -> Size {
        self.log.lock().contents_size
    }

    fn render_viewport(&mut self) -> RgbaImage {
        let band = (self.viewport.height / 10).max(1);
        RgbaImage::from_fn(self.viewport.width, self.viewport.height, |_, y| {
            if y < band { TOP_BAND } else { PAGE_BODY }
        })
    }

    fn evaluate_script(&mut self, source: &str) -> Value {
        let mut log = self.log.lock();
        log.scripts.push(source.to_string());
        log.script_results.get(source).cloned().unwrap_or(Value::Null)
    }

    fn expose_console(&mut self, name: &str, console: JsConsole) {
        self.log.lock().consoles.push((name.to_string(), console));
    }

    fn apply_settings(&mut self, settings: &EngineSettings) {
        self.log.lock().settings.push(*settings);
    }

    fn set_custom_user_agent(&mut self, user_agent: &str) {
        self.log.lock().user_agent = Some(user_agent.to_string());
    }
}

// ============================================================================
// Tab Fixtures
// ============================================================================

/// A tab wired to a fake engine, with every handle tests need.
pub struct Harness {
    pub tab: Tab,
    pub result: ResultReceiver,
    pub signals: SignalReceiver,
    pub sender: SignalSender,
    pub engine: Arc<Mutex<EngineLog>>,
    pub har: HarRecorder,
}

pub fn harness() -> Harness {
    harness_with(FakeFrame::new("about:blank"), TabOptions::new())
}

pub fn harness_with(frame: FakeFrame, options: TabOptions) -> Harness {
    init_tracing();

    let (engine, log) = FakeEngine::with_frame(frame);
    let (sender, signals) = channel();
    let har = HarRecorder::new();
    let (tab, result) =
        Tab::new(engine, har.clone(), &sender, options).expect("valid tab options");

    Harness {
        tab,
        result,
        signals,
        sender,
        engine: log,
        har,
    }
}

pub fn error_info(url: &str) -> ErrorInfo {
    ErrorInfo {
        domain: "network".to_string(),
        code: 3,
        text: "Host not found".to_string(),
        url: url.to_string(),
    }
}
