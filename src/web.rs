//! Browser glue: canvas surface, `requestAnimationFrame` scheduler, asset
//! loading, collect sound, DOM controls and the console logger.
//!
//! Everything here is a thin adapter around web-sys; the scene logic lives in
//! `game` and is exercised natively in tests.

use std::cell::RefCell;
use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlAudioElement, HtmlButtonElement, HtmlCanvasElement,
    HtmlElement, HtmlImageElement, Response, Window, window,
};

use crate::animation::{FrameRect, SpriteSheetData};
use crate::config::{AssetPaths, DeviceType, GameConfig};
use crate::error::{AssetError, ScheduleError, describe};
use crate::game::{Assets, Clip, Game};
use crate::scheduler::{FrameScheduler, TickHandle};
use crate::surface::{Font, GlowStroke, Rect, Surface};

// --- Logging ----------------------------------------------------------------

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&line),
            log::Level::Warn => web_sys::console::warn_1(&line),
            log::Level::Info => web_sys::console::info_1(&line),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Routes `log` records to the browser console. Safe to call more than once.
pub fn init_logging() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Debug);
    }
}

// --- Canvas surface ---------------------------------------------------------

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, AssetError> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(AssetError::js)?
            .ok_or_else(|| AssetError::Js("canvas has no 2d context".into()))?
            .dyn_into()
            .map_err(AssetError::js)?;
        Ok(Self { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    type Image = HtmlImageElement;

    fn width(&self) -> f64 {
        self.canvas.width() as f64
    }

    fn height(&self) -> f64 {
        self.canvas.height() as f64
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.canvas.set_width(width.round() as u32);
        self.canvas.set_height(height.round() as u32);
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width(), self.height());
    }

    fn draw_image(&mut self, image: &HtmlImageElement, dest: Rect) {
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(image, dest.x, dest.y, dest.w, dest.h)
            .ok();
    }

    fn draw_image_region(&mut self, image: &HtmlImageElement, src: FrameRect, dest: Rect) {
        self.ctx
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image, src.x, src.y, src.w, src.h, dest.x, dest.y, dest.w, dest.h,
            )
            .ok();
    }

    fn stroke_glow(&mut self, stroke: &GlowStroke) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.translate(stroke.cx, stroke.cy).ok();
        ctx.rotate(stroke.rotation).ok();
        let g = &stroke.gradient;
        let gradient = ctx.create_linear_gradient(g.from.0, g.from.1, g.to.0, g.to.1);
        for (offset, color) in g.stops {
            gradient.add_color_stop(offset as f32, color).ok();
        }
        ctx.begin_path();
        ctx.arc(0.0, 0.0, stroke.radius, 0.0, TAU).ok();
        ctx.set_stroke_style_canvas_gradient(&gradient);
        ctx.set_line_width(stroke.line_width);
        ctx.set_shadow_blur(stroke.shadow_blur);
        ctx.set_shadow_color(stroke.shadow_color);
        ctx.stroke();
        ctx.restore();
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: Font, color: &str) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_fill_style_str(color);
        ctx.set_font(&font.css());
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.fill_text(text, x, y).ok();
        ctx.restore();
    }
}

// --- Scheduler --------------------------------------------------------------

thread_local! {
    static GAME: RefCell<Option<Game<CanvasSurface>>> = const { RefCell::new(None) };
}

/// Runs `f` against the live game. Returns `None` before `start_game` or if the
/// game is already borrowed (a host callback fired from inside a tick).
pub fn with_game<R>(f: impl FnOnce(&mut Game<CanvasSurface>) -> R) -> Option<R> {
    GAME.with(|cell| {
        let mut slot = cell.try_borrow_mut().ok()?;
        slot.as_mut().map(f)
    })
}

/// One long-lived closure is handed to every `requestAnimationFrame` call.
struct RafScheduler {
    callback: Closure<dyn FnMut(f64)>,
}

impl RafScheduler {
    fn new() -> Self {
        let callback = Closure::wrap(Box::new(move |ts: f64| {
            with_game(|game| game.tick(ts));
        }) as Box<dyn FnMut(f64)>);
        Self { callback }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_tick(&mut self) -> Result<TickHandle, ScheduleError> {
        let win = window().ok_or_else(|| ScheduleError::Unavailable("no window".into()))?;
        win.request_animation_frame(self.callback.as_ref().unchecked_ref())
            .map(TickHandle)
            .map_err(|e| ScheduleError::Unavailable(describe(&e)))
    }

    fn cancel_tick(&mut self, handle: TickHandle) {
        if let Some(win) = window() {
            win.cancel_animation_frame(handle.0).ok();
        }
    }
}

// --- Asset loading ----------------------------------------------------------

async fn load_image(path: &str) -> Result<HtmlImageElement, AssetError> {
    let img = HtmlImageElement::new().map_err(AssetError::js)?;
    img.set_src(path);
    JsFuture::from(img.decode())
        .await
        .map_err(|e| AssetError::Image { path: path.to_string(), message: describe(&e) })?;
    Ok(img)
}

async fn fetch_text(win: &Window, path: &str) -> Result<String, AssetError> {
    let fetch_err = |message: String| AssetError::Fetch { path: path.to_string(), message };
    let resp: Response = JsFuture::from(win.fetch_with_str(path))
        .await
        .map_err(|e| fetch_err(describe(&e)))?
        .dyn_into()
        .map_err(|e| fetch_err(describe(&e)))?;
    if !resp.ok() {
        return Err(fetch_err(format!("HTTP {}", resp.status())));
    }
    let text = JsFuture::from(resp.text().map_err(|e| fetch_err(describe(&e)))?)
        .await
        .map_err(|e| fetch_err(describe(&e)))?;
    text.as_string().ok_or_else(|| fetch_err("response body is not text".into()))
}

async fn load_clip(win: &Window, sheet: &str, data: &str) -> Result<Clip<HtmlImageElement>, AssetError> {
    let image = load_image(sheet).await?;
    let json = fetch_text(win, data).await?;
    let frames = SpriteSheetData::from_json(&json)
        .map_err(|source| AssetError::SpriteSheet { path: data.to_string(), source })?
        .into_frames();
    Ok(Clip { image, frames })
}

/// Loads everything the scene needs; any single failure aborts the whole load.
pub async fn load_assets(paths: &AssetPaths) -> Result<Assets<HtmlImageElement>, AssetError> {
    let win = window().ok_or(AssetError::NoWindow)?;
    let background = load_image(&paths.background).await?;
    let idle = load_clip(&win, &paths.idle_sheet, &paths.idle_data).await?;
    let jump = load_clip(&win, &paths.jump_sheet, &paths.jump_data).await?;
    Ok(Assets { background, idle, jump })
}

// --- Sound ------------------------------------------------------------------

fn collect_sound_hook(doc: &Document, id: &str, volume: f64) -> Option<Box<dyn FnMut()>> {
    let audio: HtmlAudioElement = doc.get_element_by_id(id)?.dyn_into().ok()?;
    Some(Box::new(move || {
        audio.set_current_time(0.0);
        audio.set_volume(volume);
        if let Err(e) = audio.play() {
            log::warn!("collect sound failed: {}", describe(&e));
        }
    }))
}

// --- DOM controls -----------------------------------------------------------

fn container_width(doc: &Document, selector: &str) -> Result<f64, AssetError> {
    let container = doc
        .query_selector(selector)
        .map_err(AssetError::js)?
        .ok_or_else(|| AssetError::MissingElement(selector.to_string()))?;
    Ok(container.client_width() as f64)
}

fn button(doc: &Document, id: &str) -> Option<HtmlButtonElement> {
    doc.get_element_by_id(id)?.dyn_into().ok()
}

/// Start is enabled only when ready and stopped; stop only while running.
pub fn sync_controls() {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    let (ready, running) = with_game(|g| (g.is_ready(), g.is_running())).unwrap_or((false, false));
    if let Some(start) = button(&doc, "startButton") {
        start.set_disabled(!ready || running);
    }
    if let Some(stop) = button(&doc, "stopButton") {
        stop.set_disabled(!running);
    }
}

fn on_click(target: &HtmlElement, mut action: impl FnMut() + 'static) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |_e: web_sys::MouseEvent| action()) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn wire_controls(win: &Window, doc: &Document, selector: String) -> Result<(), JsValue> {
    {
        let resize = Closure::wrap(Box::new(move || {
            let Some(doc) = window().and_then(|w| w.document()) else {
                return;
            };
            match container_width(&doc, &selector) {
                Ok(width) => {
                    with_game(|g| g.resize_to(width));
                }
                Err(e) => log::warn!("resize skipped: {e}"),
            }
        }) as Box<dyn FnMut()>);
        win.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())?;
        resize.forget();
    }

    let platforms = doc.query_selector_all("button.platform-jump")?;
    for i in 0..platforms.length() {
        let Some(el) = platforms.get(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
            continue;
        };
        let Some(num) = el.dataset().get("num").and_then(|s| s.parse::<u32>().ok()) else {
            log::warn!("platform button without a numeric data-num");
            continue;
        };
        on_click(&el, move || {
            with_game(|g| g.jump_to_platform(num));
        })?;
    }

    if let Some(reset) = button(doc, "resetButton") {
        on_click(&reset, || {
            with_game(|g| g.reset());
        })?;
    }
    if let Some(start) = button(doc, "startButton") {
        start.set_disabled(true);
        on_click(&start, || {
            with_game(|g| g.play());
            sync_controls();
        })?;
    }
    if let Some(stop) = button(doc, "stopButton") {
        stop.set_disabled(true);
        on_click(&stop, || {
            with_game(|g| g.pause());
            sync_controls();
        })?;
    }
    Ok(())
}

// --- Entry ------------------------------------------------------------------

/// True once `start` has installed a game.
pub fn is_started() -> bool {
    GAME.with(|cell| cell.try_borrow().map_or(true, |slot| slot.is_some()))
}

/// Builds the game on the page and begins loading assets. Only the first call
/// does anything; the running game keeps its frame callback and listeners.
pub fn start(config: GameConfig) -> Result<(), AssetError> {
    if is_started() {
        log::error!("start_game called twice; keeping the running game");
        return Err(AssetError::AlreadyStarted);
    }
    let win = window().ok_or(AssetError::NoWindow)?;
    let doc = win.document().ok_or(AssetError::NoDocument)?;
    let paths = config.assets.clone();

    let canvas: HtmlCanvasElement = doc
        .get_element_by_id(&paths.canvas_id)
        .ok_or_else(|| AssetError::MissingElement(paths.canvas_id.clone()))?
        .dyn_into()
        .map_err(|_| AssetError::MissingElement(paths.canvas_id.clone()))?;
    let width = container_width(&doc, &paths.container_selector)?;
    let mut surface = CanvasSurface::new(canvas)?;
    surface.resize(width, config.height_for(width));

    if let Ok(inner) = win.inner_width() {
        if let Some(w) = inner.as_f64() {
            log::info!("device type: {:?}", DeviceType::from_viewport_width(w));
        }
    }

    let volume = config.collect_sound_volume;
    let mut game = Game::new(config, surface, Box::new(RafScheduler::new()));
    match collect_sound_hook(&doc, &paths.collect_sound_id, volume) {
        Some(hook) => game.set_collect_sound(hook),
        None => log::warn!("no audio element #{}; collecting is silent", paths.collect_sound_id),
    }
    GAME.with(|cell| cell.replace(Some(game)));

    wire_controls(&win, &doc, paths.container_selector.clone()).map_err(AssetError::js)?;

    wasm_bindgen_futures::spawn_local(async move {
        let assets = match load_assets(&paths).await {
            Ok(assets) => assets,
            Err(e) => {
                log::error!("error loading assets: {e}");
                return;
            }
        };
        match with_game(|g| g.install_assets(assets)) {
            Some(Ok(())) => log::info!("game ready; press Start to begin the loop"),
            Some(Err(e)) => log::error!("error loading assets: {e}"),
            None => log::error!("game state unavailable while installing assets"),
        }
        sync_controls();
    });
    Ok(())
}
