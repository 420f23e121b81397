#![cfg(target_arch = "wasm32")]
//! Browser front end: wires a `stage_core::Stage` to a canvas, WebGPU and
//! the DOM, and exposes `createStage` to JavaScript.

pub mod constants;
mod dom;
mod events;
mod frame;
mod images;
mod input;
mod options;
mod overlay;
mod render;

use images::{SharedTextures, WebImageSource};
use render::GpuRenderer;
use stage_core::{LayoutMode, ScreenRect, SelectionObserver, Stage};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use web_sys as web;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("stage-web loaded");
    Ok(())
}

/// Everything the event handlers and the frame loop mutate.
pub(crate) struct StageShared {
    pub(crate) stage: Stage<GpuRenderer>,
    pub(crate) images: WebImageSource,
    pub(crate) canvas: web::HtmlCanvasElement,
    pub(crate) overlay: Option<web::HtmlElement>,
    pub(crate) max_pixel_ratio: f64,
}

type Notification = (Option<usize>, Option<ScreenRect>);

/// Queues selection notifications while the stage is borrowed and delivers
/// them to JS once it is released, so the callback may call back into the
/// handle.
#[derive(Clone)]
struct Notifier {
    outbox: Rc<RefCell<VecDeque<Notification>>>,
    callback: js_sys::Function,
}

impl Notifier {
    fn new(callback: js_sys::Function) -> Self {
        Self {
            outbox: Rc::new(RefCell::new(VecDeque::new())),
            callback,
        }
    }

    fn observer(&self) -> SelectionObserver {
        let outbox = self.outbox.clone();
        Box::new(move |index, bounds| outbox.borrow_mut().push_back((index, bounds)))
    }

    fn flush(&self) {
        loop {
            let Some((index, bounds)) = self.outbox.borrow_mut().pop_front() else {
                break;
            };
            let index = JsValue::from_f64(index.map_or(-1.0, |i| i as f64));
            let bounds = overlay::bounds_to_js(bounds);
            if let Err(e) = self.callback.call2(&JsValue::NULL, &index, &bounds) {
                log::warn!("[select] onSelectionChanged threw: {:?}", e);
            }
        }
    }

    fn discard(&self) {
        self.outbox.borrow_mut().clear();
    }
}

/// Handle returned by `createStage`.
#[wasm_bindgen]
pub struct StageHandle {
    shared: Rc<RefCell<StageShared>>,
    notifier: Notifier,
}

/// Builds a stage on `canvas` showing `contents` in order. `contents` holds
/// image URLs or `{ src, width?, height? }` objects; `options` may set
/// `layout`, `activePadding`, `maxPixelRatio` and `overlayElementId`.
#[wasm_bindgen(js_name = createStage)]
pub async fn create_stage(
    canvas: web::HtmlCanvasElement,
    contents: js_sys::Array,
    on_selection_changed: js_sys::Function,
    options: JsValue,
) -> Result<StageHandle, JsValue> {
    init(canvas, contents, on_selection_changed, options)
        .await
        .map_err(|e| {
            log::error!("[stage] create failed: {:?}", e);
            JsValue::from_str(&format!("{:#}", e))
        })
}

async fn init(
    canvas: web::HtmlCanvasElement,
    contents: js_sys::Array,
    on_selection_changed: js_sys::Function,
    options: JsValue,
) -> anyhow::Result<StageHandle> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let opts = options::parse_options(&options)?;
    let contents = options::parse_contents(&contents)?;

    dom::sync_canvas_backing_size(&canvas, opts.max_pixel_ratio);
    let viewport = dom::canvas_client_rect(&canvas);

    let textures: SharedTextures = Rc::default();
    let renderer = GpuRenderer::new(canvas.clone(), textures.clone()).await?;
    let mut images = WebImageSource::new(textures);
    let notifier = Notifier::new(on_selection_changed);
    let stage = Stage::new(
        renderer,
        &mut images,
        &contents,
        viewport,
        opts.config,
        notifier.observer(),
    )?;

    let overlay = match opts.overlay_element_id.as_deref() {
        Some(id) => {
            let el = overlay::find(&document, id);
            match &el {
                Some(el) => overlay::hide(el),
                None => log::warn!("[stage] overlay element #{} not found", id),
            }
            el
        }
        None => None,
    };

    let shared = Rc::new(RefCell::new(StageShared {
        stage,
        images,
        canvas: canvas.clone(),
        overlay,
        max_pixel_ratio: opts.max_pixel_ratio,
    }));

    let click = events::listen(canvas.as_ref(), "click", {
        let weak = Rc::downgrade(&shared);
        let notifier = notifier.clone();
        move |ev| on_click(&weak, &notifier, &ev)
    })?;
    let resize = events::listen(window.as_ref(), "resize", {
        let weak = Rc::downgrade(&shared);
        move |_| on_resize(&weak)
    })?;
    let frames = frame::start_loop(Rc::downgrade(&shared));
    {
        let mut s = shared.borrow_mut();
        s.stage.attach(Box::new(click));
        s.stage.attach(Box::new(resize));
        s.stage.attach(Box::new(frames));
    }

    Ok(StageHandle { shared, notifier })
}

fn on_click(shared: &Weak<RefCell<StageShared>>, notifier: &Notifier, ev: &web::Event) {
    if !input::is_primary_click(ev) {
        return;
    }
    let (Some(shared), Some(pointer)) = (shared.upgrade(), input::pointer_client(ev)) else {
        return;
    };
    {
        let Ok(mut s) = shared.try_borrow_mut() else {
            log::warn!("[select] click ignored: stage busy");
            return;
        };
        let rect = dom::canvas_client_rect(&s.canvas);
        s.stage.click(pointer, rect);
    }
    notifier.flush();
}

fn on_resize(shared: &Weak<RefCell<StageShared>>) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let Ok(mut s) = shared.try_borrow_mut() else {
        return;
    };
    dom::sync_canvas_backing_size(&s.canvas, s.max_pixel_ratio);
    let rect = dom::canvas_client_rect(&s.canvas);
    s.stage.sync_viewport(rect);
}

#[wasm_bindgen]
impl StageHandle {
    /// `{left, top, width, height}` of the active panel as drawn, or `null`.
    #[wasm_bindgen(js_name = getActivePanelScreenBounds)]
    pub fn active_panel_screen_bounds(&self) -> JsValue {
        overlay::bounds_to_js(self.shared.borrow().stage.active_panel_screen_bounds())
    }

    /// Swaps one panel's image. Returns `false` for an out-of-range index or
    /// an unusable source; the panel then keeps its placeholder.
    #[wasm_bindgen(js_name = replacePanelContent)]
    pub fn replace_panel_content(&self, index: u32, src: String) -> bool {
        let mut guard = self.shared.borrow_mut();
        let s = &mut *guard;
        s.stage
            .replace_panel_content(index as usize, &src, &mut s.images)
    }

    /// Selects `index` directly; a negative index clears the selection.
    pub fn select(&self, index: i32) {
        let target = usize::try_from(index).ok();
        self.shared.borrow_mut().stage.select(target);
        self.notifier.flush();
    }

    #[wasm_bindgen(js_name = selectedIndex)]
    pub fn selected_index(&self) -> i32 {
        self.shared.borrow().stage.selected_index()
    }

    /// `"sidebar"` or `"ring"`.
    #[wasm_bindgen(js_name = setLayoutMode)]
    pub fn set_layout_mode(&self, mode: &str) -> Result<(), JsValue> {
        let mode = LayoutMode::from_name(mode)
            .ok_or_else(|| JsValue::from_str(&format!("unknown layout {:?}", mode)))?;
        self.shared.borrow_mut().stage.set_layout_mode(mode);
        Ok(())
    }

    /// Removes listeners, stops the frame loop and frees GPU resources.
    /// Safe to call more than once.
    pub fn destroy(&self) {
        let mut s = self.shared.borrow_mut();
        s.stage.destroy();
        if let Some(el) = &s.overlay {
            overlay::hide(el);
        }
        self.notifier.discard();
    }
}
