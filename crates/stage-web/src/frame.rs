use crate::constants::MAX_FRAME_DT_SEC;
use crate::overlay;
use crate::StageShared;
use instant::Instant;
use stage_core::Subscription;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

type TickClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Cancels the animation-frame loop started by `start_loop`.
pub struct FrameLoopGuard {
    running: Rc<Cell<bool>>,
    request_id: Rc<Cell<Option<i32>>>,
    tick: TickClosure,
}

impl Subscription for FrameLoopGuard {
    fn cancel(&mut self) {
        self.running.set(false);
        if let (Some(id), Some(w)) = (self.request_id.take(), web::window()) {
            let _ = w.cancel_animation_frame(id);
        }
        if let Some(closure) = self.tick.borrow_mut().take() {
            spawn_local(async move { drop(closure) });
        }
    }
}

fn request_frame(tick: &TickClosure, request_id: &Cell<Option<i32>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        match w.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => request_id.set(Some(id)),
            Err(e) => log::error!("[stage] requestAnimationFrame failed: {:?}", e),
        }
    }
}

/// Drives `Stage::tick` once per display frame and keeps the overlay
/// element over the active panel.
pub fn start_loop(shared: Weak<RefCell<StageShared>>) -> FrameLoopGuard {
    let running = Rc::new(Cell::new(true));
    let request_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let tick: TickClosure = Rc::new(RefCell::new(None));

    let tick_next = tick.clone();
    let running_tick = running.clone();
    let request_id_tick = request_id.clone();
    let mut last_instant = Instant::now();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        request_id_tick.set(None);
        if !running_tick.get() {
            return;
        }
        let Some(shared) = shared.upgrade() else {
            running_tick.set(false);
            return;
        };
        let now = Instant::now();
        let dt_sec = (now - last_instant).as_secs_f32().min(MAX_FRAME_DT_SEC);
        last_instant = now;

        if let Ok(mut s) = shared.try_borrow_mut() {
            s.stage.tick(dt_sec);
            if let Some(el) = &s.overlay {
                overlay::place(el, s.stage.active_panel_screen_bounds());
            }
        }
        if running_tick.get() {
            request_frame(&tick_next, &request_id_tick);
        }
    }) as Box<dyn FnMut()>));

    request_frame(&tick, &request_id);
    FrameLoopGuard {
        running,
        request_id,
        tick,
    }
}
