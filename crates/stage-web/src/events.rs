//! DOM listeners as explicit subscriptions the stage releases on destroy.

use stage_core::Subscription;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub struct ListenerGuard {
    target: web::EventTarget,
    event: &'static str,
    closure: Option<Closure<dyn FnMut(web::Event)>>,
}

/// Registers `handler` for `event` on `target`. The listener stays until the
/// returned guard is cancelled.
pub fn listen(
    target: &web::EventTarget,
    event: &'static str,
    handler: impl FnMut(web::Event) + 'static,
) -> anyhow::Result<ListenerGuard> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(|e| anyhow::anyhow!("add {} listener: {:?}", event, e))?;
    Ok(ListenerGuard {
        target: target.clone(),
        event,
        closure: Some(closure),
    })
}

impl Subscription for ListenerGuard {
    fn cancel(&mut self) {
        let Some(closure) = self.closure.take() else {
            return;
        };
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.event, closure.as_ref().unchecked_ref())
        {
            log::warn!("[stage] removing {} listener failed: {:?}", self.event, e);
        }
        // cancel may run inside this very listener; free the closure after it returns
        spawn_local(async move { drop(closure) });
    }
}
