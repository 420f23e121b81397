use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Client-space pointer position of a mouse or pointer event.
#[inline]
pub fn pointer_client(ev: &web::Event) -> Option<Vec2> {
    let mouse = ev.dyn_ref::<web::MouseEvent>()?;
    Some(Vec2::new(mouse.client_x() as f32, mouse.client_y() as f32))
}

/// Only the primary button selects.
#[inline]
pub fn is_primary_click(ev: &web::Event) -> bool {
    ev.dyn_ref::<web::MouseEvent>()
        .map(|m| m.button() == 0)
        .unwrap_or(false)
}
