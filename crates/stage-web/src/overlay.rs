use crate::constants::OVERLAY_Z_INDEX;
use stage_core::ScreenRect;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// `{left, top, width, height}` for the JS side.
pub fn rect_to_js(rect: &ScreenRect) -> JsValue {
    let obj = js_sys::Object::new();
    for (key, value) in [
        ("left", rect.left),
        ("top", rect.top),
        ("width", rect.width),
        ("height", rect.height),
    ] {
        let _ = js_sys::Reflect::set(&obj, &JsValue::from_str(key), &JsValue::from_f64(value as f64));
    }
    obj.into()
}

#[inline]
pub fn bounds_to_js(bounds: Option<ScreenRect>) -> JsValue {
    bounds.map_or(JsValue::NULL, |r| rect_to_js(&r))
}

pub fn find(document: &web::Document, element_id: &str) -> Option<web::HtmlElement> {
    document
        .get_element_by_id(element_id)
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
}

/// Pins `el` over `bounds`, or hides it when there is nothing to cover.
pub fn place(el: &web::HtmlElement, bounds: Option<ScreenRect>) {
    let style = el.style();
    match bounds {
        Some(r) if r.area() > 0.0 => {
            let _ = style.set_property("position", "fixed");
            let _ = style.set_property("left", &format!("{:.1}px", r.left));
            let _ = style.set_property("top", &format!("{:.1}px", r.top));
            let _ = style.set_property("width", &format!("{:.1}px", r.width));
            let _ = style.set_property("height", &format!("{:.1}px", r.height));
            let _ = style.set_property("z-index", OVERLAY_Z_INDEX);
            let _ = style.set_property("display", "");
        }
        _ => hide(el),
    }
}

#[inline]
pub fn hide(el: &web::HtmlElement) {
    let _ = el.style().set_property("display", "none");
}
