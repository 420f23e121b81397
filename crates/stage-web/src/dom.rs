use stage_core::Viewport;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Device pixel ratio clamped to `max_ratio`.
#[inline]
pub fn effective_pixel_ratio(max_ratio: f64) -> f64 {
    web::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
        .min(max_ratio)
}

/// Matches the canvas backing store to its CSS size times the capped DPR.
/// Returns whether the backing size changed.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, max_ratio: f64) -> bool {
    let dpr = effective_pixel_ratio(max_ratio);
    let rect = canvas.get_bounding_client_rect();
    let w_px = ((rect.width() * dpr) as u32).max(1);
    let h_px = ((rect.height() * dpr) as u32).max(1);
    if canvas.width() == w_px && canvas.height() == h_px {
        return false;
    }
    canvas.set_width(w_px);
    canvas.set_height(h_px);
    true
}

/// The canvas' bounding rectangle in client (CSS pixel) coordinates.
pub fn canvas_client_rect(canvas: &web::HtmlCanvasElement) -> Viewport {
    let rect = canvas.get_bounding_client_rect();
    Viewport::new(
        rect.left() as f32,
        rect.top() as f32,
        rect.width() as f32,
        rect.height() as f32,
    )
}
