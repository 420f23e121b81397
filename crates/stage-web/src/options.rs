use crate::constants::CANVAS_MAX_PIXEL_RATIO;
use anyhow::{anyhow, bail};
use stage_core::{LayoutMode, PanelContent, StageConfig};
use wasm_bindgen::JsValue;

/// Settings read from the optional `options` argument of `createStage`.
#[derive(Clone, Debug)]
pub struct StageOptions {
    pub config: StageConfig,
    pub max_pixel_ratio: f64,
    pub overlay_element_id: Option<String>,
}

impl Default for StageOptions {
    fn default() -> Self {
        Self {
            config: StageConfig::default(),
            max_pixel_ratio: CANVAS_MAX_PIXEL_RATIO,
            overlay_element_id: None,
        }
    }
}

fn field(obj: &JsValue, key: &str) -> Option<JsValue> {
    js_sys::Reflect::get(obj, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn number(obj: &JsValue, key: &str) -> anyhow::Result<Option<f64>> {
    match field(obj, key) {
        None => Ok(None),
        Some(v) => v
            .as_f64()
            .filter(|n| n.is_finite())
            .map(Some)
            .ok_or_else(|| anyhow!("option {key:?} must be a finite number")),
    }
}

pub fn parse_options(value: &JsValue) -> anyhow::Result<StageOptions> {
    let mut opts = StageOptions::default();
    if value.is_undefined() || value.is_null() {
        return Ok(opts);
    }
    if !value.is_object() {
        bail!("options must be an object");
    }
    if let Some(layout) = field(value, "layout") {
        let name = layout
            .as_string()
            .ok_or_else(|| anyhow!("option \"layout\" must be a string"))?;
        opts.config.mode =
            LayoutMode::from_name(&name).ok_or_else(|| anyhow!("unknown layout {name:?}"))?;
    }
    if let Some(padding) = number(value, "activePadding")? {
        if padding < 0.0 {
            bail!("option \"activePadding\" must not be negative");
        }
        opts.config.layout.active_padding_px = padding as f32;
    }
    if let Some(ratio) = number(value, "maxPixelRatio")? {
        if ratio <= 0.0 {
            bail!("option \"maxPixelRatio\" must be positive");
        }
        opts.max_pixel_ratio = ratio;
    }
    opts.overlay_element_id = field(value, "overlayElementId").and_then(|v| v.as_string());
    Ok(opts)
}

/// Each entry is either a source string or `{ src, width?, height? }`.
pub fn parse_contents(array: &js_sys::Array) -> anyhow::Result<Vec<PanelContent>> {
    let mut contents = Vec::with_capacity(array.length() as usize);
    for (i, entry) in array.iter().enumerate() {
        if let Some(src) = entry.as_string() {
            contents.push(PanelContent::new(src));
            continue;
        }
        let src = field(&entry, "src")
            .and_then(|v| v.as_string())
            .ok_or_else(|| anyhow!("content {i} needs a string or an object with \"src\""))?;
        let mut content = PanelContent::new(src);
        match (number(&entry, "width")?, number(&entry, "height")?) {
            (Some(w), Some(h)) => content = content.with_size(w as f32, h as f32),
            (None, None) => {}
            _ => bail!("content {i} must give both width and height or neither"),
        }
        contents.push(content);
    }
    Ok(contents)
}
