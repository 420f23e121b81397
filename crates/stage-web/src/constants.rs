// Web front-end tuning constants

// Backing-store device pixel ratio cap (canvas width = css width * min(dpr, cap))
pub const CANVAS_MAX_PIXEL_RATIO: f64 = 2.0;

// Longest step handed to the tweener; tab switches and stalls clamp to this
pub const MAX_FRAME_DT_SEC: f32 = 0.1;

// Swapchain clear colour (linear RGBA)
pub const CLEAR_RGBA: [f64; 4] = [0.018, 0.02, 0.032, 1.0];

// 1x1 texel shown on panels without decoded content (sRGB bytes)
pub const PLACEHOLDER_RGBA8: [u8; 4] = [54, 57, 66, 255];

// Shader tint for loaded content and for placeholders still waiting on decode
pub const CONTENT_TINT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
pub const PENDING_TINT: [f32; 4] = [0.72, 0.74, 0.8, 1.0];

// z-order for the optional overlay element
pub const OVERLAY_Z_INDEX: &str = "10";
