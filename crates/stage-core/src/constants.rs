// Shared stage tuning constants. `StageConfig::default()` is built from these.

// Camera
pub const CAMERA_FOV_DEG: f32 = 75.0; // vertical field of view
pub const CAMERA_Z: f32 = 5.0; // eye sits on +Z looking at the origin
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

// Plane depths (world Z)
pub const RESTING_PLANE_Z: f32 = -1.0;
pub const ACTIVE_PLANE_Z: f32 = 0.0; // nearer than the resting plane

// Default native panel size in world units
pub const PANEL_WIDTH: f32 = 1.6;
pub const PANEL_HEIGHT: f32 = 1.0;

// Sidebar layout
pub const SIDEBAR_PADDING: f32 = 1.0; // world units from the left edge of the resting plane
pub const SIDEBAR_TOP_Y: f32 = 1.2; // centre of slot 0
pub const SIDEBAR_SPACING: f32 = 1.4; // vertical distance between slots
pub const RESTING_TILT_Y: f32 = 0.15; // inward yaw of every resting sidebar panel

// Ring layout
pub const RING_RADIUS: f32 = 2.2;
pub const RING_TILT_X: f32 = -0.12; // small downward pitch

// Active layout
pub const ACTIVE_PLANE_PADDING_PX: f32 = 48.0; // CSS pixels kept clear on every side
pub const MIN_BUDGET_WORLD: f32 = 0.01; // floor for degenerate viewports

// Transition durations (seconds)
pub const POSITION_DURATION_SEC: f32 = 0.7;
pub const ROTATION_DURATION_SEC: f32 = 0.5;
pub const SCALE_DURATION_SEC: f32 = 0.7;
pub const RESIZE_DURATION_SEC: f32 = 0.15;

// Component-wise tolerance when comparing transforms
pub const TRANSFORM_EPSILON: f32 = 1e-4;
