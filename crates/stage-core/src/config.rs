use crate::constants::*;
use crate::error::StageError;
use crate::tween::Ease;
use glam::Vec2;

/// Arrangement used for resting (non-selected) panels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutMode {
    /// Vertical stack along the left edge.
    #[default]
    Sidebar,
    /// Even ring around the view axis.
    Ring,
}

impl LayoutMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sidebar" | "linear" => Some(Self::Sidebar),
            "ring" | "circular" => Some(Self::Ring),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sidebar => "sidebar",
            Self::Ring => "ring",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub fov_deg: f32,
    pub camera_z: f32,
    pub znear: f32,
    pub zfar: f32,
    pub resting_z: f32,
    pub active_z: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: CAMERA_FOV_DEG,
            camera_z: CAMERA_Z,
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
            resting_z: RESTING_PLANE_Z,
            active_z: ACTIVE_PLANE_Z,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Native size used when a content descriptor does not carry one.
    pub default_panel_size: Vec2,
    pub sidebar_padding: f32,
    pub sidebar_top_y: f32,
    pub sidebar_spacing: f32,
    pub resting_tilt_y: f32,
    pub ring_radius: f32,
    pub ring_tilt_x: f32,
    /// CSS pixels between the active panel and every viewport edge.
    pub active_padding_px: f32,
    pub min_budget: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_panel_size: Vec2::new(PANEL_WIDTH, PANEL_HEIGHT),
            sidebar_padding: SIDEBAR_PADDING,
            sidebar_top_y: SIDEBAR_TOP_Y,
            sidebar_spacing: SIDEBAR_SPACING,
            resting_tilt_y: RESTING_TILT_Y,
            ring_radius: RING_RADIUS,
            ring_tilt_x: RING_TILT_X,
            active_padding_px: ACTIVE_PLANE_PADDING_PX,
            min_budget: MIN_BUDGET_WORLD,
        }
    }
}

/// Per-channel durations for selection transitions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionTiming {
    pub position_sec: f32,
    pub rotation_sec: f32,
    pub scale_sec: f32,
    pub ease: Ease,
}

impl TransitionTiming {
    /// Same duration on every channel.
    pub fn uniform(duration_sec: f32, ease: Ease) -> Self {
        Self {
            position_sec: duration_sec,
            rotation_sec: duration_sec,
            scale_sec: duration_sec,
            ease,
        }
    }
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            position_sec: POSITION_DURATION_SEC,
            rotation_sec: ROTATION_DURATION_SEC,
            scale_sec: SCALE_DURATION_SEC,
            ease: Ease::Power3Out,
        }
    }
}

/// How panels reach their recomputed slots after a viewport change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResizeBehavior {
    Snap,
    Tween { duration_sec: f32 },
}

impl Default for ResizeBehavior {
    fn default() -> Self {
        Self::Tween {
            duration_sec: RESIZE_DURATION_SEC,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StageConfig {
    pub camera: CameraConfig,
    pub layout: LayoutConfig,
    pub mode: LayoutMode,
    pub timing: TransitionTiming,
    pub resize: ResizeBehavior,
}

impl StageConfig {
    pub fn with_mode(mut self, mode: LayoutMode) -> Self {
        self.mode = mode;
        self
    }

    /// Rejects camera setups that would leave either plane undefined.
    pub fn validate(&self) -> Result<(), StageError> {
        let cam = &self.camera;
        if !(cam.fov_deg > 0.0 && cam.fov_deg < 180.0) {
            return Err(StageError::InvalidFieldOfView(cam.fov_deg));
        }
        for plane_z in [cam.resting_z, cam.active_z] {
            if !(cam.camera_z - plane_z > cam.znear) {
                return Err(StageError::PlaneBehindCamera {
                    camera_z: cam.camera_z,
                    plane_z,
                });
            }
        }
        let size = self.layout.default_panel_size;
        if !(size.x > 0.0 && size.y > 0.0) {
            return Err(StageError::InvalidPanelSize {
                index: 0,
                width: size.x,
                height: size.y,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(StageConfig::default().validate(), Ok(()));
    }

    #[test]
    fn plane_behind_camera_is_rejected() {
        let mut config = StageConfig::default();
        config.camera.active_z = config.camera.camera_z + 1.0;
        assert!(matches!(
            config.validate(),
            Err(StageError::PlaneBehindCamera { .. })
        ));
    }

    #[test]
    fn layout_mode_names_round_trip() {
        for mode in [LayoutMode::Sidebar, LayoutMode::Ring] {
            assert_eq!(LayoutMode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(LayoutMode::from_name("grid"), None);
    }
}
