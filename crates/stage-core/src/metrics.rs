//! Viewport-derived camera and layout constants, recomputed on every resize.

use crate::config::StageConfig;
use crate::error::StageError;
use crate::geometry::{visible_extent_at_depth, Viewport};
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageMetrics {
    pub viewport: Viewport,
    pub fov_deg: f32,
    pub aspect: f32,
    pub camera_to_resting: f32,
    pub camera_to_active: f32,
    /// Half extents of the visible region on the resting plane.
    pub resting_extent: Vec2,
    /// Half extents of the visible region on the active plane.
    pub active_extent: Vec2,
    /// X of the left edge shared by every sidebar panel.
    pub sidebar_left_x: f32,
}

impl StageMetrics {
    pub fn derive(viewport: Viewport, config: &StageConfig) -> Result<Self, StageError> {
        if !viewport.is_valid() {
            return Err(StageError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let cam = &config.camera;
        let aspect = viewport.aspect();
        let resting_extent = visible_extent_at_depth(cam.fov_deg, aspect, cam.camera_z, cam.resting_z)
            .ok_or(StageError::PlaneBehindCamera {
                camera_z: cam.camera_z,
                plane_z: cam.resting_z,
            })?;
        let active_extent = visible_extent_at_depth(cam.fov_deg, aspect, cam.camera_z, cam.active_z)
            .ok_or(StageError::PlaneBehindCamera {
                camera_z: cam.camera_z,
                plane_z: cam.active_z,
            })?;
        Ok(Self {
            viewport,
            fov_deg: cam.fov_deg,
            aspect,
            camera_to_resting: cam.camera_z - cam.resting_z,
            camera_to_active: cam.camera_z - cam.active_z,
            resting_extent,
            active_extent,
            sidebar_left_x: -resting_extent.x + config.layout.sidebar_padding,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wider_viewport_pushes_sidebar_left() {
        let config = StageConfig::default();
        let narrow = StageMetrics::derive(Viewport::sized(800.0, 800.0), &config).unwrap();
        let wide = StageMetrics::derive(Viewport::sized(1600.0, 800.0), &config).unwrap();
        assert!(wide.sidebar_left_x < narrow.sidebar_left_x);
        assert_eq!(wide.resting_extent.y, narrow.resting_extent.y);
    }

    #[test]
    fn zero_height_is_rejected() {
        let err = StageMetrics::derive(Viewport::sized(800.0, 0.0), &StageConfig::default());
        assert!(matches!(err, Err(StageError::InvalidViewport { .. })));
    }
}
