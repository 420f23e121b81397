use thiserror::Error;

/// Configuration problems detected while building or resizing a stage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StageError {
    #[error("content list is empty; a stage needs at least one panel")]
    EmptyContent,
    #[error("viewport must have a positive size, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
    #[error("panel {index} has a non-positive native size {width}x{height}")]
    InvalidPanelSize { index: usize, width: f32, height: f32 },
    #[error("plane at z={plane_z} is not in front of the camera at z={camera_z}")]
    PlaneBehindCamera { camera_z: f32, plane_z: f32 },
    #[error("vertical field of view must be within (0, 180) degrees, got {0}")]
    InvalidFieldOfView(f32),
}

/// Failures reported by an `ImageSource`. These never abort the stage; the
/// panel falls back to its placeholder surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("content source is empty")]
    EmptySource,
    #[error("content source {source_url:?} is unavailable: {reason}")]
    Unavailable { source_url: String, reason: String },
}
