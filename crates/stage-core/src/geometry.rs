//! Pure projection helpers shared by layout, picking and overlay placement.
//!
//! Screen-space values are CSS pixels in the host's client coordinate space
//! (origin top-left, Y down). World space is right-handed with the camera on
//! +Z looking toward the origin.

use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::{PI, TAU};

/// Canvas rectangle in client coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Viewport anchored at the client origin.
    pub fn sized(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(f32::EPSILON)
    }

    pub fn same_size(&self, other: &Viewport) -> bool {
        self.width == other.width && self.height == other.height
    }
}

/// Axis-aligned rectangle in client coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub const ZERO: ScreenRect = ScreenRect {
        left: 0.0,
        top: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Bounding rectangle of a point set. Empty input or non-finite points
    /// produce `ZERO`.
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Self {
        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        let mut any = false;
        for p in points {
            if !p.is_finite() {
                return Self::ZERO;
            }
            min = min.min(p);
            max = max.max(p);
            any = true;
        }
        if !any {
            return Self::ZERO;
        }
        let rect = Self {
            left: min.x,
            top: min.y,
            width: max.x - min.x,
            height: max.y - min.y,
        };
        if rect.area() <= 0.0 {
            Self::ZERO
        } else {
            rect
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
    }
}

/// Half width and half height of the view frustum cross-section at `plane_z`.
///
/// `None` when the plane is not strictly in front of the camera.
pub fn visible_extent_at_depth(fov_deg: f32, aspect: f32, camera_z: f32, plane_z: f32) -> Option<Vec2> {
    let depth = camera_z - plane_z;
    if !(depth > 0.0) {
        return None;
    }
    let half_height = depth * (fov_deg.to_radians() * 0.5).tan();
    Some(Vec2::new(half_height * aspect, half_height))
}

/// Largest rectangle with `source_aspect` (width / height) that fits in the
/// budget. A budget that already has the source aspect is returned unchanged.
pub fn fit_rect_within_budget(budget_width: f32, budget_height: f32, source_aspect: f32) -> Vec2 {
    let budget_aspect = budget_width / budget_height;
    if budget_aspect == source_aspect {
        return Vec2::new(budget_width, budget_height);
    }
    if budget_aspect > source_aspect {
        // pillarbox: height bound
        Vec2::new(budget_height * source_aspect, budget_height)
    } else {
        // letterbox: width bound
        Vec2::new(budget_width, budget_width / source_aspect)
    }
}

/// Converts a pixel distance to world units on a plane whose full visible
/// extent along the same axis is `world_extent`.
pub fn pixel_margin_to_world_units(margin_px: f32, viewport_px: f32, world_extent: f32) -> f32 {
    if viewport_px <= 0.0 {
        return 0.0;
    }
    margin_px / viewport_px * world_extent
}

/// Maps a world point through `view_proj` into client coordinates.
///
/// `None` for points on or behind the camera plane.
pub fn project_world_to_screen(point: Vec3, view_proj: Mat4, viewport: &Viewport) -> Option<Vec2> {
    let clip = view_proj * point.extend(1.0);
    if clip.w <= f32::EPSILON {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(Vec2::new(
        viewport.left + (ndc.x + 1.0) * 0.5 * viewport.width,
        viewport.top + (1.0 - ndc.y) * 0.5 * viewport.height,
    ))
}

/// Client coordinates to normalized device coordinates relative to `rect`.
pub fn screen_to_ndc(pointer: Vec2, rect: &Viewport) -> Option<Vec2> {
    if !rect.is_valid() {
        return None;
    }
    Some(Vec2::new(
        ((pointer.x - rect.left) / rect.width) * 2.0 - 1.0,
        -((pointer.y - rect.top) / rect.height) * 2.0 + 1.0,
    ))
}

/// Signed rotation from `from` to `to` along the shorter arc, in `(-π, π]`.
#[inline]
pub fn shortest_angle_delta(from: f32, to: f32) -> f32 {
    let d = (to - from).rem_euclid(TAU);
    if d > PI {
        d - TAU
    } else {
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_returns_budget_for_matching_aspect() {
        let fit = fit_rect_within_budget(16.0, 10.0, 1.6);
        assert_eq!(fit, Vec2::new(16.0, 10.0));
    }

    #[test]
    fn shortest_delta_wraps() {
        assert!((shortest_angle_delta(0.1, TAU - 0.1) + 0.2).abs() < 1e-5);
        assert!((shortest_angle_delta(TAU - 0.1, 0.1) - 0.2).abs() < 1e-5);
        assert!((shortest_angle_delta(0.0, PI) - PI).abs() < 1e-5);
    }

    #[test]
    fn degenerate_points_give_zero_rect() {
        let r = ScreenRect::from_points([Vec2::new(3.0, 4.0), Vec2::new(3.0, 9.0)]);
        assert_eq!(r, ScreenRect::ZERO);
        assert_eq!(ScreenRect::from_points(Vec::<Vec2>::new()), ScreenRect::ZERO);
    }
}
