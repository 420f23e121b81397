//! Pointer picking against the panels' live transforms.

use crate::camera::{Camera, Ray};
use crate::geometry::{screen_to_ndc, Viewport};
use crate::host::ObjectId;
use crate::panel::{PanelRegistry, Transform};
use glam::Vec2;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelHit {
    pub object: ObjectId,
    /// World distance from the ray origin.
    pub distance: f32,
}

/// Ray against a quad of `size` centred on the local origin in the local XY
/// plane. Both faces count. Returns the world distance.
pub fn ray_quad(ray: &Ray, transform: &Transform, size: Vec2) -> Option<f32> {
    let model = transform.matrix();
    if model.determinant().abs() < f32::EPSILON {
        return None;
    }
    let inv = model.inverse();
    let local_origin = inv.transform_point3(ray.origin);
    // Affine map: the local parameter equals the world parameter.
    let local_dir = inv.transform_vector3(ray.direction);
    if local_dir.z.abs() < 1e-8 {
        return None;
    }
    let t = -local_origin.z / local_dir.z;
    if t < 0.0 {
        return None;
    }
    let hit = local_origin + local_dir * t;
    let half = size * 0.5;
    if hit.x < -half.x || hit.x > half.x || hit.y < -half.y || hit.y > half.y {
        return None;
    }
    Some(t)
}

/// Every panel the ray crosses, nearest first.
pub fn intersect_panels(ray: &Ray, panels: &PanelRegistry) -> SmallVec<[PanelHit; 4]> {
    let mut hits: SmallVec<[PanelHit; 4]> = panels
        .iter()
        .filter_map(|p| {
            ray_quad(ray, &p.transform, p.native_size).map(|distance| PanelHit {
                object: p.object,
                distance,
            })
        })
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// Index of the panel under the pointer, if any. `pointer` and `canvas_rect`
/// are client coordinates.
pub fn resolve_hit(
    pointer: Vec2,
    canvas_rect: &Viewport,
    camera: &Camera,
    panels: &PanelRegistry,
) -> Option<usize> {
    if panels.is_empty() {
        return None;
    }
    let ndc = screen_to_ndc(pointer, canvas_rect)?;
    let ray = camera.ray_through_ndc(ndc);
    intersect_panels(&ray, panels)
        .first()
        .and_then(|h| panels.index_of_object(h.object))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn ray_quad_hits_centre_and_misses_outside() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let quad = Transform::new(Vec3::new(0.0, 0.0, -1.0), Vec3::ZERO, Vec3::ONE);
        let t = ray_quad(&ray, &quad, Vec2::new(1.6, 1.0)).unwrap();
        assert!((t - 6.0).abs() < 1e-4);

        let off = Transform::new(Vec3::new(2.0, 0.0, -1.0), Vec3::ZERO, Vec3::ONE);
        assert!(ray_quad(&ray, &off, Vec2::new(1.6, 1.0)).is_none());
    }

    #[test]
    fn ray_quad_ignores_quads_behind_origin() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let behind = Transform::new(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO, Vec3::ONE);
        assert!(ray_quad(&ray, &behind, Vec2::ONE).is_none());
    }

    #[test]
    fn scaled_quad_grows_hit_area() {
        let ray = Ray::new(Vec3::new(1.5, 0.0, 5.0), Vec3::NEG_Z);
        let small = Transform::IDENTITY;
        let big = Transform::new(Vec3::ZERO, Vec3::ZERO, Vec3::new(4.0, 4.0, 1.0));
        assert!(ray_quad(&ray, &small, Vec2::ONE).is_none());
        assert!(ray_quad(&ray, &big, Vec2::ONE).is_some());
    }
}
