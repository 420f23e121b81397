//! Target transforms for every panel given selection, viewport and mode.
//!
//! Resting panels fill consecutive slots in index order; the active panel
//! never occupies a slot, so panels after it move up by one and neither
//! layout leaves a gap. The ring therefore re-spaces around the remaining
//! panels when one is selected.

use crate::config::{LayoutConfig, LayoutMode};
use crate::geometry::{fit_rect_within_budget, pixel_margin_to_world_units};
use crate::metrics::StageMetrics;
use crate::panel::{PanelRegistry, Transform};
use crate::selection::Selection;
use glam::{Vec2, Vec3};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Slot of a resting panel, or `None` for the active one.
#[inline]
pub fn resting_slot(index: usize, selection: Selection) -> Option<usize> {
    match selection.index() {
        Some(active) if active == index => None,
        Some(active) if index > active => Some(index - 1),
        _ => Some(index),
    }
}

/// Number of panels occupying resting slots.
#[inline]
pub fn resting_count(total: usize, selection: Selection) -> usize {
    match selection.index() {
        Some(active) if active < total => total - 1,
        _ => total,
    }
}

/// Angle of `slot` on a ring of `count` evenly spaced slots.
#[inline]
pub fn ring_angle(slot: usize, count: usize) -> f32 {
    if count == 0 {
        return 0.0;
    }
    TAU * slot as f32 / count as f32
}

pub fn sidebar_transform(
    native_size: Vec2,
    slot: usize,
    metrics: &StageMetrics,
    layout: &LayoutConfig,
    resting_z: f32,
) -> Transform {
    Transform::new(
        Vec3::new(
            metrics.sidebar_left_x + native_size.x * 0.5,
            layout.sidebar_top_y - slot as f32 * layout.sidebar_spacing,
            resting_z,
        ),
        Vec3::new(0.0, layout.resting_tilt_y, 0.0),
        Vec3::ONE,
    )
}

/// Ring radius for a stage of `total` panels no wider than `max_width`:
/// the configured radius, grown until neighbouring slots sit at least one
/// panel width apart. Fixed for a given stage.
pub fn ring_radius(layout: &LayoutConfig, total: usize, max_width: f32) -> f32 {
    if total < 2 {
        return layout.ring_radius;
    }
    let half_step = (TAU / total as f32 * 0.5).sin();
    layout.ring_radius.max(max_width / (2.0 * half_step))
}

pub fn ring_transform(slot: usize, count: usize, radius: f32, layout: &LayoutConfig, resting_z: f32) -> Transform {
    let angle = ring_angle(slot, count);
    Transform::new(
        Vec3::new(radius * angle.cos(), radius * angle.sin(), resting_z),
        Vec3::new(layout.ring_tilt_x, 0.0, angle + FRAC_PI_2),
        Vec3::ONE,
    )
}

/// World size of the active panel: the largest rectangle with the panel's
/// aspect inside the active plane's visible area minus the pixel padding.
pub fn active_fit(native_size: Vec2, metrics: &StageMetrics, layout: &LayoutConfig) -> Vec2 {
    let full = metrics.active_extent * 2.0;
    let margin = Vec2::new(
        pixel_margin_to_world_units(layout.active_padding_px, metrics.viewport.width, full.x),
        pixel_margin_to_world_units(layout.active_padding_px, metrics.viewport.height, full.y),
    );
    let budget = (full - margin * 2.0).max(Vec2::splat(layout.min_budget));
    fit_rect_within_budget(budget.x, budget.y, native_size.x / native_size.y)
}

pub fn active_transform(
    native_size: Vec2,
    metrics: &StageMetrics,
    layout: &LayoutConfig,
    active_z: f32,
) -> Transform {
    let fit = active_fit(native_size, metrics, layout);
    let s = fit.x / native_size.x;
    Transform::new(Vec3::new(0.0, 0.0, active_z), Vec3::ZERO, Vec3::new(s, s, 1.0))
}

/// Depths the layouts place panels at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutDepths {
    pub resting_z: f32,
    pub active_z: f32,
}

/// Target transform for every panel, indexed by panel index.
pub fn compute_target_transforms(
    panels: &PanelRegistry,
    selection: Selection,
    metrics: &StageMetrics,
    mode: LayoutMode,
    layout: &LayoutConfig,
    depths: LayoutDepths,
) -> Vec<Transform> {
    let count = resting_count(panels.len(), selection);
    let max_width = panels.iter().map(|p| p.native_size.x).fold(0.0, f32::max);
    let radius = ring_radius(layout, panels.len(), max_width);
    panels
        .iter()
        .map(|panel| match resting_slot(panel.index, selection) {
            None => active_transform(panel.native_size, metrics, layout, depths.active_z),
            Some(slot) => match mode {
                LayoutMode::Sidebar => {
                    sidebar_transform(panel.native_size, slot, metrics, layout, depths.resting_z)
                }
                LayoutMode::Ring => {
                    ring_transform(slot, count, radius, layout, depths.resting_z)
                }
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_close_the_gap() {
        let sel = Selection::Selected(2);
        let slots: Vec<_> = (0..5).map(|i| resting_slot(i, sel)).collect();
        assert_eq!(slots, vec![Some(0), Some(1), None, Some(2), Some(3)]);
        assert_eq!(resting_count(5, sel), 4);
        assert_eq!(resting_count(5, Selection::None), 5);
    }

    #[test]
    fn ring_angle_of_single_slot_is_zero() {
        assert_eq!(ring_angle(0, 1), 0.0);
        assert_eq!(ring_angle(0, 0), 0.0);
    }

    #[test]
    fn ring_radius_grows_only_when_crowded() {
        let layout = LayoutConfig::default();
        assert_eq!(ring_radius(&layout, 1, 1.6), layout.ring_radius);
        assert_eq!(ring_radius(&layout, 5, 1.6), layout.ring_radius);
        assert!(ring_radius(&layout, 12, 1.6) > layout.ring_radius);
    }
}
