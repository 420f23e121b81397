// Host-side tests for the layout engine.

mod common;

use common::*;
use glam::{Vec2, Vec3};
use stage_core::*;
use std::f32::consts::{FRAC_PI_2, TAU};

#[test]
fn ring_angles_are_even_and_distinct() {
    for n in 1..=12usize {
        let angles: Vec<f32> = (0..n).map(|i| ring_angle(i, n)).collect();
        for (i, a) in angles.iter().enumerate() {
            assert!((a - TAU * i as f32 / n as f32).abs() < 1e-6);
        }
        for i in 0..n {
            for j in (i + 1)..n {
                let d = shortest_angle_delta(angles[i], angles[j]).abs();
                assert!(d > 1e-3, "n={n} slots {i},{j} coincide");
            }
        }
    }
}

#[test]
fn ring_panels_face_outward() {
    let layout = LayoutConfig::default();
    for slot in 0..6 {
        let t = ring_transform(slot, 6, layout.ring_radius, &layout, -1.0);
        let angle = ring_angle(slot, 6);
        assert!((t.rotation.z - (angle + FRAC_PI_2)).abs() < 1e-6);
        let radial = Vec2::new(t.translation.x, t.translation.y).length();
        assert!((radial - layout.ring_radius).abs() < 1e-4);
        assert_eq!(t.rotation.x, layout.ring_tilt_x);
    }
}

#[test]
fn sidebar_scenario_closes_the_gap() {
    let (mut stage, _images, _log) = build_stage(5, StageConfig::default());
    let before: Vec<Transform> = stage.targets().to_vec();
    stage.select(Some(2));
    let after = stage.targets();

    assert_eq!(after[0], before[0]);
    assert_eq!(after[1], before[1]);
    assert_eq!(after[3].translation, before[2].translation);
    assert_eq!(after[4].translation, before[3].translation);

    let active = after[2];
    assert_eq!(active.rotation, Vec3::ZERO);
    assert_eq!(active.translation, Vec3::new(0.0, 0.0, ACTIVE_PLANE_Z));
    assert!(active.scale.x > 1.0);
}

#[test]
fn sidebar_panels_share_left_edge_and_tilt() {
    let (stage, _images, _log) = build_stage(4, StageConfig::default());
    let metrics = stage.metrics();
    for (i, t) in stage.targets().iter().enumerate() {
        let left_edge = t.translation.x - PANEL_WIDTH * 0.5;
        assert!((left_edge - metrics.sidebar_left_x).abs() < 1e-5);
        assert!((t.translation.y - (SIDEBAR_TOP_Y - i as f32 * SIDEBAR_SPACING)).abs() < 1e-5);
        assert_eq!(t.rotation.y, RESTING_TILT_Y);
        assert_eq!(t.translation.z, RESTING_PLANE_Z);
    }
}

#[test]
fn ring_repacks_around_active_panel() {
    let (mut stage, _images, _log) = build_stage(5, StageConfig::default().with_mode(LayoutMode::Ring));
    stage.select(Some(1));
    let layout = LayoutConfig::default();
    let t = stage.targets();
    for (index, slot) in [(0, 0), (2, 1), (3, 2), (4, 3)] {
        let expected = ring_transform(slot, 4, layout.ring_radius, &layout, RESTING_PLANE_Z);
        assert!(t[index].approx_eq(&expected), "panel {index}");
    }
}

#[test]
fn crowded_ring_keeps_neighbours_apart() {
    let (mut stage, _images, _log) = build_stage(12, StageConfig::default().with_mode(LayoutMode::Ring));
    let check = |targets: &[Transform], order: &[usize]| {
        for pair in order.windows(2) {
            let a = targets[pair[0]].translation;
            let b = targets[pair[1]].translation;
            let d = Vec2::new(a.x - b.x, a.y - b.y).length();
            assert!(d >= PANEL_WIDTH - 1e-4, "panels {} and {} are {d} apart", pair[0], pair[1]);
        }
    };
    let all: Vec<usize> = (0..12).chain([0]).collect();
    check(stage.targets(), &all);

    // radius is fixed for the stage; a selection only widens the spacing
    let radius = Vec2::new(stage.targets()[0].translation.x, stage.targets()[0].translation.y).length();
    assert!(radius > LayoutConfig::default().ring_radius);
    stage.select(Some(4));
    let resting: Vec<usize> = (0..12).filter(|&i| i != 4).chain([0]).collect();
    check(stage.targets(), &resting);
    let t = stage.targets()[0].translation;
    assert!((Vec2::new(t.x, t.y).length() - radius).abs() < 1e-4);
}

fn active_bounds_for(viewport: Viewport, native: Vec2) -> (Transform, ScreenRect) {
    let config = StageConfig::default();
    let metrics = StageMetrics::derive(viewport, &config).unwrap();
    let t = active_transform(native, &metrics, &config.layout, config.camera.active_z);
    let camera = Camera::from_config(&config.camera, metrics.aspect);
    let half = native * 0.5;
    let corners = [
        Vec3::new(-half.x, -half.y, 0.0),
        Vec3::new(half.x, -half.y, 0.0),
        Vec3::new(half.x, half.y, 0.0),
        Vec3::new(-half.x, half.y, 0.0),
    ]
    .map(|c| {
        project_world_to_screen(t.matrix().transform_point3(c), camera.view_projection(), &viewport)
            .unwrap()
    });
    (t, ScreenRect::from_points(corners))
}

#[test]
fn active_fit_keeps_aspect_and_pixel_margin() {
    let margin = ACTIVE_PLANE_PADDING_PX;
    let tol = 0.05;
    for (w, h) in [(1280.0, 800.0), (800.0, 1280.0), (375.0, 667.0), (2560.0, 720.0), (500.0, 500.0)] {
        for native in [Vec2::new(1.6, 1.0), Vec2::new(1.0, 1.4), Vec2::new(1.0, 1.0)] {
            let viewport = Viewport::sized(w, h);
            let (t, rect) = active_bounds_for(viewport, native);
            assert!((t.scale.x - t.scale.y).abs() < 1e-6);
            assert!((rect.width / rect.height - native.x / native.y).abs() < 1e-3);
            assert!(rect.left >= margin - tol, "{w}x{h} {rect:?}");
            assert!(rect.top >= margin - tol, "{w}x{h} {rect:?}");
            assert!(rect.right() <= w - margin + tol, "{w}x{h} {rect:?}");
            assert!(rect.bottom() <= h - margin + tol, "{w}x{h} {rect:?}");
            // one axis is tight against the margin
            let tight_x = (rect.left - margin).abs() < 0.5;
            let tight_y = (rect.top - margin).abs() < 0.5;
            assert!(tight_x || tight_y, "{w}x{h} {rect:?}");
        }
    }
}

#[test]
fn tiny_viewport_clamps_to_positive_scale() {
    let config = StageConfig::default();
    let metrics = StageMetrics::derive(Viewport::sized(40.0, 30.0), &config).unwrap();
    let t = active_transform(Vec2::new(1.6, 1.0), &metrics, &config.layout, 0.0);
    assert!(t.scale.x > 0.0 && t.scale.x.is_finite());
    assert!(t.scale.y > 0.0 && t.scale.y.is_finite());
}

#[test]
fn resize_without_selection_moves_only_sidebar_x() {
    let (mut stage, _images, _log) = build_stage(5, StageConfig::default());
    let before = stage.targets().to_vec();
    let sources: Vec<String> = stage.panels().iter().map(|p| p.source.clone()).collect();
    stage.resize(Viewport::sized(1920.0, 800.0));
    let after = stage.targets();
    for (b, a) in before.iter().zip(after) {
        assert!(a.translation.x < b.translation.x);
        assert_eq!(a.translation.y, b.translation.y);
        assert_eq!(a.translation.z, b.translation.z);
        assert_eq!(a.rotation, b.rotation);
        assert_eq!(a.scale, b.scale);
    }
    let after_sources: Vec<String> = stage.panels().iter().map(|p| p.source.clone()).collect();
    assert_eq!(sources, after_sources);
    assert!(stage.panels().iter().enumerate().all(|(i, p)| p.index == i));
}
