// Picking through the live stage transforms.

mod common;

use common::*;
use glam::Vec2;
use stage_core::*;

#[test]
fn every_resting_panel_is_pickable_at_its_centre() {
    let (stage, _images, _log) = build_stage(5, StageConfig::default());
    for i in 0..5 {
        let centre = screen_center(&stage, i);
        assert_eq!(stage.pick(centre, &VIEWPORT), Some(i), "panel {i} at {centre:?}");
    }
}

#[test]
fn ring_panels_are_pickable_at_their_centres() {
    let (stage, _images, _log) = build_stage(6, StageConfig::default().with_mode(LayoutMode::Ring));
    for i in 0..6 {
        let centre = screen_center(&stage, i);
        assert_eq!(stage.pick(centre, &VIEWPORT), Some(i), "panel {i}");
    }
}

#[test]
fn empty_space_picks_nothing() {
    let (stage, _images, _log) = build_stage(5, StageConfig::default());
    assert_eq!(stage.pick(Vec2::new(1200.0, 400.0), &VIEWPORT), None);
    assert_eq!(stage.pick(Vec2::new(640.0, 780.0), &VIEWPORT), None);
}

#[test]
fn pointer_outside_a_degenerate_canvas_picks_nothing() {
    let (stage, _images, _log) = build_stage(2, StageConfig::default());
    let centre = screen_center(&stage, 0);
    assert_eq!(stage.pick(centre, &Viewport::sized(0.0, 0.0)), None);
}

#[test]
fn nearer_active_panel_occludes_resting_one() {
    let (mut stage, _images, _log) = build_stage(3, StageConfig::default());
    stage.select(Some(0));
    settle(&mut stage);
    // panel 1 now rests in slot 0, behind the enlarged active panel
    let centre = screen_center(&stage, 1);
    assert_eq!(stage.pick(centre, &VIEWPORT), Some(0));
}

#[test]
fn hits_are_sorted_nearest_first() {
    let (mut stage, _images, _log) = build_stage(3, StageConfig::default());
    stage.select(Some(0));
    settle(&mut stage);
    let centre = screen_center(&stage, 1);
    let ndc = screen_to_ndc(centre, &VIEWPORT).unwrap();
    let ray = stage.camera().ray_through_ndc(ndc);
    let hits = intersect_panels(&ray, stage.panels());
    let order: Vec<usize> = hits
        .iter()
        .filter_map(|h| stage.panels().index_of_object(h.object))
        .collect();
    assert_eq!(order, vec![0, 1]);
    assert!(hits[0].distance < hits[1].distance);
}

#[test]
fn canvas_offset_is_respected() {
    let (mut stage, _images, log) = build_stage(3, StageConfig::default());
    let centre = screen_center(&stage, 2);
    let shifted = Viewport::new(100.0, 50.0, VIEWPORT.width, VIEWPORT.height);
    let change = stage.click(centre + Vec2::new(100.0, 50.0), shifted).unwrap();
    assert_eq!(change.current, Selection::Selected(2));
    assert_eq!(log.borrow().len(), 1);
    // same size: no re-layout
    assert_eq!(stage.renderer().resizes.len(), 1);
}

#[test]
fn renderer_objects_map_back_to_panel_indices() {
    let (stage, _images, _log) = build_stage(4, StageConfig::default());
    for panel in stage.panels().iter() {
        assert_eq!(stage.panels().index_of_object(panel.object), Some(panel.index));
    }
    assert_eq!(stage.panels().index_of_object(ObjectId(7)), None);
}
