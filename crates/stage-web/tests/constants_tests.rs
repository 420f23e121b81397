// Host-side sanity checks for the wasm front-end constants.

mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
fn pixel_ratio_cap_is_at_least_one() {
    assert!(CANVAS_MAX_PIXEL_RATIO >= 1.0);
}

#[test]
fn frame_step_clamp_is_below_a_second() {
    assert!(MAX_FRAME_DT_SEC > 0.0 && MAX_FRAME_DT_SEC < 1.0);
}

#[test]
fn clear_colour_is_opaque_and_normalised() {
    assert_eq!(CLEAR_RGBA[3], 1.0);
    assert!(CLEAR_RGBA.iter().all(|c| (0.0..=1.0).contains(c)));
}

#[test]
fn placeholder_is_opaque() {
    assert_eq!(PLACEHOLDER_RGBA8[3], 255);
}

#[test]
fn tints_are_normalised_and_pending_is_dimmer() {
    for tint in [CONTENT_TINT, PENDING_TINT] {
        assert!(tint.iter().all(|c| (0.0..=1.0).contains(c)));
        assert_eq!(tint[3], 1.0);
    }
    assert!(PENDING_TINT[..3].iter().zip(&CONTENT_TINT[..3]).all(|(p, c)| p <= c));
}

#[test]
fn overlay_z_index_is_numeric() {
    assert!(OVERLAY_Z_INDEX.parse::<i32>().is_ok());
}
