//! Turns target transforms into tween requests and tween output back into
//! live panel transforms.

use crate::config::TransitionTiming;
use crate::constants::TRANSFORM_EPSILON;
use crate::geometry::shortest_angle_delta;
use crate::panel::{PanelRegistry, Transform};
use crate::tween::{Channel, TweenKey, TweenRequest, Tweener};
use glam::Vec3;

/// Rotation equivalent to `target` (per axis, modulo 2π) that lies on the
/// shorter arc from `current`.
#[inline]
pub fn unwrap_rotation(current: Vec3, target: Vec3) -> Vec3 {
    current
        + Vec3::new(
            shortest_angle_delta(current.x, target.x),
            shortest_angle_delta(current.y, target.y),
            shortest_angle_delta(current.z, target.z),
        )
}

/// Writes one tweened channel value into the panel's live transform.
pub fn apply_channel(panels: &mut PanelRegistry, key: TweenKey, value: Vec3) {
    if let Some(panel) = panels.get_mut(key.panel) {
        let t = &mut panel.transform;
        match key.channel {
            Channel::Position => t.translation = value,
            Channel::Rotation => t.rotation = value,
            Channel::Scale => t.scale = value,
        }
    }
}

fn channel_of(t: &Transform, channel: Channel) -> Vec3 {
    match channel {
        Channel::Position => t.translation,
        Channel::Rotation => t.rotation,
        Channel::Scale => t.scale,
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TransitionDriver {
    timing: TransitionTiming,
}

impl TransitionDriver {
    pub fn new(timing: TransitionTiming) -> Self {
        Self { timing }
    }

    pub fn timing(&self) -> TransitionTiming {
        self.timing
    }

    /// Animates every panel toward `targets` with the default timing.
    /// Returns the number of channels (re)started.
    pub fn drive(&self, panels: &PanelRegistry, targets: &[Transform], tweener: &mut dyn Tweener) -> usize {
        self.drive_with(panels, targets, tweener, self.timing)
    }

    /// Like `drive` with explicit timing. A channel is retargeted when its
    /// live value differs from the target or it is still in flight, so a
    /// newer target always supersedes an older animation. A retargeted
    /// channel never finishes sooner than its in-flight tween would have.
    pub fn drive_with(
        &self,
        panels: &PanelRegistry,
        targets: &[Transform],
        tweener: &mut dyn Tweener,
        timing: TransitionTiming,
    ) -> usize {
        let mut started = 0;
        for (panel, target) in panels.iter().zip(targets) {
            for channel in Channel::ALL {
                let key = TweenKey::new(panel.index, channel);
                let from = channel_of(&panel.transform, channel);
                let (to, duration_sec) = match channel {
                    Channel::Position => (target.translation, timing.position_sec),
                    Channel::Rotation => (unwrap_rotation(from, target.rotation), timing.rotation_sec),
                    Channel::Scale => (target.scale, timing.scale_sec),
                };
                let remaining = tweener.remaining_sec(key);
                if from.abs_diff_eq(to, TRANSFORM_EPSILON) && remaining.is_none() {
                    continue;
                }
                let duration_sec = remaining.map_or(duration_sec, |r| r.max(duration_sec));
                tweener.animate(
                    key,
                    TweenRequest {
                        from,
                        to,
                        duration_sec,
                        ease: timing.ease,
                    },
                );
                started += 1;
            }
        }
        started
    }

    /// Places every panel on its target immediately. In-flight tweens are
    /// superseded by zero-length ones ending on the same target.
    pub fn snap(&self, panels: &mut PanelRegistry, targets: &[Transform], tweener: &mut dyn Tweener) {
        for (panel, target) in panels.iter_mut().zip(targets) {
            let rotation = unwrap_rotation(panel.transform.rotation, target.rotation);
            panel.transform = Transform::new(target.translation, rotation, target.scale);
            for channel in Channel::ALL {
                let key = TweenKey::new(panel.index, channel);
                if tweener.is_animating(key) {
                    let v = channel_of(&panel.transform, channel);
                    tweener.animate(
                        key,
                        TweenRequest {
                            from: v,
                            to: v,
                            duration_sec: 0.0,
                            ease: self.timing.ease,
                        },
                    );
                }
            }
        }
    }
}
