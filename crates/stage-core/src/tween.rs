//! Property tweening: the `Tweener` seam and the built-in `TweenEngine`.

use fnv::FnvHashMap;
use glam::Vec3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ease {
    Linear,
    /// Cubic deceleration, the stage default.
    #[default]
    Power3Out,
}

impl Ease {
    /// Maps linear progress `t` in [0, 1] to eased progress.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power3Out => 1.0 - (1.0 - t).powi(3),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Position,
    Rotation,
    Scale,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Position, Channel::Rotation, Channel::Scale];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TweenKey {
    pub panel: usize,
    pub channel: Channel,
}

impl TweenKey {
    pub fn new(panel: usize, channel: Channel) -> Self {
        Self { panel, channel }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenRequest {
    pub from: Vec3,
    pub to: Vec3,
    pub duration_sec: f32,
    pub ease: Ease,
}

/// Interpolates vector properties over time.
pub trait Tweener {
    /// Starts a tween for `key`, replacing any tween already in flight for
    /// that key. Nothing is queued.
    fn animate(&mut self, key: TweenKey, request: TweenRequest);
    fn is_animating(&self, key: TweenKey) -> bool;
    /// Seconds left on the in-flight tween for `key`.
    fn remaining_sec(&self, key: TweenKey) -> Option<f32>;
    /// Advances every tween by `dt_sec` and reports the new values. Tweens
    /// that reach their end report the exact target once and are dropped.
    fn advance(&mut self, dt_sec: f32, apply: &mut dyn FnMut(TweenKey, Vec3));
    fn active_count(&self) -> usize;
    fn clear(&mut self);
}

#[derive(Clone, Copy, Debug)]
struct Tween {
    request: TweenRequest,
    elapsed: f32,
}

impl Tween {
    fn progress(&self) -> f32 {
        if self.request.duration_sec <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.request.duration_sec).min(1.0)
        }
    }

    fn value(&self) -> Vec3 {
        let t = self.progress();
        if t >= 1.0 {
            return self.request.to;
        }
        self.request
            .from
            .lerp(self.request.to, self.request.ease.apply(t))
    }
}

/// Frame-stepped tween engine keyed by panel and channel.
#[derive(Debug, Default)]
pub struct TweenEngine {
    active: FnvHashMap<TweenKey, Tween>,
}

impl TweenEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destination of the in-flight tween for `key`.
    pub fn target_of(&self, key: TweenKey) -> Option<Vec3> {
        self.active.get(&key).map(|t| t.request.to)
    }
}

impl Tweener for TweenEngine {
    fn animate(&mut self, key: TweenKey, request: TweenRequest) {
        self.active.insert(
            key,
            Tween {
                request,
                elapsed: 0.0,
            },
        );
    }

    fn is_animating(&self, key: TweenKey) -> bool {
        self.active.contains_key(&key)
    }

    fn remaining_sec(&self, key: TweenKey) -> Option<f32> {
        self.active
            .get(&key)
            .map(|t| (t.request.duration_sec - t.elapsed).max(0.0))
    }

    fn advance(&mut self, dt_sec: f32, apply: &mut dyn FnMut(TweenKey, Vec3)) {
        let dt = if dt_sec.is_finite() { dt_sec.max(0.0) } else { 0.0 };
        self.active.retain(|key, tween| {
            tween.elapsed += dt;
            apply(*key, tween.value());
            tween.progress() < 1.0
        });
    }

    fn active_count(&self) -> usize {
        self.active.len()
    }

    fn clear(&mut self) {
        self.active.clear();
    }
}
