//! # Animation clock
//!
//! There is no timer thread. Every animation stores the instant it started
//! and is sampled with the frame's `now`; a widget that is still animating
//! asks its [`Frame`](crate::Frame) for another frame (see
//! [`Frame::animate`](crate::Frame::animate)), otherwise the animation
//! freezes where it is.
//!
//! - [`Progress`]: normalized `[0, 1]` progress with a direction, used by
//!   overlays for fade and slide.
//! - [`AnimatedValue`]: tween between two values, used for seeks.

use web_time::{Duration, Instant};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    Linear,
    EaseIn,
    /// Quadratic ease-out: `1 - (1 - t)^2`.
    #[default]
    EaseOut,
    /// Cubic ease-out: `1 - (1 - t)^3`.
    EaseOutCubic,
    EaseInOut,
}

impl Easing {
    pub fn interpolate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseOutCubic => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }

    /// Linear time that maps onto eased value `e`. All curves here are monotone.
    pub fn inverse(&self, e: f32) -> f32 {
        let e = e.clamp(0.0, 1.0);
        match self {
            Easing::Linear => e,
            Easing::EaseIn => e.sqrt(),
            Easing::EaseOut => 1.0 - (1.0 - e).sqrt(),
            Easing::EaseOutCubic => 1.0 - (1.0 - e).cbrt(),
            Easing::EaseInOut => {
                if e < 0.5 {
                    (e * 0.5).sqrt()
                } else {
                    1.0 - ((1.0 - e) * 0.5).sqrt()
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationSpec {
    pub duration: Duration,
    pub easing: Easing,
    pub delay: Duration,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(300),
            easing: Easing::EaseInOut,
            delay: Duration::ZERO,
        }
    }
}

impl AnimationSpec {
    pub fn tween(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            delay: Duration::ZERO,
        }
    }

    pub fn fast() -> Self {
        Self {
            duration: Duration::from_millis(150),
            easing: Easing::EaseOut,
            delay: Duration::ZERO,
        }
    }

    pub fn slow() -> Self {
        Self {
            duration: Duration::from_millis(600),
            easing: Easing::EaseInOut,
            delay: Duration::ZERO,
        }
    }
}

pub trait Interpolate {
    fn interpolate(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for crate::Color {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self.lerp(*other, t)
    }
}

/// Which terminal value a [`Progress`] is heading to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    /// Opening: heads to 1.
    Forward,
    /// Closing: heads to 0.
    #[default]
    Reverse,
}

impl Direction {
    pub fn terminal(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => 0.0,
        }
    }
}

/// Normalized animation progress.
///
/// `value` is always in `[0, 1]` and monotone within one run. When idle it
/// rests at the terminal value of its direction.
#[derive(Clone, Debug)]
pub struct Progress {
    value: f32,
    start: Option<Instant>,
    /// Linear time already covered when the run started (reversal mid-flight).
    start_linear: f32,
    duration: Duration,
    easing: Easing,
    direction: Direction,
    active: bool,
}

impl Progress {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            value: 0.0,
            start: None,
            start_linear: 0.0,
            duration,
            easing,
            direction: Direction::Reverse,
            active: false,
        }
    }

    /// Starts a run towards `direction`'s terminal value, continuing from the
    /// current value rather than jumping to the opposite end.
    pub fn start(&mut self, now: Instant, direction: Direction) {
        let eased = match direction {
            Direction::Forward => self.value,
            Direction::Reverse => 1.0 - self.value,
        };
        self.start_linear = self.easing.inverse(eased);
        self.start = Some(now);
        self.direction = direction;
        self.active = true;
        log::trace!(
            "progress: start {:?} from {:.3} (linear {:.3})",
            direction,
            self.value,
            self.start_linear
        );
    }

    /// Samples the animation at `now`. Returns the new value.
    pub fn advance(&mut self, now: Instant) -> f32 {
        if !self.active {
            return self.value;
        }
        let start = self.start.unwrap_or(now);
        // Clock anomalies (now < start) clamp to zero elapsed.
        let elapsed = now.saturating_duration_since(start);
        let linear = if self.duration.is_zero() {
            1.0
        } else {
            (self.start_linear + elapsed.as_secs_f32() / self.duration.as_secs_f32())
                .clamp(0.0, 1.0)
        };

        if linear >= 1.0 {
            self.value = self.direction.terminal();
            self.active = false;
            return self.value;
        }

        let eased = self.easing.interpolate(linear);
        let next = match self.direction {
            Direction::Forward => eased.max(self.value),
            Direction::Reverse => (1.0 - eased).min(self.value),
        };
        self.value = next.clamp(0.0, 1.0);
        self.value
    }

    /// Jumps to `direction`'s terminal value and stops any run.
    pub fn snap(&mut self, direction: Direction) {
        self.value = direction.terminal();
        self.direction = direction;
        self.active = false;
        self.start = None;
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }
}

/// Animated value that transitions smoothly
#[derive(Clone, Debug)]
pub struct AnimatedValue<T: Interpolate + Clone> {
    current: T,
    target: T,
    start: T,
    spec: AnimationSpec,
    start_time: Option<Instant>,
}

impl<T: Interpolate + Clone> AnimatedValue<T> {
    pub fn new(initial: T, spec: AnimationSpec) -> Self {
        Self {
            current: initial.clone(),
            target: initial.clone(),
            start: initial,
            spec,
            start_time: None,
        }
    }

    /// Retargets from wherever the value currently is.
    pub fn set_target(&mut self, target: T, now: Instant) {
        self.start = self.current.clone();
        self.target = target;
        self.start_time = Some(now);
    }

    pub fn set_target_with(&mut self, target: T, spec: AnimationSpec, now: Instant) {
        self.spec = spec;
        self.set_target(target, now);
    }

    /// Stops animating and rests at `value`.
    pub fn snap_to(&mut self, value: T) {
        self.current = value.clone();
        self.start = value.clone();
        self.target = value;
        self.start_time = None;
    }

    /// Returns `true` while the animation is ongoing.
    pub fn update(&mut self, now: Instant) -> bool {
        if let Some(start) = self.start_time {
            let elapsed = now.saturating_duration_since(start);

            if elapsed < self.spec.delay {
                return true; // Still waiting for delay
            }

            let animation_time = elapsed - self.spec.delay;

            if animation_time >= self.spec.duration {
                self.current = self.target.clone();
                self.start_time = None;
                return false;
            }

            let t = animation_time.as_secs_f32() / self.spec.duration.as_secs_f32();
            let eased_t = self.spec.easing.interpolate(t);
            self.current = self.start.interpolate(&self.target, eased_t);

            true
        } else {
            false
        }
    }

    pub fn get(&self) -> &T {
        &self.current
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn is_animating(&self) -> bool {
        self.start_time.is_some()
    }
}

impl AnimatedValue<f32> {
    /// Shifts start, target and current by `delta`, clamped into `[lo, hi]`.
    /// An ongoing run keeps its timeline.
    pub fn shift(&mut self, delta: f32, lo: f32, hi: f32) {
        self.start = (self.start + delta).clamp(lo, hi);
        self.target = (self.target + delta).clamp(lo, hi);
        self.current = (self.current + delta).clamp(lo, hi);
    }
}
