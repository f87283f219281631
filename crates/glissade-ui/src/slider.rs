//! Value sliders over a numeric range.
//!
//! ```rust
//! use glissade_core::*;
//! use glissade_ui::FloatSlider;
//! use web_time::Instant;
//!
//! let mut volume = FloatSlider::new(0.0, 100.0, 50.0);
//! volume.set_value(140.0);
//! assert_eq!(volume.value(), 100.0);
//! assert!(!volume.changed()); // programmatic changes are not reported
//!
//! let mut frame = Frame::new(Instant::now(), Size::new(400.0, 300.0));
//! let size = volume.layout(&mut frame, Rect::new(0.0, 0.0, 200.0, 48.0));
//! assert_eq!(size, Size::new(200.0, 48.0));
//! ```

use std::fmt;

use glissade_core::*;

use crate::gestures::{Gesture, GestureEvent};

/// Numeric type a [`Slider`] can hold.
pub trait SliderValue: Copy + PartialOrd + fmt::Debug + 'static {
    fn to_f64(self) -> f64;
    /// Converts back from the continuous value, rounding where the type
    /// requires it.
    fn from_f64(v: f64) -> Self;
    /// Smallest change a wheel nudge may produce.
    fn min_increment() -> f64;

    fn is_finite(self) -> bool {
        self.to_f64().is_finite()
    }
}

impl SliderValue for f32 {
    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(v: f64) -> Self {
        v as f32
    }

    fn min_increment() -> f64 {
        0.0
    }
}

impl SliderValue for i64 {
    fn to_f64(self) -> f64 {
        self as f64
    }

    /// Nearest integer, ties toward positive infinity.
    fn from_f64(v: f64) -> Self {
        (v + 0.5).floor() as i64
    }

    fn min_increment() -> f64 {
        1.0
    }
}

pub type FloatSlider = Slider<f32>;
pub type IntSlider = Slider<i64>;

#[derive(Clone, Debug, PartialEq)]
pub struct SliderStyle {
    pub axis: Axis,
    /// dp
    pub track_thickness: f32,
    /// dp
    pub thumb_diameter: f32,
    /// Minimum extent of the hit region on both axes, in dp.
    pub min_touch: f32,
    pub label: Option<String>,
}

impl Default for SliderStyle {
    fn default() -> Self {
        Self {
            axis: Axis::Horizontal,
            track_thickness: 4.0,
            thumb_diameter: 20.0,
            min_touch: 48.0,
            label: None,
        }
    }
}

impl SliderStyle {
    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_thumb_diameter(mut self, dp: f32) -> Self {
        self.thumb_diameter = dp;
        self
    }

    pub fn with_track_thickness(mut self, dp: f32) -> Self {
        self.track_thickness = dp;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Slider over `[min, max]`.
///
/// Pointer input sets the value from the press position along the track.
/// Vertical sliders grow upwards: the bottom end is `min`.
pub struct Slider<T: SliderValue> {
    min: T,
    max: T,
    value: T,
    /// Normalized thumb position in `[0, 1]`.
    position: f32,
    step: Option<T>,
    changed: bool,
    /// A primary press started on this slider and has not been released.
    tracking: bool,
    enabled: bool,
    on_change: Option<Box<dyn FnMut(T)>>,
    style: SliderStyle,
    gesture: Gesture,
}

fn clamp_to<T: PartialOrd>(v: T, lo: T, hi: T) -> T {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}

impl<T: SliderValue> Slider<T> {
    /// Non-finite bounds fall back to `[0, 1]` with a warning.
    pub fn new(min: T, max: T, value: T) -> Self {
        let mut s = Self {
            min: T::from_f64(0.0),
            max: T::from_f64(1.0),
            value: T::from_f64(0.0),
            position: 0.0,
            step: None,
            changed: false,
            tracking: false,
            enabled: true,
            on_change: None,
            style: SliderStyle::default(),
            gesture: Gesture::new(),
        };
        s.set_range(min, max);
        s.set_value(value);
        s
    }

    pub fn with_style(mut self, style: SliderStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_step(mut self, step: T) -> Self {
        self.set_step(Some(step));
        self
    }

    pub fn style(&self) -> &SliderStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: SliderStyle) {
        self.style = style;
    }

    /// Sets the bounds; swapped if given in reverse. The value is re-clamped
    /// into the new range. Non-finite bounds are ignored with a warning.
    pub fn set_range(&mut self, min: T, max: T) {
        if let Err(e) = self.try_set_range(min, max) {
            log::warn!("slider: {e}; range left at {:?}..={:?}", self.min, self.max);
        }
    }

    pub fn try_set_range(&mut self, min: T, max: T) -> Result<()> {
        if !min.is_finite() || !max.is_finite() {
            return Err(Error::NonFiniteRange {
                min: min.to_f64(),
                max: max.to_f64(),
            });
        }
        let (min, max) = if min > max { (max, min) } else { (min, max) };
        self.min = min;
        self.max = max;
        self.value = clamp_to(self.value, min, max);
        self.sync_position();
        Ok(())
    }

    pub fn range(&self) -> (T, T) {
        (self.min, self.max)
    }

    /// Sets the value, clamped into the range. Does not raise
    /// [`Slider::changed`] or call the change hook.
    pub fn set_value(&mut self, value: T) {
        if !value.is_finite() {
            log::warn!("slider: ignoring non-finite value {value:?}");
            return;
        }
        self.value = clamp_to(value, self.min, self.max);
        self.sync_position();
    }

    pub fn value(&self) -> T {
        self.value
    }

    /// Normalized thumb position in `[0, 1]`.
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Reports whether user input changed the value since the last call,
    /// and clears the flag.
    pub fn changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    /// Called with the new value on every press, drag and wheel nudge.
    pub fn set_change_hook(&mut self, hook: impl FnMut(T) + 'static) {
        self.on_change = Some(Box::new(hook));
    }

    pub fn clear_change_hook(&mut self) {
        self.on_change = None;
    }

    /// Values set by input snap to `min + k * step`. Zero, negative or
    /// non-finite steps turn snapping off.
    pub fn set_step(&mut self, step: Option<T>) {
        self.step = step.filter(|s| s.is_finite() && s.to_f64() > 0.0);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.gesture.reset();
            self.tracking = false;
        }
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_dragging(&self) -> bool {
        self.tracking && self.gesture.dragging()
    }

    fn span(&self) -> (f64, f64) {
        (self.min.to_f64(), self.max.to_f64())
    }

    // min == max holds the position where it was
    fn sync_position(&mut self) {
        let (lo, hi) = self.span();
        if hi > lo {
            self.position = ((self.value.to_f64() - lo) / (hi - lo)).clamp(0.0, 1.0) as f32;
        }
    }

    fn snap(&self, v: f64) -> f64 {
        let (lo, hi) = self.span();
        match self.step {
            Some(step) => {
                let step = step.to_f64();
                (lo + ((v - lo) / step + 0.5).floor() * step).clamp(lo, hi)
            }
            None => v,
        }
    }

    fn commit(&mut self) {
        self.changed = true;
        if let Some(hook) = self.on_change.as_mut() {
            hook(self.value);
        }
    }

    fn seek_pointer(&mut self, offset: f32, track_len: f32) {
        let (lo, hi) = self.span();
        if hi > lo {
            if track_len > 0.0 {
                self.position = (offset / track_len).clamp(0.0, 1.0);
            }
            let v = self.snap(lo + self.position as f64 * (hi - lo));
            self.value = clamp_to(T::from_f64(v), self.min, self.max);
            if self.step.is_some() {
                self.sync_position();
            }
        } else {
            self.value = self.min;
        }
        log::trace!("slider: pointer -> {:?} ({:.3})", self.value, self.position);
        self.commit();
    }

    fn nudge(&mut self, delta: Vec2) {
        let d = if delta.y != 0.0 { delta.y } else { delta.x };
        if d == 0.0 {
            return;
        }
        let (lo, hi) = self.span();
        let amount = self
            .step
            .map(|s| s.to_f64())
            .unwrap_or((hi - lo) * 0.01)
            .max(T::min_increment());
        // wheel up grows the value
        let sign = if d < 0.0 { 1.0 } else { -1.0 };
        let v = self.snap((self.value.to_f64() + sign * amount).clamp(lo, hi));
        self.value = clamp_to(T::from_f64(v), self.min, self.max);
        self.sync_position();
        self.commit();
    }

    fn offset_along(axis: Axis, rect: &Rect, p: Vec2) -> f32 {
        match axis {
            Axis::Horizontal => p.x - rect.x,
            Axis::Vertical => rect.bottom() - p.y,
        }
    }

    /// Thumb centre, kept half a thumb inside both ends of the track.
    fn thumb_center(&self, rect: &Rect, thumb: f32) -> Vec2 {
        let axis = self.style.axis;
        let len = axis.main_len(rect);
        let half = (thumb * 0.5).min(len * 0.5);
        let along = (self.position * len).clamp(half, len - half);
        let c = rect.center();
        match axis {
            Axis::Horizontal => Vec2::new(rect.x + along, c.y),
            Axis::Vertical => Vec2::new(c.x, rect.bottom() - along),
        }
    }

    /// Handles this frame's input, registers the hit region and paints.
    /// Returns the occupied size, never smaller than the touch target.
    pub fn layout(&mut self, frame: &mut Frame, area: Rect) -> Size {
        let axis = self.style.axis;
        let thumb = dp_to_px(self.style.thumb_diameter);
        let touch = dp_to_px(self.style.min_touch).max(thumb);
        let main_len = axis.main_len(&area).max(touch);
        let cross_slack = (axis.cross_len(&area) - touch).max(0.0);
        let rect = match axis {
            Axis::Horizontal => Rect::new(area.x, area.y + cross_slack * 0.5, main_len, touch),
            Axis::Vertical => Rect::new(area.x + cross_slack * 0.5, area.y, touch, main_len),
        };

        let events = self.gesture.update(frame);
        if self.enabled {
            for ev in events {
                match ev {
                    GestureEvent::Press { position, buttons } if buttons.contains(Buttons::PRIMARY) => {
                        self.tracking = true;
                        self.seek_pointer(Self::offset_along(axis, &rect, position), main_len);
                    }
                    GestureEvent::Drag { position } if self.tracking => {
                        self.seek_pointer(Self::offset_along(axis, &rect, position), main_len);
                    }
                    GestureEvent::Release { buttons, .. } if buttons.contains(Buttons::PRIMARY) => {
                        self.tracking = false;
                    }
                    GestureEvent::Cancel => self.tracking = false,
                    GestureEvent::Scroll { delta } => self.nudge(delta),
                    _ => {}
                }
            }
        }
        self.gesture.add(frame, rect, HitFlags::SCROLL);

        let th = theme();
        let t = dp_to_px(self.style.track_thickness);
        let center = self.thumb_center(&rect, thumb);
        let c = rect.center();
        let (track, active) = match axis {
            Axis::Horizontal => (
                Rect::new(rect.x, c.y - t * 0.5, main_len, t),
                Rect::new(rect.x, c.y - t * 0.5, center.x - rect.x, t),
            ),
            Axis::Vertical => (
                Rect::new(c.x - t * 0.5, rect.y, t, main_len),
                Rect::new(c.x - t * 0.5, center.y, t, rect.bottom() - center.y),
            ),
        };
        let (fill, knob) = if self.enabled {
            (th.primary, th.primary)
        } else {
            (th.outline, th.outline)
        };
        frame.push(SceneNode::Rect {
            rect: track,
            color: th.outline_variant,
            radius: t * 0.5,
        });
        frame.push(SceneNode::Rect {
            rect: active,
            color: fill,
            radius: t * 0.5,
        });
        if self.enabled && (self.gesture.hovered() || self.gesture.pressed()) {
            let halo = thumb * 2.0;
            frame.push(SceneNode::Ellipse {
                rect: Rect::new(center.x - halo * 0.5, center.y - halo * 0.5, halo, halo),
                color: th.primary.with_alpha(40),
            });
        }
        frame.push(SceneNode::Ellipse {
            rect: Rect::new(center.x - thumb * 0.5, center.y - thumb * 0.5, thumb, thumb),
            color: knob,
        });

        let mut sem = SemNode::new(self.gesture.tag(), Role::Slider, rect);
        sem.enabled = self.enabled;
        if let Some(label) = &self.style.label {
            sem = sem.label(label.clone());
        }
        frame.semantics(sem);

        axis.size(main_len, touch)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::test_support::Harness;

    const AREA: Rect = Rect {
        x: 0.0,
        y: 0.0,
        w: 200.0,
        h: 48.0,
    };

    fn lay<T: SliderValue>(h: &mut Harness, s: &mut Slider<T>) -> Size {
        h.frame(|f| s.layout(f, AREA))
    }

    fn thumb_rect(h: &Harness) -> Rect {
        h.scene()
            .iter()
            .rev()
            .find_map(|n| match n {
                SceneNode::Ellipse { rect, .. } => Some(*rect),
                _ => None,
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_press_at_80_percent_sets_value() {
        let mut h = Harness::new(400.0, 100.0);
        let mut s = FloatSlider::new(0.0, 100.0, 50.0);
        lay(&mut h, &mut s);

        h.press(160.0, 24.0);
        lay(&mut h, &mut s);
        assert!((s.value() - 80.0).abs() < 1e-3);
        assert!(s.changed());
        assert!(!s.changed());
    }

    #[test]
    fn test_int_rounds_half_up() {
        let mut h = Harness::new(400.0, 100.0);
        let mut s = IntSlider::new(0, 10, 0);
        lay(&mut h, &mut s);

        h.press(50.0, 24.0);
        lay(&mut h, &mut s);
        assert_eq!(s.value(), 3);

        assert_eq!(i64::from_f64(-2.5), -2);
        assert_eq!(i64::from_f64(2.4), 2);
    }

    #[test]
    fn test_set_value_clamps_without_changed() {
        let mut s = FloatSlider::new(0.0, 100.0, 50.0);
        s.set_value(150.0);
        assert_eq!(s.value(), 100.0);
        assert_eq!(s.position(), 1.0);
        s.set_value(-5.0);
        assert_eq!(s.value(), 0.0);
        s.set_value(33.3);
        assert_eq!(s.value(), 33.3);
        assert!(!s.changed());
    }

    #[test]
    fn test_range_reclamps_and_swaps() {
        let mut s = IntSlider::new(0, 100, 80);
        s.set_range(50, 10);
        assert_eq!(s.range(), (10, 50));
        assert_eq!(s.value(), 50);
    }

    #[test]
    fn test_non_finite_range_rejected() {
        let mut s = FloatSlider::new(0.0, 10.0, 5.0);
        assert!(matches!(
            s.try_set_range(f32::NAN, 1.0),
            Err(Error::NonFiniteRange { .. })
        ));
        s.set_range(0.0, f32::INFINITY);
        assert_eq!(s.range(), (0.0, 10.0));
        s.set_value(f32::NAN);
        assert_eq!(s.value(), 5.0);
    }

    #[test]
    fn test_degenerate_range_holds_position() {
        let mut h = Harness::new(400.0, 100.0);
        let mut s = FloatSlider::new(0.0, 100.0, 25.0);
        s.set_range(5.0, 5.0);
        assert_eq!(s.value(), 5.0);
        let before = s.position();
        lay(&mut h, &mut s);

        h.press(190.0, 24.0);
        lay(&mut h, &mut s);
        assert_eq!(s.value(), 5.0);
        assert_eq!(s.position(), before);
        assert!(s.changed());
    }

    #[test]
    fn test_drag_past_end_clamps() {
        let mut h = Harness::new(400.0, 100.0);
        let mut s = FloatSlider::new(0.0, 1.0, 0.5);
        lay(&mut h, &mut s);

        h.press(100.0, 24.0);
        h.drag(390.0, 90.0);
        lay(&mut h, &mut s);
        assert_eq!(s.value(), 1.0);
        assert_eq!(s.position(), 1.0);

        h.drag(-50.0, 24.0);
        lay(&mut h, &mut s);
        assert_eq!(s.value(), 0.0);
    }

    #[test]
    fn test_secondary_release_keeps_tracking() {
        let mut h = Harness::new(400.0, 100.0);
        let mut s = FloatSlider::new(0.0, 100.0, 0.0);
        lay(&mut h, &mut s);

        h.press(20.0, 24.0);
        h.press_with(20.0, 24.0, Buttons::SECONDARY);
        h.release_with(20.0, 24.0, Buttons::SECONDARY);
        lay(&mut h, &mut s);
        assert!((s.value() - 10.0).abs() < 1e-3);

        h.drag(100.0, 24.0);
        lay(&mut h, &mut s);
        assert!((s.value() - 50.0).abs() < 1e-3);
        assert!(s.is_dragging());

        h.release(100.0, 24.0);
        h.drag(180.0, 24.0);
        lay(&mut h, &mut s);
        assert!((s.value() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_hook_called_per_input() {
        let mut h = Harness::new(400.0, 100.0);
        let mut s = IntSlider::new(0, 100, 0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        s.set_change_hook(move |v| sink.borrow_mut().push(v));
        lay(&mut h, &mut s);

        h.press(100.0, 24.0);
        h.drag(100.0, 24.0);
        h.drag(150.0, 24.0);
        h.release(150.0, 24.0);
        lay(&mut h, &mut s);
        assert_eq!(*seen.borrow(), vec![50, 50, 75]);
    }

    #[test]
    fn test_thumb_stays_inside_track() {
        let mut h = Harness::new(400.0, 100.0);
        let mut s = FloatSlider::new(0.0, 100.0, 0.0);
        lay(&mut h, &mut s);
        assert!(thumb_rect(&h).x >= AREA.x);

        s.set_value(100.0);
        lay(&mut h, &mut s);
        let r = thumb_rect(&h);
        assert!(r.right() <= AREA.right() + 1e-3);
    }

    #[test]
    fn test_min_touch_target() {
        let mut h = Harness::new(400.0, 100.0);
        let mut s = FloatSlider::new(0.0, 1.0, 0.0);
        let size = h.frame(|f| s.layout(f, Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(size, Size::new(48.0, 48.0));
    }

    #[test]
    fn test_step_snaps_pointer_value() {
        let mut h = Harness::new(400.0, 100.0);
        let mut s = FloatSlider::new(0.0, 100.0, 0.0).with_step(10.0);
        lay(&mut h, &mut s);

        h.press(166.0, 24.0);
        lay(&mut h, &mut s);
        assert!((s.value() - 80.0).abs() < 1e-3);
        assert!((s.position() - 0.8).abs() < 1e-4);
    }

    #[test]
    fn test_wheel_nudges() {
        let mut h = Harness::new(400.0, 100.0);
        let mut f = FloatSlider::new(0.0, 100.0, 50.0);
        lay(&mut h, &mut f);
        h.scroll(100.0, 24.0, -1.0);
        lay(&mut h, &mut f);
        assert!((f.value() - 51.0).abs() < 1e-3);
        assert!(f.changed());

        let mut i = IntSlider::new(0, 10, 5);
        lay(&mut h, &mut i);
        h.scroll(100.0, 24.0, 3.0);
        lay(&mut h, &mut i);
        assert_eq!(i.value(), 4);
    }

    #[test]
    fn test_vertical_grows_upwards() {
        let mut h = Harness::new(400.0, 300.0);
        let mut s = FloatSlider::new(0.0, 100.0, 0.0)
            .with_style(SliderStyle::default().with_axis(Axis::Vertical));
        let area = Rect::new(0.0, 0.0, 48.0, 200.0);
        h.frame(|f| s.layout(f, area));

        h.press(24.0, 40.0);
        h.frame(|f| s.layout(f, area));
        assert!((s.value() - 80.0).abs() < 1e-3);
    }

    #[test]
    fn test_disabled_ignores_input() {
        let mut h = Harness::new(400.0, 100.0);
        let mut s = FloatSlider::new(0.0, 100.0, 50.0);
        s.set_enabled(false);
        lay(&mut h, &mut s);
        h.press(10.0, 24.0);
        lay(&mut h, &mut s);
        assert_eq!(s.value(), 50.0);
        assert!(!s.changed());
    }
}
