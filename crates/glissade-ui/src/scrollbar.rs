//! Scrollbar with a draggable thumb, paging track presses and wheel nudges.
//!
//! `position` is the normalized scroll offset in `[0, 1]`; the thumb covers
//! the viewport fraction of the track. The owner reads [`Scrollbar::changed`]
//! (or installs a hook) and moves its content accordingly.

use glissade_core::*;
use web_time::{Duration, Instant};

use crate::gestures::{Gesture, GestureEvent};

/// Seek length of one page step.
pub const PAGE_DURATION: Duration = Duration::from_millis(250);
/// Seek length of the jump to either end after a long track press.
pub const JUMP_DURATION: Duration = Duration::from_millis(100);
/// How long a track press must be held before it jumps to the end.
pub const LONG_PRESS: Duration = Duration::from_secs(1);
/// Wheel delta that scrolls the whole range.
const WHEEL_UNITS: f32 = 100.0;

/// Which side of the thumb a track press landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Towards position 0.
    Before,
    /// Towards position 1.
    After,
}

impl Side {
    pub fn sign(self) -> f32 {
        match self {
            Side::Before => -1.0,
            Side::After => 1.0,
        }
    }

    /// End of the range this side points at.
    pub fn end(self) -> f32 {
        match self {
            Side::Before => 0.0,
            Side::After => 1.0,
        }
    }
}

/// Pointer state. A seek animation runs independently and is reported by
/// [`Scrollbar::is_animating`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollbarState {
    Idle,
    /// `grab` is the pointer offset from the thumb start, in px.
    DraggingThumb { grab: f32 },
    TrackPressed { side: Side, since: Instant },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollbarStyle {
    pub axis: Axis,
    /// Visible track thickness, dp.
    pub thickness: f32,
    /// dp
    pub min_thumb: f32,
}

impl Default for ScrollbarStyle {
    fn default() -> Self {
        Self {
            axis: Axis::Vertical,
            thickness: 6.0,
            min_thumb: 24.0,
        }
    }
}

impl ScrollbarStyle {
    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_min_thumb(mut self, dp: f32) -> Self {
        self.min_thumb = dp;
        self
    }
}

pub struct Scrollbar {
    viewport: f32,
    position: f32,
    seek: AnimatedValue<f32>,
    state: ScrollbarState,
    /// Main-axis length of the track at the last layout, px.
    track_len: f32,
    changed: bool,
    on_change: Option<Box<dyn FnMut(f32)>>,
    style: ScrollbarStyle,
    gesture: Gesture,
}

impl Default for Scrollbar {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Scrollbar {
    pub fn new(viewport_fraction: f32) -> Self {
        let mut s = Self {
            viewport: 1.0,
            position: 0.0,
            seek: AnimatedValue::new(0.0, Self::seek_spec(PAGE_DURATION)),
            state: ScrollbarState::Idle,
            track_len: 0.0,
            changed: false,
            on_change: None,
            style: ScrollbarStyle::default(),
            gesture: Gesture::new(),
        };
        s.set_viewport_fraction(viewport_fraction);
        s
    }

    pub fn with_style(mut self, style: ScrollbarStyle) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> &ScrollbarStyle {
        &self.style
    }

    fn seek_spec(duration: Duration) -> AnimationSpec {
        AnimationSpec::tween(duration, Easing::EaseOutCubic)
    }

    /// Fraction of the content that is visible, clamped into `[0, 1]`.
    /// Non-finite input is ignored with a warning.
    pub fn set_viewport_fraction(&mut self, fraction: f32) {
        if let Err(e) = self.try_set_viewport_fraction(fraction) {
            log::warn!("scrollbar: {e}");
        }
    }

    pub fn try_set_viewport_fraction(&mut self, fraction: f32) -> Result<()> {
        if !fraction.is_finite() {
            return Err(Error::NonFiniteViewport(fraction));
        }
        self.viewport = fraction.clamp(0.0, 1.0);
        Ok(())
    }

    pub fn viewport_fraction(&self) -> f32 {
        self.viewport
    }

    /// Viewport fraction the thumb actually covers once the minimum thumb
    /// length is applied. Page steps use this.
    pub fn effective_viewport_fraction(&self) -> f32 {
        if self.track_len > 0.0 {
            self.thumb_len(self.track_len) / self.track_len
        } else {
            self.viewport
        }
    }

    /// Jumps to `position` and stops any seek. Not reported by
    /// [`Scrollbar::changed`].
    pub fn set_position(&mut self, position: f32) {
        if !position.is_finite() {
            log::warn!("scrollbar: {}", Error::NonFinitePosition(position));
            return;
        }
        self.position = position.clamp(0.0, 1.0);
        self.seek.snap_to(self.position);
    }

    /// Seeks to `target` with the page-step animation.
    pub fn animate_to(&mut self, target: f32, now: Instant) {
        if !target.is_finite() {
            log::warn!("scrollbar: {}", Error::NonFinitePosition(target));
            return;
        }
        self.seek_to(target, PAGE_DURATION, now);
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    /// Reports whether the position moved during layout (input or a seek)
    /// since the last call, and clears the flag.
    pub fn changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    pub fn set_change_hook(&mut self, hook: impl FnMut(f32) + 'static) {
        self.on_change = Some(Box::new(hook));
    }

    pub fn state(&self) -> ScrollbarState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        self.seek.is_animating()
    }

    /// Target of the running seek.
    pub fn seek_target(&self) -> Option<f32> {
        self.seek.is_animating().then(|| *self.seek.target())
    }

    fn thumb_len(&self, track_len: f32) -> f32 {
        (track_len * self.viewport)
            .max(dp_to_px(self.style.min_thumb))
            .min(track_len)
    }

    /// Thumb start and length along the track, px from the track start.
    fn thumb_span(&self, track_len: f32) -> (f32, f32) {
        let len = self.thumb_len(track_len);
        ((track_len - len).max(0.0) * self.position, len)
    }

    fn set_state(&mut self, state: ScrollbarState) {
        if std::mem::discriminant(&self.state) != std::mem::discriminant(&state) {
            log::debug!("scrollbar: {:?} -> {:?}", self.state, state);
        }
        self.state = state;
    }

    fn seek_to(&mut self, target: f32, duration: Duration, now: Instant) {
        let target = target.clamp(0.0, 1.0);
        log::debug!(
            "scrollbar: seek {:.3} -> {:.3} over {:?}",
            self.position,
            target,
            duration
        );
        self.seek.snap_to(self.position);
        self.seek
            .set_target_with(target, Self::seek_spec(duration), now);
    }

    fn move_to(&mut self, position: f32) {
        let position = position.clamp(0.0, 1.0);
        if position == self.position {
            return;
        }
        self.position = position;
        self.changed = true;
        if let Some(hook) = self.on_change.as_mut() {
            hook(position);
        }
    }

    fn press(&mut self, offset: f32, now: Instant) {
        let (start, len) = self.thumb_span(self.track_len);
        if offset >= start && offset <= start + len {
            self.seek.snap_to(self.position);
            self.set_state(ScrollbarState::DraggingThumb {
                grab: offset - start,
            });
            return;
        }
        let side = if offset < start {
            Side::Before
        } else {
            Side::After
        };
        let step = self.effective_viewport_fraction();
        self.seek_to(self.position + side.sign() * step, PAGE_DURATION, now);
        self.set_state(ScrollbarState::TrackPressed { side, since: now });
    }

    fn drag(&mut self, offset: f32) {
        let ScrollbarState::DraggingThumb { grab } = self.state else {
            return;
        };
        let free = self.track_len - self.thumb_len(self.track_len);
        if free <= 0.0 {
            return;
        }
        let next = ((offset - grab) / free).clamp(0.0, 1.0);
        self.seek.snap_to(next);
        self.move_to(next);
    }

    fn nudge(&mut self, delta: Vec2) {
        let d = match self.style.axis {
            Axis::Vertical => delta.y,
            Axis::Horizontal => {
                if delta.x != 0.0 {
                    delta.x
                } else {
                    delta.y
                }
            }
        };
        if d == 0.0 {
            return;
        }
        let step = d / WHEEL_UNITS;
        if self.seek.is_animating() {
            self.seek.shift(step, 0.0, 1.0);
        }
        self.move_to(self.position + step);
    }

    /// Handles this frame's input, advances the seek, registers the hit
    /// region covering `area` and paints. Returns the occupied size.
    pub fn layout(&mut self, frame: &mut Frame, area: Rect) -> Size {
        let axis = self.style.axis;
        let now = frame.now();
        self.track_len = axis.main_len(&area).max(0.0);
        let start = axis.main_start(&area);

        for ev in self.gesture.update(frame) {
            match ev {
                GestureEvent::Scroll { delta } => self.nudge(delta),
                GestureEvent::Press { position, buttons }
                    if buttons.contains(Buttons::PRIMARY) && self.state == ScrollbarState::Idle =>
                {
                    self.press(axis.main(position) - start, now);
                }
                GestureEvent::Drag { position } => self.drag(axis.main(position) - start),
                GestureEvent::Release { buttons, .. } if buttons.contains(Buttons::PRIMARY) => {
                    self.set_state(ScrollbarState::Idle);
                }
                GestureEvent::Cancel => self.set_state(ScrollbarState::Idle),
                _ => {}
            }
        }

        if let ScrollbarState::TrackPressed { side, since } = self.state {
            let deadline = since + LONG_PRESS;
            if now >= deadline {
                self.seek_to(side.end(), JUMP_DURATION, now);
                self.set_state(ScrollbarState::Idle);
            } else {
                frame.invalidate_at(deadline);
            }
        }

        if self.seek.is_animating() {
            frame.animate_value(&mut self.seek);
            let next = *self.seek.get();
            self.move_to(next);
        }

        self.gesture.add(frame, area, HitFlags::SCROLL);
        self.paint(frame, area);
        area.size()
    }

    fn paint(&self, frame: &mut Frame, area: Rect) {
        let axis = self.style.axis;
        let th = theme();
        let t = dp_to_px(self.style.thickness).min(axis.cross_len(&area));
        let c = area.center();
        let start = axis.main_start(&area);
        let cross = match axis {
            Axis::Horizontal => c.y - t * 0.5,
            Axis::Vertical => c.x - t * 0.5,
        };
        let (thumb_start, thumb_len) = self.thumb_span(self.track_len);

        frame.push(SceneNode::Rect {
            rect: axis.rect(start, cross, self.track_len, t),
            color: th.scrollbar_track,
            radius: t * 0.5,
        });
        let active = self.gesture.hovered() || matches!(self.state, ScrollbarState::DraggingThumb { .. });
        frame.push(SceneNode::Rect {
            rect: axis.rect(start + thumb_start, cross, thumb_len, t),
            color: if active {
                th.scrollbar_thumb_active
            } else {
                th.scrollbar_thumb
            },
            radius: t * 0.5,
        });
        frame.semantics(SemNode::new(self.gesture.tag(), Role::Scrollbar, area));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::test_support::Harness;

    // vertical track, 200 px long
    const AREA: Rect = Rect {
        x: 0.0,
        y: 0.0,
        w: 16.0,
        h: 200.0,
    };

    fn lay(h: &mut Harness, s: &mut Scrollbar) -> Size {
        h.frame(|f| s.layout(f, AREA))
    }

    fn bar(viewport: f32) -> (Harness, Scrollbar) {
        let mut h = Harness::new(300.0, 200.0);
        let mut s = Scrollbar::new(viewport);
        lay(&mut h, &mut s);
        (h, s)
    }

    #[test]
    fn test_track_click_pages_forward() {
        let (mut h, mut s) = bar(0.3);
        h.press(8.0, 180.0);
        lay(&mut h, &mut s);
        assert!(matches!(
            s.state(),
            ScrollbarState::TrackPressed {
                side: Side::After,
                ..
            }
        ));
        assert!(s.is_animating());
        h.release(8.0, 180.0);
        lay(&mut h, &mut s);
        assert_eq!(s.state(), ScrollbarState::Idle);

        h.advance(250);
        lay(&mut h, &mut s);
        assert!(s.position() >= 0.25 && s.position() <= 0.35);
        assert!(!s.is_animating());
    }

    #[test]
    fn test_track_click_before_thumb_pages_back() {
        let (mut h, mut s) = bar(0.3);
        s.set_position(1.0);
        lay(&mut h, &mut s);

        h.click(8.0, 10.0);
        lay(&mut h, &mut s);
        h.advance(300);
        lay(&mut h, &mut s);
        assert!(s.position() < 1.0);
        assert!((s.position() - 0.7).abs() < 1e-4);
    }

    #[test]
    fn test_seek_is_monotone_and_redraws() {
        let (mut h, mut s) = bar(0.3);
        h.click(8.0, 180.0);
        lay(&mut h, &mut s);
        let mut last = s.position();
        for _ in 0..5 {
            h.advance(40);
            lay(&mut h, &mut s);
            assert!(s.position() >= last);
            assert!(h.redraw_requested());
            last = s.position();
        }
    }

    #[test]
    fn test_thumb_drag_follows_pointer() {
        let (mut h, mut s) = bar(0.5);
        // thumb covers [0, 100]
        h.press(8.0, 50.0);
        lay(&mut h, &mut s);
        assert_eq!(s.state(), ScrollbarState::DraggingThumb { grab: 50.0 });
        assert_eq!(s.position(), 0.0);
        assert!(!s.changed());

        h.drag(8.0, 100.0);
        lay(&mut h, &mut s);
        assert!((s.position() - 0.5).abs() < 1e-5);
        assert!(s.changed());

        h.drag(8.0, 400.0);
        lay(&mut h, &mut s);
        assert_eq!(s.position(), 1.0);

        h.release(8.0, 400.0);
        lay(&mut h, &mut s);
        assert_eq!(s.state(), ScrollbarState::Idle);
    }

    #[test]
    fn test_secondary_release_keeps_thumb_drag() {
        let (mut h, mut s) = bar(0.5);
        h.press(8.0, 50.0);
        lay(&mut h, &mut s);
        h.press_with(8.0, 50.0, Buttons::SECONDARY);
        h.release_with(8.0, 50.0, Buttons::SECONDARY);
        lay(&mut h, &mut s);
        assert_eq!(s.state(), ScrollbarState::DraggingThumb { grab: 50.0 });

        h.drag(8.0, 100.0);
        lay(&mut h, &mut s);
        assert!((s.position() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_secondary_release_keeps_track_press() {
        let (mut h, mut s) = bar(0.1);
        h.press(8.0, 190.0);
        lay(&mut h, &mut s);
        h.press_with(8.0, 190.0, Buttons::SECONDARY);
        h.release_with(8.0, 190.0, Buttons::SECONDARY);
        h.advance(1000);
        lay(&mut h, &mut s);
        assert_eq!(s.seek_target(), Some(1.0));
    }

    #[test]
    fn test_thumb_drag_cancels_seek() {
        let (mut h, mut s) = bar(0.5);
        s.animate_to(1.0, h.now);
        lay(&mut h, &mut s);
        assert!(s.is_animating());

        // thumb still at the start
        h.press(8.0, 10.0);
        lay(&mut h, &mut s);
        assert!(!s.is_animating());
        let held = s.position();
        h.advance(300);
        lay(&mut h, &mut s);
        assert_eq!(s.position(), held);
    }

    #[test]
    fn test_long_press_jumps_to_end() {
        let (mut h, mut s) = bar(0.1);
        h.press(8.0, 190.0);
        lay(&mut h, &mut s);
        let deadline = h.now + LONG_PRESS;
        h.advance(500);
        lay(&mut h, &mut s);
        assert!(h.redraw_at().is_some_and(|t| t <= deadline));
        assert!(matches!(s.state(), ScrollbarState::TrackPressed { .. }));

        h.advance(500);
        lay(&mut h, &mut s);
        assert_eq!(s.state(), ScrollbarState::Idle);
        assert_eq!(s.seek_target(), Some(1.0));

        h.advance(100);
        lay(&mut h, &mut s);
        assert_eq!(s.position(), 1.0);
    }

    #[test]
    fn test_release_before_long_press_only_pages() {
        let (mut h, mut s) = bar(0.1);
        h.press(8.0, 190.0);
        lay(&mut h, &mut s);
        h.advance(900);
        h.release(8.0, 190.0);
        lay(&mut h, &mut s);
        h.advance(200);
        lay(&mut h, &mut s);
        assert_eq!(s.state(), ScrollbarState::Idle);
        assert!(s.position() < 0.5);
    }

    #[test]
    fn test_scroll_nudges() {
        let (mut h, mut s) = bar(0.3);
        h.scroll(8.0, 100.0, 10.0);
        lay(&mut h, &mut s);
        assert!((s.position() - 0.1).abs() < 1e-5);
        assert!(s.changed());

        h.scroll(8.0, 100.0, -50.0);
        lay(&mut h, &mut s);
        assert_eq!(s.position(), 0.0);
    }

    #[test]
    fn test_scroll_shifts_running_seek() {
        let (mut h, mut s) = bar(0.3);
        s.animate_to(0.5, h.now);
        h.scroll(8.0, 100.0, 10.0);
        lay(&mut h, &mut s);
        assert!(s.seek_target().is_some_and(|t| (t - 0.6).abs() < 1e-5));
        h.advance(250);
        lay(&mut h, &mut s);
        assert!((s.position() - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_min_thumb_floors_page_step() {
        let (mut h, mut s) = bar(0.01);
        // 24 px thumb on a 200 px track
        assert!((s.effective_viewport_fraction() - 0.12).abs() < 1e-5);
        h.click(8.0, 150.0);
        lay(&mut h, &mut s);
        h.advance(250);
        lay(&mut h, &mut s);
        assert!((s.position() - 0.12).abs() < 1e-4);
    }

    #[test]
    fn test_non_finite_viewport_rejected() {
        let mut s = Scrollbar::new(0.4);
        assert!(matches!(
            s.try_set_viewport_fraction(f32::NAN),
            Err(Error::NonFiniteViewport(_))
        ));
        s.set_viewport_fraction(f32::INFINITY);
        assert_eq!(s.viewport_fraction(), 0.4);
        s.set_viewport_fraction(3.0);
        assert_eq!(s.viewport_fraction(), 1.0);
    }

    #[test]
    fn test_change_hook_sees_every_move() {
        let (mut h, mut s) = bar(0.3);
        let calls = Rc::new(Cell::new(0));
        let sink = calls.clone();
        s.set_change_hook(move |_| sink.set(sink.get() + 1));
        h.scroll(8.0, 100.0, 5.0);
        h.scroll(8.0, 100.0, 5.0);
        lay(&mut h, &mut s);
        assert_eq!(calls.get(), 2);
    }
}
