//! # Overlays
//!
//! Overlays draw above the rest of the frame and are laid out last, so
//! their hit regions sit on top. Each one is a [`Visibility`] phase machine
//! over a [`Progress`]:
//!
//! ```text
//!  Hidden --show--> Opening --(done)--> Visible
//!     ^                                    |
//!     +----(done)---- Closing <----hide----+
//! ```
//!
//! `show`/`hide` during the opposite transition reverse it from the current
//! progress. A [`Scrim`] dims the rest of the surface while an overlay is up
//! and turns clicks on it into dismissal. Content rects register an opaque
//! region between the scrim and the content widgets so clicks on content
//! never reach the scrim.

mod drawer;
mod menu;
mod modal;

pub use drawer::{Drawer, DrawerConfig, Edge};
pub use menu::{GlobalMenu, MenuConfig, MenuEvent, MenuEvents, MenuItemKey};
pub use modal::{ModalConfig, ModalContent, ModalKey, ModalStack};

use glissade_core::*;
use web_time::{Duration, Instant};

use crate::gestures::{Gesture, GestureEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Hidden,
    Opening,
    Visible,
    Closing,
}

/// Open/close phase machine shared by every overlay.
#[derive(Clone, Debug)]
pub struct Visibility {
    progress: Progress,
}

impl Visibility {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            progress: Progress::new(duration, easing),
        }
    }

    pub fn phase(&self) -> Phase {
        match (self.progress.is_active(), self.progress.direction()) {
            (true, Direction::Forward) => Phase::Opening,
            (true, Direction::Reverse) => Phase::Closing,
            (false, Direction::Forward) => Phase::Visible,
            (false, Direction::Reverse) => Phase::Hidden,
        }
    }

    /// Starts opening. No-op (returns `false`) when already open or opening.
    pub fn show(&mut self, now: Instant) -> bool {
        match self.phase() {
            Phase::Visible | Phase::Opening => false,
            Phase::Hidden | Phase::Closing => {
                self.progress.start(now, Direction::Forward);
                true
            }
        }
    }

    /// Starts closing. No-op (returns `false`) when already hidden or closing.
    pub fn hide(&mut self, now: Instant) -> bool {
        match self.phase() {
            Phase::Hidden | Phase::Closing => false,
            Phase::Visible | Phase::Opening => {
                self.progress.start(now, Direction::Reverse);
                true
            }
        }
    }

    pub fn toggle(&mut self, now: Instant) {
        match self.phase() {
            Phase::Hidden | Phase::Closing => self.show(now),
            Phase::Visible | Phase::Opening => self.hide(now),
        };
    }

    /// Jumps straight to `Visible` (`Forward`) or `Hidden` (`Reverse`).
    pub fn snap(&mut self, direction: Direction) {
        self.progress.snap(direction);
    }

    /// `true` in every phase but `Hidden`.
    pub fn is_visible(&self) -> bool {
        self.phase() != Phase::Hidden
    }

    /// `true` while open or opening.
    pub fn is_shown(&self) -> bool {
        matches!(self.phase(), Phase::Opening | Phase::Visible)
    }

    pub fn value(&self) -> f32 {
        self.progress.value()
    }

    /// Samples the progress at the frame's time, keeping frames coming while
    /// it moves.
    pub fn advance(&mut self, frame: &mut Frame) -> f32 {
        let before = self.phase();
        let v = frame.animate(&mut self.progress);
        let after = self.phase();
        if before != after {
            log::debug!("overlay: {before:?} -> {after:?}");
        }
        v
    }
}

/// Full-surface dimming layer.
#[derive(Debug, Default)]
pub struct Scrim {
    gesture: Gesture,
}

impl Scrim {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paints the scrim at `alpha` times the theme's scrim color and
    /// registers it over the whole surface, blocking everything below.
    /// Returns `true` when the scrim itself was clicked this frame. A press
    /// that started on the scrim but was released over one of `content`
    /// does not count.
    pub fn layout(&mut self, frame: &mut Frame, alpha: f32, content: &[Rect]) -> bool {
        let clicked = self.gesture.update(frame).iter().any(|e| match e {
            GestureEvent::Click { position, buttons } => {
                buttons.contains(Buttons::PRIMARY) && !content.iter().any(|r| r.contains(*position))
            }
            _ => false,
        });
        let bounds = frame.bounds();
        frame.push(SceneNode::Rect {
            rect: bounds,
            color: theme().scrim.mul_alpha(alpha),
            radius: 0.0,
        });
        self.gesture.add(frame, bounds, HitFlags::empty());
        frame.semantics(SemNode::new(self.gesture.tag(), Role::Scrim, bounds));
        clicked
    }

    pub fn reset(&mut self) {
        self.gesture.reset();
    }
}

/// Opaque region that keeps clicks on overlay content away from the scrim.
/// Registered after the scrim and before the content widgets.
#[derive(Debug, Default)]
pub(crate) struct Blocker {
    tag: Tag,
}

impl Blocker {
    pub fn add(&self, frame: &mut Frame, rect: Rect) {
        // whatever lands here and no widget took is dropped
        let swallowed = frame.events(self.tag);
        if !swallowed.is_empty() {
            log::trace!("overlay: {} events absorbed by content", swallowed.len());
        }
        frame.register(self.tag, rect, HitFlags::empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Harness;

    fn vis() -> Visibility {
        Visibility::new(Duration::from_millis(200), Easing::EaseOutCubic)
    }

    #[test]
    fn test_phases_follow_progress() {
        let mut h = Harness::new(100.0, 100.0);
        let mut v = vis();
        assert_eq!(v.phase(), Phase::Hidden);

        assert!(v.show(h.now));
        assert_eq!(v.phase(), Phase::Opening);
        h.advance(200);
        h.frame(|f| v.advance(f));
        assert_eq!(v.phase(), Phase::Visible);
        assert_eq!(v.value(), 1.0);

        assert!(v.hide(h.now));
        assert_eq!(v.phase(), Phase::Closing);
        h.advance(200);
        h.frame(|f| v.advance(f));
        assert_eq!(v.phase(), Phase::Hidden);
        assert_eq!(v.value(), 0.0);
    }

    #[test]
    fn test_show_hide_idempotent() {
        let mut h = Harness::new(100.0, 100.0);
        let mut v = vis();
        assert!(!v.hide(h.now));
        assert!(v.show(h.now));
        h.advance(50);
        h.frame(|f| v.advance(f));
        let mid = v.value();
        // a second show must not restart the run
        assert!(!v.show(h.now));
        h.frame(|f| v.advance(f));
        assert_eq!(v.value(), mid);
    }

    #[test]
    fn test_reverse_mid_flight_continues() {
        let mut h = Harness::new(100.0, 100.0);
        let mut v = vis();
        v.show(h.now);
        h.advance(60);
        h.frame(|f| v.advance(f));
        let mid = v.value();
        assert!(mid > 0.0 && mid < 1.0);

        v.hide(h.now);
        h.frame(|f| v.advance(f));
        assert!((v.value() - mid).abs() < 1e-3);
        h.advance(20);
        h.frame(|f| v.advance(f));
        assert!(v.value() < mid);
    }

    #[test]
    fn test_advance_requests_redraw_while_moving() {
        let mut h = Harness::new(100.0, 100.0);
        let mut v = vis();
        v.show(h.now);
        h.frame(|f| v.advance(f));
        assert!(h.redraw_requested());
        h.advance(250);
        h.frame(|f| v.advance(f));
        assert!(!h.redraw_requested());
    }

    #[test]
    fn test_toggle() {
        let h = Harness::new(100.0, 100.0);
        let mut v = vis();
        v.toggle(h.now);
        assert_eq!(v.phase(), Phase::Opening);
        v.toggle(h.now);
        assert_eq!(v.phase(), Phase::Closing);
    }

    #[test]
    fn test_scrim_click_reported() {
        let mut h = Harness::new(100.0, 100.0);
        let mut s = Scrim::new();
        assert!(!h.frame(|f| s.layout(f, 1.0, &[])));
        h.click(50.0, 50.0);
        assert!(h.frame(|f| s.layout(f, 1.0, &[])));
        let color = h.scene().iter().find_map(|n| match n {
            SceneNode::Rect { color, .. } => Some(*color),
            _ => None,
        });
        assert_eq!(color, Some(theme().scrim));
    }

    #[test]
    fn test_scrim_ignores_release_over_content() {
        let mut h = Harness::new(100.0, 100.0);
        let mut s = Scrim::new();
        let content = [Rect::new(0.0, 0.0, 40.0, 100.0)];
        h.frame(|f| s.layout(f, 1.0, &content));
        h.press(80.0, 50.0);
        h.drag(20.0, 50.0);
        h.release(20.0, 50.0);
        assert!(!h.frame(|f| s.layout(f, 1.0, &content)));
    }

    #[test]
    fn test_scrim_alpha_follows_progress() {
        let mut h = Harness::new(100.0, 100.0);
        let mut s = Scrim::new();
        h.frame(|f| s.layout(f, 0.5, &[]));
        let alpha = h.scene().iter().find_map(|n| match n {
            SceneNode::Rect { color, .. } => Some(color.3),
            _ => None,
        });
        assert_eq!(alpha, Some(theme().scrim.mul_alpha(0.5).3));
    }
}
