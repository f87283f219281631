use glissade_core::*;
use slotmap::{SlotMap, new_key_type};
use web_time::{Duration, Instant};

use super::{Blocker, Phase, Scrim, Visibility};

new_key_type! {
    /// Handle of a pushed modal, valid until the modal is evicted.
    pub struct ModalKey;
}

/// Paints a modal's content into the rect it is given.
pub type ModalContent = Box<dyn FnMut(&mut Frame, Rect)>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModalConfig {
    /// dp
    pub width: f32,
    /// dp
    pub height: f32,
    /// dp
    pub corner_radius: f32,
    pub duration: Duration,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            width: 320.0,
            height: 200.0,
            corner_radius: 28.0,
            duration: Duration::from_millis(200),
        }
    }
}

impl ModalConfig {
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

struct ModalEntry {
    content: ModalContent,
    visibility: Visibility,
    /// Set by `pop`; the entry is evicted once its fade-out completes and
    /// nothing above it is still alive.
    closing: bool,
    blocker: Blocker,
    tag: Tag,
}

/// Stack of dialogs sharing one scrim.
///
/// `push` counts immediately; `pop` only starts the top modal's fade-out.
/// Entries leave the stack from the end once their fade-out has finished.
pub struct ModalStack {
    config: ModalConfig,
    entries: SlotMap<ModalKey, ModalEntry>,
    /// Bottom to top.
    order: Vec<ModalKey>,
    scrim: Scrim,
    on_dismiss: Option<Box<dyn FnMut()>>,
}

impl Default for ModalStack {
    fn default() -> Self {
        Self::new(ModalConfig::default())
    }
}

impl ModalStack {
    pub fn new(config: ModalConfig) -> Self {
        Self {
            config,
            entries: SlotMap::with_key(),
            order: Vec::new(),
            scrim: Scrim::new(),
            on_dismiss: None,
        }
    }

    pub fn config(&self) -> &ModalConfig {
        &self.config
    }

    /// Pushes a modal and starts its fade-in.
    pub fn push(&mut self, content: impl FnMut(&mut Frame, Rect) + 'static, now: Instant) -> ModalKey {
        let mut visibility = Visibility::new(self.config.duration, Easing::EaseOut);
        visibility.show(now);
        let key = self.entries.insert(ModalEntry {
            content: Box::new(content),
            visibility,
            closing: false,
            blocker: Blocker::default(),
            tag: Tag::new(),
        });
        self.order.push(key);
        log::debug!("modal: push {key:?} (count {})", self.order.len());
        key
    }

    /// Starts closing the topmost modal that is not already closing.
    /// Returns its key, or `None` when there is nothing left to close.
    pub fn pop(&mut self, now: Instant) -> Option<ModalKey> {
        let key = self
            .order
            .iter()
            .rev()
            .copied()
            .find(|k| self.entries.get(*k).is_some_and(|e| !e.closing));
        match key {
            Some(key) => {
                self.close(key, now);
                Some(key)
            }
            None => {
                log::warn!("modal: pop on a stack with nothing open");
                None
            }
        }
    }

    /// Starts closing one specific modal.
    pub fn close(&mut self, key: ModalKey, now: Instant) -> bool {
        let Some(entry) = self.entries.get_mut(key) else {
            return false;
        };
        if entry.closing {
            return false;
        }
        entry.closing = true;
        entry.visibility.hide(now);
        log::debug!("modal: closing {key:?}");
        true
    }

    /// Starts closing every modal.
    pub fn clear(&mut self, now: Instant) {
        for key in self.order.clone() {
            self.close(key, now);
        }
    }

    /// Entries still on the stack, closing ones included until evicted.
    pub fn count(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: ModalKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn phase(&self, key: ModalKey) -> Option<Phase> {
        self.entries.get(key).map(|e| e.visibility.phase())
    }

    pub fn top(&self) -> Option<ModalKey> {
        self.order.last().copied()
    }

    /// Replaces the default "scrim click pops the top modal" behavior.
    pub fn set_dismiss_hook(&mut self, hook: impl FnMut() + 'static) {
        self.on_dismiss = Some(Box::new(hook));
    }

    fn evict(&mut self) {
        while let Some(&key) = self.order.last() {
            let done = self
                .entries
                .get(key)
                .is_none_or(|e| e.closing && e.visibility.phase() == Phase::Hidden);
            if !done {
                break;
            }
            self.order.pop();
            self.entries.remove(key);
            log::debug!("modal: evicted {key:?} (count {})", self.order.len());
        }
    }

    fn content_rect(&self, bounds: Rect) -> Rect {
        let w = dp_to_px(self.config.width).min(bounds.w);
        let h = dp_to_px(self.config.height).min(bounds.h);
        let c = bounds.center();
        Rect::new(c.x - w * 0.5, c.y - h * 0.5, w, h)
    }

    /// Lays out every live modal over one scrim. Returns the size of the top
    /// modal, or zero when the stack is empty.
    pub fn layout(&mut self, frame: &mut Frame) -> Size {
        for key in &self.order {
            if let Some(entry) = self.entries.get_mut(*key) {
                entry.visibility.advance(frame);
            }
        }
        self.evict();
        if self.order.is_empty() {
            self.scrim.reset();
            return Size::ZERO;
        }
        let bounds = frame.bounds();
        if bounds.size().is_empty() {
            log::warn!("modal: laid out on an empty surface");
            return Size::ZERO;
        }

        let alpha = self
            .order
            .iter()
            .filter_map(|k| self.entries.get(*k))
            .map(|e| e.visibility.value())
            .fold(0.0, f32::max);
        let rect = self.content_rect(bounds);
        if self.scrim.layout(frame, alpha, &[rect]) {
            log::debug!("modal: dismissed from scrim");
            match self.on_dismiss.as_mut() {
                Some(hook) => hook(),
                None => {
                    self.pop(frame.now());
                }
            }
            frame.invalidate();
        }

        let radius = dp_to_px(self.config.corner_radius);
        let surface = theme().surface;
        for key in &self.order {
            let Some(entry) = self.entries.get_mut(*key) else {
                continue;
            };
            if !entry.visibility.is_visible() {
                continue;
            }
            entry.blocker.add(frame, rect);
            frame.push(SceneNode::PushAlpha {
                alpha: entry.visibility.value(),
            });
            frame.push(SceneNode::Rect {
                rect,
                color: surface,
                radius,
            });
            (entry.content)(frame, rect);
            frame.push(SceneNode::PopAlpha);
            frame.semantics(SemNode::new(entry.tag, Role::Dialog, rect));
        }
        rect.size()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::test_support::Harness;

    fn lay(h: &mut Harness, m: &mut ModalStack) -> Size {
        h.frame(|f| m.layout(f))
    }

    fn empty(_: &mut Frame, _: Rect) {}

    #[test]
    fn test_push_counts_immediately() {
        let h = Harness::new(800.0, 600.0);
        let mut m = ModalStack::default();
        assert!(m.is_empty());
        let a = m.push(empty, h.now);
        m.push(empty, h.now);
        assert_eq!(m.count(), 2);
        assert_eq!(m.phase(a), Some(Phase::Opening));
    }

    #[test]
    fn test_pop_evicts_after_fade() {
        let mut h = Harness::new(800.0, 600.0);
        let mut m = ModalStack::default();
        let a = m.push(empty, h.now);
        lay(&mut h, &mut m);
        h.advance(200);
        lay(&mut h, &mut m);

        assert_eq!(m.pop(h.now), Some(a));
        assert_eq!(m.count(), 1);
        assert_eq!(m.phase(a), Some(Phase::Closing));
        h.advance(100);
        lay(&mut h, &mut m);
        assert_eq!(m.count(), 1);

        h.advance(100);
        assert_eq!(lay(&mut h, &mut m), Size::ZERO);
        assert_eq!(m.count(), 0);
        assert!(!m.contains(a));
    }

    #[test]
    fn test_eviction_only_from_the_end() {
        let mut h = Harness::new(800.0, 600.0);
        let mut m = ModalStack::default();
        let a = m.push(empty, h.now);
        let b = m.push(empty, h.now);
        h.advance(200);
        lay(&mut h, &mut m);

        // closing the lower modal leaves it parked under the top one
        m.close(a, h.now);
        h.advance(300);
        lay(&mut h, &mut m);
        assert_eq!(m.count(), 2);
        assert_eq!(m.phase(a), Some(Phase::Hidden));

        m.pop(h.now);
        h.advance(300);
        lay(&mut h, &mut m);
        assert_eq!(m.count(), 0);
        assert!(!m.contains(b));
    }

    #[test]
    fn test_pop_skips_closing_entries() {
        let h = Harness::new(800.0, 600.0);
        let mut m = ModalStack::default();
        let a = m.push(empty, h.now);
        let b = m.push(empty, h.now);
        assert_eq!(m.pop(h.now), Some(b));
        assert_eq!(m.pop(h.now), Some(a));
        assert_eq!(m.pop(h.now), None);
        assert_eq!(m.count(), 2);
    }

    #[test]
    fn test_scrim_click_pops_top() {
        let mut h = Harness::new(800.0, 600.0);
        let mut m = ModalStack::default();
        m.push(empty, h.now);
        let b = m.push(empty, h.now);
        lay(&mut h, &mut m);
        h.advance(200);
        lay(&mut h, &mut m);

        h.click(10.0, 10.0);
        lay(&mut h, &mut m);
        assert_eq!(m.phase(b), Some(Phase::Closing));
        assert!(h.redraw_requested());
    }

    #[test]
    fn test_content_click_does_not_dismiss() {
        let mut h = Harness::new(800.0, 600.0);
        let mut m = ModalStack::default();
        let a = m.push(empty, h.now);
        lay(&mut h, &mut m);
        h.advance(200);
        lay(&mut h, &mut m);

        h.click(400.0, 300.0);
        lay(&mut h, &mut m);
        assert_eq!(m.phase(a), Some(Phase::Visible));
    }

    #[test]
    fn test_release_on_content_does_not_dismiss() {
        let mut h = Harness::new(800.0, 600.0);
        let mut m = ModalStack::default();
        let a = m.push(empty, h.now);
        lay(&mut h, &mut m);
        h.advance(200);
        lay(&mut h, &mut m);

        h.press(10.0, 10.0);
        h.drag(400.0, 300.0);
        h.release(400.0, 300.0);
        lay(&mut h, &mut m);
        assert_eq!(m.phase(a), Some(Phase::Visible));
    }

    #[test]
    fn test_empty_surface_lays_out_nothing() {
        let mut h = Harness::new(0.0, 0.0);
        let mut m = ModalStack::default();
        let a = m.push(empty, h.now);
        assert_eq!(lay(&mut h, &mut m), Size::ZERO);
        assert!(h.scene().is_empty());
        assert_eq!(m.phase(a), Some(Phase::Opening));

        h.advance(200);
        assert_eq!(lay(&mut h, &mut m), Size::ZERO);
        assert_eq!(m.phase(a), Some(Phase::Visible));
    }

    #[test]
    fn test_dismiss_hook_replaces_pop() {
        let mut h = Harness::new(800.0, 600.0);
        let mut m = ModalStack::default();
        let calls = Rc::new(Cell::new(0));
        let sink = calls.clone();
        m.set_dismiss_hook(move || sink.set(sink.get() + 1));
        let a = m.push(empty, h.now);
        lay(&mut h, &mut m);

        h.click(10.0, 10.0);
        lay(&mut h, &mut m);
        assert_eq!(calls.get(), 1);
        assert_ne!(m.phase(a), Some(Phase::Closing));
    }

    #[test]
    fn test_returns_centered_top_size() {
        let mut h = Harness::new(800.0, 600.0);
        let mut m = ModalStack::default();
        m.push(empty, h.now);
        let rect = Rc::new(Cell::new(Rect::default()));
        let sink = rect.clone();
        m.push(move |_, r| sink.set(r), h.now);
        assert_eq!(lay(&mut h, &mut m), Size::new(320.0, 200.0));
        assert_eq!(rect.get(), Rect::new(240.0, 200.0, 320.0, 200.0));
    }

    #[test]
    fn test_clear_closes_everything() {
        let mut h = Harness::new(800.0, 600.0);
        let mut m = ModalStack::default();
        m.push(empty, h.now);
        m.push(empty, h.now);
        m.clear(h.now);
        assert_eq!(m.count(), 2);
        h.advance(250);
        lay(&mut h, &mut m);
        assert!(m.is_empty());
    }
}
