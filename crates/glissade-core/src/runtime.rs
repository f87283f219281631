//! # Frames and event routing
//!
//! One frame is one synchronous pass over the widget tree:
//!
//! 1. The platform queues raw pointer events on the [`Router`] as they arrive.
//! 2. [`Router::begin_frame`] routes the queue against the hit regions that
//!    were registered during the *previous* frame and hands out a [`Frame`].
//! 3. Each widget's layout call drains the events addressed to its [`Tag`],
//!    updates its state, registers its hit regions for the next frame and
//!    pushes draw commands.
//! 4. [`Router::end_frame`] keeps the new regions and returns the scene plus
//!    the instant at which the host must render again, if any.
//!
//! Nothing runs between frames. A widget that is still animating calls
//! [`Frame::invalidate`] (usually through [`Frame::animate`]); forgetting to
//! do so stalls the animation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use bitflags::bitflags;
use smallvec::SmallVec;
use web_time::Instant;

use crate::animation::{AnimatedValue, Interpolate, Progress};
use crate::input::{Buttons, PointerEvent, PointerEventKind};
use crate::{Rect, Scene, SceneNode, SemNode, Size, Vec2};

static NEXT_TAG: AtomicU64 = AtomicU64::new(1);

/// Identity of an event target. Widgets allocate one at construction and
/// keep it for their whole life so routing survives re-layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(u64);

impl Tag {
    pub fn new() -> Self {
        Tag(NEXT_TAG.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl Default for Tag {
    fn default() -> Self {
        Self::new()
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct HitFlags: u8 {
        /// Events also reach the regions underneath this one.
        const PASS_THROUGH = 1 << 0;
        /// This region consumes scroll events.
        const SCROLL = 1 << 1;
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitRegion {
    pub tag: Tag,
    pub rect: Rect,
    pub flags: HitFlags,
}

pub type EventBatch = SmallVec<[PointerEvent; 4]>;

/// Per-frame context handed to every layout call.
pub struct Frame {
    now: Instant,
    size: Size,
    events: HashMap<Tag, EventBatch>,
    regions: Vec<HitRegion>,
    scene: Scene,
    semantics: Vec<SemNode>,
    redraw_at: Option<Instant>,
}

impl Frame {
    /// A frame with no pending events. The [`Router`] is the usual source.
    pub fn new(now: Instant, size: Size) -> Self {
        Self {
            now,
            size,
            events: HashMap::new(),
            regions: Vec::new(),
            scene: Scene::default(),
            semantics: Vec::new(),
            redraw_at: None,
        }
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Whole surface as a rect at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.size)
    }

    /// Drains the events routed to `tag` this frame, in arrival order.
    /// Returns an empty batch when there is nothing pending.
    pub fn events(&mut self, tag: Tag) -> EventBatch {
        self.events.remove(&tag).unwrap_or_default()
    }

    pub fn has_events(&self, tag: Tag) -> bool {
        self.events.get(&tag).is_some_and(|b| !b.is_empty())
    }

    /// Registers a hit region for the next frame. Later registrations sit on
    /// top of earlier ones.
    pub fn register(&mut self, tag: Tag, rect: Rect, flags: HitFlags) {
        self.regions.push(HitRegion { tag, rect, flags });
    }

    pub fn regions(&self) -> &[HitRegion] {
        &self.regions
    }

    /// Requests another frame as soon as possible.
    pub fn invalidate(&mut self) {
        self.invalidate_at(self.now);
    }

    /// Requests a frame no later than `at`.
    pub fn invalidate_at(&mut self, at: Instant) {
        self.redraw_at = Some(match self.redraw_at {
            Some(t) => t.min(at),
            None => at,
        });
    }

    pub fn redraw_at(&self) -> Option<Instant> {
        self.redraw_at
    }

    /// Samples `progress` at this frame's time and keeps frames coming while
    /// it is still running.
    pub fn animate(&mut self, progress: &mut Progress) -> f32 {
        let v = progress.advance(self.now);
        if progress.is_active() {
            self.invalidate();
        }
        v
    }

    /// Same as [`Frame::animate`] for an [`AnimatedValue`]. Returns `true`
    /// while it is still running.
    pub fn animate_value<T: Interpolate + Clone>(&mut self, value: &mut AnimatedValue<T>) -> bool {
        let running = value.update(self.now);
        if running {
            self.invalidate();
        }
        running
    }

    pub fn push(&mut self, node: SceneNode) {
        self.scene.nodes.push(node);
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn semantics(&mut self, node: SemNode) {
        self.semantics.push(node);
    }

    pub fn semantics_nodes(&self) -> &[SemNode] {
        &self.semantics
    }

    fn deliver(&mut self, tag: Tag, event: PointerEvent) {
        self.events.entry(tag).or_default().push(event);
    }

    /// Events nobody drained this frame.
    pub fn undelivered(&self) -> usize {
        self.events.values().map(|b| b.len()).sum()
    }
}

/// Output of [`Router::end_frame`].
#[derive(Debug)]
pub struct FrameOutput {
    pub scene: Scene,
    pub semantics: Vec<SemNode>,
    /// When the host must render the next frame; `None` means "only on input".
    pub redraw_at: Option<Instant>,
}

/// Host-side event router.
///
/// Owns the hit regions of the last frame, the pointer grab and the hover
/// set. There is exactly one router per surface.
#[derive(Default)]
pub struct Router {
    regions: Vec<HitRegion>,
    queue: Vec<PointerEvent>,
    grabs: SmallVec<[Tag; 2]>,
    held: Buttons,
    hovered: SmallVec<[Tag; 2]>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&mut self, event: PointerEvent) {
        self.queue.push(event);
    }

    pub fn queue_all(&mut self, events: impl IntoIterator<Item = PointerEvent>) {
        self.queue.extend(events);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn regions(&self) -> &[HitRegion] {
        &self.regions
    }

    pub fn is_grabbed_by(&self, tag: Tag) -> bool {
        self.grabs.contains(&tag)
    }

    pub fn begin_frame(&mut self, now: Instant, size: Size) -> Frame {
        let mut frame = Frame::new(now, size);
        let queued = std::mem::take(&mut self.queue);
        if !queued.is_empty() {
            log::trace!(
                "router: routing {} events over {} regions",
                queued.len(),
                self.regions.len()
            );
        }
        for ev in queued {
            self.route(ev, &mut frame);
        }
        frame
    }

    pub fn end_frame(&mut self, frame: Frame) -> FrameOutput {
        let undelivered = frame.undelivered();
        if undelivered > 0 {
            log::trace!("router: {undelivered} events were not drained");
        }
        let Frame {
            regions,
            scene,
            semantics,
            redraw_at,
            ..
        } = frame;
        self.hovered.retain(|t| regions.iter().any(|r| r.tag == *t));
        self.regions = regions;
        FrameOutput {
            scene,
            semantics,
            redraw_at,
        }
    }

    /// Tags under `pos`, topmost first, down to the first opaque region.
    fn hit_stack(&self, pos: Vec2) -> SmallVec<[Tag; 2]> {
        let mut out: SmallVec<[Tag; 2]> = SmallVec::new();
        for r in self.regions.iter().rev() {
            if !r.rect.contains(pos) {
                continue;
            }
            if !out.contains(&r.tag) {
                out.push(r.tag);
            }
            if !r.flags.contains(HitFlags::PASS_THROUGH) {
                break;
            }
        }
        out
    }

    fn scroll_target(&self, pos: Vec2) -> Option<Tag> {
        for r in self.regions.iter().rev() {
            if !r.rect.contains(pos) {
                continue;
            }
            if r.flags.contains(HitFlags::SCROLL) {
                return Some(r.tag);
            }
            if !r.flags.contains(HitFlags::PASS_THROUGH) {
                return None;
            }
        }
        None
    }

    fn route(&mut self, ev: PointerEvent, frame: &mut Frame) {
        match ev.kind {
            PointerEventKind::Press => {
                self.update_hover(ev, frame);
                let targets = self.hit_stack(ev.position);
                for t in &targets {
                    frame.deliver(*t, ev);
                    if !self.grabs.contains(t) {
                        self.grabs.push(*t);
                    }
                }
                self.held |= ev.buttons;
            }
            PointerEventKind::Drag => {
                if self.grabs.is_empty() {
                    self.update_hover(ev, frame);
                    return;
                }
                for t in self.grabs.clone() {
                    frame.deliver(t, ev);
                }
            }
            PointerEventKind::Release => {
                let targets = if self.grabs.is_empty() {
                    self.hit_stack(ev.position)
                } else {
                    self.grabs.clone()
                };
                for t in targets {
                    frame.deliver(t, ev);
                }
                // an empty set releases everything held, as gestures read it
                if ev.buttons.is_empty() {
                    self.held = Buttons::empty();
                } else {
                    self.held.remove(ev.buttons);
                }
                if self.held.is_empty() {
                    self.grabs.clear();
                }
            }
            PointerEventKind::Cancel => {
                for t in self.grabs.drain(..) {
                    frame.deliver(t, ev);
                }
                self.held = Buttons::empty();
            }
            PointerEventKind::Move | PointerEventKind::Enter => {
                self.update_hover(ev, frame);
                if ev.kind == PointerEventKind::Move {
                    for t in self.hovered.clone() {
                        frame.deliver(t, ev);
                    }
                }
            }
            PointerEventKind::Leave => {
                for t in self.hovered.drain(..) {
                    frame.deliver(t, ev);
                }
            }
            PointerEventKind::Scroll => {
                if let Some(t) = self.scroll_target(ev.position) {
                    frame.deliver(t, ev);
                }
            }
        }
    }

    fn update_hover(&mut self, ev: PointerEvent, frame: &mut Frame) {
        let now_hovered = self.hit_stack(ev.position);
        for t in self.hovered.iter().filter(|t| !now_hovered.contains(t)) {
            frame.deliver(*t, ev.retarget(PointerEventKind::Leave));
        }
        for t in now_hovered.iter().filter(|t| !self.hovered.contains(t)) {
            frame.deliver(*t, ev.retarget(PointerEventKind::Enter));
        }
        self.hovered = now_hovered;
    }
}
