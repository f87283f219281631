//! Drives widgets through a real `Router` with a synthetic clock.

use glissade_core::*;
use web_time::{Duration, Instant};

pub(crate) struct Harness {
    pub router: Router,
    pub now: Instant,
    pub size: Size,
    pub last: Option<FrameOutput>,
}

impl Harness {
    pub fn new(width: f32, height: f32) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            router: Router::new(),
            now: Instant::now(),
            size: Size::new(width, height),
            last: None,
        }
    }

    /// Runs one frame at the current synthetic time.
    pub fn frame<R>(&mut self, f: impl FnOnce(&mut Frame) -> R) -> R {
        let mut frame = self.router.begin_frame(self.now, self.size);
        let r = f(&mut frame);
        self.last = Some(self.router.end_frame(frame));
        r
    }

    pub fn advance(&mut self, ms: u64) {
        self.now += Duration::from_millis(ms);
    }

    pub fn redraw_requested(&self) -> bool {
        self.last.as_ref().is_some_and(|o| o.redraw_at.is_some())
    }

    pub fn redraw_at(&self) -> Option<Instant> {
        self.last.as_ref().and_then(|o| o.redraw_at)
    }

    pub fn scene(&self) -> &[SceneNode] {
        self.last.as_ref().map(|o| o.scene.nodes.as_slice()).unwrap_or(&[])
    }

    pub fn press(&mut self, x: f32, y: f32) {
        self.press_with(x, y, Buttons::PRIMARY);
    }

    pub fn press_with(&mut self, x: f32, y: f32, buttons: Buttons) {
        self.router
            .queue(PointerEvent::press(Vec2::new(x, y), buttons, self.now));
    }

    pub fn drag(&mut self, x: f32, y: f32) {
        self.router
            .queue(PointerEvent::drag(Vec2::new(x, y), Buttons::PRIMARY, self.now));
    }

    pub fn release(&mut self, x: f32, y: f32) {
        self.release_with(x, y, Buttons::PRIMARY);
    }

    pub fn release_with(&mut self, x: f32, y: f32, buttons: Buttons) {
        self.router
            .queue(PointerEvent::release(Vec2::new(x, y), buttons, self.now));
    }

    /// Press and release at the same point.
    pub fn click(&mut self, x: f32, y: f32) {
        self.press(x, y);
        self.release(x, y);
    }

    pub fn click_with(&mut self, x: f32, y: f32, buttons: Buttons) {
        self.press_with(x, y, buttons);
        self.release_with(x, y, buttons);
    }

    pub fn moved(&mut self, x: f32, y: f32) {
        self.router
            .queue(PointerEvent::moved(Vec2::new(x, y), self.now));
    }

    pub fn scroll(&mut self, x: f32, y: f32, dy: f32) {
        self.router.queue(PointerEvent::scroll(
            Vec2::new(x, y),
            Vec2::new(0.0, dy),
            self.now,
        ));
    }

    pub fn cancel(&mut self) {
        self.router.queue(PointerEvent::cancel(self.now));
    }
}
