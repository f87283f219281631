use glissade_core::*;
use web_time::{Duration, Instant};

use super::{Blocker, Phase, Scrim, Visibility};

/// Surface edge a [`Drawer`] slides in from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Edge {
    #[default]
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawerConfig {
    pub edge: Edge,
    /// Panel size across its edge, dp. Capped at the surface.
    pub extent: f32,
    pub duration: Duration,
    pub label: Option<String>,
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            edge: Edge::Left,
            extent: 280.0,
            duration: Duration::from_millis(250),
            label: None,
        }
    }
}

impl DrawerConfig {
    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edge = edge;
        self
    }

    pub fn with_extent(mut self, dp: f32) -> Self {
        self.extent = dp;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Checks the extent and builds the drawer.
    pub fn build(self) -> Result<Drawer> {
        if !self.extent.is_finite() || self.extent <= 0.0 {
            return Err(Error::InvalidExtent {
                what: "drawer extent",
                value: self.extent,
            });
        }
        Ok(Drawer::new(self))
    }
}

/// Panel sliding in from one edge over a scrim.
pub struct Drawer {
    config: DrawerConfig,
    visibility: Visibility,
    scrim: Scrim,
    blocker: Blocker,
    tag: Tag,
    on_dismiss: Option<Box<dyn FnMut()>>,
}

impl Default for Drawer {
    fn default() -> Self {
        Self::new(DrawerConfig::default())
    }
}

impl Drawer {
    pub fn new(config: DrawerConfig) -> Self {
        Self {
            visibility: Visibility::new(config.duration, Easing::EaseOutCubic),
            config,
            scrim: Scrim::new(),
            blocker: Blocker::default(),
            tag: Tag::new(),
            on_dismiss: None,
        }
    }

    pub fn config(&self) -> &DrawerConfig {
        &self.config
    }

    pub fn show(&mut self, now: Instant) -> bool {
        self.visibility.show(now)
    }

    pub fn hide(&mut self, now: Instant) -> bool {
        self.visibility.hide(now)
    }

    pub fn toggle(&mut self, now: Instant) {
        self.visibility.toggle(now);
    }

    pub fn phase(&self) -> Phase {
        self.visibility.phase()
    }

    pub fn progress(&self) -> f32 {
        self.visibility.value()
    }

    pub fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    /// Replaces the default "scrim click hides the drawer" behavior.
    pub fn set_dismiss_hook(&mut self, hook: impl FnMut() + 'static) {
        self.on_dismiss = Some(Box::new(hook));
    }

    fn dismiss(&mut self, frame: &mut Frame) {
        log::debug!("drawer: dismissed from scrim");
        match self.on_dismiss.as_mut() {
            Some(hook) => hook(),
            None => {
                self.visibility.hide(frame.now());
            }
        }
        frame.invalidate();
    }

    /// Panel rect at progress `p`: off-screen at 0, flush with its edge at 1.
    fn panel_rect(&self, bounds: Rect, p: f32) -> Rect {
        let extent = dp_to_px(self.config.extent);
        match self.config.edge {
            Edge::Left => {
                let w = extent.min(bounds.w);
                Rect::new(bounds.x - w + w * p, bounds.y, w, bounds.h)
            }
            Edge::Right => {
                let w = extent.min(bounds.w);
                Rect::new(bounds.right() - w * p, bounds.y, w, bounds.h)
            }
            Edge::Top => {
                let h = extent.min(bounds.h);
                Rect::new(bounds.x, bounds.y - h + h * p, bounds.w, h)
            }
            Edge::Bottom => {
                let h = extent.min(bounds.h);
                Rect::new(bounds.x, bounds.bottom() - h * p, bounds.w, h)
            }
        }
    }

    /// Lays the drawer out over the whole surface. `content` fills the panel.
    /// Returns the panel size, or zero while hidden.
    pub fn layout(&mut self, frame: &mut Frame, content: impl FnOnce(&mut Frame, Rect)) -> Size {
        let p = self.visibility.advance(frame);
        if self.visibility.phase() == Phase::Hidden {
            self.scrim.reset();
            return Size::ZERO;
        }
        let bounds = frame.bounds();
        if bounds.size().is_empty() {
            log::warn!("drawer: laid out on an empty surface");
            return Size::ZERO;
        }

        let rect = self.panel_rect(bounds, p);
        if self.scrim.layout(frame, p, &[rect]) {
            self.dismiss(frame);
        }

        self.blocker.add(frame, rect);
        let th = theme();
        frame.push(SceneNode::PushClip {
            rect: bounds,
            radius: 0.0,
        });
        frame.push(SceneNode::Rect {
            rect,
            color: th.surface,
            radius: 0.0,
        });
        content(frame, rect);
        frame.push(SceneNode::PopClip);

        let mut sem = SemNode::new(self.tag, Role::Drawer, rect);
        if let Some(label) = &self.config.label {
            sem = sem.label(label.clone());
        }
        frame.semantics(sem);
        rect.size()
    }
}
