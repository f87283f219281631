use glissade_core::*;
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use web_time::{Duration, Instant};

use super::{Blocker, Phase, Visibility};
use crate::gestures::{Gesture, GestureEvent};

new_key_type! {
    pub struct MenuItemKey;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MenuEvent {
    /// A secondary press outside the menu opened it at this point.
    Opened(Vec2),
    Closed,
    Selected(MenuItemKey),
}

pub type MenuEvents = SmallVec<[MenuEvent; 2]>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MenuConfig {
    /// dp
    pub width: f32,
    /// dp
    pub item_height: f32,
    /// Vertical padding above the first and below the last item, dp.
    pub padding: f32,
    /// dp
    pub corner_radius: f32,
    /// dp
    pub font_size: f32,
    /// Fade length of the menu and of each item.
    pub duration: Duration,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            width: 200.0,
            item_height: 40.0,
            padding: 8.0,
            corner_radius: 8.0,
            font_size: 14.0,
            duration: Duration::from_millis(150),
        }
    }
}

impl MenuConfig {
    pub fn with_width(mut self, dp: f32) -> Self {
        self.width = dp;
        self
    }

    pub fn with_item_height(mut self, dp: f32) -> Self {
        self.item_height = dp;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

struct MenuItem {
    label: String,
    visibility: Visibility,
    gesture: Gesture,
    /// Fading out; evicted once hidden.
    removed: bool,
}

/// Context menu for the whole surface.
///
/// Laid out after everything else. While closed it listens for secondary
/// presses without blocking anything; while open it catches every click
/// outside itself and closes.
pub struct GlobalMenu {
    config: MenuConfig,
    items: SlotMap<MenuItemKey, MenuItem>,
    order: Vec<MenuItemKey>,
    visibility: Visibility,
    anchor: Vec2,
    rect: Rect,
    backdrop: Gesture,
    body: Blocker,
    tag: Tag,
}

impl Default for GlobalMenu {
    fn default() -> Self {
        Self::new(MenuConfig::default())
    }
}

impl GlobalMenu {
    pub fn new(config: MenuConfig) -> Self {
        Self {
            visibility: Visibility::new(config.duration, Easing::EaseOut),
            config,
            items: SlotMap::with_key(),
            order: Vec::new(),
            anchor: Vec2::ZERO,
            rect: Rect::default(),
            backdrop: Gesture::new(),
            body: Blocker::default(),
            tag: Tag::new(),
        }
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// Appends an item. It fades in on its own when the menu is up, and is
    /// simply there otherwise.
    pub fn add_item(&mut self, label: impl Into<String>, now: Instant) -> MenuItemKey {
        let mut visibility = Visibility::new(self.config.duration, Easing::EaseOut);
        if self.visibility.is_visible() {
            visibility.show(now);
        } else {
            visibility.snap(Direction::Forward);
        }
        let key = self.items.insert(MenuItem {
            label: label.into(),
            visibility,
            gesture: Gesture::new(),
            removed: false,
        });
        self.order.push(key);
        key
    }

    /// Removes an item, fading it out first when the menu is up.
    pub fn remove_item(&mut self, key: MenuItemKey, now: Instant) -> bool {
        let menu_visible = self.visibility.is_visible();
        let Some(item) = self.items.get_mut(key) else {
            return false;
        };
        if item.removed {
            return false;
        }
        if menu_visible && item.visibility.is_visible() {
            item.removed = true;
            item.visibility.hide(now);
        } else {
            self.items.remove(key);
            self.order.retain(|k| *k != key);
        }
        true
    }

    pub fn label(&self, key: MenuItemKey) -> Option<&str> {
        self.items.get(key).map(|i| i.label.as_str())
    }

    pub fn item_phase(&self, key: MenuItemKey) -> Option<Phase> {
        self.items.get(key).map(|i| i.visibility.phase())
    }

    /// Items still in the menu, fading ones included.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Opens the menu at `anchor`. An open menu is faded in again from
    /// there.
    pub fn open_at(&mut self, anchor: Vec2, now: Instant) {
        self.anchor = anchor;
        if self.visibility.is_shown() {
            self.visibility.snap(Direction::Reverse);
        }
        if self.visibility.show(now) {
            log::debug!("menu: open at ({:.1}, {:.1})", anchor.x, anchor.y);
        }
    }

    pub fn close(&mut self, now: Instant) {
        if self.visibility.hide(now) {
            log::debug!("menu: close");
        }
    }

    pub fn phase(&self) -> Phase {
        self.visibility.phase()
    }

    /// Open or opening.
    pub fn is_open(&self) -> bool {
        self.visibility.is_shown()
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    /// Menu rect as of the last layout.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Places a menu of `size` at `anchor`, growing towards the centre of
    /// `bounds`, then clamps it inside.
    pub fn place(anchor: Vec2, size: Size, bounds: Rect) -> Rect {
        let c = bounds.center();
        let x = if anchor.x > c.x {
            anchor.x - size.width
        } else {
            anchor.x
        };
        let y = if anchor.y > c.y {
            anchor.y - size.height
        } else {
            anchor.y
        };
        let x = x.min(bounds.right() - size.width).max(bounds.x);
        let y = y.min(bounds.bottom() - size.height).max(bounds.y);
        Rect::new(x, y, size.width, size.height)
    }

    fn evict_items(&mut self) {
        let menu_hidden = self.visibility.phase() == Phase::Hidden;
        let gone: SmallVec<[MenuItemKey; 4]> = self
            .order
            .iter()
            .copied()
            .filter(|k| {
                self.items.get(*k).is_some_and(|i| {
                    i.removed && (menu_hidden || i.visibility.phase() == Phase::Hidden)
                })
            })
            .collect();
        for key in gone {
            self.items.remove(key);
            self.order.retain(|k| *k != key);
        }
    }

    fn item_rect(&self, index: usize) -> Rect {
        let pad = dp_to_px(self.config.padding);
        let h = dp_to_px(self.config.item_height);
        Rect::new(self.rect.x, self.rect.y + pad + h * index as f32, self.rect.w, h)
    }

    pub fn layout(&mut self, frame: &mut Frame) -> MenuEvents {
        let now = frame.now();
        let mut out = MenuEvents::new();

        self.visibility.advance(frame);
        for key in &self.order {
            if let Some(item) = self.items.get_mut(*key) {
                item.visibility.advance(frame);
            }
        }
        self.evict_items();

        let bounds = frame.bounds();
        if bounds.size().is_empty() {
            log::warn!("menu: laid out on an empty surface");
            return out;
        }

        for ev in self.backdrop.update(frame) {
            match ev {
                GestureEvent::Press { position, buttons } if buttons.contains(Buttons::SECONDARY) => {
                    self.open_at(position, now);
                    out.push(MenuEvent::Opened(position));
                }
                GestureEvent::Click { position, buttons }
                    if buttons.contains(Buttons::PRIMARY)
                        && self.visibility.is_shown()
                        && !self.rect.contains(position) =>
                {
                    self.close(now);
                    out.push(MenuEvent::Closed);
                }
                _ => {}
            }
        }

        let mut selected = None;
        for key in &self.order {
            let Some(item) = self.items.get_mut(*key) else {
                continue;
            };
            for ev in item.gesture.update(frame) {
                if let GestureEvent::Click { buttons, .. } = ev
                    && buttons.contains(Buttons::PRIMARY)
                    && !item.removed
                {
                    selected = Some(*key);
                }
            }
        }
        if let Some(key) = selected
            && self.visibility.is_shown()
        {
            log::debug!("menu: selected {key:?}");
            out.push(MenuEvent::Selected(key));
            self.close(now);
            out.push(MenuEvent::Closed);
        }

        let shown = self.visibility.is_shown();
        let flags = if shown {
            HitFlags::empty()
        } else {
            HitFlags::PASS_THROUGH
        };
        self.backdrop.add(frame, bounds, flags);

        if !self.visibility.is_visible() {
            for item in self.items.values_mut() {
                item.gesture.reset();
            }
            return out;
        }

        let pad = dp_to_px(self.config.padding);
        let size = Size::new(
            dp_to_px(self.config.width),
            pad * 2.0 + dp_to_px(self.config.item_height) * self.order.len() as f32,
        );
        self.rect = Self::place(self.anchor, size, bounds);
        self.paint(frame, shown);
        out
    }

    fn paint(&mut self, frame: &mut Frame, interactive: bool) {
        let th = theme();
        let font = dp_to_px(self.config.font_size);
        let pad = dp_to_px(self.config.padding);

        if interactive {
            self.body.add(frame, self.rect);
        }
        frame.push(SceneNode::PushAlpha {
            alpha: self.visibility.value(),
        });
        frame.push(SceneNode::Rect {
            rect: self.rect,
            color: th.surface_container,
            radius: dp_to_px(self.config.corner_radius),
        });
        frame.semantics(SemNode::new(self.tag, Role::Menu, self.rect));

        for (i, key) in self.order.iter().enumerate() {
            let rect = self.item_rect(i);
            let Some(item) = self.items.get_mut(*key) else {
                continue;
            };
            frame.push(SceneNode::PushAlpha {
                alpha: item.visibility.value(),
            });
            if interactive && item.gesture.hovered() && !item.removed {
                frame.push(SceneNode::Rect {
                    rect,
                    color: th.primary.mul_alpha(0.16),
                    radius: 0.0,
                });
            }
            frame.push(SceneNode::Text {
                rect: Rect::new(rect.x + pad * 2.0, rect.y, (rect.w - pad * 4.0).max(0.0), rect.h),
                text: item.label.clone(),
                color: th.on_surface,
                size: font,
            });
            frame.push(SceneNode::PopAlpha);

            if interactive && !item.removed {
                item.gesture.add(frame, rect, HitFlags::empty());
            }
            let mut sem = SemNode::new(item.gesture.tag(), Role::MenuItem, rect).label(item.label.clone());
            sem.enabled = !item.removed;
            frame.semantics(sem);
        }
        frame.push(SceneNode::PopAlpha);
    }
}
