//! Press / drag / release / scroll resolution over a widget's hit region.
//!
//! A [`Gesture`] owns the [`Tag`] its widget registers with. Each frame the
//! widget calls [`Gesture::update`] first (draining what the router delivered
//! to the region registered last frame) and [`Gesture::add`] afterwards to
//! register the region for the next frame.

use glissade_core::*;
use smallvec::SmallVec;

/// High-level event resolved from raw pointer events.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    Press { position: Vec2, buttons: Buttons },
    Drag { position: Vec2 },
    /// `buttons` is the set that went up.
    Release { position: Vec2, buttons: Buttons },
    /// A release of a pressed button inside the region that was pressed.
    Click { position: Vec2, buttons: Buttons },
    Scroll { delta: Vec2 },
    Enter,
    Leave,
    /// The press was taken away; no release and no click will follow.
    Cancel,
}

pub type GestureEvents = SmallVec<[GestureEvent; 4]>;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureState {
    pub pressed: bool,
    /// Only ever true while `pressed` is.
    pub dragging: bool,
    pub pressed_buttons: Buttons,
    pub last_position: Vec2,
    pub hovered: bool,
}

#[derive(Debug)]
pub struct Gesture {
    tag: Tag,
    state: GestureState,
    region: Rect,
    press_region: Option<Rect>,
}

impl Default for Gesture {
    fn default() -> Self {
        Self::new()
    }
}

impl Gesture {
    pub fn new() -> Self {
        Self {
            tag: Tag::new(),
            state: GestureState::default(),
            region: Rect::default(),
            press_region: None,
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn hovered(&self) -> bool {
        self.state.hovered
    }

    pub fn pressed(&self) -> bool {
        self.state.pressed
    }

    pub fn dragging(&self) -> bool {
        self.state.dragging
    }

    /// Region registered by the last [`Gesture::add`].
    pub fn region(&self) -> Rect {
        self.region
    }

    /// Registers `rect` as this gesture's hit region for the next frame.
    pub fn add(&mut self, frame: &mut Frame, rect: Rect, flags: HitFlags) {
        self.region = rect;
        frame.register(self.tag, rect, flags);
    }

    /// Drops a latched press (and hover). Widgets call this when they stop
    /// being laid out, so a press whose release never arrives does not stay
    /// latched forever.
    pub fn reset(&mut self) {
        if self.state.pressed {
            log::debug!("gesture {:?}: dropping abandoned press", self.tag);
        }
        self.state = GestureState {
            last_position: self.state.last_position,
            ..GestureState::default()
        };
        self.press_region = None;
    }

    /// Drains this frame's events and resolves them. Scroll events come
    /// first, then the pointer events in arrival order. No-op when nothing
    /// is pending.
    pub fn update(&mut self, frame: &mut Frame) -> GestureEvents {
        let batch = frame.events(self.tag);
        let mut out = GestureEvents::new();
        if batch.is_empty() {
            return out;
        }

        for ev in batch.iter().filter(|e| e.kind == PointerEventKind::Scroll) {
            out.push(GestureEvent::Scroll { delta: ev.scroll });
        }
        for ev in batch.iter().filter(|e| e.kind != PointerEventKind::Scroll) {
            self.resolve(ev, &mut out);
        }
        out
    }

    fn resolve(&mut self, ev: &PointerEvent, out: &mut GestureEvents) {
        let st = &mut self.state;
        match ev.kind {
            PointerEventKind::Press => {
                if !st.pressed {
                    self.press_region = Some(self.region);
                }
                st.pressed_buttons |= ev.buttons;
                st.pressed = true;
                st.last_position = ev.position;
                out.push(GestureEvent::Press {
                    position: ev.position,
                    buttons: ev.buttons,
                });
            }
            PointerEventKind::Drag => {
                if !st.pressed {
                    log::trace!("gesture {:?}: drag without press dropped", self.tag);
                    return;
                }
                st.dragging = true;
                st.last_position = ev.position;
                out.push(GestureEvent::Drag {
                    position: ev.position,
                });
            }
            PointerEventKind::Release => {
                // an empty set from the platform means "whatever was down"
                let released = if ev.buttons.is_empty() {
                    st.pressed_buttons
                } else {
                    st.pressed_buttons & ev.buttons
                };
                if released.is_empty() {
                    return;
                }
                st.pressed_buttons.remove(released);
                st.last_position = ev.position;
                out.push(GestureEvent::Release {
                    position: ev.position,
                    buttons: released,
                });
                if self
                    .press_region
                    .is_some_and(|r| r.contains(ev.position))
                {
                    out.push(GestureEvent::Click {
                        position: ev.position,
                        buttons: released,
                    });
                }
                if st.pressed_buttons.is_empty() {
                    st.pressed = false;
                    st.dragging = false;
                    self.press_region = None;
                }
            }
            PointerEventKind::Move => {
                st.last_position = ev.position;
            }
            PointerEventKind::Enter => {
                st.hovered = true;
                out.push(GestureEvent::Enter);
            }
            PointerEventKind::Leave => {
                st.hovered = false;
                out.push(GestureEvent::Leave);
            }
            PointerEventKind::Cancel => {
                let was_pressed = st.pressed;
                st.pressed = false;
                st.dragging = false;
                st.pressed_buttons = Buttons::empty();
                self.press_region = None;
                if was_pressed {
                    out.push(GestureEvent::Cancel);
                }
            }
            PointerEventKind::Scroll => {}
        }
    }
}
