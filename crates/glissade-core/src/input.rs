use bitflags::bitflags;
use web_time::Instant;

use crate::Vec2;

bitflags! {
    /// Set of pointer buttons.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Buttons: u8 {
        const PRIMARY = 1 << 0;   // Left mouse, touch
        const SECONDARY = 1 << 1; // Right mouse
        const TERTIARY = 1 << 2;  // Middle mouse
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
    Pen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Press,
    Release,
    /// Movement while at least one button is held.
    Drag,
    /// Movement with no button held.
    Move,
    Enter,
    Leave,
    Scroll,
    /// The platform took the pointer away (focus loss, touch cancel).
    Cancel,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool, // Cmd on Mac, Win key on Windows
}

/// A raw pointer event as delivered by the platform.
///
/// For `Press` and `Release`, `buttons` holds the buttons that changed state.
/// For `Drag` and `Move` it holds the buttons currently down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub pointer: PointerKind,
    pub position: Vec2,
    pub buttons: Buttons,
    pub scroll: Vec2,
    pub time: Instant,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, position: Vec2, time: Instant) -> Self {
        Self {
            kind,
            pointer: PointerKind::Mouse,
            position,
            buttons: Buttons::empty(),
            scroll: Vec2::ZERO,
            time,
            modifiers: Modifiers::default(),
        }
    }

    pub fn press(position: Vec2, buttons: Buttons, time: Instant) -> Self {
        Self {
            buttons,
            ..Self::new(PointerEventKind::Press, position, time)
        }
    }

    pub fn release(position: Vec2, buttons: Buttons, time: Instant) -> Self {
        Self {
            buttons,
            ..Self::new(PointerEventKind::Release, position, time)
        }
    }

    pub fn drag(position: Vec2, buttons: Buttons, time: Instant) -> Self {
        Self {
            buttons,
            ..Self::new(PointerEventKind::Drag, position, time)
        }
    }

    pub fn moved(position: Vec2, time: Instant) -> Self {
        Self::new(PointerEventKind::Move, position, time)
    }

    pub fn scroll(position: Vec2, delta: Vec2, time: Instant) -> Self {
        Self {
            scroll: delta,
            ..Self::new(PointerEventKind::Scroll, position, time)
        }
    }

    pub fn cancel(time: Instant) -> Self {
        Self::new(PointerEventKind::Cancel, Vec2::ZERO, time)
    }

    pub fn leave(time: Instant) -> Self {
        Self::new(PointerEventKind::Leave, Vec2::ZERO, time)
    }

    pub fn with_pointer(mut self, pointer: PointerKind) -> Self {
        self.pointer = pointer;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Same event re-addressed with a different kind (router-synthesized Enter/Leave).
    pub(crate) fn retarget(mut self, kind: PointerEventKind) -> Self {
        self.kind = kind;
        self
    }
}
