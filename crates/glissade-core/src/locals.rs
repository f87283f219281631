//! # Theming and density
//!
//! Glissade keeps two thread-local "composition locals" for parameters every
//! widget reads while painting:
//!
//! - `Theme`: named colors (primary, surface, outline-variant, scrim, ...).
//! - `Density`: dp→px scale factor.
//!
//! Override them for a subtree with `with_theme` / `with_density`:
//!
//! ```rust
//! use glissade_core::*;
//!
//! let light = Theme {
//!     surface: Color::from_hex("#F5F5F5"),
//!     on_surface: Color::from_hex("#222222"),
//!     primary: Color::from_hex("#0061A4"),
//!     ..Theme::default()
//! };
//!
//! with_theme(light, || {
//!     assert_eq!(theme().primary, Color::from_hex("#0061A4"));
//! });
//! ```
//!
//! Widgets read from `theme()` and never hard-code colors.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

use crate::Color;

thread_local! {
    static LOCALS_STACK: RefCell<Vec<HashMap<TypeId, Box<dyn Any>>>> = RefCell::new(Vec::new());
}

/// density‑independent pixels (dp)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dp(pub f32);

impl Dp {
    /// Converts this dp value into physical pixels using the current Density.
    pub fn to_px(self) -> f32 {
        self.0 * density().scale
    }
}

/// Convenience: convert a raw dp scalar into px using current Density.
pub fn dp_to_px(dp: f32) -> f32 {
    Dp(dp).to_px()
}

fn with_locals_frame<R>(f: impl FnOnce() -> R) -> R {
    // pops on unwind too
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            LOCALS_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    LOCALS_STACK.with(|st| st.borrow_mut().push(HashMap::new()));
    let _guard = Guard;
    f()
}

fn set_local_boxed(t: TypeId, v: Box<dyn Any>) {
    LOCALS_STACK.with(|st| {
        if let Some(top) = st.borrow_mut().last_mut() {
            top.insert(t, v);
        }
    });
}

fn get_local<T: Any + Copy + Default>() -> T {
    LOCALS_STACK.with(|st| {
        for frame in st.borrow().iter().rev() {
            if let Some(v) = frame.get(&TypeId::of::<T>())
                && let Some(t) = v.downcast_ref::<T>()
            {
                return *t;
            }
        }
        T::default()
    })
}

/// Named colors consumed read-only by the widgets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    /// Window background / app root.
    pub background: Color,
    /// Default container surface (drawers, dialogs, menus).
    pub surface: Color,
    /// Raised container on top of `surface` (menu body).
    pub surface_container: Color,
    /// Primary foreground color on top of `surface`/`background`.
    pub on_surface: Color,

    /// Accent for slider fill and thumbs, hovered menu items, active scrollbars.
    pub primary: Color,
    /// Foreground color used on top of `primary`.
    pub on_primary: Color,

    /// Low‑emphasis outline/border color.
    pub outline: Color,
    /// Even lower emphasis: inactive slider track, dividers.
    pub outline_variant: Color,
    /// Color for focus rings and accessibility highlights.
    pub focus: Color,

    /// Full-surface dimming layer behind overlays, at full opacity.
    pub scrim: Color,

    /// Scrollbar track background (low emphasis).
    pub scrollbar_track: Color,
    /// Scrollbar thumb (higher emphasis).
    pub scrollbar_thumb: Color,
    /// Scrollbar thumb while hovered or dragged.
    pub scrollbar_thumb_active: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::from_hex("#121212"),
            surface: Color::from_hex("#1E1E1E"),
            surface_container: Color::from_hex("#2A2A2A"),
            on_surface: Color::from_hex("#DDDDDD"),
            primary: Color::from_hex("#34AF82"),
            on_primary: Color::WHITE,
            outline: Color::from_hex("#555555"),
            outline_variant: Color::from_hex("#333333"),
            focus: Color::from_hex("#88CCFF"),
            scrim: Color(0, 0, 0, 0x88),
            scrollbar_track: Color(0xDD, 0xDD, 0xDD, 32),
            scrollbar_thumb: Color(0xDD, 0xDD, 0xDD, 140),
            scrollbar_thumb_active: Color(0xDD, 0xDD, 0xDD, 210),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Density {
    pub scale: f32, // dp→px multiplier
}
impl Default for Density {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

pub fn with_theme<R>(theme: Theme, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<Theme>(), Box::new(theme));
        f()
    })
}

pub fn with_density<R>(density: Density, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<Density>(), Box::new(density));
        f()
    })
}

// Getters with defaults if not set

pub fn theme() -> Theme {
    get_local::<Theme>()
}

pub fn density() -> Density {
    get_local::<Density>()
}
