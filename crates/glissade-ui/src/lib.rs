//! # Glissade widgets
//!
//! Stateful widgets laid out once per frame:
//!
//! - [`gestures`]: press/drag/release/click resolution every widget builds on.
//! - [`slider`]: float and integer value sliders.
//! - [`scrollbar`]: draggable thumb, paging track presses, wheel nudges.
//! - [`overlay`]: drawer, modal stack and global context menu, each with a
//!   scrim and an open/close animation.
//!
//! A widget is a plain struct owned by the application. Each frame the
//! application calls its `layout` with the current [`Frame`](glissade_core::Frame):
//! the widget drains its events, updates its state, registers hit regions for
//! the next frame and pushes draw commands.

pub mod gestures;
pub mod overlay;
pub mod scrollbar;
pub mod slider;

#[cfg(test)]
mod test_support;

pub use gestures::{Gesture, GestureEvent, GestureEvents, GestureState};
pub use overlay::{
    Drawer, DrawerConfig, Edge, GlobalMenu, MenuConfig, MenuEvent, MenuEvents, MenuItemKey,
    ModalConfig, ModalKey, ModalStack, Phase, Scrim, Visibility,
};
pub use scrollbar::{Scrollbar, ScrollbarState, ScrollbarStyle, Side};
pub use slider::{FloatSlider, IntSlider, Slider, SliderStyle, SliderValue};
