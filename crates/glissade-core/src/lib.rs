//! # Glissade core
//!
//! Glissade is a small set of stateful, time-driven widgets layered on an
//! immediate-mode host. This crate holds everything the widgets need from
//! that host:
//!
//! - geometry, colors and pointer input types,
//! - the [`Router`] that turns raw pointer events into per-[`Tag`] batches,
//! - the per-frame [`Frame`] context (events, hit regions, draw list,
//!   redraw requests),
//! - the animation clock ([`Progress`], [`AnimatedValue`], [`Easing`]),
//! - theme and density locals.
//!
//! ## A frame
//!
//! ```rust
//! use glissade_core::*;
//! use web_time::Instant;
//!
//! let mut router = Router::new();
//! let tag = Tag::new();
//!
//! // frame 0: register a region so the next frame can route to it
//! let mut frame = router.begin_frame(Instant::now(), Size::new(200.0, 100.0));
//! frame.register(tag, Rect::new(0.0, 0.0, 200.0, 100.0), HitFlags::empty());
//! router.end_frame(frame);
//!
//! router.queue(PointerEvent::press(Vec2::new(10.0, 10.0), Buttons::PRIMARY, Instant::now()));
//! let mut frame = router.begin_frame(Instant::now(), Size::new(200.0, 100.0));
//! assert_eq!(frame.events(tag).len(), 2); // Enter + Press
//! assert!(frame.events(tag).is_empty()); // drained
//! ```
//!
//! Everything is single-threaded and synchronous: there are no timers, so
//! time only advances when the host renders a frame.

pub mod animation;
pub mod color;
pub mod error;
pub mod geometry;
pub mod input;
pub mod locals;
pub mod prelude;
pub mod runtime;
pub mod scene;
pub mod semantics;

pub use color::*;
pub use error::{Error, Result};
pub use geometry::*;
pub use locals::*;
pub use prelude::*;
pub use runtime::*;
pub use scene::*;
pub use semantics::*;
