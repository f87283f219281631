pub use crate::animation::*;
pub use crate::color::Color;
pub use crate::error::Error;
pub use crate::geometry::{Axis, Rect, Size, Vec2};
pub use crate::input::*;
pub use crate::locals::{
    Density, Dp, Theme, density, dp_to_px, theme, with_density, with_theme,
};
pub use crate::runtime::{EventBatch, Frame, FrameOutput, HitFlags, HitRegion, Router, Tag};
pub use crate::scene::{Scene, SceneNode};
pub use crate::semantics::{Role, SemNode};
