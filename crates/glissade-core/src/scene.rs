use crate::{Color, Rect};

/// Draw list produced by one frame.
///
/// Widgets only decide shapes and colors; rasterization belongs to whatever
/// backend consumes the scene.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub clear_color: Color,
    pub nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SceneNode {
    Rect {
        rect: Rect,
        color: Color,
        radius: f32,
    },
    Ellipse {
        rect: Rect,
        color: Color,
    },
    Border {
        rect: Rect,
        color: Color,
        width: f32,
        radius: f32,
    },
    Text {
        rect: Rect,
        text: String,
        color: Color,
        size: f32,
    },
    PushClip {
        rect: Rect,
        radius: f32,
    },
    PopClip,
    /// Multiplies the alpha of everything until the matching `PopAlpha`.
    PushAlpha {
        alpha: f32,
    },
    PopAlpha,
}
