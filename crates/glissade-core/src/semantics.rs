use crate::{Rect, Tag};

/// High‑level semantic role of an interactive region, similar to ARIA roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Slider,
    Scrollbar,
    Drawer,
    Dialog,
    Menu,
    MenuItem,
    Scrim,
}

/// Flattened semantics node collected during layout.
///
/// This is the only accessibility surface: role, label, resolved rect and
/// enabled state. Platform runners convert it to whatever their OS expects.
#[derive(Clone, Debug, PartialEq)]
pub struct SemNode {
    /// Same tag as the hit region the widget registered.
    pub tag: Tag,
    pub role: Role,
    pub label: Option<String>,
    pub rect: Rect,
    pub enabled: bool,
}

impl SemNode {
    pub fn new(tag: Tag, role: Role, rect: Rect) -> Self {
        Self {
            tag,
            role,
            label: None,
            rect,
            enabled: true,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
