use serde::{Deserialize, Serialize};

/// Every tool the session can have selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolKind {
    #[default]
    Brush,
    Eraser,
    Line,
    Circle,
    Rectangle,
    Triangle,
    Text,
}

impl ToolKind {
    pub const ALL: [ToolKind; 7] = [
        ToolKind::Brush,
        ToolKind::Eraser,
        ToolKind::Line,
        ToolKind::Circle,
        ToolKind::Rectangle,
        ToolKind::Triangle,
        ToolKind::Text,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Brush => "Brush",
            Self::Eraser => "Eraser",
            Self::Line => "Line",
            Self::Circle => "Circle",
            Self::Rectangle => "Rectangle",
            Self::Triangle => "Triangle",
            Self::Text => "Text",
        }
    }

    /// Icon shown on the tool button
    pub fn icon(self) -> &'static str {
        match self {
            Self::Brush => "🖌",
            Self::Eraser => "⌫",
            Self::Line => "╱",
            Self::Circle => "○",
            Self::Rectangle => "▭",
            Self::Triangle => "△",
            Self::Text => "T",
        }
    }

    /// Freehand tools commit pixels on every move instead of previewing
    pub fn is_freehand(self) -> bool {
        matches!(self, Self::Brush | Self::Eraser)
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
