use crate::state::PaintSession;
use crate::surface::Surface;
use crate::tool::{ColorChannel, ToolKind};

use super::CommandResult;

/// Actions dispatched by the configuration controls and edit buttons
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SelectTool(ToolKind),
    SetColorChannel { channel: ColorChannel, value: u8 },
    SetBrushWidth(f32),
    SetFill(bool),
    SetFontFamily(String),
    SetFontSize(f32),
    Undo,
    Redo,
    Clear,
}

impl Command {
    /// Whether this command edits pixels or history rather than tool configuration
    pub fn edits_canvas(&self) -> bool {
        matches!(self, Command::Undo | Command::Redo | Command::Clear)
    }

    pub fn execute<S: Surface>(self, session: &mut PaintSession<S>) -> CommandResult {
        match self {
            Command::SelectTool(tool) => session.tools_mut().set_tool(tool),
            Command::SetColorChannel { channel, value } => {
                session.tools_mut().set_color_channel(channel, value);
            }
            Command::SetBrushWidth(width) => session.tools_mut().set_brush_width(width),
            Command::SetFill(fill) => session.tools_mut().set_fill(fill),
            Command::SetFontFamily(family) => session.tools_mut().set_font_family(family),
            Command::SetFontSize(size) => session.tools_mut().set_font_size(size),
            Command::Undo => session.undo()?,
            Command::Redo => session.redo()?,
            Command::Clear => session.clear(),
        }
        Ok(())
    }
}
