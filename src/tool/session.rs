//! Turns pointer gestures into pixels.
//!
//! ```text
//!            pointer down (tool != Text)
//!   ┌──────┐ ─────────────────────────► ┌───────────────┐
//!   │ Idle │                            │ GestureActive │ ◄─┐ pointer move
//!   └──────┘ ◄───────────────────────── └───────────────┘ ──┘
//!            pointer up / pointer leave
//! ```
//!
//! Brush and Eraser stroke straight onto the surface as the pointer moves.
//! Shape tools restore the snapshot at the history cursor before every
//! redraw, so a preview frame never survives into the next one. Text never
//! enters `GestureActive`: pointer down only anchors a prompt.

use egui::{Color32, Pos2};

use super::shapes::{OpenPath, Shape};
use super::{ColorChannel, Style, ToolKind};
use crate::command::HistoryStore;
use crate::error::GestureError;
use crate::surface::{CompositeMode, Surface};

/// What a pointer press started
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerDown {
    GestureStarted { origin: Pos2 },
    /// The Text tool wants a string to place at `anchor`
    TextPrompt { anchor: Pos2 },
}

#[derive(Debug, Clone, PartialEq)]
struct Gesture {
    origin: Pos2,
    path: OpenPath,
    /// Brush width when the drag began
    line_width: f32,
}

/// Active tool, drawing style and the in-flight gesture
#[derive(Debug, Clone, Default)]
pub struct ToolSession {
    active_tool: ToolKind,
    style: Style,
    gesture: Option<Gesture>,
    text_anchor: Option<Pos2>,
}

impl ToolSession {
    pub fn new(style: Style) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    pub fn active_tool(&self) -> ToolKind {
        self.active_tool
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn color(&self) -> Color32 {
        self.style.color()
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        if tool != self.active_tool {
            log::info!("Tool selected: {tool}");
        }
        self.active_tool = tool;
    }

    pub fn set_color_channel(&mut self, channel: ColorChannel, value: u8) {
        self.style.set_channel(channel, value);
    }

    pub fn set_brush_width(&mut self, width: f32) {
        self.style.set_brush_width(width);
    }

    pub fn set_fill(&mut self, fill: bool) {
        self.style.fill = fill;
    }

    pub fn set_font_family(&mut self, family: impl Into<String>) {
        self.style.font_family = family.into();
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.style.set_font_size(size);
    }

    /// Replace the whole style at once, e.g. when restoring saved settings
    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn gesture_origin(&self) -> Option<Pos2> {
        self.gesture.as_ref().map(|gesture| gesture.origin)
    }

    /// Where the open text prompt is anchored, if one is open
    pub fn text_anchor(&self) -> Option<Pos2> {
        self.text_anchor
    }

    /// Start a gesture, or anchor a text prompt when Text is active.
    ///
    /// Nothing is drawn. A gesture that is still active is replaced, so the
    /// caller finishes it first.
    pub fn pointer_down(&mut self, pos: Pos2) -> PointerDown {
        if self.active_tool == ToolKind::Text {
            self.text_anchor = Some(pos);
            return PointerDown::TextPrompt { anchor: pos };
        }

        log::debug!("{} gesture started at {pos:?}", self.active_tool);
        self.gesture = Some(Gesture {
            origin: pos,
            path: OpenPath::begin(pos),
            line_width: self.style.brush_width,
        });
        PointerDown::GestureStarted { origin: pos }
    }

    /// Extend the active gesture to `pos`.
    ///
    /// Returns `Ok(false)` when no gesture is active. Tool, color and fill
    /// mode are read on every move; the line width is the one captured at
    /// pointer down.
    pub fn pointer_move<S: Surface>(
        &mut self,
        pos: Pos2,
        surface: &mut S,
        history: &HistoryStore,
    ) -> Result<bool, GestureError> {
        let Some(gesture) = self.gesture.as_mut() else {
            return Ok(false);
        };
        let tool = self.active_tool;
        let stroke = self.style.stroke(gesture.line_width);

        surface.set_composite_mode(if tool == ToolKind::Eraser {
            CompositeMode::Erase
        } else {
            CompositeMode::Normal
        });

        if tool.is_freehand() {
            gesture.path.line_to(pos);
            surface.stroke_polyline(gesture.path.pending(), stroke);
            gesture.path.mark_stroked();
            return Ok(true);
        }

        let shape = Shape::from_drag(tool, gesture.origin, pos)
            .ok_or(GestureError::UnsupportedTool(tool))?;
        surface.restore(history.peek_current()?);
        shape.draw(surface, stroke, self.style.fill);
        Ok(true)
    }

    /// Stop accepting moves. Returns whether a gesture was active, in which
    /// case the caller commits the surface.
    pub fn end_gesture(&mut self) -> bool {
        match self.gesture.take() {
            Some(gesture) => {
                log::debug!(
                    "{} gesture from {:?} ended after {} points",
                    self.active_tool,
                    gesture.origin,
                    gesture.path.points().len()
                );
                true
            }
            None => false,
        }
    }

    /// Draw `text` at the open prompt's anchor and close the prompt.
    ///
    /// Returns whether anything was drawn. Whitespace-only text, or no open
    /// prompt, draws nothing.
    pub fn submit_text<S: Surface>(&mut self, text: &str, surface: &mut S) -> bool {
        let Some(anchor) = self.text_anchor.take() else {
            log::debug!("Text submitted with no prompt open");
            return false;
        };
        if text.trim().is_empty() {
            return false;
        }

        surface.set_composite_mode(CompositeMode::Normal);
        surface.draw_text(anchor, text, &self.style.font(), self.style.color());
        true
    }

    /// Close the text prompt without drawing
    pub fn cancel_text(&mut self) -> bool {
        self.text_anchor.take().is_some()
    }
}
