use egui::{Pos2, Rect, Vec2};

use crate::state::PaintSession;
use crate::surface::Surface;
use crate::tool::PointerDown;

/// Pointer events in surface pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { position: Pos2 },
    PointerMove { position: Pos2 },
    PointerUp { position: Pos2 },
    /// The pointer left the surface
    PointerLeave,
}

/// What routing an event did to the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventOutcome {
    /// Nothing happened, e.g. a move with no gesture active
    Ignored,
    /// The surface changed or a gesture started
    Drawing,
    /// A text prompt should be shown at `anchor` (surface coordinates)
    TextPrompt { anchor: Pos2 },
    /// A gesture ended and a snapshot was committed
    Committed,
}

/// Feed one event to the session
pub fn route_event<S: Surface>(event: &InputEvent, session: &mut PaintSession<S>) -> EventOutcome {
    match *event {
        InputEvent::PointerDown { position } => match session.pointer_down(position) {
            PointerDown::GestureStarted { .. } => EventOutcome::Drawing,
            PointerDown::TextPrompt { anchor } => EventOutcome::TextPrompt { anchor },
        },
        InputEvent::PointerMove { position } => match session.pointer_move(position) {
            Ok(true) => EventOutcome::Drawing,
            // Diagnostics are logged by the session.
            Ok(false) | Err(_) => EventOutcome::Ignored,
        },
        InputEvent::PointerUp { .. } => committed(session.pointer_up()),
        InputEvent::PointerLeave => committed(session.pointer_leave()),
    }
}

fn committed(did_commit: bool) -> EventOutcome {
    if did_commit {
        EventOutcome::Committed
    } else {
        EventOutcome::Ignored
    }
}

/// The primary-button pointer state for one UI frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSample {
    /// Pointer position in screen coordinates, `None` when off the window
    pub position: Option<Pos2>,
    pub pressed: bool,
    pub released: bool,
}

impl PointerSample {
    pub fn from_ctx(ctx: &egui::Context) -> Self {
        ctx.input(|i| Self {
            position: i.pointer.hover_pos(),
            pressed: i.pointer.primary_pressed(),
            released: i.pointer.primary_released(),
        })
    }
}

/// Turns per-frame pointer samples over the on-screen canvas into [`InputEvent`]s
#[derive(Debug, Clone, Default)]
pub struct InputHandler {
    last_position: Option<Pos2>,
    inside: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a screen position inside `canvas_rect` to surface pixels
    pub fn to_surface(position: Pos2, canvas_rect: Rect, surface_size: [u32; 2]) -> Pos2 {
        let scale = Vec2::new(
            surface_size[0] as f32 / canvas_rect.width().max(1.0),
            surface_size[1] as f32 / canvas_rect.height().max(1.0),
        );
        ((position - canvas_rect.min) * scale).to_pos2()
    }

    /// Map a surface position back to the screen
    pub fn to_screen(position: Pos2, canvas_rect: Rect, surface_size: [u32; 2]) -> Pos2 {
        let scale = Vec2::new(
            canvas_rect.width() / surface_size[0].max(1) as f32,
            canvas_rect.height() / surface_size[1].max(1) as f32,
        );
        canvas_rect.min + position.to_vec2() * scale
    }

    /// Events for this frame, in the order down, move, up, leave.
    ///
    /// `canvas_rect` is where the whole surface is laid out and sets the
    /// scale. `visible_rect` is the part of it actually showing; the pointer
    /// counts as on the surface only there.
    pub fn process(
        &mut self,
        sample: PointerSample,
        canvas_rect: Rect,
        visible_rect: Rect,
        surface_size: [u32; 2],
    ) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let hit_rect = canvas_rect.intersect(visible_rect);
        let inside_now = sample.position.filter(|pos| hit_rect.contains(*pos));
        let local = inside_now.map(|pos| Self::to_surface(pos, canvas_rect, surface_size));

        if let Some(position) = local {
            if sample.pressed {
                events.push(InputEvent::PointerDown { position });
            } else if sample.position != self.last_position {
                events.push(InputEvent::PointerMove { position });
            }
            if sample.released {
                events.push(InputEvent::PointerUp { position });
            }
        } else if self.inside {
            events.push(InputEvent::PointerLeave);
        }

        self.inside = local.is_some();
        self.last_position = sample.position;
        events
    }
}
