use egui::{Pos2, Vec2};

use super::ToolKind;
use crate::surface::{Paint, Surface};

/// A shape spanned by a drag from `origin` to the current pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Line { from: Pos2, to: Pos2 },
    Circle { center: Pos2, radius: f32 },
    /// `size` keeps its sign: a drag up/left gives negative components
    Rectangle { origin: Pos2, size: Vec2 },
    Triangle { vertices: [Pos2; 3] },
}

impl Shape {
    /// The shape `tool` draws for a drag from `origin` to `pointer`, if it is a shape tool
    pub fn from_drag(tool: ToolKind, origin: Pos2, pointer: Pos2) -> Option<Self> {
        let shape = match tool {
            ToolKind::Line => Self::Line {
                from: origin,
                to: pointer,
            },
            ToolKind::Circle => Self::Circle {
                center: origin,
                radius: origin.distance(pointer),
            },
            ToolKind::Rectangle => Self::Rectangle {
                origin,
                size: pointer - origin,
            },
            ToolKind::Triangle => Self::Triangle {
                vertices: isosceles_vertices(origin, pointer),
            },
            _ => return None,
        };
        Some(shape)
    }

    /// Lines are always stroked; closed shapes fill when `filled`
    pub fn draw(&self, surface: &mut impl Surface, stroke: egui::Stroke, filled: bool) {
        match *self {
            Self::Line { from, to } => surface.stroke_polyline(&[from, to], stroke),
            Self::Circle { center, radius } => {
                surface.draw_circle(center, radius, Paint::for_shape(filled, stroke));
            }
            Self::Rectangle { origin, size } => {
                surface.draw_rect(origin, size, Paint::for_shape(filled, stroke));
            }
            Self::Triangle { vertices } => {
                surface.draw_polygon(&vertices, Paint::for_shape(filled, stroke));
            }
        }
    }
}

/// Apex at `origin`, horizontal base at `pointer.y`, mirrored about `origin.x`
fn isosceles_vertices(origin: Pos2, pointer: Pos2) -> [Pos2; 3] {
    let dx = pointer.x - origin.x;
    [
        origin,
        Pos2::new(origin.x + dx, pointer.y),
        Pos2::new(origin.x - dx, pointer.y),
    ]
}

/// A freehand path that is stroked a piece at a time
#[derive(Debug, Clone, PartialEq)]
pub struct OpenPath {
    points: Vec<Pos2>,
    /// Index of the last point already stroked
    stroked: usize,
}

impl OpenPath {
    pub fn begin(start: Pos2) -> Self {
        Self {
            points: vec![start],
            stroked: 0,
        }
    }

    pub fn line_to(&mut self, point: Pos2) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    /// Points not yet stroked, starting from the last stroked one
    pub fn pending(&self) -> &[Pos2] {
        &self.points[self.stroked..]
    }

    pub fn mark_stroked(&mut self) {
        self.stroked = self.points.len() - 1;
    }
}
