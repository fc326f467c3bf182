use egui::{Color32, Pos2, Vec2, pos2, vec2};
use image::{Rgba, RgbaImage};
use paint_canvas::surface::{CompositeMode, FontSpec, Paint};
use paint_canvas::tool::PointerDown;
use paint_canvas::{
    GestureError, PaintSession, RasterSurface, SessionConfig, Snapshot, Surface, ToolKind,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Polyline { points: Vec<Pos2>, width: f32 },
    Rect { origin: Pos2, size: Vec2, paint: Paint },
    Polygon { points: Vec<Pos2>, paint: Paint },
    Circle { center: Pos2, radius: f32, paint: Paint },
    Text { anchor: Pos2, text: String },
    Clear,
    Image,
    Restore,
}

/// Records every primitive. The snapshot is a 1x1 image holding an edit counter.
#[derive(Debug, Default)]
struct RecordingSurface {
    mode: CompositeMode,
    calls: Vec<Call>,
    edits: u8,
}

impl RecordingSurface {
    fn record(&mut self, call: Call) {
        self.calls.push(call);
        self.edits = self.edits.wrapping_add(1);
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> [u32; 2] {
        [200, 200]
    }

    fn composite_mode(&self) -> CompositeMode {
        self.mode
    }

    fn set_composite_mode(&mut self, mode: CompositeMode) {
        self.mode = mode;
    }

    fn stroke_polyline(&mut self, points: &[Pos2], stroke: egui::Stroke) {
        self.record(Call::Polyline {
            points: points.to_vec(),
            width: stroke.width,
        });
    }

    fn draw_rect(&mut self, origin: Pos2, size: Vec2, paint: Paint) {
        self.record(Call::Rect { origin, size, paint });
    }

    fn draw_polygon(&mut self, points: &[Pos2], paint: Paint) {
        self.record(Call::Polygon {
            points: points.to_vec(),
            paint,
        });
    }

    fn draw_circle(&mut self, center: Pos2, radius: f32, paint: Paint) {
        self.record(Call::Circle {
            center,
            radius,
            paint,
        });
    }

    fn draw_text(&mut self, anchor: Pos2, text: &str, _font: &FontSpec, _color: Color32) {
        self.record(Call::Text {
            anchor,
            text: text.to_owned(),
        });
    }

    fn clear(&mut self) {
        self.record(Call::Clear);
    }

    fn draw_image(&mut self, _image: &RgbaImage) {
        self.record(Call::Image);
    }

    fn capture_snapshot(&self) -> Snapshot {
        Snapshot::new(RgbaImage::from_pixel(1, 1, Rgba([self.edits, 0, 0, 255])))
    }

    fn restore(&mut self, snapshot: &Snapshot) {
        self.calls.push(Call::Restore);
        self.edits = snapshot.pixel(0, 0).map_or(0, |p| p[0]);
    }
}

fn recording_session(tool: ToolKind) -> PaintSession<RecordingSurface> {
    let mut session = PaintSession::new(RecordingSurface::default());
    session.tools_mut().set_tool(tool);
    session
}

fn raster_session(tool: ToolKind) -> PaintSession<RasterSurface> {
    let mut session = PaintSession::new(RasterSurface::new(100, 100));
    session.tools_mut().set_tool(tool);
    session
}

#[test]
fn test_shape_preview_does_not_touch_history() {
    let mut session = recording_session(ToolKind::Rectangle);

    session.pointer_down(pos2(50.0, 50.0));
    for p in [pos2(40.0, 45.0), pos2(20.0, 30.0), pos2(10.0, 10.0)] {
        assert!(session.pointer_move(p).unwrap());
        assert_eq!(session.history().len(), 1);
    }

    // Every preview starts from the committed snapshot
    let calls = &session.surface().calls;
    assert_eq!(calls.len(), 6);
    assert!(calls.chunks(2).all(|pair| pair[0] == Call::Restore));

    assert!(session.pointer_up());
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.history().cursor(), Some(1));
}

#[test]
fn test_rectangle_keeps_signed_size() {
    let mut session = recording_session(ToolKind::Rectangle);
    session.pointer_down(pos2(50.0, 50.0));
    session.pointer_move(pos2(10.0, 10.0)).unwrap();

    let last = session.surface().calls.last().cloned();
    assert_eq!(
        last,
        Some(Call::Rect {
            origin: pos2(50.0, 50.0),
            size: vec2(-40.0, -40.0),
            paint: Paint::Stroke(egui::Stroke::new(5.0, Color32::BLACK)),
        })
    );
}

#[test]
fn test_rectangle_drag_up_left_paints_its_outline() {
    let mut session = raster_session(ToolKind::Rectangle);
    session.pointer_down(pos2(50.0, 50.0));
    session.pointer_move(pos2(10.0, 10.0)).unwrap();
    session.pointer_up();

    let surface = session.surface();
    assert_eq!(surface.pixel(10, 30), Some([0, 0, 0, 255]));
    assert_eq!(surface.pixel(49, 30), Some([0, 0, 0, 255]));
    assert_eq!(surface.pixel(30, 30), Some([0, 0, 0, 0]));
    assert_eq!(surface.pixel(70, 70), Some([0, 0, 0, 0]));
}

#[test]
fn test_circle_radius_is_drag_distance() {
    let mut session = recording_session(ToolKind::Circle);
    session.tools_mut().set_fill(true);
    session.pointer_down(pos2(100.0, 100.0));
    session.pointer_move(pos2(130.0, 100.0)).unwrap();

    assert_eq!(
        session.surface().calls.last().cloned(),
        Some(Call::Circle {
            center: pos2(100.0, 100.0),
            radius: 30.0,
            paint: Paint::Fill(Color32::BLACK),
        })
    );
}

#[test]
fn test_triangle_is_isosceles_about_origin() {
    let mut session = recording_session(ToolKind::Triangle);
    session.pointer_down(pos2(100.0, 20.0));
    session.pointer_move(pos2(130.0, 80.0)).unwrap();

    let Some(Call::Polygon { points, .. }) = session.surface().calls.last().cloned() else {
        panic!("expected a polygon");
    };
    assert_eq!(points[0], pos2(100.0, 20.0));
    assert_eq!(points[1].y, 80.0);
    assert_eq!(points[2].y, 80.0);
    assert_eq!(points[1].x + points[2].x, 200.0);
}

#[test]
fn test_brush_strokes_incrementally_with_width_from_pointer_down() {
    let mut session = recording_session(ToolKind::Brush);
    session.pointer_down(pos2(0.0, 0.0));
    session.pointer_move(pos2(10.0, 0.0)).unwrap();
    session.tools_mut().set_brush_width(20.0);
    session.pointer_move(pos2(20.0, 0.0)).unwrap();

    assert_eq!(
        session.surface().calls,
        vec![
            Call::Polyline {
                points: vec![pos2(0.0, 0.0), pos2(10.0, 0.0)],
                width: 5.0,
            },
            Call::Polyline {
                points: vec![pos2(10.0, 0.0), pos2(20.0, 0.0)],
                width: 5.0,
            },
        ]
    );
    // Brush moves never restore
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_eraser_leaves_transparent_pixels() {
    let mut session = raster_session(ToolKind::Brush);
    session.pointer_down(pos2(10.0, 10.0));
    session.pointer_move(pos2(50.0, 10.0)).unwrap();
    session.pointer_up();
    assert_eq!(session.surface().pixel(30, 10), Some([0, 0, 0, 255]));

    session.tools_mut().set_tool(ToolKind::Eraser);
    session.tools_mut().set_brush_width(9.0);
    session.pointer_down(pos2(10.0, 10.0));
    session.pointer_move(pos2(50.0, 10.0)).unwrap();
    assert_eq!(session.surface().composite_mode(), CompositeMode::Erase);
    session.pointer_up();

    assert_eq!(session.surface().pixel(30, 10), Some([0, 0, 0, 0]));
    assert_eq!(session.history().len(), 3);

    // Switching back restores normal compositing on the next move
    session.tools_mut().set_tool(ToolKind::Brush);
    session.pointer_down(pos2(10.0, 40.0));
    session.pointer_move(pos2(50.0, 40.0)).unwrap();
    assert_eq!(session.surface().composite_mode(), CompositeMode::Normal);
    assert_eq!(session.surface().pixel(30, 40), Some([0, 0, 0, 255]));
}

#[test]
fn test_line_preview_leaves_no_trace_of_earlier_moves() {
    let mut session = raster_session(ToolKind::Line);
    session.pointer_down(pos2(10.0, 10.0));

    session.pointer_move(pos2(90.0, 10.0)).unwrap();
    assert_eq!(session.surface().pixel(50, 10), Some([0, 0, 0, 255]));

    session.pointer_move(pos2(10.0, 90.0)).unwrap();
    // Only the first preview touched (50, 10)
    assert_eq!(session.surface().pixel(50, 10), Some([0, 0, 0, 0]));
    assert_eq!(session.surface().pixel(10, 50), Some([0, 0, 0, 255]));
    assert_eq!(session.history().len(), 1);

    assert!(session.pointer_up());
    assert_eq!(session.surface().pixel(50, 10), Some([0, 0, 0, 0]));
    assert_eq!(session.surface().pixel(10, 50), Some([0, 0, 0, 255]));
}

#[test]
fn test_undo_restores_previous_pixels() {
    let mut session = raster_session(ToolKind::Line);
    session.pointer_down(pos2(0.0, 50.0));
    session.pointer_move(pos2(99.0, 50.0)).unwrap();
    session.pointer_up();
    assert_eq!(session.surface().pixel(50, 50), Some([0, 0, 0, 255]));

    session.undo().unwrap();
    assert_eq!(session.surface().pixel(50, 50), Some([0, 0, 0, 0]));

    session.redo().unwrap();
    assert_eq!(session.surface().pixel(50, 50), Some([0, 0, 0, 255]));
}

#[test]
fn test_pointer_leave_ends_gesture_like_pointer_up() {
    let mut session = recording_session(ToolKind::Brush);
    session.pointer_down(pos2(5.0, 5.0));
    session.pointer_move(pos2(15.0, 5.0)).unwrap();

    assert!(session.pointer_leave());
    assert!(!session.tools().is_gesture_active());
    assert_eq!(session.history().len(), 2);

    // Moves after leaving draw nothing
    let calls = session.surface().calls.len();
    assert!(!session.pointer_move(pos2(25.0, 5.0)).unwrap());
    assert_eq!(session.surface().calls.len(), calls);
}

#[test]
fn test_pointer_up_while_idle_is_a_no_op() {
    let mut session = recording_session(ToolKind::Brush);

    assert!(!session.pointer_up());
    assert!(!session.pointer_leave());
    assert_eq!(session.history().len(), 1);
    assert!(session.surface().calls.is_empty());
}

#[test]
fn test_text_tool_mid_gesture_is_reported() {
    let mut session = recording_session(ToolKind::Brush);
    session.pointer_down(pos2(5.0, 5.0));
    session.tools_mut().set_tool(ToolKind::Text);

    let result = session.pointer_move(pos2(10.0, 10.0));
    assert!(matches!(
        result,
        Err(GestureError::UnsupportedTool(ToolKind::Text))
    ));
    assert_eq!(session.history().len(), 1);

    // The session is still usable
    session.tools_mut().set_tool(ToolKind::Line);
    assert!(session.pointer_move(pos2(20.0, 20.0)).unwrap());
    assert!(session.pointer_up());
}

#[test]
fn test_pointer_down_during_gesture_commits_it_first() {
    let mut session = recording_session(ToolKind::Line);
    session.pointer_down(pos2(0.0, 0.0));
    session.pointer_move(pos2(10.0, 10.0)).unwrap();

    let started = session.pointer_down(pos2(50.0, 50.0));

    assert_eq!(
        started,
        PointerDown::GestureStarted {
            origin: pos2(50.0, 50.0)
        }
    );
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.tools().gesture_origin(), Some(pos2(50.0, 50.0)));
}

#[test]
fn test_zero_movement_gesture_commits_by_default() {
    let mut session = raster_session(ToolKind::Rectangle);
    session.pointer_down(pos2(20.0, 20.0));

    assert!(session.pointer_up());
    assert_eq!(session.history().len(), 2);
}

#[test]
fn test_unchanged_gesture_skipped_when_configured() {
    let config = SessionConfig {
        canvas_width: 64,
        canvas_height: 64,
        skip_unchanged_commits: true,
        ..SessionConfig::default()
    };
    let mut session = PaintSession::from_config(&config);
    session.tools_mut().set_tool(ToolKind::Rectangle);

    session.pointer_down(pos2(20.0, 20.0));
    assert!(!session.pointer_up());
    assert_eq!(session.history().len(), 1);

    session.pointer_down(pos2(20.0, 20.0));
    session.pointer_move(pos2(40.0, 40.0)).unwrap();
    assert!(session.pointer_up());
    assert_eq!(session.history().len(), 2);
}

#[test]
fn test_clear_is_recorded_and_undoable() {
    let mut session = raster_session(ToolKind::Brush);
    session.pointer_down(pos2(10.0, 10.0));
    session.pointer_move(pos2(40.0, 10.0)).unwrap();
    session.pointer_up();

    session.clear();
    assert_eq!(session.history().len(), 3);
    assert_eq!(session.surface().pixel(20, 10), Some([0, 0, 0, 0]));

    session.undo().unwrap();
    assert_eq!(session.surface().pixel(20, 10), Some([0, 0, 0, 255]));
}

#[test]
fn test_sessions_are_independent() {
    let mut first = raster_session(ToolKind::Brush);
    let second = raster_session(ToolKind::Brush);

    first.pointer_down(pos2(10.0, 10.0));
    first.pointer_move(pos2(40.0, 10.0)).unwrap();
    first.pointer_up();

    assert_eq!(first.history().len(), 2);
    assert_eq!(second.history().len(), 1);
    assert_eq!(second.surface().pixel(20, 10), Some([0, 0, 0, 0]));
}
