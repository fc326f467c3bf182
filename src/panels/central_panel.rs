use crate::PaintApp;
use crate::input::{InputHandler, PointerSample};
use crate::surface::Surface;

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let [width, height] = app.session().surface().size();
        let canvas_size = egui::vec2(width as f32, height as f32);

        egui::ScrollArea::both().show(ui, |ui| {
            let (response, painter) =
                ui.allocate_painter(canvas_size, egui::Sense::click_and_drag());
            let canvas_rect = response.rect;

            // Scrollbars and panels drawn over the canvas keep their clicks
            let visible_rect = canvas_rect.intersect(ui.clip_rect());
            let mut sample = PointerSample::from_ctx(ctx);
            if !response.contains_pointer() {
                sample.position = None;
            }

            // Handle input before drawing so this frame shows the new pixels
            app.handle_canvas_input(sample, canvas_rect, visible_rect);

            painter.rect_filled(canvas_rect, 0.0, egui::Color32::WHITE);
            let texture = app.canvas_texture(ctx);
            painter.image(
                texture.id(),
                canvas_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );

            text_prompt(app, ctx, canvas_rect);
        });
    });
}

/// Text entry box at the Text tool's anchor. Enter draws, Escape cancels.
fn text_prompt(app: &mut PaintApp, ctx: &egui::Context, canvas_rect: egui::Rect) {
    let size = app.session().surface().size();
    let Some(prompt) = app.text_prompt.as_mut() else {
        return;
    };
    let screen_pos = InputHandler::to_screen(prompt.anchor, canvas_rect, size);

    let mut submit = false;
    let mut cancel = false;
    let area = egui::Area::new(egui::Id::new("text_prompt"))
        .fixed_pos(screen_pos)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                let response = ui.text_edit_singleline(&mut prompt.buffer);
                response.request_focus();
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    cancel = true;
                }
            });
        });
    prompt.screen_rect = Some(area.response.rect);

    if submit {
        app.submit_text();
    } else if cancel {
        app.cancel_text();
    }
}
