use crate::PaintApp;
use crate::command::Command;
use crate::tool::{ColorChannel, MIN_SIZE, ToolKind};

const FONT_SIZES: [f32; 6] = [12.0, 16.0, 20.0, 24.0, 32.0, 48.0];

pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active_tool = app.session().tools().active_tool();
            ui.horizontal_wrapped(|ui| {
                for tool in ToolKind::ALL {
                    let label = format!("{} {}", tool.icon(), tool.name());
                    if ui.selectable_label(active_tool == tool, label).clicked() {
                        log::info!("Tool selected from UI: {tool}");
                        app.execute(Command::SelectTool(tool));
                    }
                }
            });
            ui.separator();

            style_controls(app, ui);
            ui.separator();

            // Undo/Redo section
            ui.horizontal(|ui| {
                let can_undo = app.session().history().can_undo();
                let can_redo = app.session().history().can_redo();

                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    app.execute(Command::Undo);
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    app.execute(Command::Redo);
                }
                if ui.button("Clear").clicked() {
                    app.execute(Command::Clear);
                }
            });

            let history = app.session().history();
            ui.label(format!(
                "History: {} of {}",
                history.cursor().map_or(0, |cursor| cursor + 1),
                history.len()
            ));
            ui.separator();

            file_controls(app, ui);

            if let Some(status) = &app.status {
                ui.separator();
                ui.label(status);
            }
        });
}

fn style_controls(app: &mut PaintApp, ui: &mut egui::Ui) {
    let style = app.session().tools().style().clone();

    ui.heading("Color");
    for (channel, name) in [
        (ColorChannel::Red, "R"),
        (ColorChannel::Green, "G"),
        (ColorChannel::Blue, "B"),
    ] {
        let mut value = style.channel(channel);
        if ui.add(egui::Slider::new(&mut value, 0..=255).text(name)).changed() {
            app.execute(Command::SetColorChannel { channel, value });
        }
    }
    let (swatch, painter) = ui.allocate_painter(egui::vec2(40.0, 16.0), egui::Sense::hover());
    painter.rect_filled(swatch.rect, 2.0, style.color());

    let mut width = style.brush_width;
    if ui
        .add(egui::Slider::new(&mut width, MIN_SIZE..=100.0).text("Brush width"))
        .changed()
    {
        app.execute(Command::SetBrushWidth(width));
    }

    let mut fill = style.fill;
    if ui.checkbox(&mut fill, "Fill shapes").changed() {
        app.execute(Command::SetFill(fill));
    }

    ui.heading("Text");
    let families: Vec<String> = app
        .session()
        .surface()
        .fonts()
        .families()
        .map(str::to_owned)
        .collect();
    let mut family = style.font_family.clone();
    egui::ComboBox::from_label("Font")
        .selected_text(&family)
        .show_ui(ui, |ui| {
            for name in &families {
                ui.selectable_value(&mut family, name.clone(), name);
            }
        });
    if family != style.font_family {
        app.execute(Command::SetFontFamily(family));
    }

    let mut size = style.font_size;
    egui::ComboBox::from_label("Size")
        .selected_text(format!("{size} px"))
        .show_ui(ui, |ui| {
            for option in FONT_SIZES {
                ui.selectable_value(&mut size, option, format!("{option} px"));
            }
        });
    if size != style.font_size {
        app.execute(Command::SetFontSize(size));
    }
}

fn file_controls(app: &mut PaintApp, ui: &mut egui::Ui) {
    ui.heading("File");
    ui.horizontal(|ui| {
        if app.is_importing() {
            ui.spinner();
            if ui.button("Cancel").clicked() {
                app.cancel_import();
            }
        } else if ui.button("Upload").clicked() {
            app.begin_import();
        }
        if ui.button("Download").clicked() {
            app.export();
        }
    });

    let mut name = app.export_path.display().to_string();
    if ui.text_edit_singleline(&mut name).changed() {
        app.export_path = name.into();
    }
}
