use egui::{Pos2, Rect, TextureHandle, TextureOptions};
use futures::FutureExt as _;
use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::task::{Context, Poll};

use crate::command::Command;
use crate::file_handler::{self, DropPicker, FileHandler, ImagePicker, PickedImage};
use crate::input::{EventOutcome, InputHandler, PointerSample, route_event};
use crate::panels;
use crate::state::{PaintSession, SessionConfig};
use crate::surface::{RasterSurface, Surface};
use crate::tool::{Style, ToolKind};

/// Tool settings restored when the app restarts
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
struct PersistedTools {
    tool: ToolKind,
    style: Style,
}

/// Text being typed for the Text tool
pub(crate) struct TextPrompt {
    /// Surface coordinates of the baseline start
    pub anchor: Pos2,
    pub buffer: String,
    /// Where the prompt was shown last frame
    pub screen_rect: Option<Rect>,
}

pub struct PaintApp {
    pub(crate) session: PaintSession<RasterSurface>,
    pub(crate) input: InputHandler,
    pub(crate) file_handler: FileHandler,
    pub(crate) picker: DropPicker,
    pending_pick: Option<LocalBoxFuture<'static, Option<PickedImage>>>,
    pub(crate) text_prompt: Option<TextPrompt>,
    pub(crate) export_path: PathBuf,
    pub(crate) status: Option<String>,
    texture: Option<TextureHandle>,
    texture_dirty: bool,
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: SessionConfig) -> Self {
        let mut app = Self::from_config(&config);

        if let Some(storage) = cc.storage {
            if let Some(saved) = eframe::get_value::<PersistedTools>(storage, eframe::APP_KEY) {
                let tools = app.session.tools_mut();
                tools.set_tool(saved.tool);
                tools.set_style(saved.style);
            }
        }
        app
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            session: PaintSession::from_config(config),
            input: InputHandler::new(),
            file_handler: FileHandler::new(),
            picker: DropPicker::new(),
            pending_pick: None,
            text_prompt: None,
            export_path: PathBuf::from(&config.export_file_name),
            status: None,
            texture: None,
            texture_dirty: true,
        }
    }

    pub fn session(&self) -> &PaintSession<RasterSurface> {
        &self.session
    }

    pub(crate) fn execute(&mut self, command: Command) {
        let edits_canvas = command.edits_canvas();
        if let Err(err) = self.session.execute(command) {
            // Undo/redo at either end of the history does nothing.
            log::debug!("Command had no effect: {err}");
        }
        if edits_canvas {
            self.text_prompt = None;
            self.session.cancel_text();
            self.texture_dirty = true;
        }
    }

    /// Start waiting for an image to be dropped onto the window
    pub(crate) fn begin_import(&mut self) {
        self.pending_pick = Some(self.picker.pick());
        self.status = Some("Drop an image onto the window to import it".to_owned());
    }

    pub(crate) fn cancel_import(&mut self) {
        self.picker.cancel();
    }

    pub(crate) fn is_importing(&self) -> bool {
        self.pending_pick.is_some()
    }

    pub(crate) fn export(&mut self) {
        let result = file_handler::save_png(&self.session, &self.export_path);
        self.status = Some(match result {
            Ok(()) => format!("Saved {}", self.export_path.display()),
            Err(err) => format!("Export failed: {err}"),
        });
    }

    pub(crate) fn import_file(&mut self, file: &PickedImage) {
        self.status = Some(match file_handler::import_bytes(&mut self.session, &file.bytes) {
            Ok(()) => format!("Imported {}", file.name),
            Err(err) => format!("Could not import {}: {err}", file.name),
        });
        self.texture_dirty = true;
    }

    pub(crate) fn submit_text(&mut self) {
        if let Some(prompt) = self.text_prompt.take() {
            self.session.submit_text(&prompt.buffer);
            self.texture_dirty = true;
        }
    }

    pub(crate) fn cancel_text(&mut self) {
        self.text_prompt = None;
        self.session.cancel_text();
    }

    /// Route this frame's pointer activity over the visible part of
    /// `canvas_rect` into the session
    pub(crate) fn handle_canvas_input(
        &mut self,
        sample: PointerSample,
        canvas_rect: Rect,
        visible_rect: Rect,
    ) {
        let over_prompt = self
            .text_prompt
            .as_ref()
            .and_then(|prompt| prompt.screen_rect)
            .zip(sample.position)
            .is_some_and(|(rect, pos)| rect.contains(pos));
        if over_prompt {
            return;
        }
        let size = self.session.surface().size();
        for event in self.input.process(sample, canvas_rect, visible_rect, size) {
            match route_event(&event, &mut self.session) {
                EventOutcome::TextPrompt { anchor } => {
                    self.text_prompt = Some(TextPrompt {
                        anchor,
                        buffer: String::new(),
                        screen_rect: None,
                    });
                }
                EventOutcome::Drawing | EventOutcome::Committed => self.texture_dirty = true,
                EventOutcome::Ignored => {}
            }
        }
    }

    /// The canvas texture, re-uploaded when the pixels changed
    pub(crate) fn canvas_texture(&mut self, ctx: &egui::Context) -> &TextureHandle {
        let session = &self.session;
        let image = || {
            let pixels = session.surface().pixels();
            let size = [pixels.width() as usize, pixels.height() as usize];
            egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_raw())
        };

        if self.texture_dirty {
            if let Some(texture) = &mut self.texture {
                texture.set(image(), TextureOptions::NEAREST);
            }
            self.texture_dirty = false;
        }
        self.texture
            .get_or_insert_with(|| ctx.load_texture("canvas", image(), TextureOptions::NEAREST))
    }

    fn poll_import(&mut self) {
        let Some(pick) = self.pending_pick.as_mut() else {
            return;
        };
        let mut cx = Context::from_waker(futures::task::noop_waker_ref());
        if let Poll::Ready(picked) = pick.poll_unpin(&mut cx) {
            self.pending_pick = None;
            match picked {
                Some(file) => self.import_file(&file),
                None => {
                    log::info!("Image import cancelled");
                    self.status = Some("Import cancelled".to_owned());
                }
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        if !self.file_handler.check_for_dropped_files(ctx) {
            return;
        }
        for file in self.file_handler.take_images() {
            if let Err(file) = self.picker.deliver(file) {
                self.import_file(&file);
            }
        }
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let tools = self.session.tools();
        let persisted = PersistedTools {
            tool: tools.active_tool(),
            style: tools.style().clone(),
        };
        eframe::set_value(storage, eframe::APP_KEY, &persisted);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.poll_import();

        panels::tools_panel(self, ctx);
        panels::central_panel(self, ctx);

        if self.is_importing() {
            ctx.request_repaint();
        }
    }
}
