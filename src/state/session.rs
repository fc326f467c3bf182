use egui::Pos2;
use image::RgbaImage;
use std::fs;

use super::SessionConfig;
use crate::command::{Command, CommandResult, HistoryStore};
use crate::error::{GestureError, HistoryError};
use crate::surface::{CompositeMode, RasterSurface, Surface};
use crate::tool::{PointerDown, ToolSession};

/// One drawing surface with its history and tool state.
///
/// Every input event and edit goes through here, one at a time. Several
/// sessions can live side by side; they share nothing.
#[derive(Debug)]
pub struct PaintSession<S: Surface = RasterSurface> {
    surface: S,
    history: HistoryStore,
    tools: ToolSession,
    skip_unchanged_commits: bool,
}

impl PaintSession<RasterSurface> {
    /// Blank raster surface sized and styled from `config`.
    ///
    /// Fonts listed in `config.font_files` are registered for the Text tool.
    /// One that cannot be read or parsed is logged and skipped.
    pub fn from_config(config: &SessionConfig) -> Self {
        let mut surface = RasterSurface::new(config.canvas_width, config.canvas_height);
        for (family, path) in &config.font_files {
            let loaded = fs::read(path)
                .map_err(|err| err.to_string())
                .and_then(|bytes| {
                    surface
                        .fonts_mut()
                        .insert_font_bytes(family.clone(), bytes)
                        .map_err(|err| err.to_string())
                });
            match loaded {
                Ok(()) => log::info!("Loaded font {family:?} from {}", path.display()),
                Err(err) => log::error!(
                    "Failed to load font {family:?} from {}: {err}",
                    path.display()
                ),
            }
        }
        Self::with_config(surface, config)
    }
}

impl<S: Surface> PaintSession<S> {
    /// Session over `surface` with unbounded history and default style.
    /// The surface's current pixels become the first snapshot.
    pub fn new(surface: S) -> Self {
        Self::with_parts(surface, HistoryStore::new(), ToolSession::default(), false)
    }

    pub fn with_config(surface: S, config: &SessionConfig) -> Self {
        let history = match config.history_limit {
            Some(limit) => HistoryStore::with_limit(limit),
            None => HistoryStore::new(),
        };
        Self::with_parts(
            surface,
            history,
            ToolSession::new(config.style.clone()),
            config.skip_unchanged_commits,
        )
    }

    fn with_parts(
        surface: S,
        mut history: HistoryStore,
        tools: ToolSession,
        skip_unchanged_commits: bool,
    ) -> Self {
        history.initialize(surface.capture_snapshot());
        let [width, height] = surface.size();
        log::info!("Paint session started on a {width}x{height} surface");
        Self {
            surface,
            history,
            tools,
            skip_unchanged_commits,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn tools(&self) -> &ToolSession {
        &self.tools
    }

    pub fn tools_mut(&mut self) -> &mut ToolSession {
        &mut self.tools
    }

    pub fn execute(&mut self, command: Command) -> CommandResult {
        command.execute(self)
    }

    pub fn pointer_down(&mut self, pos: Pos2) -> PointerDown {
        if self.tools.is_gesture_active() {
            log::debug!("Pointer down during an active gesture, finishing it first");
            self.finish_gesture();
        }
        self.tools.pointer_down(pos)
    }

    /// Returns whether the surface changed. Unsupported-tool diagnostics are
    /// logged and returned; the session stays usable.
    pub fn pointer_move(&mut self, pos: Pos2) -> Result<bool, GestureError> {
        let result = self
            .tools
            .pointer_move(pos, &mut self.surface, &self.history);
        match &result {
            Err(GestureError::UnsupportedTool(tool)) => {
                log::warn!("Pointer move ignored: {tool} has no drag behaviour");
            }
            Err(GestureError::History(err)) => {
                debug_assert!(false, "history unusable during a gesture: {err}");
                log::error!("History unusable during a gesture: {err}");
            }
            Ok(_) => {}
        }
        result
    }

    /// Ends the gesture and commits it. Returns whether a snapshot was added.
    pub fn pointer_up(&mut self) -> bool {
        self.finish_gesture()
    }

    /// Leaving the surface ends a gesture exactly like releasing the pointer
    pub fn pointer_leave(&mut self) -> bool {
        self.finish_gesture()
    }

    /// Place `text` at the open prompt. Returns whether a snapshot was added;
    /// whitespace-only text adds nothing.
    pub fn submit_text(&mut self, text: &str) -> bool {
        if self.tools.submit_text(text, &mut self.surface) {
            self.commit()
        } else {
            false
        }
    }

    pub fn cancel_text(&mut self) {
        self.tools.cancel_text();
    }

    pub fn undo(&mut self) -> Result<(), HistoryError> {
        self.finish_gesture();
        let snapshot = self.history.undo().inspect_err(|err| {
            log::debug!("Undo ignored: {err}");
        })?;
        self.surface.restore(snapshot);
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), HistoryError> {
        self.finish_gesture();
        let snapshot = self.history.redo().inspect_err(|err| {
            log::debug!("Redo ignored: {err}");
        })?;
        self.surface.restore(snapshot);
        Ok(())
    }

    /// Wipe the surface to transparent and record it
    pub fn clear(&mut self) {
        self.finish_gesture();
        self.surface.clear();
        self.commit();
    }

    /// Stretch `image` over the surface and record it
    pub fn import_image(&mut self, image: &RgbaImage) {
        self.finish_gesture();
        self.surface.set_composite_mode(CompositeMode::Normal);
        self.surface.draw_image(image);
        self.commit();
        log::info!(
            "Imported a {}x{} image onto the canvas",
            image.width(),
            image.height()
        );
    }

    fn finish_gesture(&mut self) -> bool {
        self.tools.end_gesture() && self.commit()
    }

    fn commit(&mut self) -> bool {
        let snapshot = self.surface.capture_snapshot();
        if self.skip_unchanged_commits
            && self
                .history
                .peek_current()
                .is_ok_and(|current| *current == snapshot)
        {
            log::debug!("Surface unchanged, nothing committed");
            return false;
        }
        self.history.commit(snapshot);
        true
    }
}
