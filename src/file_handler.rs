use futures::FutureExt as _;
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;

use crate::error::FileError;
use crate::state::PaintSession;
use crate::surface::Surface;

/// Name offered for exported canvases
pub const DEFAULT_EXPORT_NAME: &str = "canvas_image.png";

/// An image file the user chose, not yet decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Lets the user choose an image file.
///
/// The future resolves to `None` when the user backs out; there is no timeout.
pub trait ImagePicker {
    fn pick(&mut self) -> LocalBoxFuture<'static, Option<PickedImage>>;
}

/// Picker fed by whatever file is dropped next.
///
/// `pick` hands out a future; `deliver` resolves it and `cancel` resolves it
/// with `None`.
#[derive(Debug, Default)]
pub struct DropPicker {
    waiting: Option<oneshot::Sender<PickedImage>>,
}

impl DropPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting.is_some()
    }

    /// Give `file` to the pending pick. Hands it back if nobody is waiting.
    pub fn deliver(&mut self, file: PickedImage) -> Result<(), PickedImage> {
        match self.waiting.take() {
            Some(sender) => sender.send(file),
            None => Err(file),
        }
    }

    pub fn cancel(&mut self) {
        // Dropping the sender resolves the pick with `None`.
        self.waiting = None;
    }
}

impl ImagePicker for DropPicker {
    fn pick(&mut self) -> LocalBoxFuture<'static, Option<PickedImage>> {
        let (sender, receiver) = oneshot::channel();
        self.waiting = Some(sender);
        receiver.map(Result::ok).boxed_local()
    }
}

pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, FileError> {
    let image = image::load_from_memory(bytes).map_err(FileError::Decode)?;
    log::debug!(
        "Successfully decoded image: {}x{}",
        image.width(),
        image.height()
    );
    Ok(image.to_rgba8())
}

/// Decode `bytes` and draw them over the whole surface. On a decode error
/// the surface and history are untouched.
pub fn import_bytes<S: Surface>(
    session: &mut PaintSession<S>,
    bytes: &[u8],
) -> Result<(), FileError> {
    let image = decode_image(bytes).inspect_err(|err| log::error!("{err}"))?;
    session.import_image(&image);
    Ok(())
}

/// Wait for `picker`, then import its file. Returns `Ok(false)` when the
/// user picked nothing.
pub async fn import_with<S: Surface, P: ImagePicker>(
    session: &mut PaintSession<S>,
    picker: &mut P,
) -> Result<bool, FileError> {
    let Some(file) = picker.pick().await else {
        log::info!("Image import cancelled");
        return Ok(false);
    };
    log::info!("Importing {} ({} bytes)", file.name, file.bytes.len());
    import_bytes(session, &file.bytes)?;
    Ok(true)
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, FileError> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(FileError::Encode)?;
    Ok(bytes)
}

/// The surface's current pixels as PNG bytes
pub fn export_png<S: Surface>(session: &PaintSession<S>) -> Result<Vec<u8>, FileError> {
    encode_png(session.surface().capture_snapshot().pixels())
}

/// Write the surface as a PNG to `path`
pub fn save_png<S: Surface>(session: &PaintSession<S>, path: &Path) -> Result<(), FileError> {
    let bytes = export_png(session)?;
    std::fs::write(path, bytes).inspect_err(|err| {
        log::error!("Failed to write {}: {err}", path.display());
    })?;
    log::info!("Canvas exported to {}", path.display());
    Ok(())
}

/// Collects image files dropped onto the window
#[derive(Debug, Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grab newly dropped files from the UI context.
    /// Returns true if any new files arrived.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        ctx.input(|i| {
            if i.raw.dropped_files.is_empty() {
                false
            } else {
                self.dropped_files.extend(i.raw.dropped_files.iter().cloned());
                true
            }
        })
    }

    /// Read every queued image file; non-images and unreadable files are skipped
    pub fn take_images(&mut self) -> Vec<PickedImage> {
        std::mem::take(&mut self.dropped_files)
            .into_iter()
            .filter_map(|file| {
                let name = file_name(&file);
                if !is_image_file(&file) {
                    log::warn!("Dropped file is not a supported type: {name}");
                    return None;
                }
                read_dropped(&file, &name).map(|bytes| PickedImage { name, bytes })
            })
            .collect()
    }
}

fn file_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Check if a file is an image based on MIME type or extension
fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    file.path
        .as_deref()
        .and_then(Path::extension)
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| {
            matches!(
                ext.as_str(),
                "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp"
            )
        })
}

fn read_dropped(file: &egui::DroppedFile, name: &str) -> Option<Vec<u8>> {
    if let Some(bytes) = &file.bytes {
        return Some(bytes.to_vec());
    }
    let Some(path) = &file.path else {
        log::warn!("Dropped file has no accessible data: {name}");
        return None;
    };
    std::fs::read(path)
        .inspect_err(|err| log::error!("Failed to read image file: {}: {err}", path.display()))
        .ok()
}
