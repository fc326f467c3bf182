//! The pixel surface that tools draw into.
//!
//! [`Surface`] is the seam between the drawing session and whatever owns the
//! pixels. The session only ever talks to this trait, so a GPU canvas, a web
//! canvas or the bundled [`RasterSurface`] can sit behind it.

mod raster;
mod text;

pub use raster::RasterSurface;
pub use text::{DEFAULT_FAMILY, FontBook, FontSpec};

use egui::{Color32, Pos2, Vec2};
use image::RgbaImage;
use std::sync::Arc;

/// How drawn pixels combine with the pixels already on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    /// Source-over blending
    #[default]
    Normal,
    /// Destination-out: drawn coverage removes alpha from the surface
    Erase,
}

/// How a closed shape is painted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Fill(Color32),
    Stroke(egui::Stroke),
}

impl Paint {
    /// Fill when `filled`, otherwise outline with `stroke`
    pub fn for_shape(filled: bool, stroke: egui::Stroke) -> Self {
        if filled {
            Self::Fill(stroke.color)
        } else {
            Self::Stroke(stroke)
        }
    }
}

/// An immutable capture of every pixel on a surface.
///
/// Cloning is cheap: the pixel buffer is shared.
#[derive(Clone)]
pub struct Snapshot {
    pixels: Arc<RgbaImage>,
}

impl Snapshot {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// RGBA of one pixel, or `None` outside the snapshot
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
            || (self.pixels.dimensions() == other.pixels.dimensions()
                && self.pixels.as_raw() == other.pixels.as_raw())
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// Drawing primitives and snapshot capture for a fixed-size pixel surface.
///
/// Coordinates are surface pixels with the origin at the top-left corner.
pub trait Surface {
    /// Width and height in pixels
    fn size(&self) -> [u32; 2];

    fn composite_mode(&self) -> CompositeMode;

    fn set_composite_mode(&mut self, mode: CompositeMode);

    /// Stroke an open path through `points` with round caps and joins
    fn stroke_polyline(&mut self, points: &[Pos2], stroke: egui::Stroke);

    /// Axis-aligned rectangle at `origin` with a signed `size`.
    /// Negative components extend the rectangle left/up from the origin.
    fn draw_rect(&mut self, origin: Pos2, size: Vec2, paint: Paint);

    /// Closed polygon through `points`
    fn draw_polygon(&mut self, points: &[Pos2], paint: Paint);

    fn draw_circle(&mut self, center: Pos2, radius: f32, paint: Paint);

    /// Text with its alphabetic baseline starting at `anchor`
    fn draw_text(&mut self, anchor: Pos2, text: &str, font: &FontSpec, color: Color32);

    /// Reset every pixel to transparent, ignoring the composite mode
    fn clear(&mut self);

    /// Stretch `image` over the whole surface and composite it
    fn draw_image(&mut self, image: &RgbaImage);

    fn capture_snapshot(&self) -> Snapshot;

    /// Replace every pixel with the snapshot's. Exact inverse of `capture_snapshot`.
    /// A snapshot of a different size is ignored.
    fn restore(&mut self, snapshot: &Snapshot);
}
