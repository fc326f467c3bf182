use egui::{Color32, Pos2, Rect, Vec2};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use super::text::{FontBook, FontSpec, rasterize_text};
use super::{CompositeMode, Paint, Snapshot, Surface};

/// CPU surface backed by an RGBA8 image.
///
/// Geometry is sampled at pixel centres without anti-aliasing, so the set of
/// touched pixels is exact and reproducible. Glyph coverage is blended.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    pixels: RgbaImage,
    composite: CompositeMode,
    fonts: FontBook,
}

impl RasterSurface {
    /// Transparent surface with egui's bundled fonts available for text
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_fonts(width, height, FontBook::with_default_fonts())
    }

    pub fn with_fonts(width: u32, height: u32, fonts: FontBook) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            composite: CompositeMode::Normal,
            fonts,
        }
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    fn composite_color(&mut self, x: u32, y: u32, color: Color32, coverage: f32) {
        self.composite_rgba(x, y, color.to_srgba_unmultiplied(), coverage);
    }

    fn composite_rgba(&mut self, x: u32, y: u32, [r, g, b, a]: [u8; 4], coverage: f32) {
        let src_a = a as f32 / 255.0 * coverage.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }
        let mode = self.composite;
        let Some(dst) = self.pixels.get_pixel_mut_checked(x, y) else {
            return;
        };
        match mode {
            CompositeMode::Normal => source_over(&mut dst.0, [r, g, b], src_a),
            CompositeMode::Erase => destination_out(&mut dst.0, src_a),
        }
    }

    /// Composite `color` into every pixel in `bounds` whose centre satisfies `inside`
    fn paint_where(&mut self, bounds: Rect, color: Color32, inside: impl Fn(Pos2) -> bool) {
        let [width, height] = self.size();
        let min_x = bounds.min.x.floor().max(0.0) as u32;
        let min_y = bounds.min.y.floor().max(0.0) as u32;
        let max_x = (bounds.max.x.ceil().max(0.0) as u32).min(width);
        let max_y = (bounds.max.y.ceil().max(0.0) as u32).min(height);

        for y in min_y..max_y {
            for x in min_x..max_x {
                let center = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
                if inside(center) {
                    self.composite_color(x, y, color, 1.0);
                }
            }
        }
    }

    fn stroke_segments(&mut self, segments: Vec<(Pos2, Pos2)>, stroke: egui::Stroke) {
        let Some(bounds) = segments
            .iter()
            .map(|&(a, b)| Rect::from_two_pos(a, b))
            .reduce(|acc, rect| acc.union(rect))
        else {
            return;
        };
        let half_width = (stroke.width / 2.0).max(0.5);
        self.paint_where(bounds.expand(half_width), stroke.color, move |p| {
            segments
                .iter()
                .any(|&(a, b)| segment_distance(p, a, b) <= half_width)
        });
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> [u32; 2] {
        [self.pixels.width(), self.pixels.height()]
    }

    fn composite_mode(&self) -> CompositeMode {
        self.composite
    }

    fn set_composite_mode(&mut self, mode: CompositeMode) {
        self.composite = mode;
    }

    fn stroke_polyline(&mut self, points: &[Pos2], stroke: egui::Stroke) {
        // A lone move-to has nothing to stroke.
        if points.len() < 2 {
            return;
        }
        let segments = points.windows(2).map(|w| (w[0], w[1])).collect();
        self.stroke_segments(segments, stroke);
    }

    fn draw_rect(&mut self, origin: Pos2, size: Vec2, paint: Paint) {
        let rect = Rect::from_two_pos(origin, origin + size);
        match paint {
            Paint::Fill(color) => {
                self.paint_where(rect, color, move |p| {
                    p.x >= rect.min.x && p.x < rect.max.x && p.y >= rect.min.y && p.y < rect.max.y
                });
            }
            Paint::Stroke(stroke) => {
                let half_width = (stroke.width / 2.0).max(0.5);
                let outer = rect.expand(half_width);
                let inner = rect.shrink(half_width);
                self.paint_where(outer, stroke.color, move |p| {
                    let in_outer = p.x >= outer.min.x
                        && p.x <= outer.max.x
                        && p.y >= outer.min.y
                        && p.y <= outer.max.y;
                    let in_inner = p.x > inner.min.x
                        && p.x < inner.max.x
                        && p.y > inner.min.y
                        && p.y < inner.max.y;
                    in_outer && !in_inner
                });
            }
        }
    }

    fn draw_polygon(&mut self, points: &[Pos2], paint: Paint) {
        if points.len() < 2 {
            return;
        }
        match paint {
            Paint::Fill(color) => {
                let bounds = Rect::from_points(points);
                let polygon = points.to_vec();
                self.paint_where(bounds, color, move |p| polygon_contains(&polygon, p));
            }
            Paint::Stroke(stroke) => {
                let segments = points
                    .iter()
                    .zip(points.iter().cycle().skip(1))
                    .map(|(&a, &b)| (a, b))
                    .collect();
                self.stroke_segments(segments, stroke);
            }
        }
    }

    fn draw_circle(&mut self, center: Pos2, radius: f32, paint: Paint) {
        match paint {
            Paint::Fill(color) => {
                if radius <= 0.0 {
                    return;
                }
                let bounds = Rect::from_center_size(center, Vec2::splat(radius * 2.0));
                self.paint_where(bounds, color, move |p| p.distance(center) <= radius);
            }
            Paint::Stroke(stroke) => {
                let half_width = (stroke.width / 2.0).max(0.5);
                let bounds =
                    Rect::from_center_size(center, Vec2::splat((radius + half_width) * 2.0));
                self.paint_where(bounds, stroke.color, move |p| {
                    (p.distance(center) - radius).abs() <= half_width
                });
            }
        }
    }

    fn draw_text(&mut self, anchor: Pos2, text: &str, font: &FontSpec, color: Color32) {
        let Some(face) = self.fonts.resolve(&font.family).cloned() else {
            log::warn!("No font available to draw text {text:?}");
            return;
        };
        let [width, height] = self.size();
        rasterize_text(&face, font.size, anchor, text, |x, y, coverage| {
            if x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height {
                self.composite_color(x as u32, y as u32, color, coverage);
            }
        });
    }

    fn clear(&mut self) {
        let [width, height] = self.size();
        self.pixels = RgbaImage::new(width, height);
    }

    fn draw_image(&mut self, image: &RgbaImage) {
        let [width, height] = self.size();
        let resized;
        let source = if image.dimensions() == (width, height) {
            image
        } else {
            resized = imageops::resize(image, width, height, FilterType::Triangle);
            &resized
        };

        for (x, y, Rgba(rgba)) in source.enumerate_pixels() {
            self.composite_rgba(x, y, *rgba, 1.0);
        }
    }

    fn capture_snapshot(&self) -> Snapshot {
        Snapshot::new(self.pixels.clone())
    }

    fn restore(&mut self, snapshot: &Snapshot) {
        if snapshot.pixels().dimensions() != self.pixels.dimensions() {
            // The surface keeps its size for the whole session.
            log::warn!(
                "Ignoring a {}x{} snapshot restored onto a {}x{} surface",
                snapshot.width(),
                snapshot.height(),
                self.pixels.width(),
                self.pixels.height()
            );
            return;
        }
        let dst: &mut [u8] = &mut self.pixels;
        dst.copy_from_slice(snapshot.pixels().as_raw());
    }
}

fn source_over(dst: &mut [u8; 4], src: [u8; 3], src_a: f32) {
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return;
    }
    for channel in 0..3 {
        let s = src[channel] as f32 / 255.0;
        let d = dst[channel] as f32 / 255.0;
        dst[channel] = ((s * src_a + d * dst_a * (1.0 - src_a)) / out_a * 255.0)
            .round()
            .clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

fn destination_out(dst: &mut [u8; 4], src_a: f32) {
    let out_a = dst[3] as f32 / 255.0 * (1.0 - src_a);
    let alpha = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    if alpha == 0 {
        *dst = [0; 4];
    } else {
        dst[3] = alpha;
    }
}

fn segment_distance(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Even-odd rule
fn polygon_contains(polygon: &[Pos2], p: Pos2) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_over_opaque_replaces() {
        let mut dst = [10, 20, 30, 255];
        source_over(&mut dst, [200, 100, 50], 1.0);
        assert_eq!(dst, [200, 100, 50, 255]);
    }

    #[test]
    fn test_destination_out_full_coverage_clears() {
        let mut dst = [200, 100, 50, 255];
        destination_out(&mut dst, 1.0);
        assert_eq!(dst, [0, 0, 0, 0]);
    }

    #[test]
    fn test_segment_distance_clamps_to_endpoints() {
        let a = Pos2::new(0.0, 0.0);
        let b = Pos2::new(10.0, 0.0);
        assert_eq!(segment_distance(Pos2::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(segment_distance(Pos2::new(13.0, 4.0), a, b), 5.0);
    }

    #[test]
    fn test_polygon_contains_triangle() {
        let triangle = [
            Pos2::new(10.0, 0.0),
            Pos2::new(20.0, 20.0),
            Pos2::new(0.0, 20.0),
        ];
        assert!(polygon_contains(&triangle, Pos2::new(10.0, 10.0)));
        assert!(!polygon_contains(&triangle, Pos2::new(1.0, 1.0)));
    }

    #[test]
    fn test_fill_rect_with_negative_size() {
        let mut surface = RasterSurface::new(20, 20);
        surface.draw_rect(
            Pos2::new(10.0, 10.0),
            Vec2::new(-5.0, -5.0),
            Paint::Fill(Color32::RED),
        );
        assert_eq!(surface.pixel(5, 5), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(9, 9), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(10, 10), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_zero_radius_fill_draws_nothing() {
        let mut surface = RasterSurface::new(10, 10);
        surface.draw_circle(Pos2::new(5.0, 5.0), 0.0, Paint::Fill(Color32::RED));
        assert!(surface.pixels().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_restore_round_trips_pixels() {
        let mut surface = RasterSurface::new(16, 16);
        let blank = surface.capture_snapshot();
        surface.draw_circle(Pos2::new(8.0, 8.0), 4.0, Paint::Fill(Color32::BLUE));
        let drawn = surface.capture_snapshot();
        assert_ne!(blank, drawn);

        surface.restore(&blank);
        assert_eq!(surface.capture_snapshot(), blank);
        surface.restore(&drawn);
        assert_eq!(surface.capture_snapshot(), drawn);
    }

    #[test]
    fn test_restore_ignores_snapshot_of_other_size() {
        let mut surface = RasterSurface::new(10, 10);
        surface.draw_rect(
            Pos2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Paint::Fill(Color32::GREEN),
        );

        surface.restore(&Snapshot::new(RgbaImage::new(3, 4)));

        assert_eq!(surface.size(), [10, 10]);
        assert_eq!(surface.pixel(9, 9), Some([0, 255, 0, 255]));
    }
}
