use ab_glyph::{Font as _, FontArc, FontRef, FontVec, ScaleFont as _};
use egui::Pos2;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Family used when a requested family is not registered
pub const DEFAULT_FAMILY: &str = "Sans";

/// Font family name plus pixel size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size: f32,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

/// Named fonts available for text stamping
#[derive(Clone, Default)]
pub struct FontBook {
    fonts: BTreeMap<String, FontArc>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("families", &self.fonts.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FontBook {
    /// Loads the proportional and monospace fonts bundled with egui as
    /// "Sans" and "Monospace".
    pub fn with_default_fonts() -> Self {
        let definitions = egui::FontDefinitions::default();
        let mut book = Self::default();

        for (family, name) in [
            (egui::FontFamily::Proportional, DEFAULT_FAMILY),
            (egui::FontFamily::Monospace, "Monospace"),
        ] {
            match bundled_font(&definitions, &family) {
                Some(font) => {
                    book.fonts.insert(name.to_owned(), font);
                }
                None => log::warn!("No bundled font available for {name}"),
            }
        }

        book
    }

    /// Register a TTF/OTF font under `name`, replacing any previous one
    pub fn insert_font_bytes(
        &mut self,
        name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<(), ab_glyph::InvalidFont> {
        let font = FontVec::try_from_vec(bytes)?;
        self.fonts.insert(name.into(), FontArc::from(font));
        Ok(())
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    pub fn contains(&self, family: &str) -> bool {
        self.fonts.contains_key(family)
    }

    /// Exact match, then case-insensitive match, then the default family
    pub fn resolve(&self, family: &str) -> Option<&FontArc> {
        self.fonts
            .get(family)
            .or_else(|| {
                self.fonts
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(family))
                    .map(|(_, font)| font)
            })
            .or_else(|| {
                log::debug!("Font family {family:?} not registered, using {DEFAULT_FAMILY}");
                self.fonts.get(DEFAULT_FAMILY)
            })
            .or_else(|| self.fonts.values().next())
    }
}

fn bundled_font(
    definitions: &egui::FontDefinitions,
    family: &egui::FontFamily,
) -> Option<FontArc> {
    let font_name = definitions.families.get(family)?.first()?;
    let data = definitions.font_data.get(font_name)?;
    match &data.font {
        Cow::Borrowed(bytes) => FontRef::try_from_slice_and_index(*bytes, data.index)
            .map(FontArc::from)
            .ok(),
        Cow::Owned(bytes) => FontVec::try_from_vec_and_index(bytes.clone(), data.index)
            .map(FontArc::from)
            .ok(),
    }
}

/// Lays out `text` on a single line with its baseline at `anchor.y` and
/// reports per-pixel glyph coverage to `plot`.
pub(crate) fn rasterize_text(
    font: &FontArc,
    size: f32,
    anchor: Pos2,
    text: &str,
    mut plot: impl FnMut(i32, i32, f32),
) {
    let scaled = font.as_scaled(size);
    let mut caret = ab_glyph::point(anchor.x, anchor.y);
    let mut previous = None;

    for ch in text.chars().filter(|ch| !ch.is_control()) {
        let mut glyph = scaled.scaled_glyph(ch);
        if let Some(previous) = previous {
            caret.x += scaled.kern(previous, glyph.id);
        }
        glyph.position = caret;
        caret.x += scaled.h_advance(glyph.id);
        previous = Some(glyph.id);

        if let Some(outlined) = scaled.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|x, y, coverage| {
                plot(
                    bounds.min.x as i32 + x as i32,
                    bounds.min.y as i32 + y as i32,
                    coverage,
                );
            });
        }
    }
}
