use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::surface::{DEFAULT_FAMILY, FontSpec};

/// Smallest brush width or font size the style accepts, in pixels
pub const MIN_SIZE: f32 = 1.0;

/// One channel of the drawing color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorChannel {
    Red,
    Green,
    Blue,
}

/// Drawing style shared by every tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub brush_width: f32,
    /// Fill closed shapes instead of outlining them
    pub fill: bool,
    pub font_family: String,
    pub font_size: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            red: 0,
            green: 0,
            blue: 0,
            brush_width: 5.0,
            fill: false,
            font_family: DEFAULT_FAMILY.to_owned(),
            font_size: 12.0,
        }
    }
}

impl Style {
    /// Opaque color composed from the three channels
    pub fn color(&self) -> Color32 {
        Color32::from_rgb(self.red, self.green, self.blue)
    }

    pub fn channel(&self, channel: ColorChannel) -> u8 {
        match channel {
            ColorChannel::Red => self.red,
            ColorChannel::Green => self.green,
            ColorChannel::Blue => self.blue,
        }
    }

    pub fn set_channel(&mut self, channel: ColorChannel, value: u8) {
        match channel {
            ColorChannel::Red => self.red = value,
            ColorChannel::Green => self.green = value,
            ColorChannel::Blue => self.blue = value,
        }
    }

    pub fn set_brush_width(&mut self, width: f32) {
        self.brush_width = sanitize_size(width);
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = sanitize_size(size);
    }

    pub fn font(&self) -> FontSpec {
        FontSpec::new(self.font_family.clone(), self.font_size)
    }

    /// Stroke with the current color at `width`
    pub fn stroke(&self, width: f32) -> egui::Stroke {
        egui::Stroke::new(width, self.color())
    }
}

fn sanitize_size(value: f32) -> f32 {
    if value.is_finite() {
        value.max(MIN_SIZE)
    } else {
        MIN_SIZE
    }
}
