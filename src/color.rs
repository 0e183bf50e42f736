use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::data::model::{Category, CATEGORY_COUNT};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

// ---------------------------------------------------------------------------
// Categorical mapping: sector → Color32
// ---------------------------------------------------------------------------

/// Fixed colour per sector, so a sector keeps its colour whatever subset is
/// selected.
#[derive(Debug, Clone)]
pub struct CategoryColors {
    colors: [Color32; CATEGORY_COUNT],
}

impl Default for CategoryColors {
    fn default() -> Self {
        let mut colors = [Color32::GRAY; CATEGORY_COUNT];
        for (slot, c) in colors.iter_mut().zip(generate_palette(CATEGORY_COUNT)) {
            *slot = c;
        }
        CategoryColors { colors }
    }
}

impl CategoryColors {
    pub fn color_for(&self, category: Category) -> Color32 {
        self.colors[category.index()]
    }
}

// ---------------------------------------------------------------------------
// Continuous scale: value → Color32
// ---------------------------------------------------------------------------

/// Sequential "Reds" stops, light to dark.
const REDS: [(u8, u8, u8); 9] = [
    (255, 245, 240),
    (254, 224, 210),
    (252, 187, 161),
    (252, 146, 114),
    (251, 106, 74),
    (239, 59, 44),
    (203, 24, 29),
    (165, 15, 21),
    (103, 0, 13),
];

/// Maps a value in `[min, max]` onto the "Reds" ramp. Values outside the
/// range saturate at the ends.
#[derive(Debug, Clone)]
pub struct ColorScale {
    min: f64,
    max: f64,
    stops: Vec<LinSrgb>,
}

impl ColorScale {
    pub fn reds(min: f64, max: f64) -> Self {
        let stops = REDS
            .iter()
            .map(|&(r, g, b)| Srgb::new(r, g, b).into_format::<f32>().into_linear())
            .collect();
        ColorScale { min, max, stops }
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Position of `value` on the scale, in `[0, 1]`.
    pub fn fraction(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 || value.is_nan() {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }

    pub fn color_for(&self, value: f64) -> Color32 {
        if value.is_nan() {
            return Color32::GRAY;
        }
        let segments = self.stops.len() - 1;
        let pos = self.fraction(value) as f32 * segments as f32;
        let lower = (pos.floor() as usize).min(segments - 1);
        let t = pos - lower as f32;
        let mixed = self.stops[lower].mix(self.stops[lower + 1], t);
        to_color32(Srgb::from_linear(mixed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(11).len(), 11);
    }

    #[test]
    fn category_colors_are_distinct() {
        let colors = CategoryColors::default();
        let a = colors.color_for(Category::Agriculture);
        let b = colors.color_for(Category::Transport);
        assert_ne!(a, b);
    }

    #[test]
    fn scale_ends_match_stops_and_saturate() {
        let scale = ColorScale::reds(0.0, 5e9);
        assert_eq!(scale.color_for(0.0), Color32::from_rgb(255, 245, 240));
        assert_eq!(scale.color_for(5e9), Color32::from_rgb(103, 0, 13));
        assert_eq!(scale.color_for(-1.0), scale.color_for(0.0));
        assert_eq!(scale.color_for(1e12), scale.color_for(5e9));
        assert_eq!(scale.fraction(2.5e9), 0.5);
    }

    #[test]
    fn darker_for_larger_values() {
        let scale = ColorScale::reds(0.0, 100.0);
        let light = scale.color_for(10.0);
        let dark = scale.color_for(90.0);
        assert!(dark.g() < light.g());
    }
}
