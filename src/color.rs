use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

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
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

// ---------------------------------------------------------------------------
// Category colours: label → Color32
// ---------------------------------------------------------------------------

/// Maps category labels (pie slices) to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Assign palette colours to labels in the order given.
    pub fn new<'a>(labels: impl ExactSizeIterator<Item = &'a str>) -> Self {
        let palette = generate_palette(labels.len());
        let mapping = labels
            .zip(palette)
            .map(|(label, c)| (label.to_string(), c))
            .collect();
        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Continuous scales
// ---------------------------------------------------------------------------

/// Colour scales for value-encoded bars and heatmap cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScale {
    /// Sequential, pale to dark blue.
    Blues,
    /// Diverging, blue through light grey to red.
    CoolWarm,
}

impl ColorScale {
    fn stops(&self) -> &'static [(f32, f32, f32)] {
        match self {
            ColorScale::Blues => &[
                (0.969, 0.984, 1.000),
                (0.776, 0.859, 0.937),
                (0.420, 0.682, 0.839),
                (0.129, 0.443, 0.710),
                (0.031, 0.188, 0.420),
            ],
            ColorScale::CoolWarm => &[
                (0.230, 0.299, 0.754),
                (0.552, 0.690, 0.996),
                (0.866, 0.866, 0.866),
                (0.958, 0.604, 0.483),
                (0.706, 0.016, 0.150),
            ],
        }
    }

    /// Colour at position `t` in `[0, 1]`, interpolated in linear RGB.
    pub fn sample(&self, t: f32) -> Color32 {
        let stops = self.stops();
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
        let segments = (stops.len() - 1) as f32;
        let pos = t * segments;
        let idx = (pos.floor() as usize).min(stops.len() - 2);
        let frac = pos - idx as f32;

        let (r0, g0, b0) = stops[idx];
        let (r1, g1, b1) = stops[idx + 1];
        let a: LinSrgb = Srgb::new(r0, g0, b0).into_linear();
        let b: LinSrgb = Srgb::new(r1, g1, b1).into_linear();
        to_color32(Srgb::from_linear(a.mix(b, frac)))
    }

    /// Colour of `value` with `[min, max]` mapped onto the whole scale.
    /// A degenerate range maps to the middle.
    pub fn sample_range(&self, value: f64, min: f64, max: f64) -> Color32 {
        let span = max - min;
        let t = if span.abs() < f64::EPSILON || !span.is_finite() {
            0.5
        } else {
            ((value - min) / span) as f32
        };
        self.sample(t)
    }
}

/// Black or white, whichever reads better on `background`.
pub fn contrast_text(background: Color32) -> Color32 {
    let [r, g, b, _] = background.to_array();
    let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    if luma > 150.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(5);
        assert_eq!(p.len(), 5);
        assert_ne!(p[0], p[1]);
    }

    #[test]
    fn color_map_falls_back_to_grey() {
        let labels = ["a", "b"];
        let map = ColorMap::new(labels.iter().copied());
        assert_ne!(map.color_for("a"), map.color_for("b"));
        assert_eq!(map.color_for("zzz"), Color32::GRAY);
    }

    #[test]
    fn scale_endpoints_match_stops() {
        assert_eq!(ColorScale::Blues.sample(0.0), Color32::from_rgb(247, 251, 255));
        assert_eq!(ColorScale::Blues.sample(1.0), Color32::from_rgb(8, 48, 107));
        assert_eq!(ColorScale::CoolWarm.sample(0.5), Color32::from_rgb(221, 221, 221));
    }

    #[test]
    fn range_sampling_handles_degenerate_span() {
        let mid = ColorScale::CoolWarm.sample(0.5);
        assert_eq!(ColorScale::CoolWarm.sample_range(3.0, 3.0, 3.0), mid);
        assert_eq!(
            ColorScale::CoolWarm.sample_range(1.0, -1.0, 1.0),
            ColorScale::CoolWarm.sample(1.0)
        );
    }

    #[test]
    fn text_contrast_flips_on_dark_backgrounds() {
        assert_eq!(contrast_text(Color32::WHITE), Color32::BLACK);
        assert_eq!(contrast_text(Color32::from_rgb(8, 48, 107)), Color32::WHITE);
    }
}
