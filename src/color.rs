use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Dashboard colours
// ---------------------------------------------------------------------------

pub const CARD_BG: Color32 = Color32::from_rgb(0x1a, 0x1f, 0x2b);
pub const CARD_LABEL: Color32 = Color32::from_rgb(0xc5, 0xca, 0xe8);
pub const CARD_VALUE: Color32 = Color32::from_rgb(0xf6, 0xf7, 0xfd);
pub const ACCENT: Color32 = Color32::from_rgb(0xfe, 0xc3, 0xc7);
pub const TIP: Color32 = Color32::from_rgb(0xdb, 0x8a, 0x37);

/// Generates `n` pastel colours using evenly spaced hues.
pub fn pastel_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            // Start at orange so the first slice matches the accent family.
            let hue = 30.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.87);
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
// Continuous colour scale
// ---------------------------------------------------------------------------

/// Piecewise-linear gradient over evenly spaced stops, mixed in linear RGB.
#[derive(Debug, Clone)]
pub struct Gradient {
    stops: Vec<LinSrgb>,
}

impl Gradient {
    /// Build from `0xRRGGBB` stops. An empty list yields a grey scale.
    pub fn from_hex(stops: &[u32]) -> Self {
        let stops = stops
            .iter()
            .map(|&hex| {
                let [_, r, g, b] = hex.to_be_bytes();
                Srgb::new(r, g, b).into_format::<f32>().into_linear()
            })
            .collect();
        Gradient { stops }
    }

    /// Pastel scale used by the scatter chart.
    pub fn scatter() -> Self {
        Self::from_hex(&[0xffe1be, 0xfec3c7, 0xd8d7f6, 0xdee3fa])
    }

    /// Pastel scale used by the genre popularity bars.
    pub fn bars() -> Self {
        Self::from_hex(&[0xdbf5ce, 0xd8d7f6, 0xfec3c7, 0xf6e3f6])
    }

    /// Colour at `t` in `[0, 1]`; values outside are clamped.
    pub fn at(&self, t: f64) -> Color32 {
        let Some(first) = self.stops.first() else {
            return Color32::GRAY;
        };
        if self.stops.len() == 1 || !t.is_finite() {
            return to_color32(Srgb::from_linear(*first));
        }

        let scaled = t.clamp(0.0, 1.0) as f32 * (self.stops.len() - 1) as f32;
        let i = (scaled.floor() as usize).min(self.stops.len() - 2);
        let mixed = self.stops[i].mix(self.stops[i + 1], scaled - i as f32);
        to_color32(Srgb::from_linear(mixed))
    }

    /// Colour for `value` relative to `lo..=hi`.
    pub fn scaled(&self, value: f64, lo: f64, hi: f64) -> Color32 {
        let span = hi - lo;
        if span.abs() < f64::EPSILON {
            self.at(0.0)
        } else {
            self.at((value - lo) / span)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colours() {
        let colours = pastel_palette(7);
        assert_eq!(colours.len(), 7);
        for (i, a) in colours.iter().enumerate() {
            assert!(colours[i + 1..].iter().all(|b| a != b));
        }
        assert!(pastel_palette(0).is_empty());
    }

    #[test]
    fn gradient_hits_its_end_stops() {
        let g = Gradient::from_hex(&[0x000000, 0xffffff]);
        assert_eq!(g.at(0.0), Color32::from_rgb(0, 0, 0));
        assert_eq!(g.at(1.0), Color32::from_rgb(255, 255, 255));
        assert_eq!(g.at(7.0), g.at(1.0));
        assert_eq!(g.scaled(5.0, 5.0, 5.0), g.at(0.0));
    }

    #[test]
    fn empty_gradient_is_grey() {
        assert_eq!(Gradient::from_hex(&[]).at(0.5), Color32::GRAY);
    }
}
