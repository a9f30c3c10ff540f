//! Diverging class palettes.

use crate::config::Palette;
use plotters::style::RGBColor;

/// Anchor colors of the seismic map, evenly spaced over [0, 1].
const SEISMIC: [(f64, f64, f64); 5] = [
    (0.0, 0.0, 0.3),
    (0.0, 0.0, 1.0),
    (1.0, 1.0, 1.0),
    (1.0, 0.0, 0.0),
    (0.5, 0.0, 0.0),
];

/// Anchor colors of the blue-white-red map.
const BWR: [(f64, f64, f64); 3] = [(0.0, 0.0, 1.0), (1.0, 1.0, 1.0), (1.0, 0.0, 0.0)];

impl Palette {
    fn anchors(self) -> &'static [(f64, f64, f64)] {
        match self {
            Palette::Seismic => &SEISMIC,
            Palette::Bwr => &BWR,
        }
    }

    /// Color at position `t` in [0, 1], linearly interpolated between anchors.
    pub fn at(self, t: f64) -> RGBColor {
        let anchors = self.anchors();
        let t = t.clamp(0.0, 1.0);
        let scaled = t * (anchors.len() - 1) as f64;
        let lo = (scaled.floor() as usize).min(anchors.len() - 2);
        let frac = scaled - lo as f64;

        let (r0, g0, b0) = anchors[lo];
        let (r1, g1, b1) = anchors[lo + 1];
        let channel = |a: f64, b: f64| ((a + (b - a) * frac) * 255.0).round() as u8;

        RGBColor(channel(r0, r1), channel(g0, g1), channel(b0, b1))
    }

    /// `n` colors sampled evenly, excluding both extremes of the map.
    pub fn sample(self, n: usize) -> Vec<RGBColor> {
        (1..=n)
            .map(|i| self.at(i as f64 / (n + 1) as f64))
            .collect()
    }
}
