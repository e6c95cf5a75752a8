use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Chart palettes
// ---------------------------------------------------------------------------

/// Died / Survived colours of the gender plot.
pub const DIED_RED: Color32 = Color32::from_rgb(0xe7, 0x4c, 0x3c);
pub const SURVIVED_GREEN: Color32 = Color32::from_rgb(0x2e, 0xcc, 0x71);

/// Anchor colours of the viridis colour map, evenly spaced from 0 to 1.
const VIRIDIS_ANCHORS: [(u8, u8, u8); 5] = [
    (0x44, 0x01, 0x54),
    (0x3b, 0x52, 0x8b),
    (0x21, 0x91, 0x8c),
    (0x5e, 0xc9, 0x62),
    (0xfd, 0xe7, 0x25),
];

/// Which palette a chart uses for its hue levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuePalette {
    /// Fixed red (died) / green (survived).
    DiedSurvived,
    /// `n` samples of viridis.
    Viridis,
}

impl HuePalette {
    /// Colour of the hue level `index` out of `n` levels.
    pub fn color(self, index: usize, n: usize) -> Color32 {
        match self {
            HuePalette::DiedSurvived => {
                if index == 0 {
                    DIED_RED
                } else {
                    SURVIVED_GREEN
                }
            }
            HuePalette::Viridis => viridis(n).get(index).copied().unwrap_or(Color32::GRAY),
        }
    }
}

/// Colour for a `survived` level when both levels share one chart.
pub fn status_color(survived: bool) -> Color32 {
    if survived {
        SURVIVED_GREEN
    } else {
        DIED_RED
    }
}

/// `n` colours sampled from viridis, interpolated in linear RGB.
///
/// Samples sit at `linspace(0, 1, n + 2)[1..=n]`, skipping both ends of the
/// map like seaborn's discrete palette.
pub fn viridis(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let t = (i + 1) as f32 / (n + 1) as f32;
            sample_viridis(t)
        })
        .collect()
}

fn sample_viridis(t: f32) -> Color32 {
    let segments = (VIRIDIS_ANCHORS.len() - 1) as f32;
    let pos = t.clamp(0.0, 1.0) * segments;
    let lo = (pos.floor() as usize).min(VIRIDIS_ANCHORS.len() - 2);
    let frac = pos - lo as f32;

    let anchor = |(r, g, b): (u8, u8, u8)| -> LinSrgb {
        Srgb::new(r, g, b).into_format::<f32>().into_linear()
    };
    let mixed = anchor(VIRIDIS_ANCHORS[lo]).mix(anchor(VIRIDIS_ANCHORS[lo + 1]), frac);
    let rgb: Srgb = Srgb::from_linear(mixed);
    Color32::from_rgb(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}
