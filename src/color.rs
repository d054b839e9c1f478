use eframe::egui::Color32;
use palette::{IntoColor, Lch, Mix, Srgb};

// ---------------------------------------------------------------------------
// Flow palette: quantized departure ratio → circle color
// ---------------------------------------------------------------------------

/// All-departures endpoint (steel blue).
const DEPARTURES_RGB: [u8; 3] = [70, 130, 180];
/// All-arrivals endpoint (dark orange).
const ARRIVALS_RGB: [u8; 3] = [255, 140, 0];

/// Mix the two endpoint colors in Lch space. `t = 0` is all arrivals,
/// `t = 1` all departures; perceptual mixing keeps the midpoint from
/// turning muddy the way a plain RGB average does.
fn mix_flow(t: f32) -> Color32 {
    let to_lch = |[r, g, b]: [u8; 3]| -> Lch {
        Srgb::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        )
        .into_color()
    };

    let mixed = to_lch(ARRIVALS_RGB).mix(to_lch(DEPARTURES_RGB), t);
    let rgb: Srgb = mixed.into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Maps the quantized departure ratio (0, 0.5 or 1) to a fill color.
#[derive(Debug, Clone)]
pub struct FlowPalette {
    mapping: Vec<(f64, Color32)>,
}

impl Default for FlowPalette {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowPalette {
    pub fn new() -> Self {
        let mapping = [0.0, 0.5, 1.0]
            .into_iter()
            .map(|q| (q, mix_flow(q as f32)))
            .collect();
        FlowPalette { mapping }
    }

    /// Look up the color for a quantized ratio (nearest bucket wins, so a
    /// value straight from the quantize scale always hits exactly).
    pub fn color_for(&self, quantized: f64) -> Color32 {
        self.mapping
            .iter()
            .min_by(|(a, _), (b, _)| {
                (a - quantized)
                    .abs()
                    .total_cmp(&(b - quantized).abs())
            })
            .map(|(_, c)| *c)
            .unwrap_or(Color32::GRAY)
    }

    /// Legend entries (label → color) for the side panel.
    pub fn legend_entries(&self) -> Vec<(&'static str, Color32)> {
        let labels = ["More arrivals", "Balanced", "More departures"];
        self.mapping
            .iter()
            .zip(labels)
            .map(|((_, c), label)| (label, *c))
            .collect()
    }
}
