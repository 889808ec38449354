use eframe::egui::Color32;

use crate::util::hex_color;

const LIGHT_NEUTRAL: &str = "#64748b";
const FALLBACK: Color32 = Color32::from_rgb(0x94, 0xa3, 0xb8);

/// Darker variants used for link colours on a light background.
const LIGHT_VARIANTS: [(&str, &str); 8] = [
    ("#3b82f6", "#1d4ed8"),
    ("#ef4444", "#dc2626"),
    ("#10b981", "#059669"),
    ("#f59e0b", "#d97706"),
    ("#8b5cf6", "#7c3aed"),
    ("#f97316", "#ea580c"),
    ("#06b6d4", "#0891b2"),
    ("#84cc16", "#65a30d"),
];

/// Fixed colours for one theme. Category colours are never remapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub is_light: bool,
    pub background: Color32,
    pub label: Color32,
    pub node_stroke: Color32,
    pub selection: Color32,
    pub search_ring: Color32,
}

impl Palette {
    pub fn for_theme(is_light: bool) -> Self {
        if is_light {
            Self {
                is_light,
                background: Color32::from_rgb(0xf8, 0xfa, 0xfc),
                label: Color32::from_rgb(0x1e, 0x29, 0x3b),
                node_stroke: Color32::from_rgb(0xf8, 0xfa, 0xfc),
                selection: Color32::from_rgb(0x0f, 0x17, 0x2a),
                search_ring: Color32::from_rgb(0xd9, 0x77, 0x06),
            }
        } else {
            Self {
                is_light,
                background: Color32::from_rgb(0x0f, 0x17, 0x2a),
                label: Color32::from_rgb(0xe0, 0xe0, 0xe0),
                node_stroke: Color32::WHITE,
                selection: Color32::from_rgb(0xfb, 0xbf, 0x24),
                search_ring: Color32::from_rgb(0xfb, 0xbf, 0x24),
            }
        }
    }

    pub fn category_color(&self, hex: &str) -> Color32 {
        hex_color(hex).unwrap_or(FALLBACK)
    }

    /// Link stroke colour: the original hue in dark mode, its darker variant in light mode.
    pub fn link_color(&self, hex: &str) -> Color32 {
        if self.is_light {
            hex_color(light_variant(hex)).unwrap_or(FALLBACK)
        } else {
            hex_color(hex).unwrap_or(FALLBACK)
        }
    }

    /// Arrow heads share one neutral colour in light mode.
    pub fn marker_color(&self, hex: &str) -> Color32 {
        if self.is_light {
            hex_color(LIGHT_NEUTRAL).unwrap_or(FALLBACK)
        } else {
            hex_color(hex).unwrap_or(FALLBACK)
        }
    }
}

/// Mapped darker variant of a link colour, or the neutral grey for unmapped hues.
pub fn light_variant(hex: &str) -> &'static str {
    let hex = hex.trim();
    LIGHT_VARIANTS
        .iter()
        .find(|(original, _)| original.eq_ignore_ascii_case(hex))
        .map(|(_, darker)| *darker)
        .unwrap_or(LIGHT_NEUTRAL)
}
