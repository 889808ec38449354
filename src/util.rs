use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use eframe::egui::Color32;

/// Deterministic pair in `[-1, 1]` derived from an id, used to jitter initial positions.
pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

/// Parses `#rrggbb` (or `rrggbb`) into an opaque colour.
pub fn hex_color(hex: &str) -> Option<Color32> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some(Color32::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use eframe::egui::Color32;

    use super::{hex_color, stable_pair};

    #[test]
    fn stable_pair_is_repeatable_and_bounded() {
        let first = stable_pair("stable-diffusion");
        assert_eq!(first, stable_pair("stable-diffusion"));
        assert!((-1.0..=1.0).contains(&first.0));
        assert!((-1.0..=1.0).contains(&first.1));
        assert_ne!(first, stable_pair("dall-e"));
    }

    #[test]
    fn hex_colors_parse_with_or_without_hash() {
        assert_eq!(hex_color("#3b82f6"), Some(Color32::from_rgb(0x3b, 0x82, 0xf6)));
        assert_eq!(hex_color("0F172A"), Some(Color32::from_rgb(0x0f, 0x17, 0x2a)));
        assert_eq!(hex_color("#fff"), None);
        assert_eq!(hex_color("#zzzzzz"), None);
    }
}
