// src/scheme.rs

//! Color scheme catalog.
//!
//! Every scheme is a fixed seven-slot palette. Documents borrow one palette
//! for their whole lifetime; there is no mutable styling state shared between
//! documents.

use crate::color::Color;
use crate::error::GeneratorError;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;

/// The seven role-based colors every rendered element draws from.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ColorPalette {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub highlight: Color,
    pub background: Color,
    pub text: Color,
    pub border: Color,
}

impl ColorPalette {
    /// The four-color rotation used for chart series.
    pub fn series(&self) -> [Color; 4] {
        [self.primary, self.secondary, self.accent, self.highlight]
    }
}

const fn palette(
    primary: Color,
    secondary: Color,
    accent: Color,
    highlight: Color,
    background: Color,
    text: Color,
    border: Color,
) -> ColorPalette {
    ColorPalette { primary, secondary, accent, highlight, background, text, border }
}

static SCHEMES: Lazy<BTreeMap<&'static str, ColorPalette>> = Lazy::new(|| {
    BTreeMap::from([
        (
            "professional",
            palette(
                Color::rgb(0x2C, 0x3E, 0x50),
                Color::rgb(0x34, 0x49, 0x5E),
                Color::rgb(0x34, 0x98, 0xDB),
                Color::rgb(0xEC, 0xF0, 0xF1),
                Color::WHITE,
                Color::rgb(0x2C, 0x3E, 0x50),
                Color::rgb(0xBD, 0xC3, 0xC7),
            ),
        ),
        (
            "modern",
            palette(
                Color::rgb(0x34, 0x49, 0x5E),
                Color::rgb(0x5D, 0x6D, 0x7E),
                Color::rgb(0x85, 0x92, 0x9E),
                Color::rgb(0xF8, 0xF9, 0xF9),
                Color::WHITE,
                Color::rgb(0x2C, 0x3E, 0x50),
                Color::rgb(0xD5, 0xDB, 0xDB),
            ),
        ),
        (
            "classic",
            palette(
                Color::rgb(0x2E, 0x40, 0x53),
                Color::rgb(0x56, 0x65, 0x73),
                Color::rgb(0x7F, 0x8C, 0x8D),
                Color::rgb(0xF4, 0xF6, 0xF6),
                Color::WHITE,
                Color::rgb(0x2C, 0x3E, 0x50),
                Color::rgb(0xBD, 0xC3, 0xC7),
            ),
        ),
        (
            "elegant",
            palette(
                Color::rgb(0x4A, 0x55, 0x68),
                Color::rgb(0x71, 0x80, 0x96),
                Color::rgb(0xA0, 0xAE, 0xC0),
                Color::rgb(0xF7, 0xFA, 0xFC),
                Color::WHITE,
                Color::rgb(0x2D, 0x37, 0x48),
                Color::rgb(0xE2, 0xE8, 0xF0),
            ),
        ),
        (
            "tech_blue",
            palette(
                Color::rgb(0x00, 0xD4, 0xFF),
                Color::rgb(0x00, 0x99, 0xCC),
                Color::rgb(0x66, 0xE6, 0xFF),
                Color::rgb(0xE6, 0xF9, 0xFF),
                Color::WHITE,
                Color::rgb(0x00, 0x33, 0x66),
                Color::rgb(0xB3, 0xE6, 0xFF),
            ),
        ),
        (
            "cyber_purple",
            palette(
                Color::rgb(0x7C, 0x3A, 0xED),
                Color::rgb(0x5B, 0x21, 0xB6),
                Color::rgb(0xA8, 0x55, 0xF7),
                Color::rgb(0xF3, 0xE8, 0xFF),
                Color::WHITE,
                Color::rgb(0x2E, 0x10, 0x65),
                Color::rgb(0xC4, 0xB5, 0xFD),
            ),
        ),
        (
            "neon_green",
            palette(
                Color::rgb(0x10, 0xB9, 0x81),
                Color::rgb(0x05, 0x96, 0x69),
                Color::rgb(0x34, 0xD3, 0x99),
                Color::rgb(0xEC, 0xFD, 0xF5),
                Color::WHITE,
                Color::rgb(0x06, 0x4E, 0x3B),
                Color::rgb(0x6E, 0xE7, 0xB7),
            ),
        ),
        (
            "sunset_orange",
            palette(
                Color::rgb(0xF5, 0x9E, 0x0B),
                Color::rgb(0xD9, 0x77, 0x06),
                Color::rgb(0xFB, 0xBF, 0x24),
                Color::rgb(0xFF, 0xFB, 0xEB),
                Color::WHITE,
                Color::rgb(0x78, 0x35, 0x0F),
                Color::rgb(0xFC, 0xD3, 0x4D),
            ),
        ),
        (
            "ocean_teal",
            palette(
                Color::rgb(0x14, 0xB8, 0xA6),
                Color::rgb(0x0D, 0x94, 0x88),
                Color::rgb(0x5E, 0xEA, 0xD4),
                Color::rgb(0xF0, 0xFD, 0xFA),
                Color::WHITE,
                Color::rgb(0x13, 0x4E, 0x4A),
                Color::rgb(0x99, 0xF6, 0xE4),
            ),
        ),
        (
            "midnight_black",
            palette(
                Color::rgb(0x1F, 0x29, 0x37),
                Color::rgb(0x37, 0x41, 0x51),
                Color::rgb(0x6B, 0x72, 0x80),
                Color::rgb(0xF9, 0xFA, 0xFB),
                Color::WHITE,
                Color::rgb(0x11, 0x18, 0x27),
                Color::rgb(0xD1, 0xD5, 0xDB),
            ),
        ),
    ])
});

/// Look up a palette by scheme name.
pub fn resolve_scheme(name: &str) -> Result<&'static ColorPalette, GeneratorError> {
    SCHEMES
        .get(name)
        .ok_or_else(|| GeneratorError::UnknownColorScheme(name.to_string()))
}

pub fn scheme_names() -> Vec<&'static str> {
    SCHEMES.keys().copied().collect()
}

/// All schemes with their palette colors, for the presentation layer.
pub fn scheme_summaries() -> BTreeMap<&'static str, &'static ColorPalette> {
    SCHEMES.iter().map(|(name, palette)| (*name, palette)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_ten_schemes() {
        assert_eq!(scheme_names().len(), 10);
    }

    #[test]
    fn resolves_known_scheme() {
        let palette = resolve_scheme("professional").unwrap();
        assert_eq!(palette.primary.hex(), "#2c3e50");
        assert_eq!(palette.background, Color::WHITE);
    }

    #[test]
    fn unknown_scheme_is_an_error() {
        let err = resolve_scheme("nonexistent").unwrap_err();
        assert!(matches!(err, GeneratorError::UnknownColorScheme(name) if name == "nonexistent"));
    }

    #[test]
    fn series_rotation_order() {
        let palette = resolve_scheme("tech_blue").unwrap();
        let series = palette.series();
        assert_eq!(series[0], palette.primary);
        assert_eq!(series[3], palette.highlight);
    }

    #[test]
    fn summaries_serialize_as_hex() {
        let json = serde_json::to_value(scheme_summaries()).unwrap();
        assert_eq!(json["professional"]["accent"], "#3498db");
    }
}
