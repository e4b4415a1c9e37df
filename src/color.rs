// src/color.rs
use serde::{Serialize, Serializer};

/// An opaque RGB color.
///
/// Palette entries are defined as compile-time constants; [`Color::from_hex`]
/// exists for callers that carry colors as `#RGB`/`#RRGGBB` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(value: u8) -> Self {
        Self { r: value, g: value, b: value }
    }

    /// Parse a hex color string (#RGB or #RRGGBB format).
    pub fn from_hex(s: &str) -> Result<Color, String> {
        let s = s.trim();
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| format!("Color must start with #, got: {}", s))?;

        match hex.len() {
            3 => {
                // #RGB format - expand each digit
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16)
                    .map_err(|e| format!("Invalid red component: {}", e))?;
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16)
                    .map_err(|e| format!("Invalid green component: {}", e))?;
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16)
                    .map_err(|e| format!("Invalid blue component: {}", e))?;
                Ok(Color { r, g, b })
            }
            6 => {
                // #RRGGBB format
                let r = u8::from_str_radix(&hex[0..2], 16)
                    .map_err(|e| format!("Invalid red component: {}", e))?;
                let g = u8::from_str_radix(&hex[2..4], 16)
                    .map_err(|e| format!("Invalid green component: {}", e))?;
                let b = u8::from_str_radix(&hex[4..6], 16)
                    .map_err(|e| format!("Invalid blue component: {}", e))?;
                Ok(Color { r, g, b })
            }
            _ => Err(format!(
                "Invalid hex color length: expected 3 or 6, got {}",
                hex.len()
            )),
        }
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Component scaled to the 0.0..=1.0 range PDF color operators expect.
    pub fn red_f(&self) -> f32 {
        f32::from(self.r) / 255.0
    }

    pub fn green_f(&self) -> f32 {
        f32::from(self.g) / 255.0
    }

    pub fn blue_f(&self) -> f32 {
        f32::from(self.b) / 255.0
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_hex() {
        let c = Color::from_hex("#2C3E50").unwrap();
        assert_eq!(c, Color::rgb(0x2C, 0x3E, 0x50));
    }

    #[test]
    fn parses_short_hex() {
        let c = Color::from_hex("#abc").unwrap();
        assert_eq!(c, Color::rgb(0xAA, 0xBB, 0xCC));
    }

    #[test]
    fn rejects_missing_hash() {
        assert!(Color::from_hex("2C3E50").is_err());
    }

    #[test]
    fn rejects_bad_length() {
        assert!(Color::from_hex("#12345").is_err());
    }

    #[test]
    fn hex_round_trip() {
        let c = Color::rgb(0xBD, 0xC3, 0xC7);
        assert_eq!(Color::from_hex(&c.hex()).unwrap(), c);
    }
}
