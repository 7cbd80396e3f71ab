use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 8-bit sRGB color, the form colors are edited and configured in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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

    /// Parse `#rrggbb` or `rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_array(rgb: [u8; 3]) -> Self {
        Self::rgb(rgb[0], rgb[1], rgb[2])
    }

    /// Linear-light components for shading
    pub fn to_linear(&self) -> [f32; 3] {
        [
            srgb_to_linear(self.r as f32 / 255.0),
            srgb_to_linear(self.g as f32 / 255.0),
            srgb_to_linear(self.b as f32 / 255.0),
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Color::from_hex(&hex)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color '{}'", hex)))
    }
}

pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_with_hash() {
        assert_eq!(Color::from_hex("#0066ff"), Some(Color::rgb(0x00, 0x66, 0xff)));
    }

    #[test]
    fn test_from_hex_without_hash() {
        assert_eq!(Color::from_hex("FF8000"), Some(Color::rgb(255, 128, 0)));
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#zzzzzz"), None);
        assert_eq!(Color::from_hex(""), None);
    }

    #[test]
    fn test_hex_round_trip_is_lowercase() {
        assert_eq!(Color::from_hex("#ABCDEF").map(|c| c.to_hex()), Some("#abcdef".to_string()));
    }

    #[test]
    fn test_linear_endpoints() {
        let white = Color::WHITE.to_linear();
        let black = Color::BLACK.to_linear();
        for c in white {
            assert!((c - 1.0).abs() < 0.001);
        }
        for c in black {
            assert!(c.abs() < 0.001);
        }
    }

    #[test]
    fn test_linear_midpoint_is_darker() {
        // sRGB 0.5 is roughly 0.214 in linear light
        let linear = srgb_to_linear(0.5);
        assert!((linear - 0.214).abs() < 0.01);
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Color::rgb(0, 102, 255)).unwrap();
        assert_eq!(json, "\"#0066ff\"");
        let parsed: Color = serde_json::from_str("\"#ffffff\"").unwrap();
        assert_eq!(parsed, Color::WHITE);
        assert!(serde_json::from_str::<Color>("\"blue\"").is_err());
    }
}
