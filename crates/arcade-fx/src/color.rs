//! RGBA colors for every drawing operation, parseable from CSS-style hex strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Linear RGBA color, components in [0, 1].
///
/// Serialized as a `#rrggbbaa` hex string so configs can be written by hand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba8(r, g, b, 255)
    }

    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Build from hue (degrees), saturation and lightness in [0, 1].
    pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = lightness - c / 2.0;
        Self::rgb(r + m, g + m, b + m)
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Multiply the current alpha by `factor`.
    pub fn fade(self, factor: f32) -> Self {
        Self { a: self.a * factor, ..self }
    }

    pub fn lerp(self, other: Color, t: f32) -> Self {
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    pub fn to_hex(self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            byte(self.r),
            byte(self.g),
            byte(self.b),
            byte(self.a)
        )
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);
    pub const CYAN: Self = Self::rgb(0.0, 1.0, 1.0);
    pub const MAGENTA: Self = Self::rgb(1.0, 0.0, 1.0);
    pub const ORANGE: Self = Self::rgb(1.0, 0.4, 0.0);
    pub const GOLD: Self = Self::rgb(1.0, 0.843, 0.0);
    pub const MINT: Self = Self::rgb(0.0, 1.0, 0.533);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Error returned when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    MissingHash,
    BadLength(usize),
    BadDigit(char),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHash => write!(f, "color must start with '#'"),
            Self::BadLength(n) => write!(f, "expected 3, 6 or 8 hex digits, got {}", n),
            Self::BadDigit(c) => write!(f, "invalid hex digit {:?}", c),
        }
    }
}

impl std::error::Error for ColorParseError {}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().strip_prefix('#').ok_or(ColorParseError::MissingHash)?;
        let mut nibbles = Vec::with_capacity(8);
        for c in digits.chars() {
            let v = c.to_digit(16).ok_or(ColorParseError::BadDigit(c))?;
            nibbles.push(v as u8);
        }
        let pair = |i: usize| nibbles[i] * 16 + nibbles[i + 1];
        match nibbles.len() {
            3 => Ok(Self::rgb8(nibbles[0] * 17, nibbles[1] * 17, nibbles[2] * 17)),
            6 => Ok(Self::rgb8(pair(0), pair(2), pair(4))),
            8 => Ok(Self::rgba8(pair(0), pair(2), pair(4), pair(6))),
            n => Err(ColorParseError::BadLength(n)),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn parses_six_digit_hex() {
        let c: Color = "#ff8000".parse().unwrap();
        assert!(close(c.r, 1.0) && close(c.g, 0.5) && close(c.b, 0.0));
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn parses_short_and_alpha_forms() {
        let short: Color = "#0f0".parse().unwrap();
        assert!(close(short.g, 1.0));
        let alpha: Color = "#ffffff80".parse().unwrap();
        assert!(close(alpha.a, 0.5));
    }

    #[test]
    fn rejects_malformed_strings() {
        assert_eq!("ff0000".parse::<Color>(), Err(ColorParseError::MissingHash));
        assert_eq!("#ff00".parse::<Color>(), Err(ColorParseError::BadLength(4)));
        assert_eq!("#gg0000".parse::<Color>(), Err(ColorParseError::BadDigit('g')));
    }

    #[test]
    fn hex_round_trips_through_serde() {
        let json = serde_json::to_string(&Color::CYAN).unwrap();
        assert_eq!(json, "\"#00ffffff\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::CYAN);
    }

    #[test]
    fn hsl_primaries() {
        let red = Color::hsl(0.0, 1.0, 0.5);
        assert!(close(red.r, 1.0) && close(red.g, 0.0));
        let blue = Color::hsl(240.0, 1.0, 0.5);
        assert!(close(blue.b, 1.0) && close(blue.r, 0.0));
    }
}
