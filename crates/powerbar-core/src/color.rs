//! Color representation and parsing.
//!
//! Colors are accepted as SVG names (`"red"`, `"gray"`) or as hex strings in
//! `#RRGGBB` / `#AARRGGBB` form. The eight-digit form puts alpha first, so
//! `#4400B0EE` is a translucent cyan.

use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// RGBA color with values in the range [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component [0.0, 1.0]
    pub r: f32,
    /// Green component [0.0, 1.0]
    pub g: f32,
    /// Blue component [0.0, 1.0]
    pub b: f32,
    /// Alpha component [0.0, 1.0]
    pub a: f32,
}

static NAMED_COLORS: phf::Map<&'static str, u32> = phf_map! {
    "black" => 0x00_0000,
    "white" => 0xff_ffff,
    "red" => 0xff_0000,
    "green" => 0x00_8000,
    "lime" => 0x00_ff00,
    "blue" => 0x00_00ff,
    "yellow" => 0xff_ff00,
    "cyan" => 0x00_ffff,
    "magenta" => 0xff_00ff,
    "orange" => 0xff_a500,
    "purple" => 0x80_0080,
    "gray" => 0x80_8080,
    "grey" => 0x80_8080,
    "darkgray" => 0xa9_a9a9,
    "darkgrey" => 0xa9_a9a9,
    "lightgray" => 0xd3_d3d3,
    "lightgrey" => 0xd3_d3d3,
    "silver" => 0xc0_c0c0,
    "navy" => 0x00_0080,
    "teal" => 0x00_8080,
    "olive" => 0x80_8000,
    "maroon" => 0x80_0000,
};

impl Color {
    /// Create a new color, clamping values to [0.0, 1.0].
    #[must_use]
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Create an opaque color from RGB values.
    #[must_use]
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Create a color from 8-bit channels.
    #[must_use]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    const fn from_rgb_u32(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as f32 / 255.0,
            g: ((rgb >> 8) & 0xff) as f32 / 255.0,
            b: (rgb & 0xff) as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Parse a hex color string (`#RRGGBB` or `#AARRGGBB`, `#` optional).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid hex color.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidHex(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ColorParseError::InvalidHex(hex.to_string()))
        };

        match digits.len() {
            6 => Ok(Self::from_rgba8(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Ok(Self::from_rgba8(
                channel(2)?,
                channel(4)?,
                channel(6)?,
                channel(0)?,
            )),
            len => Err(ColorParseError::InvalidLength(len)),
        }
    }

    /// Look up an SVG color name (case-insensitive).
    #[must_use]
    pub fn named(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("transparent") {
            return Some(Self::TRANSPARENT);
        }
        NAMED_COLORS
            .get(name.to_ascii_lowercase().as_str())
            .map(|&rgb| Self::from_rgb_u32(rgb))
    }

    /// Parse either a color name or a hex string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is neither a known name nor valid hex.
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let trimmed = input.trim();
        if trimmed.starts_with('#') {
            return Self::from_hex(trimmed);
        }
        Self::named(trimmed).ok_or_else(|| ColorParseError::UnknownName(trimmed.to_string()))
    }

    /// Convert to hex string (RGB only).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            Self::to_byte(self.r),
            Self::to_byte(self.g),
            Self::to_byte(self.b)
        )
    }

    /// Convert to `#aarrggbb` hex string.
    #[must_use]
    pub fn to_hex_with_alpha(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            Self::to_byte(self.a),
            Self::to_byte(self.r),
            Self::to_byte(self.g),
            Self::to_byte(self.b)
        )
    }

    /// Return the same color with a different alpha.
    #[must_use]
    pub fn with_alpha(&self, alpha: f32) -> Self {
        Self::new(self.r, self.g, self.b, alpha)
    }

    /// Brighten the color by scaling its HSV value by `factor`.
    ///
    /// When the scaled value saturates, the excess is taken out of the
    /// saturation instead, so fully bright colors move toward white.
    #[must_use]
    pub fn lighter(&self, factor: f32) -> Self {
        let (h, mut s, v) = self.to_hsv();
        let mut v = v * factor;
        if v > 1.0 {
            s = (s - (v - 1.0)).max(0.0);
            v = 1.0;
        }
        let (r, g, b) = Self::hsv_to_rgb(h, s, v);
        Self::new(r, g, b, self.a)
    }

    fn to_hsv(self) -> (f32, f32, f32) {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let delta = max - min;

        let hue = if delta == 0.0 {
            0.0
        } else if max == self.r {
            60.0 * ((self.g - self.b) / delta).rem_euclid(6.0)
        } else if max == self.g {
            60.0 * ((self.b - self.r) / delta + 2.0)
        } else {
            60.0 * ((self.r - self.g) / delta + 4.0)
        };
        let saturation = if max == 0.0 { 0.0 } else { delta / max };
        (hue, saturation, max)
    }

    fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
        let c = v * s;
        let sector = h / 60.0;
        let x = c * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
        let (r, g, b) = match sector as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = v - c;
        (r + m, g + m, b + m)
    }

    fn to_byte(channel: f32) -> u8 {
        (channel * 255.0).round() as u8
    }

    // Common colors
    /// Black color
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    /// White color
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    /// Pure red
    pub const RED: Self = Self {
        r: 1.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    /// Toolkit gray (`#a0a0a4`), the default switch track color
    pub const GRAY: Self = Self::from_rgb_u32(0xa0_a0a4);
    /// Toolkit light gray (`#c0c0c0`), the unchecked handle outline
    pub const LIGHT_GRAY: Self = Self::from_rgb_u32(0xc0_c0c0);
    /// Transparent color
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_with_alpha())
    }
}

/// Error type for color parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// Invalid hex characters
    #[error("invalid hex characters in {0:?}")]
    InvalidHex(String),
    /// Invalid digit count
    #[error("invalid hex string length {0} (expected 6 or 8)")]
    InvalidLength(usize),
    /// Not a known color name
    #[error("unknown color name {0:?}")]
    UnknownName(String),
}
