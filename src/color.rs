//! Hex colours as used by the debug panel and the materials.
//!
//! Colours are authored as sRGB hex strings (`#8006ff`). Uniforms and the clear
//! colour need linear values because the surface is an sRGB target that
//! re-encodes on write.

use std::{fmt, str::FromStr};

use anyhow::{Context as _, bail};

/// An opaque sRGB colour with 8 bits per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub srgb: [u8; 3],
}

impl Color {
    pub const fn from_srgb(r: u8, g: u8, b: u8) -> Self {
        Self { srgb: [r, g, b] }
    }

    /// Parse a `#rrggbb` string.
    pub fn from_hex(hex: &str) -> anyhow::Result<Self> {
        let Some(digits) = hex.strip_prefix('#') else {
            bail!("colour {hex:?} must start with '#'");
        };
        if digits.len() != 6 || !digits.is_ascii() {
            bail!("colour {hex:?} must have exactly six hex digits");
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .with_context(|| format!("colour {hex:?} has an invalid hex digit"))
        };
        Ok(Self::from_srgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.srgb;
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Linear channel values in `[0, 1]`.
    pub fn to_linear(&self) -> [f32; 3] {
        self.srgb.map(|c| srgb_to_linear(c as f32 / 255.0))
    }

    /// Linear clear colour for a render pass.
    pub fn to_wgpu(&self) -> wgpu::Color {
        let [r, g, b] = self.to_linear();
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        }
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
