//! sRGB colors parsed from CSS-style strings.
//!
//! The UI side of the viewer hands colors over as strings (`"#00f3ff"`,
//! `"rgb(255, 0, 85)"`, `"white"`), so everything that consumes a color goes
//! through [`Rgb`].
//!
//! ```ignore
//! let cyan: Rgb = "#00f3ff".parse()?;
//! assert_eq!(cyan, Rgb::new(0, 243, 255));
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::ColorError;

/// An 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Preset swatches offered by the color hotkey, in cycling order.
pub const PRESET_COLORS: [Rgb; 6] = [
    Rgb::new(0x00, 0xf3, 0xff), // Cyan
    Rgb::new(0xff, 0x00, 0x55), // Magenta
    Rgb::new(0xff, 0xcc, 0x00), // Gold
    Rgb::new(0x55, 0xff, 0x00), // Lime
    Rgb::new(0xff, 0xff, 0xff), // White
    Rgb::new(0xaa, 0x00, 0xff), // Violet
];

const NAMED_COLORS: &[(&str, Rgb)] = &[
    ("black", Rgb::BLACK),
    ("white", Rgb::WHITE),
    ("red", Rgb::new(255, 0, 0)),
    ("lime", Rgb::new(0, 255, 0)),
    ("green", Rgb::new(0, 128, 0)),
    ("blue", Rgb::new(0, 0, 255)),
    ("cyan", Rgb::new(0, 255, 255)),
    ("aqua", Rgb::new(0, 255, 255)),
    ("magenta", Rgb::new(255, 0, 255)),
    ("fuchsia", Rgb::new(255, 0, 255)),
    ("yellow", Rgb::new(255, 255, 0)),
    ("gold", Rgb::new(255, 215, 0)),
    ("orange", Rgb::new(255, 165, 0)),
    ("pink", Rgb::new(255, 192, 203)),
    ("violet", Rgb::new(238, 130, 238)),
    ("purple", Rgb::new(128, 0, 128)),
];

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    /// Create a color from its 8-bit channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a packed `0xRRGGBB` value.
    pub const fn from_hex(hex: u32) -> Self {
        Self::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Channels as `[0, 1]` floats, still sRGB encoded.
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Channels converted to linear light, for clear colors and uniforms
    /// written to an sRGB render target.
    pub fn to_linear(self) -> [f32; 3] {
        let [r, g, b] = self.to_f32();
        [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b)]
    }

    /// The next preset after this color, wrapping around.
    ///
    /// Colors that are not presets cycle to the first preset.
    pub fn next_preset(self) -> Rgb {
        match PRESET_COLORS.iter().position(|c| *c == self) {
            Some(i) => PRESET_COLORS[(i + 1) % PRESET_COLORS.len()],
            None => PRESET_COLORS[0],
        }
    }

    /// The preset before this color, wrapping around.
    pub fn previous_preset(self) -> Rgb {
        match PRESET_COLORS.iter().position(|c| *c == self) {
            Some(0) | None => PRESET_COLORS[PRESET_COLORS.len() - 1],
            Some(i) => PRESET_COLORS[i - 1],
        }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        PRESET_COLORS[0]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ColorError::Empty);
        }

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| {
                if hex.len() == 3 || hex.len() == 6 {
                    ColorError::HexDigit(s.to_string())
                } else {
                    ColorError::HexLength(s.to_string())
                }
            });
        }

        let lower = s.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_functional(args).ok_or_else(|| ColorError::Functional(s.to_string()));
        }

        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, color)| *color)
            .ok_or_else(|| ColorError::UnknownName(s.to_string()))
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
            Some(Rgb::new(digit(0)?, digit(1)?, digit(2)?))
        }
        6 => u32::from_str_radix(hex, 16).ok().map(Rgb::from_hex),
        _ => None,
    }
}

fn parse_functional(args: &str) -> Option<Rgb> {
    let mut channels = args.split(',').map(|part| part.trim().parse::<u8>());
    let r = channels.next()?.ok()?;
    let g = channels.next()?.ok()?;
    let b = channels.next()?.ok()?;
    if channels.next().is_some() {
        return None;
    }
    Some(Rgb::new(r, g, b))
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
