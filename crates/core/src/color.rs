//! Color types and conversion functions for swatch.
//!
//! The canonical color is [`Rgb`], a 24-bit triple. [`Hsl`] and [`Cmyk`] are
//! derived views used for editing and display. All conversions are pure
//! functions; out-of-range numeric inputs are clamped rather than rejected.
//!
//! Two HSL paths exist. [`Rgb::to_hsl`] keeps full `f64` precision and
//! round-trips through [`Rgb::from_hsl`] exactly. [`hex_to_hsl`] rounds to
//! integer degrees and percents for display and for the harmony formulas.

use crate::error::SwatchError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 24-bit sRGB color.
///
/// Serializes as a lowercase hex string `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Hue in [0, 360), saturation and lightness in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Cyan, magenta, yellow and key as percentages in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cmyk {
    pub c: f64,
    pub m: f64,
    pub y: f64,
    pub k: f64,
}

/// Textual form used when rendering a color for display or copying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorFormat {
    #[default]
    Hex,
    Rgb,
    Hsl,
    Cmyk,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `"#rgb"`, `"rgb"`, `"#rrggbb"` or `"rrggbb"` (case insensitive).
    ///
    /// The 3-digit form duplicates each nibble, so `"#f0a"` is `"#ff00aa"`.
    /// Returns `SwatchError::InvalidColorFormat` for any other length or for
    /// non-hex characters.
    pub fn from_hex(hex: &str) -> Result<Rgb, SwatchError> {
        let trimmed = hex.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SwatchError::InvalidColorFormat(format!(
                "'{hex}' contains non-hex characters"
            )));
        }
        match digits.len() {
            3 => Ok(Rgb {
                r: parse_channel(&digits[0..1], hex)? * 17,
                g: parse_channel(&digits[1..2], hex)? * 17,
                b: parse_channel(&digits[2..3], hex)? * 17,
            }),
            6 => Ok(Rgb {
                r: parse_channel(&digits[0..2], hex)?,
                g: parse_channel(&digits[2..4], hex)?,
                b: parse_channel(&digits[4..6], hex)?,
            }),
            n => Err(SwatchError::InvalidColorFormat(format!(
                "'{hex}': expected 3 or 6 hex digits, got {n}"
            ))),
        }
    }

    /// Converts the color to a hex string like `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Converts to HSL without rounding.
    pub fn to_hsl(self) -> Hsl {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let d = max - min;

        if d == 0.0 {
            return Hsl {
                h: 0.0,
                s: 0.0,
                l: l * 100.0,
            };
        }

        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsl {
            h: (h * 60.0).rem_euclid(360.0),
            s: s * 100.0,
            l: l * 100.0,
        }
    }

    /// Converts from HSL. Hue wraps modulo 360; saturation and lightness are
    /// clamped to [0, 100].
    pub fn from_hsl(hsl: Hsl) -> Rgb {
        let h = if hsl.h.is_finite() {
            hsl.h.rem_euclid(360.0)
        } else {
            0.0
        };
        let s = clamp_percent(hsl.s) / 100.0;
        let l = clamp_percent(hsl.l) / 100.0;

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let hp = h / 60.0;
        let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
        let (r1, g1, b1) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;

        Rgb {
            r: unit_to_channel(r1 + m),
            g: unit_to_channel(g1 + m),
            b: unit_to_channel(b1 + m),
        }
    }

    /// Converts to CMYK with percentages rounded to integers.
    ///
    /// Pure black yields `(0, 0, 0, 100)` rather than dividing by zero.
    pub fn to_cmyk(self) -> Cmyk {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;
        let k = 1.0 - r.max(g).max(b);

        if k >= 1.0 {
            return Cmyk {
                c: 0.0,
                m: 0.0,
                y: 0.0,
                k: 100.0,
            };
        }

        Cmyk {
            c: ((1.0 - r - k) / (1.0 - k) * 100.0).round(),
            m: ((1.0 - g - k) / (1.0 - k) * 100.0).round(),
            y: ((1.0 - b - k) / (1.0 - k) * 100.0).round(),
            k: (k * 100.0).round(),
        }
    }

    /// Converts from CMYK percentages, each clamped to [0, 100].
    pub fn from_cmyk(cmyk: Cmyk) -> Rgb {
        let k = 1.0 - clamp_percent(cmyk.k) / 100.0;
        let channel = |v: f64| unit_to_channel((1.0 - clamp_percent(v) / 100.0) * k);
        Rgb {
            r: channel(cmyk.c),
            g: channel(cmyk.m),
            b: channel(cmyk.y),
        }
    }

    /// Renders the color in the given textual form.
    pub fn format(self, format: ColorFormat) -> String {
        match format {
            ColorFormat::Hex => self.to_hex(),
            ColorFormat::Rgb => format!("rgb({}, {}, {})", self.r, self.g, self.b),
            ColorFormat::Hsl => {
                let hsl = self.to_hsl().rounded();
                format!(
                    "hsl({}, {}%, {}%)",
                    hsl.h as i64, hsl.s as i64, hsl.l as i64
                )
            }
            ColorFormat::Cmyk => {
                let cmyk = self.to_cmyk();
                format!(
                    "cmyk({}%, {}%, {}%, {}%)",
                    cmyk.c as i64, cmyk.m as i64, cmyk.y as i64, cmyk.k as i64
                )
            }
        }
    }
}

impl Hsl {
    /// Rounds hue to an integer degree in [0, 359] and saturation/lightness
    /// to integer percents in [0, 100].
    pub fn rounded(self) -> Hsl {
        Hsl {
            h: self.h.round().rem_euclid(360.0),
            s: clamp_percent(self.s).round(),
            l: clamp_percent(self.l).round(),
        }
    }

    /// Returns a copy with hue rotated by `degrees`, normalized to [0, 360).
    pub fn rotate(self, degrees: f64) -> Hsl {
        Hsl {
            h: (self.h + degrees).rem_euclid(360.0),
            ..self
        }
    }

    /// Returns a copy with saturation and lightness shifted by the given
    /// amounts and clamped to [0, 100].
    pub fn shift(self, ds: f64, dl: f64) -> Hsl {
        Hsl {
            h: self.h,
            s: clamp_percent(self.s + ds),
            l: clamp_percent(self.l + dl),
        }
    }
}

impl ColorFormat {
    pub const ALL: [ColorFormat; 4] = [
        ColorFormat::Hex,
        ColorFormat::Rgb,
        ColorFormat::Hsl,
        ColorFormat::Cmyk,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ColorFormat::Hex => "hex",
            ColorFormat::Rgb => "rgb",
            ColorFormat::Hsl => "hsl",
            ColorFormat::Cmyk => "cmyk",
        }
    }

    /// Parses a format name, falling back to hex for anything unrecognized.
    pub fn parse_lenient(name: &str) -> ColorFormat {
        name.parse().unwrap_or_default()
    }
}

impl FromStr for ColorFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hex" => Ok(ColorFormat::Hex),
            "rgb" => Ok(ColorFormat::Rgb),
            "hsl" => Ok(ColorFormat::Hsl),
            "cmyk" => Ok(ColorFormat::Cmyk),
            other => Err(format!(
                "unknown color format '{other}' (expected hex, rgb, hsl or cmyk)"
            )),
        }
    }
}

impl fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = SwatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

fn parse_channel(digits: &str, original: &str) -> Result<u8, SwatchError> {
    u8::from_str_radix(digits, 16)
        .map_err(|e| SwatchError::InvalidColorFormat(format!("'{original}': {e}")))
}

fn clamp_percent(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 100.0)
    }
}

fn unit_to_channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

// -- String-level codec --

/// Parses a hex color string into RGB.
pub fn hex_to_rgb(hex: &str) -> Result<Rgb, SwatchError> {
    Rgb::from_hex(hex)
}

/// Encodes integer channels as `"#rrggbb"`, clamping each to [0, 255].
pub fn rgb_to_hex(r: i32, g: i32, b: i32) -> String {
    let clamp = |v: i32| v.clamp(0, 255) as u8;
    Rgb::new(clamp(r), clamp(g), clamp(b)).to_hex()
}

/// Parses a hex color and returns its HSL with integer-rounded components.
pub fn hex_to_hsl(hex: &str) -> Result<Hsl, SwatchError> {
    Ok(Rgb::from_hex(hex)?.to_hsl().rounded())
}

/// Encodes an HSL triple as `"#rrggbb"`.
pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    Rgb::from_hsl(Hsl { h, s, l }).to_hex()
}

/// Parses a hex color and returns its CMYK percentages.
pub fn hex_to_cmyk(hex: &str) -> Result<Cmyk, SwatchError> {
    Ok(Rgb::from_hex(hex)?.to_cmyk())
}

/// Renders `hex` as `hex`, `rgb`, `hsl` or `cmyk` text.
///
/// Unknown format names fall back to hex. Fails only if `hex` itself is malformed.
pub fn format_color_value(hex: &str, format: &str) -> Result<String, SwatchError> {
    Ok(Rgb::from_hex(hex)?.format(ColorFormat::parse_lenient(format)))
}
