//! WCAG 2.0 luminance, contrast ratio and tier classification, plus
//! lightness adjustments used when a color fails its target tier.

use crate::color::Rgb;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum ratio for AAA normal text.
pub const AAA_RATIO: f64 = 7.0;
/// Minimum ratio for AA normal text (and AAA large text).
pub const AA_RATIO: f64 = 4.5;
/// Minimum ratio for AA large text.
pub const AA_LARGE_RATIO: f64 = 3.0;

/// WCAG accessibility tier for a contrast ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WcagTier {
    Aaa,
    Aa,
    AaLarge,
    Fail,
}

/// Background a foreground color reads best against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    White,
    Black,
}

/// Result of [`best_background`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackgroundChoice {
    pub choice: Background,
    pub ratio: f64,
    pub tier: WcagTier,
}

/// Full pass/fail breakdown for a foreground/background pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContrastReport {
    pub foreground: Rgb,
    pub background: Rgb,
    pub ratio: f64,
    pub tier: WcagTier,
    pub aa_normal: bool,
    pub aa_large: bool,
    pub aaa_normal: bool,
    pub aaa_large: bool,
}

impl WcagTier {
    pub fn label(self) -> &'static str {
        match self {
            WcagTier::Aaa => "AAA",
            WcagTier::Aa => "AA",
            WcagTier::AaLarge => "AA Large",
            WcagTier::Fail => "Fail",
        }
    }
}

impl fmt::Display for WcagTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Background {
    pub fn color(self) -> Rgb {
        match self {
            Background::White => Rgb::WHITE,
            Background::Black => Rgb::BLACK,
        }
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Background::White => f.write_str("white"),
            Background::Black => f.write_str("black"),
        }
    }
}

impl ContrastReport {
    pub fn new(foreground: Rgb, background: Rgb) -> Self {
        let ratio = contrast_ratio(foreground, background);
        Self {
            foreground,
            background,
            ratio,
            tier: classify(ratio),
            aa_normal: ratio >= AA_RATIO,
            aa_large: ratio >= AA_LARGE_RATIO,
            aaa_normal: ratio >= AAA_RATIO,
            aaa_large: ratio >= AA_RATIO,
        }
    }
}

/// Linearizes one 8-bit sRGB channel using the WCAG 2.0 piecewise curve.
fn linearize(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance in [0, 1].
pub fn relative_luminance(color: Rgb) -> f64 {
    0.2126 * linearize(color.r) + 0.7152 * linearize(color.g) + 0.0722 * linearize(color.b)
}

/// Contrast ratio in [1, 21]; symmetric in its arguments.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Maps a contrast ratio to the highest WCAG tier it reaches (7, 4.5, 3).
pub fn classify(ratio: f64) -> WcagTier {
    if ratio >= AAA_RATIO {
        WcagTier::Aaa
    } else if ratio >= AA_RATIO {
        WcagTier::Aa
    } else if ratio >= AA_LARGE_RATIO {
        WcagTier::AaLarge
    } else {
        WcagTier::Fail
    }
}

/// Picks white or black, whichever contrasts more with `color`. Ties go to white.
pub fn best_background(color: Rgb) -> BackgroundChoice {
    let on_white = contrast_ratio(color, Rgb::WHITE);
    let on_black = contrast_ratio(color, Rgb::BLACK);
    let (choice, ratio) = if on_white >= on_black {
        (Background::White, on_white)
    } else {
        (Background::Black, on_black)
    };
    BackgroundChoice {
        choice,
        ratio,
        tier: classify(ratio),
    }
}

/// Raises lightness by `amount * 100` points, clamped to [0, 100].
///
/// `amount` is clamped to [0, 1] first; NaN counts as zero.
pub fn lighten(color: Rgb, amount: f64) -> Rgb {
    let delta = clamp_unit(amount) * 100.0;
    Rgb::from_hsl(color.to_hsl().shift(0.0, delta))
}

/// Lowers lightness by `amount * 100` points, clamped to [0, 100].
pub fn darken(color: Rgb, amount: f64) -> Rgb {
    let delta = clamp_unit(amount) * 100.0;
    Rgb::from_hsl(color.to_hsl().shift(0.0, -delta))
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
