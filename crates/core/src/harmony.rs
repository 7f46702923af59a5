//! Harmony palettes derived from a single base color.
//!
//! All arithmetic happens on the integer-rounded HSL of the base (the same
//! values [`hex_to_hsl`](crate::color::hex_to_hsl) reports), with hue wrapped
//! modulo 360 and saturation/lightness clamped to [0, 100]. Generation is
//! deterministic: the same base and kind always yield the same colors.

use crate::color::{Hsl, Rgb};
use crate::error::SwatchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Saturation/lightness shift of a "softened" variant.
const SOFTEN: (f64, f64) = (-25.0, 15.0);
/// Saturation/lightness shift of a "deepened" variant.
const DEEPEN: (f64, f64) = (5.0, -30.0);
/// Hue offsets of the analogous spread, base in the middle.
const ANALOGOUS_OFFSETS: [f64; 5] = [-40.0, -20.0, 0.0, 20.0, 40.0];
/// Lightness offsets of the monochromatic variants after the base.
const MONO_LIGHTNESS: [f64; 4] = [-40.0, -20.0, 20.0, 40.0];
/// Saturation drop applied to the lightest monochromatic variant.
const MONO_LIGHTEST_DESATURATE: f64 = -30.0;

/// Named rule for deriving related colors from one base hue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HarmonyKind {
    Complementary,
    Analogous,
    Triadic,
    Tetradic,
    Monochromatic,
}

/// Colors derived from `base` by `kind`. Not persisted until applied to a palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonyPalette {
    pub kind: HarmonyKind,
    pub base: Rgb,
    pub colors: Vec<Rgb>,
}

impl HarmonyKind {
    pub const ALL: [HarmonyKind; 5] = [
        HarmonyKind::Complementary,
        HarmonyKind::Analogous,
        HarmonyKind::Triadic,
        HarmonyKind::Tetradic,
        HarmonyKind::Monochromatic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HarmonyKind::Complementary => "complementary",
            HarmonyKind::Analogous => "analogous",
            HarmonyKind::Triadic => "triadic",
            HarmonyKind::Tetradic => "tetradic",
            HarmonyKind::Monochromatic => "monochromatic",
        }
    }

    /// Returns all kind names, for help text and `list` output.
    pub fn list_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|k| k.as_str()).collect()
    }
}

impl FromStr for HarmonyKind {
    type Err = SwatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| SwatchError::UnknownHarmony(s.to_string()))
    }
}

impl fmt::Display for HarmonyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl HarmonyPalette {
    /// Derives the harmony for `kind` around `base`.
    pub fn generate(base: Rgb, kind: HarmonyKind) -> Self {
        let hsl = base.to_hsl().rounded();
        let at = |hsl: Hsl| Rgb::from_hsl(hsl);
        let soften = |hsl: Hsl| at(hsl.shift(SOFTEN.0, SOFTEN.1));

        let colors = match kind {
            HarmonyKind::Complementary => vec![
                base,
                at(hsl.rotate(180.0)),
                soften(hsl),
                soften(hsl.rotate(180.0)),
                at(hsl.shift(DEEPEN.0, DEEPEN.1)),
            ],
            HarmonyKind::Analogous => ANALOGOUS_OFFSETS
                .iter()
                .map(|&offset| {
                    if offset == 0.0 {
                        base
                    } else {
                        at(hsl.rotate(offset))
                    }
                })
                .collect(),
            HarmonyKind::Triadic => vec![
                base,
                at(hsl.rotate(120.0)),
                at(hsl.rotate(240.0)),
                soften(hsl),
                soften(hsl.rotate(120.0)),
            ],
            HarmonyKind::Tetradic => vec![
                base,
                at(hsl.rotate(90.0)),
                at(hsl.rotate(180.0)),
                at(hsl.rotate(270.0)),
                soften(hsl),
            ],
            HarmonyKind::Monochromatic => {
                let mut colors = vec![base];
                colors.extend(MONO_LIGHTNESS.iter().map(|&dl| {
                    let ds = if dl == MONO_LIGHTNESS[3] {
                        MONO_LIGHTEST_DESATURATE
                    } else {
                        0.0
                    };
                    at(hsl.shift(ds, dl))
                }));
                colors
            }
        };

        Self { kind, base, colors }
    }

    /// A display name such as `"Triadic #336699"`.
    pub fn suggested_name(&self) -> String {
        let kind = self.kind.as_str();
        let mut chars = kind.chars();
        let title = match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        };
        format!("{title} {}", self.base)
    }
}

/// Parses `base_hex` and `kind` and derives the harmony colors.
pub fn generate_harmony_palette(base_hex: &str, kind: &str) -> Result<Vec<Rgb>, SwatchError> {
    let base = Rgb::from_hex(base_hex)?;
    let kind: HarmonyKind = kind.parse()?;
    Ok(HarmonyPalette::generate(base, kind).colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::hex_to_hsl;

    fn hsl_of(c: Rgb) -> Hsl {
        hex_to_hsl(&c.to_hex()).unwrap()
    }

    #[test]
    fn every_kind_yields_five_colors() {
        for kind in HarmonyKind::ALL {
            let h = HarmonyPalette::generate(Rgb::new(0x33, 0x66, 0x99), kind);
            assert_eq!(h.colors.len(), 5, "{kind} produced {}", h.colors.len());
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate_harmony_palette("#336699", "triadic").unwrap();
        let b = generate_harmony_palette("#336699", "triadic").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn base_is_first_and_unmodified() {
        let base = Rgb::from_hex("#336699").unwrap();
        for kind in [
            HarmonyKind::Complementary,
            HarmonyKind::Triadic,
            HarmonyKind::Tetradic,
            HarmonyKind::Monochromatic,
        ] {
            assert_eq!(HarmonyPalette::generate(base, kind).colors[0], base, "{kind}");
        }
    }

    #[test]
    fn analogous_base_is_centered() {
        let base = Rgb::from_hex("#336699").unwrap();
        let h = HarmonyPalette::generate(base, HarmonyKind::Analogous);
        assert_eq!(h.colors[2], base);
        let hues: Vec<f64> = h.colors.iter().map(|&c| hsl_of(c).h).collect();
        assert_eq!(hues, vec![170.0, 190.0, 210.0, 230.0, 250.0]);
    }

    #[test]
    fn complementary_of_3366cc_has_hue_40() {
        let colors = generate_harmony_palette("#3366CC", "complementary").unwrap();
        let comp = hsl_of(colors[1]);
        assert!((comp.h - 40.0).abs() <= 1.0, "hue {}", comp.h);
        assert_eq!(colors[1], Rgb::from_hex("#cc9933").unwrap());
    }

    #[test]
    fn complementary_softened_and_deepened_variants() {
        // base hsl(220, 60%, 50%)
        let colors = generate_harmony_palette("#3366cc", "complementary").unwrap();
        assert_eq!(colors[2], Rgb::from_hsl(Hsl { h: 220.0, s: 35.0, l: 65.0 }));
        assert_eq!(colors[3], Rgb::from_hsl(Hsl { h: 40.0, s: 35.0, l: 65.0 }));
        assert_eq!(colors[4], Rgb::from_hsl(Hsl { h: 220.0, s: 65.0, l: 20.0 }));
    }

    #[test]
    fn triadic_hues_are_spaced_by_120() {
        // base hsl(210, 50%, 40%)
        let colors = generate_harmony_palette("#336699", "triadic").unwrap();
        assert_eq!(colors[1], Rgb::from_hsl(Hsl { h: 330.0, s: 50.0, l: 40.0 }));
        assert_eq!(colors[2], Rgb::from_hsl(Hsl { h: 90.0, s: 50.0, l: 40.0 }));
        assert_eq!(colors[3], Rgb::from_hsl(Hsl { h: 210.0, s: 25.0, l: 55.0 }));
        assert_eq!(colors[4], Rgb::from_hsl(Hsl { h: 330.0, s: 25.0, l: 55.0 }));
    }

    #[test]
    fn tetradic_hues_are_spaced_by_90() {
        let colors = generate_harmony_palette("#336699", "tetradic").unwrap();
        assert_eq!(colors[1], Rgb::from_hsl(Hsl { h: 300.0, s: 50.0, l: 40.0 }));
        assert_eq!(colors[2], Rgb::from_hsl(Hsl { h: 30.0, s: 50.0, l: 40.0 }));
        assert_eq!(colors[3], Rgb::from_hsl(Hsl { h: 120.0, s: 50.0, l: 40.0 }));
        assert_eq!(colors[4], Rgb::from_hsl(Hsl { h: 210.0, s: 25.0, l: 55.0 }));
    }

    #[test]
    fn monochromatic_shifts_lightness_and_clamps() {
        // base hsl(210, 50%, 40%): 40-40 = 0 (black), 40+40 = 80 with s 20.
        let colors = generate_harmony_palette("#336699", "monochromatic").unwrap();
        assert_eq!(colors[1], Rgb::BLACK);
        assert_eq!(colors[2], Rgb::from_hsl(Hsl { h: 210.0, s: 50.0, l: 20.0 }));
        assert_eq!(colors[3], Rgb::from_hsl(Hsl { h: 210.0, s: 50.0, l: 60.0 }));
        assert_eq!(colors[4], Rgb::from_hsl(Hsl { h: 210.0, s: 20.0, l: 80.0 }));
    }

    #[test]
    fn monochromatic_of_white_clamps_to_white() {
        let colors = generate_harmony_palette("#ffffff", "monochromatic").unwrap();
        assert_eq!(colors[3], Rgb::WHITE);
        assert_eq!(colors[4], Rgb::WHITE);
    }

    #[test]
    fn kind_parsing_is_case_insensitive() {
        assert_eq!(
            "Tetradic".parse::<HarmonyKind>().unwrap(),
            HarmonyKind::Tetradic
        );
        assert!(matches!(
            "split".parse::<HarmonyKind>(),
            Err(SwatchError::UnknownHarmony(_))
        ));
    }

    #[test]
    fn invalid_base_is_rejected() {
        assert!(matches!(
            generate_harmony_palette("#12345", "triadic"),
            Err(SwatchError::InvalidColorFormat(_))
        ));
    }

    #[test]
    fn suggested_name_is_title_cased() {
        let h = HarmonyPalette::generate(Rgb::new(0x33, 0x66, 0x99), HarmonyKind::Triadic);
        assert_eq!(h.suggested_name(), "Triadic #336699");
    }

    #[test]
    fn list_names_covers_all_kinds() {
        assert_eq!(
            HarmonyKind::list_names(),
            vec!["complementary", "analogous", "triadic", "tetradic", "monochromatic"]
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn harmony_is_deterministic_for_any_base(r in any::<u8>(), g in any::<u8>(), b in any::<u8>(), k in 0usize..5) {
                let base = Rgb::new(r, g, b);
                let kind = HarmonyKind::ALL[k];
                prop_assert_eq!(
                    HarmonyPalette::generate(base, kind),
                    HarmonyPalette::generate(base, kind)
                );
            }

            #[test]
            fn complement_hue_is_opposite(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
                let base = Rgb::new(r, g, b);
                let hsl = base.to_hsl().rounded();
                let h = HarmonyPalette::generate(base, HarmonyKind::Complementary);
                let expected = Rgb::from_hsl(Hsl { h: (hsl.h + 180.0) % 360.0, ..hsl });
                prop_assert_eq!(h.colors[1], expected);
            }
        }
    }
}
