//! Five-color palette record as produced by the analysis service and stored
//! in history.
//!
//! Palettes are immutable by replacement: every edit returns a new value.
//! Color order is significant; a slot index identifies a color for locking
//! and editing.

use crate::color::{ColorFormat, Rgb};
use crate::error::SwatchError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of colors in every palette.
pub const PALETTE_SIZE: usize = 5;

/// A named palette of exactly [`PALETTE_SIZE`] colors.
///
/// Serializes in the service's wire shape:
/// `{"name", "description"?, "colors": [{"hex", "rgb"}], "timestamp"?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PaletteRecord", into = "PaletteRecord")]
pub struct Palette {
    name: String,
    description: Option<String>,
    colors: Vec<Rgb>,
    timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PaletteRecord {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    colors: Vec<SwatchRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<DateTime<Utc>>,
}

/// One color entry. `rgb` is informational and ignored on input.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SwatchRecord {
    hex: Rgb,
    #[serde(default, skip_deserializing)]
    rgb: String,
}

impl TryFrom<PaletteRecord> for Palette {
    type Error = SwatchError;

    fn try_from(record: PaletteRecord) -> Result<Self, Self::Error> {
        let colors = record.colors.into_iter().map(|s| s.hex).collect();
        let mut palette = Palette::new(&record.name, colors)?;
        palette.description = record.description;
        palette.timestamp = record.timestamp;
        Ok(palette)
    }
}

impl From<Palette> for PaletteRecord {
    fn from(p: Palette) -> Self {
        PaletteRecord {
            name: p.name,
            description: p.description,
            colors: p
                .colors
                .into_iter()
                .map(|hex| SwatchRecord {
                    hex,
                    rgb: hex.format(ColorFormat::Rgb),
                })
                .collect(),
            timestamp: p.timestamp,
        }
    }
}

impl Palette {
    /// Creates an untimestamped palette. Requires exactly [`PALETTE_SIZE`] colors.
    pub fn new(name: &str, colors: Vec<Rgb>) -> Result<Self, SwatchError> {
        check_size(colors.len())?;
        Ok(Self {
            name: name.to_string(),
            description: None,
            colors,
            timestamp: None,
        })
    }

    /// Creates a palette by parsing hex color strings.
    pub fn from_hex(name: &str, hexes: &[&str]) -> Result<Self, SwatchError> {
        let colors: Result<Vec<Rgb>, SwatchError> = hexes.iter().map(|h| Rgb::from_hex(h)).collect();
        Self::new(name, colors?)
    }

    /// Display name, e.g. `"Harbor Dusk"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Optional one-line mood or theme description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The five colors in slot order.
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Color at `slot`, or `None` past the last slot.
    pub fn color(&self, slot: usize) -> Option<Rgb> {
        self.colors.get(slot).copied()
    }

    /// When the palette was saved to history; `None` until then.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// Number of colors, always [`PALETTE_SIZE`].
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false for a valid palette.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_description(mut self, description: Option<&str>) -> Self {
        self.description = description.map(str::to_string);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Returns a copy with exactly one slot replaced.
    pub fn with_color(&self, slot: usize, color: Rgb) -> Result<Self, SwatchError> {
        if slot >= self.colors.len() {
            return Err(SwatchError::SlotOutOfRange {
                index: slot,
                len: self.colors.len(),
            });
        }
        let mut next = self.clone();
        next.colors[slot] = color;
        Ok(next)
    }

    /// Returns a copy whose colors are replaced by `colors`, keeping name,
    /// description and timestamp.
    pub fn apply_harmony(&self, colors: &[Rgb]) -> Result<Self, SwatchError> {
        check_size(colors.len())?;
        Ok(Self {
            colors: colors.to_vec(),
            ..self.clone()
        })
    }

    /// Comma-separated hex list, e.g. `"#112233, #445566, ..."`.
    pub fn hex_list(&self) -> String {
        self.colors
            .iter()
            .map(|c| c.to_hex())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// One-line text for sharing the palette.
    pub fn share_text(&self) -> String {
        format!(
            "Check out this color palette '{}': {}",
            self.name,
            self.hex_list()
        )
    }

    /// Save date as `"Mar 5, 2025"`, or `"Unknown date"` if never saved.
    pub fn display_date(&self) -> String {
        match self.timestamp {
            Some(ts) => ts.format("%b %-d, %Y").to_string(),
            None => "Unknown date".to_string(),
        }
    }
}

fn check_size(len: usize) -> Result<(), SwatchError> {
    if len != PALETTE_SIZE {
        return Err(SwatchError::InvalidPalette(format!(
            "palette requires exactly {PALETTE_SIZE} colors, got {len}"
        )));
    }
    Ok(())
}
