#![deny(unsafe_code)]
//! Core types for swatch, an image-to-palette tool.
//!
//! Provides the color codec (`Rgb`, `Hsl`, `Cmyk`, hex parsing and display
//! formats), WCAG contrast evaluation, harmony palette generation, the
//! five-color `Palette` value object with locked slots, the bounded
//! `PaletteHistory` and its file store, the analysis-service contract, and a
//! caller-owned editing `Session`.

pub mod analysis;
pub mod color;
pub mod contrast;
pub mod error;
pub mod harmony;
pub mod history;
pub mod locks;
pub mod palette;
pub mod session;

pub use analysis::{parse_model_response, AnalysisRequest, PaletteSource};
pub use color::{Cmyk, ColorFormat, Hsl, Rgb};
pub use contrast::{BackgroundChoice, ContrastReport, WcagTier};
pub use error::SwatchError;
pub use harmony::{HarmonyKind, HarmonyPalette};
pub use history::{HistoryStore, PaletteHistory};
pub use locks::{LockedColorSet, PinnedColor};
pub use palette::{Palette, PALETTE_SIZE};
pub use session::Session;
