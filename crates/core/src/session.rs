//! Caller-owned editing context: the current palette, its locked slots, the
//! selected slot and the display format.
//!
//! Every operation takes `&mut self` and either succeeds completely or leaves
//! the session untouched.

use crate::analysis::{reconcile_locks, AnalysisRequest};
use crate::color::{ColorFormat, Rgb};
use crate::error::SwatchError;
use crate::harmony::HarmonyPalette;
use crate::history::PaletteHistory;
use crate::locks::LockedColorSet;
use crate::palette::Palette;
use chrono::{DateTime, Utc};

/// Replaces one slot of `palette`; if that slot is locked, the lock follows.
pub fn edit(
    palette: &Palette,
    locks: &mut LockedColorSet,
    slot: usize,
    color: Rgb,
) -> Result<Palette, SwatchError> {
    let next = palette.with_color(slot, color)?;
    locks.sync(slot, color);
    Ok(next)
}

/// Editing state for one user: at most one current palette plus the slots
/// pinned on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    palette: Option<Palette>,
    locks: LockedColorSet,
    selected: Option<usize>,
    format: ColorFormat,
}

impl Session {
    /// Empty session that renders colors in `format`.
    pub fn new(format: ColorFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// The palette being edited, if one has been loaded.
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    pub fn locks(&self) -> &LockedColorSet {
        &self.locks
    }

    /// Slot chosen for editing.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn format(&self) -> ColorFormat {
        self.format
    }

    /// Changes how colors are rendered. Stored colors are unaffected.
    pub fn set_format(&mut self, format: ColorFormat) {
        self.format = format;
    }

    /// Shows an unrelated palette (e.g. one picked from history). Locks and
    /// selection belong to the previous palette and are cleared.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = Some(palette);
        self.locks.clear();
        self.selected = None;
    }

    /// Moves the editing cursor to `slot`.
    pub fn select(&mut self, slot: usize) -> Result<(), SwatchError> {
        self.current_color(slot)?;
        self.selected = Some(slot);
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Sets `slot` to the color parsed from `hex`.
    ///
    /// Malformed input is rejected and the previous color is kept.
    pub fn edit_color(&mut self, slot: usize, hex: &str) -> Result<Rgb, SwatchError> {
        let color = Rgb::from_hex(hex)?;
        let palette = self.require_palette()?;
        let mut locks = self.locks.clone();
        let next = edit(palette, &mut locks, slot, color)?;
        self.palette = Some(next);
        self.locks = locks;
        Ok(color)
    }

    /// Edits the selected slot.
    pub fn edit_selected(&mut self, hex: &str) -> Result<Rgb, SwatchError> {
        let slot = self
            .selected
            .ok_or_else(|| SwatchError::InvalidPalette("no slot selected".into()))?;
        self.edit_color(slot, hex)
    }

    /// Locks or unlocks `slot` at its current color. Returns true if now locked.
    pub fn toggle_lock(&mut self, slot: usize) -> Result<bool, SwatchError> {
        let color = self.current_color(slot)?;
        Ok(self.locks.toggle(slot, color))
    }

    pub fn unlock(&mut self, slot: usize) -> Option<Rgb> {
        self.locks.unlock(slot)
    }

    /// Replaces the palette's colors with a harmony. Locked slots take the
    /// harmony's color so the pins match what is shown.
    pub fn apply_harmony(&mut self, harmony: &HarmonyPalette) -> Result<(), SwatchError> {
        let next = self.require_palette()?.apply_harmony(&harmony.colors)?;
        for pin in self.locks.pins() {
            if let Some(color) = next.color(pin.slot_index) {
                self.locks.sync(pin.slot_index, color);
            }
        }
        self.palette = Some(next);
        Ok(())
    }

    /// Builds the request for regenerating from `image` with the current pins.
    pub fn analysis_request(
        &self,
        image: Vec<u8>,
        mime_type: &str,
    ) -> Result<AnalysisRequest, SwatchError> {
        AnalysisRequest::new(image, mime_type, self.locks.pins())
    }

    /// Takes a palette returned by the analysis service, keeping locked colors.
    pub fn accept_response(&mut self, palette: Palette) -> &Palette {
        let reconciled = reconcile_locks(&palette, &self.locks);
        self.palette.insert(reconciled)
    }

    /// Current colors rendered in the session's format.
    pub fn formatted_colors(&self) -> Vec<String> {
        self.palette
            .iter()
            .flat_map(|p| p.colors().iter().map(|c| c.format(self.format)))
            .collect()
    }

    /// Saves the current palette into `history`, stamped with `now`.
    pub fn save_to(
        &self,
        history: &mut PaletteHistory,
        now: DateTime<Utc>,
    ) -> Result<(), SwatchError> {
        history.save(self.require_palette()?.clone(), now);
        Ok(())
    }

    fn require_palette(&self) -> Result<&Palette, SwatchError> {
        self.palette
            .as_ref()
            .ok_or_else(|| SwatchError::InvalidPalette("no palette loaded".into()))
    }

    fn current_color(&self, slot: usize) -> Result<Rgb, SwatchError> {
        let palette = self.require_palette()?;
        palette.color(slot).ok_or(SwatchError::SlotOutOfRange {
            index: slot,
            len: palette.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harmony::HarmonyKind;
    use chrono::TimeZone;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const GREEN: Rgb = Rgb::new(0, 255, 0);

    fn session() -> Session {
        let mut s = Session::new(ColorFormat::Hex);
        s.set_palette(
            Palette::from_hex("Base", &["#111111", "#222222", "#ff0000", "#444444", "#555555"])
                .unwrap(),
        );
        s
    }

    #[test]
    fn editing_a_locked_slot_updates_the_lock() {
        let mut s = session();
        assert!(s.toggle_lock(2).unwrap());
        assert_eq!(s.locks().get(2), Some(RED));

        s.edit_color(2, "#00FF00").unwrap();
        assert_eq!(s.locks().get(2), Some(GREEN));
        assert_eq!(s.palette().unwrap().color(2), Some(GREEN));
    }

    #[test]
    fn free_edit_syncs_lock() {
        let palette = Palette::new("p", vec![RED; 5]).unwrap();
        let mut locks = LockedColorSet::new();
        locks.lock(2, RED);
        let next = edit(&palette, &mut locks, 2, GREEN).unwrap();
        assert_eq!(next.color(2), Some(GREEN));
        assert_eq!(locks.get(2), Some(GREEN));
    }

    #[test]
    fn editing_an_unlocked_slot_does_not_lock_it() {
        let mut s = session();
        s.edit_color(0, "#abcdef").unwrap();
        assert!(!s.locks().is_locked(0));
    }

    #[test]
    fn invalid_hex_keeps_previous_color() {
        let mut s = session();
        let before = s.clone();
        let err = s.edit_color(1, "#12345z").unwrap_err();
        assert!(matches!(err, SwatchError::InvalidColorFormat(_)));
        assert_eq!(s, before);
    }

    #[test]
    fn out_of_range_edit_leaves_session_untouched() {
        let mut s = session();
        let before = s.clone();
        assert!(s.edit_color(7, "#000000").is_err());
        assert_eq!(s, before);
    }

    #[test]
    fn operations_without_palette_fail() {
        let mut s = Session::default();
        assert!(s.edit_color(0, "#000000").is_err());
        assert!(s.toggle_lock(0).is_err());
        assert!(s.select(0).is_err());
        assert!(s.formatted_colors().is_empty());
    }

    #[test]
    fn edit_selected_uses_cursor() {
        let mut s = session();
        assert!(s.edit_selected("#000000").is_err());
        s.select(4).unwrap();
        s.edit_selected("#fff").unwrap();
        assert_eq!(s.palette().unwrap().color(4), Some(Rgb::WHITE));
    }

    #[test]
    fn set_palette_clears_locks_and_selection() {
        let mut s = session();
        s.toggle_lock(1).unwrap();
        s.select(1).unwrap();
        s.set_palette(Palette::new("other", vec![GREEN; 5]).unwrap());
        assert!(s.locks().is_empty());
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn accept_response_restores_locked_colors() {
        let mut s = session();
        s.toggle_lock(2).unwrap();
        let fresh = Palette::new("Fresh", vec![GREEN; 5]).unwrap();
        let shown = s.accept_response(fresh).clone();
        assert_eq!(shown.name(), "Fresh");
        assert_eq!(shown.color(2), Some(RED));
        assert_eq!(shown.color(0), Some(GREEN));
        assert!(s.locks().is_locked(2));
    }

    #[test]
    fn analysis_request_carries_pins() {
        let mut s = session();
        s.toggle_lock(2).unwrap();
        let req = s.analysis_request(vec![1, 2, 3], "image/jpeg").unwrap();
        assert_eq!(req.locked().len(), 1);
        assert_eq!(req.locked()[0].slot_index, 2);
        assert_eq!(req.locked()[0].hex, RED);
    }

    #[test]
    fn apply_harmony_replaces_colors_and_syncs_locks() {
        let mut s = session();
        s.toggle_lock(1).unwrap();
        let harmony = HarmonyPalette::generate(Rgb::new(0x33, 0x66, 0x99), HarmonyKind::Triadic);
        s.apply_harmony(&harmony).unwrap();
        let p = s.palette().unwrap();
        assert_eq!(p.colors(), harmony.colors.as_slice());
        assert_eq!(p.name(), "Base");
        assert_eq!(s.locks().get(1), Some(harmony.colors[1]));
    }

    #[test]
    fn format_changes_rendering_only() {
        let mut s = session();
        s.set_format(ColorFormat::Rgb);
        assert_eq!(s.formatted_colors()[2], "rgb(255, 0, 0)");
        s.set_format(ColorFormat::Hex);
        assert_eq!(s.formatted_colors()[2], "#ff0000");
        assert_eq!(s.palette().unwrap().color(2), Some(RED));
    }

    #[test]
    fn save_to_history_stamps_palette() {
        let s = session();
        let mut history = PaletteHistory::new();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        s.save_to(&mut history, now).unwrap();
        assert_eq!(history.get(0).unwrap().timestamp(), Some(now));
        assert!(Session::default().save_to(&mut history, now).is_err());
    }
}
