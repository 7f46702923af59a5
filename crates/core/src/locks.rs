//! Palette slots pinned across a regenerate request.

use crate::color::Rgb;
use crate::palette::Palette;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A slot pinned to a color, in the shape sent to the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedColor {
    pub slot_index: usize,
    pub hex: Rgb,
}

/// Set of locked slots keyed by index. Locking never reorders a palette.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockedColorSet {
    slots: BTreeMap<usize, Rgb>,
}

impl LockedColorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks `slot` to `color`, replacing the stored color if already locked.
    pub fn lock(&mut self, slot: usize, color: Rgb) {
        self.slots.insert(slot, color);
    }

    /// Unlocks `slot`, returning the color it was pinned to.
    pub fn unlock(&mut self, slot: usize) -> Option<Rgb> {
        self.slots.remove(&slot)
    }

    /// Flips the lock on `slot`. Returns true if the slot is now locked.
    pub fn toggle(&mut self, slot: usize, color: Rgb) -> bool {
        if self.slots.remove(&slot).is_some() {
            false
        } else {
            self.slots.insert(slot, color);
            true
        }
    }

    /// Updates the stored color of `slot` only if it is locked.
    pub fn sync(&mut self, slot: usize, color: Rgb) {
        if let Some(stored) = self.slots.get_mut(&slot) {
            *stored = color;
        }
    }

    pub fn is_locked(&self, slot: usize) -> bool {
        self.slots.contains_key(&slot)
    }

    pub fn get(&self, slot: usize) -> Option<Rgb> {
        self.slots.get(&slot).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Locked slots in index order.
    pub fn pins(&self) -> Vec<PinnedColor> {
        self.slots
            .iter()
            .map(|(&slot_index, &hex)| PinnedColor { slot_index, hex })
            .collect()
    }

    /// Overwrites each locked slot of `palette` with its pinned color.
    ///
    /// Pins beyond the palette's length are ignored.
    pub fn apply_to(&self, palette: &Palette) -> Palette {
        self.slots
            .iter()
            .fold(palette.clone(), |acc, (&slot, &color)| {
                acc.with_color(slot, color).unwrap_or(acc)
            })
    }
}

impl FromIterator<PinnedColor> for LockedColorSet {
    fn from_iter<I: IntoIterator<Item = PinnedColor>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().map(|p| (p.slot_index, p.hex)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const GREEN: Rgb = Rgb::new(0, 255, 0);

    #[test]
    fn locking_twice_updates_instead_of_duplicating() {
        let mut locks = LockedColorSet::new();
        locks.lock(2, RED);
        locks.lock(2, GREEN);
        assert_eq!(locks.len(), 1);
        assert_eq!(locks.get(2), Some(GREEN));
    }

    #[test]
    fn unlock_removes_and_returns_color() {
        let mut locks = LockedColorSet::new();
        locks.lock(1, RED);
        assert_eq!(locks.unlock(1), Some(RED));
        assert_eq!(locks.unlock(1), None);
        assert!(locks.is_empty());
    }

    #[test]
    fn toggle_flips_membership() {
        let mut locks = LockedColorSet::new();
        assert!(locks.toggle(3, RED));
        assert!(locks.is_locked(3));
        assert!(!locks.toggle(3, RED));
        assert!(!locks.is_locked(3));
    }

    #[test]
    fn sync_only_touches_locked_slots() {
        let mut locks = LockedColorSet::new();
        locks.lock(0, RED);
        locks.sync(0, GREEN);
        locks.sync(4, GREEN);
        assert_eq!(locks.get(0), Some(GREEN));
        assert!(!locks.is_locked(4));
    }

    #[test]
    fn pins_are_ordered_by_slot() {
        let mut locks = LockedColorSet::new();
        locks.lock(4, GREEN);
        locks.lock(1, RED);
        let slots: Vec<usize> = locks.pins().iter().map(|p| p.slot_index).collect();
        assert_eq!(slots, vec![1, 4]);
    }

    #[test]
    fn pin_serializes_camel_case() {
        let pin = PinnedColor {
            slot_index: 2,
            hex: RED,
        };
        let v = serde_json::to_value(pin).unwrap();
        assert_eq!(v, serde_json::json!({"slotIndex": 2, "hex": "#ff0000"}));
    }

    #[test]
    fn apply_to_overrides_locked_slots_only() {
        let palette = Palette::new("p", vec![Rgb::BLACK; 5]).unwrap();
        let locks: LockedColorSet = [
            PinnedColor {
                slot_index: 0,
                hex: RED,
            },
            PinnedColor {
                slot_index: 9,
                hex: GREEN,
            },
        ]
        .into_iter()
        .collect();
        let applied = locks.apply_to(&palette);
        assert_eq!(applied.color(0), Some(RED));
        assert_eq!(&applied.colors()[1..], &[Rgb::BLACK; 4]);
    }
}
