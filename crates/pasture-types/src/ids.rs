//! Generation-checked handles into the grazer arena.
//!
//! A [`GrazerId`] names a slot plus the generation the slot had when the
//! grazer was created. When a dead grazer's slot is reclaimed the slot's
//! generation advances, so any handle still pointing at the old occupant
//! resolves to nothing instead of silently aliasing the newcomer.

use serde::{Deserialize, Serialize};

/// Handle to a grazer in the herd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GrazerId {
    index: u32,
    generation: u32,
}

impl GrazerId {
    /// Build a handle from a slot index and generation.
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index in the arena.
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Slot generation at creation time.
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl core::fmt::Display for GrazerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "grazer#{}.{}", self.index, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_differ_by_generation() {
        let a = GrazerId::new(3, 0);
        let b = GrazerId::new(3, 1);
        assert_ne!(a, b);
        assert_eq!(a.index(), b.index());
    }

    #[test]
    fn display_names_slot_and_generation() {
        assert_eq!(GrazerId::new(4, 2).to_string(), "grazer#4.2");
    }
}
