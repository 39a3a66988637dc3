//! Held movement keys
//!
//! Key events write into `HeldKeys` as they arrive; the tick reads one
//! `TickInput` snapshot per frame.

use std::collections::HashSet;

use crate::sim::TickInput;

/// Horizontal movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Map a DOM `KeyboardEvent.key` value to a direction (arrows or A/D)
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "arrowleft" | "a" => Some(Direction::Left),
            "arrowright" | "d" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Set of currently held movement keys
///
/// Tracks keys rather than directions so releasing `a` while `ArrowLeft`
/// is still down keeps moving left.
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    keys: HashSet<String>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns true only for the first press of a
    /// movement key (auto-repeat and other keys return false).
    pub fn press(&mut self, key: &str) -> bool {
        if Direction::from_key(key).is_none() {
            return false;
        }
        self.keys.insert(key.to_lowercase())
    }

    pub fn release(&mut self, key: &str) {
        self.keys.remove(&key.to_lowercase());
    }

    /// Drop everything (focus lost, session reset)
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        self.keys
            .iter()
            .any(|k| Direction::from_key(k) == Some(direction))
    }

    /// Snapshot for one tick
    pub fn snapshot(&self) -> TickInput {
        TickInput {
            left: self.is_held(Direction::Left),
            right: self.is_held(Direction::Right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_press_only() {
        let mut keys = HeldKeys::new();
        assert!(keys.press("ArrowLeft"));
        // Auto-repeat
        assert!(!keys.press("ArrowLeft"));
        assert!(!keys.press("arrowleft"));
        // Not a movement key
        assert!(!keys.press("Enter"));
        assert_eq!(keys.snapshot(), TickInput { left: true, right: false });
    }

    #[test]
    fn test_wasd_aliases() {
        let mut keys = HeldKeys::new();
        keys.press("D");
        keys.press("a");
        assert_eq!(keys.snapshot(), TickInput { left: true, right: true });

        keys.release("d");
        assert_eq!(keys.snapshot(), TickInput { left: true, right: false });
    }

    #[test]
    fn test_overlapping_keys_same_direction() {
        let mut keys = HeldKeys::new();
        keys.press("a");
        keys.press("ArrowLeft");
        keys.release("A");
        assert!(keys.is_held(Direction::Left));
        keys.release("ArrowLeft");
        assert!(!keys.is_held(Direction::Left));
        // Released key can blip again
        assert!(keys.press("ArrowLeft"));
    }

    #[test]
    fn test_clear() {
        let mut keys = HeldKeys::new();
        keys.press("ArrowRight");
        keys.clear();
        assert_eq!(keys.snapshot(), TickInput::default());
    }
}
