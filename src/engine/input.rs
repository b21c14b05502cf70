//! Keyboard state.
//!
//! Raw key identifiers from the host are mapped to a logical [`Direction`] and folded into a
//! [`KeyStatus`] set. Nothing steers with it yet; the state is recorded so the next tick can.

use bitflags::bitflags;
use std::fmt::Display;

/// Logical direction a key is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// `a`, `d`, `w` and `s` map to left, right, up and down. Everything else is unmapped.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "a" => Some(Direction::Left),
            "d" => Some(Direction::Right),
            "w" => Some(Direction::Up),
            "s" => Some(Direction::Down),
            _ => None,
        }
    }

    fn flag(self) -> KeyStatus {
        match self {
            Direction::Left => KeyStatus::LEFT,
            Direction::Right => KeyStatus::RIGHT,
            Direction::Up => KeyStatus::UP,
            Direction::Down => KeyStatus::DOWN,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

bitflags! {
    pub struct KeyStatus: u8 {
        const LEFT  = 0b0001;
        const RIGHT = 0b0010;
        const UP    = 0b0100;
        const DOWN  = 0b1000;
    }
}

impl KeyStatus {
    pub fn is_pressed(&self, direction: Direction) -> bool {
        self.contains(direction.flag())
    }
}

impl Display for KeyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();

        if self.contains(KeyStatus::LEFT) {
            parts.push("left");
        }
        if self.contains(KeyStatus::RIGHT) {
            parts.push("right");
        }
        if self.contains(KeyStatus::UP) {
            parts.push("up");
        }
        if self.contains(KeyStatus::DOWN) {
            parts.push("down");
        }

        if parts.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", parts.join("+"))
        }
    }
}

/// Pressed-state of the four directions, written by key events only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputState {
    status: KeyStatus,
}

impl Default for InputState {
    fn default() -> Self {
        Self { status: KeyStatus::empty() }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn status(&self) -> KeyStatus {
        self.status
    }

    /// Auto-repeated presses and unmapped keys are ignored. Returns true when the state changed.
    pub fn key_down(&mut self, key: &str, repeat: bool) -> bool {
        if repeat {
            return false;
        }
        match Direction::from_key(key) {
            Some(direction) => self.set(direction, true),
            None => false,
        }
    }

    /// Returns true when the state changed.
    pub fn key_up(&mut self, key: &str) -> bool {
        match Direction::from_key(key) {
            Some(direction) => self.set(direction, false),
            None => false,
        }
    }

    fn set(&mut self, direction: Direction, pressed: bool) -> bool {
        let before = self.status;
        self.status.set(direction.flag(), pressed);
        before != self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn w_down_then_up() {
        let mut input = InputState::new();
        assert!(input.key_down("w", false));
        assert!(input.status().is_pressed(Direction::Up));

        assert!(input.key_up("w"));
        assert!(!input.status().is_pressed(Direction::Up));
        assert_eq!(input.status(), KeyStatus::empty());
    }

    #[test]
    fn repeated_key_down_is_ignored() {
        let mut input = InputState::new();
        assert!(!input.key_down("a", true));
        assert_eq!(input.status(), KeyStatus::empty());

        input.key_down("a", false);
        let before = input.status();
        assert!(!input.key_down("a", true));
        assert_eq!(input.status(), before);
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let mut input = InputState::new();
        assert!(!input.key_down("q", false));
        assert!(!input.key_up("ArrowUp"));
        assert_eq!(input.status(), KeyStatus::empty());
    }

    #[test]
    fn key_mapping() {
        assert_eq!(Direction::from_key("a"), Some(Direction::Left));
        assert_eq!(Direction::from_key("d"), Some(Direction::Right));
        assert_eq!(Direction::from_key("w"), Some(Direction::Up));
        assert_eq!(Direction::from_key("s"), Some(Direction::Down));
        assert_eq!(Direction::from_key("W"), None);
    }

    #[test]
    fn keystatus_display() {
        assert_eq!(KeyStatus::empty().to_string(), "none");
        assert_eq!((KeyStatus::LEFT | KeyStatus::UP).to_string(), "left+up");
        assert_eq!(Direction::Down.to_string(), "down");
    }
}
