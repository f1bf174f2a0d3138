/// Held-key tracking.
///
/// The tracker only records which keys are down.  It is updated by
/// press/release events as they arrive and read once per tick by the loop,
/// so movement follows whatever is held at the moment the frame runs.

use std::collections::{HashMap, HashSet};

use crate::entities::Direction;

/// Logical keys the game understands.  Front-ends map their own key codes
/// onto these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Fire,
    Pause,
}

#[derive(Clone, Debug, Default)]
pub struct InputTracker {
    held: HashSet<Key>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as held.  Returns `true` if it was not already held.
    pub fn press(&mut self, key: Key) -> bool {
        self.held.insert(key)
    }

    /// Returns `true` if `key` was held.
    pub fn release(&mut self, key: Key) -> bool {
        self.held.remove(&key)
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Requested horizontal movement.  Left wins when both are held.
    pub fn horizontal(&self) -> Option<Direction> {
        if self.is_held(Key::Left) {
            Some(Direction::Left)
        } else if self.is_held(Key::Right) {
            Some(Direction::Right)
        } else {
            None
        }
    }
}

/// A key counts as held if its last press/repeat event arrived within this
/// many milliseconds.  Covers terminals that never report key releases: the
/// OS key-repeat rate is ≥ 15 Hz, so the window is always refreshed while a
/// key is physically down.
pub const HOLD_WINDOW_MS: f64 = 133.0;

/// Last-seen times of held keys, for front-ends whose terminal may or may
/// not report releases.  A release event forgets the key at once; otherwise
/// it lapses once it has been quiet for longer than the window.
#[derive(Clone, Debug)]
pub struct HoldWindow {
    window_ms: f64,
    last_seen: HashMap<Key, f64>,
}

impl Default for HoldWindow {
    fn default() -> Self {
        Self::new(HOLD_WINDOW_MS)
    }
}

impl HoldWindow {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            last_seen: HashMap::new(),
        }
    }

    /// Record a press or repeat of `key` at `now`.
    pub fn seen(&mut self, key: Key, now: f64) {
        self.last_seen.insert(key, now);
    }

    pub fn forget(&mut self, key: Key) {
        self.last_seen.remove(&key);
    }

    /// Drop and return every key not seen within the window.
    pub fn expire(&mut self, now: f64) -> Vec<Key> {
        let window = self.window_ms;
        let mut lapsed = Vec::new();
        self.last_seen.retain(|&key, &mut last| {
            let fresh = now - last <= window;
            if !fresh {
                lapsed.push(key);
            }
            fresh
        });
        lapsed
    }
}
