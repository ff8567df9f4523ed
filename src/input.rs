//! Logical key state as the simulation sees it.
//!
//! How keys are read from a device is up to the [`InputSource`]; the core
//! only consumes held/not-held flags.

use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Fire,
    Quit,
    Pause,
}

/// Which logical keys are held right now.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub quit: bool,
    pub pause: bool,
}

impl InputSnapshot {
    pub fn held(&self, key: Key) -> bool {
        match key {
            Key::Left => self.left,
            Key::Right => self.right,
            Key::Fire => self.fire,
            Key::Quit => self.quit,
            Key::Pause => self.pause,
        }
    }

    pub fn with(mut self, key: Key) -> Self {
        match key {
            Key::Left => self.left = true,
            Key::Right => self.right = true,
            Key::Fire => self.fire = true,
            Key::Quit => self.quit = true,
            Key::Pause => self.pause = true,
        }
        self
    }
}

pub trait InputSource {
    /// Sample the current key state; called once per frame.
    fn sample(&mut self) -> InputSnapshot;
}

/// Replays a fixed list of snapshots, then repeats the last one forever.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    frames: Vec<InputSnapshot>,
    cursor: usize,
}

impl ScriptedInput {
    pub fn new(frames: Vec<InputSnapshot>) -> Self {
        Self { frames, cursor: 0 }
    }
}

impl InputSource for ScriptedInput {
    fn sample(&mut self) -> InputSnapshot {
        let snapshot = self
            .frames
            .get(self.cursor)
            .or_else(|| self.frames.last())
            .copied()
            .unwrap_or_default();
        self.cursor += 1;
        snapshot
    }
}

/// Debounce latch: a held key triggers once, then must be released before
/// it can trigger again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyLatch {
    armed: bool,
}

impl Default for KeyLatch {
    fn default() -> Self {
        Self { armed: true }
    }
}

impl KeyLatch {
    /// A latch that waits for the key to be released before its first trigger.
    pub fn disarmed() -> Self {
        Self { armed: false }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Observe the key. Re-arms whenever it is seen released.
    pub fn observe(&mut self, held: bool) {
        if !held {
            self.armed = true;
        }
    }

    /// Consume the latch if the key is held and armed.
    pub fn trigger(&mut self, held: bool) -> bool {
        self.observe(held);
        if held && self.armed {
            self.armed = false;
            true
        } else {
            false
        }
    }
}

/// Between auto-repeat events a key stays held for this long.
pub const REPEAT_WINDOW: Duration = Duration::from_millis(150);

/// After the first press a latched key stays held this long, covering the
/// OS delay before auto-repeat starts (typically 250 to 500 ms).
pub const FIRST_REPEAT_WINDOW: Duration = Duration::from_millis(550);

#[derive(Clone, Copy, Debug)]
struct Hold {
    last: Instant,
    repeating: bool,
}

/// Held-key tracking for terminals that may never report key releases.
///
/// A key is held while press/repeat events keep arriving within its window.
/// Movement keys use the short window from the first press so a tap does not
/// slide the ship; fire, pause and quit only trigger on a fresh press, so
/// they get the longer first window and the initial repeat gap does not read
/// as a release.
#[derive(Clone, Debug, Default)]
pub struct KeyHolds {
    holds: HashMap<Key, Hold>,
}

impl KeyHolds {
    fn window(key: Key, hold: &Hold) -> Duration {
        match key {
            Key::Left | Key::Right => REPEAT_WINDOW,
            _ if hold.repeating => REPEAT_WINDOW,
            _ => FIRST_REPEAT_WINDOW,
        }
    }

    /// A press event. Terminals without event types report auto-repeat as
    /// further presses, so a press on a key still held counts as a repeat.
    pub fn press(&mut self, key: Key, now: Instant) {
        let repeating = self.is_held(key, now);
        self.holds.insert(key, Hold { last: now, repeating });
    }

    pub fn repeat(&mut self, key: Key, now: Instant) {
        self.holds.insert(key, Hold { last: now, repeating: true });
    }

    pub fn release(&mut self, key: Key) {
        self.holds.remove(&key);
    }

    pub fn is_held(&self, key: Key, now: Instant) -> bool {
        self.holds
            .get(&key)
            .map(|h| now.saturating_duration_since(h.last) <= Self::window(key, h))
            .unwrap_or(false)
    }

    pub fn snapshot(&self, now: Instant) -> InputSnapshot {
        InputSnapshot {
            left: self.is_held(Key::Left, now),
            right: self.is_held(Key::Right, now),
            fire: self.is_held(Key::Fire, now),
            quit: self.is_held(Key::Quit, now),
            pause: self.is_held(Key::Pause, now),
        }
    }
}
