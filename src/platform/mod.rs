//! Platform abstraction layer
//!
//! Input arrives from outside the crate (window key events, touch buttons,
//! replay files). Everything is folded into a [`TickInput`] that the session
//! polls once per simulation step.

use crate::sim::tick::TickInput;

/// Anything that can answer "what is held right now"
pub trait InputSource {
    fn poll(&mut self) -> TickInput;
}

/// A fixed input, held forever
impl InputSource for TickInput {
    fn poll(&mut self) -> TickInput {
        *self
    }
}

/// Physical keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    Space,
    KeyA,
    KeyD,
}

impl Key {
    /// Map a DOM-style `KeyboardEvent.code` string
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "ArrowUp" => Some(Key::ArrowUp),
            "Space" => Some(Key::Space),
            "KeyA" => Some(Key::KeyA),
            "KeyD" => Some(Key::KeyD),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Held-key tracker fed by key-down/up events
#[derive(Debug, Clone, Default)]
pub struct KeyboardInput {
    held: [bool; 6],
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        self.held[key.index()] = true;
    }

    pub fn key_up(&mut self, key: Key) {
        self.held[key.index()] = false;
    }

    /// Handle a raw event code; unknown codes are ignored
    pub fn handle_code(&mut self, code: &str, pressed: bool) {
        if let Some(key) = Key::from_code(code) {
            if pressed {
                self.key_down(key);
            } else {
                self.key_up(key);
            }
        }
    }

    /// Release everything (focus loss)
    pub fn clear(&mut self) {
        self.held = [false; 6];
    }

    fn is_held(&self, key: Key) -> bool {
        self.held[key.index()]
    }

    /// Current logical state
    pub fn state(&self) -> TickInput {
        TickInput {
            left: self.is_held(Key::ArrowLeft) || self.is_held(Key::KeyA),
            right: self.is_held(Key::ArrowRight) || self.is_held(Key::KeyD),
            jump: self.is_held(Key::ArrowUp) || self.is_held(Key::Space),
        }
    }
}

impl InputSource for KeyboardInput {
    fn poll(&mut self) -> TickInput {
        self.state()
    }
}

/// Replays a script of `(start_step, input)` entries.
///
/// Each entry holds from its start step until the next entry begins. Steps
/// before the first entry, and steps after the script is exhausted with
/// `hold_last == false`, read as no input.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    script: Vec<(u64, TickInput)>,
    step: u64,
    hold_last: bool,
}

impl ScriptedInput {
    /// Entries are sorted by start step
    pub fn new(mut script: Vec<(u64, TickInput)>) -> Self {
        script.sort_by_key(|(start, _)| *start);
        Self {
            script,
            step: 0,
            hold_last: true,
        }
    }

    /// Release all input once the last entry's step has passed
    pub fn release_at_end(mut self) -> Self {
        self.hold_last = false;
        self
    }

    /// Steps polled so far
    pub fn steps(&self) -> u64 {
        self.step
    }

    fn current(&self) -> TickInput {
        let idx = self.script.partition_point(|(start, _)| *start <= self.step);
        if idx == 0 {
            return TickInput::default();
        }
        if !self.hold_last && idx == self.script.len() && self.script[idx - 1].0 < self.step {
            return TickInput::default();
        }
        self.script[idx - 1].1
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> TickInput {
        let input = self.current();
        self.step += 1;
        input
    }
}
