//! Sound triggers
//!
//! The simulation only raises [`GameEvent`]s. The audio manager maps them to
//! sound effects and forwards them to whatever sink the host provides.

use crate::sim::state::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player left the ground
    Jump,
    /// Item collected or enemy stomped
    Pickup,
    /// Player took damage
    Shrink,
    Death,
}

impl SoundEffect {
    /// Stable asset name
    pub fn name(self) -> &'static str {
        match self {
            SoundEffect::Jump => "jump",
            SoundEffect::Pickup => "coin",
            SoundEffect::Shrink => "shrink",
            SoundEffect::Death => "death",
        }
    }

    /// Effect triggered by an event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jumped => Some(SoundEffect::Jump),
            GameEvent::EnemyStomped { .. }
            | GameEvent::ShellKicked { .. }
            | GameEvent::ItemCollected { .. } => Some(SoundEffect::Pickup),
            GameEvent::PlayerShrunk => Some(SoundEffect::Shrink),
            GameEvent::PlayerDied => Some(SoundEffect::Death),
            GameEvent::BlockBumped { .. }
            | GameEvent::ItemSpawned { .. }
            | GameEvent::PlayerGrew => None,
        }
    }
}

/// Fire-and-forget playback backend
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Discards every effect
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Writes each effect to the debug log
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) {
        log::debug!("♪ {}", effect.name());
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(NullAudio))
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("muted", &self.muted)
            .finish_non_exhaustive()
    }
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self { sink, muted: false }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Flip mute; returns the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        log::info!("Audio {}", if self.muted { "muted" } else { "unmuted" });
        self.muted
    }

    /// Play a sound effect unless muted
    pub fn play(&mut self, effect: SoundEffect) {
        if self.muted {
            return;
        }
        self.sink.play(effect);
    }

    /// Play the effects for a batch of step events, in order
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }
}
