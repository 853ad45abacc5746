//! Session driver: wall-clock time in, fixed simulation steps out
//!
//! The host calls [`Game::advance`] once per presented frame with the elapsed
//! wall-clock time. Whole steps are drained from an accumulator, each one
//! polling the input source once.

use crate::audio::{AudioManager, AudioSink};
use crate::consts::SIM_DT;
use crate::error::SimError;
use crate::level::LevelLayout;
use crate::platform::InputSource;
use crate::settings::Settings;
use crate::sim::snapshot::FrameSnapshot;
use crate::sim::state::{GameEvent, World};
use crate::sim::tick::{StepOutcome, tick};
use crate::tuning::Tuning;

/// Where the session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No level running
    #[default]
    Idle,
    Playing,
    /// Level kept but frozen; wall-clock time is discarded
    Paused,
    /// A step failed; only [`Game::reset`] leaves this phase
    Halted,
}

/// Session boundary notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Started,
    Won,
    Lost,
}

/// What one call to [`Game::advance`] did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Simulation steps run
    pub steps: u32,
    /// Whole steps dropped because of the substep cap
    pub dropped: u32,
    /// Events from every step, in order
    pub events: Vec<GameEvent>,
    /// Set when the level ended during this frame
    pub session: Option<SessionEvent>,
}

/// Game instance holding all session state
#[derive(Debug)]
pub struct Game {
    settings: Settings,
    tuning: Tuning,
    world: Option<World>,
    phase: SessionPhase,
    accumulator: f32,
    audio: AudioManager,
    fault: Option<SimError>,
}

impl Game {
    pub fn new(settings: Settings, tuning: Tuning) -> Self {
        let mut audio = AudioManager::default();
        audio.set_muted(settings.muted);
        Self {
            settings,
            tuning,
            world: None,
            phase: SessionPhase::Idle,
            accumulator: 0.0,
            audio,
            fault: None,
        }
    }

    /// Replace the audio backend, keeping the mute state
    pub fn with_audio(mut self, sink: Box<dyn AudioSink>) -> Self {
        let muted = self.audio.is_muted();
        self.audio = AudioManager::new(sink);
        self.audio.set_muted(muted);
        self
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The fault that halted the session, if any
    pub fn fault(&self) -> Option<&SimError> {
        self.fault.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.world.as_mut()
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    /// Build a fresh world from `layout` and start playing.
    ///
    /// Restarting while a level is running discards it.
    pub fn start(&mut self, layout: &LevelLayout) -> Result<SessionEvent, SimError> {
        if self.phase == SessionPhase::Halted {
            return Err(SimError::Halted);
        }
        self.world = Some(World::from_layout(layout, &self.tuning));
        self.accumulator = 0.0;
        self.phase = SessionPhase::Playing;
        log::info!("Session started");
        Ok(SessionEvent::Started)
    }

    /// Freeze a running level. Returns false when nothing is playing.
    pub fn pause(&mut self) -> bool {
        if self.phase != SessionPhase::Playing {
            return false;
        }
        self.phase = SessionPhase::Paused;
        self.accumulator = 0.0;
        log::info!("Session paused");
        true
    }

    /// Continue a paused level from a clean accumulator
    pub fn resume(&mut self) -> bool {
        if self.phase != SessionPhase::Paused {
            return false;
        }
        self.phase = SessionPhase::Playing;
        self.accumulator = 0.0;
        log::info!("Session resumed");
        true
    }

    /// Pause key handler
    pub fn toggle_pause(&mut self) -> SessionPhase {
        match self.phase {
            SessionPhase::Playing => {
                self.pause();
            }
            SessionPhase::Paused => {
                self.resume();
            }
            SessionPhase::Idle | SessionPhase::Halted => {}
        }
        self.phase
    }

    /// Leave any phase (including Halted) for Idle
    pub fn reset(&mut self) {
        if let Some(fault) = self.fault.take() {
            log::info!("Clearing halted session ({fault})");
        }
        self.world = None;
        self.accumulator = 0.0;
        self.phase = SessionPhase::Idle;
    }

    /// Feed `elapsed` seconds of wall-clock time and run the due steps.
    ///
    /// While paused the time is dropped, so resuming never replays the pause.
    pub fn advance(
        &mut self,
        elapsed: f32,
        input: &mut dyn InputSource,
    ) -> Result<FrameReport, SimError> {
        if self.phase == SessionPhase::Halted {
            return Err(SimError::Halted);
        }
        if !(elapsed.is_finite() && elapsed >= 0.0) {
            return Err(SimError::InvalidFrameDelta(elapsed));
        }

        let mut report = FrameReport::default();
        if self.phase == SessionPhase::Paused {
            return Ok(report);
        }
        let Some(world) = self.world.as_mut() else {
            return Ok(report);
        };

        self.accumulator += elapsed.min(self.settings.effective_max_frame_delta());
        let max_substeps = self.settings.effective_max_substeps();

        while self.accumulator >= SIM_DT && report.steps < max_substeps {
            let step_input = input.poll();
            let outcome = match tick(world, &step_input, SIM_DT, &mut report.events) {
                Ok(outcome) => outcome,
                Err(err) => {
                    log::error!("Simulation halted at tick {}: {err}", world.time_ticks);
                    self.phase = SessionPhase::Halted;
                    self.fault = Some(err.clone());
                    self.audio.handle_events(&report.events);
                    return Err(err);
                }
            };
            self.accumulator -= SIM_DT;
            report.steps += 1;

            let session = match outcome {
                StepOutcome::Continue => None,
                StepOutcome::Won => Some(SessionEvent::Won),
                StepOutcome::Lost => Some(SessionEvent::Lost),
            };
            if let Some(event) = session {
                log::info!("Session ended: {event:?} after {} ticks", world.time_ticks);
                report.session = Some(event);
                break;
            }
        }

        if report.session.is_some() {
            self.world = None;
            self.accumulator = 0.0;
            self.phase = SessionPhase::Idle;
        } else if self.accumulator >= SIM_DT {
            report.dropped = (self.accumulator / SIM_DT) as u32;
            log::warn!(
                "Falling behind: dropping {} step(s) after {} substeps",
                report.dropped,
                report.steps
            );
            self.accumulator -= report.dropped as f32 * SIM_DT;
        }

        self.audio.handle_events(&report.events);
        Ok(report)
    }

    /// Current frame for the renderer; `None` while idle
    pub fn snapshot(&self) -> Option<FrameSnapshot> {
        self.world.as_ref().map(World::snapshot)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Settings::default(), Tuning::default())
    }
}
