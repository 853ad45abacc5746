//! Error types for the simulation and its configuration

use thiserror::Error;

/// Faults raised while stepping the simulation.
///
/// A step that returns one of these may have partially mutated the world, so
/// the session driver halts instead of retrying.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid timestep {0}: must be finite and positive")]
    InvalidTimestep(f32),
    #[error("invalid frame delta {0}: must be finite and non-negative")]
    InvalidFrameDelta(f32),
    #[error("{kind} #{id} has a non-finite position or velocity")]
    NonFiniteState { kind: &'static str, id: u32 },
    #[error("{kind} #{id} has a negative box size")]
    NegativeSize { kind: &'static str, id: u32 },
    #[error("simulation halted after an earlier fault; reset the session")]
    Halted,
}

/// Failures loading settings, tuning or level files
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read or write config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid level: {0}")]
    InvalidLevel(String),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}
