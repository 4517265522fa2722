//! Error types for the pad model.
//!
//! Every failure is local to one puck or one recording attempt; nothing here
//! is fatal to the rest of the pad.

use crate::puck::PuckId;
use thiserror::Error;

/// Result alias for pad operations.
pub type Result<T> = std::result::Result<T, PadError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PadError {
    /// Decoding or fetching a puck's audio failed. Terminal for that puck.
    #[error("error loading {name}: {reason}")]
    LoadFailure { name: String, reason: String },

    /// Microphone capture produced nothing usable. No puck is created.
    #[error("recording failed: {0}")]
    RecordingFailure(String),

    /// The pad has zero area, so proximities cannot be normalised.
    #[error("pad has zero area")]
    DegeneratePad,

    #[error("no live puck with id {0}")]
    UnknownPuck(PuckId),

    #[error("no audio tracks loaded to play")]
    NothingToPlay,

    #[error("audio tracks are still loading or failed; cannot start playback yet")]
    TracksNotReady,

    #[error("a recording is already in progress")]
    AlreadyRecording,

    #[error("no recording in progress")]
    NotRecording,
}
