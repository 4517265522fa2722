//! Boundary to the audio engine that actually renders sound.
//!
//! The controller never touches audio nodes directly. It asks an
//! [`AudioEngine`] for one [`Voice`] per live puck and pushes effect levels,
//! volume and transport changes through it.

use crate::effects::EffectLevels;
use std::fmt;

/// Reference to a clip's source data (e.g. a blob or file URL). Retained by
/// deleted pucks so undo can rebuild the voice from the same data.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceRef(pub String);

impl SourceRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one load request. Each ticket is completed at most once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LoadTicket(pub u64);

/// How a parameter change reaches the audio graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Smoothing {
    Immediate,
    /// Linear ramp to the target over the given number of seconds.
    Ramp(f64),
}

/// Playable clip routed through its own effect chain:
/// source -> delay -> reverb -> distortion -> EQ -> volume -> output.
pub trait Voice {
    fn set_delay_wet(&mut self, wet: f32, smoothing: Smoothing);
    fn set_reverb_wet(&mut self, wet: f32, smoothing: Smoothing);
    fn set_distortion_wet(&mut self, wet: f32, smoothing: Smoothing);
    fn set_eq_low_gain_db(&mut self, gain_db: f32, smoothing: Smoothing);
    fn set_volume_db(&mut self, volume_db: f32, smoothing: Smoothing);
    /// Loop only the first eighth note of the clip while enabled.
    fn set_beat_repeat(&mut self, enabled: bool);
    /// Start looping playback at engine time `at_time` (seconds),
    /// `offset_sec` into the transport timeline. The voice wraps the offset
    /// by its own loop length so it stays aligned with voices started at the
    /// transport origin.
    fn start(&mut self, at_time: f64, offset_sec: f64);
    fn stop(&mut self);
    /// Stop, detach from the transport and release every node.
    fn dispose(&mut self);
}

/// Host audio system: voice factory plus the shared transport clock.
pub trait AudioEngine {
    type Voice: Voice;

    /// Begin loading `source` into a new voice. The engine must report the
    /// outcome exactly once for `ticket` via
    /// [`PadController::on_load_complete`](crate::PadController::on_load_complete),
    /// including failures to build the voice itself.
    fn create_voice(&mut self, ticket: LoadTicket, source: &SourceRef) -> Self::Voice;

    /// Current engine time in seconds.
    fn now(&self) -> f64;

    /// Whether the underlying audio context is running (not suspended).
    fn is_running(&self) -> bool;

    /// Engine time the running transport started at, `None` when stopped.
    fn transport_started_at(&self) -> Option<f64>;

    fn transport_running(&self) -> bool {
        self.transport_started_at().is_some()
    }

    fn start_transport(&mut self, at_time: f64);
    fn stop_transport(&mut self);
}

/// Push all four effect levels to a voice.
pub fn apply_levels<V: Voice + ?Sized>(voice: &mut V, levels: &EffectLevels, smoothing: Smoothing) {
    voice.set_delay_wet(levels.delay_wet, smoothing);
    voice.set_reverb_wet(levels.reverb_wet, smoothing);
    voice.set_distortion_wet(levels.distortion_wet, smoothing);
    voice.set_eq_low_gain_db(levels.eq_low_gain_db, smoothing);
}
