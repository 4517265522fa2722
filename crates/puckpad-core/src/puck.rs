//! One draggable clip on the pad.

use crate::audio::{LoadTicket, SourceRef};
use crate::constants::*;
use crate::effects::{self, EffectLevels, PadSize};
use crate::error::PadError;
use glam::Vec2;
use std::fmt;

/// Stable puck identity, independent of its slot in the display ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PuckId(pub u64);

impl fmt::Display for PuckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayState {
    Stopped,
    Playing,
}

/// Where the clip came from. Only affects how the puck is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    FileImport,
    MicRecording,
}

#[derive(Clone, Debug)]
pub struct Puck {
    pub id: PuckId,
    pub name: String,
    pub source: SourceRef,
    pub origin: Origin,
    pub(crate) position: Vec2,
    pub(crate) volume_db: f32,
    pub(crate) load_state: LoadState,
    pub(crate) play_state: PlayState,
    pub(crate) beat_repeat: bool,
    pub(crate) effects: EffectLevels,
    /// Outstanding load request, if the puck currently owns a voice.
    pub(crate) ticket: Option<LoadTicket>,
}

impl Puck {
    pub fn new(id: PuckId, name: String, source: SourceRef, origin: Origin, position: Vec2) -> Self {
        Self {
            id,
            name,
            source,
            origin,
            position,
            volume_db: DEFAULT_VOLUME_DB,
            load_state: LoadState::Loading,
            play_state: PlayState::Stopped,
            beat_repeat: false,
            effects: EffectLevels::NEUTRAL,
            ticket: None,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn volume_db(&self) -> f32 {
        self.volume_db
    }

    #[inline]
    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    /// Playback state; always `Stopped` unless the puck is `Ready`.
    #[inline]
    pub fn play_state(&self) -> PlayState {
        if self.is_ready() {
            self.play_state
        } else {
            PlayState::Stopped
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.load_state == LoadState::Ready
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.play_state() == PlayState::Playing
    }

    #[inline]
    pub fn beat_repeat(&self) -> bool {
        self.beat_repeat
    }

    #[inline]
    pub fn effects(&self) -> EffectLevels {
        self.effects
    }

    /// Body radius, derived from the current volume on every call.
    #[inline]
    pub fn radius(&self) -> f32 {
        effects::radius_for_volume(self.volume_db)
    }

    /// Centre of the delete control, offset diagonally up-right by the
    /// current radius.
    #[inline]
    pub fn delete_control_center(&self) -> Vec2 {
        let offset = self.radius() * DELETE_CONTROL_OFFSET;
        Vec2::new(self.position.x + offset, self.position.y - offset)
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        let r = self.radius();
        self.position.distance_squared(point) <= r * r
    }

    #[inline]
    pub fn delete_control_contains(&self, point: Vec2) -> bool {
        self.delete_control_center().distance_squared(point)
            <= DELETE_CONTROL_RADIUS * DELETE_CONTROL_RADIUS
    }

    /// Recompute effect levels for the current position and load state.
    ///
    /// Non-ready pucks are forced to neutral. A degenerate pad leaves the
    /// previous levels untouched.
    pub(crate) fn recompute_effects(&mut self, pad: PadSize) -> EffectLevels {
        if !self.is_ready() {
            self.effects = EffectLevels::NEUTRAL;
            return self.effects;
        }
        match effects::effect_levels(self.position, pad) {
            Ok(levels) => self.effects = levels,
            Err(PadError::DegeneratePad) => {
                log::debug!("puck {}: zero-area pad, effects unchanged", self.id);
            }
            Err(e) => log::warn!("puck {}: {}", self.id, e),
        }
        self.effects
    }

    /// Status shown next to the hovered puck.
    pub fn state_text(&self) -> &'static str {
        match self.load_state {
            LoadState::Failed => "Load Error!",
            LoadState::Loading => "Loading...",
            LoadState::Ready if self.is_playing() => "Playing",
            LoadState::Ready => "Stopped",
        }
    }

    /// Name shortened for the hover label.
    pub fn display_name(&self) -> String {
        if self.name.chars().count() > NAME_MAX_CHARS {
            let head: String = self.name.chars().take(NAME_TRUNCATED_CHARS).collect();
            format!("{head}...")
        } else {
            self.name.clone()
        }
    }
}
