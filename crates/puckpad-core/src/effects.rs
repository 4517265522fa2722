//! Position → effect and volume → radius mappings.
//!
//! Each effect is tied to one corner of the pad. A puck's closeness to a
//! corner, normalised by the pad diagonal, drives that effect's wet level
//! (or the low-shelf gain for the EQ corner).

use crate::constants::*;
use crate::error::{PadError, Result};
use glam::Vec2;

/// Pad bounding dimensions in canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PadSize {
    pub width: f32,
    pub height: f32,
}

impl PadSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn diagonal(&self) -> f32 {
        self.width.hypot(self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// The four effects, each anchored at a pad corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Effect {
    Delay,
    Reverb,
    Distortion,
    Eq,
}

impl Effect {
    pub const ALL: [Effect; 4] = [Effect::Delay, Effect::Reverb, Effect::Distortion, Effect::Eq];

    /// Corner this effect lives at: delay top-left, reverb top-right,
    /// distortion bottom-left, EQ bottom-right.
    #[inline]
    pub fn anchor(self, pad: PadSize) -> Vec2 {
        match self {
            Effect::Delay => Vec2::new(0.0, 0.0),
            Effect::Reverb => Vec2::new(pad.width, 0.0),
            Effect::Distortion => Vec2::new(0.0, pad.height),
            Effect::Eq => Vec2::new(pad.width, pad.height),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Effect::Delay => "Delay",
            Effect::Reverb => "Reverb",
            Effect::Distortion => "Distortion",
            Effect::Eq => "EQ",
        }
    }
}

/// Effect outputs for one puck. `Default` is the neutral setting.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EffectLevels {
    pub delay_wet: f32,
    pub reverb_wet: f32,
    pub distortion_wet: f32,
    pub eq_low_gain_db: f32,
}

impl EffectLevels {
    pub const NEUTRAL: EffectLevels = EffectLevels {
        delay_wet: 0.0,
        reverb_wet: 0.0,
        distortion_wet: 0.0,
        eq_low_gain_db: 0.0,
    };
}

/// Linear falloff in \[0, 1\]: 1 on the anchor, 0 at or beyond `max_distance`.
#[inline]
pub fn proximity(pos: Vec2, anchor: Vec2, max_distance: f32) -> f32 {
    1.0 - (pos.distance(anchor) / max_distance).min(1.0)
}

/// Map a position on the pad to effect levels.
///
/// Fails with [`PadError::DegeneratePad`] when the pad diagonal is zero;
/// callers keep their previous levels in that case.
pub fn effect_levels(pos: Vec2, pad: PadSize) -> Result<EffectLevels> {
    let max_distance = pad.diagonal();
    if max_distance == 0.0 {
        return Err(PadError::DegeneratePad);
    }
    let prox = |e: Effect| proximity(pos, e.anchor(pad), max_distance);
    Ok(EffectLevels {
        delay_wet: prox(Effect::Delay) * DELAY_WET_SCALE,
        reverb_wet: prox(Effect::Reverb) * REVERB_WET_SCALE,
        distortion_wet: prox(Effect::Distortion) * DISTORTION_WET_SCALE,
        eq_low_gain_db: (prox(Effect::Eq) - 0.5) * EQ_LOW_SPAN_DB,
    })
}

/// Apply one wheel event to a volume. Negative deltas (scroll up) raise the
/// volume; every other delta, zero included, lowers it.
#[inline]
pub fn step_volume_db(current_db: f32, wheel_delta: f64, step_db: f32) -> f32 {
    let change = if wheel_delta < 0.0 { step_db } else { -step_db };
    (current_db + change).clamp(VOLUME_MIN_DB, VOLUME_MAX_DB)
}

/// Body radius for a volume; monotonic in `volume_db`.
#[inline]
pub fn radius_for_volume(volume_db: f32) -> f32 {
    let norm = (volume_db - VOLUME_MIN_DB) / (VOLUME_MAX_DB - VOLUME_MIN_DB);
    MIN_RADIUS + norm.clamp(0.0, 1.0) * (MAX_RADIUS - MIN_RADIUS)
}

#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}
