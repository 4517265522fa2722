// Shared tuning constants for the pad model.

// Volume (dB) and the wheel step applied per event
pub const VOLUME_MIN_DB: f32 = -48.0;
pub const VOLUME_MAX_DB: f32 = 6.0;
pub const VOLUME_STEP_DB: f32 = 2.0;
pub const DEFAULT_VOLUME_DB: f32 = 0.0;

// Puck body radius range (px), mapped linearly from the volume range
pub const MIN_RADIUS: f32 = 12.0;
pub const MAX_RADIUS: f32 = 35.0;

// Delete control drawn at the upper-right of a hovered puck
pub const DELETE_CONTROL_RADIUS: f32 = 8.0;
pub const DELETE_CONTROL_OFFSET: f32 = std::f32::consts::FRAC_1_SQRT_2; // cos(45°)

// Effect output scaling
pub const DELAY_WET_SCALE: f32 = 0.5;
pub const REVERB_WET_SCALE: f32 = 1.0;
pub const DISTORTION_WET_SCALE: f32 = 0.5;
pub const EQ_LOW_SPAN_DB: f32 = 24.0; // (proximity - 0.5) * span -> [-12, +12] dB

// Parameter smoothing (seconds) applied to effect and volume changes
pub const PARAM_RAMP_SEC: f64 = 0.05;

// Transport
pub const TRANSPORT_START_LEAD_SEC: f64 = 0.1;
pub const BEAT_REPEAT_SEC: f64 = 0.25; // eighth note at 120 bpm

// Spawn placement
pub const SPAWN_JITTER_PX: f32 = 50.0; // half-width of the random offset around the pad centre
pub const FALLBACK_PAD_CENTER: [f32; 2] = [300.0, 300.0];

// Labels
pub const NAME_MAX_CHARS: usize = 25;
pub const NAME_TRUNCATED_CHARS: usize = 22;
pub const LABEL_MIN_FONT_PX: f32 = 10.0;
pub const LABEL_FONT_SCALE: f32 = 0.6;
pub const HOVER_LABEL_GAP_X: f32 = 8.0;
pub const HOVER_LABEL_GAP_Y: f32 = 4.0;
pub const HOVER_LABEL_FONT_PX: f32 = 12.0;
