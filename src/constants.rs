// Web front-end tuning constants: DOM ids and the per-voice effect chain.

// DOM element ids
pub const PAD_CANVAS_ID: &str = "xy-pad";
pub const PLAY_TOGGLE_ID: &str = "play-toggle";
pub const BEAT_REPEAT_ID: &str = "beat-repeat";
pub const FILE_INPUT_ID: &str = "file-input";
pub const RECORD_BUTTON_ID: &str = "record-btn";
pub const UNDO_DELETE_ID: &str = "undo-delete-btn";

// Feedback delay
pub const DELAY_TIME_SEC: f32 = 0.25;
pub const DELAY_MAX_SEC: f64 = 1.0;
pub const DELAY_FEEDBACK: f32 = 0.5;

// Reverb impulse response (procedural, shared by all voices)
pub const REVERB_DECAY_SEC: f32 = 2.0;

// Distortion (arctan waveshaper)
pub const DISTORTION_DRIVE: f32 = 6.0;
pub const DISTORTION_CURVE_LEN: u32 = 2048;

// Low shelf used as the EQ corner's "low" band
pub const EQ_LOW_SHELF_HZ: f32 = 400.0;

// Preferred recording containers, in order
pub const RECORDING_MIME_TYPES: [&str; 2] = ["audio/webm", "audio/ogg"];
pub const RECORDING_FALLBACK_MIME: &str = "audio/webm";
