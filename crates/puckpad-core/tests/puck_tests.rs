// Host-side tests for puck geometry and state accessors.

use approx::assert_relative_eq;
use glam::Vec2;
use puckpad_core::constants::*;
use puckpad_core::*;

fn puck_at(x: f32, y: f32) -> Puck {
    Puck::new(
        PuckId(1),
        "kick.wav".to_string(),
        SourceRef::new("blob:kick"),
        Origin::FileImport,
        Vec2::new(x, y),
    )
}

#[test]
fn new_puck_is_loading_with_neutral_effects() {
    let p = puck_at(100.0, 100.0);
    assert_eq!(p.load_state(), LoadState::Loading);
    assert_eq!(p.play_state(), PlayState::Stopped);
    assert_eq!(p.effects(), EffectLevels::NEUTRAL);
    assert_relative_eq!(p.volume_db(), DEFAULT_VOLUME_DB);
    assert_relative_eq!(p.radius(), radius_for_volume(DEFAULT_VOLUME_DB));
}

#[test]
fn body_hit_includes_the_rim() {
    let p = puck_at(100.0, 100.0);
    let r = p.radius();
    assert!(p.contains(Vec2::new(100.0, 100.0)));
    assert!(p.contains(Vec2::new(100.0 + r, 100.0)));
    assert!(!p.contains(Vec2::new(100.0 + r + 0.5, 100.0)));
}

#[test]
fn delete_control_sits_up_and_right_of_the_body() {
    let p = puck_at(100.0, 100.0);
    let c = p.delete_control_center();
    let off = p.radius() * std::f32::consts::FRAC_1_SQRT_2;
    assert_relative_eq!(c.x, 100.0 + off, epsilon = 1e-4);
    assert_relative_eq!(c.y, 100.0 - off, epsilon = 1e-4);
    assert!(p.delete_control_contains(c));
    assert!(p.delete_control_contains(c + Vec2::new(DELETE_CONTROL_RADIUS, 0.0)));
    assert!(!p.delete_control_contains(c + Vec2::new(DELETE_CONTROL_RADIUS + 0.5, 0.0)));
    assert!(!p.delete_control_contains(Vec2::new(100.0, 100.0)));
}

#[test]
fn labels_truncate_long_names() {
    let mut p = puck_at(0.0, 0.0);
    assert_eq!(p.display_name(), "kick.wav");
    p.name = "a-really-long-field-recording-name.wav".to_string();
    let shown = p.display_name();
    assert_eq!(shown.chars().count(), NAME_TRUNCATED_CHARS + 3);
    assert!(shown.ends_with("..."));
    assert!(shown.starts_with("a-really-long-field-re"));
}

#[test]
fn state_text_follows_load_state() {
    let p = puck_at(0.0, 0.0);
    assert_eq!(p.state_text(), "Loading...");
}

#[test]
fn ids_display_with_hash() {
    assert_eq!(PuckId(7).to_string(), "#7");
}
