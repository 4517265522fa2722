// Host-side tests for draw command generation.

mod common;

use common::*;
use glam::Vec2;
use puckpad_core::*;

fn circles(cmds: &[DrawCommand]) -> Vec<(Vec2, Rgba)> {
    cmds.iter()
        .filter_map(|c| match c {
            DrawCommand::Circle { center, fill, .. } => Some((*center, *fill)),
            _ => None,
        })
        .collect()
}

fn texts(cmds: &[DrawCommand]) -> Vec<String> {
    cmds.iter()
        .filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn pucks_are_drawn_bottom_first_with_slot_numbers() {
    let (mut ctl, log) = controller();
    let a = add_ready(&mut ctl, &log, "a.wav");
    move_to(&mut ctl, a, 100.0, 100.0);
    add_ready(&mut ctl, &log, "b.wav");
    ctl.pointer_move(Vec2::new(5.0, 590.0));

    let cmds = ctl.draw_commands();
    let c = circles(&cmds);
    assert_eq!(c.len(), 2);
    assert_eq!(c[0].0, Vec2::new(100.0, 100.0));
    assert_eq!(c[1].0, Vec2::new(300.0, 300.0));
    assert_eq!(texts(&cmds), vec!["1".to_string(), "2".to_string()]);

    // numbering follows the live ordering after a delete
    ctl.delete(a).unwrap();
    assert_eq!(texts(&ctl.draw_commands()), vec!["1".to_string()]);
}

#[test]
fn only_the_hovered_puck_gets_a_label_and_delete_control() {
    let (mut ctl, log) = controller();
    let a = add_ready(&mut ctl, &log, "a.wav");
    ctl.pointer_move(Vec2::new(300.0, 300.0));
    let cmds = ctl.draw_commands();
    assert_eq!(cmds.len(), 4);
    assert!(texts(&cmds).contains(&"a.wav (Stopped)".to_string()));
    let del = cmds.iter().find_map(|c| match c {
        DrawCommand::DeleteControl { center, .. } => Some(*center),
        _ => None,
    });
    assert_eq!(del, Some(ctl.puck(a).unwrap().delete_control_center()));

    ctl.pointer_leave();
    let cmds = ctl.draw_commands();
    assert_eq!(cmds.len(), 2);
    assert!(!cmds.iter().any(|c| matches!(c, DrawCommand::DeleteControl { .. })));
}

#[test]
fn fill_reflects_load_and_play_state() {
    let (mut ctl, log) = controller();
    let loading = ctl.add_file("l.wav", SourceRef::new("blob:l"));
    let failed = ctl.add_file("f.wav", SourceRef::new("blob:f"));
    let _ = ctl.on_load_complete(last_ticket(&log), Err("bad".into()));
    let ready = add_ready(&mut ctl, &log, "r.wav");
    ctl.toggle_transport().unwrap();

    let fills: Vec<Rgba> = circles(&ctl.draw_commands()).into_iter().map(|c| c.1).collect();
    assert_eq!(fills.len(), 3);
    assert_eq!(fills[2], ACCENT);
    assert_ne!(fills[0], fills[1]);
    assert_ne!(fills[1], ACCENT);
    assert!(ctl.puck(ready).unwrap().is_playing());
    assert_eq!(ctl.puck(loading).unwrap().load_state(), LoadState::Loading);
    assert_eq!(ctl.puck(failed).unwrap().load_state(), LoadState::Failed);
}

#[test]
fn recorded_pucks_glow_red() {
    let (mut ctl, log) = controller();
    let id = ctl
        .finish_recording(
            RecordingSession(1),
            RecordingOutcome::Complete(SourceRef::new("blob:mic")),
        )
        .unwrap();
    ctl.on_load_complete(last_ticket(&log), Ok(())).unwrap();
    let p = ctl.puck(id).unwrap();
    let cmds = puck_commands(p, 1, false);
    match &cmds[0] {
        DrawCommand::Circle { glow: Some(g), .. } => assert_eq!(g.color, Rgba(255, 80, 80, 0.8)),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn rgba_formats_as_css() {
    assert_eq!(Rgba(108, 99, 255, 0.9).css(), "rgba(108, 99, 255, 0.9)");
}
