use super::{buttons, Wiring};
use crate::input::{key_action, KeyAction};
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn handle_global_keydown(ev: &web::KeyboardEvent, w: &Wiring) {
    // Typing into a form control is not a shortcut.
    let in_input = ev
        .target()
        .map(|t| t.dyn_ref::<web::HtmlInputElement>().is_some())
        .unwrap_or(false);
    if in_input || ev.repeat() {
        return;
    }
    let Some(action) = key_action(&ev.key(), ev.ctrl_key() || ev.meta_key()) else {
        return;
    };
    ev.prevent_default();
    match action {
        KeyAction::ToggleTransport => buttons::toggle_transport(w),
        KeyAction::UndoDelete => {
            if w.controller.borrow_mut().undo_delete().is_none() {
                log::info!("[keys] nothing to undo");
            }
        }
        KeyAction::ToggleBeatRepeat => buttons::toggle_beat_repeat(w),
        KeyAction::ToggleRecording => buttons::toggle_recording(w),
    }
}

pub fn wire_global_keydown(w: &Wiring) {
    if let Some(window) = web::window() {
        let w2 = w.clone();
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                handle_global_keydown(&ev, &w2);
            }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
