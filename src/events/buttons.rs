use super::Wiring;
use crate::constants::*;
use crate::dom;
use crate::recorder;
use puckpad_core::{RecorderState, RecordingOutcome, SourceRef, TransportState};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub fn wire_buttons(w: &Wiring) {
    let w_play = w.clone();
    dom::add_click_listener(&w.document, PLAY_TOGGLE_ID, move || toggle_transport(&w_play));

    let w_repeat = w.clone();
    dom::add_click_listener(&w.document, BEAT_REPEAT_ID, move || {
        toggle_beat_repeat(&w_repeat)
    });

    let w_undo = w.clone();
    dom::add_click_listener(&w.document, UNDO_DELETE_ID, move || {
        w_undo.controller.borrow_mut().undo_delete();
    });

    let w_rec = w.clone();
    dom::add_click_listener(&w.document, RECORD_BUTTON_ID, move || toggle_recording(&w_rec));

    wire_file_input(w);
}

pub fn toggle_transport(w: &Wiring) {
    // Browsers keep a fresh context suspended until a user gesture.
    {
        let ctl = w.controller.borrow();
        _ = ctl.engine().audio_ctx().resume();
    }
    let result = w.controller.borrow_mut().toggle_transport();
    match result {
        Ok(TransportState::Started) => {
            dom::swap_icon(&w.document, PLAY_TOGGLE_ID, "fa-play", "fa-pause")
        }
        Ok(TransportState::Stopped) => {
            dom::swap_icon(&w.document, PLAY_TOGGLE_ID, "fa-pause", "fa-play")
        }
        Err(e) => {
            log::warn!("[transport] {}", e);
            dom::alert(&e.to_string());
        }
    }
}

pub fn toggle_beat_repeat(w: &Wiring) {
    let toggled = w.controller.borrow_mut().toggle_beat_repeat();
    if toggled == 0 {
        log::info!("[beat-repeat] no ready pucks");
        return;
    }
    let any_on = w
        .controller
        .borrow()
        .pucks()
        .iter()
        .any(|p| p.beat_repeat());
    dom::set_class(&w.document, BEAT_REPEAT_ID, "active", any_on);
}

/// Start a microphone session, or stop the running one. The finished clip
/// arrives through the inbox.
pub fn toggle_recording(w: &Wiring) {
    let state = w.controller.borrow().recorder_state();
    match state {
        RecorderState::Recording => {
            if let Err(e) = w.controller.borrow_mut().end_recording() {
                log::warn!("[record] {}", e);
            }
            if let Some(capture) = w.capture.borrow_mut().take() {
                capture.stop();
            }
            dom::set_class(&w.document, RECORD_BUTTON_ID, "recording", false);
        }
        RecorderState::Idle => {
            let session = match w.controller.borrow_mut().begin_recording() {
                Ok(s) => s,
                Err(e) => {
                    log::warn!("[record] {}", e);
                    return;
                }
            };
            dom::set_class(&w.document, RECORD_BUTTON_ID, "recording", true);
            let w2 = w.clone();
            spawn_local(async move {
                match recorder::start_capture(w2.inbox.clone(), session).await {
                    Ok(capture) => {
                        // Stopped (and maybe restarted) while permission was pending.
                        if w2.controller.borrow().live_session() != Some(session) {
                            capture.stop();
                            return;
                        }
                        let previous = w2.capture.borrow_mut().replace(capture);
                        if let Some(previous) = previous {
                            previous.stop();
                        }
                    }
                    Err(reason) => {
                        w2.inbox
                            .borrow_mut()
                            .push_recording(session, RecordingOutcome::Failed(reason));
                    }
                }
            });
        }
    }
}

fn wire_file_input(w: &Wiring) {
    let Some(el) = w.document.get_element_by_id(FILE_INPUT_ID) else {
        log::error!("#{} element not found; listener not attached", FILE_INPUT_ID);
        return;
    };
    let Ok(input) = el.dyn_into::<web::HtmlInputElement>() else {
        log::error!("#{} is not an input element", FILE_INPUT_ID);
        return;
    };
    let w2 = w.clone();
    let input2 = input.clone();
    let closure = Closure::wrap(Box::new(move || {
        let Some(files) = input2.files() else {
            return;
        };
        for i in 0..files.length() {
            let Some(file) = files.get(i) else {
                continue;
            };
            match web::Url::create_object_url_with_blob(&file) {
                Ok(url) => {
                    w2.controller
                        .borrow_mut()
                        .add_file(file.name(), SourceRef::new(url));
                }
                Err(e) => log::error!("[files] {}: {:?}", file.name(), e),
            }
        }
        // Selecting the same file again should fire `change` again.
        input2.set_value("");
    }) as Box<dyn FnMut()>);
    _ = input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
    closure.forget();
}
