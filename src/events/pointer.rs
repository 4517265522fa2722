use super::Wiring;
use crate::input;
use puckpad_core::PressOutcome;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_pointer_handlers(w: &Wiring) {
    wire_mousedown(w);
    wire_mousemove(w);
    wire_mouseup(w);
    wire_mouseleave(w);
    wire_wheel(w);
}

fn listen<E: wasm_bindgen::convert::FromWasmAbi + 'static>(
    target: &web::EventTarget,
    kind: &str,
    handler: impl FnMut(E) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_mousedown(w: &Wiring) {
    let w2 = w.clone();
    listen(&w.canvas, "mousedown", move |ev: web::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        let pos = input::pointer_pad_px(&ev, &w2.canvas);
        let outcome = w2.controller.borrow_mut().pointer_down(pos);
        match outcome {
            PressOutcome::Deleted(id) => log::info!("[mouse] deleted puck {}", id),
            PressOutcome::DragStarted(_) => ev.prevent_default(),
            PressOutcome::Missed => {}
        }
    });
}

fn wire_mousemove(w: &Wiring) {
    let w2 = w.clone();
    listen(&w.canvas, "mousemove", move |ev: web::MouseEvent| {
        let pos = input::pointer_pad_px(&ev, &w2.canvas);
        w2.controller.borrow_mut().pointer_move(pos);
    });
}

fn wire_mouseup(w: &Wiring) {
    let Some(window) = web::window() else {
        return;
    };
    let w2 = w.clone();
    // Window-level so a release outside the canvas still ends the drag.
    listen(&window, "mouseup", move |_ev: web::MouseEvent| {
        w2.controller.borrow_mut().pointer_up();
    });
}

fn wire_mouseleave(w: &Wiring) {
    let w2 = w.clone();
    listen(&w.canvas, "mouseleave", move |_ev: web::MouseEvent| {
        w2.controller.borrow_mut().pointer_leave();
    });
}

fn wire_wheel(w: &Wiring) {
    let w2 = w.clone();
    listen(&w.canvas, "wheel", move |ev: web::WheelEvent| {
        let changed = w2.controller.borrow_mut().wheel(ev.delta_y());
        if let Some(db) = changed {
            ev.prevent_default();
            log::debug!("[wheel] volume {:.1} dB", db);
        }
    });
}
