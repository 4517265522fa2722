use crate::constants::*;
use crate::dom;
use crate::events::SharedController;
use crate::inbox::Inbox;
use crate::input;
use crate::render;
use puckpad_core::{PadError, RecorderState};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub controller: SharedController,
    pub inbox: Rc<RefCell<Inbox>>,
    pub document: web::Document,
    pub canvas: web::HtmlCanvasElement,
    pub ctx2d: web::CanvasRenderingContext2d,
    pub last_cursor: &'static str,
    pub last_undo_available: Option<bool>,
}

impl FrameContext {
    pub fn frame(&mut self) {
        self.deliver_completions();

        let dpr = dom::sync_canvas_backing_size(&self.canvas);
        let pad = input::pad_size_css(&self.canvas);
        let (commands, cursor, undo_available) = {
            let mut ctl = self.controller.borrow_mut();
            if ctl.pad_size() != pad {
                ctl.set_pad_size(pad);
            }
            (
                ctl.draw_commands(),
                ctl.cursor().css(),
                ctl.pending_undo().is_some(),
            )
        };
        render::paint(&self.ctx2d, &self.canvas, dpr, &commands);

        if cursor != self.last_cursor {
            dom::set_cursor(&self.canvas, cursor);
            self.last_cursor = cursor;
        }
        if self.last_undo_available != Some(undo_available) {
            dom::set_disabled(&self.document, UNDO_DELETE_ID, !undo_available);
            self.last_undo_available = Some(undo_available);
        }
    }

    /// Hand queued load and recording completions to the controller. Each
    /// failure is reported to the user once.
    fn deliver_completions(&mut self) {
        let (loads, recordings) = {
            let mut inbox = self.inbox.borrow_mut();
            (inbox.take_loads(), inbox.take_recordings())
        };
        if loads.is_empty() && recordings.is_empty() {
            return;
        }
        let had_recordings = !recordings.is_empty();
        let mut failures: Vec<PadError> = Vec::new();
        {
            let mut ctl = self.controller.borrow_mut();
            for (ticket, result) in loads {
                if let Err(e) = ctl.on_load_complete(ticket, result) {
                    failures.push(e);
                }
            }
            for (session, outcome) in recordings {
                if let Err(e) = ctl.finish_recording(session, outcome) {
                    failures.push(e);
                }
            }
            if had_recordings {
                let recording = ctl.recorder_state() == RecorderState::Recording;
                dom::set_class(&self.document, RECORD_BUTTON_ID, "recording", recording);
            }
        }
        // Alerts block; no controller borrow is held across them.
        for e in failures {
            dom::alert(&e.to_string());
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
