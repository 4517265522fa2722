use crate::audio::WebAudioEngine;
use crate::inbox::Inbox;
use crate::recorder::MicCapture;
use puckpad_core::PadController;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

mod buttons;
mod keyboard;
mod pointer;

pub type SharedController = Rc<RefCell<PadController<WebAudioEngine>>>;

/// Handles shared by every DOM listener.
#[derive(Clone)]
pub struct Wiring {
    pub document: web::Document,
    pub canvas: web::HtmlCanvasElement,
    pub controller: SharedController,
    pub inbox: Rc<RefCell<Inbox>>,
    pub capture: Rc<RefCell<Option<MicCapture>>>,
}

pub fn wire_all(w: &Wiring) {
    pointer::wire_pointer_handlers(w);
    keyboard::wire_global_keydown(w);
    buttons::wire_buttons(w);
}
