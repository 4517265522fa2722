#![cfg(target_arch = "wasm32")]
use crate::audio::WebAudioEngine;
use crate::constants::PAD_CANVAS_ID;
use crate::inbox::Inbox;
use puckpad_core::{PadController, PadParams};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod events;
mod frame;
mod inbox;
mod input;
mod recorder;
mod render;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("puckpad-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(PAD_CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", PAD_CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    let ctx2d: web::CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    dom::sync_canvas_backing_size(&canvas);
    let pad = input::pad_size_css(&canvas);

    let audio_ctx = web::AudioContext::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let inbox = Rc::new(RefCell::new(Inbox::default()));
    let engine = WebAudioEngine::new(audio_ctx, inbox.clone());
    let controller = Rc::new(RefCell::new(PadController::new(
        engine,
        PadParams::default(),
        pad,
    )));
    log::info!("pad ready at {:.0}x{:.0} css px", pad.width, pad.height);

    let wiring = events::Wiring {
        document: document.clone(),
        canvas: canvas.clone(),
        controller: controller.clone(),
        inbox: inbox.clone(),
        capture: Rc::new(RefCell::new(None)),
    };
    events::wire_all(&wiring);

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        controller,
        inbox,
        document,
        canvas,
        ctx2d,
        last_cursor: "",
        last_undo_available: None,
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
