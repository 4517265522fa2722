use crate::constants::{RECORDING_FALLBACK_MIME, RECORDING_MIME_TYPES};
use crate::inbox::Inbox;
use puckpad_core::{RecordingOutcome, RecordingSession, SourceRef};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// One live microphone capture. Its terminal outcome is pushed to the inbox
/// exactly once, from `onstop` or `onerror`.
pub struct MicCapture {
    recorder: web::MediaRecorder,
}

impl MicCapture {
    pub fn stop(&self) {
        if self.recorder.state() == web::RecordingState::Recording {
            _ = self.recorder.stop();
        } else {
            log::info!("stop requested but the recorder was not recording");
        }
    }
}

fn js_msg(e: &JsValue) -> String {
    e.dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .unwrap_or_else(|| format!("{:?}", e))
}

/// Human-readable reason for a `getUserMedia` rejection.
pub fn describe_mic_error(name: &str, message: &str) -> String {
    let hint = match name {
        "NotAllowedError" | "PermissionDeniedError" => " Please grant microphone permission.",
        "NotFoundError" | "DevicesNotFoundError" => " No microphone detected.",
        "NotReadableError" | "TrackStartError" => " Microphone might be in use.",
        _ => "",
    };
    format!("could not access microphone: {message}.{hint}")
}

fn pick_mime_type() -> Option<&'static str> {
    RECORDING_MIME_TYPES
        .iter()
        .copied()
        .find(|m| web::MediaRecorder::is_type_supported(m))
}

fn stop_tracks(stream: &web::MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(t) = track.dyn_into::<web::MediaStreamTrack>() {
            t.stop();
        }
    }
    log::info!("microphone tracks stopped");
}

/// Ask for the microphone and start recording. Every outcome is tagged with
/// `session`.
pub async fn start_capture(
    inbox: Rc<RefCell<Inbox>>,
    session: RecordingSession,
) -> Result<MicCapture, String> {
    let window = web::window().ok_or("no window")?;
    let devices = window.navigator().media_devices().map_err(|e| js_msg(&e))?;
    let constraints = web::MediaStreamConstraints::new();
    constraints.set_audio(&JsValue::TRUE);
    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(|e| js_msg(&e))?;
    let stream: web::MediaStream = match JsFuture::from(promise).await {
        Ok(s) => s.dyn_into().map_err(|e| js_msg(&e))?,
        Err(e) => {
            let name = js_sys::Reflect::get(&e, &JsValue::from_str("name"))
                .ok()
                .and_then(|n| n.as_string())
                .unwrap_or_default();
            return Err(describe_mic_error(&name, &js_msg(&e)));
        }
    };

    let recorder = match pick_mime_type() {
        Some(mime) => {
            log::info!("recording as {}", mime);
            let options = web::MediaRecorderOptions::new();
            options.set_mime_type(mime);
            web::MediaRecorder::new_with_media_stream_and_media_recorder_options(&stream, &options)
        }
        None => {
            log::warn!("no preferred recording type supported; using browser default");
            web::MediaRecorder::new_with_media_stream(&stream)
        }
    }
    .map_err(|e| {
        stop_tracks(&stream);
        js_msg(&e)
    })?;

    let chunks: Rc<RefCell<Vec<web::Blob>>> = Rc::new(RefCell::new(Vec::new()));
    // `error` is followed by `stop`; only the first one reports.
    let reported = Rc::new(Cell::new(false));

    let chunks_data = chunks.clone();
    let on_data = Closure::wrap(Box::new(move |ev: web::BlobEvent| {
        if let Some(blob) = ev.data() {
            if blob.size() > 0.0 {
                chunks_data.borrow_mut().push(blob);
            }
        }
    }) as Box<dyn FnMut(_)>);
    recorder.set_ondataavailable(Some(on_data.as_ref().unchecked_ref()));
    on_data.forget();

    let chunks_stop = chunks.clone();
    let stream_stop = stream.clone();
    let recorder_stop = recorder.clone();
    let inbox_stop = inbox.clone();
    let reported_stop = reported.clone();
    let on_stop = Closure::wrap(Box::new(move || {
        stop_tracks(&stream_stop);
        if reported_stop.replace(true) {
            return;
        }
        let parts = js_sys::Array::new();
        for blob in chunks_stop.borrow_mut().drain(..) {
            parts.push(&blob);
        }
        let outcome = if parts.length() == 0 {
            RecordingOutcome::Failed("no audio data was captured".to_string())
        } else {
            let mime = recorder_stop.mime_type();
            let bag = web::BlobPropertyBag::new();
            bag.set_type(if mime.is_empty() { RECORDING_FALLBACK_MIME } else { &mime });
            match web::Blob::new_with_blob_sequence_and_options(&parts, &bag)
                .and_then(|blob| web::Url::create_object_url_with_blob(&blob))
            {
                Ok(url) => RecordingOutcome::Complete(SourceRef::new(url)),
                Err(e) => RecordingOutcome::Failed(js_msg(&e)),
            }
        };
        inbox_stop.borrow_mut().push_recording(session, outcome);
    }) as Box<dyn FnMut()>);
    recorder.set_onstop(Some(on_stop.as_ref().unchecked_ref()));
    on_stop.forget();

    let stream_err = stream.clone();
    let on_error = Closure::wrap(Box::new(move |ev: web::Event| {
        stop_tracks(&stream_err);
        if reported.replace(true) {
            return;
        }
        let detail = js_sys::Reflect::get(&ev, &JsValue::from_str("error"))
            .map(|e| js_msg(&e))
            .unwrap_or_else(|_| "unknown error".to_string());
        inbox
            .borrow_mut()
            .push_recording(session, RecordingOutcome::Failed(detail));
    }) as Box<dyn FnMut(_)>);
    recorder.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    on_error.forget();

    recorder.start().map_err(|e| {
        stop_tracks(&stream);
        js_msg(&e)
    })?;
    log::info!("microphone recording started");
    Ok(MicCapture { recorder })
}
