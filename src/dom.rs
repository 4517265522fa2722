use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    } else {
        log::error!("#{} element not found; listener not attached", element_id);
    }
}

/// Keep the canvas backing store at CSS size × devicePixelRatio. Returns the
/// ratio so painting can scale back to CSS pixels.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> f64 {
    let Some(w) = web::window() else {
        return 1.0;
    };
    let dpr = w.device_pixel_ratio();
    let rect = canvas.get_bounding_client_rect();
    let w_px = (rect.width() * dpr) as u32;
    let h_px = (rect.height() * dpr) as u32;
    if canvas.width() != w_px.max(1) {
        canvas.set_width(w_px.max(1));
    }
    if canvas.height() != h_px.max(1) {
        canvas.set_height(h_px.max(1));
    }
    dpr
}

#[inline]
pub fn set_cursor(canvas: &web::HtmlCanvasElement, css: &str) {
    _ = canvas.style().set_property("cursor", css);
}

/// Swap one class for another on the `<i>` icon inside a button.
pub fn swap_icon(document: &web::Document, button_id: &str, from: &str, to: &str) {
    let icon = document
        .get_element_by_id(button_id)
        .and_then(|b| b.query_selector("i").ok().flatten());
    if let Some(icon) = icon {
        let classes = icon.class_list();
        _ = classes.remove_1(from);
        _ = classes.add_1(to);
    }
}

pub fn set_class(document: &web::Document, element_id: &str, class: &str, on: bool) {
    if let Some(el) = document.get_element_by_id(element_id) {
        _ = el.class_list().toggle_with_force(class, on);
    }
}

pub fn set_disabled(document: &web::Document, element_id: &str, disabled: bool) {
    if let Some(el) = document.get_element_by_id(element_id) {
        _ = el.toggle_attribute_with_force("disabled", disabled);
    }
}

pub fn alert(message: &str) {
    if let Some(w) = web::window() {
        _ = w.alert_with_message(message);
    }
}
