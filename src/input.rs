use glam::Vec2;
use puckpad_core::PadSize;
use web_sys as web;

// ---------------- Pointer helpers ----------------

/// Client coordinates to pad coordinates (CSS pixels, origin at the canvas'
/// top-left corner).
#[inline]
pub fn client_to_pad(client_x: f32, client_y: f32, rect_left: f32, rect_top: f32) -> Vec2 {
    Vec2::new(client_x - rect_left, client_y - rect_top)
}

#[inline]
pub fn pointer_pad_px(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    client_to_pad(
        ev.client_x() as f32,
        ev.client_y() as f32,
        rect.left() as f32,
        rect.top() as f32,
    )
}

/// Pad size in CSS pixels, matching the coordinates of [`pointer_pad_px`].
#[inline]
pub fn pad_size_css(canvas: &web::HtmlCanvasElement) -> PadSize {
    let rect = canvas.get_bounding_client_rect();
    PadSize::new(rect.width().max(0.0) as f32, rect.height().max(0.0) as f32)
}

// ---------------- Keyboard shortcuts ----------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    ToggleTransport,
    UndoDelete,
    ToggleBeatRepeat,
    ToggleRecording,
}

/// Map a `KeyboardEvent.key` to a pad action. `z` undoes with or without
/// Ctrl/Meta; the other shortcuts ignore chorded presses.
#[inline]
pub fn key_action(key: &str, ctrl_or_meta: bool) -> Option<KeyAction> {
    match key {
        "z" | "Z" => Some(KeyAction::UndoDelete),
        _ if ctrl_or_meta => None,
        " " => Some(KeyAction::ToggleTransport),
        "b" | "B" => Some(KeyAction::ToggleBeatRepeat),
        "r" | "R" => Some(KeyAction::ToggleRecording),
        _ => None,
    }
}
