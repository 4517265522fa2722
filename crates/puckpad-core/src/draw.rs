//! Per-frame draw commands. The web layer paints them onto a 2D canvas; the
//! core never touches a rendering context.

use crate::audio::AudioEngine;
use crate::constants::*;
use crate::controller::PadController;
use crate::puck::{LoadState, Origin, Puck};
use glam::Vec2;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub f32);

impl Rgba {
    pub const WHITE: Rgba = Rgba(255, 255, 255, 1.0);
    pub const BLACK: Rgba = Rgba(0, 0, 0, 1.0);

    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.0, self.1, self.2, self.3)
    }
}

// Palette
pub const ACCENT: Rgba = Rgba(108, 99, 255, 1.0);
const FILL_STOPPED: Rgba = Rgba(240, 240, 240, 0.85);
const FILL_FAILED: Rgba = Rgba(255, 180, 0, 0.8);
const FILL_LOADING: Rgba = Rgba(150, 150, 150, 0.7);
const HOVER_TEXT: Rgba = Rgba(255, 255, 255, 0.8);

/// Soft shadow around a puck body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    pub color: Rgba,
    pub blur: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Center,
    /// Left-aligned, anchored at the text's bottom edge.
    LeftBottom,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Circle {
        center: Vec2,
        radius: f32,
        fill: Rgba,
        glow: Option<Glow>,
    },
    Text {
        anchor: Vec2,
        text: String,
        font_px: f32,
        bold: bool,
        color: Rgba,
        align: TextAlign,
    },
    /// Round delete control with a cross, drawn on the hovered puck only.
    DeleteControl { center: Vec2, radius: f32 },
}

pub type PuckCommands = SmallVec<[DrawCommand; 4]>;

fn body_style(puck: &Puck) -> (Rgba, Glow) {
    let glow = |color, blur| Glow { color, blur };
    match puck.load_state() {
        LoadState::Failed => (FILL_FAILED, glow(Rgba(255, 255, 0, 0.9), 15.0)),
        LoadState::Loading => (FILL_LOADING, glow(Rgba(200, 200, 200, 0.5), 10.0)),
        LoadState::Ready => {
            let fill = if puck.is_playing() { ACCENT } else { FILL_STOPPED };
            let g = match puck.origin {
                Origin::MicRecording => glow(Rgba(255, 80, 80, 0.8), 18.0),
                Origin::FileImport if puck.is_playing() => glow(Rgba(108, 99, 255, 0.9), 15.0),
                Origin::FileImport => glow(Rgba(108, 99, 255, 0.6), 15.0),
            };
            (fill, g)
        }
    }
}

/// Commands for one puck. `number` is its 1-based display slot.
pub fn puck_commands(puck: &Puck, number: usize, hovered: bool) -> PuckCommands {
    let mut out = PuckCommands::new();
    let center = puck.position();
    let radius = puck.radius();
    let (fill, glow) = body_style(puck);
    out.push(DrawCommand::Circle {
        center,
        radius,
        fill,
        glow: Some(glow),
    });

    let number_color = if puck.is_ready() && !puck.is_playing() {
        Rgba::BLACK
    } else {
        Rgba::WHITE
    };
    out.push(DrawCommand::Text {
        anchor: center,
        text: number.to_string(),
        font_px: (radius * LABEL_FONT_SCALE).max(LABEL_MIN_FONT_PX),
        bold: true,
        color: number_color,
        align: TextAlign::Center,
    });

    if hovered {
        out.push(DrawCommand::Text {
            anchor: center + Vec2::new(radius + HOVER_LABEL_GAP_X, radius + HOVER_LABEL_GAP_Y),
            text: format!("{} ({})", puck.display_name(), puck.state_text()),
            font_px: HOVER_LABEL_FONT_PX,
            bold: false,
            color: HOVER_TEXT,
            align: TextAlign::LeftBottom,
        });
        out.push(DrawCommand::DeleteControl {
            center: puck.delete_control_center(),
            radius: DELETE_CONTROL_RADIUS,
        });
    }
    out
}

impl<E: AudioEngine> PadController<E> {
    /// Draw list for the current frame, bottom puck first.
    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        let hovered = self.hovered();
        self.pucks()
            .iter()
            .enumerate()
            .flat_map(|(i, p)| puck_commands(p, i + 1, hovered == Some(p.id)))
            .collect()
    }
}
